use crate::config::CostStrategy;
use crate::oza::OzaCosting;
use crate::window::ImbalanceWindow;
use costforest_types::votes;

/// Square misclassification-cost matrix, row = true class, column = predicted.
///
/// Starts as zero on the diagonal and one elsewhere. The cost applied to a
/// class is the sum of its column.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    num_classes: usize,
    cells: Vec<f64>,
}

impl CostMatrix {
    pub fn new(num_classes: usize) -> Self {
        let mut cells = vec![1.0; num_classes * num_classes];
        for i in 0..num_classes {
            cells[i * num_classes + i] = 0.0;
        }
        Self { num_classes, cells }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.num_classes || col >= self.num_classes {
            return None;
        }
        Some(self.cells[row * self.num_classes + col])
    }

    pub fn cost_for_class(&self, class: usize) -> Option<f64> {
        if class >= self.num_classes {
            return None;
        }
        Some(
            (0..self.num_classes)
                .map(|row| self.cells[row * self.num_classes + class])
                .sum(),
        )
    }

    pub fn class_costs(&self) -> Vec<f64> {
        (0..self.num_classes)
            .filter_map(|c| self.cost_for_class(c))
            .collect()
    }

    /// Multiply each entry of `votes` by its class cost.
    pub fn apply_to(&self, votes: &mut [f64]) {
        for (class, v) in votes.iter_mut().enumerate().take(self.num_classes) {
            if let Some(cost) = self.cost_for_class(class) {
                *v *= cost;
            }
        }
    }

    /// Overwrite every off-diagonal cell of column `j` with `class_cost(j)`.
    ///
    /// Non-finite costs leave the column as it was. Returns how many columns
    /// were skipped.
    pub fn recompute<F>(&mut self, mut class_cost: F) -> usize
    where
        F: FnMut(usize) -> f64,
    {
        let n = self.num_classes;
        let mut skipped = 0;
        for col in 0..n {
            let cost = class_cost(col);
            let finite = cost.is_finite();
            if !finite {
                skipped += 1;
            }
            for row in 0..n {
                let cell = &mut self.cells[row * n + col];
                if row == col {
                    *cell = 0.0;
                } else if finite {
                    *cell = cost;
                }
            }
        }
        skipped
    }
}

/// Active cost heuristic with whatever state it carries.
#[derive(Clone, Debug)]
pub enum CostHeuristic {
    Picek,
    Oza(OzaCosting),
}

impl CostHeuristic {
    pub fn for_strategy(strategy: CostStrategy, num_classes: usize) -> Self {
        match strategy {
            CostStrategy::Picek => Self::Picek,
            CostStrategy::OzaCosting => Self::Oza(OzaCosting::new(num_classes)),
        }
    }

    pub fn strategy(&self) -> CostStrategy {
        match self {
            Self::Picek => CostStrategy::Picek,
            Self::Oza(_) => CostStrategy::OzaCosting,
        }
    }

    /// Feed the ensemble's vote for the instance being trained.
    /// Empty votes carry no prediction and are skipped.
    pub fn observe(&mut self, true_label: usize, ensemble_vote: &[f64], instances_seen: u64) {
        if let Self::Oza(oza) = self {
            if !votes::is_empty_vote(ensemble_vote) {
                oza.update(true_label, ensemble_vote, instances_seen);
            }
        }
    }

    /// Cost for misclassifying into `class`.
    pub fn class_cost(&self, class: usize, window: &ImbalanceWindow, num_classes: usize) -> f64 {
        match self {
            Self::Picek => picek_cost(window, class, num_classes),
            Self::Oza(oza) => oza.cost(class),
        }
    }
}

/// `|window| / (num_classes · count[class])`; infinite for an unseen class.
pub fn picek_cost(window: &ImbalanceWindow, class: usize, num_classes: usize) -> f64 {
    window.len() as f64 / (num_classes as f64 * window.count(class) as f64)
}
