use costforest_types::votes;
use serde::{Deserialize, Serialize};

/// Per-class boosting-style error weighting.
///
/// For each true class `c`, a correct ensemble prediction adds `λ[c]` to the
/// correct accumulator and rescales `λ[c] *= seen / (2 · correct[c])`; an
/// incorrect one does the same against the incorrect accumulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OzaCosting {
    lambda: Vec<f64>,
    correct: Vec<f64>,
    incorrect: Vec<f64>,
}

impl OzaCosting {
    pub fn new(num_classes: usize) -> Self {
        Self {
            lambda: vec![1.0; num_classes],
            correct: vec![0.0; num_classes],
            incorrect: vec![0.0; num_classes],
        }
    }

    pub fn num_classes(&self) -> usize {
        self.lambda.len()
    }

    /// Fold in the ensemble's prediction for one instance.
    pub fn update(&mut self, true_label: usize, ensemble_vote: &[f64], instances_seen: u64) {
        if true_label >= self.lambda.len() {
            return;
        }
        let seen = instances_seen as f64;
        let lambda = self.lambda[true_label];
        let hit = votes::max_index(ensemble_vote) == Some(true_label);
        let acc = if hit {
            &mut self.correct[true_label]
        } else {
            &mut self.incorrect[true_label]
        };
        *acc += lambda;
        let acc = *acc;
        self.lambda[true_label] = lambda * seen / (2.0 * acc);
    }

    /// `ln((1 - e) / e)` where `e` is the correct share; 1.0 when that is undefined.
    pub fn cost(&self, class: usize) -> f64 {
        let correct = self.correct.get(class).copied().unwrap_or(0.0);
        let incorrect = self.incorrect.get(class).copied().unwrap_or(0.0);
        let e = correct / (correct + incorrect);
        if e.is_nan() || e == 0.0 || e > 0.5 {
            return 1.0;
        }
        (1.0 / (e / (1.0 - e))).ln()
    }

    pub fn lambda(&self, class: usize) -> Option<f64> {
        self.lambda.get(class).copied()
    }
}
