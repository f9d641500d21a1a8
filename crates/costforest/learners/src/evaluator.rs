use costforest_types::{votes, PerformanceEvaluator};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Confusion-matrix evaluator with metrics suited to skewed class priors.
///
/// An all-zero vote is recorded as an abstention: it counts towards the
/// true class's support but predicts nothing. With a window, only the
/// most recent `window` results are kept and the oldest is evicted first.
#[derive(Clone, Debug, Default)]
pub struct ImbalancedEvaluator {
    window: Option<usize>,
    history: VecDeque<(usize, Option<usize>)>,
    /// `[true class][predicted class]`
    confusion: Vec<Vec<u64>>,
    abstentions: Vec<u64>,
    total: u64,
}

/// Point-in-time snapshot of an evaluator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub instances: u64,
    pub accuracy: Option<f64>,
    pub f1: Option<f64>,
    pub g_mean: Option<f64>,
    pub recall_per_class: Vec<Option<f64>>,
}

impl ImbalancedEvaluator {
    /// Cumulative evaluator over every recorded result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator over the last `size` results only.
    pub fn windowed(size: usize) -> Self {
        Self {
            window: Some(size.max(1)),
            ..Self::default()
        }
    }

    /// Results currently counted.
    pub fn instances(&self) -> u64 {
        self.total
    }

    pub fn num_classes(&self) -> usize {
        self.confusion.len()
    }

    fn ensure_classes(&mut self, n: usize) {
        if self.confusion.len() < n {
            for row in &mut self.confusion {
                row.resize(n, 0);
            }
            self.confusion.resize(n, vec![0; n]);
            self.abstentions.resize(n, 0);
        }
    }

    fn count(&mut self, true_label: usize, predicted: Option<usize>, delta: i64) {
        let cell = match predicted {
            Some(p) => &mut self.confusion[true_label][p],
            None => &mut self.abstentions[true_label],
        };
        if delta >= 0 {
            *cell += 1;
            self.total += 1;
        } else {
            *cell = cell.saturating_sub(1);
            self.total = self.total.saturating_sub(1);
        }
    }

    fn true_positives(&self, class: usize) -> u64 {
        self.confusion[class][class]
    }

    fn support(&self, class: usize) -> u64 {
        self.confusion[class].iter().sum::<u64>() + self.abstentions[class]
    }

    fn predicted(&self, class: usize) -> u64 {
        self.confusion.iter().map(|row| row[class]).sum()
    }

    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let correct: u64 = (0..self.num_classes()).map(|c| self.true_positives(c)).sum();
        Some(correct as f64 / self.total as f64)
    }

    pub fn recall(&self, class: usize) -> Option<f64> {
        if class >= self.num_classes() {
            return None;
        }
        let support = self.support(class);
        (support > 0).then(|| self.true_positives(class) as f64 / support as f64)
    }

    pub fn precision(&self, class: usize) -> Option<f64> {
        if class >= self.num_classes() {
            return None;
        }
        let predicted = self.predicted(class);
        (predicted > 0).then(|| self.true_positives(class) as f64 / predicted as f64)
    }

    /// Per-class F1, undefined for a class that never occurred nor was predicted.
    pub fn class_f1(&self, class: usize) -> Option<f64> {
        let precision = self.precision(class);
        let recall = self.recall(class);
        if precision.is_none() && recall.is_none() {
            return None;
        }
        let (p, r) = (precision.unwrap_or(0.0), recall.unwrap_or(0.0));
        Some(if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 })
    }

    /// Macro-averaged F1 over classes with a defined F1.
    pub fn f1_score(&self) -> Option<f64> {
        let defined: Vec<f64> = (0..self.num_classes())
            .filter_map(|c| self.class_f1(c))
            .collect();
        if defined.is_empty() {
            None
        } else {
            Some(defined.iter().sum::<f64>() / defined.len() as f64)
        }
    }

    /// Geometric mean of the recalls of classes that occurred.
    pub fn g_mean(&self) -> Option<f64> {
        let recalls: Vec<f64> = (0..self.num_classes())
            .filter_map(|c| self.recall(c))
            .collect();
        if recalls.is_empty() {
            return None;
        }
        let product: f64 = recalls.iter().product();
        Some(product.powf(1.0 / recalls.len() as f64))
    }

    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            instances: self.total,
            accuracy: self.accuracy(),
            f1: self.f1_score(),
            g_mean: self.g_mean(),
            recall_per_class: (0..self.num_classes()).map(|c| self.recall(c)).collect(),
        }
    }
}

impl PerformanceEvaluator for ImbalancedEvaluator {
    fn record_result(&mut self, true_label: usize, vote: &[f64]) {
        let predicted = if votes::is_empty_vote(vote) {
            None
        } else {
            votes::max_index(vote)
        };
        let needed = (true_label + 1).max(vote.len());
        self.ensure_classes(needed);

        if let Some(size) = self.window {
            if self.history.len() >= size {
                if let Some((old_true, old_pred)) = self.history.pop_front() {
                    self.count(old_true, old_pred, -1);
                }
            }
            self.history.push_back((true_label, predicted));
        }
        self.count(true_label, predicted, 1);
    }

    fn current_metric(&self) -> Option<f64> {
        self.f1_score()
    }

    fn reset(&mut self) {
        self.history.clear();
        self.confusion.clear();
        self.abstentions.clear();
        self.total = 0;
    }

    fn boxed_clone(&self) -> Box<dyn PerformanceEvaluator> {
        Box::new(self.clone())
    }
}
