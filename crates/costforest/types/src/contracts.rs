//! Contracts for the collaborators an ensemble member is assembled from.
//!
//! The forest never looks inside these: it trains and queries models,
//! feeds 0/1 error signals to detectors, and reads a single metric back
//! from evaluators.

use crate::instance::Instance;
use crate::votes;

/// An incremental classifier used as one ensemble member's model.
pub trait Model: Send {
    /// Learn from one instance with the given effective weight.
    fn train(&mut self, instance: &Instance, weight: f64);

    /// Class-probability vector for the instance. An untrained model
    /// returns an all-zero vector.
    fn predict(&self, instance: &Instance) -> Vec<f64>;

    /// Independent deep copy, including any internal random state.
    fn boxed_clone(&self) -> Box<dyn Model>;

    /// Forget everything learned, keeping configuration.
    fn reset_to_untrained(&mut self);

    /// Whether the model's top class matches the instance label.
    fn correctly_classifies(&self, instance: &Instance) -> bool {
        let prediction = self.predict(instance);
        !votes::is_empty_vote(&prediction)
            && votes::max_index(&prediction) == Some(instance.class_label)
    }

    /// Short human-readable name.
    fn name(&self) -> &str;
}

/// Builds the per-member models of a forest.
pub trait ModelFactory: Send + Sync {
    /// Build the model for ensemble slot `member_index`, restricted to
    /// `subspace_size` features.
    fn build(&self, member_index: usize, subspace_size: usize) -> Box<dyn Model>;
}

/// Online change detector over a binary error signal (0 = correct, 1 = error).
pub trait ChangeDetector: Send {
    fn observe(&mut self, signal: f64);

    /// Edge-triggered: true only if the last observation completed a change.
    fn change_detected(&self) -> bool;

    /// A new detector with the same configuration and no history.
    fn fresh(&self) -> Box<dyn ChangeDetector>;
}

/// Tracks one member's predictive performance.
pub trait PerformanceEvaluator: Send {
    fn record_result(&mut self, true_label: usize, votes: &[f64]);

    /// Current weighting metric, `None` while undefined.
    fn current_metric(&self) -> Option<f64>;

    fn reset(&mut self);

    fn boxed_clone(&self) -> Box<dyn PerformanceEvaluator>;
}
