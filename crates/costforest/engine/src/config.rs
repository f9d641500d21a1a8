use crate::error::{ForestError, ForestResult};
use costforest_detectors::DetectorConfig;
use costforest_learners::BaseModelConfig;
use serde::{Deserialize, Serialize};

/// How many features each member's random subspace draws.
///
/// Negative values count back from the number of features (`n + m`).
/// The result is clamped to `[1, n]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum SubspaceMode {
    Fixed(i64),
    /// `round(sqrt(n)) + 1`
    #[default]
    SqrtPlusOne,
    /// `n - round(sqrt(n) + 1)`
    SqrtInverse,
    /// Percentage of `n`; negative means `100 + p`.
    Percentage(i64),
}

/// Outcome of resolving a [`SubspaceMode`] against a feature count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSubspace {
    pub requested: i64,
    pub size: usize,
}

impl ResolvedSubspace {
    pub fn clamped(&self) -> bool {
        self.requested != self.size as i64
    }
}

impl SubspaceMode {
    pub fn resolve(&self, num_features: usize) -> ResolvedSubspace {
        let n = num_features as i64;
        let root = (num_features as f64).sqrt();
        let mut m = match *self {
            Self::Fixed(m) => m,
            Self::SqrtPlusOne => root.round() as i64 + 1,
            Self::SqrtInverse => n - (root + 1.0).round() as i64,
            Self::Percentage(p) => {
                let p = if p < 0 { 100 + p } else { p };
                (num_features as f64 * p as f64 / 100.0).round() as i64
            }
        };
        if m < 0 {
            m += n;
        }
        let size = if m <= 0 {
            1
        } else if m > n {
            num_features
        } else {
            m as usize
        };
        ResolvedSubspace { requested: m, size }
    }
}

/// Which votes the cost matrix multiplies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Member votes during training, before evaluator updates.
    Training,
    /// Each member's vote at prediction time.
    Local,
    /// The aggregated ensemble vote at prediction time.
    #[default]
    Global,
    Disabled,
}

/// Heuristic that fills the cost matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostStrategy {
    /// Inverse class frequency over the imbalance window.
    #[default]
    Picek,
    /// Boosting-style error weighting of the ensemble's own predictions.
    OzaCosting,
}

/// Worker pool sizing for member training.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "jobs", rename_all = "snake_case")]
pub enum Concurrency {
    Sequential,
    /// `Jobs(0)` and `Jobs(1)` train on the calling thread.
    Jobs(usize),
    /// One worker per available core.
    #[default]
    Auto,
}

impl Concurrency {
    pub fn worker_count(&self) -> usize {
        match *self {
            Self::Sequential => 1,
            Self::Jobs(n) => n.max(1),
            Self::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Configuration for a [`CostSensitiveForest`](crate::CostSensitiveForest).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub ensemble_size: usize,
    pub subspace: SubspaceMode,
    /// Mean of the Poisson replication draw.
    pub lambda: f64,
    /// Capacity of the imbalance window.
    pub window_size: usize,
    pub threshold_mode: ThresholdMode,
    pub cost_strategy: CostStrategy,
    /// Scale member votes by their evaluator metric.
    pub weighted_vote: bool,
    pub drift_detection: bool,
    pub background_learners: bool,
    pub drift_detector: DetectorConfig,
    pub warning_detector: DetectorConfig,
    pub base_model: BaseModelConfig,
    pub concurrency: Concurrency,
    /// Seed for the replication sampler.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            ensemble_size: 100,
            subspace: SubspaceMode::SqrtPlusOne,
            lambda: 6.0,
            window_size: 10_000,
            threshold_mode: ThresholdMode::Global,
            cost_strategy: CostStrategy::Picek,
            weighted_vote: true,
            drift_detection: true,
            background_learners: true,
            drift_detector: DetectorConfig::drift_default(),
            warning_detector: DetectorConfig::warning_default(),
            base_model: BaseModelConfig::default(),
            concurrency: Concurrency::Auto,
            seed: 1,
        }
    }
}

impl ForestConfig {
    /// Small sequential ensemble for demos and tests.
    pub fn small() -> Self {
        Self {
            ensemble_size: 10,
            window_size: 1_000,
            concurrency: Concurrency::Sequential,
            ..Default::default()
        }
    }

    pub fn with_ensemble_size(mut self, size: usize) -> Self {
        self.ensemble_size = size;
        self
    }

    pub fn with_threshold_mode(mut self, mode: ThresholdMode) -> Self {
        self.threshold_mode = mode;
        self
    }

    pub fn with_cost_strategy(mut self, strategy: CostStrategy) -> Self {
        self.cost_strategy = strategy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> ForestResult<()> {
        if self.ensemble_size == 0 {
            return Err(ForestError::InvalidConfig(
                "ensemble_size must be at least 1".into(),
            ));
        }
        if self.window_size == 0 {
            return Err(ForestError::InvalidConfig(
                "window_size must be at least 1".into(),
            ));
        }
        if !(self.lambda.is_finite() && self.lambda > 0.0) {
            return Err(ForestError::InvalidConfig(format!(
                "lambda must be positive and finite, got {}",
                self.lambda
            )));
        }
        Ok(())
    }
}
