use crate::member::LearnerState;
use serde::{Deserialize, Serialize};

/// Snapshot of one ensemble member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberMeasurement {
    pub index: usize,
    pub state: LearnerState,
    /// Instance count at which the current primary was created.
    pub created_on: u64,
    pub last_drift_on: u64,
    pub last_warning_on: u64,
    pub drift_count: u64,
    pub warning_count: u64,
    /// Evaluator metric used as the vote weight.
    pub metric: Option<f64>,
}

/// Snapshot of the whole ensemble. Taking one has no side effects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForestMeasurements {
    pub instances_seen: u64,
    pub ensemble_size: usize,
    pub subspace_size: usize,
    /// Training workers; 0 when the session has ended.
    pub scheduler_jobs: usize,
    pub drifts_detected: u64,
    pub warnings_detected: u64,
    pub members_in_warning: usize,
    pub class_distribution: Vec<u64>,
    pub class_costs: Vec<f64>,
    pub members: Vec<MemberMeasurement>,
}

impl ForestMeasurements {
    pub fn mean_metric(&self) -> Option<f64> {
        let metrics: Vec<f64> = self.members.iter().filter_map(|m| m.metric).collect();
        if metrics.is_empty() {
            return None;
        }
        Some(metrics.iter().sum::<f64>() / metrics.len() as f64)
    }

    pub fn window_len(&self) -> u64 {
        self.class_distribution.iter().sum()
    }
}
