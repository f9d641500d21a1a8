use crate::adwin::Adwin;
use crate::ddm::Ddm;
use costforest_types::ChangeDetector;
use serde::{Deserialize, Serialize};

/// Serializable choice of change detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorConfig {
    Adwin { delta: f64 },
    Ddm { min_instances: u64, drift_level: f64 },
}

impl DetectorConfig {
    /// Default drift-level detector.
    pub fn drift_default() -> Self {
        Self::Adwin { delta: 1e-5 }
    }

    /// Default warning-level detector, more sensitive than the drift one.
    pub fn warning_default() -> Self {
        Self::Adwin { delta: 1e-4 }
    }

    pub fn build(&self) -> Box<dyn ChangeDetector> {
        match *self {
            Self::Adwin { delta } => Box::new(Adwin::new(delta)),
            Self::Ddm {
                min_instances,
                drift_level,
            } => Box::new(Ddm::new(min_instances).with_drift_level(drift_level)),
        }
    }
}
