#![deny(unsafe_code)]
//! # costforest-engine
//!
//! Cost-sensitive adaptive random forest for imbalanced, drifting streams.
//!
//! - [`CostSensitiveForest`]: the ensemble manager (online bagging with
//!   forced minority inclusion, cost-thresholded weighted voting)
//! - [`ForestEngine`]: the adaptive forest it wraps (subspace sizing,
//!   member arena, drift/warning handling)
//! - [`Member`]: one ensemble slot with its warning → background →
//!   promotion state machine
//! - [`CostMatrix`], [`ImbalanceWindow`], [`OzaCosting`]: the rebalancing layer
//! - [`TrainingScheduler`]: synchronous or pooled per-instance fan-out

pub mod config;
pub mod cost;
pub mod ensemble;
pub mod error;
pub mod forest;
pub mod measurements;
pub mod member;
pub mod oza;
pub mod sampling;
pub mod scheduler;
pub mod window;

pub use config::{
    Concurrency, CostStrategy, ForestConfig, ResolvedSubspace, SubspaceMode, ThresholdMode,
};
pub use cost::{CostHeuristic, CostMatrix};
pub use ensemble::{CostSensitiveForest, ForestBuilder};
pub use error::{ForestError, ForestResult};
pub use forest::{Collaborators, ForestEngine};
pub use measurements::{ForestMeasurements, MemberMeasurement};
pub use member::{Learner, LearnerRole, LearnerState, Member, MemberSettings, TrainOutcome};
pub use oza::OzaCosting;
pub use sampling::ReplicationSampler;
pub use scheduler::{TrainingScheduler, TrainingTask};
pub use window::ImbalanceWindow;
