use costforest_types::InstanceError;

/// Errors from the cost-sensitive forest.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    #[error("training task for member {member} failed: {reason}")]
    TrainingTaskFailed { member: usize, reason: String },
    #[error("training pool unavailable: {0}")]
    PoolUnavailable(String),
    #[error("instance has {found} classes, session was started with {expected}")]
    ClassCountMismatch { expected: usize, found: usize },
    #[error("class label {label} out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Instance(#[from] InstanceError),
}

/// Result type for forest operations.
pub type ForestResult<T> = Result<T, ForestError>;
