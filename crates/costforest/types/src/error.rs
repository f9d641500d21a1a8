/// Errors raised while constructing instances.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InstanceError {
    #[error("class label {label} out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },
    #[error("an instance needs at least one class")]
    NoClasses,
    #[error("instance weight must be finite and non-negative, got {0}")]
    InvalidWeight(f64),
}
