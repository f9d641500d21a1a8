use costforest_types::Instance;
use serde::{Deserialize, Serialize};

/// Shape shared by every instance a stream emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamHeader {
    pub num_features: usize,
    pub num_classes: usize,
}

/// A source of labelled instances.
pub trait InstanceStream {
    fn header(&self) -> StreamHeader;

    /// Next instance, or `None` once the stream is exhausted.
    fn next_instance(&mut self) -> Option<Instance>;

    /// Rewind to the first instance.
    fn restart(&mut self);
}
