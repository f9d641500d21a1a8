use crate::error::InstanceError;
use serde::{Deserialize, Serialize};

/// A labelled observation flowing through the stream.
///
/// Training tasks only ever read an instance, so one instance is shared by
/// every member trained on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Numeric attribute values, class label excluded.
    pub features: Vec<f64>,
    /// Index of the true class, always `< num_classes`.
    pub class_label: usize,
    /// Number of classes of the stream this instance came from.
    pub num_classes: usize,
    /// Instance weight, 1.0 unless the stream says otherwise.
    pub weight: f64,
}

impl Instance {
    pub fn new(
        features: Vec<f64>,
        class_label: usize,
        num_classes: usize,
    ) -> Result<Self, InstanceError> {
        if num_classes == 0 {
            return Err(InstanceError::NoClasses);
        }
        if class_label >= num_classes {
            return Err(InstanceError::LabelOutOfRange {
                label: class_label,
                num_classes,
            });
        }
        Ok(Self {
            features,
            class_label,
            num_classes,
            weight: 1.0,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self, InstanceError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(InstanceError::InvalidWeight(weight));
        }
        self.weight = weight;
        Ok(self)
    }

    /// Number of attributes, class excluded.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn feature(&self, index: usize) -> Option<f64> {
        self.features.get(index).copied()
    }
}
