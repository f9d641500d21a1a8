use crate::naive_bayes::SubspaceNaiveBayes;
use costforest_types::{Model, ModelFactory};
use serde::{Deserialize, Serialize};

/// Serializable choice of base model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseModelConfig {
    /// Member `i` is seeded with `seed + i`.
    SubspaceNaiveBayes { seed: u64 },
}

impl Default for BaseModelConfig {
    fn default() -> Self {
        Self::SubspaceNaiveBayes { seed: 1 }
    }
}

impl ModelFactory for BaseModelConfig {
    fn build(&self, member_index: usize, subspace_size: usize) -> Box<dyn Model> {
        match *self {
            Self::SubspaceNaiveBayes { seed } => Box::new(SubspaceNaiveBayes::new(
                subspace_size,
                seed.wrapping_add(member_index as u64),
            )),
        }
    }
}
