#![deny(unsafe_code)]
//! # costforest-learners
//!
//! Concrete collaborators for ensemble members:
//! - [`SubspaceNaiveBayes`]: Gaussian naive Bayes over a random feature subspace
//! - [`ImbalancedEvaluator`]: confusion-matrix metrics (macro F1, G-mean, accuracy)
//! - [`BaseModelConfig`]: serializable model choice, usable as a
//!   [`ModelFactory`](costforest_types::ModelFactory)

pub mod config;
pub mod evaluator;
pub mod gaussian;
pub mod naive_bayes;

pub use config::BaseModelConfig;
pub use evaluator::{EvaluationSummary, ImbalancedEvaluator};
pub use gaussian::GaussianEstimator;
pub use naive_bayes::SubspaceNaiveBayes;
