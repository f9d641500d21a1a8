#![deny(unsafe_code)]
//! # costforest-stream
//!
//! Instance sources and the test-then-train loop used to evaluate a
//! [`CostSensitiveForest`](costforest_engine::CostSensitiveForest).
//!
//! - [`SeaGenerator`]: SEA concepts with optional abrupt drift
//! - [`ImbalancedStream`]: reshapes any stream's class priors
//! - [`PrequentialEvaluation`]: predict, score, then train, sampling a learning curve

pub mod error;
pub mod imbalanced;
pub mod prequential;
pub mod sea;
pub mod stream;

pub use error::{StreamError, StreamResult};
pub use imbalanced::{parse_ratios, ImbalancedStream};
pub use prequential::{LearningCurvePoint, PrequentialEvaluation, PrequentialReport};
pub use sea::SeaGenerator;
pub use stream::{InstanceStream, StreamHeader};
