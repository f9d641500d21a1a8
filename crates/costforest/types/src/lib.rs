#![deny(unsafe_code)]
//! # costforest-types
//!
//! Shared vocabulary for the cost-sensitive adaptive forest:
//! - [`Instance`]: one labelled observation from the stream
//! - [`votes`]: helpers over class-probability vectors
//! - the three collaborator contracts the ensemble is built from:
//!   [`Model`], [`ChangeDetector`] and [`PerformanceEvaluator`]

pub mod contracts;
pub mod error;
pub mod instance;
pub mod votes;

pub use contracts::{ChangeDetector, Model, ModelFactory, PerformanceEvaluator};
pub use error::InstanceError;
pub use instance::Instance;
