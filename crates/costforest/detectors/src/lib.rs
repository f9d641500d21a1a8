#![deny(unsafe_code)]
//! # costforest-detectors
//!
//! Change detectors consumed by ensemble members through the
//! [`ChangeDetector`](costforest_types::ChangeDetector) contract.
//!
//! - [`Adwin`]: adaptive windowing (Bifet & Gavaldà, 2007)
//! - [`Ddm`]: drift detection method (Gama et al., 2004)

pub mod adwin;
pub mod config;
pub mod ddm;

pub use adwin::Adwin;
pub use config::DetectorConfig;
pub use ddm::Ddm;
