//! Configuration commands

use crate::error::CliResult;
use crate::output;
use costforest_engine::ForestConfig;
use std::path::Path;

/// Load a forest configuration from a JSON file, or the defaults.
pub fn load(path: Option<&Path>) -> CliResult<ForestConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(ForestConfig::default()),
    }
}

/// Print the default configuration.
pub fn show_default() -> CliResult<()> {
    output::print_json(&ForestConfig::default())
}
