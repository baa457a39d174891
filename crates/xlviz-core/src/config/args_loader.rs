//! Command line configuration overrides

use super::Config;
use crate::error::{XlvizError, XlvizResult};
use std::collections::HashMap;
use std::path::PathBuf;

/// Apply `key -> value` overrides collected from the command line
pub fn apply_args(config: &mut Config, args: &HashMap<String, String>) -> XlvizResult<()> {
    for (key, value) in args {
        match key.as_str() {
            "default_directory" => {
                config.workbook.default_directory = Some(PathBuf::from(value));
            }
            "large_file_threshold_mb" => {
                config.workbook.large_file_threshold_mb = value.parse().map_err(|_| {
                    XlvizError::config(format!("Invalid large_file_threshold_mb: {}", value))
                })?;
            }
            "log_level" => config.logging.level = value.clone(),
            other => {
                tracing::warn!("Ignoring unknown configuration override '{}'", other);
            }
        }
    }
    Ok(())
}
