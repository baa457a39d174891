//! Default configuration loading functions

use super::{Config, ConfigLoader};
use crate::error::XlvizResult;
use std::collections::HashMap;

/// Configuration file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "xlviz.toml";

/// Convenience function to load configuration with default sources
///
/// Loads configuration in this order:
/// 1. Default configuration
/// 2. xlviz.toml (if exists)
/// 3. ~/.config/xlviz/config.toml (if exists and no local file)
/// 4. Environment variables
pub fn load_config() -> XlvizResult<Config> {
    load_config_with_overrides(None, HashMap::new())
}

/// Load configuration with command line overrides
///
/// Loads configuration in this order:
/// 1. Default configuration
/// 2. Config file (if specified, or default files)
/// 3. Environment variables
/// 4. Command line overrides
pub fn load_config_with_overrides(
    config_file: Option<&str>,
    overrides: HashMap<String, String>,
) -> XlvizResult<Config> {
    let mut loader = ConfigLoader::new().with_defaults();

    if let Some(file) = config_file {
        loader = loader.with_file(file);
    } else if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
        loader = loader.with_file(DEFAULT_CONFIG_FILE);
    } else if let Some(global) = dirs::config_dir().map(|d| d.join("xlviz").join("config.toml")) {
        loader = loader.with_file(global);
    }

    loader.with_env().with_args(overrides).load()
}
