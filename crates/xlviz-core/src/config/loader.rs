//! Configuration loader
//!
//! Sources are applied in the order they were added; later sources override
//! earlier ones.

use super::{Config, args_loader, env_loader, file_loader};
use crate::error::XlvizResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file
    File(PathBuf),
    /// Configuration from environment variables
    Environment,
    /// Configuration from command line arguments
    CommandLine(HashMap<String, String>),
    /// Default configuration
    Default,
}

/// Configuration loader with support for multiple sources
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add command line arguments source
    pub fn with_args(self, args: HashMap<String, String>) -> Self {
        self.add_source(ConfigSource::CommandLine(args))
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Load configuration from all sources
    pub fn load(self) -> XlvizResult<Config> {
        let mut config = Config::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    if let Some(file_config) = file_loader::load_from_file(path)? {
                        tracing::debug!("Loaded config from file: {}", path.display());
                        config = file_config;
                    }
                }
                ConfigSource::Environment => env_loader::apply_env(&mut config)?,
                ConfigSource::CommandLine(args) => args_loader::apply_args(&mut config, args)?,
                ConfigSource::Default => config = Config::default(),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_args_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xlviz.toml");
        std::fs::write(&path, "[workbook]\nlarge_file_threshold_mb = 20\n").unwrap();

        let config = ConfigLoader::new()
            .with_defaults()
            .with_file(&path)
            .with_args(HashMap::from([(
                "large_file_threshold_mb".to_string(),
                "1".to_string(),
            )]))
            .load()
            .unwrap();

        assert_eq!(config.workbook.large_file_threshold_mb, 1);
    }

    #[test]
    fn test_invalid_file_values_fail_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xlviz.toml");
        std::fs::write(&path, "[workbook]\npreview_row_limit = 0\n").unwrap();

        let result = ConfigLoader::new().with_defaults().with_file(&path).load();
        assert!(result.is_err());
    }
}
