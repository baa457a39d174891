//! Top-level configuration model

use super::{ChartConfig, LoggingConfig, WorkbookConfig};
use crate::error::{XlvizError, XlvizResult};
use serde::{Deserialize, Serialize};

/// Complete xlviz configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workbook loading behaviour
    pub workbook: WorkbookConfig,
    /// Chart rendering settings
    pub chart: ChartConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Check that every section holds usable values
    pub fn validate(&self) -> XlvizResult<()> {
        if self.workbook.preview_row_limit == 0 {
            return Err(XlvizError::config(
                "workbook.preview_row_limit must be greater than 0",
            ));
        }
        if self.workbook.column_peek_rows == 0 {
            return Err(XlvizError::config(
                "workbook.column_peek_rows must be greater than 0",
            ));
        }
        if self.workbook.assumed_row_bytes == 0 {
            return Err(XlvizError::config(
                "workbook.assumed_row_bytes must be greater than 0",
            ));
        }
        if self.chart.width < 100 || self.chart.height < 100 {
            return Err(XlvizError::config(format!(
                "chart size {}x{} is too small (minimum 100x100)",
                self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workbook.large_file_threshold_mb, 50);
        assert_eq!(config.workbook.preview_row_limit, 1000);
    }

    #[test]
    fn test_validate_rejects_tiny_chart() {
        let mut config = Config::default();
        config.chart.width = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[chart]\nwidth = 800\n").unwrap();
        assert_eq!(config.chart.width, 800);
        assert_eq!(config.chart.height, 600);
        assert_eq!(config.workbook.column_peek_rows, 5);
    }
}
