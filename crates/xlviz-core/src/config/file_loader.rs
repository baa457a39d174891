//! File-based configuration loading

use super::Config;
use crate::error::{XlvizError, XlvizResult};
use std::fs;
use std::path::Path;

/// Load configuration from a file
///
/// Supports TOML and JSON formats based on file extension.
/// Returns `None` if the file doesn't exist.
pub fn load_from_file(path: &Path) -> XlvizResult<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        XlvizError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            XlvizError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
        _ => toml::from_str(&content).map_err(|e| {
            XlvizError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("xlviz.toml");
        let config_toml = r#"
[workbook]
default_directory = "/srv/sheets"
large_file_threshold_mb = 10

[logging]
level = "debug"
"#;
        fs::write(&config_path, config_toml).unwrap();

        let config = load_from_file(&config_path).unwrap().unwrap();
        assert_eq!(config.workbook.large_file_threshold_mb, 10);
        assert_eq!(config.workbook.preview_row_limit, 1000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("xlviz.json");
        fs::write(&config_path, r#"{"chart": {"width": 640, "height": 480}}"#).unwrap();

        let config = load_from_file(&config_path).unwrap().unwrap();
        assert_eq!(config.chart.width, 640);
        assert_eq!(config.chart.height, 480);
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_from_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_toml_reports_context() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[workbook\nlarge_file_threshold_mb = ").unwrap();

        let err = load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML config"));
        assert!(err.context().unwrap().contains("broken.toml"));
    }
}
