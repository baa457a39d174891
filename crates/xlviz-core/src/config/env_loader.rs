//! Environment variable-based configuration overrides

use super::Config;
use crate::error::{XlvizError, XlvizResult};
use std::env;
use std::path::PathBuf;

/// Apply `XLVIZ_*` environment variables on top of `config`
pub fn apply_env(config: &mut Config) -> XlvizResult<()> {
    apply_env_from(config, |key| env::var(key).ok())
}

/// Apply overrides using an arbitrary variable lookup
pub(crate) fn apply_env_from<F>(config: &mut Config, lookup: F) -> XlvizResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("XLVIZ_DEFAULT_DIR") {
        config.workbook.default_directory = Some(PathBuf::from(dir));
    }

    if let Some(threshold) = lookup("XLVIZ_LARGE_FILE_MB") {
        config.workbook.large_file_threshold_mb = threshold.trim().parse().map_err(|_| {
            XlvizError::config_with_context(
                "Invalid XLVIZ_LARGE_FILE_MB value",
                format!("Parsing large file threshold '{}'", threshold),
            )
        })?;
    }

    if let Some(level) = lookup("XLVIZ_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("XLVIZ_LOG_FORMAT") {
        config.logging.format = format;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_env_overrides() {
        let vars = HashMap::from([
            ("XLVIZ_DEFAULT_DIR", "/tmp/sheets"),
            ("XLVIZ_LARGE_FILE_MB", "5"),
            ("XLVIZ_LOG_LEVEL", "trace"),
        ]);
        let mut config = Config::default();
        apply_env_from(&mut config, lookup(&vars)).unwrap();

        assert_eq!(
            config.workbook.default_directory,
            Some(PathBuf::from("/tmp/sheets"))
        );
        assert_eq!(config.workbook.large_file_threshold_mb, 5);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_invalid_threshold() {
        let vars = HashMap::from([("XLVIZ_LARGE_FILE_MB", "fifty")]);
        let mut config = Config::default();
        let err = apply_env_from(&mut config, lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("XLVIZ_LARGE_FILE_MB"));
    }
}
