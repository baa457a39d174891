//! Path resolution against the configured default directory

use crate::error::{DataError, DataResult};
use std::path::{Path, PathBuf};

/// Maps user-supplied paths to absolute paths
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Create a resolver rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory relative paths are joined onto
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve `input` without checking that it exists
    ///
    /// `~/` is expanded to the home directory; other relative paths are
    /// joined onto the base directory.
    pub fn resolve(&self, input: &str) -> PathBuf {
        let expanded = shellexpand::tilde(input.trim());
        let path = Path::new(expanded.as_ref());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Resolve `input` and fail if nothing exists there
    pub fn resolve_existing(&self, input: &str) -> DataResult<PathBuf> {
        let path = self.resolve(input);
        if !path.exists() {
            return Err(DataError::FileNotFound(path));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_paths_join_base() {
        let resolver = PathResolver::new("/data/sheets");
        assert_eq!(
            resolver.resolve("q1/sales.xlsx"),
            PathBuf::from("/data/sheets/q1/sales.xlsx")
        );
        assert_eq!(resolver.resolve("/abs/x.xlsx"), PathBuf::from("/abs/x.xlsx"));
    }

    #[test]
    fn test_missing_file_error_names_resolved_path() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp_dir.path());
        let err = resolver.resolve_existing("nope.xlsx").unwrap_err();
        let expected = temp_dir.path().join("nope.xlsx");
        assert_eq!(
            err.to_string(),
            format!("File '{}' does not exist.", expected.display())
        );
    }

    #[test]
    fn test_existing_file_resolves() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.xlsx"), b"x").unwrap();
        let resolver = PathResolver::new(temp_dir.path());
        assert!(resolver.resolve_existing("a.xlsx").is_ok());
    }
}
