//! File size classification

use crate::error::DataResult;
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Loading strategy class of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Loaded in full
    Standard,
    /// Loaded with capped previews and columnar processing
    Large,
}

impl SizeClass {
    /// Classify `bytes`; files strictly above `threshold_mb` are large
    pub fn from_bytes(bytes: u64, threshold_mb: u64) -> Self {
        if bytes as f64 / BYTES_PER_MB > threshold_mb as f64 {
            SizeClass::Large
        } else {
            SizeClass::Standard
        }
    }

    /// Whether this is the large-file class
    pub fn is_large(self) -> bool {
        self == SizeClass::Large
    }
}

/// Size of a file together with its class
#[derive(Debug, Clone, Copy)]
pub struct SizeInfo {
    /// Size on disk
    pub bytes: u64,
    /// Strategy class
    pub class: SizeClass,
}

impl SizeInfo {
    /// Stat `path` and classify it
    pub fn of(path: &Path, threshold_mb: u64) -> DataResult<Self> {
        let bytes = std::fs::metadata(path)?.len();
        Ok(Self {
            bytes,
            class: SizeClass::from_bytes(bytes, threshold_mb),
        })
    }

    /// Size in megabytes
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / BYTES_PER_MB
    }

    /// Whether the file is above `threshold_mb`
    pub fn exceeds_mb(&self, threshold_mb: u64) -> bool {
        self.megabytes() > threshold_mb as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let fifty_mb = 50 * 1024 * 1024;
        assert_eq!(SizeClass::from_bytes(fifty_mb, 50), SizeClass::Standard);
        assert_eq!(SizeClass::from_bytes(fifty_mb + 1, 50), SizeClass::Large);
    }

    #[test]
    fn test_zero_threshold_forces_large() {
        assert!(SizeClass::from_bytes(1, 0).is_large());
        assert!(!SizeClass::from_bytes(0, 0).is_large());
    }
}
