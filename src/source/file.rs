//! File-based snapshot provider.
//!
//! Reads a JSON file of unit telemetry on every load. Unlike a
//! change-detecting viewer, the monitor wants the current snapshot each tick
//! even when the file is unchanged, because dwell state is time-dependent.

use std::fs;
use std::path::{Path, PathBuf};

use super::{FleetSnapshot, SnapshotProvider, SourceError};

/// A provider that reads fleet snapshots from a JSON file.
#[derive(Debug)]
pub struct FileProvider {
    path: PathBuf,
    description: String,
}

impl FileProvider {
    /// Create a new file provider for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotProvider for FileProvider {
    fn load(&mut self) -> Result<FleetSnapshot, SourceError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SourceError::Malformed(e.to_string()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "U-7": {
                "velocidad": 62.0,
                "chofer": "Marta Ruiz",
                "tiempo_detenido": "0m",
                "referencia": "Libramiento norte"
            }
        }"#
    }

    #[test]
    fn test_file_provider_new() {
        let provider = FileProvider::new("/tmp/unidades.json");
        assert_eq!(provider.path(), Path::new("/tmp/unidades.json"));
        assert_eq!(provider.description(), "file: /tmp/unidades.json");
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut provider = FileProvider::new(file.path());
        let snapshot = provider.load().unwrap();
        assert!(snapshot.contains_key("U-7"));

        // Subsequent loads return the current content again
        let snapshot2 = provider.load().unwrap();
        assert_eq!(snapshot2.len(), 1);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let mut provider = FileProvider::new("/nonexistent/path/unidades.json");
        match provider.load() {
            Err(SourceError::Unavailable(_)) => {}
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut provider = FileProvider::new(file.path());
        match provider.load() {
            Err(SourceError::Malformed(_)) => {}
            other => panic!("expected Malformed, got {other:?}"),
        }
    }
}
