//! Check fixture discovery and loading
//!
//! ```json
//! {
//!   "checks": [
//!     {
//!       "id": "svc-001",
//!       "description": "telnet is not running",
//!       "comparator": {"type": "list", "match_any_if_keyvalue_matches": {...}},
//!       "actual": [{"name": "telnet", "running": false}]
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Fixture loading errors
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to read fixture '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fixture '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to walk directory '{path}': {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("Path is neither a fixture file nor a directory: {0}")]
    InvalidPath(String),
}

/// One check: a comparator rule plus the actual value already collected for it
#[derive(Debug, Clone, Deserialize)]
pub struct Check {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    pub comparator: Value,

    #[serde(default)]
    pub actual: Value,
}

/// Contents of one fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub checks: Vec<Check>,
}

impl Fixture {
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Find fixture files: `path` itself, or every `*.json` below it in sorted order
pub fn discover(path: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(FixtureError::InvalidPath(path.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|source| FixtureError::Walk {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = entry.path().extension().and_then(|e| e.to_str()) == Some("json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FIXTURE: &str = r#"{
        "checks": [
            {"id": "a", "comparator": {"type": "number", "match": 1}, "actual": 1},
            {"id": "b", "description": "no actual", "comparator": {"type": "list", "size": 0}}
        ]
    }"#;

    #[test]
    fn test_load_fixture() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("checks.json");
        fs::write(&path, FIXTURE).unwrap();

        let fixture = Fixture::from_file(&path).unwrap();
        assert_eq!(fixture.checks.len(), 2);
        assert_eq!(fixture.checks[1].description.as_deref(), Some("no actual"));
        assert!(fixture.checks[1].actual.is_null());
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{checks: ").unwrap();

        assert!(matches!(Fixture::from_file(&path), Err(FixtureError::Parse { .. })));
    }

    #[test]
    fn test_discover_walks_recursively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.json"), FIXTURE).unwrap();
        fs::write(dir.path().join("nested").join("a.json"), FIXTURE).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = discover(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "json"));
    }

    #[test]
    fn test_discover_missing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(discover(&missing), Err(FixtureError::InvalidPath(_))));
    }
}
