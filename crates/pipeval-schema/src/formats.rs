//! # Custom Format Evaluators
//!
//! Domain checks attached to the `format` keyword of parameter schemas.
//! Each evaluator only rejects values it can prove wrong: non-string values
//! and remote object-storage URIs (`s3://`) always pass, and so do paths
//! that do not exist yet.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

/// URI scheme whose values are never checked against the local filesystem.
const REMOTE_STORAGE_PREFIX: &str = "s3://";

/// Characters that turn a path into a glob pattern.
const GLOB_METACHARACTERS: [char; 4] = ['*', '?', '[', '{'];

/// A named check over a single JSON value.
pub trait FormatEvaluator: Send + Sync {
    /// Format name as it appears in the schema (`"format": "<name>"`).
    fn name(&self) -> &'static str;

    /// `Ok(())` when the value satisfies the format, otherwise the
    /// human-readable failure message.
    fn evaluate(&self, value: &Value) -> Result<(), String>;
}

/// Returns the local path to check, or `None` when the value is exempt.
fn local_path(value: &Value) -> Option<&str> {
    value
        .as_str()
        .filter(|s| !s.starts_with(REMOTE_STORAGE_PREFIX))
}

fn is_glob(raw: &str) -> bool {
    raw.contains(&GLOB_METACHARACTERS[..])
}

/// `directory-path`: rejects values naming an existing non-directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryPathEvaluator;

impl FormatEvaluator for DirectoryPathEvaluator {
    fn name(&self) -> &'static str {
        "directory-path"
    }

    fn evaluate(&self, value: &Value) -> Result<(), String> {
        let Some(raw) = local_path(value) else {
            return Ok(());
        };
        let path = Path::new(raw);
        if path.exists() && !path.is_dir() {
            return Err(format!("'{raw}' is not a directory, but a file"));
        }
        Ok(())
    }
}

/// `file-path`: rejects glob patterns and existing directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePathEvaluator;

impl FormatEvaluator for FilePathEvaluator {
    fn name(&self) -> &'static str {
        "file-path"
    }

    fn evaluate(&self, value: &Value) -> Result<(), String> {
        let Some(raw) = local_path(value) else {
            return Ok(());
        };
        if is_glob(raw) {
            return Err(format!("'{raw}' is not a file, but a file path pattern"));
        }
        if Path::new(raw).is_dir() {
            return Err(format!("'{raw}' is not a file, but a directory"));
        }
        Ok(())
    }
}

/// `path`: rejects glob patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEvaluator;

impl FormatEvaluator for PathEvaluator {
    fn name(&self) -> &'static str {
        "path"
    }

    fn evaluate(&self, value: &Value) -> Result<(), String> {
        match local_path(value) {
            Some(raw) if is_glob(raw) => {
                Err(format!("'{raw}' is not a path, but a file path pattern"))
            }
            _ => Ok(()),
        }
    }
}

/// The set of evaluators attached to a validator.
///
/// Registering a second evaluator under an existing name replaces the first.
#[derive(Clone)]
pub struct FormatRegistry {
    evaluators: Vec<Arc<dyn FormatEvaluator>>,
}

impl FormatRegistry {
    /// An empty registry; formats fall back to the engine's built-ins.
    pub fn empty() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    /// Add or replace an evaluator.
    pub fn register(&mut self, evaluator: impl FormatEvaluator + 'static) {
        self.evaluators.retain(|e| e.name() != evaluator.name());
        self.evaluators.push(Arc::new(evaluator));
    }

    /// Look up an evaluator by format name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn FormatEvaluator>> {
        self.evaluators.iter().find(|e| e.name() == name)
    }

    /// Registered evaluators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FormatEvaluator>> {
        self.evaluators.iter()
    }

    /// Number of registered evaluators.
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

impl Default for FormatRegistry {
    /// The path evaluators: `directory-path`, `file-path`, `path`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(DirectoryPathEvaluator);
        registry.register(FilePathEvaluator);
        registry.register(PathEvaluator);
        registry
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.evaluators.iter().map(|e| e.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_value(path: &Path) -> Value {
        Value::String(path.display().to_string())
    }

    #[test]
    fn directory_path_rejects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("reads.fastq");
        std::fs::write(&file, "@r1").unwrap();

        let err = DirectoryPathEvaluator.evaluate(&as_value(&file)).unwrap_err();
        assert!(err.contains("is not a directory, but a file"), "{err}");
        assert!(DirectoryPathEvaluator.evaluate(&as_value(dir.path())).is_ok());
    }

    #[test]
    fn directory_path_accepts_missing_remote_and_non_strings() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-created-yet");
        assert!(DirectoryPathEvaluator.evaluate(&as_value(&missing)).is_ok());
        assert!(DirectoryPathEvaluator
            .evaluate(&json!("s3://bucket/key"))
            .is_ok());
        assert!(DirectoryPathEvaluator.evaluate(&json!(42)).is_ok());
        assert!(DirectoryPathEvaluator.evaluate(&Value::Null).is_ok());
    }

    #[test]
    fn file_path_rejects_globs_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = FilePathEvaluator.evaluate(&json!("data/*.csv")).unwrap_err();
        assert_eq!(err, "'data/*.csv' is not a file, but a file path pattern");

        let err = FilePathEvaluator.evaluate(&as_value(dir.path())).unwrap_err();
        assert!(err.ends_with("is not a file, but a directory"), "{err}");

        let file = dir.path().join("samples.csv");
        std::fs::write(&file, "sample\n").unwrap();
        assert!(FilePathEvaluator.evaluate(&as_value(&file)).is_ok());
        assert!(FilePathEvaluator.evaluate(&json!("s3://bucket/*.csv")).is_ok());
    }

    #[test]
    fn path_rejects_only_globs() {
        assert!(PathEvaluator.evaluate(&json!("results/{a,b}")).is_err());
        assert!(PathEvaluator.evaluate(&json!("results/run1")).is_ok());
        assert!(PathEvaluator.evaluate(&json!(true)).is_ok());
    }

    #[test]
    fn default_registry_has_path_formats() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.len(), 3);
        for name in ["directory-path", "file-path", "path"] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert!(FormatRegistry::empty().is_empty());
    }

    #[test]
    fn register_replaces_same_name() {
        struct Never;
        impl FormatEvaluator for Never {
            fn name(&self) -> &'static str {
                "path"
            }
            fn evaluate(&self, _: &Value) -> Result<(), String> {
                Err("never".to_string())
            }
        }

        let mut registry = FormatRegistry::default();
        registry.register(Never);
        assert_eq!(registry.len(), 3);
        let path = registry.get("path").unwrap();
        assert_eq!(path.evaluate(&json!("x")), Err("never".to_string()));
    }
}
