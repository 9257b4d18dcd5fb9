//! # pipeval-cli: Pipeline Parameter Command-Line Interface
//!
//! Provides the `pipeval` binary on top of the library crates.
//!
//! ## Subcommands
//!
//! - `pipeval validate`: reconcile and validate supplied parameters.
//! - `pipeval help`: render the pipeline `--help` screen.
//! - `pipeval summary`: list parameters that differ from their defaults.
//! - `pipeval samplesheet`: stream samplesheet records as JSON lines.
//!
//! ```bash
//! pipeval validate --base-dir ./my-pipeline -- --input samples.csv --outdir results
//! pipeval help --base-dir ./my-pipeline --param outdir
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; behavior lives in the library crates.
//! - Every handler returns its process exit code: 0 on success, 1 on a
//!   validation failure. Operational errors propagate as `anyhow::Error`.

pub mod help;
pub mod pipeline;
pub mod samplesheet;
pub mod summary;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to the pipeline base directory.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `base_dir` resolves there; otherwise it stays relative to the current
/// directory.
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let base_relative = base_dir.join(path);
    if base_relative.exists() {
        base_relative
    } else {
        path.to_path_buf()
    }
}
