use thiserror::Error;

/// Failure inside a [`crate::SamplesheetConverter`].
#[derive(Error, Debug)]
pub enum ConverterError {
    /// The samplesheet or its schema could not be read.
    #[error("cannot read {path}: {reason}")]
    Read {
        /// File that failed.
        path: String,
        /// Underlying reason.
        reason: String,
    },

    /// The file is not well-formed or has the wrong shape.
    #[error("cannot parse {path}: {reason}")]
    Parse {
        /// File that failed.
        path: String,
        /// Underlying reason.
        reason: String,
    },

    /// A row does not conform to the samplesheet schema.
    #[error("row {row} of {path} is invalid:\n{reason}")]
    InvalidRow {
        /// Samplesheet path.
        path: String,
        /// One-based row number.
        row: usize,
        /// Rendered violations.
        reason: String,
    },

    /// The samplesheet schema could not be compiled.
    #[error("invalid samplesheet schema {path}: {reason}")]
    Schema {
        /// Schema path.
        path: String,
        /// Underlying reason.
        reason: String,
    },
}
