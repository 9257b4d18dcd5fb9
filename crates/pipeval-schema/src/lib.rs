//! # pipeval-schema: Schema Index, Reconciliation & Validation
//!
//! Turns a parameter schema document into a grouped model and checks
//! supplied parameters against it.
//!
//! ## Pipeline
//!
//! 1. [`SchemaDocument::load`] reads the document; [`SchemaIndex::build`]
//!    indexes it into ordered [`ParameterGroup`]s, the expected name set and
//!    the enum index.
//! 2. [`reconcile`] classifies every supplied name (reserved misuse, near
//!    miss, recognized, unrecognized).
//! 3. [`ParameterValidator::validate`] evaluates the cleaned values with the
//!    `jsonschema` engine plus the custom [`FormatEvaluator`]s.
//!
//! [`validate_parameters`] runs all three and fails once with every
//! accumulated error.
//!
//! ## Crate Policy
//!
//! - Depends only on `pipeval-core` internally.
//! - The `jsonschema` engine is a black box: no `$ref` resolution or draft
//!   negotiation happens here.

pub mod formats;
pub mod index;
pub mod outcome;
pub mod params;
pub mod reconcile;
pub mod validate;

pub use formats::{
    DirectoryPathEvaluator, FilePathEvaluator, FormatEvaluator, FormatRegistry, PathEvaluator,
};
pub use index::{
    lookup, resolve_schema_path, EnumIndex, ParameterGroup, PropertyDescriptor, SchemaDocument,
    SchemaIndex, UNGROUPED_TITLE,
};
pub use outcome::ValidationOutcome;
pub use params::{validate_parameters, validate_parameters_with};
pub use reconcile::{
    classify, classify_name, normalize_name, reconcile, Classification, ExpectedParams,
    BUILTIN_PARAMS, RESERVED_OPTIONS,
};
pub use validate::{
    available_choices, ParameterValidator, SchemaValidationError, ValidationViolations, Violation,
    ViolationKind, ENUM_CHOICE_LIMIT,
};
