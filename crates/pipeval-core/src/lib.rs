#![deny(missing_docs)]

//! # pipeval-core: Foundational Types for pipeval
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`,
//! `serde_yaml` and `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Explicit value kinds.** Parameter values are a discriminated
//!    [`ParamValue`] with named predicates ([`ParamValue::is_absent`],
//!    [`ParamValue::is_default_false`]) instead of loose truthiness. Numeric
//!    zero is a real value and is never treated as absent.
//!
//! 2. **Configuration is a value.** [`ValidationConfig`] and [`Palette`] are
//!    passed to every call that needs them. There is no process-wide mutable
//!    state controlling colors or strictness.
//!
//! 3. **[`PipevalError`] hierarchy.** Structured errors with `thiserror`, no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod palette;
pub mod value;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{
    split_comma_list, ValidationConfig, CONFIG_SWITCHES, DEFAULT_SCHEMA_FILENAME,
    DEFAULT_TERMINAL_WIDTH,
};
pub use error::PipevalError;
pub use palette::Palette;
pub use value::{clean_parameters, ParamSet, ParamValue};
