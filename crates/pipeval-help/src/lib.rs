//! # pipeval-help: Help & Summary Rendering
//!
//! Renders operator-facing text from the grouped parameter model built by
//! `pipeval-schema`:
//!
//! - [`params_help`]: the `--help` screen, either every visible parameter
//!   or the detail view of one.
//! - [`params_summary_map`] / [`params_summary_log`]: the parameters that
//!   differ from their schema defaults, after a core group of run metadata.
//!
//! Colors come from an explicit [`pipeval_core::Palette`]; nothing here
//! reads process-wide state.

pub mod help;
pub mod layout;
pub mod summary;

pub use help::{
    help_target, params_help, render_all_help, render_param_help, widest_type_cell,
};
pub use layout::{accepted_values, dashed_line, wrap_text, HelpLayout};
pub use summary::{
    params_summary_log, params_summary_map, render_summary, render_summary_text,
    summary_with_metadata, ParamsSummary, SummaryContext, SummaryGroup, WorkflowMetadata,
    CORE_GROUP_TITLE,
};
