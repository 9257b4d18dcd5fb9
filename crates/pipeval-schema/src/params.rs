//! # Validation Entrypoint
//!
//! Drives one full pass over the supplied parameters: load the schema,
//! reconcile names, validate values. Findings accumulate over the whole pass
//! and the pass fails once at the end if any error was recorded.

use std::path::Path;

use pipeval_core::{ParamSet, PipevalError, ValidationConfig};

use crate::index::{resolve_schema_path, SchemaDocument, SchemaIndex};
use crate::outcome::ValidationOutcome;
use crate::reconcile::{reconcile, ExpectedParams};
use crate::validate::ParameterValidator;

/// Validate supplied parameters with the default format evaluators.
///
/// See [`validate_parameters_with`].
///
/// # Errors
///
/// Returns [`PipevalError::ValidationFailed`] when any error was recorded.
pub fn validate_parameters(
    params: &ParamSet,
    config: &ValidationConfig,
    base_dir: &Path,
) -> Result<ValidationOutcome, PipevalError> {
    validate_parameters_with(params, config, base_dir, &ParameterValidator::default())
}

/// Validate supplied parameters against the schema at
/// `base_dir/config.schema_filename`.
///
/// Warnings are logged and returned on success. A schema that cannot be
/// loaded is recorded as an error and skips the remaining steps.
///
/// # Errors
///
/// Returns [`PipevalError::ValidationFailed`] carrying every recorded error
/// and the colorized failure banner as its message.
pub fn validate_parameters_with(
    params: &ParamSet,
    config: &ValidationConfig,
    base_dir: &Path,
    validator: &ParameterValidator,
) -> Result<ValidationOutcome, PipevalError> {
    let mut outcome = ValidationOutcome::new();
    let schema_path = resolve_schema_path(base_dir, &config.schema_filename);

    match SchemaDocument::load(&schema_path) {
        Ok(document) => {
            let index = SchemaIndex::build(&document);
            let expected = ExpectedParams::new(&index, &config.ignore_params);
            reconcile(params, &expected, config, &mut outcome);
            match validator.validate(params, &document, &index.enums) {
                Ok(messages) => outcome.errors.extend(messages),
                Err(e) => outcome.error(format!("* {e}")),
            }
        }
        Err(e) => outcome.error(format!("* {e}")),
    }

    let palette = config.palette();
    if !outcome.warnings.is_empty() {
        tracing::warn!(
            "{}The following invalid input values have been detected:\n\n{}\n\n{}",
            palette.yellow(),
            outcome.warnings.join("\n"),
            palette.reset()
        );
    }

    if !outcome.is_ok() {
        let message = format!(
            "{}The following invalid input values have been detected:\n\n{}\n{}\n",
            palette.red(),
            outcome.errors.join("\n"),
            palette.reset()
        );
        tracing::error!("Validation of pipeline parameters failed!");
        return Err(PipevalError::ValidationFailed {
            message,
            errors: outcome.errors,
        });
    }

    tracing::debug!(
        params = params.len(),
        warnings = outcome.warnings.len(),
        "pipeline parameters validated"
    );
    Ok(outcome)
}
