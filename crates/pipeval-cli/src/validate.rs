//! # Validate Subcommand
//!
//! Reconciles and validates the supplied parameters against the pipeline
//! schema. Warnings are logged; errors are printed as one block and give
//! exit code 1.

use anyhow::Result;
use clap::Args;

use pipeval_core::PipevalError;
use pipeval_schema::validate_parameters;

use crate::pipeline::PipelineArgs;

/// Arguments for the `pipeval validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the parameters are valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let pipeline = args.pipeline.load()?;

    match validate_parameters(&pipeline.params, &pipeline.config, &pipeline.base_dir) {
        Ok(outcome) => {
            println!(
                "Parameters valid: {} supplied, {} warning(s)",
                pipeline.params.len(),
                outcome.warnings.len()
            );
            Ok(0)
        }
        Err(PipevalError::ValidationFailed { message, .. }) => {
            eprint!("{message}");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
