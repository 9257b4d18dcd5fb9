//! # Help Subcommand
//!
//! Prints the pipeline help screen, or the detail view of one parameter.

use anyhow::{Context, Result};
use clap::Args;

use pipeval_help::{help_target, params_help};

use crate::pipeline::PipelineArgs;

/// Command line shown at the top of the help screen when none is given.
pub const DEFAULT_COMMAND: &str = "nextflow run <pipeline> \
    -profile <docker/singularity/.../institute> \
    --input samplesheet.csv --outdir <OUTDIR>";

/// Arguments for the `pipeval help` subcommand.
#[derive(Args, Debug)]
pub struct HelpArgs {
    /// Typical pipeline command shown above the parameter listing.
    #[arg(long, default_value = DEFAULT_COMMAND)]
    pub command: String,

    /// Show the detail view of a single parameter.
    #[arg(long, value_name = "NAME")]
    pub param: Option<String>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Execute the help subcommand.
///
/// `--param` wins over a string-valued `--help` among the pipeline
/// parameters.
pub fn run_help(args: &HelpArgs) -> Result<u8> {
    let pipeline = args.pipeline.load()?;
    let target = args.param.as_deref().or_else(|| help_target(&pipeline.params));
    let output = params_help(&args.command, &pipeline.config, &pipeline.base_dir, target)
        .context("rendering help")?;
    println!("{output}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_param_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("nextflow_schema.json"),
            r#"{"properties": {"outdir": {"type": "string"}}}"#,
        )
        .unwrap();
        let args = HelpArgs {
            command: DEFAULT_COMMAND.to_string(),
            param: Some("nope".to_string()),
            pipeline: PipelineArgs {
                base_dir: Some(dir.path().to_path_buf()),
                ..PipelineArgs::default()
            },
        };
        let err = run_help(&args).unwrap_err();
        assert!(format!("{err:#}").contains("'nope'"));

        let args = HelpArgs { param: None, ..args };
        assert_eq!(run_help(&args).unwrap(), 0);
    }
}
