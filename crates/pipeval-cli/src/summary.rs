//! # Summary Subcommand
//!
//! Prints the parameters that differ from the schema defaults, after the
//! core run metadata, as text or JSON.

use anyhow::{Context, Result};
use clap::Args;

use pipeval_help::{params_summary_map, render_summary_text, WorkflowMetadata};

use crate::pipeline::{Pipeline, PipelineArgs};

/// Arguments for the `pipeval summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Run name shown in the core group.
    #[arg(long, default_value = "pipeval")]
    pub run_name: String,

    /// Pipeline revision.
    #[arg(long)]
    pub revision: Option<String>,

    /// Configuration profile.
    #[arg(long, default_value = "standard")]
    pub profile: String,

    /// Container engine.
    #[arg(long)]
    pub container_engine: Option<String>,

    /// Container image.
    #[arg(long)]
    pub container: Option<String>,

    /// Work directory.
    #[arg(long, default_value = "work")]
    pub work_dir: String,

    /// Emit the summary as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl SummaryArgs {
    fn metadata(&self, pipeline: &Pipeline) -> Result<WorkflowMetadata> {
        let launch_dir = std::env::current_dir().context("cannot determine current directory")?;
        Ok(WorkflowMetadata {
            revision: self.revision.clone(),
            run_name: self.run_name.clone(),
            container_engine: self.container_engine.clone(),
            container: self.container.clone(),
            config_files: self
                .pipeline
                .config
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            launch_dir: launch_dir.display().to_string(),
            work_dir: launch_dir.join(&self.work_dir).display().to_string(),
            project_dir: pipeline.base_dir.display().to_string(),
            user_name: std::env::var("USER").unwrap_or_default(),
            profile: self.profile.clone(),
        })
    }
}

/// Execute the summary subcommand.
pub fn run_summary(args: &SummaryArgs) -> Result<u8> {
    let pipeline = args.pipeline.load()?;
    let metadata = args.metadata(&pipeline)?;
    let summary = params_summary_map(
        &metadata,
        &pipeline.config,
        &pipeline.base_dir,
        &pipeline.params,
    )
    .context("building parameter summary")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
    } else {
        println!("{}", render_summary_text(&summary, &pipeline.config.palette()));
    }
    Ok(0)
}
