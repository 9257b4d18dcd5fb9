//! # Samplesheet Subcommand
//!
//! Converts the samplesheet bound to a parameter and prints each record as
//! one JSON line.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use pipeval_samplesheet::{from_samplesheet, JsonSamplesheetConverter, SampleEvent};
use pipeval_schema::{resolve_schema_path, SchemaDocument};

use crate::pipeline::PipelineArgs;

/// Arguments for the `pipeval samplesheet` subcommand.
#[derive(Args, Debug)]
pub struct SamplesheetArgs {
    /// Parameter holding the samplesheet path.
    #[arg(long, value_name = "NAME", default_value = "input")]
    pub param: String,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Execute the samplesheet subcommand, writing records to `out`.
pub fn run_samplesheet_to(args: &SamplesheetArgs, out: &mut dyn Write) -> Result<u8> {
    let pipeline = args.pipeline.load()?;
    let schema_path = resolve_schema_path(&pipeline.base_dir, &pipeline.config.schema_filename);
    let document = SchemaDocument::load(&schema_path)?;

    let mut rx = from_samplesheet(
        &args.param,
        &document,
        &pipeline.params,
        &pipeline.base_dir,
        &JsonSamplesheetConverter::default(),
    )?;

    let mut records = 0usize;
    while let Some(event) = rx.blocking_recv() {
        match event {
            SampleEvent::Record(record) => {
                writeln!(out, "{}", serde_json::to_string(&record)?).context("writing record")?;
                records += 1;
            }
            SampleEvent::Stop => break,
        }
    }
    tracing::info!(param = %args.param, records, "samplesheet streamed");
    Ok(0)
}

/// Execute the samplesheet subcommand, writing records to stdout.
pub fn run_samplesheet(args: &SamplesheetArgs) -> Result<u8> {
    run_samplesheet_to(args, &mut std::io::stdout().lock())
}
