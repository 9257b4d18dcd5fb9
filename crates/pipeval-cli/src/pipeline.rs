//! Arguments shared by every subcommand: where the pipeline lives, which
//! schema and configuration to use, and the supplied parameters.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pipeval_core::{split_comma_list, ParamSet, ValidationConfig};

/// Pipeline location, configuration overrides and supplied parameters.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Pipeline base directory; relative schema paths resolve against it.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Parameter schema (defaults to nextflow_schema.json in the base directory).
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// JSON or YAML file of parameter values.
    #[arg(long, value_name = "FILE")]
    pub params_file: Option<PathBuf>,

    /// Validation config file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Treat unrecognised parameters as errors.
    #[arg(long)]
    pub strict: bool,

    /// Disable ANSI colors.
    #[arg(long)]
    pub monochrome: bool,

    /// Comma-separated parameter names to accept without a schema entry.
    #[arg(long, value_name = "NAMES")]
    pub ignore: Option<String>,

    /// Show hidden parameters in help output.
    #[arg(long)]
    pub show_hidden: bool,

    /// Terminal width for help layout.
    #[arg(long, value_name = "COLUMNS")]
    pub terminal_width: Option<usize>,

    /// Pipeline parameters, e.g. `-- --input samples.csv --outdir results`.
    #[arg(last = true, value_name = "PARAMS")]
    pub params: Vec<String>,
}

/// Everything a subcommand needs, resolved from [`PipelineArgs`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline base directory.
    pub base_dir: PathBuf,
    /// Effective configuration.
    pub config: ValidationConfig,
    /// Supplied parameters: params file first, command-line values on top.
    pub params: ParamSet,
}

impl PipelineArgs {
    /// Resolve the base directory, parameters and layered configuration.
    ///
    /// Configuration comes from `--config` when given, otherwise from the
    /// engine switches among the supplied parameters; command-line flags
    /// override either.
    pub fn load(&self) -> Result<Pipeline> {
        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        let mut params = match &self.params_file {
            Some(path) => {
                let path = crate::resolve_path(path, &base_dir);
                ParamSet::load(&path)
                    .with_context(|| format!("loading parameters from {}", path.display()))?
            }
            None => ParamSet::new(),
        };
        let cli_params =
            ParamSet::parse_cli_args(&self.params).context("parsing pipeline parameters")?;
        params.merge(cli_params);

        let mut config = match &self.config {
            Some(path) => {
                let path = crate::resolve_path(path, &base_dir);
                ValidationConfig::load(&path)
                    .with_context(|| format!("loading config from {}", path.display()))?
            }
            None => ValidationConfig::from_params(&params),
        };
        self.apply_overrides(&mut config, &base_dir)?;

        tracing::debug!(
            base_dir = %base_dir.display(),
            schema = %config.schema_filename,
            params = params.len(),
            "resolved pipeline"
        );
        Ok(Pipeline {
            base_dir,
            config,
            params,
        })
    }

    fn apply_overrides(&self, config: &mut ValidationConfig, base_dir: &Path) -> Result<()> {
        if let Some(schema) = &self.schema {
            let resolved = crate::resolve_path(schema, base_dir);
            let absolute = if resolved.is_absolute() {
                resolved
            } else {
                std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(resolved)
            };
            config.schema_filename = absolute.display().to_string();
        }
        if let Some(ignore) = &self.ignore {
            config.ignore_params.extend(split_comma_list(ignore));
        }
        if let Some(width) = self.terminal_width {
            config.terminal_width = width;
        }
        config.fail_unrecognised |= self.strict;
        config.monochrome |= self.monochrome;
        config.show_hidden |= self.show_hidden;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(dir: &Path) -> PipelineArgs {
        PipelineArgs {
            base_dir: Some(dir.to_path_buf()),
            ..PipelineArgs::default()
        }
    }

    #[test]
    fn cli_values_override_params_file() {
        let dir = tempfile::tempdir().unwrap();
        let params_file = dir.path().join("params.yaml");
        std::fs::write(params_file, "outdir: from_file\ninput: a.csv\n").unwrap();
        let args = PipelineArgs {
            params_file: Some(PathBuf::from("params.yaml")),
            params: vec!["--outdir".into(), "from_cli".into()],
            ..args_for(dir.path())
        };
        let pipeline = args.load().unwrap();
        assert_eq!(pipeline.params.get("outdir").unwrap().to_string(), "from_cli");
        assert_eq!(pipeline.params.get("input").unwrap().to_string(), "a.csv");
    }

    #[test]
    fn config_comes_from_params_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let args = PipelineArgs {
            params: vec!["--validationSchemaIgnoreParams".into(), "genomes".into()],
            ignore: Some("igenomes_base".into()),
            strict: true,
            ..args_for(dir.path())
        };
        let pipeline = args.load().unwrap();
        assert!(pipeline.config.fail_unrecognised);
        assert_eq!(pipeline.config.ignore_params, vec!["genomes", "igenomes_base"]);
    }

    #[test]
    fn config_file_is_used_when_given() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pipeval.yaml"),
            "schema_filename: custom.json\nmonochrome: true\n",
        )
        .unwrap();
        let args = PipelineArgs {
            config: Some(PathBuf::from("pipeval.yaml")),
            ..args_for(dir.path())
        };
        let pipeline = args.load().unwrap();
        assert_eq!(pipeline.config.schema_filename, "custom.json");
        assert!(pipeline.config.monochrome);
    }

    #[test]
    fn schema_flag_becomes_absolute() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema.json"), "{}").unwrap();
        let args = PipelineArgs {
            schema: Some(PathBuf::from("schema.json")),
            ..args_for(dir.path())
        };
        let pipeline = args.load().unwrap();
        assert_eq!(
            PathBuf::from(&pipeline.config.schema_filename),
            dir.path().join("schema.json")
        );
    }
}
