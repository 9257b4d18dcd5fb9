//! # Parameter Summary
//!
//! Lists the parameters whose live values differ from the schema defaults,
//! grouped like the help output and preceded by a group of core run
//! metadata.
//!
//! A default may name a runtime location with a placeholder token:
//! `$projectDir` / `${projectDir}` for the pipeline root and
//! `$params.outdir` / `${params.outdir}` for the output directory. Tokens are
//! replaced with their live values before the comparison, so a default of
//! `${params.outdir}/pipeline_info` matches a live `results/pipeline_info`
//! when `--outdir results` was supplied.

use std::path::Path;

use pipeval_core::{Palette, ParamSet, ParamValue, PipevalError, ValidationConfig};
use pipeval_schema::{resolve_schema_path, ParameterGroup, SchemaDocument, SchemaIndex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layout::{dashed_line, pad_right};

/// Title of the metadata group placed before the schema groups.
pub const CORE_GROUP_TITLE: &str = "Core pipeline options";

const PROJECT_DIR_TOKENS: [&str; 2] = ["${projectDir}", "$projectDir"];
const OUTDIR_TOKENS: [&str; 2] = ["${params.outdir}", "$params.outdir"];

/// Facts about the current run shown in the core group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowMetadata {
    /// Pipeline revision, when launched from a tagged or branched checkout.
    pub revision: Option<String>,
    /// Run name.
    pub run_name: String,
    /// Container engine, when one is enabled.
    pub container_engine: Option<String>,
    /// Container image, when one is configured.
    pub container: Option<String>,
    /// Configuration files that were applied.
    pub config_files: Vec<String>,
    /// Directory the run was launched from.
    pub launch_dir: String,
    /// Work directory.
    pub work_dir: String,
    /// Pipeline root.
    pub project_dir: String,
    /// User who launched the run.
    pub user_name: String,
    /// Active configuration profile.
    pub profile: String,
}

impl WorkflowMetadata {
    /// Entries of the core group, in display order. Optional facts appear
    /// only when set.
    pub fn core_entries(&self) -> Vec<(String, ParamValue)> {
        let mut entries = Vec::new();
        let mut push =
            |name: &str, value: &str| entries.push((name.to_string(), ParamValue::from(value)));
        if let Some(revision) = &self.revision {
            push("revision", revision);
        }
        push("runName", &self.run_name);
        if let Some(engine) = &self.container_engine {
            push("containerEngine", engine);
        }
        if let Some(container) = &self.container {
            push("container", container);
        }
        push("launchDir", &self.launch_dir);
        push("workDir", &self.work_dir);
        push("projectDir", &self.project_dir);
        push("userName", &self.user_name);
        push("profile", &self.profile);
        push("configFiles", &self.config_files.join(", "));
        entries
    }
}

/// One titled group of summary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryGroup {
    /// Group title.
    pub title: String,
    /// Parameter name and live value, in schema order.
    pub entries: Vec<(String, ParamValue)>,
}

/// Ordered mapping group title → (parameter → live value).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamsSummary {
    /// Groups in display order; groups may be empty.
    pub groups: Vec<SummaryGroup>,
}

impl ParamsSummary {
    /// Look up a group by title.
    pub fn group(&self, title: &str) -> Option<&SummaryGroup> {
        self.groups.iter().find(|g| g.title == title)
    }

    /// Widest parameter name across all groups.
    pub fn max_name_width(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Nested JSON object, group order and entry order preserved.
    pub fn to_json(&self) -> Value {
        let groups: Map<String, Value> = self
            .groups
            .iter()
            .map(|g| {
                let entries: Map<String, Value> = g
                    .entries
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect();
                (g.title.clone(), Value::Object(entries))
            })
            .collect();
        Value::Object(groups)
    }
}

/// Live values used to resolve placeholder tokens in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryContext {
    /// Pipeline root.
    pub project_dir: String,
    /// Resolved output directory.
    pub outdir: Option<String>,
}

impl SummaryContext {
    /// Context with the output directory taken from the live `outdir` param.
    pub fn new(project_dir: impl Into<String>, live: &ParamSet) -> Self {
        Self {
            project_dir: project_dir.into(),
            outdir: live.get("outdir").map(ToString::to_string),
        }
    }

    fn resolve(&self, default: &str) -> String {
        let mut resolved = default.to_string();
        for token in PROJECT_DIR_TOKENS {
            resolved = resolved.replace(token, &self.project_dir);
        }
        if let Some(outdir) = &self.outdir {
            for token in OUTDIR_TOKENS {
                resolved = resolved.replace(token, outdir);
            }
        }
        resolved
    }
}

fn as_number(value: &ParamValue) -> Option<f64> {
    match value {
        ParamValue::Integer(n) => Some(*n as f64),
        ParamValue::Float(n) => Some(*n),
        _ => None,
    }
}

/// True when the live value belongs in the summary.
///
/// Numbers compare by value, so a default of `1.0` matches a live `1`.
/// Everything else compares as text.
fn differs_from_default(
    live: &ParamValue,
    default: Option<&Value>,
    context: &SummaryContext,
) -> bool {
    match default {
        None | Some(Value::Null) => !live.is_default_false(),
        Some(Value::String(raw)) => context.resolve(raw) != live.to_string(),
        Some(Value::Number(number)) => match (number.as_f64(), as_number(live)) {
            (Some(default), Some(live)) => default != live,
            _ => number.to_string() != live.to_string(),
        },
        Some(other) => ParamValue::from_json(other).to_string() != live.to_string(),
    }
}

/// Select, per schema group, the supplied parameters whose live value
/// differs from the declared default. Groups keep schema order and may come
/// out empty.
pub fn render_summary(
    groups: &[ParameterGroup],
    live: &ParamSet,
    context: &SummaryContext,
) -> ParamsSummary {
    let groups = groups
        .iter()
        .map(|group| SummaryGroup {
            title: group.title.clone(),
            entries: group
                .properties
                .iter()
                .filter_map(|(name, descriptor)| {
                    let value = live.get(name)?;
                    differs_from_default(value, descriptor.default.as_ref(), context)
                        .then(|| (name.clone(), value.clone()))
                })
                .collect(),
        })
        .collect();
    ParamsSummary { groups }
}

/// Summary with the [`CORE_GROUP_TITLE`] group prepended.
pub fn summary_with_metadata(
    groups: &[ParameterGroup],
    live: &ParamSet,
    metadata: &WorkflowMetadata,
) -> ParamsSummary {
    let context = SummaryContext::new(metadata.project_dir.clone(), live);
    let mut summary = render_summary(groups, live, &context);
    summary.groups.insert(
        0,
        SummaryGroup {
            title: CORE_GROUP_TITLE.to_string(),
            entries: metadata.core_entries(),
        },
    );
    summary
}

/// Text form of a summary: non-empty groups with aligned `name: value`
/// lines, then the footer.
pub fn render_summary_text(summary: &ParamsSummary, palette: &Palette) -> String {
    let max_chars = summary.max_name_width() + 1;
    let mut output = String::new();
    for group in summary.groups.iter().filter(|g| !g.entries.is_empty()) {
        output.push_str(&format!("{}{}{}\n", palette.bold(), group.title, palette.reset()));
        for (name, value) in &group.entries {
            output.push_str(&format!(
                "  {}{}{}: {}{}{}\n",
                palette.blue(),
                pad_right(name, max_chars),
                palette.reset(),
                palette.green(),
                value,
                palette.reset()
            ));
        }
        output.push('\n');
    }
    output.push_str(&dashed_line(palette));
    output.push_str(&format!(
        "\n{}!! Only displaying parameters that differ from the pipeline defaults !!{}\n",
        palette.dim(),
        palette.reset()
    ));
    output.push_str(&dashed_line(palette));
    output
}

/// Load the pipeline schema and build the summary of `live`.
///
/// # Errors
///
/// Returns [`PipevalError::SchemaParse`] if the schema cannot be loaded.
pub fn params_summary_map(
    metadata: &WorkflowMetadata,
    config: &ValidationConfig,
    base_dir: &Path,
    live: &ParamSet,
) -> Result<ParamsSummary, PipevalError> {
    let document = SchemaDocument::load(&resolve_schema_path(base_dir, &config.schema_filename))?;
    let index = SchemaIndex::build(&document);
    let summary = summary_with_metadata(&index.groups, live, metadata);
    tracing::debug!(
        differing = summary.groups.iter().skip(1).map(|g| g.entries.len()).sum::<usize>(),
        "built parameter summary"
    );
    Ok(summary)
}

/// Load the pipeline schema and render the summary of `live` as text.
///
/// # Errors
///
/// Returns [`PipevalError::SchemaParse`] if the schema cannot be loaded.
pub fn params_summary_log(
    metadata: &WorkflowMetadata,
    config: &ValidationConfig,
    base_dir: &Path,
    live: &ParamSet,
) -> Result<String, PipevalError> {
    let summary = params_summary_map(metadata, config, base_dir, live)?;
    Ok(render_summary_text(&summary, &config.palette()))
}
