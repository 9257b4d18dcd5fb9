//! # Help Rendering
//!
//! Builds the `--help` text from the grouped parameter model: either the
//! full listing of every visible parameter or the detail view of a single
//! parameter.

use std::path::Path;

use pipeval_core::{Palette, ParamSet, ParamValue, PipevalError, ValidationConfig};
use pipeval_schema::{
    resolve_schema_path, ParameterGroup, PropertyDescriptor, SchemaDocument, SchemaIndex,
};
use serde_json::Value;

use crate::layout::{
    accepted_values, dashed_line, pad_right, wrap_spans, wrap_text, HelpLayout, Span,
};

/// Width of the key column in the single-parameter view.
const FIELD_KEY_WIDTH: usize = 11;

/// Indent of continuation lines in the single-parameter view.
const FIELD_VALUE_INDENT: usize = 4 + FIELD_KEY_WIDTH + 2;

fn find<'a>(groups: &'a [ParameterGroup], name: &str) -> Option<&'a PropertyDescriptor> {
    groups.iter().rev().find_map(|g| g.get(name))
}

fn type_cell(descriptor: &PropertyDescriptor) -> String {
    format!("[{}]", descriptor.kind.as_deref().unwrap_or_default())
}

/// Widest `[type]` cell across every group, hidden parameters included.
pub fn widest_type_cell(groups: &[ParameterGroup]) -> usize {
    groups
        .iter()
        .flat_map(|g| g.properties.iter())
        .map(|(_, descriptor)| type_cell(descriptor).chars().count())
        .max()
        .unwrap_or(0)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| ParamValue::from_json(v).to_string())
            .collect::<Vec<_>>()
            .join(", "),
        other => ParamValue::from_json(other).to_string(),
    }
}

/// Detail view of one parameter: every declared field except `fa_icon`.
///
/// # Errors
///
/// Returns [`PipevalError::ParamNotFound`] if no group declares `name`.
pub fn render_param_help(
    groups: &[ParameterGroup],
    name: &str,
    layout: &HelpLayout,
    palette: &Palette,
) -> Result<String, PipevalError> {
    let descriptor =
        find(groups, name).ok_or_else(|| PipevalError::ParamNotFound(name.to_string()))?;

    let mut output = format!("--{name}\n");
    for (key, value) in descriptor.fields().filter(|(key, _)| *key != "fa_icon") {
        let text = field_text(value);
        let text = if text.chars().count() > layout.line_width {
            wrap_text(&text, layout.line_width, FIELD_VALUE_INDENT)
        } else {
            text
        };
        output.push_str(&format!(
            "    {}{}: {}{}\n",
            palette.dim(),
            pad_right(key, FIELD_KEY_WIDTH),
            palette.reset(),
            text
        ));
    }
    output.push_str(&dashed_line(palette));
    Ok(output)
}

fn description_cell(
    descriptor: &PropertyDescriptor,
    layout: &HelpLayout,
    palette: &Palette,
) -> String {
    let description = descriptor.description.as_deref().unwrap_or("");
    let mut suffix = String::new();
    if let Some(values) = &descriptor.enum_values {
        suffix.push_str(&format!(
            " (accepted: {})",
            accepted_values(values, layout.line_width)
        ));
    }
    if let Some(default) = &descriptor.default {
        suffix.push_str(&format!(" [default: {}]", ParamValue::from_json(default)));
    }

    let visible = description.chars().count() + suffix.chars().count();
    if visible > layout.line_width {
        wrap_spans(
            &[Span::plain(description), Span::dim(&suffix)],
            layout.line_width,
            palette,
        )
        .join(&format!("\n{}", " ".repeat(layout.desc_indent)))
    } else {
        format!("{description}{}{suffix}{}", palette.dim(), palette.reset())
    }
}

/// Full listing of every group with at least one visible parameter.
///
/// Hidden parameters are skipped and counted unless `show_hidden` is set.
pub fn render_all_help(
    groups: &[ParameterGroup],
    show_hidden: bool,
    layout: &HelpLayout,
    palette: &Palette,
) -> String {
    let mut output = String::new();
    let mut num_hidden = 0usize;

    for group in groups {
        let mut group_output = format!(
            "{}{}{}{}\n",
            palette.underlined(),
            palette.bold(),
            group.title,
            palette.reset()
        );
        let mut num_params = 0usize;
        for (name, descriptor) in &group.properties {
            if descriptor.hidden && !show_hidden {
                num_hidden += 1;
                continue;
            }
            let cell = type_cell(descriptor);
            let cell_width = layout.type_width.max(cell.chars().count() + 1);
            group_output.push_str(&format!(
                "  --{}{}{}{}{}\n",
                pad_right(name, layout.max_chars),
                palette.dim(),
                pad_right(&cell, cell_width),
                palette.reset(),
                description_cell(descriptor, layout, palette)
            ));
            num_params += 1;
        }
        group_output.push('\n');
        if num_params > 0 {
            output.push_str(&group_output);
        }
    }

    if num_hidden > 0 {
        output.push_str(&format!(
            "{} !! Hiding {num_hidden} params, \
             use the '--validationShowHiddenParams' option to show them !!\n{}",
            palette.dim(),
            palette.reset()
        ));
    }
    output.push_str(&dashed_line(palette));
    output
}

/// Parameter named by a string-valued `--help`, e.g. `--help outdir`.
pub fn help_target(params: &ParamSet) -> Option<&str> {
    params.get("help").and_then(ParamValue::as_str)
}

/// Complete help text for a pipeline: the typical command line followed by
/// either the detail view of `help_param` or the full listing.
///
/// # Errors
///
/// Returns [`PipevalError::SchemaParse`] if the schema cannot be loaded and
/// [`PipevalError::ParamNotFound`] for an unknown `help_param`.
pub fn params_help(
    command: &str,
    config: &ValidationConfig,
    base_dir: &Path,
    help_param: Option<&str>,
) -> Result<String, PipevalError> {
    let document = SchemaDocument::load(&resolve_schema_path(base_dir, &config.schema_filename))?;
    let index = SchemaIndex::build(&document);
    let layout = HelpLayout::new(index.max_name_width(), config.terminal_width)
        .with_type_cell(widest_type_cell(&index.groups));
    let palette = config.palette();
    tracing::debug!(groups = index.groups.len(), line_width = layout.line_width, "rendering help");

    let mut output = format!(
        "Typical pipeline command:\n\n  {}{command}{}\n\n",
        palette.cyan(),
        palette.reset()
    );
    match help_param {
        Some(name) => output.push_str(&render_param_help(&index.groups, name, &layout, &palette)?),
        None => output.push_str(&render_all_help(
            &index.groups,
            config.show_hidden,
            &layout,
            &palette,
        )),
    }
    Ok(output)
}
