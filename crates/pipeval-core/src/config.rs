//! # Validation Configuration
//!
//! The switches that steer a validation, help or summary call. A config can
//! come from three places, applied in this order (later wins):
//!
//! 1. [`ValidationConfig::default`]
//! 2. a YAML/JSON config file ([`ValidationConfig::load`]) or the engine
//!    switches found in the live parameters ([`ValidationConfig::from_params`])
//! 3. explicit command-line flags (applied by the CLI)

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PipevalError;
use crate::palette::Palette;
use crate::value::{ParamSet, ParamValue};

/// Schema filename used when none is configured.
pub const DEFAULT_SCHEMA_FILENAME: &str = "nextflow_schema.json";

/// Terminal width assumed by the help layout.
pub const DEFAULT_TERMINAL_WIDTH: usize = 160;

const IGNORE_PARAMS_SWITCH: &str = "validationSchemaIgnoreParams";
const FAIL_UNRECOGNISED_SWITCH: &str = "validationFailUnrecognisedParams";
const SHOW_HIDDEN_SWITCH: &str = "validationShowHiddenParams";
const MONOCHROME_SWITCHES: [&str; 3] =
    ["validationMonochromeLogs", "monochromeLogs", "monochrome_logs"];

/// Every parameter name [`ValidationConfig::from_params`] reads.
pub const CONFIG_SWITCHES: [&str; 6] = [
    IGNORE_PARAMS_SWITCH,
    FAIL_UNRECOGNISED_SWITCH,
    SHOW_HIDDEN_SWITCH,
    MONOCHROME_SWITCHES[0],
    MONOCHROME_SWITCHES[1],
    MONOCHROME_SWITCHES[2],
];

/// Configuration for one validation, help or summary call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Schema document, relative to the pipeline base directory unless absolute.
    pub schema_filename: String,
    /// Promote unrecognized parameters from warnings to errors.
    pub fail_unrecognised: bool,
    /// Suppress ANSI escape codes.
    pub monochrome: bool,
    /// Parameter names accepted even though the schema does not declare them.
    #[serde(deserialize_with = "deserialize_comma_list")]
    pub ignore_params: Vec<String>,
    /// Render hidden parameters in help output.
    pub show_hidden: bool,
    /// Terminal width used to compute the help line budget.
    pub terminal_width: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            schema_filename: DEFAULT_SCHEMA_FILENAME.to_string(),
            fail_unrecognised: false,
            monochrome: false,
            ignore_params: Vec::new(),
            show_hidden: false,
            terminal_width: DEFAULT_TERMINAL_WIDTH,
        }
    }
}

impl ValidationConfig {
    /// Load a config file (`.yaml`/`.yml` → YAML, anything else → JSON).
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`PipevalError::ConfigLoad`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PipevalError> {
        let load_err = |reason: String| PipevalError::ConfigLoad {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| load_err(format!("YAML parse error: {e}"))),
            _ => serde_json::from_str(&content)
                .map_err(|e| load_err(format!("JSON parse error: {e}"))),
        }
    }

    /// Read the engine switches from the live parameter set.
    ///
    /// Recognized switches: `validationSchemaIgnoreParams` (comma-separated),
    /// `validationFailUnrecognisedParams`, `validationShowHiddenParams`, and
    /// `validationMonochromeLogs` / `monochromeLogs` / `monochrome_logs`.
    pub fn from_params(params: &ParamSet) -> Self {
        let enabled = |name: &str| params.get(name).is_some_and(|v| v.is_enabled());
        let ignore_params = match params.get(IGNORE_PARAMS_SWITCH) {
            Some(ParamValue::List(items)) => items.iter().map(ToString::to_string).collect(),
            Some(raw) => split_comma_list(&raw.to_string()),
            None => Vec::new(),
        };
        Self {
            fail_unrecognised: enabled(FAIL_UNRECOGNISED_SWITCH),
            show_hidden: enabled(SHOW_HIDDEN_SWITCH),
            monochrome: MONOCHROME_SWITCHES.into_iter().any(|name| enabled(name)),
            ignore_params,
            ..Self::default()
        }
    }

    /// Palette honoring the monochrome switch.
    pub fn palette(&self) -> Palette {
        Palette::new(self.monochrome)
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommaList {
    Joined(String),
    Items(Vec<String>),
}

fn deserialize_comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CommaList::deserialize(deserializer)? {
        CommaList::Joined(raw) => split_comma_list(&raw),
        CommaList::Items(items) => items,
    })
}
