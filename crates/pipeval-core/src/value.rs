//! # Parameter Values
//!
//! [`ParamValue`] is the discriminated value type for a single pipeline
//! parameter and [`ParamSet`] is the insertion-ordered collection of supplied
//! parameters.
//!
//! ## Absence vs. falsity
//!
//! Two different questions are asked of a value and each has its own
//! predicate:
//!
//! - [`ParamValue::is_absent`]: should the entry be dropped before schema
//!   validation? Null, `false`, the empty string and empty collections are
//!   absent. Numeric zero is **not**.
//! - [`ParamValue::is_default_false`]: does a value without a schema default
//!   count as "unset" in the summary? Null, `false`, `""` and `"false"` do.
//!
//! ## Host quantities
//!
//! Durations and memory sizes are host-native quantity types that the schema
//! cannot describe. They are carried as their textual form and stringified by
//! [`clean_parameters`] before validation, together with nested mappings.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::PipevalError;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integral number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Free text.
    String(String),
    /// Ordered list of values.
    List(Vec<ParamValue>),
    /// Nested mapping.
    Map(BTreeMap<String, ParamValue>),
    /// Host duration literal, e.g. `2h` or `1d`.
    Duration(String),
    /// Host memory-size literal, e.g. `8.GB`.
    MemorySize(String),
}

impl ParamValue {
    /// True when the entry carries no usable value and is dropped by
    /// [`clean_parameters`]. Numeric zero is never absent.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::String(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::Integer(_) | Self::Float(_) | Self::Duration(_) | Self::MemorySize(_) => false,
        }
    }

    /// True when the value reads as "unset" for a parameter without a
    /// declared default: empty string, null, `false` or the string `"false"`.
    pub fn is_default_false(&self) -> bool {
        match self {
            Self::Null | Self::Bool(false) => true,
            Self::String(s) => s.is_empty() || s == "false",
            _ => false,
        }
    }

    /// Interpret the value as an on/off switch.
    ///
    /// Used for engine switches such as `validationFailUnrecognisedParams`
    /// that may arrive as booleans or as text from a params file.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => s.eq_ignore_ascii_case("true"),
            Self::Integer(n) => *n != 0,
            _ => false,
        }
    }

    /// Borrow the text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON value into a parameter value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Serialize into the normalized JSON tree handed to the schema evaluator.
    ///
    /// Host quantities become strings. Non-finite floats become null because
    /// JSON cannot represent them.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::Number(Number::from(*i)),
            Self::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::String(s) | Self::Duration(s) | Self::MemorySize(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Parse a command-line literal.
    ///
    /// `true`/`false` become booleans, integral and decimal literals become
    /// numbers, everything else stays text.
    pub fn parse_literal(raw: &str) -> Self {
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Integer(i);
        }
        let looks_decimal = raw.chars().any(|c| c.is_ascii_digit())
            && raw
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
        if looks_decimal {
            if let Ok(f) = raw.parse::<f64>() {
                if f.is_finite() {
                    return Self::Float(f);
                }
            }
        }
        Self::String(raw.to_string())
    }

    /// The value as handed to the schema evaluator after cleaning.
    fn cleaned(&self) -> Self {
        match self {
            Self::Duration(text) => Self::String(normalize_duration(text)),
            Self::MemorySize(text) => Self::String(text.clone()),
            Self::Map(_) => Self::String(self.to_string()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::String(s) | Self::Duration(s) | Self::MemorySize(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                if map.is_empty() {
                    return f.write_str("[:]");
                }
                f.write_str("[")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Rewrite the first bare `d` day unit of a duration to `day`.
///
/// `1d` → `1day`, `1d 2h` → `1day 2h`; `3day` is left untouched.
fn normalize_duration(text: &str) -> String {
    for (idx, ch) in text.char_indices() {
        if ch == 'd' && !text[idx + 1..].starts_with("ay") {
            return format!("{}day{}", &text[..idx], &text[idx + 1..]);
        }
    }
    text.to_string()
}

/// Insertion-ordered set of supplied parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParamSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// True when the parameter was supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` onto `self`; later values win.
    pub fn merge(&mut self, other: ParamSet) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    /// Build a parameter set from a JSON mapping.
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(
            map.iter()
                .map(|(k, v)| (k.clone(), ParamValue::from_json(v)))
                .collect(),
        )
    }

    /// Serialize into a JSON object, preserving insertion order.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Load parameters from a JSON or YAML file (`.yaml`/`.yml` → YAML).
    ///
    /// # Errors
    ///
    /// Returns [`PipevalError::ParamsLoad`] if the file cannot be read, does
    /// not parse, or is not a mapping at top level.
    pub fn load(path: &Path) -> Result<Self, PipevalError> {
        let load_err = |reason: String| PipevalError::ParamsLoad {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let value: Value = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| load_err(format!("YAML parse error: {e}")))?,
            _ => serde_json::from_str(&content)
                .map_err(|e| load_err(format!("JSON parse error: {e}")))?,
        };
        Self::from_json(&value).ok_or_else(|| load_err("top level is not a mapping".to_string()))
    }

    /// Parse host-style parameter arguments.
    ///
    /// Accepts `--name=value`, `--name value` and bare `--flag` (which sets
    /// `true`). Values are typed with [`ParamValue::parse_literal`].
    ///
    /// # Errors
    ///
    /// Returns [`PipevalError::InvalidArgument`] for an argument that does
    /// not start with `--` where a parameter name is expected.
    pub fn parse_cli_args<I, S>(args: I) -> Result<Self, PipevalError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let mut params = Self::new();
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            let Some(body) = arg.strip_prefix("--").filter(|b| !b.is_empty()) else {
                return Err(PipevalError::InvalidArgument(arg.clone()));
            };
            if let Some((name, raw)) = body.split_once('=') {
                params.insert(name, ParamValue::parse_literal(raw));
                i += 1;
                continue;
            }
            match args.get(i + 1) {
                Some(next) if !next.starts_with("--") => {
                    params.insert(body, ParamValue::parse_literal(next));
                    i += 2;
                }
                _ => {
                    params.insert(body, ParamValue::Bool(true));
                    i += 1;
                }
            }
        }
        Ok(params)
    }
}

impl FromIterator<(String, ParamValue)> for ParamSet {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Prepare supplied parameters for schema evaluation.
///
/// Drops every entry whose value [`ParamValue::is_absent`] (numeric zero is
/// kept) and stringifies durations, memory sizes and nested mappings.
pub fn clean_parameters(params: &ParamSet) -> ParamSet {
    params
        .iter()
        .filter(|(_, v)| !v.is_absent())
        .map(|(k, v)| (k.to_string(), v.cleaned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn zero_is_not_absent() {
        assert!(!ParamValue::Integer(0).is_absent());
        assert!(!ParamValue::Float(0.0).is_absent());
        assert!(!ParamValue::String("0".to_string()).is_absent());
    }

    #[test]
    fn falsy_values_are_absent() {
        assert!(ParamValue::Null.is_absent());
        assert!(ParamValue::Bool(false).is_absent());
        assert!(ParamValue::String(String::new()).is_absent());
        assert!(ParamValue::List(Vec::new()).is_absent());
        assert!(ParamValue::Map(BTreeMap::new()).is_absent());
        assert!(!ParamValue::Bool(true).is_absent());
    }

    #[test]
    fn default_false_predicate() {
        assert!(ParamValue::String("false".to_string()).is_default_false());
        assert!(ParamValue::String(String::new()).is_default_false());
        assert!(ParamValue::Null.is_default_false());
        assert!(ParamValue::Bool(false).is_default_false());
        assert!(!ParamValue::Integer(0).is_default_false());
        assert!(!ParamValue::String("0".to_string()).is_default_false());
    }

    #[test]
    fn clean_keeps_zero_and_drops_falsy() {
        let mut params = ParamSet::new();
        params.insert("threads", 0i64);
        params.insert("skip", false);
        params.insert("label", "");
        params.insert("outdir", "results");
        let cleaned = clean_parameters(&params);
        assert_eq!(cleaned.get("threads"), Some(&ParamValue::Integer(0)));
        assert!(!cleaned.contains("skip"));
        assert!(!cleaned.contains("label"));
        assert_eq!(cleaned.names().collect::<Vec<_>>(), vec!["threads", "outdir"]);
    }

    #[test]
    fn clean_stringifies_host_quantities() {
        let mut params = ParamSet::new();
        params.insert("max_time", ParamValue::Duration("10d".to_string()));
        params.insert("max_memory", ParamValue::MemorySize("128.GB".to_string()));
        let mut nested = BTreeMap::new();
        nested.insert("a".to_string(), ParamValue::Integer(1));
        params.insert("extra", ParamValue::Map(nested));
        let cleaned = clean_parameters(&params);
        assert_eq!(cleaned.get("max_time"), Some(&ParamValue::from("10day")));
        assert_eq!(cleaned.get("max_memory"), Some(&ParamValue::from("128.GB")));
        assert_eq!(cleaned.get("extra"), Some(&ParamValue::from("[a:1]")));
    }

    #[test]
    fn duration_day_unit_is_rewritten_once() {
        assert_eq!(normalize_duration("1d"), "1day");
        assert_eq!(normalize_duration("2day"), "2day");
        assert_eq!(normalize_duration("1d 2h"), "1day 2h");
        assert_eq!(normalize_duration("4h"), "4h");
    }

    #[test]
    fn display_matches_host_rendering() {
        assert_eq!(ParamValue::Float(1.0).to_string(), "1.0");
        assert_eq!(ParamValue::Integer(5).to_string(), "5");
        let list = ParamValue::List(vec![ParamValue::from("a"), ParamValue::Integer(2)]);
        assert_eq!(list.to_string(), "[a, 2]");
        assert_eq!(ParamValue::Null.to_string(), "null");
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let value = json!({"zeta": 1, "alpha": "x", "mid": [true, null]});
        let params = ParamSet::from_json(&value).unwrap();
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(params.to_json(), value);
    }

    #[test]
    fn from_json_rejects_non_mapping() {
        assert!(ParamSet::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = ParamSet::new();
        params.insert("a", 1i64);
        params.insert("b", 2i64);
        params.insert("a", 3i64);
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(params.get("a"), Some(&ParamValue::Integer(3)));
    }

    #[test]
    fn parse_cli_args_forms() {
        let params = ParamSet::parse_cli_args([
            "--foo=5",
            "--outdir",
            "results",
            "--skip_qc",
            "--ratio",
            "0.5",
            "--name=sample-1",
        ])
        .unwrap();
        assert_eq!(params.get("foo"), Some(&ParamValue::Integer(5)));
        assert_eq!(params.get("outdir"), Some(&ParamValue::from("results")));
        assert_eq!(params.get("skip_qc"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("ratio"), Some(&ParamValue::Float(0.5)));
        assert_eq!(params.get("name"), Some(&ParamValue::from("sample-1")));
    }

    #[test]
    fn parse_cli_args_rejects_positional() {
        let err = ParamSet::parse_cli_args(["outdir"]).unwrap_err();
        assert!(matches!(err, PipevalError::InvalidArgument(_)));
    }

    #[test]
    fn parse_literal_keeps_text() {
        assert_eq!(ParamValue::parse_literal("nan"), ParamValue::from("nan"));
        assert_eq!(ParamValue::parse_literal("1e3"), ParamValue::Float(1000.0));
        assert_eq!(ParamValue::parse_literal("GRCh38"), ParamValue::from("GRCh38"));
    }

    #[test]
    fn load_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("params.yaml");
        std::fs::write(&yaml, "input: samples.csv\nthreads: 4\n").unwrap();
        let params = ParamSet::load(&yaml).unwrap();
        assert_eq!(params.get("threads"), Some(&ParamValue::Integer(4)));

        let json_path = dir.path().join("params.json");
        std::fs::write(&json_path, "[1]").unwrap();
        let err = ParamSet::load(&json_path).unwrap_err();
        assert!(matches!(err, PipevalError::ParamsLoad { .. }));
    }

    proptest! {
        #[test]
        fn integers_are_never_absent(n in any::<i64>()) {
            prop_assert!(!ParamValue::Integer(n).is_absent());
        }

        #[test]
        fn cleaning_never_adds_entries(names in proptest::collection::vec("[a-z]{1,8}", 0..12)) {
            let params: ParamSet = names
                .iter()
                .enumerate()
                .map(|(i, n)| (n.clone(), ParamValue::Integer(i as i64)))
                .collect();
            let cleaned = clean_parameters(&params);
            prop_assert_eq!(cleaned.len(), params.len());
        }
    }
}
