//! # Schema Index
//!
//! Loads a parameter schema document and indexes it into ordered parameter
//! groups for reconciliation, validation and rendering.
//!
//! ## Document shape
//!
//! ```json
//! {
//!   "defs": {
//!     "input_output_options": {
//!       "title": "Input/output options",
//!       "properties": { "input": { "type": "string", "format": "file-path" } }
//!     }
//!   },
//!   "properties": { "extra": { "type": "boolean" } }
//! }
//! ```
//!
//! Groups come from `defs` (or `$defs` / `definitions` when `defs` is
//! absent), in document order. Top-level `properties` become a trailing
//! synthetic group titled [`UNGROUPED_TITLE`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use pipeval_core::{ParamValue, PipevalError};
use serde_json::{Map, Value};

/// Title of the synthetic group holding ungrouped top-level properties.
pub const UNGROUPED_TITLE: &str = "Other parameters";

/// Keys that may hold the grouped section, in order of preference.
const GROUP_SECTION_KEYS: [&str; 3] = ["defs", "$defs", "definitions"];

/// Mapping from parameter name to its declared enumeration.
pub type EnumIndex = BTreeMap<String, Vec<String>>;

/// A parsed schema document. Always a mapping at top level.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    path: Option<PathBuf>,
    root: Value,
}

impl SchemaDocument {
    /// Read and parse a schema document (`.yaml`/`.yml` → YAML, else JSON).
    ///
    /// # Errors
    ///
    /// Returns [`PipevalError::SchemaParse`] if the file cannot be read, is
    /// not well-formed, or is not a mapping at top level.
    pub fn load(path: &Path) -> Result<Self, PipevalError> {
        let parse_err = |reason: String| PipevalError::SchemaParse {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| parse_err(e.to_string()))?;
        let root: Value = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| parse_err(format!("YAML parse error: {e}")))?,
            _ => serde_json::from_str(&content)
                .map_err(|e| parse_err(format!("JSON parse error: {e}")))?,
        };
        if !root.is_object() {
            return Err(parse_err("top level is not a mapping".to_string()));
        }
        tracing::debug!(schema = %path.display(), "loaded parameter schema");
        Ok(Self {
            path: Some(path.to_path_buf()),
            root,
        })
    }

    /// Wrap an in-memory JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`PipevalError::SchemaParse`] if the value is not a mapping.
    pub fn from_value(root: Value) -> Result<Self, PipevalError> {
        if !root.is_object() {
            return Err(PipevalError::SchemaParse {
                path: "<inline>".to_string(),
                reason: "top level is not a mapping".to_string(),
            });
        }
        Ok(Self { path: None, root })
    }

    /// Path the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The raw document tree.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Find the value of `key` in the first mapping that contains it.
    ///
    /// See [`lookup`].
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        lookup(&self.root, key)
    }
}

/// Depth-first "find by key anywhere" search.
///
/// Visits mappings in pre-order, children in document order, and returns the
/// value stored under `key` in the first mapping that has it. Only mappings
/// are descended into. Several mappings may contain the key; only the first
/// one reached is used. Uses an explicit work stack so deep documents cannot
/// exhaust the call stack.
pub fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let mut stack: Vec<&Map<String, Value>> = match root {
        Value::Object(map) => vec![map],
        _ => return None,
    };
    while let Some(map) = stack.pop() {
        if let Some(found) = map.get(key) {
            return Some(found);
        }
        stack.extend(map.values().rev().filter_map(Value::as_object));
    }
    None
}

/// Resolve the schema location: absolute paths as-is, relative ones under
/// the pipeline base directory.
pub fn resolve_schema_path(base_dir: &Path, filename: &str) -> PathBuf {
    let path = Path::new(filename);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Typed view of one parameter's schema entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyDescriptor {
    /// Declared `type`; arrays of types are joined with `, `.
    pub kind: Option<String>,
    /// Declared `description`.
    pub description: Option<String>,
    /// Declared `default`, kept as raw JSON.
    pub default: Option<Value>,
    /// Declared `enum`, rendered as text.
    pub enum_values: Option<Vec<String>>,
    /// Declared `hidden`.
    pub hidden: bool,
    /// Declared `format`.
    pub format: Option<String>,
    /// Declared `schema` (samplesheet schema pointer).
    pub schema: Option<String>,
    /// Declared `fa_icon`; display-only.
    pub fa_icon: Option<String>,
    fields: Map<String, Value>,
}

impl PropertyDescriptor {
    /// Build a descriptor from a schema entry. Non-mapping entries yield an
    /// empty descriptor.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
        let kind = match fields.get("type") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(kinds)) => Some(
                kinds
                    .iter()
                    .map(|k| ParamValue::from_json(k).to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        };
        let enum_values = fields.get("enum").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .map(|v| ParamValue::from_json(v).to_string())
                .collect()
        });
        Self {
            kind,
            description: text("description"),
            default: fields.get("default").cloned(),
            enum_values,
            hidden: fields.get("hidden").and_then(Value::as_bool).unwrap_or(false),
            format: text("format"),
            schema: text("schema"),
            fa_icon: text("fa_icon"),
            fields: fields.clone(),
        }
    }

    /// Every declared field, in document order, including ones without a
    /// typed accessor.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A titled, ordered group of parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterGroup {
    /// Display title.
    pub title: String,
    /// Parameters in document order.
    pub properties: Vec<(String, PropertyDescriptor)>,
}

impl ParameterGroup {
    /// Look up a parameter in this group.
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, d)| d)
    }

    fn from_properties(title: String, properties: Option<&Map<String, Value>>) -> Self {
        let properties = properties
            .map(|props| {
                props
                    .iter()
                    .map(|(name, value)| (name.clone(), PropertyDescriptor::from_value(value)))
                    .collect()
            })
            .unwrap_or_default();
        Self { title, properties }
    }
}

/// Grouped parameter model built from a [`SchemaDocument`].
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    /// Groups in rendering order; the ungrouped group, if any, is last.
    pub groups: Vec<ParameterGroup>,
    /// Every parameter name declared by the schema.
    pub expected_names: BTreeSet<String>,
    /// Declared enumerations by parameter name.
    pub enums: EnumIndex,
}

impl SchemaIndex {
    /// Index a schema document. Pure transform.
    ///
    /// Enumerations of later groups overwrite earlier ones when two groups
    /// declare the same parameter name.
    pub fn build(document: &SchemaDocument) -> Self {
        let root = document.as_value();
        let mut groups = Vec::new();

        let grouped = GROUP_SECTION_KEYS
            .iter()
            .find_map(|key| root.get(*key).and_then(Value::as_object));
        if let Some(section) = grouped {
            for (key, group) in section {
                let Some(group) = group.as_object() else {
                    continue;
                };
                let title = group
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or(key)
                    .to_string();
                let properties = group.get("properties").and_then(Value::as_object);
                groups.push(ParameterGroup::from_properties(title, properties));
            }
        }

        if let Some(properties) = root.get("properties").and_then(Value::as_object) {
            groups.push(ParameterGroup::from_properties(
                UNGROUPED_TITLE.to_string(),
                Some(properties),
            ));
        }

        let mut expected_names = BTreeSet::new();
        let mut enums = EnumIndex::new();
        for group in &groups {
            for (name, descriptor) in &group.properties {
                expected_names.insert(name.clone());
                if let Some(values) = &descriptor.enum_values {
                    enums.insert(name.clone(), values.clone());
                }
            }
        }

        Self {
            groups,
            expected_names,
            enums,
        }
    }

    /// Find a parameter across all groups; the last group declaring it wins.
    pub fn find(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.groups.iter().rev().find_map(|g| g.get(name))
    }

    /// Length of the longest parameter name across all groups.
    pub fn max_name_width(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.properties.iter())
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
    }
}
