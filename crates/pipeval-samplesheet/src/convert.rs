//! Reference [`SamplesheetConverter`] for JSON and YAML samplesheets.
//!
//! The samplesheet is an array of row mappings. Each row is checked against
//! the samplesheet schema's `items` entry (or the whole schema when it has
//! none) and returned unchanged.

use std::path::Path;

use pipeval_schema::{ParameterValidator, SchemaValidationError};
use serde_json::Value;

use crate::channel::SamplesheetConverter;
use crate::error::ConverterError;

fn read_document(path: &Path) -> Result<Value, ConverterError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConverterError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let parse_err = |reason: String| ConverterError::Parse {
        path: path.display().to_string(),
        reason,
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&content).map_err(|e| parse_err(format!("YAML parse error: {e}")))
        }
        _ => {
            serde_json::from_str(&content).map_err(|e| parse_err(format!("JSON parse error: {e}")))
        }
    }
}

/// Validates every row of a JSON/YAML samplesheet with `jsonschema`.
#[derive(Debug, Clone, Default)]
pub struct JsonSamplesheetConverter {
    validator: ParameterValidator,
}

impl JsonSamplesheetConverter {
    /// Converter checking rows with `validator` (and its format evaluators).
    pub fn new(validator: ParameterValidator) -> Self {
        Self { validator }
    }
}

impl SamplesheetConverter for JsonSamplesheetConverter {
    fn convert(&self, samplesheet: &Path, schema: &Path) -> Result<Vec<Value>, ConverterError> {
        let schema_doc = read_document(schema)?;
        let row_schema = schema_doc.get("items").unwrap_or(&schema_doc);
        let schema_name = schema.display().to_string();

        let rows = match read_document(samplesheet)? {
            Value::Array(rows) => rows,
            _ => {
                return Err(ConverterError::Parse {
                    path: samplesheet.display().to_string(),
                    reason: "expected an array of rows".to_string(),
                })
            }
        };

        for (i, row) in rows.iter().enumerate() {
            match self.validator.validate_document(&schema_name, row_schema, row) {
                Ok(()) => {}
                Err(SchemaValidationError::ValidationFailed { violations, .. }) => {
                    return Err(ConverterError::InvalidRow {
                        path: samplesheet.display().to_string(),
                        row: i + 1,
                        reason: violations.to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConverterError::Schema {
                        path: schema_name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(rows)
    }
}
