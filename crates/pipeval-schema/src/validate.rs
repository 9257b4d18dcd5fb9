//! # Parameter Value Validation
//!
//! Evaluates cleaned parameter values against the schema document with the
//! `jsonschema` engine and shapes each violation into an operator-facing
//! message.
//!
//! ## Engine setup
//!
//! Format assertion is switched on and every [`FormatEvaluator`] in the
//! validator's [`FormatRegistry`] is attached under its format name. When a
//! custom format rejects a value the evaluator is asked again for its own
//! message, which replaces the engine's generic one.
//!
//! ## Message shapes
//!
//! | Violation | Message |
//! |---|---|
//! | required property missing at the root | `* Missing required parameter: --<name>` |
//! | anything else at the root | `* <engine message>` |
//! | parameter with a declared enum | `* --<p>: '<value>' is not a valid choice (…)` |
//! | custom format | `* --<p>: <evaluator message> (<value>)` |
//! | any other parameter violation | `* --<p>: <engine message> (<value>)` |

use std::fmt;
use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use pipeval_core::{clean_parameters, ParamSet, ParamValue};
use serde_json::Value;
use thiserror::Error;

use crate::formats::{FormatEvaluator, FormatRegistry};
use crate::index::{EnumIndex, SchemaDocument};

/// Enum choices listed in full before the list is cut short.
pub const ENUM_CHOICE_LIMIT: usize = 5;

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The instance did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema could not be compiled by the engine.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// What kind of rule a [`Violation`] broke, as far as message shaping cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A `required` property is missing.
    MissingRequired(String),
    /// A `format` rejected the value.
    Format(String),
    /// Any other keyword.
    Other,
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Engine description of the violation.
    pub message: String,
    /// Rule category.
    pub kind: ViolationKind,
    /// The offending value.
    pub instance: Value,
}

impl Violation {
    fn from_engine(error: jsonschema::ValidationError<'_>) -> Self {
        let kind = match &error.kind {
            ValidationErrorKind::Required { property } => ViolationKind::MissingRequired(
                property
                    .as_str()
                    .map_or_else(|| property.to_string(), str::to_string),
            ),
            ValidationErrorKind::Format { format } => ViolationKind::Format(format.to_string()),
            _ => ViolationKind::Other,
        };
        Self {
            instance_path: error.instance_path.to_string(),
            schema_path: error.schema_path.to_string(),
            message: error.to_string(),
            kind,
            instance: error.instance.clone().into_owned(),
        }
    }

    /// The parameter the violation is about; empty at the document root.
    pub fn param(&self) -> &str {
        self.instance_path
            .strip_prefix('/')
            .unwrap_or(&self.instance_path)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations, in engine order.
#[derive(Debug, Clone, Default)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Schema validator backed by the `jsonschema` crate with custom formats
/// attached.
///
/// `Send + Sync`; one instance can serve any number of validation calls.
#[derive(Debug, Clone, Default)]
pub struct ParameterValidator {
    formats: FormatRegistry,
}

impl ParameterValidator {
    /// Create a validator using the given format evaluators.
    pub fn new(formats: FormatRegistry) -> Self {
        Self { formats }
    }

    /// The attached format evaluators.
    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Compile `schema` with format assertion on and every registered
    /// evaluator attached.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidatorBuildError`] if the engine
    /// rejects the schema.
    pub fn build_validator(
        &self,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Validator, SchemaValidationError> {
        let mut opts = jsonschema::options();
        opts.should_validate_formats(true);
        for evaluator in self.formats.iter() {
            let evaluator: Arc<dyn FormatEvaluator> = Arc::clone(evaluator);
            let name = evaluator.name();
            opts.with_format(name, move |raw: &str| {
                evaluator.evaluate(&Value::String(raw.to_string())).is_ok()
            });
        }
        opts.build(schema)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Collect every violation of `instance` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidatorBuildError`] if the schema
    /// cannot be compiled.
    pub fn violations(
        &self,
        schema_name: &str,
        schema: &Value,
        instance: &Value,
    ) -> Result<ValidationViolations, SchemaValidationError> {
        let validator = self.build_validator(schema_name, schema)?;
        let violations = validator
            .iter_errors(instance)
            .map(Violation::from_engine)
            .collect();
        Ok(ValidationViolations { violations })
    }

    /// Validate a JSON value, failing with the structured violation list.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidationFailed`] when the instance
    /// does not conform, or a build error if the schema cannot be compiled.
    pub fn validate_document(
        &self,
        schema_name: &str,
        schema: &Value,
        instance: &Value,
    ) -> Result<(), SchemaValidationError> {
        let violations = self.violations(schema_name, schema, instance)?;
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: schema_name.to_string(),
                violations,
            })
        }
    }

    /// Validate supplied parameter values against the schema document.
    ///
    /// Values are cleaned first (see [`clean_parameters`]). Returns one
    /// message per violation in engine order; an empty list means the values
    /// conform.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidatorBuildError`] if the schema
    /// cannot be compiled.
    pub fn validate(
        &self,
        values: &ParamSet,
        document: &SchemaDocument,
        enums: &EnumIndex,
    ) -> Result<Vec<String>, SchemaValidationError> {
        let instance = clean_parameters(values).to_json();
        let schema_name = document
            .path()
            .map_or_else(|| "<inline>".to_string(), |p| p.display().to_string());
        let violations = self.violations(&schema_name, document.as_value(), &instance)?;
        tracing::debug!(
            schema = %schema_name,
            violations = violations.len(),
            "evaluated parameters against schema"
        );
        Ok(violations
            .violations()
            .iter()
            .map(|v| self.shape_message(v, enums))
            .collect())
    }

    /// Render one violation as an operator-facing message.
    pub fn shape_message(&self, violation: &Violation, enums: &EnumIndex) -> String {
        let param = violation.param();
        if param.is_empty() {
            return match &violation.kind {
                ViolationKind::MissingRequired(name) => {
                    format!("* Missing required parameter: --{name}")
                }
                _ => format!("* {}", violation.message),
            };
        }

        let value = ParamValue::from_json(&violation.instance);
        if let Some(choices) = enums.get(param) {
            return format!(
                "* --{param}: '{value}' is not a valid choice {}",
                available_choices(choices)
            );
        }

        let message = match &violation.kind {
            ViolationKind::Format(format) => self
                .formats
                .get(format)
                .and_then(|evaluator| evaluator.evaluate(&violation.instance).err())
                .unwrap_or_else(|| violation.message.clone()),
            _ => violation.message.clone(),
        };
        format!("* --{param}: {message} ({value})")
    }
}

/// `(Available choices: a, b)`, cut to [`ENUM_CHOICE_LIMIT`] entries with a
/// count when longer.
pub fn available_choices(choices: &[String]) -> String {
    if choices.len() > ENUM_CHOICE_LIMIT {
        format!(
            "(Available choices ({ENUM_CHOICE_LIMIT} of {}): {}, ... )",
            choices.len(),
            choices[..ENUM_CHOICE_LIMIT].join(", ")
        )
    } else {
        format!("(Available choices: {})", choices.join(", "))
    }
}
