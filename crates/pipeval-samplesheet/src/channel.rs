//! # Samplesheet Channel
//!
//! Turns the samplesheet named by a pipeline parameter into a stream of
//! records.
//!
//! The parameter's schema entry must carry a `schema` pointer to the
//! samplesheet schema. Conversion itself is delegated to a
//! [`SamplesheetConverter`]. Every record is materialized before the first
//! one is sent; the stream is then one [`SampleEvent::Record`] per record in
//! source order followed by exactly one [`SampleEvent::Stop`].
//!
//! A failing converter does not fail the call: the error is logged and the
//! stream carries zero records.

use std::path::{Path, PathBuf};

use pipeval_core::{ParamSet, PipevalError};
use pipeval_schema::{resolve_schema_path, SchemaDocument};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::error::ConverterError;

/// One item of a samplesheet stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleEvent {
    /// A converted row.
    Record(Value),
    /// End of stream; always the last event.
    Stop,
}

/// Converts a samplesheet file into records using a samplesheet schema.
pub trait SamplesheetConverter: Send + Sync {
    /// Read `samplesheet` and produce its records in source order.
    ///
    /// # Errors
    ///
    /// Any [`ConverterError`]; the caller logs it and carries on with no
    /// records.
    fn convert(&self, samplesheet: &Path, schema: &Path) -> Result<Vec<Value>, ConverterError>;
}

fn missing_binding(message: String) -> PipevalError {
    PipevalError::MissingSamplesheetBinding {
        message,
        errors: Vec::new(),
    }
}

/// Paths a samplesheet parameter resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplesheetBinding {
    /// The samplesheet file supplied for the parameter.
    pub samplesheet: PathBuf,
    /// The samplesheet schema named by the parameter's `schema` pointer.
    pub schema: PathBuf,
}

impl SamplesheetBinding {
    /// Resolve the binding for `param_name`.
    ///
    /// # Errors
    ///
    /// Returns [`PipevalError::MissingSamplesheetBinding`] with an empty
    /// error list when the schema does not describe the parameter, the
    /// parameter was not supplied, or its entry has no `schema` pointer.
    pub fn resolve(
        param_name: &str,
        document: &SchemaDocument,
        params: &ParamSet,
        base_dir: &Path,
    ) -> Result<Self, PipevalError> {
        let schema_name = document
            .path()
            .map_or_else(|| "the parameter schema".to_string(), |p| p.display().to_string());

        let fragment = document.lookup(param_name).ok_or_else(|| {
            missing_binding(format!(
                "Failed to load the samplesheet schema for --{param_name}: \
                 the parameter was not found in {schema_name}"
            ))
        })?;

        let samplesheet = params
            .get(param_name)
            .filter(|v| !v.is_absent())
            .ok_or_else(|| {
                missing_binding(format!(
                    "Parameter '--{param_name}' was not provided. \
                     Unable to create a channel from it."
                ))
            })?;

        let pointer = fragment.get("schema").and_then(Value::as_str).ok_or_else(|| {
            missing_binding(format!(
                "Parameter '--{param_name}' does not contain a schema in {schema_name}. \
                 Unable to create a channel from it."
            ))
        })?;

        Ok(Self {
            samplesheet: PathBuf::from(samplesheet.to_string()),
            schema: resolve_schema_path(base_dir, pointer),
        })
    }
}

/// Build the record stream for the samplesheet supplied as `param_name`.
///
/// # Errors
///
/// Returns [`PipevalError::MissingSamplesheetBinding`] when the binding
/// cannot be resolved (see [`SamplesheetBinding::resolve`]). Converter
/// failures are logged, never returned.
pub fn from_samplesheet(
    param_name: &str,
    document: &SchemaDocument,
    params: &ParamSet,
    base_dir: &Path,
    converter: &dyn SamplesheetConverter,
) -> Result<UnboundedReceiver<SampleEvent>, PipevalError> {
    let binding = SamplesheetBinding::resolve(param_name, document, params, base_dir)?;

    let records = match converter.convert(&binding.samplesheet, &binding.schema) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(
                param = param_name,
                samplesheet = %binding.samplesheet.display(),
                error = %e,
                "samplesheet conversion failed"
            );
            Vec::new()
        }
    };
    tracing::debug!(param = param_name, records = records.len(), "samplesheet converted");

    let (tx, rx) = mpsc::unbounded_channel();
    for record in records {
        // The receiver is still held locally, so sending cannot fail.
        let _ = tx.send(SampleEvent::Record(record));
    }
    let _ = tx.send(SampleEvent::Stop);
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Vec<Value>);

    impl SamplesheetConverter for Fixed {
        fn convert(&self, _: &Path, _: &Path) -> Result<Vec<Value>, ConverterError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl SamplesheetConverter for Failing {
        fn convert(&self, samplesheet: &Path, _: &Path) -> Result<Vec<Value>, ConverterError> {
            Err(ConverterError::Read {
                path: samplesheet.display().to_string(),
                reason: "boom".to_string(),
            })
        }
    }

    fn document() -> SchemaDocument {
        SchemaDocument::from_value(json!({
            "defs": {
                "io": {"properties": {
                    "input": {"type": "string", "schema": "assets/schema_input.json"},
                    "outdir": {"type": "string"}
                }}
            }
        }))
        .unwrap()
    }

    async fn drain(mut rx: UnboundedReceiver<SampleEvent>) -> Vec<SampleEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[test]
    fn unset_param_fails_with_empty_errors() {
        let err = from_samplesheet(
            "input",
            &document(),
            &ParamSet::new(),
            Path::new("/p"),
            &Fixed(vec![]),
        )
        .unwrap_err();
        match err {
            PipevalError::MissingSamplesheetBinding { message, errors } => {
                assert!(message.contains("'--input' was not provided"), "{message}");
                assert!(errors.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_fragment_and_pointer_fail() {
        let mut params = ParamSet::new();
        params.insert("outdir", "results");
        params.insert("reads", "reads.csv");

        let err = SamplesheetBinding::resolve("reads", &document(), &params, Path::new("/p"))
            .unwrap_err();
        assert!(err.errors().is_empty());
        assert!(err.to_string().contains("not found"));

        let err = SamplesheetBinding::resolve("outdir", &document(), &params, Path::new("/p"))
            .unwrap_err();
        assert!(err.to_string().contains("does not contain a schema"));
    }

    #[test]
    fn binding_resolves_schema_under_base_dir() {
        let mut params = ParamSet::new();
        params.insert("input", "samples.json");
        let binding =
            SamplesheetBinding::resolve("input", &document(), &params, Path::new("/pipeline"))
                .unwrap();
        assert_eq!(binding.samplesheet, PathBuf::from("samples.json"));
        assert_eq!(binding.schema, PathBuf::from("/pipeline/assets/schema_input.json"));
    }

    #[tokio::test]
    async fn records_then_single_stop() {
        let mut params = ParamSet::new();
        params.insert("input", "samples.json");
        let records = vec![
            json!({"sample": "a"}),
            json!({"sample": "b"}),
            json!({"sample": "c"}),
        ];
        let rx = from_samplesheet(
            "input",
            &document(),
            &params,
            Path::new("/p"),
            &Fixed(records.clone()),
        )
        .unwrap();
        let events = drain(rx).await;
        let mut expected: Vec<SampleEvent> = records.into_iter().map(SampleEvent::Record).collect();
        expected.push(SampleEvent::Stop);
        assert_eq!(events, expected);
    }

    #[tokio::test]
    async fn converter_failure_is_fail_open() {
        let mut params = ParamSet::new();
        params.insert("input", "samples.json");
        let rx =
            from_samplesheet("input", &document(), &params, Path::new("/p"), &Failing).unwrap();
        assert_eq!(drain(rx).await, vec![SampleEvent::Stop]);
    }
}
