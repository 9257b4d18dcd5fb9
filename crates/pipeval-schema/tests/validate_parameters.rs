//! Integration test: full validation passes over a schema written to disk.
//!
//! Each test writes a `nextflow_schema.json` into a temporary pipeline
//! directory and runs `validate_parameters` against it the way a pipeline
//! launch would.

use std::path::Path;

use pipeval_core::{ParamSet, PipevalError, ValidationConfig};
use pipeval_schema::{
    classify, validate_parameters, Classification, ExpectedParams, RESERVED_OPTIONS,
};
use proptest::prelude::*;
use serde_json::json;

fn write_schema(dir: &Path) {
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "demo pipeline parameters",
        "type": "object",
        "defs": {
            "input_output_options": {
                "title": "Input/output options",
                "type": "object",
                "required": ["outdir"],
                "properties": {
                    "input": {"type": "string", "format": "file-path"},
                    "outdir": {"type": "string", "format": "directory-path"},
                    "outDir2": {"type": "string"}
                }
            }
        },
        "allOf": [{"$ref": "#/defs/input_output_options"}],
        "properties": {
            "max_retries": {"type": "integer", "default": 0}
        }
    });
    std::fs::write(
        dir.join("nextflow_schema.json"),
        serde_json::to_string_pretty(&schema).unwrap(),
    )
    .unwrap();
}

fn params(pairs: &[(&str, &str)]) -> ParamSet {
    let args: Vec<String> = pairs
        .iter()
        .flat_map(|(k, v)| [format!("--{k}"), (*v).to_string()])
        .collect();
    ParamSet::parse_cli_args(args).unwrap()
}

#[test]
fn test_valid_parameters_pass() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let outcome = validate_parameters(
        &params(&[("outdir", "results"), ("max_retries", "0")]),
        &ValidationConfig::default(),
        dir.path(),
    )
    .unwrap();
    assert!(outcome.errors.is_empty());
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_unrecognised_is_warning_when_lenient() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let outcome = validate_parameters(
        &params(&[("outdir", "results"), ("foo", "5")]),
        &ValidationConfig::default(),
        dir.path(),
    )
    .unwrap();
    assert_eq!(outcome.warnings, vec!["* --foo: 5"]);
    assert!(outcome.errors.is_empty());
}

#[test]
fn test_unrecognised_fails_when_strict() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let config = ValidationConfig {
        fail_unrecognised: true,
        monochrome: true,
        ..ValidationConfig::default()
    };
    let err = validate_parameters(
        &params(&[("outdir", "results"), ("foo", "5")]),
        &config,
        dir.path(),
    )
    .unwrap_err();
    match err {
        PipevalError::ValidationFailed { message, errors } => {
            assert_eq!(errors, vec!["* --foo: 5"]);
            assert_eq!(
                message,
                "The following invalid input values have been detected:\n\n* --foo: 5\n\n"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_reserved_option_fails_in_lenient_mode() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let mut supplied = params(&[("outdir", "results")]);
    supplied.insert("resume", true);
    let err = validate_parameters(&supplied, &ValidationConfig::default(), dir.path()).unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert!(err.errors()[0].contains("'--resume'"));
}

#[test]
fn test_hyphenated_near_miss_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let config = ValidationConfig {
        fail_unrecognised: true,
        ..ValidationConfig::default()
    };
    let outcome = validate_parameters(
        &params(&[("outdir", "results"), ("out-dir2", "x")]),
        &config,
        dir.path(),
    )
    .unwrap();
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_ignore_list_suppresses_warning() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let config = ValidationConfig {
        ignore_params: vec!["genomes".to_string()],
        ..ValidationConfig::default()
    };
    let outcome = validate_parameters(
        &params(&[("outdir", "results"), ("genomes", "GRCh38")]),
        &config,
        dir.path(),
    )
    .unwrap();
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_directory_format_violation_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let file = dir.path().join("not_a_dir.txt");
    std::fs::write(&file, "x").unwrap();
    let supplied = params(&[("outdir", &file.display().to_string())]);
    let err = validate_parameters(&supplied, &ValidationConfig::default(), dir.path()).unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert!(
        err.errors()[0].contains("is not a directory, but a file"),
        "{:?}",
        err.errors()
    );
}

#[test]
fn test_missing_schema_is_accumulated() {
    let dir = tempfile::tempdir().unwrap();
    let err = validate_parameters(
        &params(&[("outdir", "results")]),
        &ValidationConfig::default(),
        dir.path(),
    )
    .unwrap_err();
    assert!(matches!(err, PipevalError::ValidationFailed { .. }));
    assert_eq!(err.errors().len(), 1);
    assert!(err.errors()[0].contains("nextflow_schema.json"));
}

#[test]
fn test_errors_accumulate_across_steps() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let mut supplied = ParamSet::new();
    supplied.insert("resume", true);
    let err = validate_parameters(&supplied, &ValidationConfig::default(), dir.path()).unwrap_err();
    // Reserved misuse plus the missing required outdir.
    assert_eq!(err.errors().len(), 2, "{:?}", err.errors());
    assert!(err.errors()[1].contains("Missing required parameter: --outdir"));
}

#[test]
fn test_outcome_is_fresh_per_call() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path());
    let config = ValidationConfig::default();
    let first = validate_parameters(&params(&[("outdir", "r"), ("foo", "1")]), &config, dir.path())
        .unwrap();
    let second = validate_parameters(&params(&[("outdir", "r")]), &config, dir.path()).unwrap();
    assert_eq!(first.warnings.len(), 1);
    assert!(second.warnings.is_empty());
}

proptest! {
    #[test]
    fn classification_is_total(names in proptest::collection::vec("[a-zA-Z-]{1,12}", 0..20)) {
        let expected = ExpectedParams::from_names(["outDir", "input", "max-cpus"]);
        let ignore = vec!["genomes".to_string()];
        let result = classify(
            names.iter().map(String::as_str),
            &expected,
            RESERVED_OPTIONS,
            &ignore,
        );
        prop_assert_eq!(result.len(), names.len());
        for ((name, class), supplied) in result.iter().zip(&names) {
            prop_assert_eq!(name, supplied);
            if RESERVED_OPTIONS.contains(&name.as_str()) {
                prop_assert_eq!(*class, Classification::ReservedMisuse);
            }
        }
    }
}
