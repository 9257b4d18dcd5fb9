//! # Parameter Reconciliation
//!
//! Sorts every supplied parameter name into exactly one [`Classification`]
//! and turns the result into warnings and errors.
//!
//! Rules, first match wins:
//!
//! 1. the name is a reserved host option → [`Classification::ReservedMisuse`]
//! 2. the name contains `-`, is not itself expected, and equals an expected
//!    name once hyphens are stripped and case is folded →
//!    [`Classification::NearMissIgnored`]
//! 3. the name is expected or ignored → [`Classification::Recognized`]
//! 4. anything else → [`Classification::Unrecognized`]
//!
//! Rule 2 tolerates `--out-dir` for a schema declaring `outDir`. It can also
//! hide a real typo; that trade-off is accepted.

use std::collections::BTreeSet;

use pipeval_core::{ParamSet, ValidationConfig};

use crate::index::SchemaIndex;
use crate::outcome::ValidationOutcome;

/// Single-dash options of the host runtime. Passing one of these with the
/// parameter prefix (`--resume`) is always an operator mistake.
///
/// Matches the launcher and `run` options of Nextflow 24.10.
pub const RESERVED_OPTIONS: &[&str] = &[
    // launcher
    "bg",
    "c",
    "C",
    "config",
    "d",
    "D",
    "dockerize",
    "h",
    "log",
    "q",
    "quiet",
    "remote-debug",
    "self-update",
    "syslog",
    "trace",
    "v",
    "version",
    // run command
    "ansi",
    "ansi-log",
    "bucket-dir",
    "cache",
    "disable-jobs-cancellation",
    "dsl1",
    "dsl2",
    "dump-channels",
    "dump-hashes",
    "E",
    "entry",
    "hub",
    "latest",
    "lib",
    "main-script",
    "N",
    "name",
    "o",
    "offline",
    "output-dir",
    "params-file",
    "pi",
    "plugins",
    "poll-interval",
    "pool-size",
    "preview",
    "profile",
    "ps",
    "qs",
    "queue-size",
    "r",
    "resume",
    "revision",
    "stdin",
    "stub",
    "stub-run",
    "test",
    "user",
    "w",
    "with-apptainer",
    "with-charliecloud",
    "with-cloudcache",
    "with-conda",
    "with-dag",
    "with-docker",
    "with-fusion",
    "with-mpi",
    "with-notification",
    "with-podman",
    "with-report",
    "with-singularity",
    "with-spack",
    "with-timeline",
    "with-tower",
    "with-trace",
    "with-wave",
    "with-weblog",
    "without-conda",
    "without-docker",
    "without-podman",
    "without-spack",
    "without-wave",
    "work-dir",
];

/// Engine switches accepted on every pipeline whether or not the schema
/// declares them.
pub const BUILTIN_PARAMS: &[&str] = &[
    "help",
    "validationShowHiddenParams",
    "validationSchemaIgnoreParams",
    "validationSkipDuplicateCheck",
    "validationS3PathCheck",
    "monochromeLogs",
    "monochrome_logs",
    "validationFailUnrecognisedParams",
    "validationLenientMode",
    "validationMonochromeLogs",
];

/// How a supplied parameter name relates to the expected set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A host option passed with the parameter prefix.
    ReservedMisuse,
    /// Declared, built in, or explicitly ignored.
    Recognized,
    /// Hyphenated spelling of an expected camel-case name.
    NearMissIgnored,
    /// Nothing matches.
    Unrecognized,
}

/// Strip hyphens and fold case.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// The names a pipeline accepts, with their normalized forms precomputed.
#[derive(Debug, Clone, Default)]
pub struct ExpectedParams {
    names: BTreeSet<String>,
    normalized: BTreeSet<String>,
}

impl ExpectedParams {
    /// Schema-declared names, [`BUILTIN_PARAMS`], and the ignore list.
    pub fn new(index: &SchemaIndex, ignore: &[String]) -> Self {
        let names = index
            .expected_names
            .iter()
            .cloned()
            .chain(BUILTIN_PARAMS.iter().map(|s| s.to_string()))
            .chain(ignore.iter().cloned());
        Self::from_names(names)
    }

    /// Build from an explicit list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let normalized = names.iter().map(|n| normalize_name(n)).collect();
        Self { names, normalized }
    }

    /// Exact membership.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Membership after normalization.
    pub fn contains_normalized(&self, name: &str) -> bool {
        self.normalized.contains(&normalize_name(name))
    }

    /// Every expected name, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Classify one supplied name.
pub fn classify_name(
    name: &str,
    expected: &ExpectedParams,
    reserved: &[&str],
    ignore: &[String],
) -> Classification {
    if reserved.iter().any(|r| *r == name) {
        Classification::ReservedMisuse
    } else if name.contains('-') && !expected.contains(name) && expected.contains_normalized(name)
    {
        Classification::NearMissIgnored
    } else if expected.contains(name) || ignore.iter().any(|i| i == name) {
        Classification::Recognized
    } else {
        Classification::Unrecognized
    }
}

/// Classify every supplied name, keeping the order they were supplied in.
pub fn classify<'a, I>(
    supplied: I,
    expected: &ExpectedParams,
    reserved: &[&str],
    ignore: &[String],
) -> Vec<(String, Classification)>
where
    I: IntoIterator<Item = &'a str>,
{
    supplied
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                classify_name(name, expected, reserved, ignore),
            )
        })
        .collect()
}

/// Reconcile the supplied parameters against the expected set, recording
/// findings on `outcome`.
///
/// Reserved misuse is always an error. Unrecognized names are errors when
/// `config.fail_unrecognised` is set and warnings otherwise.
pub fn reconcile(
    params: &ParamSet,
    expected: &ExpectedParams,
    config: &ValidationConfig,
    outcome: &mut ValidationOutcome,
) {
    for (name, value) in params.iter() {
        match classify_name(name, expected, RESERVED_OPTIONS, &config.ignore_params) {
            Classification::ReservedMisuse => outcome.error(format!(
                "You used a core Nextflow option with two hyphens: '--{name}'. \
                 Please resubmit with '-{name}'"
            )),
            Classification::Unrecognized => {
                let message = format!("* --{name}: {value}");
                if config.fail_unrecognised {
                    outcome.error(message);
                } else {
                    outcome.warn(message);
                }
            }
            Classification::NearMissIgnored => {
                tracing::debug!(
                    param = name,
                    "accepting hyphenated spelling of expected parameter"
                );
            }
            Classification::Recognized => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> ExpectedParams {
        ExpectedParams::from_names(["outDir", "input", "genome"])
    }

    #[test]
    fn normalize_strips_hyphens_and_case() {
        assert_eq!(normalize_name("out-Dir"), "outdir");
        assert_eq!(normalize_name("--max-CPUS"), "maxcpus");
    }

    #[test]
    fn reserved_wins_over_everything() {
        let expected = ExpectedParams::from_names(["resume"]);
        assert_eq!(
            classify_name("resume", &expected, RESERVED_OPTIONS, &[]),
            Classification::ReservedMisuse
        );
    }

    #[test]
    fn hyphenated_camel_case_is_near_miss() {
        assert_eq!(
            classify_name("out-dir", &expected(), RESERVED_OPTIONS, &[]),
            Classification::NearMissIgnored
        );
        // No hyphen: a case-only difference is not tolerated.
        assert_eq!(
            classify_name("outdir", &expected(), RESERVED_OPTIONS, &[]),
            Classification::Unrecognized
        );
    }

    #[test]
    fn ignore_list_is_recognized() {
        let ignore = vec!["genomes".to_string()];
        assert_eq!(
            classify_name("genomes", &expected(), RESERVED_OPTIONS, &ignore),
            Classification::Recognized
        );
        assert_eq!(
            classify_name("input", &expected(), RESERVED_OPTIONS, &[]),
            Classification::Recognized
        );
    }

    #[test]
    fn classify_keeps_supply_order() {
        let result = classify(["zeta", "input", "resume"], &expected(), RESERVED_OPTIONS, &[]);
        let names: Vec<&str> = result.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "input", "resume"]);
        assert_eq!(result[2].1, Classification::ReservedMisuse);
    }

    #[test]
    fn reconcile_lenient_warns() {
        let mut params = ParamSet::new();
        params.insert("foo", 5i64);
        let mut outcome = ValidationOutcome::new();
        reconcile(&params, &expected(), &ValidationConfig::default(), &mut outcome);
        assert_eq!(outcome.warnings, vec!["* --foo: 5"]);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn reconcile_strict_errors() {
        let mut params = ParamSet::new();
        params.insert("foo", 5i64);
        let config = ValidationConfig {
            fail_unrecognised: true,
            ..ValidationConfig::default()
        };
        let mut outcome = ValidationOutcome::new();
        reconcile(&params, &expected(), &config, &mut outcome);
        assert_eq!(outcome.errors, vec!["* --foo: 5"]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn reconcile_reserved_is_error_in_lenient_mode() {
        let mut params = ParamSet::new();
        params.insert("resume", true);
        let mut outcome = ValidationOutcome::new();
        reconcile(&params, &expected(), &ValidationConfig::default(), &mut outcome);
        assert_eq!(
            outcome.errors,
            vec![
                "You used a core Nextflow option with two hyphens: '--resume'. \
                 Please resubmit with '-resume'"
            ]
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn container_and_preview_options_are_reserved() {
        for name in [
            "with-apptainer",
            "with-wave",
            "with-fusion",
            "with-spack",
            "without-conda",
            "without-spack",
            "without-wave",
            "preview",
        ] {
            assert_eq!(
                classify_name(name, &expected(), RESERVED_OPTIONS, &[]),
                Classification::ReservedMisuse,
                "{name}"
            );
        }
    }

    #[test]
    fn reserved_list_has_no_duplicates() {
        let unique: BTreeSet<&str> = RESERVED_OPTIONS.iter().copied().collect();
        assert_eq!(unique.len(), RESERVED_OPTIONS.len());
    }

    #[test]
    fn config_switches_are_builtins() {
        for name in pipeval_core::CONFIG_SWITCHES {
            assert!(BUILTIN_PARAMS.contains(&name), "{name} is read but not expected");
        }
    }

    #[test]
    fn strict_mode_accepts_engine_switches() {
        let mut params = ParamSet::new();
        params.insert("outDir", "results");
        params.insert("monochrome_logs", true);
        params.insert("validationFailUnrecognisedParams", true);
        let config = ValidationConfig::from_params(&params);
        assert!(config.fail_unrecognised && config.monochrome);

        let document = crate::index::SchemaDocument::from_value(serde_json::json!({
            "properties": {"outDir": {"type": "string"}}
        }))
        .unwrap();
        let expected = ExpectedParams::new(&SchemaIndex::build(&document), &[]);

        let mut outcome = ValidationOutcome::new();
        reconcile(&params, &expected, &config, &mut outcome);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    }

    #[test]
    fn builtins_are_expected() {
        let expected = ExpectedParams::new(&SchemaIndex::default(), &[]);
        for name in BUILTIN_PARAMS {
            assert!(expected.contains(name), "missing {name}");
        }
    }
}
