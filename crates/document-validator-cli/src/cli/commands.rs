//! CLI command definitions and implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use document_validator::{
    object_to_value_with, validate_specs_with, value_to_object_with, Findings, Mode, Specs,
    ValidatorConfig,
};
use serde_json::Value;
use tracing::{debug, info};

use super::output::{OutputFormat, Report};
use super::ExitCode;
use crate::error::CliError;

/// Document validator CLI
#[derive(Parser, Debug)]
#[command(name = "docval")]
#[command(about = "Validate specs descriptions and JSON documents", long_about = None)]
#[command(version)]
pub struct DocvalCli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress the report, only set the exit code
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Format of the log lines written to stderr
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: DocvalCommands,
}

#[derive(Subcommand, Debug)]
pub enum DocvalCommands {
    /// Validate a specs description file (JSON or YAML)
    Check {
        /// Path to the specs file
        #[arg(short, long)]
        specs: PathBuf,

        #[command(flatten)]
        options: ValidationArgs,
    },

    /// Validate a JSON document and print its normalized form
    Validate {
        /// Path to the specs file
        #[arg(short, long)]
        specs: PathBuf,

        /// Path to the JSON document
        #[arg(short, long)]
        document: PathBuf,

        #[command(flatten)]
        options: ValidationArgs,
    },
}

/// Options shared by every validating subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ValidationArgs {
    /// Collect every finding instead of stopping at the first error
    #[arg(long)]
    pub lazy: bool,

    /// Deepest nesting level accepted in specs and documents
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ValidationArgs {
    /// Resolve the validator configuration, flags taking precedence over `DOCVAL_*` variables
    pub fn config(&self) -> Result<ValidatorConfig, CliError> {
        self.config_from(ValidatorConfig::from_env()?)
    }

    fn config_from(&self, mut config: ValidatorConfig) -> Result<ValidatorConfig, CliError> {
        if self.lazy {
            config.mode = Mode::Lazy;
        }
        if let Some(max_depth) = self.max_depth {
            if max_depth == 0 {
                return Err(CliError::InvalidInput("--max-depth must be at least 1".to_string()));
            }
            config.max_depth = max_depth;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Execute the check command
pub fn execute_check(
    specs_path: &Path,
    options: &ValidationArgs,
    quiet: bool,
    out: &mut dyn Write,
) -> Result<ExitCode, CliError> {
    let config = options.config()?;
    info!(path = %specs_path.display(), mode = %config.mode, "Checking specs");

    let raw = read_specs_file(specs_path)?;
    let mut findings = Findings::from_config(&config);
    validate_specs_with(&raw, &mut findings);

    if !quiet {
        Report::from_findings("Specs", &findings).render(options.format, out)?;
    }

    Ok(ExitCode::from_validation_result(
        findings.has_errors(),
        findings.has_warnings(),
    ))
}

/// Execute the validate command
pub fn execute_validate(
    specs_path: &Path,
    document_path: &Path,
    options: &ValidationArgs,
    quiet: bool,
    out: &mut dyn Write,
) -> Result<ExitCode, CliError> {
    let config = options.config()?;
    info!(
        specs = %specs_path.display(),
        document = %document_path.display(),
        mode = %config.mode,
        "Validating document"
    );

    let specs = match load_specs(specs_path, &config, quiet, options.format, out)? {
        Some(specs) => specs,
        None => return Ok(ExitCode::InvalidInput),
    };

    let document = std::fs::read_to_string(document_path)
        .map_err(|e| CliError::file_error(document_path, e))?;

    // parsed here so fail-fast conformance errors land in the report
    let value: Value = serde_json::from_str(&document).map_err(document_validator::Error::from)?;
    let mut findings = Findings::from_config(&config);
    let object = value_to_object_with(&value, &specs, &mut findings);

    let mut report = Report::from_findings("Document", &findings);
    if !findings.has_errors() {
        report = report.with_document(normalize(&object, &specs, &config)?);
    }

    if !quiet {
        report.render(options.format, out)?;
    }

    Ok(ExitCode::from_validation_result(
        findings.has_errors(),
        findings.has_warnings(),
    ))
}

/// Validate the specs file, rendering its report when it is invalid
fn load_specs(
    path: &Path,
    config: &ValidatorConfig,
    quiet: bool,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<Option<Specs>, CliError> {
    let raw = read_specs_file(path)?;
    let mut findings = Findings::from_config(config);
    let specs = validate_specs_with(&raw, &mut findings);

    match specs {
        Some(specs) if !findings.has_errors() => Ok(Some(specs)),
        _ => {
            debug!(errors = findings.errors().len(), "Specs rejected");
            if !quiet {
                Report::from_findings("Specs", &findings).render(format, out)?;
            }
            Ok(None)
        }
    }
}

/// Convert an accepted object back to its JSON form
fn normalize(
    object: &document_validator::Object,
    specs: &Specs,
    config: &ValidatorConfig,
) -> Result<Value, CliError> {
    let mut findings = Findings::from_config(config);
    let value = object_to_value_with(object, specs, &mut findings);
    match findings.first_error() {
        Some(finding) => Err(CliError::InternalError(format!(
            "converted object was rejected: {}",
            finding
        ))),
        None => Ok(value),
    }
}

fn read_specs_file(path: &Path) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::file_error(path, e))?;
    parse_specs_file(path, &content)
}

/// Parse a specs description based on the file extension
pub fn parse_specs_file(path: &Path, content: &str) -> Result<Value, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(content)
            .map_err(|e| CliError::ParseError(format!("Invalid JSON in '{}': {}", path.display(), e))),
        "yaml" | "yml" => serde_yaml::from_str(content)
            .map_err(|e| CliError::ParseError(format!("Invalid YAML in '{}': {}", path.display(), e))),
        _ => Err(CliError::InvalidInput(format!(
            "Unsupported file format: '{}'. Use .json, .yaml, or .yml",
            extension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    fn options(lazy: bool, format: OutputFormat) -> ValidationArgs {
        ValidationArgs {
            lazy,
            max_depth: None,
            format,
        }
    }

    #[test]
    fn test_cli_definition() {
        DocvalCli::command().debug_assert();
    }

    #[test]
    fn test_parse_cli_arguments() {
        let cli = DocvalCli::parse_from([
            "docval", "-vv", "validate", "--specs", "s.yaml", "--document", "d.json", "--lazy",
            "--format", "json",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            DocvalCommands::Validate { specs, document, options } => {
                assert_eq!(specs, PathBuf::from("s.yaml"));
                assert_eq!(document, PathBuf::from("d.json"));
                assert!(options.lazy);
                assert_eq!(options.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_specs() {
        let path = Path::new("specs.json");
        let value = parse_specs_file(path, r#"{"type": "flag"}"#).unwrap();
        assert_eq!(value["type"], "flag");
    }

    #[test]
    fn test_parse_yaml_specs() {
        let path = Path::new("specs.yaml");
        let content = "type: map\nfields:\n  port:\n    type: integer\n    minimum: 1\n";
        let value = parse_specs_file(path, content).unwrap();
        assert_eq!(value["fields"]["port"]["minimum"], 1);
    }

    #[test]
    fn test_unsupported_format() {
        let path = Path::new("specs.txt");
        let result = parse_specs_file(path, "content");
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_flags_override_config() {
        let args = ValidationArgs {
            lazy: true,
            max_depth: Some(3),
            format: OutputFormat::Table,
        };
        let config = args.config_from(ValidatorConfig::default()).unwrap();
        assert_eq!(config.mode, Mode::Lazy);
        assert_eq!(config.max_depth, 3);

        let config = ValidationArgs::default()
            .config_from(ValidatorConfig::lazy().with_max_depth(5))
            .unwrap();
        assert_eq!(config.mode, Mode::Lazy);
        assert_eq!(config.max_depth, 5);

        let zero = ValidationArgs {
            max_depth: Some(0),
            ..ValidationArgs::default()
        };
        assert!(matches!(
            zero.config_from(ValidatorConfig::default()),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_execute_check_reports_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("specs.json");
        fs::write(&path, r#"{"type": "list"}"#).unwrap();

        let mut out = Vec::new();
        let code = execute_check(&path, &options(false, OutputFormat::Json), false, &mut out).unwrap();
        assert_eq!(code, ExitCode::ValidationError);

        let report: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["valid"], false);
        assert_eq!(report["findings"][0]["message"], "'value' property is missing");
    }

    #[test]
    fn test_execute_check_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        let mut out = Vec::new();
        let err = execute_check(&path, &ValidationArgs::default(), false, &mut out).unwrap_err();
        assert!(matches!(err, CliError::FileError(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_execute_validate_prints_normalized_document() {
        let dir = TempDir::new().unwrap();
        let specs = dir.path().join("specs.yaml");
        let document = dir.path().join("document.json");
        fs::write(
            &specs,
            "type: map\nfields:\n  id:\n    type: integer\n  label:\n    type: string\n    option: true\n",
        )
        .unwrap();
        fs::write(&document, r#"{"id": 7}"#).unwrap();

        let mut out = Vec::new();
        let code = execute_validate(&specs, &document, &options(false, OutputFormat::Json), false, &mut out)
            .unwrap();
        assert_eq!(code, ExitCode::Success);

        let report: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["valid"], true);
        assert_eq!(report["document"], serde_json::json!({"id": 7, "label": null}));
    }

    #[test]
    fn test_execute_validate_rejects_invalid_specs() {
        let dir = TempDir::new().unwrap();
        let specs = dir.path().join("specs.json");
        let document = dir.path().join("document.json");
        fs::write(&specs, r#"{"type": "widget"}"#).unwrap();
        fs::write(&document, "true").unwrap();

        let mut out = Vec::new();
        let code = execute_validate(&specs, &document, &ValidationArgs::default(), true, &mut out).unwrap();
        assert_eq!(code, ExitCode::InvalidInput);
        assert!(out.is_empty());
    }
}
