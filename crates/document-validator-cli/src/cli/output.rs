//! Output formatting for validation reports

use std::io::Write;

use clap::ValueEnum;
use colored::Colorize;
use document_validator::{Finding, Findings, Mode, Severity};
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Report of one validation run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub valid: bool,
    pub mode: Mode,
    pub error_count: usize,
    pub warning_count: usize,
    /// Errors first, then warnings, each in walk order
    pub findings: Vec<Finding>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
}

impl Report {
    /// Build a report for `subject` (`Specs` or `Document`) from collected findings
    pub fn from_findings(subject: &str, findings: &Findings) -> Self {
        let error_count = findings.errors().len();
        let warning_count = findings.warnings().len();

        let summary = if error_count > 0 {
            format!(
                "{} rejected: {} error(s), {} warning(s)",
                subject, error_count, warning_count
            )
        } else if warning_count > 0 {
            format!("{} accepted with {} warning(s)", subject, warning_count)
        } else {
            format!("{} accepted", subject)
        };

        Self {
            valid: error_count == 0,
            mode: findings.mode(),
            error_count,
            warning_count,
            findings: findings
                .errors()
                .iter()
                .chain(findings.warnings())
                .cloned()
                .collect(),
            summary,
            document: None,
        }
    }

    /// Attach the normalized document
    pub fn with_document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }

    /// Render the report in the specified format
    pub fn render(&self, format: OutputFormat, out: &mut dyn Write) -> Result<(), CliError> {
        match format {
            OutputFormat::Json => self.render_json(out),
            OutputFormat::Yaml => self.render_yaml(out),
            OutputFormat::Table => self.render_table(out),
        }
    }

    fn render_json(&self, out: &mut dyn Write) -> Result<(), CliError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CliError::SerializationError(e.to_string()))?;
        writeln!(out, "{}", json)?;
        Ok(())
    }

    fn render_yaml(&self, out: &mut dyn Write) -> Result<(), CliError> {
        let yaml =
            serde_yaml::to_string(self).map_err(|e| CliError::SerializationError(e.to_string()))?;
        write!(out, "{}", yaml)?;
        Ok(())
    }

    fn render_table(&self, out: &mut dyn Write) -> Result<(), CliError> {
        writeln!(out)?;
        writeln!(out, "{}", "Validation Results".cyan().bold())?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out)?;

        let status_icon = if self.valid { "+".green() } else { "x".red() };
        let status_text = if self.valid {
            "VALID".green().bold()
        } else {
            "INVALID".red().bold()
        };
        writeln!(out, "  Status: {} {}", status_icon, status_text)?;
        writeln!(out, "  Mode: {}", self.mode)?;
        writeln!(out)?;

        writeln!(out, "{}", "Statistics".cyan())?;
        writeln!(out, "{}", "-".repeat(40))?;
        writeln!(out, "  Errors:   {}", self.error_count.to_string().red())?;
        writeln!(out, "  Warnings: {}", self.warning_count.to_string().yellow())?;
        writeln!(out)?;

        if !self.findings.is_empty() {
            writeln!(out, "{}", "Findings".cyan())?;
            writeln!(out, "{}", "-".repeat(40))?;
            for finding in &self.findings {
                render_table_row(out, finding)?;
            }
            writeln!(out)?;
        }

        if let Some(document) = &self.document {
            writeln!(out, "{}", "Normalized Document".cyan())?;
            writeln!(out, "{}", "-".repeat(40))?;
            let pretty = serde_json::to_string_pretty(document)
                .map_err(|e| CliError::SerializationError(e.to_string()))?;
            writeln!(out, "{}", pretty)?;
            writeln!(out)?;
        }

        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "  {}", self.summary.bold())?;
        writeln!(out)?;
        Ok(())
    }
}

fn render_table_row(out: &mut dyn Write, finding: &Finding) -> Result<(), CliError> {
    let (icon, label) = match finding.severity {
        Severity::Error => ("x".red(), "ERROR".red().bold()),
        Severity::Warning => ("!".yellow(), "WARNING".yellow().bold()),
    };
    writeln!(out, "  {} [{}] {}", icon, label, finding.message)?;
    writeln!(out, "      {} {}", "Path:".dimmed(), finding.path.to_string().cyan())?;
    Ok(())
}
