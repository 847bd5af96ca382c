//! `okr validate`: check a dataset and report every finding.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use anyhow::Context;
use clap::Args;
use okr_core::Dataset;
use okr_core::config::EffectiveConfig;
use okr_core::dataset::{ValidationReport, ValidationWarning};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct Finding {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub source: String,
    pub valid: bool,
    pub objectives: usize,
    pub key_results: usize,
    pub errors: Vec<Finding>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidateOutput {
    pub fn new(source: String, dataset: &Dataset, report: ValidationReport) -> Self {
        Self {
            source,
            valid: report.is_valid(),
            objectives: dataset.objectives.len(),
            key_results: dataset.key_results.len(),
            errors: report
                .errors
                .iter()
                .map(|err| Finding {
                    code: err.error_code().to_string(),
                    message: err.to_string(),
                })
                .collect(),
            warnings: report.warnings,
        }
    }

    /// Whether the command should exit non-zero.
    pub fn fails(&self, strict: bool) -> bool {
        !self.valid || (strict && !self.warnings.is_empty())
    }
}

fn render_validate_human(out: &ValidateOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Dataset validation")?;
    pretty_kv(w, "Source", &out.source)?;
    pretty_kv(w, "Objectives", out.objectives.to_string())?;
    pretty_kv(w, "Key results", out.key_results.to_string())?;
    pretty_kv(
        w,
        "Result",
        if out.valid {
            "valid"
        } else {
            "invalid"
        },
    )?;
    if !out.errors.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Errors ({})", out.errors.len()))?;
        for finding in &out.errors {
            writeln!(w, "[{}] {}", finding.code, finding.message)?;
        }
    }
    if !out.warnings.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Warnings ({})", out.warnings.len()))?;
        for warning in &out.warnings {
            writeln!(w, "{warning}")?;
        }
    }
    Ok(())
}

fn render_validate_text(out: &ValidateOutput, w: &mut dyn Write) -> io::Result<()> {
    for finding in &out.errors {
        writeln!(w, "error\t{}\t{}", finding.code, finding.message)?;
    }
    for warning in &out.warnings {
        writeln!(w, "warning\t-\t{warning}")?;
    }
    writeln!(w, "{}", if out.valid { "ok" } else { "invalid" })
}

/// Execute `okr validate`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be parsed, has hard errors, or
/// has warnings under `--strict`.
pub fn run_validate(
    args: &ValidateArgs,
    output: OutputMode,
    config: &EffectiveConfig,
) -> anyhow::Result<()> {
    let dataset = config
        .dataset
        .read()
        .with_context(|| format!("reading dataset from {}", config.dataset))?;
    let report = dataset.validate();
    let out = ValidateOutput::new(config.dataset.to_string(), &dataset, report);
    render_mode(output, &out, render_validate_text, render_validate_human)?;
    if out.fails(args.strict) {
        anyhow::bail!(
            "dataset failed validation ({} errors, {} warnings)",
            out.errors.len(),
            out.warnings.len()
        );
    }
    Ok(())
}
