//! Validate command

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use loanform_common::{FieldValidator, FieldVerdict, FormField};

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ValidateArgs {
    /// Field rules to apply (email, mobile, national-number)
    pub field: FormField,

    /// Candidates to check
    #[arg(required = true)]
    pub candidates: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VerdictDisplay {
    pub field: String,
    pub candidate: String,
    #[serde(flatten)]
    pub verdict: FieldVerdict,
}

impl VerdictDisplay {
    pub fn check(field: FormField, candidate: &str) -> Self {
        Self {
            field: field.to_string(),
            candidate: candidate.to_string(),
            verdict: field.check(candidate),
        }
    }
}

impl TableDisplay for VerdictDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Field", "Candidate", "Verdict", "Reason"]
    }

    fn row(&self) -> Vec<String> {
        let (verdict, reason) = match self.verdict.rejection() {
            None => ("accepted".green().to_string(), String::new()),
            Some(reason) => ("rejected".red().to_string(), reason.to_string()),
        };
        vec![self.field.clone(), self.candidate.clone(), verdict, reason]
    }
}

/// Exits with status 1 when any candidate is rejected
pub fn execute(args: ValidateArgs, format: OutputFormat) -> Result<()> {
    let verdicts: Vec<VerdictDisplay> = args
        .candidates
        .iter()
        .map(|candidate| VerdictDisplay::check(args.field, candidate))
        .collect();

    print_list(&verdicts, format)?;

    if verdicts.iter().any(|v| !v.verdict.is_accepted()) {
        std::process::exit(1);
    }
    Ok(())
}
