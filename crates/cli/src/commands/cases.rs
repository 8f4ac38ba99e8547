//! Cases command: the built-in data tables and how the validators judge them

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use loanform_common::cases::{cases_for, Expected, FieldCase};
use loanform_common::{FieldVerdict, FormField};

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct CasesArgs {
    /// Only show this field's table
    #[arg(short, long)]
    pub field: Option<FormField>,
}

#[derive(Debug, Serialize)]
pub struct CaseDisplay {
    pub field: FormField,
    pub candidate: &'static str,
    pub note: &'static str,
    pub expected: Expected,
    /// What the browser scenario asserts
    pub on_form: Expected,
    pub verdict: FieldVerdict,
    pub agrees: bool,
}

impl From<&FieldCase> for CaseDisplay {
    fn from(case: &FieldCase) -> Self {
        Self {
            field: case.field,
            candidate: case.candidate,
            note: case.note,
            expected: case.expected,
            on_form: case.ui_expectation(),
            verdict: case.verdict(),
            agrees: case.agrees(),
        }
    }
}

impl TableDisplay for CaseDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Field", "Candidate", "Note", "Verdict", "Agrees"]
    }

    fn row(&self) -> Vec<String> {
        let verdict = match self.verdict.rejection() {
            None => "accepted".to_string(),
            Some(reason) => format!("rejected: {}", reason),
        };
        let agrees = if self.agrees {
            "yes".green().to_string()
        } else {
            "NO".red().bold().to_string()
        };
        vec![
            self.field.to_string(),
            self.candidate.to_string(),
            self.note.to_string(),
            verdict,
            agrees,
        ]
    }
}

pub fn collect(field: Option<FormField>) -> Vec<CaseDisplay> {
    let fields = match field {
        Some(field) => vec![field],
        None => FormField::ALL.to_vec(),
    };
    fields
        .into_iter()
        .flat_map(|field| cases_for(field).iter().map(CaseDisplay::from))
        .collect()
}

pub fn execute(args: CasesArgs, format: OutputFormat) -> Result<()> {
    print_list(&collect(args.field), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_all() {
        let cases = collect(None);
        assert_eq!(cases.len(), 24);
        assert!(cases.iter().all(|c| c.agrees));
    }

    #[test]
    fn test_collect_one_field() {
        let cases = collect(Some(FormField::Email));
        assert_eq!(cases.len(), 6);
        assert_eq!(cases[5].candidate, "test@tester.com");
        assert!(cases[5].verdict.is_accepted());
        assert_eq!(cases[5].on_form, Expected::Accepted);
    }

    #[test]
    fn test_form_expectation_can_differ() {
        let cases = collect(Some(FormField::Mobile));
        assert_eq!(cases[0].candidate, "0501020304");
        assert!(cases[0].agrees);
        assert!(cases[0].verdict.is_accepted());
        assert_eq!(
            cases[0].on_form,
            Expected::RejectedMobile(loanform_common::MobileRejection::TooShortOrMissing)
        );
    }
}
