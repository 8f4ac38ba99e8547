//! Checksum command

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use loanform_common::checksum::{append_checksum, calculate_checksum};

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ChecksumArgs {
    /// Digits to compute the check digit for, e.g. 990101210
    pub digits: String,
}

#[derive(Debug, Serialize)]
pub struct ChecksumDisplay {
    pub input: String,
    pub check_digit: u8,
    pub complete: String,
}

impl ChecksumDisplay {
    pub fn compute(digits: &str) -> Result<Self> {
        Ok(Self {
            input: digits.to_string(),
            check_digit: calculate_checksum(digits)?,
            complete: append_checksum(digits)?,
        })
    }
}

impl TableDisplay for ChecksumDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Input", "Check digit", "Complete"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.input.clone(),
            self.check_digit.to_string(),
            self.complete.clone(),
        ]
    }
}

pub fn execute(args: ChecksumArgs, format: OutputFormat) -> Result<()> {
    let display = ChecksumDisplay::compute(&args.digits)?;
    print_item(&display, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute() {
        let display = ChecksumDisplay::compute("990101210").unwrap();
        assert_eq!(display.check_digit, 5);
        assert_eq!(display.complete, "9901012105");
    }

    #[test]
    fn test_compute_rejects_hyphen() {
        let err = ChecksumDisplay::compute("990101-210").unwrap_err();
        assert!(err.to_string().contains("position 6"));
    }
}
