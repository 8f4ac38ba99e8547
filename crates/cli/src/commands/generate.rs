//! Generate command

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use loanform_common::applicant::{APPROVED_INCOME_SEQUENCE, DEFAULT_EMAIL_PROVIDER};
use loanform_common::{Applicant, ApplicantGenerator};

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct GenerateArgs {
    /// Birth date as YYYYMMDD or YYMMDD
    #[arg(short, long)]
    pub birth_date: String,

    /// Three-digit sequence number
    #[arg(long, default_value_t = APPROVED_INCOME_SEQUENCE)]
    pub sequence: u16,

    /// Last two digits of the mobile number
    #[arg(long, default_value = "01")]
    pub suffix: String,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Domain of the generated email address
    #[arg(long, default_value = DEFAULT_EMAIL_PROVIDER)]
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicantDisplay {
    #[serde(flatten)]
    pub applicant: Applicant,
    pub hyphenated: String,
    pub birth_date: Option<String>,
}

impl From<Applicant> for ApplicantDisplay {
    fn from(applicant: Applicant) -> Self {
        Self {
            hyphenated: applicant.national_number.hyphenated(),
            birth_date: applicant
                .national_number
                .birth_date()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            applicant,
        }
    }
}

impl TableDisplay for ApplicantDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["National number", "Birth date", "Mobile", "Email"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.hyphenated.clone(),
            self.birth_date.clone().unwrap_or_else(|| "-".to_string()),
            self.applicant.mobile.to_string(),
            self.applicant.email.clone(),
        ]
    }
}

pub fn generate(args: &GenerateArgs) -> Result<Applicant> {
    let generator = match args.seed {
        Some(seed) => ApplicantGenerator::with_seed(seed),
        None => ApplicantGenerator::new(),
    };
    let mut generator = generator.with_provider(&args.provider)?;
    Ok(generator.applicant(&args.birth_date, args.sequence, &args.suffix)?)
}

pub fn execute(args: GenerateArgs, format: OutputFormat) -> Result<()> {
    let applicant = generate(&args)?;
    print_item(&ApplicantDisplay::from(applicant), format)
}
