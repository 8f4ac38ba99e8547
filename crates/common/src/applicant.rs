//! Applicants and loan applications used by the flow scenarios

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::email::is_valid_email;
use crate::error::{Error, Result};
use crate::mobile::{classify_mobile, MobileNumber, MOBILE_PREFIX};
use crate::national_number::NationalNumber;

pub const DEFAULT_EMAIL_PROVIDER: &str = "tester.com";

/// Sequence number used for the approved-income application
pub const APPROVED_INCOME_SEQUENCE: u16 = 210;

/// Sequence number used for the low-income application
pub const LOW_INCOME_SEQUENCE: u16 = 211;

/// Personal details page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub email: String,
    pub mobile: MobileNumber,
    pub national_number: NationalNumber,
}

/// Employment radio option, by position in the list and `value` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupation {
    pub index: usize,
    pub value: String,
}

impl Occupation {
    pub fn student() -> Self {
        Self {
            index: 1,
            value: "Student".to_string(),
        }
    }
}

impl Default for Occupation {
    fn default() -> Self {
        Self::student()
    }
}

/// Income page, whole kronor per month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Economy {
    pub monthly_income: u32,
    pub monthly_house_cost: u32,
    pub transportation_cost: u32,
    pub other_loan_cost: u32,
}

impl Economy {
    /// Income with every cost left at zero
    pub fn income_only(monthly_income: u32) -> Self {
        Self {
            monthly_income,
            ..Self::default()
        }
    }

    /// Sum of the monthly costs
    pub fn total_costs(&self) -> u64 {
        u64::from(self.monthly_house_cost)
            + u64::from(self.transportation_cost)
            + u64::from(self.other_loan_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant: Applicant,
    #[serde(default)]
    pub occupation: Occupation,
    pub economy: Economy,
}

/// What the status page should show once the application is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutcome {
    Approved,
    NotApproved,
}

impl ExpectedOutcome {
    pub fn from_approved(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::NotApproved
        }
    }
}

/// Random but well-formed applicant data
pub struct ApplicantGenerator {
    rng: StdRng,
    provider: String,
}

impl ApplicantGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible generator
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            provider: DEFAULT_EMAIL_PROVIDER.to_string(),
        }
    }

    /// Domain used for generated email addresses
    pub fn with_provider(mut self, provider: &str) -> Result<Self> {
        if !is_valid_email(&format!("x@{provider}")) {
            return Err(Error::InvalidProvider(provider.to_string()));
        }
        self.provider = provider.to_string();
        Ok(self)
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// `07`, six random digits, then the two-digit `suffix`
    pub fn mobile(&mut self, suffix: &str) -> Result<MobileNumber> {
        let middle: u32 = self.rng.gen_range(0..=999_999);
        classify_mobile(&format!("{MOBILE_PREFIX}{middle:06}{suffix}"))
            .map_err(|_| Error::InvalidSuffix(suffix.to_string()))
    }

    pub fn email(&mut self) -> String {
        let length = self.rng.gen_range(6..=12);
        let local: String = (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{}@{}", local, self.provider)
    }

    pub fn applicant(&mut self, birth_date: &str, sequence: u16, mobile_suffix: &str) -> Result<Applicant> {
        let national_number = NationalNumber::from_birth_date(birth_date, sequence)?;
        let applicant = Applicant {
            email: self.email(),
            mobile: self.mobile(mobile_suffix)?,
            national_number,
        };
        debug!(
            national_number = %applicant.national_number,
            mobile = %applicant.mobile,
            "generated applicant"
        );
        Ok(applicant)
    }
}

impl Default for ApplicantGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldValidator, FormField};

    #[test]
    fn test_generated_applicant_passes_validators() {
        let mut generator = ApplicantGenerator::with_seed(7);
        for (birth_date, sequence, suffix) in [
            ("19990101", 210, "01"),
            ("19960101", 211, "02"),
            ("20020101", 210, "01"),
        ] {
            let applicant = generator.applicant(birth_date, sequence, suffix).unwrap();
            assert!(FormField::Email.check(&applicant.email).is_accepted());
            assert!(FormField::Mobile.check(applicant.mobile.as_str()).is_accepted());
            assert!(FormField::NationalNumber
                .check(applicant.national_number.as_str())
                .is_accepted());
            assert!(applicant.mobile.as_str().starts_with("07"));
            assert!(applicant.mobile.as_str().ends_with(suffix));
            assert!(applicant.email.ends_with("@tester.com"));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = ApplicantGenerator::with_seed(42);
        let mut b = ApplicantGenerator::with_seed(42);
        assert_eq!(a.email(), b.email());
        assert_eq!(a.mobile("01").unwrap(), b.mobile("01").unwrap());
    }

    #[test]
    fn test_bad_suffix() {
        let mut generator = ApplicantGenerator::with_seed(1);
        assert_eq!(
            generator.mobile("1"),
            Err(Error::InvalidSuffix("1".to_string()))
        );
        assert!(generator.mobile("ab").is_err());
        assert!(generator.mobile("123").is_err());
    }

    #[test]
    fn test_provider() {
        let generator = ApplicantGenerator::with_seed(1).with_provider("example.se").unwrap();
        assert_eq!(generator.provider(), "example.se");
        assert!(ApplicantGenerator::with_seed(1).with_provider("nodot").is_err());
    }

    #[test]
    fn test_economy() {
        let economy = Economy::income_only(30_000);
        assert_eq!(economy.monthly_income, 30_000);
        assert_eq!(economy.total_costs(), 0);
    }

    #[test]
    fn test_total_costs_do_not_overflow() {
        let economy = Economy {
            monthly_income: 0,
            monthly_house_cost: u32::MAX,
            transportation_cost: u32::MAX,
            other_loan_cost: 1,
        };
        assert_eq!(economy.total_costs(), 2 * u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_application_deserialising_validates_mobile() {
        let json = |mobile: &str| {
            format!(
                r#"{{"applicant":{{"email":"a@tester.com","mobile":"{mobile}","national_number":"9901010018"}},"economy":{{"monthly_income":30000,"monthly_house_cost":0,"transportation_cost":0,"other_loan_cost":0}}}}"#
            )
        };
        let application: LoanApplication = serde_json::from_str(&json("0701020304")).unwrap();
        assert_eq!(application.applicant.mobile.as_str(), "0701020304");
        assert_eq!(application.occupation, Occupation::student());
        assert!(serde_json::from_str::<LoanApplication>(&json("070102030")).is_err());
    }
}
