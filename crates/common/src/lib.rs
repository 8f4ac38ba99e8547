//! loanform common library
//!
//! Checksum engine, field validators and applicant data shared by the
//! scenario runner and the CLI.

pub mod applicant;
pub mod cases;
pub mod checksum;
pub mod email;
pub mod error;
pub mod field;
pub mod mobile;
pub mod national_number;

// Re-export commonly used types
pub use applicant::{
    Applicant, ApplicantGenerator, Economy, ExpectedOutcome, LoanApplication, Occupation,
};
pub use checksum::{append_checksum, calculate_checksum};
pub use email::{classify_email, is_valid_email, EmailRejection};
pub use error::{Error, Result};
pub use field::{FieldValidator, FieldVerdict, FormField, Rejection};
pub use mobile::{classify_mobile, MobileNumber, MobileRejection};
pub use national_number::{is_valid_national_number, NationalNumber, NationalNumberRejection};

/// loanform version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
