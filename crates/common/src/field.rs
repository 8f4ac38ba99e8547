//! Form fields and their validators

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::email::{classify_email, EmailRejection};
use crate::mobile::{classify_mobile, MobileRejection};
use crate::national_number::{NationalNumber, NationalNumberRejection};

/// Input fields on the personal details page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Email,
    Mobile,
    NationalNumber,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Email, FormField::Mobile, FormField::NationalNumber];

    /// DOM id of the input element
    pub fn input_id(&self) -> &'static str {
        match self {
            FormField::Email => "email",
            FormField::Mobile => "mobile",
            FormField::NationalNumber => "nationalNumber",
        }
    }

    pub fn input_selector(&self) -> String {
        format!("#{}", self.input_id())
    }

    /// Selector of the inline error shown under the input
    pub fn error_selector(&self) -> String {
        format!("#{}-error-message", self.input_id())
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Email => write!(f, "email"),
            FormField::Mobile => write!(f, "mobile"),
            FormField::NationalNumber => write!(f, "national-number"),
        }
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(FormField::Email),
            "mobile" => Ok(FormField::Mobile),
            "national-number" | "national_number" | "nationalNumber" => {
                Ok(FormField::NationalNumber)
            }
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// Field-specific reason for a rejected candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Email(EmailRejection),
    Mobile(MobileRejection),
    NationalNumber(NationalNumberRejection),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Email(reason) => reason.fmt(f),
            Rejection::Mobile(reason) => reason.fmt(f),
            Rejection::NationalNumber(reason) => reason.fmt(f),
        }
    }
}

/// Outcome of checking one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum FieldVerdict {
    Accepted,
    Rejected { reason: Rejection },
}

impl FieldVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FieldVerdict::Accepted)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            FieldVerdict::Accepted => None,
            FieldVerdict::Rejected { reason } => Some(*reason),
        }
    }

    fn from_result<T, E>(result: Result<T, E>, wrap: impl FnOnce(E) -> Rejection) -> Self {
        match result {
            Ok(_) => FieldVerdict::Accepted,
            Err(reason) => FieldVerdict::Rejected { reason: wrap(reason) },
        }
    }
}

pub trait FieldValidator: Send + Sync {
    fn check(&self, candidate: &str) -> FieldVerdict;
}

pub struct EmailValidator;

impl FieldValidator for EmailValidator {
    fn check(&self, candidate: &str) -> FieldVerdict {
        FieldVerdict::from_result(classify_email(candidate), Rejection::Email)
    }
}

pub struct MobileValidator;

impl FieldValidator for MobileValidator {
    fn check(&self, candidate: &str) -> FieldVerdict {
        FieldVerdict::from_result(classify_mobile(candidate), Rejection::Mobile)
    }
}

pub struct NationalNumberValidator;

impl FieldValidator for NationalNumberValidator {
    fn check(&self, candidate: &str) -> FieldVerdict {
        FieldVerdict::from_result(NationalNumber::parse(candidate), Rejection::NationalNumber)
    }
}

impl FieldValidator for FormField {
    fn check(&self, candidate: &str) -> FieldVerdict {
        match self {
            FormField::Email => EmailValidator.check(candidate),
            FormField::Mobile => MobileValidator.check(candidate),
            FormField::NationalNumber => NationalNumberValidator.check(candidate),
        }
    }
}
