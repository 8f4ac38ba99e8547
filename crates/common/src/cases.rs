//! Data tables driving the field and application scenarios
//!
//! Each row records the candidate and the verdict the validators are
//! expected to give. The scenario builders derive the browser assertions
//! from the validators unless a row carries its own `ui_expected`, which is
//! what the live form shows when it is stricter than the validators.

use serde::Serialize;

use crate::field::{FieldValidator, FieldVerdict, FormField, Rejection};
use crate::mobile::MobileRejection;

/// Expected verdict for a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expected {
    Accepted,
    Rejected,
    /// Rejected with a specific mobile message
    RejectedMobile(MobileRejection),
}

impl Expected {
    /// The expectation a verdict satisfies most precisely
    pub fn of(verdict: &FieldVerdict) -> Self {
        match verdict {
            FieldVerdict::Accepted => Expected::Accepted,
            FieldVerdict::Rejected {
                reason: Rejection::Mobile(rejection),
            } => Expected::RejectedMobile(*rejection),
            FieldVerdict::Rejected { .. } => Expected::Rejected,
        }
    }

    pub fn matches(&self, verdict: &FieldVerdict) -> bool {
        match (self, verdict) {
            (Expected::Accepted, FieldVerdict::Accepted) => true,
            (Expected::Rejected, FieldVerdict::Rejected { .. }) => true,
            (
                Expected::RejectedMobile(expected),
                FieldVerdict::Rejected {
                    reason: Rejection::Mobile(actual),
                },
            ) => expected == actual,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldCase {
    pub field: FormField,
    pub candidate: &'static str,
    pub note: &'static str,
    pub expected: Expected,
    /// What the form shows, when it differs from `expected`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_expected: Option<Expected>,
}

impl FieldCase {
    pub fn verdict(&self) -> FieldVerdict {
        self.field.check(self.candidate)
    }

    /// Whether the validators agree with the recorded expectation
    pub fn agrees(&self) -> bool {
        self.expected.matches(&self.verdict())
    }

    /// Expected state of the field's inline error in the browser
    pub fn ui_expectation(&self) -> Expected {
        self.ui_expected.unwrap_or_else(|| Expected::of(&self.verdict()))
    }

    const fn on_form(self, shown: Expected) -> Self {
        FieldCase {
            ui_expected: Some(shown),
            ..self
        }
    }
}

const fn email(candidate: &'static str, note: &'static str, expected: Expected) -> FieldCase {
    FieldCase {
        field: FormField::Email,
        candidate,
        note,
        expected,
        ui_expected: None,
    }
}

const fn mobile(candidate: &'static str, note: &'static str, expected: Expected) -> FieldCase {
    FieldCase {
        field: FormField::Mobile,
        candidate,
        note,
        expected,
        ui_expected: None,
    }
}

const fn national(candidate: &'static str, note: &'static str, expected: Expected) -> FieldCase {
    FieldCase {
        field: FormField::NationalNumber,
        candidate,
        note,
        expected,
        ui_expected: None,
    }
}

pub const EMAIL_CASES: &[FieldCase] = &[
    email("test", "no @", Expected::Rejected),
    email("test@", "no domain", Expected::Rejected),
    email("test@tester", "no top-level domain", Expected::Rejected),
    email("test@tester.", "trailing dot", Expected::Rejected),
    email("test@.com", "no domain name", Expected::Rejected),
    email("test@tester.com", "valid", Expected::Accepted),
];

pub const MOBILE_CASES: &[FieldCase] = &[
    // the live form insists on the 07 prefix
    mobile("0501020304", "other prefix", Expected::Accepted)
        .on_form(Expected::RejectedMobile(MobileRejection::TooShortOrMissing)),
    mobile(
        "070102030",
        "nine digits",
        Expected::RejectedMobile(MobileRejection::TooShortOrMissing),
    ),
    mobile(
        "07010203045",
        "eleven digits",
        Expected::RejectedMobile(MobileRejection::TooLong),
    ),
    mobile(
        "test",
        "short word",
        Expected::RejectedMobile(MobileRejection::TooShortOrMissing),
    ),
    mobile(
        "070i020304",
        "letter at full length",
        Expected::RejectedMobile(MobileRejection::TooShortOrMissing),
    ),
    mobile(
        "testtesttest",
        "long word",
        Expected::RejectedMobile(MobileRejection::TooLong),
    ),
    mobile(
        "testtestte",
        "word at full length",
        Expected::RejectedMobile(MobileRejection::TooShortOrMissing),
    ),
    mobile("0701020304", "valid", Expected::Accepted),
];

pub const NATIONAL_NUMBER_CASES: &[FieldCase] = &[
    national("199901010015", "invalid checksum", Expected::Rejected),
    national("19990101001", "no checksum", Expected::Rejected),
    national("1999010100180", "one digit too many", Expected::Rejected),
    national("19990101-0015", "invalid checksum with hyphen", Expected::Rejected),
    national("19990101-001", "no checksum with hyphen", Expected::Rejected),
    national("19990101-00180", "one digit too many with hyphen", Expected::Rejected),
    national("199901010018", "valid 12 digit number", Expected::Accepted),
    national("9901010018", "valid 10 digit number", Expected::Accepted),
    national("19990101-0018", "valid 12 digit number with hyphen", Expected::Accepted),
    national("990101-0018", "valid 10 digit number with hyphen", Expected::Accepted),
];

/// Rows of one field's table
pub fn cases_for(field: FormField) -> &'static [FieldCase] {
    match field {
        FormField::Email => EMAIL_CASES,
        FormField::Mobile => MOBILE_CASES,
        FormField::NationalNumber => NATIONAL_NUMBER_CASES,
    }
}

/// Applicant birth dates and whether a 30 000 kr income gets approved
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BirthDateCase {
    pub birth_date: &'static str,
    pub note: &'static str,
    pub approved: bool,
}

pub const BIRTH_DATE_CASES: &[BirthDateCase] = &[
    BirthDateCase {
        birth_date: "20020101",
        note: "23 years old",
        approved: false,
    },
    BirthDateCase {
        birth_date: "19990101",
        note: "26 years old",
        approved: true,
    },
    BirthDateCase {
        birth_date: "19960101",
        note: "29 years old",
        approved: true,
    },
    BirthDateCase {
        birth_date: "19950101",
        note: "over 30 years old",
        approved: false,
    },
];
