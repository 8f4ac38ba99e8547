//! National identity numbers
//!
//! Accepted shapes are `YYMMDDSSSC` and `YYYYMMDDSSSC`, each optionally
//! written with a hyphen in front of the last four digits. Only the last ten
//! digits take part in checksum verification, so the century prefix never
//! changes the verdict.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::checksum::{calculate_checksum, checksum_of, parse_digits};
use crate::error::{Error, Result};

/// Digits in the canonical form (`YYMMDD` + `SSS` + `C`)
pub const CANONICAL_LEN: usize = 10;

/// Digits in the long form (`YYYYMMDD` + `SSS` + `C`)
pub const FULL_LEN: usize = 12;

const SEPARATOR: char = '-';

/// Digits that follow the separator
const TAIL_LEN: usize = 4;

/// Why a candidate is not a national identity number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NationalNumberRejection {
    MultipleSeparators,
    NonDigit { position: usize, found: char },
    WrongLength { digits: usize },
    MisplacedSeparator,
    ChecksumMismatch { expected: u8, found: u8 },
}

impl fmt::Display for NationalNumberRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleSeparators => write!(f, "more than one hyphen"),
            Self::NonDigit { position, found } => {
                write!(f, "unexpected character {:?} at position {}", found, position)
            }
            Self::WrongLength { digits } => {
                write!(f, "{} digits, expected {} or {}", digits, CANONICAL_LEN, FULL_LEN)
            }
            Self::MisplacedSeparator => {
                write!(f, "hyphen must come right before the last {} digits", TAIL_LEN)
            }
            Self::ChecksumMismatch { expected, found } => {
                write!(f, "check digit is {}, expected {}", found, expected)
            }
        }
    }
}

impl std::error::Error for NationalNumberRejection {}

/// A national identity number whose check digit has been verified
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalNumber {
    /// 10 or 12 digits, no separator
    digits: String,
}

impl NationalNumber {
    /// Classify a candidate, returning the verified number or the first rule
    /// it breaks.
    pub fn parse(raw: &str) -> std::result::Result<Self, NationalNumberRejection> {
        if raw.matches(SEPARATOR).count() > 1 {
            return Err(NationalNumberRejection::MultipleSeparators);
        }

        let mut digits = String::with_capacity(FULL_LEN);
        let mut digits_before_separator = None;

        for (position, found) in raw.chars().enumerate() {
            if found == SEPARATOR {
                digits_before_separator = Some(digits.len());
            } else if found.is_ascii_digit() {
                digits.push(found);
            } else {
                return Err(NationalNumberRejection::NonDigit { position, found });
            }
        }

        if digits.len() != CANONICAL_LEN && digits.len() != FULL_LEN {
            return Err(NationalNumberRejection::WrongLength {
                digits: digits.len(),
            });
        }

        if let Some(before) = digits_before_separator {
            if digits.len() - before != TAIL_LEN {
                return Err(NationalNumberRejection::MisplacedSeparator);
            }
        }

        let canonical: Vec<u8> = digits[digits.len() - CANONICAL_LEN..]
            .bytes()
            .map(|b| b - b'0')
            .collect();
        let expected = checksum_of(&canonical[..CANONICAL_LEN - 1]);
        let found = canonical[CANONICAL_LEN - 1];

        if expected != found {
            return Err(NationalNumberRejection::ChecksumMismatch { expected, found });
        }

        Ok(Self { digits })
    }

    /// Build a valid number from a birth date (`YYYYMMDD` or `YYMMDD`) and a
    /// three-digit sequence number. The check digit is computed over the
    /// canonical part only.
    pub fn from_birth_date(birth_date: &str, sequence: u16) -> Result<Self> {
        let date_digits = parse_digits(birth_date)?;
        let format = match date_digits.len() {
            8 => "%Y%m%d",
            6 => "%y%m%d",
            _ => {
                return Err(Error::InvalidBirthDate(format!(
                    "{birth_date}: expected YYYYMMDD or YYMMDD"
                )))
            }
        };
        NaiveDate::parse_from_str(birth_date, format)
            .map_err(|e| Error::InvalidBirthDate(format!("{birth_date}: {e}")))?;

        if sequence > 999 {
            return Err(Error::InvalidSequence(sequence));
        }

        let mut digits = format!("{birth_date}{sequence:03}");
        let check = calculate_checksum(&digits[digits.len() - (CANONICAL_LEN - 1)..])?;
        digits.push(char::from(b'0' + check));

        Ok(Self { digits })
    }

    /// Last ten digits, the part the checksum covers
    pub fn canonical(&self) -> &str {
        &self.digits[self.digits.len() - CANONICAL_LEN..]
    }

    /// Two-digit century, present only for the long form
    pub fn century(&self) -> Option<&str> {
        (self.digits.len() == FULL_LEN).then(|| &self.digits[..2])
    }

    /// Birth date digits as written (`YYYYMMDD` or `YYMMDD`)
    pub fn date_part(&self) -> &str {
        &self.digits[..self.digits.len() - TAIL_LEN]
    }

    pub fn sequence(&self) -> u16 {
        self.canonical()[6..9]
            .bytes()
            .fold(0, |acc, b| acc * 10 + u16::from(b - b'0'))
    }

    pub fn check_digit(&self) -> u8 {
        self.digits.as_bytes()[self.digits.len() - 1] - b'0'
    }

    /// Birth date, known only when the number carries its century.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.century()?;
        NaiveDate::parse_from_str(self.date_part(), "%Y%m%d").ok()
    }

    /// Age in whole years on `on`
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        on.years_since(self.birth_date()?)
    }

    /// Digits without separator, as typed into the form
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Same number with the hyphen before the last four digits
    pub fn hyphenated(&self) -> String {
        let split = self.digits.len() - TAIL_LEN;
        format!("{}{}{}", &self.digits[..split], SEPARATOR, &self.digits[split..])
    }
}

impl fmt::Display for NationalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl FromStr for NationalNumber {
    type Err = NationalNumberRejection;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NationalNumber {
    type Error = NationalNumberRejection;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NationalNumber> for String {
    fn from(number: NationalNumber) -> Self {
        number.digits
    }
}

/// Whether `raw` is a well-formed national identity number with a matching
/// check digit.
pub fn is_valid_national_number(raw: &str) -> bool {
    NationalNumber::parse(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("199901010015", false ; "invalid checksum")]
    #[test_case("19990101001", false ; "missing checksum")]
    #[test_case("1999010100180", false ; "one digit too many")]
    #[test_case("19990101-0015", false ; "invalid checksum with hyphen")]
    #[test_case("19990101-001", false ; "missing checksum with hyphen")]
    #[test_case("19990101-00180", false ; "one digit too many with hyphen")]
    #[test_case("199901010018", true ; "valid long form")]
    #[test_case("9901010018", true ; "valid short form")]
    #[test_case("19990101-0018", true ; "valid long form with hyphen")]
    #[test_case("990101-0018", true ; "valid short form with hyphen")]
    fn test_fixture_numbers(raw: &str, expected: bool) {
        assert_eq!(is_valid_national_number(raw), expected);
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(
            NationalNumber::parse("199901010015"),
            Err(NationalNumberRejection::ChecksumMismatch { expected: 8, found: 5 })
        );
        assert_eq!(
            NationalNumber::parse("19990101001"),
            Err(NationalNumberRejection::WrongLength { digits: 11 })
        );
        assert_eq!(
            NationalNumber::parse("990101--0018"),
            Err(NationalNumberRejection::MultipleSeparators)
        );
        assert_eq!(
            NationalNumber::parse("99010-10018"),
            Err(NationalNumberRejection::MisplacedSeparator)
        );
        assert_eq!(
            NationalNumber::parse("990101+0018"),
            Err(NationalNumberRejection::NonDigit { position: 6, found: '+' })
        );
        assert_eq!(
            NationalNumber::parse(""),
            Err(NationalNumberRejection::WrongLength { digits: 0 })
        );
    }

    #[test]
    fn test_hyphen_does_not_change_verdict() {
        for raw in ["199901010018", "199901010015", "9901010018", "9901010011"] {
            let number_len = raw.len();
            let hyphenated = format!("{}-{}", &raw[..number_len - 4], &raw[number_len - 4..]);
            assert_eq!(
                is_valid_national_number(raw),
                is_valid_national_number(&hyphenated),
                "{raw} vs {hyphenated}"
            );
        }
    }

    #[test]
    fn test_century_is_ignored() {
        assert!(is_valid_national_number("209901010018"));
        assert!(is_valid_national_number("189901010018"));
    }

    #[test]
    fn test_accessors() {
        let number = NationalNumber::parse("19990101-0018").unwrap();
        assert_eq!(number.as_str(), "199901010018");
        assert_eq!(number.canonical(), "9901010018");
        assert_eq!(number.century(), Some("19"));
        assert_eq!(number.date_part(), "19990101");
        assert_eq!(number.sequence(), 1);
        assert_eq!(number.check_digit(), 8);
        assert_eq!(number.hyphenated(), "19990101-0018");
        assert_eq!(number.birth_date(), NaiveDate::from_ymd_opt(1999, 1, 1));

        let short = NationalNumber::parse("9901010018").unwrap();
        assert_eq!(short.century(), None);
        assert_eq!(short.birth_date(), None);
        assert_eq!(short.hyphenated(), "990101-0018");
    }

    #[test]
    fn test_age_on() {
        let number = NationalNumber::parse("199901010018").unwrap();
        let on = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(number.age_on(on), Some(26));
    }

    #[test]
    fn test_from_birth_date() {
        let number = NationalNumber::from_birth_date("19990101", 210).unwrap();
        assert_eq!(number.as_str(), "199901012105");
        assert!(is_valid_national_number(number.as_str()));

        let number = NationalNumber::from_birth_date("990101", 1).unwrap();
        assert_eq!(number.as_str(), "9901010018");

        let number = NationalNumber::from_birth_date("20020101", 210).unwrap();
        assert_eq!(number.as_str(), "200201012101");
    }

    #[test]
    fn test_from_birth_date_rejects_bad_input() {
        assert!(matches!(
            NationalNumber::from_birth_date("19991301", 210),
            Err(Error::InvalidBirthDate(_))
        ));
        assert!(matches!(
            NationalNumber::from_birth_date("1999011", 210),
            Err(Error::InvalidBirthDate(_))
        ));
        assert_eq!(
            NationalNumber::from_birth_date("19990101", 1000),
            Err(Error::InvalidSequence(1000))
        );
        assert!(matches!(
            NationalNumber::from_birth_date("1999-01-01", 210),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_serde_validates() {
        let number: NationalNumber = serde_json::from_str("\"990101-0018\"").unwrap();
        assert_eq!(serde_json::to_string(&number).unwrap(), "\"9901010018\"");
        assert!(serde_json::from_str::<NationalNumber>("\"9901010015\"").is_err());
    }
}
