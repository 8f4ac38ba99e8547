//! Mobile numbers
//!
//! The form accepts exactly ten digit characters. Anything longer is "too
//! long"; anything shorter, empty, or holding a non-digit falls into the
//! same "please provide your mobile number" bucket, even at full length.
//! The `07` prefix is conventional and not checked.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Characters in a mobile number
pub const MOBILE_LEN: usize = 10;

/// Conventional prefix of Swedish mobile numbers
pub const MOBILE_PREFIX: &str = "07";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileRejection {
    /// Shorter than ten characters, empty, or not all digits
    TooShortOrMissing,
    /// Longer than ten characters
    TooLong,
}

impl fmt::Display for MobileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShortOrMissing => write!(f, "please provide your mobile number"),
            Self::TooLong => write!(f, "please enter {} characters", MOBILE_LEN),
        }
    }
}

impl std::error::Error for MobileRejection {}

/// A mobile number the form accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MobileNumber {
    type Error = MobileRejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        classify_mobile(&value)
    }
}

impl From<MobileNumber> for String {
    fn from(number: MobileNumber) -> Self {
        number.0
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classify a mobile number candidate.
///
/// Length is measured in characters, and the too-long check wins over the
/// digit check: `testtesttest` is [`MobileRejection::TooLong`].
pub fn classify_mobile(raw: &str) -> Result<MobileNumber, MobileRejection> {
    let length = raw.chars().count();

    if length > MOBILE_LEN {
        return Err(MobileRejection::TooLong);
    }

    if length < MOBILE_LEN || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(MobileRejection::TooShortOrMissing);
    }

    Ok(MobileNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0501020304", None ; "other prefix is accepted")]
    #[test_case("070102030", Some(MobileRejection::TooShortOrMissing) ; "nine digits")]
    #[test_case("07010203045", Some(MobileRejection::TooLong) ; "eleven digits")]
    #[test_case("test", Some(MobileRejection::TooShortOrMissing) ; "short word")]
    #[test_case("070i020304", Some(MobileRejection::TooShortOrMissing) ; "letter at full length")]
    #[test_case("testtesttest", Some(MobileRejection::TooLong) ; "long word")]
    #[test_case("testtestte", Some(MobileRejection::TooShortOrMissing) ; "word at full length")]
    #[test_case("", Some(MobileRejection::TooShortOrMissing) ; "empty")]
    #[test_case("0701020304", None ; "valid")]
    fn test_classify(raw: &str, expected: Option<MobileRejection>) {
        assert_eq!(classify_mobile(raw).err(), expected);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // ten characters, twelve bytes
        assert_eq!(
            classify_mobile("07010203ää"),
            Err(MobileRejection::TooShortOrMissing)
        );
    }

    #[test]
    fn test_serde_validates() {
        let number: MobileNumber = serde_json::from_str("\"0701020304\"").unwrap();
        assert_eq!(number.as_str(), "0701020304");
        assert_eq!(serde_json::to_string(&number).unwrap(), "\"0701020304\"");

        let err = serde_json::from_str::<MobileNumber>("\"07010203045\"").unwrap_err();
        assert!(err.to_string().contains("please enter 10 characters"));
        assert!(serde_json::from_str::<MobileNumber>("\"test\"").is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            MobileRejection::TooShortOrMissing.to_string(),
            "please provide your mobile number"
        );
        assert_eq!(MobileRejection::TooLong.to_string(), "please enter 10 characters");
    }
}
