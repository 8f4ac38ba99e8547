//! Check digit for national identity numbers
//!
//! Every digit is multiplied by an alternating weight of 2, 1, 2, 1, ...
//! starting at the leftmost position. Products above 9 have 9 subtracted
//! (the same as summing the product's two digits). The check digit is the
//! distance from the sum up to the next multiple of ten, so it is 0 when the
//! sum already is one.

use crate::error::{Error, Result};

/// Parse a string of ASCII decimal digits into digit values.
///
/// Fails on the first character that is not `0`-`9`, hyphens included.
pub fn parse_digits(digits: &str) -> Result<Vec<u8>> {
    if digits.is_empty() {
        return Err(Error::EmptyInput);
    }

    digits
        .chars()
        .enumerate()
        .map(|(position, found)| match found.to_digit(10) {
            Some(digit) => Ok(digit as u8),
            None => Err(Error::InvalidInput { position, found }),
        })
        .collect()
}

/// Check digit over already parsed digit values (each in `0..=9`).
pub(crate) fn checksum_of(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(index, &digit)| {
            let weighted = u32::from(digit) * (2 - (index as u32 % 2));
            if weighted > 9 {
                weighted - 9
            } else {
                weighted
            }
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

/// Compute the check digit for a string of decimal digits.
///
/// ```
/// use loanform_common::checksum::calculate_checksum;
///
/// assert_eq!(calculate_checksum("990101001").unwrap(), 8);
/// ```
pub fn calculate_checksum(digits: &str) -> Result<u8> {
    let values = parse_digits(digits)?;
    Ok(checksum_of(&values))
}

/// Return `prefix` with its check digit appended.
pub fn append_checksum(prefix: &str) -> Result<String> {
    let check = calculate_checksum(prefix)?;
    let mut complete = String::with_capacity(prefix.len() + 1);
    complete.push_str(prefix);
    complete.push(char::from(b'0' + check));
    Ok(complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::national_number::is_valid_national_number;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("990101001", 8 ; "valid fixture number")]
    #[test_case("990101210", 5 ; "sequence 210 born 1999")]
    #[test_case("990101211", 3 ; "sequence 211 born 1999")]
    #[test_case("020101210", 1 ; "sequence 210 born 2002")]
    #[test_case("0", 0 ; "single zero")]
    #[test_case("91", 0 ; "weighted sum already a multiple of ten")]
    #[test_case("811228987", 4 ; "published example")]
    fn test_known_check_digits(digits: &str, expected: u8) {
        assert_eq!(calculate_checksum(digits).unwrap(), expected);
    }

    #[test]
    fn test_weights_start_at_two() {
        // 9 * 2 = 18 -> 9, so the sum is 9 and the check digit 1
        assert_eq!(calculate_checksum("9").unwrap(), 1);
        // 0 * 2 + 9 * 1 = 9
        assert_eq!(calculate_checksum("09").unwrap(), 1);
    }

    #[test]
    fn test_rejects_non_digits() {
        assert_eq!(
            calculate_checksum("990101-001"),
            Err(Error::InvalidInput { position: 6, found: '-' })
        );
        assert_eq!(
            calculate_checksum("07a"),
            Err(Error::InvalidInput { position: 2, found: 'a' })
        );
        assert_eq!(calculate_checksum(""), Err(Error::EmptyInput));
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        // Arabic-Indic digit three
        assert!(calculate_checksum("12\u{0663}").is_err());
    }

    #[test]
    fn test_append_checksum() {
        assert_eq!(append_checksum("990101001").unwrap(), "9901010018");
        assert_eq!(append_checksum("990101210").unwrap(), "9901012105");
    }

    proptest! {
        #[test]
        fn check_digit_is_single_digit(digits in "[0-9]{1,24}") {
            let check = calculate_checksum(&digits).unwrap();
            prop_assert!(check <= 9);
        }

        #[test]
        fn wrong_check_digit_never_validates(body in "[0-9]{9}", offset in 1u8..=9) {
            let check = calculate_checksum(&body).unwrap();
            let wrong = (check + offset) % 10;
            let candidate = format!("{body}{wrong}");
            prop_assert!(!is_valid_national_number(&candidate));
        }

        #[test]
        fn round_trip_validates_both_lengths(
            century in "(19|20)",
            body in "[0-9]{9}",
        ) {
            let short = append_checksum(&body).unwrap();
            let long = format!("{century}{short}");
            prop_assert!(is_valid_national_number(&short));
            prop_assert!(is_valid_national_number(&long));
        }

        #[test]
        fn hyphen_does_not_change_verdict(digits in "([0-9]{2})?[0-9]{10}") {
            let split = digits.len() - 4;
            let hyphenated = format!("{}-{}", &digits[..split], &digits[split..]);
            prop_assert_eq!(
                is_valid_national_number(&digits),
                is_valid_national_number(&hyphenated)
            );
        }
    }
}
