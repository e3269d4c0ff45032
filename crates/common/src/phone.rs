//! US phone number normalization.
//!
//! Numbers are stored and passed to the telephony provider in E.164 form,
//! constrained to US numbers: `+1` followed by 10 digits.

use derive_more::{Display, Error};

/// E.164 US number length, including the `+1` prefix.
pub const E164_LENGTH: usize = 12;

/// Provided value cannot be interpreted as a US phone number.
#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display(fmt = "invalid US phone number")]
pub struct InvalidPhoneNumber;

/// Normalize a free-form phone number input into E.164.
///
/// Accepts 10-digit numbers and 11-digit numbers with a leading `1`,
/// with any non-digit decoration (spaces, dashes, parentheses, `+`)
/// stripped beforehand.
///
/// ## Example
///
/// ```
/// use common::phone::e164;
///
/// assert_eq!(e164("(318) 259-9773").unwrap(), "+13182599773");
/// ```
pub fn e164(value: &str) -> Result<String, InvalidPhoneNumber> {
    let value = value.trim();

    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();

    if value.starts_with("+1") && digits.len() != 11 {
        return Err(InvalidPhoneNumber);
    }

    match digits.len() {
        11 if digits.starts_with('1') => Ok(format!("+{digits}")),
        11 => Err(InvalidPhoneNumber),
        10 => Ok(format!("+1{digits}")),
        _ => Err(InvalidPhoneNumber),
    }
}

/// Prettify an E.164 US number as `+1 (XXX) XXX XXXX`.
///
/// Values that are not 12 characters long are returned unchanged,
/// since there is nothing sensible to slice out of them.
pub fn pretty(number: &str) -> String {
    if number.len() != E164_LENGTH {
        return number.to_string();
    }

    let (country_code, rest) = number.split_at(2);
    let (area_code, rest) = rest.split_at(3);
    let (three, four) = rest.split_at(3);

    format!("{country_code} ({area_code}) {three} {four}")
}
