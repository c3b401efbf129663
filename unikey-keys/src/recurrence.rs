//! Thirteen-digit keys closed by a recurrence check digit.
//!
//! Keys render as `XXXX-XXXXX-XXXX`. The last digit is computed from the
//! twelve before it by folding `acc += (2 * acc) ^ digit` from a seed of 3.
//! The XOR acts on the accumulator's bits, so digit order matters.

use crate::digits::{expect_width, parse_digits};
use crate::error::{KeyError, KeyResult, Segment};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const PAYLOAD_LEN: usize = 12;
const SEED: u64 = 3;

/// Computes the check digit for a twelve-digit payload.
///
/// # Errors
///
/// Returns `MalformedLength` or `NotNumeric` if `payload` is not exactly
/// twelve ASCII digits.
pub fn check_digit(payload: &str) -> KeyResult<u8> {
    expect_width(payload, PAYLOAD_LEN, "12")?;
    parse_digits(payload, Segment::Payload)?;

    let acc = payload
        .bytes()
        .map(|b| u64::from(b - b'0'))
        .fold(SEED, |acc, digit| acc + ((2 * acc) ^ digit));
    Ok((acc % 10) as u8)
}

/// A thirteen-digit recurrence key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrenceKey {
    digits: String,
}

impl RecurrenceKey {
    /// Length of the bare digit string.
    pub const BARE_LENGTH: usize = 13;
    /// Length of the rendered key, separators included.
    pub const LENGTH: usize = 15;

    /// Parses either the bare or the separated form.
    ///
    /// Separator positions may hold any character.
    pub fn parse(text: &str) -> KeyResult<Self> {
        let chars: Vec<char> = text.trim().chars().collect();
        let digits: String = match chars.len() {
            Self::BARE_LENGTH => chars.iter().collect(),
            Self::LENGTH => chars[0..4]
                .iter()
                .chain(&chars[5..10])
                .chain(&chars[11..15])
                .collect(),
            found => {
                return Err(KeyError::MalformedLength {
                    expected: "13 or 15",
                    found,
                });
            }
        };
        parse_digits(&digits, Segment::Payload)?;
        Ok(Self { digits })
    }

    /// Parses `text` and checks the trailing digit.
    pub fn validate(text: &str) -> KeyResult<Self> {
        let key = Self::parse(text)?;
        key.check()?;
        Ok(key)
    }

    /// Recomputes the check digit and compares it with the stored one.
    pub fn check(&self) -> KeyResult<()> {
        expect_width(&self.digits, Self::BARE_LENGTH, "13")?;
        parse_digits(&self.digits, Segment::Payload)?;
        let expected = check_digit(self.payload())?;
        let found = self.check_digit_char();
        if found.to_digit(10) != Some(u32::from(expected)) {
            return Err(KeyError::BadCheckDigit {
                segment: Segment::Payload,
                found: found.to_string(),
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    /// Generates a random key, keeping a twelve-digit `preset_payload` if
    /// given.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, preset_payload: Option<&str>) -> KeyResult<Self> {
        let payload = match preset_payload {
            Some(payload) => payload.to_string(),
            None => format!("{:012}", rng.gen_range(0..1_000_000_000_000u64)),
        };
        let digit = check_digit(&payload)?;

        let key = Self {
            digits: format!("{payload}{digit}"),
        };
        debug!(key = %key, "generated recurrence key");
        Ok(key)
    }

    /// Returns the thirteen digits without separators.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Returns the twelve digits the check digit is computed from.
    #[must_use]
    pub fn payload(&self) -> &str {
        self.digits.get(..PAYLOAD_LEN).unwrap_or(&self.digits)
    }

    fn check_digit_char(&self) -> char {
        self.digits.chars().last().unwrap_or_default()
    }
}

impl fmt::Display for RecurrenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            self.digits.get(0..4),
            self.digits.get(4..9),
            self.digits.get(9..13),
        ) {
            (Some(a), Some(b), Some(c)) => write!(f, "{a}-{b}-{c}"),
            _ => f.write_str(&self.digits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_payload_keeps_the_seed() {
        // 3 * 3^12 = 1594323
        assert_eq!(check_digit("000000000000"), Ok(3));
    }

    #[test]
    fn short_payload_is_rejected() {
        assert!(matches!(
            check_digit("123"),
            Err(KeyError::MalformedLength { found: 3, .. })
        ));
    }
}
