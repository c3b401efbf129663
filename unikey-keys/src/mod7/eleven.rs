//! Eleven-digit retail keys (`SSSD-NNNNNNN`).

use super::{check_checksum, sample_checksum};
use crate::digits::{expect_width, fixed_chars, parse_digits, slice};
use crate::error::{KeyError, KeyResult, Segment};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Returns the two digits that may follow `base` in a key head.
///
/// The fourth digit is the third plus one or two, wrapping past nine.
#[must_use]
pub fn derived_digits(base: u8) -> [u8; 2] {
    [(base + 1) % 10, (base + 2) % 10]
}

/// An eleven-digit key: a four-digit head and a seven-digit serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElevenDigitKey {
    head: String,
    serial: String,
}

impl ElevenDigitKey {
    /// Length of the rendered key, separator included.
    pub const LENGTH: usize = 12;

    /// Builds a key from its segments, checking only their shape.
    pub fn from_segments(head: &str, serial: &str) -> KeyResult<Self> {
        expect_width(head, 4, "4")?;
        parse_digits(head, Segment::Head)?;
        expect_width(serial, 7, "7")?;
        parse_digits(serial, Segment::Serial)?;

        Ok(Self {
            head: head.to_string(),
            serial: serial.to_string(),
        })
    }

    /// Parses `SSSD-NNNNNNN` without checking any invariant.
    pub fn parse(text: &str) -> KeyResult<Self> {
        let chars = fixed_chars(text, Self::LENGTH, "12")?;
        Self::from_segments(&slice(&chars, 0, 4), &slice(&chars, 5, 12))
    }

    /// Parses `text` and checks every invariant.
    pub fn validate(text: &str) -> KeyResult<Self> {
        let key = Self::parse(text)?;
        key.check()?;
        Ok(key)
    }

    /// Checks the derived digit, check digit and digit sum, in that order.
    pub fn check(&self) -> KeyResult<()> {
        let head = parse_digits(&self.head, Segment::Head)?;
        let base = (head / 10 % 10) as u8;
        let derived = (head % 10) as u8;
        if !derived_digits(base).contains(&derived) {
            return Err(KeyError::BadDerivedDigit {
                base,
                found: derived,
            });
        }

        let serial = parse_digits(&self.serial, Segment::Serial)?;
        check_checksum(serial, Segment::Serial, true)
    }

    /// Generates a random key, keeping a three-digit `preset_site` if given.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, preset_site: Option<&str>) -> KeyResult<Self> {
        let site = match preset_site {
            Some(site) => {
                expect_width(site, 3, "3")?;
                parse_digits(site, Segment::Head)? as u16
            }
            None => rng.gen_range(0..1000),
        };
        let base = (site % 10) as u8;
        let derived = derived_digits(base)[usize::from(rng.gen_bool(0.5))];

        let (serial, draws) = sample_checksum(rng, 7, Segment::Serial)?;
        let key = Self {
            head: format!("{site:03}{derived}"),
            serial: format!("{serial:07}"),
        };
        debug!(key = %key, draws, "generated eleven-digit key");
        Ok(key)
    }

    /// Returns the four-digit head.
    #[must_use]
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Returns the serial segment.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }
}

impl fmt::Display for ElevenDigitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.head, self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_digits_wrap() {
        assert_eq!(derived_digits(1), [2, 3]);
        assert_eq!(derived_digits(8), [9, 0]);
        assert_eq!(derived_digits(9), [0, 1]);
    }
}
