//! Numeric helpers shared by every key family.

use crate::error::{KeyError, KeyResult, Segment};

/// Returns the sum of the decimal digits of `value`.
#[must_use]
pub fn digit_sum(mut value: u64) -> u32 {
    let mut sum = 0;
    while value != 0 {
        sum += (value % 10) as u32;
        value /= 10;
    }
    sum
}

/// Returns true if `year` is a leap year in the Gregorian calendar.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Parses a segment that must consist solely of ASCII digits.
///
/// Signs, whitespace and the empty string are rejected, unlike `str::parse`.
pub(crate) fn parse_digits(text: &str, segment: Segment) -> KeyResult<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::NotNumeric { segment });
    }
    text.parse().map_err(|_| KeyError::NotNumeric { segment })
}

/// Collects `chars[start..end]` into an owned segment.
pub(crate) fn slice(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

/// Rejects a segment whose character count differs from `width`.
pub(crate) fn expect_width(text: &str, width: usize, expected: &'static str) -> KeyResult<()> {
    let found = text.chars().count();
    if found == width {
        Ok(())
    } else {
        Err(KeyError::MalformedLength { expected, found })
    }
}

/// Splits trimmed input into characters after checking its total length.
pub(crate) fn fixed_chars(
    text: &str,
    length: usize,
    expected: &'static str,
) -> KeyResult<Vec<char>> {
    let chars: Vec<char> = text.trim().chars().collect();
    if chars.len() != length {
        return Err(KeyError::MalformedLength {
            expected,
            found: chars.len(),
        });
    }
    Ok(chars)
}
