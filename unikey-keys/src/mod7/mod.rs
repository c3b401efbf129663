//! Modulo-7 key schemes.
//!
//! Every scheme in this family carries a seven-digit checksum segment whose
//! digit sum is divisible by seven and whose final digit lies in `1..=7`:
//!
//! - [`TenDigitKey`] — `SSS-NNNNNNN` retail keys
//! - [`ElevenDigitKey`] — `SSSD-NNNNNNN` retail keys with a derived digit
//! - [`OemKey`] — `DDDYY-OEM-0NNNNNN-TTTTT` OEM keys
//!
//! Generation draws candidate segments until one passes, bounded by
//! [`MAX_DRAWS`].

mod cd;
mod eleven;
mod oem;

pub use cd::{FORBIDDEN_SITES, TenDigitKey};
pub use eleven::{ElevenDigitKey, derived_digits};
pub use oem::{LEGACY_YEAR_TOKENS, OemKey, YEAR_TOKENS, resolve_year};

use crate::digits::digit_sum;
use crate::error::{KeyError, KeyResult, Segment};
use rand::Rng;
use tracing::{trace, warn};

/// Upper bound on draws for any rejection-sampled segment.
pub const MAX_DRAWS: u32 = 10_000;

/// Returns true if the last digit of `value` may serve as a check digit.
///
/// Zero, eight and nine are never valid.
#[must_use]
pub fn check_digit_allowed(value: u64) -> bool {
    matches!(value % 10, 1..=7)
}

/// Checks the check-digit and digit-sum rules on a parsed segment.
pub(crate) fn check_checksum(
    value: u64,
    segment: Segment,
    enforce_check_digit: bool,
) -> KeyResult<()> {
    if enforce_check_digit && !check_digit_allowed(value) {
        return Err(KeyError::BadCheckDigit {
            segment,
            found: (value % 10).to_string(),
            expected: "1-7".to_string(),
        });
    }

    let sum = digit_sum(value);
    if sum % 7 != 0 {
        return Err(KeyError::BadDigitSum { segment, sum });
    }
    Ok(())
}

/// Draws a number below `10^width` that passes [`check_checksum`].
///
/// Returns the accepted value and the number of draws it took.
pub(crate) fn sample_checksum<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    segment: Segment,
) -> KeyResult<(u64, u32)> {
    let bound = 10u64.pow(width);
    for draw in 1..=MAX_DRAWS {
        let candidate = rng.gen_range(0..bound);
        if check_digit_allowed(candidate) && digit_sum(candidate) % 7 == 0 {
            return Ok((candidate, draw));
        }
        trace!(%segment, draw, candidate, "checksum draw rejected");
    }
    warn!(%segment, draws = MAX_DRAWS, "checksum sampler exhausted");
    Err(KeyError::SamplerExhausted {
        segment,
        draws: MAX_DRAWS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn check_digit_bounds() {
        assert!(!check_digit_allowed(10));
        assert!(check_digit_allowed(11));
        assert!(check_digit_allowed(17));
        assert!(!check_digit_allowed(18));
        assert!(!check_digit_allowed(19));
    }

    #[test]
    fn checksum_reports_check_digit_before_sum() {
        // 5683148 has a digit sum of 35 but ends in 8.
        let err = check_checksum(5_683_148, Segment::Serial, true).unwrap_err();
        assert!(matches!(err, KeyError::BadCheckDigit { .. }));
        assert!(check_checksum(5_683_148, Segment::Serial, false).is_ok());
    }

    #[test]
    fn sampled_segments_pass() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let (value, draws) = sample_checksum(&mut rng, 7, Segment::Serial).unwrap();
            assert!((1..=MAX_DRAWS).contains(&draws));
            assert!(value < 10_000_000);
            check_checksum(value, Segment::Serial, true).unwrap();
        }
    }
}
