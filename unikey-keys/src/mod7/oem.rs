//! OEM keys (`DDDYY-OEM-0NNNNNN-TTTTT`).
//!
//! The first segment records when the certificate was printed: a day of
//! the year followed by a two-digit year. The body must open with a zero,
//! and the trailing five digits carry no rule at all.

use super::{MAX_DRAWS, check_checksum, sample_checksum};
use crate::digits::{expect_width, fixed_chars, is_leap_year, parse_digits, slice};
use crate::error::{KeyError, KeyResult, Segment};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Year tokens accepted by current installers.
pub const YEAR_TOKENS: [&str; 9] = ["95", "96", "97", "98", "99", "00", "01", "02", "03"];

/// Year tokens accepted by the legacy installer, which predates `03`.
pub const LEGACY_YEAR_TOKENS: [&str; 8] = ["95", "96", "97", "98", "99", "00", "01", "02"];

const LITERAL: &str = "OEM";

/// Maps a two-digit year token to a calendar year.
#[must_use]
pub fn resolve_year(token: u16) -> i32 {
    if token >= 95 {
        1900 + i32::from(token)
    } else {
        2000 + i32::from(token)
    }
}

fn year_tokens(legacy: bool) -> &'static [&'static str] {
    if legacy {
        &LEGACY_YEAR_TOKENS
    } else {
        &YEAR_TOKENS
    }
}

/// An OEM key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OemKey {
    date_year: String,
    literal: String,
    body: String,
    tail: String,
    legacy: bool,
}

impl OemKey {
    /// Length of the rendered key, separators included.
    pub const LENGTH: usize = 23;

    /// Builds a key from its segments, checking only their shape.
    pub fn from_segments(
        date_year: &str,
        literal: &str,
        body: &str,
        tail: &str,
        legacy: bool,
    ) -> KeyResult<Self> {
        expect_width(date_year, 5, "5")?;
        parse_digits(date_year, Segment::DateYear)?;
        expect_width(literal, 3, "3")?;
        expect_width(body, 7, "7")?;
        parse_digits(body, Segment::Body)?;
        expect_width(tail, 5, "5")?;
        parse_digits(tail, Segment::Tail)?;

        Ok(Self {
            date_year: date_year.to_string(),
            literal: literal.to_string(),
            body: body.to_string(),
            tail: tail.to_string(),
            legacy,
        })
    }

    /// Parses `DDDYY-OEM-0NNNNNN-TTTTT` without checking any invariant.
    pub fn parse(text: &str, legacy: bool) -> KeyResult<Self> {
        let chars = fixed_chars(text, Self::LENGTH, "23")?;
        Self::from_segments(
            &slice(&chars, 0, 5),
            &slice(&chars, 6, 9),
            &slice(&chars, 10, 17),
            &slice(&chars, 18, 23),
            legacy,
        )
    }

    /// Parses `text` and checks every invariant.
    pub fn validate(text: &str, legacy: bool) -> KeyResult<Self> {
        let key = Self::parse(text, legacy)?;
        key.check()?;
        Ok(key)
    }

    /// Checks date, year, literal token, body prefix, check digit and digit
    /// sum, in that order.
    pub fn check(&self) -> KeyResult<()> {
        expect_width(&self.date_year, 5, "5")?;
        parse_digits(&self.date_year, Segment::DateYear)?;
        check_date_year(&self.date_year, self.legacy)?;

        if self.literal != LITERAL {
            return Err(KeyError::BadLiteralToken {
                segment: Segment::Literal,
                expected: LITERAL,
                found: self.literal.clone(),
            });
        }
        if !self.body.starts_with('0') {
            return Err(KeyError::BadLiteralToken {
                segment: Segment::Body,
                expected: "0",
                found: self.body.chars().take(1).collect(),
            });
        }

        let body = parse_digits(&self.body, Segment::Body)?;
        check_checksum(body, Segment::Body, !self.legacy)
    }

    /// Generates a random key, keeping a five-digit `preset_date_year` if
    /// given.
    ///
    /// # Errors
    ///
    /// Fails if the preset date is malformed or not a real day in a
    /// permitted year.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        legacy: bool,
        preset_date_year: Option<&str>,
    ) -> KeyResult<Self> {
        let date_year = match preset_date_year {
            Some(date_year) => {
                expect_width(date_year, 5, "5")?;
                parse_digits(date_year, Segment::DateYear)?;
                check_date_year(date_year, legacy)?;
                date_year.to_string()
            }
            None => draw_date_year(rng, legacy)?,
        };

        // The leading zero is fixed; only the six digits after it are drawn.
        let (body, draws) = sample_checksum(rng, 6, Segment::Body)?;
        let tail: u32 = rng.gen_range(0..100_000);

        let key = Self {
            date_year,
            literal: LITERAL.to_string(),
            body: format!("0{body:06}"),
            tail: format!("{tail:05}"),
            legacy,
        };
        debug!(key = %key, draws, "generated OEM key");
        Ok(key)
    }

    /// Returns the day-of-year and year segment.
    #[must_use]
    pub fn date_year(&self) -> &str {
        &self.date_year
    }

    /// Returns the day of the year (`1..=366` on a valid key).
    #[must_use]
    pub fn day(&self) -> u16 {
        self.date_year
            .get(..3)
            .and_then(|day| day.parse().ok())
            .unwrap_or(0)
    }

    /// Returns the two-digit year token.
    #[must_use]
    pub fn year_token(&self) -> &str {
        self.date_year.get(3..).unwrap_or_default()
    }

    /// Returns the body segment, leading zero included.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the unconstrained tail segment.
    #[must_use]
    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// Returns true if this key is checked with the legacy profile.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Returns the calendar date encoded in the first segment, if it exists.
    #[must_use]
    pub fn print_date(&self) -> Option<NaiveDate> {
        let token = self.year_token().parse().ok()?;
        NaiveDate::from_yo_opt(resolve_year(token), u32::from(self.day()))
    }
}

impl fmt::Display for OemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.date_year, self.literal, self.body, self.tail
        )
    }
}

/// Checks a `DDDYY` segment already known to be five ASCII digits.
fn check_date_year(date_year: &str, legacy: bool) -> KeyResult<()> {
    let (day, token) = date_year.split_at(3);
    let day: u16 = day.parse().map_err(|_| KeyError::NotNumeric {
        segment: Segment::DateYear,
    })?;

    if day == 0 || day > 366 {
        return Err(KeyError::BadDate {
            day,
            year: token.to_string(),
        });
    }
    if !year_tokens(legacy).iter().any(|permitted| *permitted == token) {
        return Err(KeyError::BadYear {
            token: token.to_string(),
        });
    }

    let year = resolve_year(token.parse().unwrap_or_default());
    if day == 366 && !is_leap_year(year) {
        return Err(KeyError::BadDate {
            day,
            year: token.to_string(),
        });
    }
    Ok(())
}

fn draw_date_year<R: Rng + ?Sized>(rng: &mut R, legacy: bool) -> KeyResult<String> {
    let mut day = 0u16;
    for draw in 1..=MAX_DRAWS {
        day = rng.gen_range(0..=366);
        if day != 0 {
            break;
        }
        trace!(draw, "day-of-year draw rejected");
    }
    if day == 0 {
        warn!(draws = MAX_DRAWS, "day-of-year sampler exhausted");
        return Err(KeyError::SamplerExhausted {
            segment: Segment::DateYear,
            draws: MAX_DRAWS,
        });
    }

    let tokens = year_tokens(legacy);
    let token = tokens[rng.gen_range(0..tokens.len())];
    if day == 366 && !is_leap_year(resolve_year(token.parse().unwrap_or_default())) {
        day = 365;
    }
    Ok(format!("{day:03}{token}"))
}
