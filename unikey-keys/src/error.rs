//! Error types for key generation and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A named part of a structured key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Three-digit site number of a 10-digit key.
    Site,
    /// Seven-digit checksum segment of a 10- or 11-digit key.
    Serial,
    /// Four-digit leading segment of an 11-digit key.
    Head,
    /// Day-of-year and year token of an OEM key.
    DateYear,
    /// The literal `OEM` token.
    Literal,
    /// Seven-digit checksum segment of an OEM key.
    Body,
    /// Trailing five digits of an OEM key.
    Tail,
    /// Digits of a recurrence key.
    Payload,
    /// Six-digit site code of a hash-derived key.
    SiteCode,
    /// Four hex characters leading a hash-derived password.
    Prefix,
    /// Nine-character hash-derived password.
    Password,
}

impl Segment {
    /// Returns the segment name used in messages and JSON output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Serial => "serial",
            Self::Head => "head",
            Self::DateYear => "date_year",
            Self::Literal => "literal",
            Self::Body => "body",
            Self::Tail => "tail",
            Self::Payload => "payload",
            Self::SiteCode => "site_code",
            Self::Prefix => "prefix",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a key could not be generated or did not validate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The text does not have the length the scheme requires.
    #[error("malformed key: expected {expected} characters, found {found}")]
    MalformedLength {
        expected: &'static str,
        found: usize,
    },

    /// A segment that must be decimal contains something else.
    #[error("{segment} segment is not numeric")]
    NotNumeric { segment: Segment },

    /// A segment that must be hexadecimal contains something else.
    #[error("{segment} segment is not hexadecimal")]
    NotHexadecimal { segment: Segment },

    /// The site number is one of the blocked multiples of 111.
    #[error("site {site} is not allowed")]
    ForbiddenSite { site: u16 },

    /// The check digit is outside the permitted set or does not match.
    #[error("{segment} check digit {found} is invalid (expected {expected})")]
    BadCheckDigit {
        segment: Segment,
        found: String,
        expected: String,
    },

    /// The digit sum of a checksum segment is not divisible by seven.
    #[error("digit sum {sum} of {segment} segment is not divisible by 7")]
    BadDigitSum { segment: Segment, sum: u32 },

    /// The fourth digit of an 11-digit head does not follow from the third.
    #[error("derived digit {found} does not follow base digit {base}")]
    BadDerivedDigit { base: u8, found: u8 },

    /// The day-of-year does not exist in the encoded year.
    #[error("day {day} is not valid for year token {year}")]
    BadDate { day: u16, year: String },

    /// The year token is outside the permitted set.
    #[error("year token {token} is not permitted")]
    BadYear { token: String },

    /// A fixed token is missing or wrong.
    #[error("{segment} segment must be {expected:?}, found {found:?}")]
    BadLiteralToken {
        segment: Segment,
        expected: &'static str,
        found: String,
    },

    /// The scheme identifier is not recognised.
    #[error("unknown scheme: {0}")]
    UnknownScheme(String),

    /// The release tag is not in the release catalogue.
    #[error("unknown release: {0}")]
    UnknownRelease(String),

    /// A hash-derived operation was requested without a release.
    #[error("hash-derived keys require a release tag")]
    MissingRelease,

    /// The rejection sampler ran out of draws.
    #[error("no valid {segment} segment after {draws} draws")]
    SamplerExhausted { segment: Segment, draws: u32 },
}

impl KeyError {
    /// Returns the segment this error points at, if any.
    #[must_use]
    pub fn segment(&self) -> Option<Segment> {
        match self {
            Self::NotNumeric { segment }
            | Self::NotHexadecimal { segment }
            | Self::BadCheckDigit { segment, .. }
            | Self::BadDigitSum { segment, .. }
            | Self::BadLiteralToken { segment, .. }
            | Self::SamplerExhausted { segment, .. } => Some(*segment),
            Self::ForbiddenSite { .. } => Some(Segment::Site),
            Self::BadDerivedDigit { .. } => Some(Segment::Head),
            Self::BadDate { .. } | Self::BadYear { .. } => Some(Segment::DateYear),
            Self::MalformedLength { .. }
            | Self::UnknownScheme(_)
            | Self::UnknownRelease(_)
            | Self::MissingRelease => None,
        }
    }
}

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;
