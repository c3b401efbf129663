//! Scheme selection and dispatch.
//!
//! [`generate`] and [`validate`] are the entry points most callers want.
//! Both take a [`Scheme`] and a [`KeyOptions`]; options that do not apply
//! to the chosen scheme are ignored.

use crate::error::{KeyError, KeyResult};
use crate::hash_derived::{HashDerivedKey, Release};
use crate::mod7::{ElevenDigitKey, OemKey, TenDigitKey};
use crate::recurrence::RecurrenceKey;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A supported key scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// `SSS-NNNNNNN` retail keys.
    TenDigit,
    /// `SSSD-NNNNNNN` retail keys.
    ElevenDigit,
    /// `DDDYY-OEM-0NNNNNN-TTTTT` OEM keys.
    Oem,
    /// `XXXX-XXXXX-XXXX` recurrence keys.
    Recurrence,
    /// `SSSSSS/PPPPMHHHH` site and password pairs.
    HashDerived,
}

impl Scheme {
    /// Every supported scheme.
    pub const ALL: [Scheme; 5] = [
        Self::TenDigit,
        Self::ElevenDigit,
        Self::Oem,
        Self::Recurrence,
        Self::HashDerived,
    ];

    /// Returns the canonical identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenDigit => "ten-digit",
            Self::ElevenDigit => "eleven-digit",
            Self::Oem => "oem",
            Self::Recurrence => "recurrence",
            Self::HashDerived => "hash-derived",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = KeyError;

    /// Accepts the canonical identifiers plus the historical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ten-digit" | "10" | "cd" => Ok(Self::TenDigit),
            "eleven-digit" | "11" | "elevencd" => Ok(Self::ElevenDigit),
            "oem" => Ok(Self::Oem),
            "recurrence" | "starcraft" => Ok(Self::Recurrence),
            "hash-derived" | "chicago" => Ok(Self::HashDerived),
            _ => Err(KeyError::UnknownScheme(s.trim().to_string())),
        }
    }
}

/// Segments a caller wants fixed during generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presets {
    /// Site for ten-digit keys, three-digit base for eleven-digit keys, or
    /// six-digit site code for hash-derived keys.
    pub site: Option<String>,
    /// Four hex characters opening a hash-derived password.
    pub prefix: Option<String>,
    /// Twelve digits of a recurrence key.
    pub payload: Option<String>,
    /// `DDDYY` segment of an OEM key.
    pub date_year: Option<String>,
}

/// Options for generation and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyOptions {
    /// Use the legacy installer profile for ten-digit and OEM keys.
    pub legacy: bool,
    /// Release whose disclosure string hash-derived keys use.
    pub release: Option<Release>,
    /// Segments to keep fixed during generation.
    pub presets: Presets,
}

impl KeyOptions {
    /// Returns options with the legacy profile switched on.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            legacy: true,
            ..Self::default()
        }
    }

    /// Returns options for a hash-derived release.
    #[must_use]
    pub fn for_release(release: Release) -> Self {
        Self {
            release: Some(release),
            ..Self::default()
        }
    }

    /// Replaces the presets.
    #[must_use]
    pub fn with_presets(mut self, presets: Presets) -> Self {
        self.presets = presets;
        self
    }

    fn require_release(&self) -> KeyResult<Release> {
        self.release.ok_or(KeyError::MissingRelease)
    }
}

/// A structured key of any scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "kebab-case")]
pub enum Key {
    TenDigit(TenDigitKey),
    ElevenDigit(ElevenDigitKey),
    Oem(OemKey),
    Recurrence(RecurrenceKey),
    HashDerived(HashDerivedKey),
}

impl Key {
    /// Returns the scheme of this key.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::TenDigit(_) => Scheme::TenDigit,
            Self::ElevenDigit(_) => Scheme::ElevenDigit,
            Self::Oem(_) => Scheme::Oem,
            Self::Recurrence(_) => Scheme::Recurrence,
            Self::HashDerived(_) => Scheme::HashDerived,
        }
    }

    /// Checks every invariant of the key's scheme.
    pub fn check(&self) -> KeyResult<()> {
        match self {
            Self::TenDigit(key) => key.check(),
            Self::ElevenDigit(key) => key.check(),
            Self::Oem(key) => key.check(),
            Self::Recurrence(key) => key.check(),
            Self::HashDerived(key) => key.verify(),
        }
    }

    /// Renders the key with its scheme's separators.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TenDigit(key) => fmt::Display::fmt(key, f),
            Self::ElevenDigit(key) => fmt::Display::fmt(key, f),
            Self::Oem(key) => fmt::Display::fmt(key, f),
            Self::Recurrence(key) => fmt::Display::fmt(key, f),
            Self::HashDerived(key) => fmt::Display::fmt(key, f),
        }
    }
}

/// Generates one key of `scheme`.
///
/// # Errors
///
/// Fails only on caller error: a hash-derived request without a release,
/// or a preset segment that is malformed or breaks a scheme rule.
pub fn generate<R: Rng + ?Sized>(
    scheme: Scheme,
    options: &KeyOptions,
    rng: &mut R,
) -> KeyResult<Key> {
    let presets = &options.presets;
    let key = match scheme {
        Scheme::TenDigit => Key::TenDigit(TenDigitKey::generate(
            rng,
            options.legacy,
            presets.site.as_deref(),
        )?),
        Scheme::ElevenDigit => {
            Key::ElevenDigit(ElevenDigitKey::generate(rng, presets.site.as_deref())?)
        }
        Scheme::Oem => Key::Oem(OemKey::generate(
            rng,
            options.legacy,
            presets.date_year.as_deref(),
        )?),
        Scheme::Recurrence => {
            Key::Recurrence(RecurrenceKey::generate(rng, presets.payload.as_deref())?)
        }
        Scheme::HashDerived => Key::HashDerived(HashDerivedKey::generate(
            rng,
            options.require_release()?,
            presets.site.as_deref(),
            presets.prefix.as_deref(),
        )?),
    };
    Ok(key)
}

/// Generates `count` keys of `scheme` from the same random source.
pub fn generate_many<R: Rng + ?Sized>(
    scheme: Scheme,
    options: &KeyOptions,
    count: usize,
    rng: &mut R,
) -> KeyResult<Vec<Key>> {
    debug!(%scheme, count, "generating batch");
    (0..count)
        .map(|_| generate(scheme, options, &mut *rng))
        .collect()
}

/// Parses `text` as a key of `scheme` and checks every invariant.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns the first rule the text breaks, naming the segment where one
/// applies.
pub fn validate(scheme: Scheme, text: &str, options: &KeyOptions) -> KeyResult<Key> {
    let key = match scheme {
        Scheme::TenDigit => Key::TenDigit(TenDigitKey::validate(text, options.legacy)?),
        Scheme::ElevenDigit => Key::ElevenDigit(ElevenDigitKey::validate(text)?),
        Scheme::Oem => Key::Oem(OemKey::validate(text, options.legacy)?),
        Scheme::Recurrence => Key::Recurrence(RecurrenceKey::validate(text)?),
        Scheme::HashDerived => {
            Key::HashDerived(HashDerivedKey::validate(options.require_release()?, text)?)
        }
    };
    Ok(key)
}
