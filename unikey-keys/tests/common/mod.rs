//! Shared test helpers for key tests.

#![allow(dead_code)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use unikey_keys::{Key, KeyError, KeyOptions, Release, Scheme, validate};

/// Returns a deterministic random source.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Validates `text` with default options.
pub fn check(scheme: Scheme, text: &str) -> Result<Key, KeyError> {
    validate(scheme, text, &KeyOptions::default())
}

/// Validates `text` with the legacy profile.
pub fn check_legacy(scheme: Scheme, text: &str) -> Result<Key, KeyError> {
    validate(scheme, text, &KeyOptions::legacy())
}

/// Validates `text` against a hash-derived release.
pub fn check_release(release: Release, text: &str) -> Result<Key, KeyError> {
    validate(Scheme::HashDerived, text, &KeyOptions::for_release(release))
}

/// Replaces the digit at character `index` of `text`.
pub fn replace_digit(text: &str, index: usize, digit: u8) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| if i == index { char::from(b'0' + digit) } else { c })
        .collect()
}
