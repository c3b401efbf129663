//! Ten-digit retail keys (`SSS-NNNNNNN`).

use super::{check_checksum, sample_checksum};
use crate::digits::{expect_width, fixed_chars, parse_digits, slice};
use crate::error::{KeyError, KeyResult, Segment};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Site numbers that are never issued.
pub const FORBIDDEN_SITES: [u16; 7] = [333, 444, 555, 666, 777, 888, 999];

/// A ten-digit key: a three-digit site and a seven-digit serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenDigitKey {
    site: String,
    serial: String,
    /// Skip the check-digit rule and allow non-numeric sites.
    legacy: bool,
}

impl TenDigitKey {
    /// Length of the rendered key, separator included.
    pub const LENGTH: usize = 11;

    /// Builds a key from its segments, checking only their shape.
    ///
    /// # Errors
    ///
    /// Returns `MalformedLength` or `NotNumeric` if a segment has the wrong
    /// width or alphabet. In legacy mode the site may be any three characters.
    pub fn from_segments(site: &str, serial: &str, legacy: bool) -> KeyResult<Self> {
        expect_width(site, 3, "3")?;
        if !legacy {
            parse_digits(site, Segment::Site)?;
        }
        expect_width(serial, 7, "7")?;
        parse_digits(serial, Segment::Serial)?;

        Ok(Self {
            site: site.to_string(),
            serial: serial.to_string(),
            legacy,
        })
    }

    /// Parses `SSS-NNNNNNN` without checking any invariant.
    ///
    /// The separator character itself is not inspected.
    pub fn parse(text: &str, legacy: bool) -> KeyResult<Self> {
        let chars = fixed_chars(text, Self::LENGTH, "11")?;
        Self::from_segments(&slice(&chars, 0, 3), &slice(&chars, 4, 11), legacy)
    }

    /// Parses `text` and checks every invariant.
    pub fn validate(text: &str, legacy: bool) -> KeyResult<Self> {
        let key = Self::parse(text, legacy)?;
        key.check()?;
        Ok(key)
    }

    /// Checks the site, check digit and digit sum rules, in that order.
    pub fn check(&self) -> KeyResult<()> {
        // A legacy site that is not numeric cannot be a blocked one.
        match parse_digits(&self.site, Segment::Site) {
            Ok(site) => check_site(site as u16)?,
            Err(err) if !self.legacy => return Err(err),
            Err(_) => {}
        }
        let serial = parse_digits(&self.serial, Segment::Serial)?;
        check_checksum(serial, Segment::Serial, !self.legacy)
    }

    /// Generates a random key, keeping `preset_site` if one is given.
    ///
    /// # Errors
    ///
    /// Fails if the preset site is malformed or blocked.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        legacy: bool,
        preset_site: Option<&str>,
    ) -> KeyResult<Self> {
        let site = match preset_site {
            Some(site) => {
                expect_width(site, 3, "3")?;
                let value = parse_digits(site, Segment::Site)?;
                check_site(value as u16)?;
                site.to_string()
            }
            None => format!("{:03}", draw_site(rng)),
        };

        let (serial, draws) = sample_checksum(rng, 7, Segment::Serial)?;
        let key = Self {
            site,
            serial: format!("{serial:07}"),
            legacy,
        };
        debug!(key = %key, draws, "generated ten-digit key");
        Ok(key)
    }

    /// Returns the site segment.
    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Returns the serial segment.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Returns true if this key is checked with the legacy profile.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }
}

impl fmt::Display for TenDigitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.site, self.serial)
    }
}

fn check_site(site: u16) -> KeyResult<()> {
    if FORBIDDEN_SITES.contains(&site) {
        return Err(KeyError::ForbiddenSite { site });
    }
    Ok(())
}

/// Draws a site, falling back to `0..300` when a blocked one comes up.
fn draw_site<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    let site = rng.gen_range(0..1000);
    if FORBIDDEN_SITES.contains(&site) {
        rng.gen_range(0..300)
    } else {
        site
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn drawn_sites_are_never_blocked() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5_000 {
            assert!(!FORBIDDEN_SITES.contains(&draw_site(&mut rng)));
        }
    }

    #[test]
    fn legacy_allows_letters_in_site() {
        let key = TenDigitKey::from_segments("AAA", "1111109", true).unwrap();
        assert!(key.check().is_ok());
        assert!(TenDigitKey::from_segments("AAA", "1111109", false).is_err());
    }
}
