//! Site/password pairs derived from an MD4 digest.
//!
//! A password is `PPPP` + `M` + `HHHH`:
//! - `PPPP`: four free hex characters
//! - `HHHH`: digest bytes 1 and 0 of `MD4(site + PPPP + disclosure)`, hex encoded
//! - `M`: the sum of the ASCII codes of site, `PPPP` and `HHHH`, modulo 9
//!
//! The disclosure string is fixed per pre-release build, see [`Release`].
//! MD4 is used here as a legacy checksum, nothing more.

use crate::digits::{expect_width, parse_digits, slice};
use crate::error::{KeyError, KeyResult, Segment};
use md4::{Digest, Md4};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A pre-release build whose installer asks for a site and password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Release {
    #[serde(rename = "73f")]
    Build73f,
    #[serde(rename = "73g")]
    Build73g,
    #[serde(rename = "81")]
    Build81,
    /// Builds 99 through 116.
    #[serde(rename = "99")]
    Build99,
    /// Builds 122 through 189.
    #[serde(rename = "122")]
    Build122,
    /// Builds 216 through 302.
    #[serde(rename = "216")]
    Build216,
    /// Internet Explorer 4.70.1169.
    #[serde(rename = "ie4july")]
    Ie4July,
    /// Internet Explorer 4.71.0225.
    #[serde(rename = "ie4sept")]
    Ie4September,
}

impl Release {
    /// Every release in the catalogue.
    pub const ALL: [Release; 8] = [
        Self::Build73f,
        Self::Build73g,
        Self::Build81,
        Self::Build99,
        Self::Build122,
        Self::Build216,
        Self::Ie4July,
        Self::Ie4September,
    ];

    /// Returns the tag used to select this release.
    #[must_use]
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Build73f => "73f",
            Self::Build73g => "73g",
            Self::Build81 => "81",
            Self::Build99 => "99",
            Self::Build122 => "122",
            Self::Build216 => "216",
            Self::Ie4July => "ie4july",
            Self::Ie4September => "ie4sept",
        }
    }

    /// Returns the text hashed together with the site and prefix.
    #[must_use]
    pub fn disclosure(&self) -> &'static str {
        match self {
            Self::Build73f => "Microsoft Chicago PDK Release, November 1993",
            Self::Build73g => "Microsoft Chicago PDK2 Release, December 1993",
            Self::Build81 => "Chicago Preliminary PDK Release, January 1994",
            Self::Build99 => "Chicago Preliminary Beta 1 Release, May 1994",
            Self::Build122 => "Chicago Beta 1 Release, May 1994",
            Self::Build216 => "Windows 95 Beta 2 Release, October 1994",
            Self::Ie4July => "Microsoft Internet Explorer 4.0 alpha 2 July 1996 release",
            Self::Ie4September => "Microsoft Internet Explorer 4.0 Beta - Sept. 1996 release",
        }
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Release {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|release| release.as_tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| KeyError::UnknownRelease(tag.to_string()))
    }
}

/// Derives the full password for `site` and a four-character hex `prefix`.
///
/// Both inputs are taken as given; see [`HashDerivedKey::generate`] for the
/// checked entry point.
#[must_use]
pub fn derive_password(release: Release, site: &str, prefix: &str) -> String {
    let mut hasher = Md4::new();
    hasher.update(site.as_bytes());
    hasher.update(prefix.as_bytes());
    hasher.update(release.disclosure().as_bytes());
    let digest = hasher.finalize();

    let trailing = hex::encode([digest[1], digest[0]]);
    let middle = site
        .bytes()
        .chain(prefix.bytes())
        .chain(trailing.bytes())
        .map(u32::from)
        .sum::<u32>()
        % 9;

    format!("{prefix}{middle}{trailing}")
}

/// A site code and the password derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashDerivedKey {
    release: Release,
    site: String,
    password: String,
}

impl HashDerivedKey {
    /// Length of `site/password`.
    pub const LENGTH: usize = 16;

    /// Builds a key from its segments, checking only their shape.
    ///
    /// Hex characters in the password are stored lowercase.
    pub fn from_segments(release: Release, site: &str, password: &str) -> KeyResult<Self> {
        check_site(site)?;
        expect_width(password, 9, "9")?;
        let chars: Vec<char> = password.chars().collect();
        check_prefix(&slice(&chars, 0, 4))?;
        if !chars[4].is_ascii_digit() {
            return Err(KeyError::NotNumeric {
                segment: Segment::Password,
            });
        }
        if !chars[5..].iter().all(char::is_ascii_hexdigit) {
            return Err(KeyError::NotHexadecimal {
                segment: Segment::Password,
            });
        }

        Ok(Self {
            release,
            site: site.to_string(),
            password: password.to_ascii_lowercase(),
        })
    }

    /// Parses `SSSSSS/PPPPMHHHH`. The separator character is not inspected.
    pub fn parse(release: Release, text: &str) -> KeyResult<Self> {
        let chars: Vec<char> = text.trim().chars().collect();
        if chars.len() != Self::LENGTH {
            return Err(KeyError::MalformedLength {
                expected: "16",
                found: chars.len(),
            });
        }
        Self::from_segments(release, &slice(&chars, 0, 6), &slice(&chars, 7, 16))
    }

    /// Parses `text` and re-derives its password.
    pub fn validate(release: Release, text: &str) -> KeyResult<Self> {
        let key = Self::parse(release, text)?;
        key.verify()?;
        Ok(key)
    }

    /// Re-runs the derivation over the declared site and prefix.
    ///
    /// # Errors
    ///
    /// Returns `BadCheckDigit` on the password if the middle digit or the
    /// trailing hex characters differ from the derived ones.
    pub fn verify(&self) -> KeyResult<()> {
        let prefix = self.prefix().to_ascii_lowercase();
        let expected = derive_password(self.release, &self.site, &prefix);
        if !expected.eq_ignore_ascii_case(&self.password) {
            return Err(KeyError::BadCheckDigit {
                segment: Segment::Password,
                found: self.password.get(4..).unwrap_or_default().to_string(),
                expected: expected[4..].to_string(),
            });
        }
        Ok(())
    }

    /// Generates a site and password, keeping any preset segment.
    ///
    /// A preset prefix may use either hex case; it is stored lowercase.
    ///
    /// # Errors
    ///
    /// Fails if a preset site is not six digits or a preset prefix is not
    /// four hex characters.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        release: Release,
        preset_site: Option<&str>,
        preset_prefix: Option<&str>,
    ) -> KeyResult<Self> {
        let site = match preset_site {
            Some(site) => {
                check_site(site)?;
                site.to_string()
            }
            None => format!("{:06}", rng.gen_range(0..1_000_000u32)),
        };
        let prefix = match preset_prefix {
            Some(prefix) => {
                check_prefix(prefix)?;
                prefix.to_ascii_lowercase()
            }
            None => format!("{:04x}", rng.gen_range(0..=0xffffu32)),
        };

        let password = derive_password(release, &site, &prefix);
        let key = Self {
            release,
            site,
            password,
        };
        debug!(release = %release, key = %key, "generated hash-derived key");
        Ok(key)
    }

    /// Returns the release this key was derived for.
    #[must_use]
    pub fn release(&self) -> Release {
        self.release
    }

    /// Returns the six-digit site code.
    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Returns the nine-character password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the four free hex characters.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.password.get(..4).unwrap_or_default()
    }

    /// Returns the middle checksum digit.
    #[must_use]
    pub fn middle_digit(&self) -> Option<u8> {
        self.password
            .chars()
            .nth(4)
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u8)
    }

    /// Returns the four digest-derived hex characters.
    #[must_use]
    pub fn trailing(&self) -> &str {
        self.password.get(5..).unwrap_or_default()
    }
}

impl fmt::Display for HashDerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.site, self.password)
    }
}

fn check_site(site: &str) -> KeyResult<()> {
    expect_width(site, 6, "6")?;
    parse_digits(site, Segment::SiteCode)?;
    Ok(())
}

fn check_prefix(prefix: &str) -> KeyResult<()> {
    expect_width(prefix, 4, "4")?;
    hex::decode(prefix).map_err(|_| KeyError::NotHexadecimal {
        segment: Segment::Prefix,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_tags_round_trip() {
        for release in Release::ALL {
            assert_eq!(release.as_tag().parse::<Release>(), Ok(release));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            "95".parse::<Release>(),
            Err(KeyError::UnknownRelease("95".to_string()))
        );
    }

    #[test]
    fn known_password() {
        assert_eq!(
            derive_password(Release::Build73g, "889884", "fdaa"),
            "fdaa6c807"
        );
    }
}
