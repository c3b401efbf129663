//! Argument parsing and command execution for the `unikey` binary.
//!
//! Output goes to a caller-supplied writer so the commands can be driven
//! from tests; logging is left to the binary.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};
use unikey_keys::{Key, KeyOptions, Presets, Release, Scheme, Segment};

#[derive(Parser, Debug)]
#[command(name = "unikey", version)]
#[command(about = "Generate and validate legacy product activation keys")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one or more keys
    Generate {
        /// Scheme: ten-digit, eleven-digit, oem, recurrence or hash-derived
        scheme: String,

        /// Number of keys to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        profile: Profile,

        /// Fixed site (ten-digit, eleven-digit base, hash-derived site code)
        #[arg(long)]
        site: Option<String>,

        /// Fixed hex prefix of a hash-derived password
        #[arg(long)]
        prefix: Option<String>,

        /// Fixed twelve-digit recurrence payload
        #[arg(long)]
        payload: Option<String>,

        /// Fixed DDDYY segment of an OEM key
        #[arg(long)]
        date_year: Option<String>,
    },

    /// Validate a key
    Validate {
        /// Scheme the key belongs to
        scheme: String,

        /// The key text
        key: String,

        #[command(flatten)]
        profile: Profile,
    },

    /// List hash-derived releases and their disclosure strings
    Releases,
}

/// Flags shared by generation and validation.
#[derive(clap::Args, Debug, Default)]
pub struct Profile {
    /// Use the legacy installer rules
    #[arg(long)]
    pub legacy: bool,

    /// Release tag for hash-derived keys (e.g. 73g, ie4july)
    #[arg(short, long)]
    pub release: Option<String>,
}

impl Profile {
    fn options(&self) -> Result<KeyOptions> {
        let release = self
            .release
            .as_deref()
            .map(str::parse::<Release>)
            .transpose()?;
        Ok(KeyOptions {
            legacy: self.legacy,
            release,
            presets: Presets::default(),
        })
    }
}

/// Whether every key handled by a command was valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
}

#[derive(Serialize)]
struct GeneratedReport<'a> {
    scheme: Scheme,
    key: String,
    segments: &'a Key,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    scheme: Scheme,
    key: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment: Option<Segment>,
}

#[derive(Serialize)]
struct ReleaseReport {
    tag: &'static str,
    disclosure: &'static str,
}

/// Runs `cli`, writing results to `out`.
///
/// # Errors
///
/// Returns an error for an unknown scheme or release, a rejected preset,
/// or a failed write. An invalid key is reported as [`Outcome::Invalid`].
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<Outcome> {
    match &cli.command {
        Command::Generate {
            scheme,
            count,
            seed,
            profile,
            site,
            prefix,
            payload,
            date_year,
        } => {
            let scheme: Scheme = scheme.parse()?;
            let mut options = profile.options()?;
            options.presets = Presets {
                site: site.clone(),
                prefix: prefix.clone(),
                payload: payload.clone(),
                date_year: date_year.clone(),
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };

            let keys = unikey_keys::generate_many(scheme, &options, *count, &mut rng)
                .with_context(|| format!("failed to generate {scheme} keys"))?;
            info!(%scheme, count = keys.len(), "keys generated");
            for key in &keys {
                if cli.json {
                    let report = GeneratedReport {
                        scheme,
                        key: key.canonical_string(),
                        segments: key,
                    };
                    writeln!(out, "{}", serde_json::to_string(&report)?)?;
                } else {
                    writeln!(out, "{key}")?;
                }
            }
            Ok(Outcome::Valid)
        }

        Command::Validate {
            scheme,
            key,
            profile,
        } => {
            let scheme: Scheme = scheme.parse()?;
            let options = profile.options()?;
            let result = unikey_keys::validate(scheme, key, &options);
            debug!(%scheme, key = %key, ok = result.is_ok(), "validated");

            let (outcome, reason, segment) = match &result {
                Ok(_) => (Outcome::Valid, None, None),
                Err(err) => (Outcome::Invalid, Some(err.to_string()), err.segment()),
            };
            if cli.json {
                let report = ValidationReport {
                    scheme,
                    key: key.trim(),
                    valid: outcome == Outcome::Valid,
                    reason,
                    segment,
                };
                writeln!(out, "{}", serde_json::to_string(&report)?)?;
            } else {
                match reason {
                    None => writeln!(out, "{} is valid", key.trim())?,
                    Some(reason) => writeln!(out, "{} is invalid: {reason}", key.trim())?,
                }
            }
            Ok(outcome)
        }

        Command::Releases => {
            for release in Release::ALL {
                if cli.json {
                    let report = ReleaseReport {
                        tag: release.as_tag(),
                        disclosure: release.disclosure(),
                    };
                    writeln!(out, "{}", serde_json::to_string(&report)?)?;
                } else {
                    writeln!(out, "{:<8} {}", release.as_tag(), release.disclosure())?;
                }
            }
            Ok(Outcome::Valid)
        }
    }
}
