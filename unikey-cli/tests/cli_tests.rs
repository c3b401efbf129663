use clap::Parser;
use pretty_assertions::assert_eq;
use unikey_cli::{Cli, Outcome, run};

/// Parses `args` and runs the command, returning the outcome and stdout.
fn run_args(args: &[&str]) -> anyhow::Result<(Outcome, String)> {
    let cli = Cli::try_parse_from(std::iter::once("unikey").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    let outcome = run(&cli, &mut out)?;
    Ok((outcome, String::from_utf8(out)?))
}

#[test]
fn validate_valid_key() {
    let (outcome, out) = run_args(&["validate", "ten-digit", "111-1111111"]).unwrap();
    assert_eq!(outcome, Outcome::Valid);
    assert_eq!(out, "111-1111111 is valid\n");
}

#[test]
fn validate_invalid_key_reports_reason() {
    let (outcome, out) = run_args(&["validate", "10", "444-1111111"]).unwrap();
    assert_eq!(outcome, Outcome::Invalid);
    assert!(out.contains("site 444 is not allowed"), "{out}");
}

#[test]
fn validate_json_names_the_segment() {
    let (outcome, out) =
        run_args(&["--json", "validate", "oem", "36697-OEM-0000007-00000"]).unwrap();
    assert_eq!(outcome, Outcome::Invalid);
    let report: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["segment"], "date_year");
}

#[test]
fn validate_legacy_flag() {
    let (outcome, _) = run_args(&["validate", "ten-digit", "111-1111109", "--legacy"]).unwrap();
    assert_eq!(outcome, Outcome::Valid);
    let (outcome, _) = run_args(&["validate", "ten-digit", "111-1111109"]).unwrap();
    assert_eq!(outcome, Outcome::Invalid);
}

#[test]
fn generate_with_seed_is_reproducible() {
    let args = ["generate", "recurrence", "--count", "3", "--seed", "17"];
    let (_, first) = run_args(&args).unwrap();
    let (_, second) = run_args(&args).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 3);
}

#[test]
fn generated_keys_validate_through_the_cli() {
    let (_, out) = run_args(&["generate", "eleven-digit", "-n", "20", "--seed", "5"]).unwrap();
    for key in out.lines() {
        let (outcome, _) = run_args(&["validate", "eleven-digit", key]).unwrap();
        assert_eq!(outcome, Outcome::Valid, "{key}");
    }
}

#[test]
fn generate_hash_derived_with_presets() {
    let (_, out) = run_args(&[
        "generate",
        "chicago",
        "--release",
        "73g",
        "--site",
        "889884",
        "--prefix",
        "fdaa",
    ])
    .unwrap();
    assert_eq!(out, "889884/fdaa6c807\n");
}

#[test]
fn generate_json_includes_segments() {
    let (_, out) = run_args(&[
        "--json",
        "generate",
        "ten-digit",
        "--site",
        "118",
        "--seed",
        "1",
    ])
    .unwrap();
    let report: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(report["scheme"], "ten-digit");
    assert_eq!(report["segments"]["site"], "118");
    assert!(report["key"].as_str().unwrap().starts_with("118-"));
}

#[test]
fn unknown_scheme_is_an_error() {
    let err = run_args(&["generate", "win2000"]).unwrap_err();
    assert!(err.to_string().contains("unknown scheme"), "{err}");
}

#[test]
fn unknown_release_is_an_error() {
    let err = run_args(&["generate", "hash-derived", "--release", "nt4"]).unwrap_err();
    assert!(err.to_string().contains("unknown release"), "{err}");
}

#[test]
fn rejected_preset_is_an_error() {
    let err = run_args(&["generate", "ten-digit", "--site", "555"]).unwrap_err();
    assert!(format!("{err:#}").contains("site 555 is not allowed"), "{err:#}");
}

#[test]
fn releases_lists_the_catalogue() {
    let (_, out) = run_args(&["releases"]).unwrap();
    assert_eq!(out.lines().count(), 8);
    assert!(out.contains("Windows 95 Beta 2 Release, October 1994"));
}
