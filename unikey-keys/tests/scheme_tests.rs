mod common;

use common::seeded_rng;
use pretty_assertions::assert_eq;
use unikey_keys::{
    Key, KeyError, KeyOptions, Presets, Release, Scheme, TenDigitKey, generate, generate_many,
    validate,
};

// ── Scheme identifiers ───────────────────────────────────────────

#[test]
fn canonical_identifiers_round_trip() {
    for scheme in Scheme::ALL {
        assert_eq!(scheme.as_str().parse::<Scheme>(), Ok(scheme));
    }
}

#[test]
fn historical_aliases() {
    assert_eq!("10".parse::<Scheme>(), Ok(Scheme::TenDigit));
    assert_eq!("CD".parse::<Scheme>(), Ok(Scheme::TenDigit));
    assert_eq!("11".parse::<Scheme>(), Ok(Scheme::ElevenDigit));
    assert_eq!("StarCraft".parse::<Scheme>(), Ok(Scheme::Recurrence));
    assert_eq!("chicago".parse::<Scheme>(), Ok(Scheme::HashDerived));
}

#[test]
fn unknown_scheme() {
    assert_eq!(
        "office97".parse::<Scheme>(),
        Err(KeyError::UnknownScheme("office97".into()))
    );
}

// ── Dispatch ─────────────────────────────────────────────────────

#[test]
fn generated_key_reports_its_scheme() {
    let mut rng = seeded_rng(3);
    let options = KeyOptions::for_release(Release::Build99);
    for scheme in Scheme::ALL {
        let key = generate(scheme, &options, &mut rng).unwrap();
        assert_eq!(key.scheme(), scheme);
        assert!(key.check().is_ok(), "{scheme}: {key}");
    }
}

#[test]
fn validate_returns_the_structured_key() {
    let key = validate(Scheme::TenDigit, "118-5688143", &KeyOptions::default()).unwrap();
    let expected = TenDigitKey::from_segments("118", "5688143", false).unwrap();
    assert_eq!(key, Key::TenDigit(expected));
}

#[test]
fn same_seed_same_keys() {
    let options = KeyOptions::default();
    let first = generate_many(Scheme::Oem, &options, 25, &mut seeded_rng(99)).unwrap();
    let second = generate_many(Scheme::Oem, &options, 25, &mut seeded_rng(99)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 25);
}

#[test]
fn batch_surfaces_preset_errors() {
    let options = KeyOptions::default().with_presets(Presets {
        date_year: Some("00099".into()),
        ..Presets::default()
    });
    assert!(matches!(
        generate_many(Scheme::Oem, &options, 3, &mut seeded_rng(1)),
        Err(KeyError::BadDate { .. })
    ));
}

#[test]
fn unrelated_presets_are_ignored() {
    let options = KeyOptions::default().with_presets(Presets {
        prefix: Some("beef".into()),
        ..Presets::default()
    });
    assert!(generate(Scheme::Recurrence, &options, &mut seeded_rng(1)).is_ok());
}

#[test]
fn dyn_rng_is_accepted() {
    let mut rng = seeded_rng(5);
    let rng: &mut dyn rand::RngCore = &mut rng;
    assert!(generate(Scheme::ElevenDigit, &KeyOptions::default(), rng).is_ok());
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn key_json_is_tagged_by_scheme() {
    let key = validate(Scheme::Recurrence, "1234567891234", &KeyOptions::default()).unwrap();
    let json = serde_json::to_value(&key).unwrap();
    assert_eq!(json["scheme"], "recurrence");
    assert_eq!(json["digits"], "1234567891234");

    let restored: Key = serde_json::from_value(json).unwrap();
    assert_eq!(restored, key);
}

#[test]
fn options_deserialize_with_defaults() {
    let options: KeyOptions = serde_json::from_str(r#"{"release":"216"}"#).unwrap();
    assert_eq!(options, KeyOptions::for_release(Release::Build216));

    let options: KeyOptions =
        serde_json::from_str(r#"{"legacy":true,"presets":{"site":"123"}}"#).unwrap();
    assert!(options.legacy);
    assert_eq!(options.presets.site.as_deref(), Some("123"));
}
