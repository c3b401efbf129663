//! Generation and validation of legacy product activation keys.
//!
//! Three independent families are supported:
//! - Modulo-7 keys: ten-digit, eleven-digit and OEM ([`mod7`])
//! - Thirteen-digit keys closed by a recurrence check digit ([`recurrence`])
//! - Site/password pairs derived from an MD4 digest ([`hash_derived`])
//!
//! # Design Principles
//!
//! - **Structured keys**: every key is a value of named segments, so a
//!   failed validation can say which segment broke which rule
//! - **Injected randomness**: generators take `&mut R: Rng`; a seeded
//!   `StdRng` reproduces a run exactly
//! - **Validation is not exceptional**: a malformed key is reported as a
//!   [`KeyError`], never a panic
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use unikey_keys::{KeyOptions, Scheme, generate, validate};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let options = KeyOptions::default();
//! let key = generate(Scheme::Oem, &options, &mut rng).unwrap();
//! assert!(validate(Scheme::Oem, &key.canonical_string(), &options).is_ok());
//! ```

mod digits;
mod error;
pub mod hash_derived;
pub mod mod7;
pub mod recurrence;
mod scheme;

pub use digits::{digit_sum, is_leap_year};
pub use error::{KeyError, KeyResult, Segment};
pub use hash_derived::{HashDerivedKey, Release, derive_password};
pub use mod7::{ElevenDigitKey, OemKey, TenDigitKey};
pub use recurrence::RecurrenceKey;
pub use scheme::{Key, KeyOptions, Presets, Scheme, generate, generate_many, validate};
