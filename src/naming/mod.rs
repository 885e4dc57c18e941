//! Deterministic cache-key and storage-path derivation.
//!
//! A [`Namer`] turns a base name plus the sorted relevant-argument map into
//! a storage key: `<base>.<arg>-<value>.<arg>-<value>`. Keys stay
//! human-readable when they can. Enabling abbreviation collapses argument
//! names to the initials of their underscore-delimited words and appends a
//! short digest to compensate for the collisions that introduces. Keys that
//! exceed the configured maximum length degrade to `<base>.<digest>` with a
//! longer digest: degraded keys stop being readable but stay unique, which
//! truncation would not.
//!
//! All digests are truncated SHA-256, so a key derived today in one process
//! equals the key derived tomorrow in another. Language-default hashers are
//! seeded per process and must never leak into key derivation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::value::ArgValue;

/// Keys longer than this degrade to `<base>.<digest>` form.
pub const DEFAULT_MAX_LENGTH: usize = 245;
/// Digits in the digest used for degraded (over-length) keys.
pub const DEFAULT_HASH_DIGITS: usize = 16;
/// Digits in the digest appended to abbreviated keys.
pub const DEFAULT_ABBREV_HASH_DIGITS: usize = 4;

/// Error type for key derivation attempted before one-time configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// The namer is missing a required configuration value.
    #[error("namer requires `{0}` to be configured before deriving keys")]
    Unconfigured(&'static str),
}

/// Derives deterministic cache keys and storage paths.
///
/// `directory` and `name` are one-time configuration: the first
/// [`configure_directory`](Namer::configure_directory) /
/// [`configure_name`](Namer::configure_name) call wins and later calls are
/// no-ops, modeling registration at decoration time. The remaining knobs
/// are set at construction. Changing any knob changes the keys a namer
/// derives; that is expected, not a defect.
#[derive(Debug, Clone)]
pub struct Namer {
    directory: Option<PathBuf>,
    name: Option<String>,
    max_length: usize,
    hash_digits: usize,
    abbreviate: bool,
    abbrev_hash_digits: usize,
}

impl Default for Namer {
    fn default() -> Self {
        Namer {
            directory: None,
            name: None,
            max_length: DEFAULT_MAX_LENGTH,
            hash_digits: DEFAULT_HASH_DIGITS,
            abbreviate: false,
            abbrev_hash_digits: DEFAULT_ABBREV_HASH_DIGITS,
        }
    }
}

impl Namer {
    /// Create a namer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum key length before degradation.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the digest length (decimal digits) for degraded keys.
    pub fn with_hash_digits(mut self, hash_digits: usize) -> Self {
        self.hash_digits = hash_digits;
        self
    }

    /// Abbreviate argument names to the initials of their
    /// underscore-delimited words, trading readability for shortness.
    pub fn with_abbreviation(mut self, abbreviate: bool) -> Self {
        self.abbreviate = abbreviate;
        self
    }

    /// Set the digest length (decimal digits) appended to abbreviated keys.
    pub fn with_abbrev_hash_digits(mut self, abbrev_hash_digits: usize) -> Self {
        self.abbrev_hash_digits = abbrev_hash_digits;
        self
    }

    /// Set the base name unless one is already configured (first-set-wins).
    pub fn configure_name(&mut self, name: &str) -> &mut Self {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
        self
    }

    /// Set the storage directory unless one is already configured
    /// (first-set-wins).
    pub fn configure_directory(&mut self, directory: impl Into<PathBuf>) -> &mut Self {
        if self.directory.is_none() {
            self.directory = Some(directory.into());
        }
        self
    }

    /// Derive the cache key for a relevant-argument map.
    ///
    /// Arguments are iterated in sorted name order, so the key is
    /// independent of how the arguments were supplied.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::Unconfigured`] if no base name is set.
    pub fn name_for_args(&self, args: &BTreeMap<String, ArgValue>) -> Result<String, NamingError> {
        let base = self
            .name
            .as_deref()
            .ok_or(NamingError::Unconfigured("name"))?;

        let mut segments = vec![base.to_string()];
        for (arg_name, value) in args {
            let rendered = if self.abbreviate {
                abbreviate_name(arg_name)
            } else {
                arg_name.clone()
            };
            segments.push(format!("{}-{}", rendered, value));
        }
        let mut name = segments.join(".");

        // Abbreviated names are no longer unique on their own, so a short
        // digest of the pre-hash name is appended.
        if self.abbreviate {
            name = format!("{}.{}", name, stable_digest(&name, self.abbrev_hash_digits));
        }

        // Over-length names are replaced wholesale rather than truncated:
        // the digest covers the full readable name, so distinct argument
        // sets keep distinct keys.
        if name.len() > self.max_length {
            let digest = stable_digest(&name, self.hash_digits);
            name = format!("{}.{}", base, digest);
            if name.len() > self.max_length {
                name = digest;
            }
        }

        Ok(name)
    }

    /// Derive the suffix-free storage path for a relevant-argument map.
    ///
    /// The persistence strategy appends its own format suffix.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::Unconfigured`] if no directory or no base
    /// name is set.
    pub fn path_for_args(&self, args: &BTreeMap<String, ArgValue>) -> Result<PathBuf, NamingError> {
        let directory = self
            .directory
            .as_ref()
            .ok_or(NamingError::Unconfigured("directory"))?;
        Ok(directory.join(self.name_for_args(args)?))
    }
}

/// Collapse `snake_case_name` to the initials of its words (`scn`).
fn abbreviate_name(name: &str) -> String {
    name.split('_')
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Truncated SHA-256 rendered as a fixed number of decimal digits.
///
/// The first eight digest bytes are taken as a big-endian integer and
/// reduced modulo `10^digits`. `digits` is capped at 19 (the widest power
/// of ten a `u64` holds).
fn stable_digest(input: &str, digits: usize) -> String {
    let hash = Sha256::digest(input.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash[..8]);
    let value = u64::from_be_bytes(prefix);

    let digits = digits.clamp(1, 19);
    let modulus = 10u64.saturating_pow(digits as u32);
    format!("{:0width$}", value % modulus, width = digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, ArgValue)]) -> BTreeMap<String, ArgValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn named(base: &str) -> Namer {
        let mut namer = Namer::new();
        namer.configure_name(base);
        namer
    }

    #[test]
    fn renders_sorted_name_value_segments() {
        let namer = named("f");
        let name = namer
            .name_for_args(&args(&[
                ("b", ArgValue::from(vec![2, 4])),
                ("a", ArgValue::from(1)),
            ]))
            .unwrap();
        assert_eq!(name, "f.a-1.b-2,4");
    }

    #[test]
    fn empty_args_yield_bare_base_name() {
        let namer = named("f");
        assert_eq!(namer.name_for_args(&BTreeMap::new()).unwrap(), "f");
    }

    #[test]
    fn derivation_is_deterministic() {
        let namer = named("train");
        let map = args(&[
            ("learning_rate", ArgValue::from(0.5)),
            ("num_layers", ArgValue::from(3)),
        ]);
        assert_eq!(
            namer.name_for_args(&map).unwrap(),
            namer.name_for_args(&map).unwrap()
        );
    }

    #[test]
    fn abbreviation_appends_stable_digest() {
        let namer = named("train").with_abbreviation(true);
        let name = namer
            .name_for_args(&args(&[
                ("learning_rate", ArgValue::from(0.5)),
                ("num_layers", ArgValue::from(3)),
            ]))
            .unwrap();
        // SHA-256("train.lr-0.5.nl-3"), first 8 bytes mod 10^4.
        assert_eq!(name, "train.lr-0.5.nl-3.3741");
    }

    #[test]
    fn abbreviated_digest_tracks_argument_values() {
        let namer = named("train").with_abbreviation(true);
        let changed = namer
            .name_for_args(&args(&[
                ("learning_rate", ArgValue::from(0.7)),
                ("num_layers", ArgValue::from(3)),
            ]))
            .unwrap();
        assert_eq!(changed, "train.lr-0.7.nl-3.4503");
    }

    #[test]
    fn over_length_names_degrade_to_base_and_digest() {
        let namer = named("f");
        let long_value: String = std::iter::repeat('x').take(300).collect();
        let name = namer
            .name_for_args(&args(&[("data", ArgValue::from(long_value))]))
            .unwrap();
        // SHA-256 of the full readable name, first 8 bytes mod 10^16.
        assert_eq!(name, "f.3945512366794291");
        assert!(name.len() <= DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn degraded_names_never_exceed_max_length() {
        let base: String = std::iter::repeat('b').take(60).collect();
        let namer = named(&base).with_max_length(32);
        let long_value: String = std::iter::repeat('x').take(100).collect();
        let name = namer
            .name_for_args(&args(&[("data", ArgValue::from(long_value))]))
            .unwrap();
        assert!(name.len() <= 32);
        assert_eq!(name.len(), DEFAULT_HASH_DIGITS);
    }

    #[test]
    fn configuration_is_first_set_wins() {
        let mut namer = Namer::new();
        namer.configure_name("first").configure_name("second");
        namer
            .configure_directory("/tmp/one")
            .configure_directory("/tmp/two");

        let path = namer.path_for_args(&BTreeMap::new()).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/one/first"));
    }

    #[test]
    fn unconfigured_namer_reports_what_is_missing() {
        let namer = Namer::new();
        assert_eq!(
            namer.name_for_args(&BTreeMap::new()).unwrap_err(),
            NamingError::Unconfigured("name")
        );

        let named_only = named("f");
        assert_eq!(
            named_only.path_for_args(&BTreeMap::new()).unwrap_err(),
            NamingError::Unconfigured("directory")
        );
    }

    #[test]
    fn abbreviation_collapses_underscore_words() {
        assert_eq!(abbreviate_name("learning_rate"), "lr");
        assert_eq!(abbreviate_name("a"), "a");
        assert_eq!(abbreviate_name("num_hidden_units"), "nhu");
    }
}
