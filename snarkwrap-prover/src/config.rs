// snarkwrap/snarkwrap-prover/src/config.rs
// Numan Thabit 2025

use std::env;

use snarkwrap_circuit::{MAX_K, MIN_K};
use snarkwrap_common::WrapError;
use tracing::warn;

pub const K_ENV: &str = "SNARKWRAP_K";
pub const LOOKUP_BITS_ENV: &str = "SNARKWRAP_LOOKUP_BITS";
pub const DUMMY_SETUP_ENV: &str = "SNARKWRAP_DUMMY_SETUP";
pub const SKIP_VERIFY_ENV: &str = "SNARKWRAP_SKIP_VERIFY";

pub const DEFAULT_K: u32 = 16;
pub const DEFAULT_LOOKUP_BITS: usize = 15;

/// Whether setup produces a verifying key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SetupMode {
    #[default]
    Full,
    /// Proving key only; verification is left to an external verifier.
    Dummy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProverConfig {
    /// Circuit size used when compiling on a cache miss. A cached circuit keeps its own.
    pub k: u32,
    pub lookup_bits: usize,
    pub setup_mode: SetupMode,
    /// Self-check proofs whenever a verifying key is available.
    pub verify_proofs: bool,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            lookup_bits: DEFAULT_LOOKUP_BITS,
            setup_mode: SetupMode::Full,
            verify_proofs: true,
        }
    }
}

impl ProverConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unparsable values fall back
    /// to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let k = parse_or(&lookup, K_ENV, defaults.k);
        let lookup_bits = parse_or(&lookup, LOOKUP_BITS_ENV, defaults.lookup_bits);
        let setup_mode = if flag(&lookup, DUMMY_SETUP_ENV) {
            SetupMode::Dummy
        } else {
            SetupMode::Full
        };
        Self {
            k,
            lookup_bits,
            setup_mode,
            verify_proofs: !flag(&lookup, SKIP_VERIFY_ENV),
        }
    }

    pub fn validate(&self) -> Result<(), WrapError> {
        if !(MIN_K..=MAX_K).contains(&self.k) {
            return Err(WrapError::Compilation(format!(
                "k = {} is outside the supported range {MIN_K}..={MAX_K}",
                self.k
            )));
        }
        if self.lookup_bits == 0 || self.lookup_bits >= self.k as usize {
            return Err(WrapError::Compilation(format!(
                "lookup_bits = {} must be in 1..{}",
                self.lookup_bits, self.k
            )));
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparsable config value");
            default
        }),
        None => default,
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|v| v.trim().to_ascii_lowercase())
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
