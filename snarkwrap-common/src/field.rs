// snarkwrap/snarkwrap-common/src/field.rs
// Numan Thabit 2025

//! BN254 scalar helpers and the Goldilocks modulus of the inner proof system.

use halo2curves_axiom::{bn256::Fr, ff::PrimeField};
use num_bigint::BigUint;

use crate::WrapError;

/// p = 2^64 - 2^32 + 1.
pub const GOLDILOCKS_MODULUS: u64 = 0xFFFF_FFFF_0000_0001;

pub fn is_canonical_goldilocks(value: u64) -> bool {
    value < GOLDILOCKS_MODULUS
}

pub fn fr_to_bytes(fr: &Fr) -> [u8; 32] {
    let repr = fr.to_repr();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(repr.as_ref());
    bytes
}

pub fn fr_from_bytes(bytes: &[u8; 32]) -> Option<Fr> {
    Fr::from_bytes(bytes).into_option()
}

pub fn fr_to_biguint(fr: &Fr) -> BigUint {
    BigUint::from_bytes_le(&fr_to_bytes(fr))
}

/// Canonical non-negative base-10 rendering of a scalar.
pub fn fr_to_decimal(fr: &Fr) -> String {
    fr_to_biguint(fr).to_str_radix(10)
}

/// Parses a base-10 string back into a scalar. Values at or above the BN254
/// scalar modulus are rejected rather than reduced.
pub fn fr_from_decimal(value: &str) -> Result<Fr, WrapError> {
    let big = BigUint::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| WrapError::Encoding(format!("`{value}` is not a decimal integer")))?;
    let le = big.to_bytes_le();
    if le.len() > 32 {
        return Err(WrapError::Encoding(format!(
            "`{value}` exceeds the bn256 scalar field"
        )));
    }
    let mut bytes = [0u8; 32];
    bytes[..le.len()].copy_from_slice(&le);
    fr_from_bytes(&bytes).ok_or_else(|| {
        WrapError::Encoding(format!("`{value}` exceeds the bn256 scalar field"))
    })
}

/// Returns the scalar as a `u64` when it fits in 64 bits.
pub fn fr_to_u64(fr: &Fr) -> Option<u64> {
    let bytes = fr_to_bytes(fr);
    if bytes[8..].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[..8]);
    Some(u64::from_le_bytes(low))
}
