// snarkwrap/snarkwrap-common/src/inner.rs
// Numan Thabit 2025

//! JSON artifacts of the inner (Goldilocks) proof system.
//!
//! Only the fields the wrapper binds are modeled; everything else in the
//! upstream documents is ignored on deserialization.

use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    field::is_canonical_goldilocks, WrapError, COMMON_CIRCUIT_DATA_FILE,
    PROOF_WITH_PUBLIC_INPUTS_FILE, VERIFIER_ONLY_CIRCUIT_DATA_FILE,
};

/// Largest merkle cap height the wrapper circuit accepts.
pub const MAX_CAP_HEIGHT: usize = 8;
/// Goldilocks limbs per hash digest.
pub const HASH_LIMBS: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashOut {
    pub elements: [u64; HASH_LIMBS],
}

pub type MerkleCap = Vec<HashOut>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriConfig {
    pub cap_height: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerCircuitConfig {
    #[serde(default = "default_num_challenges")]
    pub num_challenges: usize,
    pub fri_config: FriConfig,
}

fn default_num_challenges() -> usize {
    2
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriParams {
    pub degree_bits: usize,
}

/// Subset of the inner circuit's common data that fixes the wrapper topology.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonCircuitData {
    pub config: InnerCircuitConfig,
    pub fri_params: FriParams,
    pub num_public_inputs: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerProof {
    pub wires_cap: MerkleCap,
    pub plonk_zs_partial_products_cap: MerkleCap,
    pub quotient_polys_cap: MerkleCap,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofWithPublicInputs {
    pub proof: InnerProof,
    pub public_inputs: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierOnlyCircuitData {
    pub constants_sigmas_cap: MerkleCap,
    pub circuit_digest: HashOut,
}

/// Per-request inner proof material, read fresh from the input directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InnerProofBundle {
    pub common: CommonCircuitData,
    pub proof: ProofWithPublicInputs,
    pub verifier_only: VerifierOnlyCircuitData,
}

impl InnerProofBundle {
    pub fn read_from_dir(dir: &Path) -> Result<Self, WrapError> {
        let bundle = Self {
            common: read_json(dir, COMMON_CIRCUIT_DATA_FILE)?,
            proof: read_json(dir, PROOF_WITH_PUBLIC_INPUTS_FILE)?,
            verifier_only: read_json(dir, VERIFIER_ONLY_CIRCUIT_DATA_FILE)?,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn write_to_dir(&self, dir: &Path) -> Result<(), WrapError> {
        write_json(dir, COMMON_CIRCUIT_DATA_FILE, &self.common)?;
        write_json(dir, PROOF_WITH_PUBLIC_INPUTS_FILE, &self.proof)?;
        write_json(dir, VERIFIER_ONLY_CIRCUIT_DATA_FILE, &self.verifier_only)
    }

    pub fn cap_len(&self) -> usize {
        1 << self.common.config.fri_config.cap_height
    }

    /// Structural checks: cap sizes, public-input count and canonical field elements.
    pub fn validate(&self) -> Result<(), WrapError> {
        let cap_height = self.common.config.fri_config.cap_height;
        if cap_height > MAX_CAP_HEIGHT {
            return Err(WrapError::decode(
                COMMON_CIRCUIT_DATA_FILE,
                format!("cap_height {cap_height} exceeds maximum {MAX_CAP_HEIGHT}"),
            ));
        }
        let expected_cap = self.cap_len();

        let proof = &self.proof.proof;
        for (name, cap) in [
            ("wires_cap", &proof.wires_cap),
            ("plonk_zs_partial_products_cap", &proof.plonk_zs_partial_products_cap),
            ("quotient_polys_cap", &proof.quotient_polys_cap),
        ] {
            check_cap(PROOF_WITH_PUBLIC_INPUTS_FILE, name, cap, expected_cap)?;
        }
        check_cap(
            VERIFIER_ONLY_CIRCUIT_DATA_FILE,
            "constants_sigmas_cap",
            &self.verifier_only.constants_sigmas_cap,
            expected_cap,
        )?;
        check_hash(
            VERIFIER_ONLY_CIRCUIT_DATA_FILE,
            "circuit_digest",
            &self.verifier_only.circuit_digest,
        )?;

        let declared = self.common.num_public_inputs;
        let actual = self.proof.public_inputs.len();
        if declared != actual {
            return Err(WrapError::decode(
                PROOF_WITH_PUBLIC_INPUTS_FILE,
                format!("expected {declared} public inputs, found {actual}"),
            ));
        }
        if let Some((idx, value)) = self
            .proof
            .public_inputs
            .iter()
            .enumerate()
            .find(|(_, v)| !is_canonical_goldilocks(**v))
        {
            return Err(WrapError::decode(
                PROOF_WITH_PUBLIC_INPUTS_FILE,
                format!("public input {idx} ({value}) is not a canonical goldilocks element"),
            ));
        }
        Ok(())
    }
}

fn check_cap(file: &str, name: &str, cap: &[HashOut], expected: usize) -> Result<(), WrapError> {
    if cap.len() != expected {
        return Err(WrapError::decode(
            file,
            format!("{name} has {} entries, expected {expected}", cap.len()),
        ));
    }
    cap.iter().try_for_each(|hash| check_hash(file, name, hash))
}

fn check_hash(file: &str, name: &str, hash: &HashOut) -> Result<(), WrapError> {
    match hash.elements.iter().find(|v| !is_canonical_goldilocks(**v)) {
        Some(value) => Err(WrapError::decode(
            file,
            format!("{name} contains non-canonical element {value}"),
        )),
        None => Ok(()),
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, WrapError> {
    let path = dir.join(name);
    let bytes = fs::read(&path).map_err(|err| WrapError::io(&path, err))?;
    serde_json::from_slice(&bytes).map_err(|err| WrapError::decode(name, err))
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<(), WrapError> {
    let path = dir.join(name);
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(&path, json).map_err(|err| WrapError::io(&path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GOLDILOCKS_MODULUS;

    fn hash(seed: u64) -> HashOut {
        HashOut {
            elements: [seed, seed + 1, seed + 2, seed + 3],
        }
    }

    fn sample_bundle() -> InnerProofBundle {
        InnerProofBundle {
            common: CommonCircuitData {
                config: InnerCircuitConfig {
                    num_challenges: 2,
                    fri_config: FriConfig { cap_height: 1 },
                },
                fri_params: FriParams { degree_bits: 12 },
                num_public_inputs: 3,
            },
            proof: ProofWithPublicInputs {
                proof: InnerProof {
                    wires_cap: vec![hash(10), hash(20)],
                    plonk_zs_partial_products_cap: vec![hash(30), hash(40)],
                    quotient_polys_cap: vec![hash(50), hash(60)],
                },
                public_inputs: vec![7, 0, GOLDILOCKS_MODULUS - 1],
            },
            verifier_only: VerifierOnlyCircuitData {
                constants_sigmas_cap: vec![hash(70), hash(80)],
                circuit_digest: hash(90),
            },
        }
    }

    #[test]
    fn write_then_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = sample_bundle();
        bundle.write_to_dir(dir.path()).unwrap();
        let loaded = InnerProofBundle::read_from_dir(dir.path()).unwrap();
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn ignores_unknown_upstream_fields() {
        let json = r#"{
            "config": {
                "num_wires": 135,
                "num_challenges": 2,
                "fri_config": { "rate_bits": 3, "cap_height": 4, "num_query_rounds": 28 }
            },
            "fri_params": { "degree_bits": 13, "hiding": false },
            "num_public_inputs": 2,
            "num_constants": 2
        }"#;
        let common: CommonCircuitData = serde_json::from_str(json).unwrap();
        assert_eq!(common.config.fri_config.cap_height, 4);
        assert_eq!(common.fri_params.degree_bits, 13);
        assert_eq!(common.num_public_inputs, 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InnerProofBundle::read_from_dir(dir.path()).unwrap_err();
        assert_eq!(err.phase(), "io");
    }

    #[test]
    fn malformed_json_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        sample_bundle().write_to_dir(dir.path()).unwrap();
        fs::write(dir.path().join(PROOF_WITH_PUBLIC_INPUTS_FILE), b"{ nope").unwrap();
        let err = InnerProofBundle::read_from_dir(dir.path()).unwrap_err();
        assert_eq!(err.phase(), "deserialization");
    }

    #[test]
    fn rejects_wrong_cap_length() {
        let mut bundle = sample_bundle();
        bundle.proof.proof.wires_cap.pop();
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn rejects_public_input_count_mismatch() {
        let mut bundle = sample_bundle();
        bundle.proof.public_inputs.push(1);
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn rejects_non_canonical_elements() {
        let mut bundle = sample_bundle();
        bundle.proof.public_inputs[1] = GOLDILOCKS_MODULUS;
        assert!(bundle.validate().is_err());

        let mut bundle = sample_bundle();
        bundle.verifier_only.circuit_digest.elements[2] = u64::MAX;
        assert!(bundle.validate().is_err());
    }
}
