// snarkwrap/snarkwrap-prover/src/output.rs
// Numan Thabit 2025

//! `snark_proof_with_public_inputs.json` document.

use std::{fs, io::Write, path::Path};

use halo2curves_axiom::bn256::Fr;
use serde::{Deserialize, Serialize};
use snarkwrap_common::{fr_from_decimal, fr_to_decimal, WrapError, PROOF_OUTPUT_FILE};
use tempfile::NamedTempFile;

use crate::keys::VerifyingKeyMaterial;

pub const PROOF_SYSTEM: &str = "halo2-kzg-gwc";
pub const CURVE: &str = "bn254";
pub const TRANSCRIPT: &str = "blake2b-challenge255";

/// Self-describing proof payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnarkProof {
    pub system: String,
    pub curve: String,
    pub transcript: String,
    /// 0x-prefixed transcript bytes.
    pub proof: String,
    /// blake3 of the verifying key the proof was checked against. Absent when
    /// no check ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_key_blake3: Option<String>,
}

impl SnarkProof {
    pub fn proof_bytes(&self) -> Result<Vec<u8>, WrapError> {
        let raw = self.proof.strip_prefix("0x").unwrap_or(&self.proof);
        hex::decode(raw).map_err(|err| WrapError::Encoding(format!("proof hex: {err}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOutput {
    #[serde(rename = "Proof")]
    pub proof: SnarkProof,
    /// Public witness as base-10 integers, in witness order.
    #[serde(rename = "PublicWitness")]
    pub public_witness: Vec<String>,
}

impl ProofOutput {
    pub fn new(
        proof: &[u8],
        verifying: Option<&VerifyingKeyMaterial>,
        public_witness: &[Fr],
    ) -> Result<Self, WrapError> {
        let verifying_key_blake3 = verifying.map(|vk| vk.digest()).transpose()?;
        Ok(Self {
            proof: SnarkProof {
                system: PROOF_SYSTEM.to_string(),
                curve: CURVE.to_string(),
                transcript: TRANSCRIPT.to_string(),
                proof: format!("0x{}", hex::encode(proof)),
                verifying_key_blake3,
            },
            public_witness: encode_public_witness(public_witness),
        })
    }

    pub fn decode_public_witness(&self) -> Result<Vec<Fr>, WrapError> {
        self.public_witness
            .iter()
            .map(|value| fr_from_decimal(value))
            .collect()
    }

    pub fn read(path: &Path) -> Result<Self, WrapError> {
        let bytes = fs::read(path).map_err(|err| WrapError::io(path, err))?;
        serde_json::from_slice(&bytes).map_err(|err| WrapError::decode(PROOF_OUTPUT_FILE, err))
    }
}

pub fn encode_public_witness(public_witness: &[Fr]) -> Vec<String> {
    public_witness.iter().map(fr_to_decimal).collect()
}

/// Renders the output document.
pub fn serialize_proof_output(
    proof: &[u8],
    verifying: Option<&VerifyingKeyMaterial>,
    public_witness: &[Fr],
) -> Result<Vec<u8>, WrapError> {
    let output = ProofOutput::new(proof, verifying, public_witness)?;
    Ok(serde_json::to_vec(&output)?)
}

/// Writes the document under `output_dir`, creating the directory if needed.
/// The file is replaced atomically.
pub fn write_proof_output(output_dir: &Path, document: &[u8]) -> Result<(), WrapError> {
    fs::create_dir_all(output_dir).map_err(|err| WrapError::io(output_dir, err))?;
    let path = output_dir.join(PROOF_OUTPUT_FILE);
    let mut tmp = NamedTempFile::new_in(output_dir).map_err(|err| WrapError::io(output_dir, err))?;
    tmp.write_all(document).map_err(|err| WrapError::io(tmp.path(), err))?;
    tmp.as_file()
        .sync_all()
        .map_err(|err| WrapError::io(tmp.path(), err))?;
    tmp.persist(&path)
        .map_err(|err| WrapError::io(&path, err.error))?;
    Ok(())
}

/// Removes a document left in `output_dir` by an earlier call.
pub fn clear_proof_output(output_dir: &Path) -> Result<(), WrapError> {
    let path = output_dir.join(PROOF_OUTPUT_FILE);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(WrapError::io(&path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo2curves_axiom::ff::Field;
    use snarkwrap_common::GOLDILOCKS_MODULUS;

    #[test]
    fn public_witness_round_trips_in_order() {
        let values = [0u64, 1, 42, GOLDILOCKS_MODULUS - 1, u64::MAX];
        let witness: Vec<Fr> = values.iter().map(|v| Fr::from(*v)).collect();

        let bytes = serialize_proof_output(&[0xde, 0xad], None, &witness).unwrap();
        let output: ProofOutput = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(output.public_witness.len(), values.len());
        for (encoded, expected) in output.public_witness.iter().zip(values.iter()) {
            assert_eq!(encoded.parse::<u64>().unwrap(), *expected);
        }
        assert_eq!(output.decode_public_witness().unwrap(), witness);
    }

    #[test]
    fn large_scalars_are_plain_decimal() {
        let witness = vec![-Fr::ONE];
        let output = ProofOutput::new(&[], None, &witness).unwrap();
        assert_eq!(
            output.public_witness,
            vec!["21888242871839275222246405745257275088548364400416034343698204186575808495616"]
        );
    }

    #[test]
    fn document_has_two_named_fields() {
        let bytes = serialize_proof_output(&[1, 2, 3], None, &[Fr::from(9u64)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(value["PublicWitness"], serde_json::json!(["9"]));
        assert_eq!(value["Proof"]["proof"], "0x010203");
        assert_eq!(value["Proof"]["curve"], CURVE);
        assert!(value["Proof"].get("verifying_key_blake3").is_none());
    }

    #[test]
    fn proof_hex_round_trips() {
        let output = ProofOutput::new(&[7, 8, 9], None, &[]).unwrap();
        assert_eq!(output.proof.proof_bytes().unwrap(), vec![7, 8, 9]);
        assert!(output.public_witness.is_empty());
    }

    #[test]
    fn write_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("proofs");
        let bytes = serialize_proof_output(&[1], None, &[Fr::from(3u64)]).unwrap();
        write_proof_output(&nested, &bytes).unwrap();
        let output = ProofOutput::read(&nested.join(PROOF_OUTPUT_FILE)).unwrap();
        assert_eq!(output.public_witness, vec!["3"]);
    }

    #[test]
    fn rewrite_replaces_document_without_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        for value in [3u64, 4] {
            let bytes = serialize_proof_output(&[1], None, &[Fr::from(value)]).unwrap();
            write_proof_output(dir.path(), &bytes).unwrap();
        }
        let output = ProofOutput::read(&dir.path().join(PROOF_OUTPUT_FILE)).unwrap();
        assert_eq!(output.public_witness, vec!["4"]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn clear_removes_document_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        clear_proof_output(dir.path()).unwrap();

        let bytes = serialize_proof_output(&[1], None, &[]).unwrap();
        write_proof_output(dir.path(), &bytes).unwrap();
        clear_proof_output(dir.path()).unwrap();
        assert!(!dir.path().join(PROOF_OUTPUT_FILE).exists());
    }
}
