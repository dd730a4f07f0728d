// snarkwrap/snarkwrap-common/src/lib.rs
// Numan Thabit 2025

pub mod container;
pub mod error;
pub mod field;
pub mod inner;

pub use container::{decode_container, encode_container, ArtifactKind, ContainerError};
pub use error::WrapError;
pub use field::{
    fr_from_bytes, fr_from_decimal, fr_to_bytes, fr_to_decimal, fr_to_u64, GOLDILOCKS_MODULUS,
};
pub use inner::{HashOut, InnerProofBundle};

// Cache artifacts under the input directory.
pub const CIRCUIT_FILE: &str = "circuit";
pub const PROVING_KEY_FILE: &str = "proving.key";
pub const VERIFYING_KEY_FILE: &str = "verifying.key";

// Inner-proof documents, read on every call.
pub const COMMON_CIRCUIT_DATA_FILE: &str = "common_circuit_data.json";
pub const PROOF_WITH_PUBLIC_INPUTS_FILE: &str = "proof_with_public_inputs.json";
pub const VERIFIER_ONLY_CIRCUIT_DATA_FILE: &str = "verifier_only_circuit_data.json";

pub const PROOF_OUTPUT_FILE: &str = "snark_proof_with_public_inputs.json";

pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
