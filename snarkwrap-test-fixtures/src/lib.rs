//! Synthetic inner-proof material for wrapper tests.
//!
//! Values are derived from blake3 over a seed so fixtures are deterministic:
//! the circuit seed drives the verifier-only data, the proof seed drives the
//! merkle caps. Two fixtures with the same circuit seed describe proofs of the
//! same inner circuit.

use std::path::Path;

use anyhow::{Context, Result};
use snarkwrap_common::{
    inner::{
        CommonCircuitData, FriConfig, FriParams, InnerCircuitConfig, InnerProof,
        ProofWithPublicInputs, VerifierOnlyCircuitData, HASH_LIMBS,
    },
    HashOut, InnerProofBundle, GOLDILOCKS_MODULUS,
};
use tempfile::TempDir;

/// Small circuit size that keeps keygen and proving fast in tests.
pub const TEST_K: u32 = 10;
pub const TEST_LOOKUP_BITS: usize = 8;

const DEFAULT_PUBLIC_INPUTS: [u64; 3] = [42, 7, 1_000_000_007];
const DEFAULT_DEGREE_BITS: usize = 12;

#[derive(Clone, Debug)]
pub struct InnerFixture {
    public_inputs: Vec<u64>,
    cap_height: usize,
    degree_bits: usize,
    circuit_seed: u64,
    proof_seed: u64,
}

impl Default for InnerFixture {
    fn default() -> Self {
        Self {
            public_inputs: DEFAULT_PUBLIC_INPUTS.to_vec(),
            cap_height: 1,
            degree_bits: DEFAULT_DEGREE_BITS,
            circuit_seed: 1,
            proof_seed: 1,
        }
    }
}

impl InnerFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also sets the declared public-input count.
    pub fn with_public_inputs(mut self, public_inputs: Vec<u64>) -> Self {
        self.public_inputs = public_inputs;
        self
    }

    pub fn with_cap_height(mut self, cap_height: usize) -> Self {
        self.cap_height = cap_height;
        self
    }

    pub fn with_circuit_seed(mut self, seed: u64) -> Self {
        self.circuit_seed = seed;
        self
    }

    pub fn with_proof_seed(mut self, seed: u64) -> Self {
        self.proof_seed = seed;
        self
    }

    pub fn public_inputs(&self) -> &[u64] {
        &self.public_inputs
    }

    pub fn bundle(&self) -> InnerProofBundle {
        let cap_len = 1usize << self.cap_height;
        let cap = |label: &str, seed: u64| -> Vec<HashOut> {
            (0..cap_len)
                .map(|idx| derive_hash(label, seed, idx as u64))
                .collect()
        };

        InnerProofBundle {
            common: CommonCircuitData {
                config: InnerCircuitConfig {
                    num_challenges: 2,
                    fri_config: FriConfig {
                        cap_height: self.cap_height,
                    },
                },
                fri_params: FriParams {
                    degree_bits: self.degree_bits,
                },
                num_public_inputs: self.public_inputs.len(),
            },
            proof: ProofWithPublicInputs {
                proof: InnerProof {
                    wires_cap: cap("wires", self.proof_seed),
                    plonk_zs_partial_products_cap: cap("zs", self.proof_seed),
                    quotient_polys_cap: cap("quotient", self.proof_seed),
                },
                public_inputs: self.public_inputs.clone(),
            },
            verifier_only: VerifierOnlyCircuitData {
                constants_sigmas_cap: cap("constants_sigmas", self.circuit_seed),
                circuit_digest: derive_hash("circuit_digest", self.circuit_seed, 0),
            },
        }
    }

    /// Writes the three inner-proof JSON documents into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<InnerProofBundle> {
        let bundle = self.bundle();
        bundle
            .write_to_dir(dir)
            .with_context(|| format!("failed to write inner fixture to {}", dir.display()))?;
        Ok(bundle)
    }

    /// Fresh temporary input directory holding only the inner-proof documents.
    pub fn temp_dir(&self) -> Result<(TempDir, InnerProofBundle)> {
        let dir = tempfile::tempdir().context("failed to create fixture dir")?;
        let bundle = self.write_to(dir.path())?;
        Ok((dir, bundle))
    }
}

fn derive_hash(label: &str, seed: u64, index: u64) -> HashOut {
    let mut hasher = blake3::Hasher::new();
    hasher.update(label.as_bytes());
    hasher.update(&seed.to_le_bytes());
    hasher.update(&index.to_le_bytes());
    let digest = hasher.finalize();

    let mut elements = [0u64; HASH_LIMBS];
    for (limb, chunk) in elements.iter_mut().zip(digest.as_bytes().chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word) % GOLDILOCKS_MODULUS;
    }
    HashOut { elements }
}
