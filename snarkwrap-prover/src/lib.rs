// snarkwrap/snarkwrap-prover/src/lib.rs
// Numan Thabit 2025

pub mod backend;
pub mod config;
pub mod keys;
pub mod output;
pub mod prover;
pub mod registry;
pub mod store;

pub use backend::{create_wrapper_proof, Halo2Backend, WrapperBackend};
pub use config::{ProverConfig, SetupMode};
pub use keys::{ProvingKeyMaterial, VerifyingKeyMaterial, WrapperKeys};
pub use output::{serialize_proof_output, ProofOutput, SnarkProof};
pub use prover::{ProveReport, ProverPhase, Verification, WrapperProver};
pub use registry::{prove_snark, prove_snark_with_config};
pub use store::ArtifactStore;
