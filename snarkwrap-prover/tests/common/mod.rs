#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use halo2curves_axiom::bn256::Fr;
use snarkwrap_circuit::{CompiledCircuit, WrapperWitness};
use snarkwrap_common::{InnerProofBundle, WrapError};
use snarkwrap_prover::{
    Halo2Backend, ProverConfig, ProvingKeyMaterial, SetupMode, VerifyingKeyMaterial,
    WrapperBackend, WrapperKeys,
};
use snarkwrap_test_fixtures::{TEST_K, TEST_LOOKUP_BITS};

pub fn test_config() -> ProverConfig {
    ProverConfig {
        k: TEST_K,
        lookup_bits: TEST_LOOKUP_BITS,
        ..ProverConfig::default()
    }
}

pub fn dummy_config() -> ProverConfig {
    ProverConfig {
        setup_mode: SetupMode::Dummy,
        ..test_config()
    }
}

#[derive(Debug, Default)]
pub struct Counts {
    pub compile: AtomicUsize,
    pub setup: AtomicUsize,
    pub prove: AtomicUsize,
    pub verify: AtomicUsize,
}

impl Counts {
    pub fn compile(&self) -> usize {
        self.compile.load(Ordering::SeqCst)
    }

    pub fn setup(&self) -> usize {
        self.setup.load(Ordering::SeqCst)
    }

    pub fn prove(&self) -> usize {
        self.prove.load(Ordering::SeqCst)
    }

    pub fn verify(&self) -> usize {
        self.verify.load(Ordering::SeqCst)
    }
}

/// Real backend that records how often each collaborator is invoked.
#[derive(Clone, Default)]
pub struct CountingBackend {
    counts: Arc<Counts>,
}

impl CountingBackend {
    pub fn new() -> (Self, Arc<Counts>) {
        let backend = Self::default();
        let counts = Arc::clone(&backend.counts);
        (backend, counts)
    }
}

impl WrapperBackend for CountingBackend {
    fn compile(&self, bundle: &InnerProofBundle, config: &ProverConfig) -> Result<CompiledCircuit, WrapError> {
        self.counts.compile.fetch_add(1, Ordering::SeqCst);
        Halo2Backend.compile(bundle, config)
    }

    fn setup(&self, compiled: &CompiledCircuit, mode: SetupMode) -> Result<WrapperKeys, WrapError> {
        self.counts.setup.fetch_add(1, Ordering::SeqCst);
        Halo2Backend.setup(compiled, mode)
    }

    fn prove(
        &self,
        compiled: &CompiledCircuit,
        keys: &ProvingKeyMaterial,
        witness: &WrapperWitness,
    ) -> Result<Vec<u8>, WrapError> {
        self.counts.prove.fetch_add(1, Ordering::SeqCst);
        Halo2Backend.prove(compiled, keys, witness)
    }

    fn verify(&self, keys: &VerifyingKeyMaterial, proof: &[u8], public_witness: &[Fr]) -> Result<(), WrapError> {
        self.counts.verify.fetch_add(1, Ordering::SeqCst);
        Halo2Backend.verify(keys, proof, public_witness)
    }
}

/// Produces proofs that cannot pass verification.
#[derive(Clone, Copy, Default)]
pub struct TamperingBackend;

impl WrapperBackend for TamperingBackend {
    fn compile(&self, bundle: &InnerProofBundle, config: &ProverConfig) -> Result<CompiledCircuit, WrapError> {
        Halo2Backend.compile(bundle, config)
    }

    fn setup(&self, compiled: &CompiledCircuit, mode: SetupMode) -> Result<WrapperKeys, WrapError> {
        Halo2Backend.setup(compiled, mode)
    }

    fn prove(
        &self,
        compiled: &CompiledCircuit,
        keys: &ProvingKeyMaterial,
        witness: &WrapperWitness,
    ) -> Result<Vec<u8>, WrapError> {
        let mut proof = Halo2Backend.prove(compiled, keys, witness)?;
        let last = proof.len() - 1;
        proof[last] ^= 0x01;
        Ok(proof)
    }

    fn verify(&self, keys: &VerifyingKeyMaterial, proof: &[u8], public_witness: &[Fr]) -> Result<(), WrapError> {
        Halo2Backend.verify(keys, proof, public_witness)
    }
}

/// Compiles normally, then fails setup.
#[derive(Clone, Copy, Default)]
pub struct FailingSetupBackend;

impl WrapperBackend for FailingSetupBackend {
    fn compile(&self, bundle: &InnerProofBundle, config: &ProverConfig) -> Result<CompiledCircuit, WrapError> {
        Halo2Backend.compile(bundle, config)
    }

    fn setup(&self, _compiled: &CompiledCircuit, _mode: SetupMode) -> Result<WrapperKeys, WrapError> {
        Err(WrapError::Setup("ceremony unavailable".into()))
    }

    fn prove(
        &self,
        compiled: &CompiledCircuit,
        keys: &ProvingKeyMaterial,
        witness: &WrapperWitness,
    ) -> Result<Vec<u8>, WrapError> {
        Halo2Backend.prove(compiled, keys, witness)
    }

    fn verify(&self, keys: &VerifyingKeyMaterial, proof: &[u8], public_witness: &[Fr]) -> Result<(), WrapError> {
        Halo2Backend.verify(keys, proof, public_witness)
    }
}
