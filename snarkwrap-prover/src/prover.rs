// snarkwrap/snarkwrap-prover/src/prover.rs
// Numan Thabit 2025

//! Lazy circuit/key materialization and the per-call proving pipeline.

use std::{
    mem,
    path::{Path, PathBuf},
    time::Instant,
};

use halo2curves_axiom::bn256::Fr;
use snarkwrap_circuit::{CompiledCircuit, WrapperWitness};
use snarkwrap_common::{ArtifactKind, InnerProofBundle, WrapError, PROOF_OUTPUT_FILE};
use tracing::{debug, info, warn};

use crate::{
    backend::{Halo2Backend, WrapperBackend},
    config::ProverConfig,
    keys::WrapperKeys,
    output::{clear_proof_output, serialize_proof_output, write_proof_output},
    store::ArtifactStore,
};

/// Initialization progress of a prover, as observed between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProverPhase {
    Uninitialized,
    CircuitReady,
    KeysReady,
}

enum ProverState {
    Uninitialized,
    CircuitReady {
        circuit: CompiledCircuit,
        /// Compiled in this process rather than loaded; cached keys predate it.
        freshly_compiled: bool,
    },
    KeysReady {
        circuit: CompiledCircuit,
        keys: WrapperKeys,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verification {
    Verified,
    /// No verifying key (dummy setup), or self-checks disabled.
    Skipped,
}

#[derive(Clone, Debug)]
pub struct ProveReport {
    pub output_path: PathBuf,
    pub verification: Verification,
    pub public_witness: Vec<Fr>,
}

/// Prover bound to one input directory. Circuit and keys are materialized on
/// the first call and reused for every later one; calls need `&mut self`, so
/// sharing an instance requires external locking.
pub struct WrapperProver<B: WrapperBackend = Halo2Backend> {
    store: ArtifactStore,
    config: ProverConfig,
    backend: B,
    state: ProverState,
}

impl WrapperProver<Halo2Backend> {
    pub fn new(input_dir: impl Into<PathBuf>, config: ProverConfig) -> Self {
        Self::with_backend(input_dir, config, Halo2Backend)
    }
}

impl<B: WrapperBackend> WrapperProver<B> {
    pub fn with_backend(input_dir: impl Into<PathBuf>, config: ProverConfig, backend: B) -> Self {
        Self {
            store: ArtifactStore::new(input_dir),
            config,
            backend,
            state: ProverState::Uninitialized,
        }
    }

    pub fn input_dir(&self) -> &Path {
        self.store.dir()
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn phase(&self) -> ProverPhase {
        match self.state {
            ProverState::Uninitialized => ProverPhase::Uninitialized,
            ProverState::CircuitReady { .. } => ProverPhase::CircuitReady,
            ProverState::KeysReady { .. } => ProverPhase::KeysReady,
        }
    }

    /// Compiled circuit, once materialized.
    pub fn circuit(&self) -> Option<&CompiledCircuit> {
        match &self.state {
            ProverState::Uninitialized => None,
            ProverState::CircuitReady { circuit, .. } | ProverState::KeysReady { circuit, .. } => {
                Some(circuit)
            }
        }
    }

    pub fn keys(&self) -> Option<&WrapperKeys> {
        match &self.state {
            ProverState::KeysReady { keys, .. } => Some(keys),
            _ => None,
        }
    }

    /// Wraps the inner proof found in the input directory and writes
    /// `snark_proof_with_public_inputs.json` to `output_dir`. A document left by
    /// an earlier call is removed first, so a failed call leaves no document
    /// behind.
    pub fn prove(&mut self, output_dir: &Path) -> Result<ProveReport, WrapError> {
        clear_proof_output(output_dir)?;
        let bundle = InnerProofBundle::read_from_dir(self.store.dir())?;
        self.initialize(&bundle)?;

        let (circuit, keys) = match &self.state {
            ProverState::KeysReady { circuit, keys } => (circuit, keys),
            _ => return Err(WrapError::Setup("prover keys were not initialized".into())),
        };

        let start = Instant::now();
        let witness = WrapperWitness::build(circuit, &bundle)?;
        let public_witness = witness.public_witness();
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            public_inputs = public_witness.len(),
            "witness built"
        );

        let start = Instant::now();
        let proof = self.backend.prove(circuit, keys.proving(), &witness)?;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            proof_bytes = proof.len(),
            "proof generated"
        );

        let verification = match keys.verifying() {
            Some(verifying) if self.config.verify_proofs => {
                let start = Instant::now();
                self.backend.verify(verifying, &proof, &public_witness)?;
                info!(elapsed_ms = start.elapsed().as_millis() as u64, "proof verified");
                Verification::Verified
            }
            Some(_) => {
                warn!("self-verification disabled by configuration, skipping");
                Verification::Skipped
            }
            None => {
                warn!("no verifying key available (dummy setup), skipping verification");
                Verification::Skipped
            }
        };

        let checked_against = match verification {
            Verification::Verified => keys.verifying(),
            Verification::Skipped => None,
        };
        let document = serialize_proof_output(&proof, checked_against, &public_witness)?;
        write_proof_output(output_dir, &document)?;
        let output_path = output_dir.join(PROOF_OUTPUT_FILE);
        info!(path = %output_path.display(), "proof output written");

        Ok(ProveReport {
            output_path,
            verification,
            public_witness,
        })
    }

    /// Drives `Uninitialized -> CircuitReady -> KeysReady`. A no-op once keys are ready;
    /// a failure leaves the state at the last completed step.
    pub fn initialize(&mut self, bundle: &InnerProofBundle) -> Result<(), WrapError> {
        if let ProverState::Uninitialized = self.state {
            let (circuit, freshly_compiled) = self.materialize_circuit(bundle)?;
            self.state = ProverState::CircuitReady {
                circuit,
                freshly_compiled,
            };
        }

        let keys = match &self.state {
            ProverState::CircuitReady {
                circuit,
                freshly_compiled,
            } => Some(self.materialize_keys(circuit, *freshly_compiled)?),
            _ => None,
        };
        if let Some(keys) = keys {
            self.state = match mem::replace(&mut self.state, ProverState::Uninitialized) {
                ProverState::CircuitReady { circuit, .. } => ProverState::KeysReady { circuit, keys },
                other => other,
            };
        }
        Ok(())
    }

    fn materialize_circuit(&self, bundle: &InnerProofBundle) -> Result<(CompiledCircuit, bool), WrapError> {
        if self.store.exists(ArtifactKind::Circuit) {
            let circuit = self.store.load_circuit()?;
            info!(dir = %self.store.dir().display(), k = circuit.k(), "loaded cached circuit");
            if circuit.k() != self.config.k {
                debug!(configured_k = self.config.k, cached_k = circuit.k(), "cached circuit keeps its own size");
            }
            return Ok((circuit, false));
        }

        info!(dir = %self.store.dir().display(), k = self.config.k, "no cached circuit, compiling");
        let start = Instant::now();
        let circuit = self.backend.compile(bundle, &self.config)?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "circuit compiled");
        self.store.store_circuit(&circuit)?;
        Ok((circuit, true))
    }

    fn materialize_keys(&self, circuit: &CompiledCircuit, freshly_compiled: bool) -> Result<WrapperKeys, WrapError> {
        let pk_cached = self.store.exists(ArtifactKind::ProvingKey);
        if pk_cached && !freshly_compiled {
            let start = Instant::now();
            let keys = self.store.load_keys(circuit)?;
            info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                verifying_key = keys.verifying().is_some(),
                "loaded cached keys"
            );
            return Ok(keys);
        }

        if pk_cached {
            warn!("circuit was recompiled, discarding cached keys");
        }
        info!(mode = ?self.config.setup_mode, "running setup");
        let start = Instant::now();
        let keys = self.backend.setup(circuit, self.config.setup_mode)?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "setup finished");
        self.store.store_keys(&keys)?;
        Ok(keys)
    }
}
