// snarkwrap/snarkwrap-prover/src/registry.rs
// Numan Thabit 2025

//! Process-wide provers, one per input directory.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use once_cell::sync::Lazy;
use snarkwrap_common::WrapError;
use tracing::debug;

use crate::{
    config::ProverConfig,
    prover::{ProveReport, WrapperProver},
};

type SharedProver = Arc<Mutex<WrapperProver>>;

static PROVERS: Lazy<Mutex<HashMap<PathBuf, SharedProver>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Proves with the shared prover for `input_dir`, configured from the environment
/// on first use. Provers are never evicted: the registry holds one entry per
/// canonical input directory for the life of the process.
pub fn prove_snark(input_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<ProveReport, WrapError> {
    prove_snark_with_config(input_dir, output_dir, ProverConfig::from_env)
}

/// Like [`prove_snark`]; `config` is only consulted when the directory has no
/// prover yet.
pub fn prove_snark_with_config(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: impl FnOnce() -> ProverConfig,
) -> Result<ProveReport, WrapError> {
    let input_dir = input_dir.as_ref();
    let key = fs::canonicalize(input_dir).map_err(|err| WrapError::io(input_dir, err))?;

    let prover = {
        let mut provers = PROVERS.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(provers.entry(key.clone()).or_insert_with(|| {
            debug!(dir = %key.display(), "registering prover");
            Arc::new(Mutex::new(WrapperProver::new(key.clone(), config())))
        }))
    };

    let mut prover = prover.lock().unwrap_or_else(PoisonError::into_inner);
    prover.prove(output_dir.as_ref())
}

/// Number of input directories with a live prover.
pub fn registered_provers() -> usize {
    PROVERS.lock().unwrap_or_else(PoisonError::into_inner).len()
}
