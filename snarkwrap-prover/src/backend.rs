// snarkwrap/snarkwrap-prover/src/backend.rs
// Numan Thabit 2025

//! Compilation, setup, proving and verification collaborators.

use halo2_proofs_axiom::{
    plonk::{create_proof, keygen_pk, keygen_vk},
    poly::kzg::{
        commitment::{KZGCommitmentScheme, ParamsKZG},
        multiopen::ProverGWC,
    },
    transcript::{Blake2bWrite, Challenge255, TranscriptWriterBuffer},
};
use halo2curves_axiom::bn256::{Bn256, Fr, G1Affine};
use rand::rngs::OsRng;
use snarkwrap_circuit::{CompiledCircuit, WrapperCircuit, WrapperWitness};
use snarkwrap_common::{InnerProofBundle, WrapError};

use crate::{
    config::{ProverConfig, SetupMode},
    keys::{ProvingKeyMaterial, VerifyingKeyMaterial, WrapperKeys},
};

/// The four heavy operations the prover orchestrates. Swappable so the caching
/// state machine can be exercised against counting or faulty doubles.
pub trait WrapperBackend {
    fn compile(&self, bundle: &InnerProofBundle, config: &ProverConfig) -> Result<CompiledCircuit, WrapError>;

    fn setup(&self, compiled: &CompiledCircuit, mode: SetupMode) -> Result<WrapperKeys, WrapError>;

    fn prove(
        &self,
        compiled: &CompiledCircuit,
        keys: &ProvingKeyMaterial,
        witness: &WrapperWitness,
    ) -> Result<Vec<u8>, WrapError>;

    fn verify(&self, keys: &VerifyingKeyMaterial, proof: &[u8], public_witness: &[Fr]) -> Result<(), WrapError>;
}

/// halo2 KZG/GWC over BN254.
#[derive(Clone, Copy, Debug, Default)]
pub struct Halo2Backend;

impl WrapperBackend for Halo2Backend {
    fn compile(&self, bundle: &InnerProofBundle, config: &ProverConfig) -> Result<CompiledCircuit, WrapError> {
        config.validate()?;
        snarkwrap_circuit::compile(bundle, config.k, config.lookup_bits)
    }

    fn setup(&self, compiled: &CompiledCircuit, mode: SetupMode) -> Result<WrapperKeys, WrapError> {
        let params = ParamsKZG::<Bn256>::setup(compiled.k(), OsRng);
        let circuit = WrapperCircuit::keygen(compiled);
        let vk = keygen_vk(&params, &circuit)
            .map_err(|err| WrapError::Setup(format!("verifying key generation: {err:?}")))?;

        match mode {
            SetupMode::Full => {
                let pk = keygen_pk(&params, vk.clone(), &circuit)
                    .map_err(|err| WrapError::Setup(format!("proving key generation: {err:?}")))?;
                Ok(WrapperKeys::Full {
                    proving: ProvingKeyMaterial {
                        params: params.clone(),
                        pk,
                    },
                    verifying: VerifyingKeyMaterial { params, vk },
                })
            }
            SetupMode::Dummy => {
                let pk = keygen_pk(&params, vk, &circuit)
                    .map_err(|err| WrapError::Setup(format!("proving key generation: {err:?}")))?;
                Ok(WrapperKeys::ProvingKeyOnly(ProvingKeyMaterial { params, pk }))
            }
        }
    }

    fn prove(
        &self,
        compiled: &CompiledCircuit,
        keys: &ProvingKeyMaterial,
        witness: &WrapperWitness,
    ) -> Result<Vec<u8>, WrapError> {
        create_wrapper_proof(&keys.params, &keys.pk, compiled, witness)
    }

    fn verify(&self, keys: &VerifyingKeyMaterial, proof: &[u8], public_witness: &[Fr]) -> Result<(), WrapError> {
        snarkwrap_verifier::verify_public_witness(&keys.params, &keys.vk, proof, public_witness)
    }
}

pub fn create_wrapper_proof(
    params: &ParamsKZG<Bn256>,
    pk: &halo2_proofs_axiom::plonk::ProvingKey<G1Affine>,
    compiled: &CompiledCircuit,
    witness: &WrapperWitness,
) -> Result<Vec<u8>, WrapError> {
    let instance_columns = witness.instances();
    let instance_refs: Vec<&[Fr]> = instance_columns.iter().map(|col| col.as_slice()).collect();

    let circuit = WrapperCircuit::with_witness(compiled, witness.clone());

    let mut transcript = Blake2bWrite::<_, G1Affine, Challenge255<_>>::init(vec![]);
    create_proof::<KZGCommitmentScheme<Bn256>, ProverGWC<'_, Bn256>, _, _, _, _>(
        params,
        pk,
        &[circuit],
        &[instance_refs.as_slice()],
        OsRng,
        &mut transcript,
    )
    .map_err(|err| WrapError::Proving(format!("{err:?}")))?;
    Ok(transcript.finalize())
}
