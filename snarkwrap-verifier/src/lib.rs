// snarkwrap/snarkwrap-verifier/src/lib.rs
// Numan Thabit 2025

use halo2_proofs_axiom::{
    plonk::{verify_proof, VerifyingKey},
    poly::kzg::{
        commitment::{KZGCommitmentScheme, ParamsKZG},
        multiopen::VerifierGWC,
        strategy::SingleStrategy,
    },
    transcript::{Blake2bRead, Challenge255, TranscriptReadBuffer},
};
use halo2curves_axiom::bn256::{Bn256, Fr, G1Affine};
use snarkwrap_common::WrapError;

pub fn verify(
    params: &ParamsKZG<Bn256>,
    vk: &VerifyingKey<G1Affine>,
    proof_bytes: &[u8],
    instances: &[Vec<Fr>],
) -> bool {
    let mut transcript = Blake2bRead::<_, G1Affine, Challenge255<_>>::init(proof_bytes);

    let instance_columns: Vec<&[Fr]> = instances.iter().map(|col| col.as_slice()).collect();
    let prepared_instances = vec![instance_columns.as_slice()];

    verify_proof::<KZGCommitmentScheme<Bn256>, VerifierGWC<'_, Bn256>, _, _, _>(
        params,
        vk,
        SingleStrategy::new(params),
        &prepared_instances,
        &mut transcript,
    )
    .is_ok()
}

/// Checks a wrapper proof against its single public-witness column.
pub fn verify_public_witness(
    params: &ParamsKZG<Bn256>,
    vk: &VerifyingKey<G1Affine>,
    proof_bytes: &[u8],
    public_witness: &[Fr],
) -> Result<(), WrapError> {
    if verify(params, vk, proof_bytes, &[public_witness.to_vec()]) {
        Ok(())
    } else {
        Err(WrapError::Verification(format!(
            "proof of {} bytes rejected for {} public inputs",
            proof_bytes.len(),
            public_witness.len()
        )))
    }
}
