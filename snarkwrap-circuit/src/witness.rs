// snarkwrap/snarkwrap-circuit/src/witness.rs
// Numan Thabit 2025

use halo2curves_axiom::bn256::Fr;
use serde::{Deserialize, Serialize};
use snarkwrap_common::{
    inner::{InnerProof, VerifierOnlyCircuitData},
    HashOut, InnerProofBundle, WrapError,
};

use crate::{CompiledCircuit, WrapperLayout};

/// Full assignment for one wrapping proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperWitness {
    pub public_inputs: Vec<u64>,
    pub proof: InnerProof,
    pub verifier_only: VerifierOnlyCircuitData,
}

impl WrapperWitness {
    /// Binds a freshly read inner proof to the compiled circuit's variable layout.
    pub fn build(compiled: &CompiledCircuit, bundle: &InnerProofBundle) -> Result<Self, WrapError> {
        let layout = WrapperLayout::from_bundle(bundle);
        if layout != compiled.layout {
            return Err(WrapError::Witness(format!(
                "inner circuit layout {layout:?} differs from compiled layout {:?}",
                compiled.layout
            )));
        }
        if bundle.verifier_only != compiled.verifier_data {
            return Err(WrapError::Witness(
                "verifier-only circuit data differs from the data the circuit was compiled for"
                    .into(),
            ));
        }
        Ok(Self {
            public_inputs: bundle.proof.public_inputs.clone(),
            proof: bundle.proof.proof.clone(),
            verifier_only: bundle.verifier_only.clone(),
        })
    }

    /// Structurally valid stand-in used when fixing the circuit shape.
    pub fn placeholder(layout: &WrapperLayout, verifier_only: &VerifierOnlyCircuitData) -> Self {
        let zero_cap = vec![HashOut::default(); layout.cap_len()];
        Self {
            public_inputs: vec![0; layout.num_public_inputs],
            proof: InnerProof {
                wires_cap: zero_cap.clone(),
                plonk_zs_partial_products_cap: zero_cap.clone(),
                quotient_polys_cap: zero_cap,
            },
            verifier_only: verifier_only.clone(),
        }
    }

    /// Public-only projection, in inner public-input order.
    pub fn public_witness(&self) -> Vec<Fr> {
        self.public_inputs.iter().map(|v| Fr::from(*v)).collect()
    }

    pub fn instances(&self) -> Vec<Vec<Fr>> {
        vec![self.public_witness()]
    }
}
