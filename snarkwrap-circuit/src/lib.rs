// snarkwrap/snarkwrap-circuit/src/lib.rs
// Numan Thabit 2025

//! BN254 wrapper circuit for Goldilocks inner proofs.
//!
//! The circuit re-exposes the inner public inputs as its own instance column,
//! witnesses the inner proof's merkle caps, and pins the inner verifier data to
//! constants fixed at compile time. Every Goldilocks value is range checked.

pub mod gadgets;
pub mod witness;

use halo2_base::gates::circuit::{
    builder::BaseCircuitBuilder, BaseCircuitParams, BaseConfig, CircuitBuilderStage,
};
use halo2_proofs_axiom::{
    circuit::{Layouter, SimpleFloorPlanner},
    plonk::{Circuit, ConstraintSystem, Error},
};
use halo2curves_axiom::bn256::Fr;
use serde::{Deserialize, Serialize};
use snarkwrap_common::{inner::VerifierOnlyCircuitData, InnerProofBundle, WrapError};
use tracing::debug;

use crate::gadgets::goldilocks::{assign_cap, assign_goldilocks, assign_hash, constrain_hash_to_constant};
pub use crate::witness::WrapperWitness;

/// Bumped whenever the serialized `CompiledCircuit` or the constraint layout changes.
pub const CIRCUIT_FORMAT_VERSION: u32 = 1;
pub const NUM_INSTANCE_COLUMNS: usize = 1;
pub const MIN_K: u32 = 8;
pub const MAX_K: u32 = 26;
const MIN_BLINDING_ROWS: usize = 9;

/// Shape of the inner circuit that the wrapper topology depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WrapperLayout {
    pub num_public_inputs: usize,
    pub cap_height: usize,
    pub degree_bits: usize,
    pub num_challenges: usize,
}

impl WrapperLayout {
    pub fn from_bundle(bundle: &InnerProofBundle) -> Self {
        Self {
            num_public_inputs: bundle.common.num_public_inputs,
            cap_height: bundle.common.config.fri_config.cap_height,
            degree_bits: bundle.common.fri_params.degree_bits,
            num_challenges: bundle.common.config.num_challenges,
        }
    }

    pub fn cap_len(&self) -> usize {
        1 << self.cap_height
    }
}

/// Serializable mirror of `BaseCircuitParams`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitConfigParams {
    pub k: usize,
    pub num_advice_per_phase: Vec<usize>,
    pub num_fixed: usize,
    pub num_lookup_advice_per_phase: Vec<usize>,
    pub lookup_bits: Option<usize>,
    pub num_instance_columns: usize,
}

impl From<&BaseCircuitParams> for CircuitConfigParams {
    fn from(params: &BaseCircuitParams) -> Self {
        Self {
            k: params.k,
            num_advice_per_phase: params.num_advice_per_phase.clone(),
            num_fixed: params.num_fixed,
            num_lookup_advice_per_phase: params.num_lookup_advice_per_phase.clone(),
            lookup_bits: params.lookup_bits,
            num_instance_columns: params.num_instance_columns,
        }
    }
}

impl From<&CircuitConfigParams> for BaseCircuitParams {
    fn from(params: &CircuitConfigParams) -> Self {
        BaseCircuitParams {
            k: params.k,
            num_advice_per_phase: params.num_advice_per_phase.clone(),
            num_fixed: params.num_fixed,
            num_lookup_advice_per_phase: params.num_lookup_advice_per_phase.clone(),
            lookup_bits: params.lookup_bits,
            num_instance_columns: params.num_instance_columns,
        }
    }
}

/// Compiled constraint system: everything needed to rebuild the circuit for
/// keygen, key deserialization and proving.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCircuit {
    pub format_version: u32,
    pub layout: WrapperLayout,
    pub verifier_data: VerifierOnlyCircuitData,
    pub config: CircuitConfigParams,
}

impl CompiledCircuit {
    pub fn k(&self) -> u32 {
        self.config.k as u32
    }

    pub fn base_params(&self) -> BaseCircuitParams {
        BaseCircuitParams::from(&self.config)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WrapError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WrapError> {
        let compiled: CompiledCircuit = serde_json::from_slice(bytes)
            .map_err(|err| WrapError::decode(snarkwrap_common::CIRCUIT_FILE, err))?;
        if compiled.format_version != CIRCUIT_FORMAT_VERSION {
            return Err(WrapError::decode(
                snarkwrap_common::CIRCUIT_FILE,
                format!(
                    "circuit format version {} is not supported (expected {})",
                    compiled.format_version, CIRCUIT_FORMAT_VERSION
                ),
            ));
        }
        Ok(compiled)
    }
}

/// Fixes the wrapper topology for `bundle`'s inner circuit. Proof values in
/// `bundle` are not used; only its layout and verifier-only data are.
pub fn compile(bundle: &InnerProofBundle, k: u32, lookup_bits: usize) -> Result<CompiledCircuit, WrapError> {
    if !(MIN_K..=MAX_K).contains(&k) {
        return Err(WrapError::Compilation(format!(
            "k = {k} is outside the supported range {MIN_K}..={MAX_K}"
        )));
    }
    if lookup_bits == 0 || lookup_bits >= k as usize {
        return Err(WrapError::Compilation(format!(
            "lookup_bits = {lookup_bits} must be in 1..{k}"
        )));
    }

    let layout = WrapperLayout::from_bundle(bundle);
    let verifier_data = bundle.verifier_only.clone();
    let placeholder = WrapperWitness::placeholder(&layout, &verifier_data);

    let mut builder = BaseCircuitBuilder::<Fr>::from_stage(CircuitBuilderStage::Keygen)
        .use_k(k as usize)
        .use_lookup_bits(lookup_bits)
        .use_instance_columns(NUM_INSTANCE_COLUMNS);
    build_constraints(&mut builder, &verifier_data, &placeholder);
    let params = builder.calculate_params(Some(MIN_BLINDING_ROWS));
    debug!(
        k = params.k,
        advice = ?params.num_advice_per_phase,
        fixed = params.num_fixed,
        lookup_advice = ?params.num_lookup_advice_per_phase,
        "wrapper circuit configured"
    );

    Ok(CompiledCircuit {
        format_version: CIRCUIT_FORMAT_VERSION,
        layout,
        verifier_data,
        config: CircuitConfigParams::from(&params),
    })
}

#[derive(Clone, Debug)]
pub struct WrapperCircuit {
    compiled: CompiledCircuit,
    witness: Option<WrapperWitness>,
    params: BaseCircuitParams,
}

impl WrapperCircuit {
    /// Witness-free instance used for key generation and key deserialization.
    pub fn keygen(compiled: &CompiledCircuit) -> Self {
        Self {
            compiled: compiled.clone(),
            witness: None,
            params: compiled.base_params(),
        }
    }

    pub fn with_witness(compiled: &CompiledCircuit, witness: WrapperWitness) -> Self {
        Self {
            compiled: compiled.clone(),
            witness: Some(witness),
            params: compiled.base_params(),
        }
    }

    pub fn instances(&self) -> Vec<Vec<Fr>> {
        match &self.witness {
            Some(witness) => witness.instances(),
            None => vec![vec![Fr::zero(); self.compiled.layout.num_public_inputs]],
        }
    }
}

impl Circuit<Fr> for WrapperCircuit {
    type Config = BaseConfig<Fr>;
    type FloorPlanner = SimpleFloorPlanner;
    type Params = BaseCircuitParams;

    fn params(&self) -> Self::Params {
        self.params.clone()
    }

    fn without_witnesses(&self) -> Self {
        Self {
            compiled: self.compiled.clone(),
            witness: None,
            params: self.params.clone(),
        }
    }

    fn configure_with_params(meta: &mut ConstraintSystem<Fr>, params: Self::Params) -> Self::Config {
        BaseConfig::configure(meta, params)
    }

    fn configure(_: &mut ConstraintSystem<Fr>) -> Self::Config {
        unreachable!("WrapperCircuit must be configured with explicit parameters")
    }

    fn synthesize(&self, config: Self::Config, layouter: impl Layouter<Fr>) -> Result<(), Error> {
        let stage = if self.witness.is_some() {
            CircuitBuilderStage::Mock
        } else {
            CircuitBuilderStage::Keygen
        };

        let placeholder;
        let witness = match &self.witness {
            Some(witness) => witness,
            None => {
                placeholder =
                    WrapperWitness::placeholder(&self.compiled.layout, &self.compiled.verifier_data);
                &placeholder
            }
        };

        let mut builder = BaseCircuitBuilder::<Fr>::from_stage(stage)
            .use_params(self.params.clone())
            .use_instance_columns(self.params.num_instance_columns);

        if let Some(bits) = self.params.lookup_bits {
            builder = builder.use_lookup_bits(bits);
        }

        build_constraints(&mut builder, &self.compiled.verifier_data, witness);
        <BaseCircuitBuilder<Fr> as Circuit<Fr>>::synthesize(&builder, config, layouter)
    }
}

fn build_constraints(
    builder: &mut BaseCircuitBuilder<Fr>,
    verifier_data: &VerifierOnlyCircuitData,
    witness: &WrapperWitness,
) {
    let range = builder.range_chip();
    let ctx = builder.main(0);

    let public_inputs: Vec<_> = witness
        .public_inputs
        .iter()
        .map(|value| assign_goldilocks(ctx, &range, *value))
        .collect();

    let proof = &witness.proof;
    for cap in [
        &proof.wires_cap,
        &proof.plonk_zs_partial_products_cap,
        &proof.quotient_polys_cap,
    ] {
        assign_cap(ctx, &range, cap);
    }

    let constants_sigmas = assign_cap(ctx, &range, &witness.verifier_only.constants_sigmas_cap);
    for (assigned, constant) in constants_sigmas.iter().zip(verifier_data.constants_sigmas_cap.iter()) {
        constrain_hash_to_constant(ctx, assigned, constant);
    }
    let digest = assign_hash(ctx, &range, &witness.verifier_only.circuit_digest);
    constrain_hash_to_constant(ctx, &digest, &verifier_data.circuit_digest);

    builder.assigned_instances[0].extend(public_inputs);
}
