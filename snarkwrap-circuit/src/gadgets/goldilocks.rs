// snarkwrap/snarkwrap-circuit/src/gadgets/goldilocks.rs
// Numan Thabit 2025

use halo2_base::{
    gates::{range::RangeChip, RangeInstructions},
    AssignedValue, Context,
};
use halo2curves_axiom::bn256::Fr;
use snarkwrap_common::{inner::HASH_LIMBS, HashOut, GOLDILOCKS_MODULUS};

pub type AssignedHash = [AssignedValue<Fr>; HASH_LIMBS];

/// Loads a Goldilocks element and constrains it to be canonical (< p).
pub fn assign_goldilocks(ctx: &mut Context<Fr>, range: &RangeChip<Fr>, value: u64) -> AssignedValue<Fr> {
    let cell = ctx.load_witness(Fr::from(value));
    range.check_less_than_safe(ctx, cell, GOLDILOCKS_MODULUS);
    cell
}

pub fn assign_hash(ctx: &mut Context<Fr>, range: &RangeChip<Fr>, hash: &HashOut) -> AssignedHash {
    hash.elements.map(|limb| assign_goldilocks(ctx, range, limb))
}

pub fn assign_cap(ctx: &mut Context<Fr>, range: &RangeChip<Fr>, cap: &[HashOut]) -> Vec<AssignedHash> {
    cap.iter().map(|hash| assign_hash(ctx, range, hash)).collect()
}

/// Pins every limb of `assigned` to the matching limb of a compile-time digest.
pub fn constrain_hash_to_constant(ctx: &mut Context<Fr>, assigned: &AssignedHash, constant: &HashOut) {
    for (cell, limb) in assigned.iter().zip(constant.elements.iter()) {
        let fixed = ctx.load_constant(Fr::from(*limb));
        ctx.constrain_equal(cell, &fixed);
    }
}
