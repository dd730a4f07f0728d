// snarkwrap/snarkwrap-circuit/src/gadgets/mod.rs
// Numan Thabit 2025

pub mod goldilocks;
