// snarkwrap/snarkwrap-prover/src/main.rs
// Numan Thabit 2025

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snarkwrap_common::PROOF_OUTPUT_FILE;
use snarkwrap_prover::{ArtifactStore, ProofOutput, ProverConfig, SetupMode, Verification, WrapperProver};

#[derive(Parser)]
#[command(
    name = "snarkwrap-prover",
    about = "Wrap a Goldilocks inner proof in a BN254 proof, caching circuit and keys"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prove the inner proof in --input-dir and write the output document.
    Prove(ProveArgs),
    /// Check an output document against the keys cached in --input-dir.
    Verify(VerifyArgs),
}

#[derive(Args)]
struct ProveArgs {
    /// Directory holding the inner-proof JSON files and the artifact cache.
    #[arg(long)]
    input_dir: PathBuf,
    #[arg(long)]
    output_dir: PathBuf,
    /// Circuit size (log2 rows) used when compiling on a cache miss.
    #[arg(long)]
    k: Option<u32>,
    #[arg(long)]
    lookup_bits: Option<usize>,
    /// Generate only a proving key.
    #[arg(long)]
    dummy_setup: bool,
    #[arg(long)]
    skip_verify: bool,
}

#[derive(Args)]
struct VerifyArgs {
    #[arg(long)]
    input_dir: PathBuf,
    /// Output document; defaults to <input-dir>/snark_proof_with_public_inputs.json.
    #[arg(long)]
    proof: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,snarkwrap_prover=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Prove(args) => prove(args),
        Commands::Verify(args) => verify(args),
    }
}

fn prove(args: ProveArgs) -> Result<()> {
    let mut config = ProverConfig::from_env();
    if let Some(k) = args.k {
        config.k = k;
    }
    if let Some(bits) = args.lookup_bits {
        config.lookup_bits = bits;
    }
    if args.dummy_setup {
        config.setup_mode = SetupMode::Dummy;
    }
    if args.skip_verify {
        config.verify_proofs = false;
    }

    let mut prover = WrapperProver::new(&args.input_dir, config);
    let report = prover
        .prove(&args.output_dir)
        .with_context(|| format!("failed to prove {}", args.input_dir.display()))?;

    let verified = matches!(report.verification, Verification::Verified);
    info!(
        output = %report.output_path.display(),
        public_inputs = report.public_witness.len(),
        verified,
        "done"
    );
    Ok(())
}

fn verify(args: VerifyArgs) -> Result<()> {
    let proof_path = args
        .proof
        .unwrap_or_else(|| args.input_dir.join(PROOF_OUTPUT_FILE));
    let output = ProofOutput::read(&proof_path)
        .with_context(|| format!("failed to read {}", proof_path.display()))?;

    let store = ArtifactStore::new(&args.input_dir);
    let circuit = store.load_circuit().context("failed to load cached circuit")?;
    let keys = store.load_keys(&circuit).context("failed to load cached keys")?;
    let Some(verifying) = keys.verifying() else {
        bail!(
            "{} holds no verifying key (dummy setup)",
            args.input_dir.display()
        );
    };

    let proof = output.proof.proof_bytes()?;
    let public_witness = output.public_witness.len();
    snarkwrap_verifier::verify_public_witness(
        &verifying.params,
        &verifying.vk,
        &proof,
        &output.decode_public_witness()?,
    )
    .with_context(|| format!("{} did not verify", proof_path.display()))?;

    info!(proof = %proof_path.display(), public_inputs = public_witness, "proof verified");
    Ok(())
}
