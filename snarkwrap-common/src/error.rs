// snarkwrap/snarkwrap-common/src/error.rs
// Numan Thabit 2025

//! Error taxonomy shared by every stage of the wrapping pipeline.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Failure of a single `prove` call, tagged with the phase that produced it.
#[derive(Debug, Error)]
pub enum WrapError {
    /// Missing, unreadable or unwritable file.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A cached artifact or an inner-proof file could not be decoded.
    #[error("failed to decode {artifact}: {reason}")]
    Deserialization { artifact: String, reason: String },

    #[error("circuit compilation failed: {0}")]
    Compilation(String),

    #[error("key setup failed: {0}")]
    Setup(String),

    /// The inner proof does not fit the compiled circuit.
    #[error("witness does not match compiled circuit: {0}")]
    Witness(String),

    #[error("proof generation failed: {0}")]
    Proving(String),

    /// The freshly generated proof did not pass the local self-check.
    #[error("proof failed self-verification: {0}")]
    Verification(String),

    #[error("failed to encode proof output: {0}")]
    Encoding(String),
}

impl WrapError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        WrapError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn decode(artifact: impl Into<String>, reason: impl Display) -> Self {
        WrapError::Deserialization {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }

    /// Short label of the pipeline phase that failed.
    pub fn phase(&self) -> &'static str {
        match self {
            WrapError::Io { .. } => "io",
            WrapError::Deserialization { .. } => "deserialization",
            WrapError::Compilation(_) => "compilation",
            WrapError::Setup(_) => "setup",
            WrapError::Witness(_) => "witness",
            WrapError::Proving(_) => "proving",
            WrapError::Verification(_) => "verification",
            WrapError::Encoding(_) => "encoding",
        }
    }
}

impl From<serde_json::Error> for WrapError {
    fn from(err: serde_json::Error) -> Self {
        WrapError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path_and_phase() {
        let err = WrapError::io(
            "/tmp/missing/proving.key",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.phase(), "io");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing/proving.key"), "{msg}");
        assert!(msg.contains("no such file"), "{msg}");
    }

    #[test]
    fn json_errors_map_to_encoding() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err: WrapError = json_err.into();
        assert_eq!(err.phase(), "encoding");
    }
}
