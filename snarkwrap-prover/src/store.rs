// snarkwrap/snarkwrap-prover/src/store.rs
// Numan Thabit 2025

//! Filesystem cache for the compiled circuit and its keys.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use snarkwrap_circuit::CompiledCircuit;
use snarkwrap_common::{
    decode_container, encode_container, hash_bytes_hex, ArtifactKind, WrapError,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::keys::{
    decode_proving_key, decode_verifying_key, encode_proving_key, encode_verifying_key,
    WrapperKeys,
};

const CIRCUIT_SECTION: u8 = 0x01;

/// Cache rooted at one input directory. Every write replaces its file
/// atomically, so an interrupted write leaves the previous state intact.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Presence only; a present but unreadable entry fails on load.
    pub fn exists(&self, kind: ArtifactKind) -> bool {
        self.path(kind).exists()
    }

    pub fn load_circuit(&self) -> Result<CompiledCircuit, WrapError> {
        let kind = ArtifactKind::Circuit;
        let bytes = self.read(kind)?;
        let mut sections = decode_container(kind, &bytes, &[CIRCUIT_SECTION])
            .map_err(|err| WrapError::decode(kind.file_name(), err))?;
        let body = sections
            .pop()
            .ok_or_else(|| WrapError::decode(kind.file_name(), "missing circuit section"))?;
        CompiledCircuit::from_bytes(&body)
    }

    pub fn store_circuit(&self, compiled: &CompiledCircuit) -> Result<(), WrapError> {
        let body = compiled.to_bytes()?;
        let bytes = encode_container(ArtifactKind::Circuit, &[(CIRCUIT_SECTION, body.as_slice())]);
        self.write(ArtifactKind::Circuit, &bytes)
    }

    /// Loads `proving.key`, plus `verifying.key` when that file is present.
    /// A present but unreadable verifying key fails the same way a proving key does.
    pub fn load_keys(&self, compiled: &CompiledCircuit) -> Result<WrapperKeys, WrapError> {
        let proving = decode_proving_key(compiled, &self.read(ArtifactKind::ProvingKey)?)?;
        if !self.exists(ArtifactKind::VerifyingKey) {
            debug!(dir = %self.dir.display(), "no verifying key cached");
            return Ok(WrapperKeys::ProvingKeyOnly(proving));
        }
        let verifying = decode_verifying_key(compiled, &self.read(ArtifactKind::VerifyingKey)?)?;
        Ok(WrapperKeys::Full { proving, verifying })
    }

    /// Writes the verifying key for a full setup, or removes a verifying key
    /// left from an older setup for a proving-key-only pair. `proving.key` is
    /// written last and marks the pair as complete: a failure before it leaves
    /// no proving key, so the next call runs setup again.
    pub fn store_keys(&self, keys: &WrapperKeys) -> Result<(), WrapError> {
        let pk_bytes = encode_proving_key(keys.proving())?;

        match keys.verifying() {
            Some(verifying) => {
                let vk_bytes = encode_verifying_key(verifying)?;
                self.write(ArtifactKind::VerifyingKey, &vk_bytes)?;
            }
            None => self.remove(ArtifactKind::VerifyingKey)?,
        }

        self.write(ArtifactKind::ProvingKey, &pk_bytes)
    }

    fn read(&self, kind: ArtifactKind) -> Result<Vec<u8>, WrapError> {
        let path = self.path(kind);
        let bytes = fs::read(&path).map_err(|err| WrapError::io(&path, err))?;
        debug!(path = %path.display(), size = bytes.len(), "loaded artifact");
        Ok(bytes)
    }

    fn write(&self, kind: ArtifactKind, bytes: &[u8]) -> Result<(), WrapError> {
        let path = self.path(kind);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|err| WrapError::io(&self.dir, err))?;
        tmp.write_all(bytes).map_err(|err| WrapError::io(tmp.path(), err))?;
        tmp.as_file()
            .sync_all()
            .map_err(|err| WrapError::io(tmp.path(), err))?;
        tmp.persist(&path)
            .map_err(|err| WrapError::io(&path, err.error))?;
        debug!(
            path = %path.display(),
            size = bytes.len(),
            blake3 = %hash_bytes_hex(bytes),
            "stored artifact"
        );
        Ok(())
    }

    fn remove(&self, kind: ArtifactKind) -> Result<(), WrapError> {
        let path = self.path(kind);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed stale artifact");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(WrapError::io(&path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snarkwrap_common::{CIRCUIT_FILE, PROVING_KEY_FILE};
    use snarkwrap_test_fixtures::{InnerFixture, TEST_K, TEST_LOOKUP_BITS};

    fn compiled() -> CompiledCircuit {
        snarkwrap_circuit::compile(&InnerFixture::new().bundle(), TEST_K, TEST_LOOKUP_BITS).unwrap()
    }

    #[test]
    fn circuit_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(!store.exists(ArtifactKind::Circuit));

        let circuit = compiled();
        store.store_circuit(&circuit).unwrap();
        assert!(store.exists(ArtifactKind::Circuit));
        assert!(dir.path().join(CIRCUIT_FILE).is_file());
        assert_eq!(store.load_circuit().unwrap(), circuit);
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.store_circuit(&compiled()).unwrap();
        store.store_circuit(&compiled()).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(CIRCUIT_FILE)]);
    }

    #[test]
    fn corrupted_circuit_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.store_circuit(&compiled()).unwrap();

        let path = store.path(ArtifactKind::Circuit);
        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xff;
        fs::write(&path, bytes).unwrap();

        assert_eq!(store.load_circuit().unwrap_err().phase(), "deserialization");
    }

    #[test]
    fn missing_keys_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let err = store.load_keys(&compiled()).err().unwrap();
        assert_eq!(err.phase(), "io");
        assert!(err.to_string().contains(PROVING_KEY_FILE));
    }

    #[test]
    fn unwritable_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("does-not-exist"));
        assert_eq!(store.store_circuit(&compiled()).unwrap_err().phase(), "io");
    }
}
