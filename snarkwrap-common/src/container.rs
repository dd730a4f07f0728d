// snarkwrap/snarkwrap-common/src/container.rs
// Numan Thabit 2025

//! Sectioned binary container used for every cached artifact.
//!
//! Layout: `MAGIC | kind u8 | version u8 | section count u8`, then per section
//! `id u8 | len u64 LE | bytes`, then a 32-byte blake3 digest of everything before it.

use std::io::{Cursor, Read};

use thiserror::Error;

use crate::{CIRCUIT_FILE, PROVING_KEY_FILE, VERIFYING_KEY_FILE};

pub const MAGIC_NUMBER: [u8; 4] = *b"SNWR";
pub const CONTAINER_VERSION: u8 = 1;
const DIGEST_LEN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Circuit = 0x01,
    ProvingKey = 0x02,
    VerifyingKey = 0x03,
}

impl ArtifactKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Circuit => CIRCUIT_FILE,
            ArtifactKind::ProvingKey => PROVING_KEY_FILE,
            ArtifactKind::VerifyingKey => VERIFYING_KEY_FILE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("invalid magic number")]
    InvalidMagicNumber,
    #[error("expected artifact kind {expected:#04x}, found {found:#04x}")]
    InvalidKind { expected: u8, found: u8 },
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),
    #[error("expected {expected} sections, found {found}")]
    InvalidSectionCount { expected: usize, found: usize },
    #[error("expected section {expected:#04x}, found {found:#04x}")]
    InvalidSectionId { expected: u8, found: u8 },
    #[error("truncated container")]
    Truncated,
    #[error("{0} trailing bytes after last section")]
    TrailingBytes(usize),
    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Encodes `sections` (id, payload) under the given artifact kind.
pub fn encode_container(kind: ArtifactKind, sections: &[(u8, &[u8])]) -> Vec<u8> {
    let body_len: usize = sections.iter().map(|(_, data)| 9 + data.len()).sum();
    let mut out = Vec::with_capacity(7 + body_len + DIGEST_LEN);
    out.extend_from_slice(&MAGIC_NUMBER);
    out.push(kind as u8);
    out.push(CONTAINER_VERSION);
    out.push(sections.len() as u8);
    for (id, data) in sections {
        out.push(*id);
        out.extend_from_slice(&(data.len() as u64).to_le_bytes());
        out.extend_from_slice(data);
    }
    let digest = blake3::hash(&out);
    out.extend_from_slice(digest.as_bytes());
    out
}

/// Validates the header and checksum, returning section payloads in the order of
/// `expected_ids`.
pub fn decode_container(
    kind: ArtifactKind,
    bytes: &[u8],
    expected_ids: &[u8],
) -> Result<Vec<Vec<u8>>, ContainerError> {
    if bytes.len() < MAGIC_NUMBER.len() + 3 + DIGEST_LEN {
        return Err(ContainerError::Truncated);
    }
    let (body, digest) = bytes.split_at(bytes.len() - DIGEST_LEN);
    if blake3::hash(body).as_bytes() != digest {
        return Err(ContainerError::ChecksumMismatch);
    }

    let mut cursor = Cursor::new(body);
    let mut magic = [0u8; 4];
    read_exact(&mut cursor, &mut magic)?;
    if magic != MAGIC_NUMBER {
        return Err(ContainerError::InvalidMagicNumber);
    }

    let found_kind = read_u8(&mut cursor)?;
    if found_kind != kind as u8 {
        return Err(ContainerError::InvalidKind {
            expected: kind as u8,
            found: found_kind,
        });
    }
    let version = read_u8(&mut cursor)?;
    if version != CONTAINER_VERSION {
        return Err(ContainerError::UnsupportedVersion(version));
    }
    let count = read_u8(&mut cursor)? as usize;
    if count != expected_ids.len() {
        return Err(ContainerError::InvalidSectionCount {
            expected: expected_ids.len(),
            found: count,
        });
    }

    let mut sections = Vec::with_capacity(count);
    for expected in expected_ids {
        let id = read_u8(&mut cursor)?;
        if id != *expected {
            return Err(ContainerError::InvalidSectionId {
                expected: *expected,
                found: id,
            });
        }
        let mut len = [0u8; 8];
        read_exact(&mut cursor, &mut len)?;
        let len = u64::from_le_bytes(len);
        let remaining = (body.len() as u64).saturating_sub(cursor.position());
        if len > remaining {
            return Err(ContainerError::Truncated);
        }
        let mut data = vec![0u8; len as usize];
        read_exact(&mut cursor, &mut data)?;
        sections.push(data);
    }

    let trailing = body.len() - cursor.position() as usize;
    if trailing != 0 {
        return Err(ContainerError::TrailingBytes(trailing));
    }
    Ok(sections)
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, ContainerError> {
    let mut byte = [0u8; 1];
    read_exact(cursor, &mut byte)?;
    Ok(byte[0])
}

fn read_exact(cursor: &mut Cursor<&[u8]>, buf: &mut [u8]) -> Result<(), ContainerError> {
    cursor
        .read_exact(buf)
        .map_err(|_| ContainerError::Truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        encode_container(
            ArtifactKind::ProvingKey,
            &[(1, b"params".as_slice()), (2, b"".as_slice()), (3, b"pk-bytes".as_slice())],
        )
    }

    #[test]
    fn decodes_sections_in_order() {
        let sections = decode_container(ArtifactKind::ProvingKey, &sample(), &[1, 2, 3]).unwrap();
        assert_eq!(sections, vec![b"params".to_vec(), vec![], b"pk-bytes".to_vec()]);
    }

    #[test]
    fn detects_bit_flip() {
        let mut bytes = sample();
        bytes[12] ^= 0x40;
        assert!(matches!(
            decode_container(ArtifactKind::ProvingKey, &bytes, &[1, 2, 3]),
            Err(ContainerError::ChecksumMismatch)
        ));
    }

    #[test]
    fn detects_truncation() {
        let bytes = sample();
        assert!(decode_container(ArtifactKind::ProvingKey, &bytes[..20], &[1, 2, 3]).is_err());
        assert!(matches!(
            decode_container(ArtifactKind::ProvingKey, &bytes[..10], &[1, 2, 3]),
            Err(ContainerError::Truncated)
        ));
    }

    #[test]
    fn rejects_wrong_kind() {
        assert!(matches!(
            decode_container(ArtifactKind::VerifyingKey, &sample(), &[1, 2, 3]),
            Err(ContainerError::InvalidKind { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn rejects_unexpected_layout() {
        assert!(matches!(
            decode_container(ArtifactKind::ProvingKey, &sample(), &[1, 2]),
            Err(ContainerError::InvalidSectionCount { expected: 2, found: 3 })
        ));
        assert!(matches!(
            decode_container(ArtifactKind::ProvingKey, &sample(), &[1, 3, 2]),
            Err(ContainerError::InvalidSectionId { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn rejects_foreign_bytes() {
        let mut bytes = b"PLUT".to_vec();
        bytes.extend_from_slice(&[0u8; 40]);
        assert!(decode_container(ArtifactKind::Circuit, &bytes, &[1]).is_err());
    }
}
