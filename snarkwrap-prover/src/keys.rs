// snarkwrap/snarkwrap-prover/src/keys.rs
// Numan Thabit 2025

//! Key material and its on-disk encoding.

use std::io::Cursor;

use halo2_proofs_axiom::{
    plonk::{ProvingKey, VerifyingKey},
    poly::{commitment::Params, kzg::commitment::ParamsKZG},
    SerdeFormat,
};
use halo2curves_axiom::bn256::{Bn256, G1Affine};
use snarkwrap_circuit::{CompiledCircuit, WrapperCircuit};
use snarkwrap_common::{
    decode_container, encode_container, hash_bytes_hex, ArtifactKind, WrapError,
};

const PARAMS_SECTION: u8 = 0x01;
const KEY_SECTION: u8 = 0x02;

pub struct ProvingKeyMaterial {
    pub params: ParamsKZG<Bn256>,
    pub pk: ProvingKey<G1Affine>,
}

pub struct VerifyingKeyMaterial {
    pub params: ParamsKZG<Bn256>,
    pub vk: VerifyingKey<G1Affine>,
}

/// Keys for one compiled circuit. A dummy setup yields `ProvingKeyOnly`.
pub enum WrapperKeys {
    Full {
        proving: ProvingKeyMaterial,
        verifying: VerifyingKeyMaterial,
    },
    ProvingKeyOnly(ProvingKeyMaterial),
}

impl WrapperKeys {
    pub fn proving(&self) -> &ProvingKeyMaterial {
        match self {
            WrapperKeys::Full { proving, .. } => proving,
            WrapperKeys::ProvingKeyOnly(proving) => proving,
        }
    }

    pub fn verifying(&self) -> Option<&VerifyingKeyMaterial> {
        match self {
            WrapperKeys::Full { verifying, .. } => Some(verifying),
            WrapperKeys::ProvingKeyOnly(_) => None,
        }
    }
}

impl VerifyingKeyMaterial {
    /// blake3 over the encoded verifying key.
    pub fn digest(&self) -> Result<String, WrapError> {
        Ok(hash_bytes_hex(&serialize_verifying_key(&self.vk)?))
    }
}

pub fn serialize_params(params: &ParamsKZG<Bn256>) -> Result<Vec<u8>, WrapError> {
    let mut buf = vec![];
    params
        .write(&mut buf)
        .map_err(|err| WrapError::Encoding(format!("failed to serialize KZG params: {err}")))?;
    Ok(buf)
}

pub fn serialize_proving_key(pk: &ProvingKey<G1Affine>) -> Result<Vec<u8>, WrapError> {
    let mut buf = vec![];
    pk.write(&mut buf, SerdeFormat::Processed)
        .map_err(|err| WrapError::Encoding(format!("failed to serialize proving key: {err}")))?;
    Ok(buf)
}

pub fn serialize_verifying_key(vk: &VerifyingKey<G1Affine>) -> Result<Vec<u8>, WrapError> {
    let mut buf = vec![];
    vk.write(&mut buf, SerdeFormat::Processed)
        .map_err(|err| WrapError::Encoding(format!("failed to serialize verifying key: {err}")))?;
    Ok(buf)
}

pub fn encode_proving_key(material: &ProvingKeyMaterial) -> Result<Vec<u8>, WrapError> {
    let params = serialize_params(&material.params)?;
    let pk = serialize_proving_key(&material.pk)?;
    Ok(encode_container(
        ArtifactKind::ProvingKey,
        &[(PARAMS_SECTION, params.as_slice()), (KEY_SECTION, pk.as_slice())],
    ))
}

pub fn encode_verifying_key(material: &VerifyingKeyMaterial) -> Result<Vec<u8>, WrapError> {
    let params = serialize_params(&material.params)?;
    let vk = serialize_verifying_key(&material.vk)?;
    Ok(encode_container(
        ArtifactKind::VerifyingKey,
        &[(PARAMS_SECTION, params.as_slice()), (KEY_SECTION, vk.as_slice())],
    ))
}

/// Decoding needs the compiled circuit: halo2 rebuilds the constraint system
/// from the circuit's column configuration.
pub fn decode_proving_key(compiled: &CompiledCircuit, bytes: &[u8]) -> Result<ProvingKeyMaterial, WrapError> {
    let kind = ArtifactKind::ProvingKey;
    let (params, key) = decode_sections(kind, bytes)?;
    let params = deserialize_params(kind, compiled, &params)?;
    let pk = ProvingKey::read::<_, WrapperCircuit>(
        &mut Cursor::new(key.as_slice()),
        SerdeFormat::Processed,
        compiled.base_params(),
    )
    .map_err(|err| WrapError::decode(kind.file_name(), err))?;
    Ok(ProvingKeyMaterial { params, pk })
}

pub fn decode_verifying_key(compiled: &CompiledCircuit, bytes: &[u8]) -> Result<VerifyingKeyMaterial, WrapError> {
    let kind = ArtifactKind::VerifyingKey;
    let (params, key) = decode_sections(kind, bytes)?;
    let params = deserialize_params(kind, compiled, &params)?;
    let vk = VerifyingKey::read::<_, WrapperCircuit>(
        &mut Cursor::new(key.as_slice()),
        SerdeFormat::Processed,
        compiled.base_params(),
    )
    .map_err(|err| WrapError::decode(kind.file_name(), err))?;
    Ok(VerifyingKeyMaterial { params, vk })
}

fn decode_sections(kind: ArtifactKind, bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>), WrapError> {
    let mut sections = decode_container(kind, bytes, &[PARAMS_SECTION, KEY_SECTION])
        .map_err(|err| WrapError::decode(kind.file_name(), err))?
        .into_iter();
    match (sections.next(), sections.next()) {
        (Some(params), Some(key)) => Ok((params, key)),
        _ => Err(WrapError::decode(kind.file_name(), "missing key sections")),
    }
}

fn deserialize_params(
    kind: ArtifactKind,
    compiled: &CompiledCircuit,
    bytes: &[u8],
) -> Result<ParamsKZG<Bn256>, WrapError> {
    let params = ParamsKZG::<Bn256>::read(&mut Cursor::new(bytes))
        .map_err(|err| WrapError::decode(kind.file_name(), format!("KZG params: {err}")))?;
    if params.k() != compiled.k() {
        return Err(WrapError::decode(
            kind.file_name(),
            format!("params are for k = {}, circuit needs k = {}", params.k(), compiled.k()),
        ));
    }
    Ok(params)
}
