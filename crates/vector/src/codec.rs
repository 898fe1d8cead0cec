use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::VectorError;

const F32_WIDTH: usize = std::mem::size_of::<f32>();

/// Lays the vector out as raw little-endian `f32` bytes.
pub fn to_bytes(vector: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(vector.len() * F32_WIDTH);
    for value in vector {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Inverse of [`to_bytes`]. Rejects payloads that are not a whole number of floats,
/// which is what a wrong-dtype or truncated payload looks like.
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<f32>, VectorError> {
    if bytes.len() % F32_WIDTH != 0 {
        return Err(VectorError::InvalidLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(F32_WIDTH)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Encodes a vector for JSON transport: little-endian bytes, then base64.
pub fn encode(vector: &[f32]) -> String {
    BASE64.encode(to_bytes(vector))
}

/// Decodes a base64 transport string back into floats.
pub fn decode(encoded: &str) -> Result<Vec<f32>, VectorError> {
    let bytes = BASE64.decode(encoded.trim())?;
    from_bytes(&bytes)
}
