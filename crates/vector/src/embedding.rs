use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{codec, normalize, VectorError};

/// An embedding as it travels through the HTTP layer.
///
/// Serializes to (and deserializes from) the base64 transport string, so request
/// and response types can carry a decoded vector without any manual marshaling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Decodes a base64 transport string.
    pub fn decode(encoded: &str) -> Result<Self, VectorError> {
        codec::decode(encoded).map(Self)
    }

    /// Encodes to the base64 transport string.
    pub fn encode(&self) -> String {
        codec::encode(&self.0)
    }

    /// Unit-length copy.
    pub fn normalized(&self) -> Self {
        Self(normalize::normalize(&self.0))
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl Deref for EmbeddingVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl TryFrom<String> for EmbeddingVector {
    type Error = VectorError;

    fn try_from(encoded: String) -> Result<Self, Self::Error> {
        Self::decode(&encoded)
    }
}

impl From<EmbeddingVector> for String {
    fn from(vector: EmbeddingVector) -> Self {
        vector.encode()
    }
}
