//! Embedding vector codec
//!
//! Everything that touches raw embedding numbers lives here: turning `f32`
//! vectors into bytes and base64 for JSON transport, scaling them to unit
//! length, and comparing two of them with cosine similarity.
//!
//! The wire format is deliberately dumb. A vector is its `f32` values laid out
//! little-endian, back to back, then base64-wrapped (standard alphabet, padded).
//! No header, no dimension prefix. Whoever decodes has to agree with whoever
//! encoded on the dimension, which in production is 384.
//!
//! ## Quick example
//!
//! ```
//! use vector::{cosine_similarity, decode, encode, normalize};
//!
//! let v = normalize(&[3.0, 4.0]);
//! let wire = encode(&v);
//! let back = decode(&wire).unwrap();
//! assert_eq!(back, v);
//! assert!((cosine_similarity(&v, &back).unwrap() - 1.0).abs() < 1e-6);
//! ```

mod codec;
mod embedding;
mod error;
mod normalize;
mod similarity;

pub use crate::codec::{decode, encode, from_bytes, to_bytes};
pub use crate::embedding::EmbeddingVector;
pub use crate::error::VectorError;
pub use crate::normalize::{l2_norm, l2_normalize_in_place, normalize};
pub use crate::similarity::{cosine_similarity, dot};
