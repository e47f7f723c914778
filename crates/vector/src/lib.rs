//! semroute vector primitives
//!
//! Embedding vectors, cosine similarity and distance metrics

mod embedding;
pub mod similarity;

pub use embedding::Embedding;
pub use similarity::{cosine_similarity, distance, DistanceMetric};
