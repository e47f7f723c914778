use ndarray::{Array1, Array2, ArrayView1, Axis};
use semroute_common::{Result, SemRouteError};
use serde::{Deserialize, Serialize};

use crate::similarity::{self, DistanceMetric};

/// Fixed-length embedding vector produced by an encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Wrap raw encoder output
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Vector length
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// True if every component is finite (no NaN / infinity)
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    /// True if every component is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|x| *x == 0.0)
    }

    pub fn dot(&self, other: &Embedding) -> Result<f32> {
        Ok(similarity::dot(&self.0, &other.0)? as f32)
    }

    pub fn magnitude(&self) -> f32 {
        similarity::magnitude(&self.0) as f32
    }

    /// Unit-length copy; a zero vector is returned unchanged
    pub fn normalize(&self) -> Embedding {
        let norm = self.magnitude();
        if norm == 0.0 {
            return self.clone();
        }
        let view = ArrayView1::from(self.0.as_slice());
        Embedding((&view / norm).to_vec())
    }

    pub fn cosine_similarity(&self, other: &Embedding) -> Result<f32> {
        similarity::cosine_similarity(&self.0, &other.0)
    }

    pub fn distance(&self, other: &Embedding, metric: DistanceMetric) -> Result<f32> {
        similarity::distance(&self.0, &other.0, metric)
    }

    /// Stack vectors into a matrix, one row per vector
    pub fn stack(vectors: &[Embedding]) -> Result<Array2<f32>> {
        let dim = common_dim(vectors)?;
        let mut matrix = Array2::<f32>::zeros((vectors.len(), dim));
        for (mut row, vector) in matrix.axis_iter_mut(Axis(0)).zip(vectors) {
            row.assign(&ArrayView1::from(vector.as_slice()));
        }
        Ok(matrix)
    }

    /// Element-wise mean of a non-empty set of equal-length vectors
    pub fn mean(vectors: &[Embedding]) -> Result<Embedding> {
        let matrix = Self::stack(vectors)?;
        let mean: Array1<f32> = matrix
            .mean_axis(Axis(0))
            .ok_or_else(|| SemRouteError::invalid_parameter("Cannot average zero vectors"))?;
        Ok(Embedding(mean.to_vec()))
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl AsRef<[f32]> for Embedding {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

fn common_dim(vectors: &[Embedding]) -> Result<usize> {
    let first = vectors
        .first()
        .ok_or_else(|| SemRouteError::invalid_parameter("Expected at least one vector"))?;
    let dim = first.dim();
    if let Some(other) = vectors.iter().find(|v| v.dim() != dim) {
        return Err(SemRouteError::dimension_mismatch(dim, other.dim()));
    }
    Ok(dim)
}
