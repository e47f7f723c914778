use semroute_common::{Result, SemRouteError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn check_dims(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(SemRouteError::dimension_mismatch(a.len(), b.len()));
    }
    Ok(())
}

/// Dot product, accumulated in f64
pub fn dot(a: &[f32], b: &[f32]) -> Result<f64> {
    check_dims(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum())
}

/// Euclidean norm, accumulated in f64
pub fn magnitude(a: &[f32]) -> f64 {
    a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt()
}

/// Cosine similarity between two vectors of equal length
///
/// Returns 0.0 when either vector has zero magnitude. The result is clamped
/// to [-1, 1] to absorb rounding.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    let dot = dot(a, b)?;
    let norm_a = magnitude(a);
    let norm_b = magnitude(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0) as f32)
}

/// Distance metrics supported by [`distance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
    /// `1 - cosine_similarity`
    Cosine,
}

impl FromStr for DistanceMetric {
    type Err = SemRouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" => Ok(Self::Manhattan),
            "cosine" => Ok(Self::Cosine),
            other => Err(SemRouteError::invalid_parameter(format!(
                "Unknown distance metric '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Cosine => "cosine",
        };
        f.write_str(name)
    }
}

/// Distance between two vectors of equal length
pub fn distance(a: &[f32], b: &[f32], metric: DistanceMetric) -> Result<f32> {
    check_dims(a, b)?;
    let value = match metric {
        DistanceMetric::Euclidean => a
            .iter()
            .zip(b)
            .map(|(x, y)| (f64::from(*x) - f64::from(*y)).powi(2))
            .sum::<f64>()
            .sqrt(),
        DistanceMetric::Manhattan => a
            .iter()
            .zip(b)
            .map(|(x, y)| (f64::from(*x) - f64::from(*y)).abs())
            .sum::<f64>(),
        DistanceMetric::Cosine => 1.0 - f64::from(cosine_similarity(a, b)?),
    };
    Ok(value as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_cosine_identical() {
        let a = [0.3, -1.2, 4.5, 0.01];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, 0.5, 7.0];
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < EPS);
        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((sim + 1.0).abs() < EPS);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            SemRouteError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_distance_metrics() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert_eq!(distance(&[0.0, 0.0], &[0.0, 0.0], DistanceMetric::Euclidean).unwrap(), 0.0);
        assert!((distance(&a, &b, DistanceMetric::Euclidean).unwrap() - 2f32.sqrt()).abs() < EPS);
        assert!((distance(&a, &b, DistanceMetric::Manhattan).unwrap() - 2.0).abs() < EPS);
        assert!((distance(&a, &b, DistanceMetric::Cosine).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("Cosine".parse::<DistanceMetric>().unwrap(), DistanceMetric::Cosine);
        let err = "chebyshev".parse::<DistanceMetric>().unwrap_err();
        assert!(err.is_caller_error());
    }
}
