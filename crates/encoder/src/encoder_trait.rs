use async_trait::async_trait;
use semroute_common::{Result, SemRouteError};
use semroute_vector::Embedding;
use tracing::debug;

/// Text-to-vector capability shared by every router call
///
/// Implementations return one vector per input, in input order, all of the
/// same length for a given instance. Equal inputs must give equal outputs.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode a batch of texts
    async fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Identifier used in logs and health output
    fn name(&self) -> &str;
}

/// Reject empty or blank encoder inputs
pub fn validate_inputs(texts: &[String]) -> Result<()> {
    if let Some(idx) = texts.iter().position(|t| t.trim().is_empty()) {
        return Err(SemRouteError::encoding(format!(
            "Cannot encode empty text (input #{})",
            idx
        )));
    }
    Ok(())
}

/// Check encoder output against its input count
///
/// Vectors must be non-empty, finite and share one length.
pub fn validate_outputs(input_count: usize, vectors: &[Embedding]) -> Result<()> {
    if vectors.len() != input_count {
        return Err(SemRouteError::encoding(format!(
            "Encoder returned {} vectors for {} inputs",
            vectors.len(),
            input_count
        )));
    }

    let Some(first) = vectors.first() else {
        return Ok(());
    };
    if first.dim() == 0 {
        return Err(SemRouteError::encoding("Encoder returned an empty vector"));
    }

    for (idx, vector) in vectors.iter().enumerate() {
        if vector.dim() != first.dim() {
            return Err(SemRouteError::encoding(format!(
                "Encoder returned vectors of differing length ({} and {} at #{})",
                first.dim(),
                vector.dim(),
                idx
            )));
        }
        if !vector.is_finite() {
            return Err(SemRouteError::encoding(format!(
                "Encoder returned a non-finite value at #{}",
                idx
            )));
        }
    }

    Ok(())
}

/// Encode through `encoder`, enforcing the batch contract on both sides
pub async fn encode_checked(encoder: &dyn Encoder, texts: &[String]) -> Result<Vec<Embedding>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    validate_inputs(texts)?;

    debug!("Encoding {} texts with {}", texts.len(), encoder.name());
    let vectors = encoder.encode(texts).await?;
    validate_outputs(texts.len(), &vectors)?;
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEncoder(Vec<Embedding>);

    #[async_trait]
    impl Encoder for FixedEncoder {
        async fn encode(&self, _texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_inputs() {
        assert!(validate_inputs(&texts(&["hello", "world"])).is_ok());
        assert!(validate_inputs(&texts(&["hello", "  "])).is_err());
        assert!(validate_inputs(&texts(&[""])).is_err());
    }

    #[test]
    fn test_validate_outputs() {
        let ok = vec![Embedding::new(vec![1.0, 0.0]), Embedding::new(vec![0.0, 1.0])];
        assert!(validate_outputs(2, &ok).is_ok());
        assert!(validate_outputs(3, &ok).is_err());

        let ragged = vec![Embedding::new(vec![1.0, 0.0]), Embedding::new(vec![1.0])];
        assert!(validate_outputs(2, &ragged).is_err());

        let empty = vec![Embedding::new(vec![])];
        assert!(validate_outputs(1, &empty).is_err());

        let nan = vec![Embedding::new(vec![f32::NAN, 0.0])];
        assert!(validate_outputs(1, &nan).is_err());
    }

    #[tokio::test]
    async fn test_encode_checked_count_mismatch() {
        let encoder = FixedEncoder(vec![Embedding::new(vec![1.0])]);
        let err = encode_checked(&encoder, &texts(&["a", "b"])).await.unwrap_err();
        assert!(matches!(err, SemRouteError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_encode_checked_rejects_blank_before_calling() {
        let encoder = FixedEncoder(vec![]);
        let err = encode_checked(&encoder, &texts(&[" "])).await.unwrap_err();
        assert!(err.to_string().contains("empty text"));
    }

    #[tokio::test]
    async fn test_encode_checked_empty_batch() {
        let encoder = FixedEncoder(vec![Embedding::new(vec![1.0])]);
        assert!(encode_checked(&encoder, &[]).await.unwrap().is_empty());
    }
}
