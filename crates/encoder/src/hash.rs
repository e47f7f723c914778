use async_trait::async_trait;
use semroute_common::{Result, SemRouteError};
use semroute_vector::Embedding;
use sha2::{Digest, Sha256};

use crate::encoder_trait::Encoder;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Model-free encoder using signed feature hashing
///
/// Words and character trigrams are hashed with SHA-256 into a fixed number
/// of buckets, so output is identical across processes and platforms. Texts
/// sharing vocabulary score high; it has no notion of meaning beyond that.
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dimension: usize,
    name: String,
}

impl HashEncoder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(SemRouteError::configuration(
                "Hash encoder dimension must be at least 1",
            ));
        }
        Ok(Self {
            dimension,
            name: format!("hash-{}", dimension),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut values = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            self.add_feature(&mut values, "w", word, WORD_WEIGHT);

            let padded: Vec<char> = format!(" {} ", word).chars().collect();
            for tri in padded.windows(3) {
                let tri: String = tri.iter().collect();
                self.add_feature(&mut values, "t", &tri, TRIGRAM_WEIGHT);
            }
        }

        Embedding::new(values).normalize()
    }

    fn add_feature(&self, values: &mut [f32], kind: &str, feature: &str, weight: f32) {
        let digest = Sha256::new()
            .chain_update(kind.as_bytes())
            .chain_update([0u8])
            .chain_update(feature.as_bytes())
            .finalize();

        let mut bucket = [0u8; 8];
        bucket.copy_from_slice(&digest[..8]);
        let idx = (u64::from_le_bytes(bucket) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        values[idx] += sign * weight;
    }
}

#[async_trait]
impl Encoder for HashEncoder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn encode(encoder: &HashEncoder, texts: &[&str]) -> Vec<Embedding> {
        let texts: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        encoder.encode(&texts).await.unwrap()
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashEncoder::new(0).is_err());
    }

    #[tokio::test]
    async fn test_deterministic_and_normalized() {
        let encoder = HashEncoder::new(64).unwrap();
        let first = encode(&encoder, &["What's the weather like today?"]).await;
        let second = encode(&encoder, &["What's the weather like today?"]).await;
        assert_eq!(first, second);
        assert_eq!(first[0].dim(), 64);
        assert!((first[0].magnitude() - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_vocabulary_scores_higher() {
        let encoder = HashEncoder::new(256).unwrap();
        let vs = encode(
            &encoder,
            &["is it going to rain tomorrow", "will it rain tomorrow", "tell me a funny joke"],
        )
        .await;
        let close = vs[0].cosine_similarity(&vs[1]).unwrap();
        let far = vs[0].cosine_similarity(&vs[2]).unwrap();
        assert!(close > far, "close={} far={}", close, far);
    }

    #[tokio::test]
    async fn test_punctuation_only_gives_zero_vector() {
        let encoder = HashEncoder::new(16).unwrap();
        let vs = encode(&encoder, &["?!"]).await;
        assert!(vs[0].is_zero());
    }
}
