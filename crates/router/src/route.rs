use semroute_common::{Result, SemRouteError};
use semroute_encoder::{encode_checked, Encoder};
use semroute_vector::Embedding;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

/// Serializable route definition, as read from a catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Unique route name
    pub name: String,

    /// Human description (informational)
    #[serde(default)]
    pub description: String,

    /// Example utterances
    pub examples: Vec<String>,
}

/// A named category matched through its example utterances
///
/// Example embeddings are computed once and cached for the route's lifetime.
#[derive(Debug)]
pub struct Route {
    name: String,
    description: String,
    examples: Vec<String>,
    embeddings: OnceCell<Vec<Embedding>>,
}

impl Route {
    /// Create a route; needs a non-blank name and at least one non-blank example
    pub fn new<I, S>(name: impl Into<String>, description: impl Into<String>, examples: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SemRouteError::invalid_route("Route name cannot be empty"));
        }

        let examples: Vec<String> = examples.into_iter().map(Into::into).collect();
        if examples.is_empty() {
            return Err(SemRouteError::invalid_route(format!(
                "Route '{}' needs at least one example",
                name
            )));
        }
        if let Some(idx) = examples.iter().position(|e| e.trim().is_empty()) {
            return Err(SemRouteError::invalid_route(format!(
                "Route '{}' has an empty example (#{})",
                name, idx
            )));
        }

        Ok(Self {
            name,
            description: description.into(),
            examples,
            embeddings: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    pub fn examples_count(&self) -> usize {
        self.examples.len()
    }

    /// Cached example embeddings, if already computed
    pub fn embeddings(&self) -> Option<&[Embedding]> {
        self.embeddings.get().map(Vec::as_slice)
    }

    pub fn is_embedded(&self) -> bool {
        self.embeddings.initialized()
    }

    /// Embed all examples in one encoder call, unless already done
    ///
    /// Concurrent callers wait for a single in-flight computation. A failed
    /// attempt leaves the cache empty so the next call retries.
    pub async fn ensure_embedded(&self, encoder: &dyn Encoder) -> Result<&[Embedding]> {
        let embeddings = self
            .embeddings
            .get_or_try_init(|| async {
                debug!("Embedding {} examples for route '{}'", self.examples.len(), self.name);
                encode_checked(encoder, &self.examples).await
            })
            .await?;
        Ok(embeddings)
    }

    /// Store embeddings computed elsewhere (batched across routes)
    ///
    /// No-op when the cache is already populated.
    pub(crate) fn store_embeddings(&self, embeddings: Vec<Embedding>) -> Result<()> {
        if embeddings.len() != self.examples.len() {
            return Err(SemRouteError::encoding(format!(
                "Route '{}' has {} examples but received {} embeddings",
                self.name,
                self.examples.len(),
                embeddings.len()
            )));
        }
        // A concurrent ensure_embedded may have won; both hold equal vectors.
        let _ = self.embeddings.set(embeddings);
        Ok(())
    }

    /// Highest cosine similarity between `query` and any example
    pub(crate) fn score(&self, query: &Embedding) -> Result<f32> {
        let embeddings = self.embeddings().ok_or_else(|| {
            SemRouteError::encoding(format!("Route '{}' has not been embedded", self.name))
        })?;

        let mut best = f32::NEG_INFINITY;
        for example in embeddings {
            best = best.max(query.cosine_similarity(example)?);
        }
        Ok(best)
    }
}

impl TryFrom<RouteDefinition> for Route {
    type Error = SemRouteError;

    fn try_from(def: RouteDefinition) -> Result<Self> {
        Route::new(def.name, def.description, def.examples)
    }
}

impl From<&Route> for RouteDefinition {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            description: route.description.clone(),
            examples: route.examples.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct LengthEncoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Encoder for LengthEncoder {
        async fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| Embedding::new(vec![t.len() as f32, 1.0]))
                .collect())
        }

        fn name(&self) -> &str {
            "length"
        }
    }

    #[test]
    fn test_empty_examples_rejected() {
        let err = Route::new("weather", "forecasts", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, SemRouteError::InvalidRoute(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Route::new("  ", "forecasts", ["is it raining"]).unwrap_err();
        assert!(matches!(err, SemRouteError::InvalidRoute(_)));
    }

    #[test]
    fn test_blank_example_rejected() {
        assert!(Route::new("weather", "", ["is it raining", ""]).is_err());
    }

    #[test]
    fn test_from_definition() {
        let def: RouteDefinition = serde_json::from_str(
            r#"{"name":"joke","examples":["tell me a joke"]}"#,
        )
        .unwrap();
        let route = Route::try_from(def).unwrap();
        assert_eq!(route.name(), "joke");
        assert_eq!(route.description(), "");
        assert_eq!(route.examples_count(), 1);
        assert!(!route.is_embedded());
    }

    #[tokio::test]
    async fn test_ensure_embedded_is_idempotent() {
        let encoder = LengthEncoder { calls: AtomicUsize::new(0) };
        let route = Route::new("greeting", "", ["hello", "hi there"]).unwrap();

        let first = route.ensure_embedded(&encoder).await.unwrap().to_vec();
        let second = route.ensure_embedded(&encoder).await.unwrap().to_vec();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);
        assert!(route.is_embedded());
    }

    #[tokio::test]
    async fn test_store_embeddings_checks_count() {
        let route = Route::new("greeting", "", ["hello", "hi there"]).unwrap();
        assert!(route.store_embeddings(vec![Embedding::new(vec![1.0])]).is_err());
        assert!(!route.is_embedded());

        route
            .store_embeddings(vec![Embedding::new(vec![1.0]), Embedding::new(vec![2.0])])
            .unwrap();
        assert_eq!(route.embeddings().unwrap().len(), 2);
    }

    #[test]
    fn test_score_is_max_over_examples() {
        let route = Route::new("greeting", "", ["a", "b"]).unwrap();
        route
            .store_embeddings(vec![
                Embedding::new(vec![1.0, 0.0]),
                Embedding::new(vec![0.6, 0.8]),
            ])
            .unwrap();
        let score = route.score(&Embedding::new(vec![0.0, 1.0])).unwrap();
        assert!((score - 0.8).abs() < 1e-6);
    }
}
