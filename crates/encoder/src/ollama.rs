use async_trait::async_trait;
use reqwest::Client;
use semroute_common::{Result, SemRouteError};
use semroute_vector::Embedding;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::encoder_trait::Encoder;
use crate::types::{EmbedRequest, EmbedResponse};

/// Encoder backed by the Ollama embedding API
#[derive(Debug, Clone)]
pub struct OllamaEncoder {
    base_url: String,
    model: String,
    max_retries: u32,
    client: Client,
}

impl OllamaEncoder {
    /// Create new Ollama encoder
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SemRouteError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!("Ollama encoder initialized: {} (model: {})", base_url, model);
        Ok(Self {
            base_url,
            model,
            max_retries: max_retries.max(1),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed a batch, retrying transport failures with exponential backoff
    async fn embed_with_retry(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: self.model.clone(),
            input: texts.to_vec(),
        };

        debug!("Sending embed request to Ollama - Model: {}, Inputs: {}", self.model, texts.len());

        let mut attempt = 1;
        loop {
            match self.try_embed(&url, &request).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    let delay = Duration::from_secs(2u64.pow(attempt - 1));
                    warn!(
                        "Embedding request failed (attempt {}/{}): {}. Retrying in {:?}...",
                        attempt, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(SemRouteError::encoding(e.to_string())),
            }
        }
    }

    /// Single attempt
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| SemRouteError::network(format!("Failed to send embedding request: {}", e)))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(SemRouteError::network(format!("Ollama embedding API error: {}", status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SemRouteError::encoding(format!(
                "Ollama embedding API error: {} {}",
                status,
                body.trim()
            )));
        }

        let result: EmbedResponse = response
            .json()
            .await
            .map_err(|e| SemRouteError::encoding(format!("Failed to parse embedding response: {}", e)))?;

        Ok(result.embeddings)
    }
}

fn is_retryable(err: &SemRouteError) -> bool {
    matches!(err, SemRouteError::Network(_))
}

#[async_trait]
impl Encoder for OllamaEncoder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let embeddings = self.embed_with_retry(texts).await?;
        debug!(
            "Received {} embeddings - Dimension: {}",
            embeddings.len(),
            embeddings.first().map_or(0, Vec::len)
        );
        Ok(embeddings.into_iter().map(Embedding::new).collect())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Received {
        calls: AtomicUsize,
        bodies: Mutex<Vec<Value>>,
    }

    /// Stand-in for `/api/embed`: one vector per input, `[len, index, 1.0]`
    async fn fake_embed(
        body: web::Json<Value>,
        received: web::Data<Arc<Received>>,
    ) -> HttpResponse {
        let body = body.into_inner();
        received.calls.fetch_add(1, Ordering::SeqCst);
        received.bodies.lock().unwrap().push(body.clone());

        let inputs = body["input"].as_array().cloned().unwrap_or_default();
        let embeddings: Vec<Vec<f32>> = inputs
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let len = text.as_str().map_or(0, str::len);
                vec![len as f32, i as f32, 1.0]
            })
            .collect();

        HttpResponse::Ok().json(json!({
            "model": body["model"],
            "embeddings": embeddings,
            "total_duration": 1234
        }))
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let encoder = OllamaEncoder::new(
            "http://localhost:11434/",
            "all-minilm",
            Duration::from_secs(1),
            3,
        )
        .unwrap();
        assert_eq!(encoder.base_url, "http://localhost:11434");
        assert_eq!(encoder.name(), "all-minilm");
    }

    #[test]
    fn test_only_network_errors_retry() {
        assert!(is_retryable(&SemRouteError::network("refused")));
        assert!(!is_retryable(&SemRouteError::encoding("model not found")));
    }

    #[actix_web::test]
    async fn test_encode_batch_in_one_request() {
        let received = Arc::new(Received::default());
        let data = web::Data::new(received.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/api/embed", web::post().to(fake_embed))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let encoder = OllamaEncoder::new(
            format!("http://{}/", addr),
            "all-minilm",
            Duration::from_secs(5),
            3,
        )
        .unwrap();
        let texts = vec!["hello".to_string(), "good morning".to_string()];
        let embeddings = encoder.encode(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].as_slice(), &[5.0f32, 0.0, 1.0][..]);
        assert_eq!(embeddings[1].as_slice(), &[12.0f32, 1.0, 1.0][..]);
        assert!(embeddings.iter().all(|e| e.dim() == 3));

        assert_eq!(received.calls.load(Ordering::SeqCst), 1);
        let bodies = received.bodies.lock().unwrap().clone();
        assert_eq!(bodies[0]["model"], "all-minilm");
        assert_eq!(bodies[0]["input"], json!(["hello", "good morning"]));

        handle.stop(false).await;
    }

    #[tokio::test]
    async fn test_unreachable_server_is_encoding_error() {
        // Port 9 (discard) is not expected to run an HTTP server
        let encoder = OllamaEncoder::new(
            "http://127.0.0.1:9",
            "all-minilm",
            Duration::from_millis(500),
            1,
        )
        .unwrap();
        let err = encoder.encode(&["hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, SemRouteError::Encoding(_)));
    }
}
