use serde::{Deserialize, Serialize};

/// Ollama batch embedding request (`POST /api/embed`)
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    /// Model name (e.g., "all-minilm", "nomic-embed-text")
    pub model: String,

    /// Texts to embed, one vector is returned per entry
    pub input: Vec<String>,
}

/// Ollama batch embedding response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    /// Model name
    #[serde(default)]
    pub model: String,

    /// One vector per input, in input order
    pub embeddings: Vec<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = EmbedRequest {
            model: "all-minilm".to_string(),
            input: vec!["hello".to_string(), "world".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "all-minilm");
        assert_eq!(json["input"][1], "world");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"model":"all-minilm","embeddings":[[0.1,0.2],[0.3,0.4]],"total_duration":12}"#;
        let response: EmbedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.embeddings.len(), 2);
        assert_eq!(response.embeddings[1], vec![0.3, 0.4]);
    }
}
