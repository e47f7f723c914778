//! semroute encoders
//!
//! The `Encoder` capability plus an Ollama client and a hashing encoder

mod encoder_trait;
mod hash;
mod ollama;
mod types;

pub use encoder_trait::{encode_checked, validate_inputs, validate_outputs, Encoder};
pub use hash::HashEncoder;
pub use ollama::OllamaEncoder;
pub use types::{EmbedRequest, EmbedResponse};
