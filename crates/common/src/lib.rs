//! semroute shared types
//!
//! Error taxonomy, application configuration and logging setup

pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use config::{AppConfig, EncoderBackend};
pub use error::SemRouteError;
pub type Result<T> = std::result::Result<T, SemRouteError>;
