/// semroute error types
#[derive(Debug, thiserror::Error)]
pub enum SemRouteError {
    /// Invalid router construction (duplicate names, empty route set, bad defaults)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid route definition (empty name, no examples)
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Empty or blank query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Caller-supplied parameter out of range (e.g. top_k = 0)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Vectors of differing length were compared
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Encoder failure or malformed encoder output
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SemRouteError {
    /// Create configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create invalid route error
    pub fn invalid_route<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRoute(msg.into())
    }

    /// Create invalid query error
    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create encoding error
    pub fn encoding<S: Into<String>>(msg: S) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// True for errors caused by the caller's input rather than the router or encoder
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_) | Self::InvalidParameter(_))
    }

    /// True for construction-time errors
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::InvalidRoute(_))
    }

    /// Stable snake_case tag, used in JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InvalidRoute(_) => "invalid_route",
            Self::InvalidQuery(_) => "invalid_query",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::Encoding(_) => "encoding",
            Self::Network(_) => "network",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "internal",
        }
    }
}

// HTTP response conversion
impl SemRouteError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidQuery(_) => 400,
            Self::InvalidParameter(_) => 400,
            Self::Json(_) => 400,
            Self::Configuration(_) => 500,
            Self::InvalidRoute(_) => 500,
            Self::DimensionMismatch { .. } => 500,
            Self::Encoding(_) => 502,
            Self::Network(_) => 503,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}
