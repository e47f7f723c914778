use chrono::{DateTime, Utc};
use semroute_router::SemanticRouter;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Router shared by all workers; read-only after warm-up
    pub router: Arc<SemanticRouter>,

    /// Server start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(router: Arc<SemanticRouter>) -> Self {
        Self {
            router,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
