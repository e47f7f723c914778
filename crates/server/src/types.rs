use semroute_router::{MatchResult, RouteMatch};
use serde::{Deserialize, Serialize};

/// Single-query routing request
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// User input to be routed
    pub query: String,

    /// Override the router's default top_k
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Batch routing request
#[derive(Debug, Deserialize)]
pub struct BatchRouteRequest {
    /// User queries (at least one)
    pub queries: Vec<String>,

    /// Override the router's default top_k
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// One ranked route
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchItem {
    pub rank: usize,
    pub route_name: String,
    pub cosine_similarity: f32,
}

impl From<RouteMatch> for MatchItem {
    fn from(m: RouteMatch) -> Self {
        Self {
            rank: m.rank,
            route_name: m.route_name,
            cosine_similarity: m.score,
        }
    }
}

/// Routing response for one query
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub query: String,
    pub routes: Vec<MatchItem>,
}

impl From<MatchResult> for RouteResponse {
    fn from(result: MatchResult) -> Self {
        Self {
            query: result.query,
            routes: result.matches.into_iter().map(MatchItem::from).collect(),
        }
    }
}

/// Batch routing response, in request order
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRouteResponse {
    pub results: Vec<RouteResponse>,
}

/// Route catalog entry
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteInfo {
    pub name: String,
    pub description: String,
    pub examples: usize,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub routes: usize,
    pub encoder: String,
    pub uptime_secs: i64,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}
