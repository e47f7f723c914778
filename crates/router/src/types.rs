use serde::{Deserialize, Serialize};

/// One ranked candidate route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMatch {
    /// Position in the ranking, 0 = best
    pub rank: usize,

    /// Route name
    pub route_name: String,

    /// Max cosine similarity between the query and the route's examples (-1.0 to 1.0)
    pub score: f32,
}

/// Ranked routes for one query, highest score first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The routed query
    pub query: String,

    /// Candidates, at most top_k
    pub matches: Vec<RouteMatch>,
}

impl MatchResult {
    pub fn new(query: impl Into<String>, matches: Vec<RouteMatch>) -> Self {
        Self {
            query: query.into(),
            matches,
        }
    }

    /// Highest-scoring route
    pub fn best(&self) -> Option<&RouteMatch> {
        self.matches.first()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// `(route_name, score)` pairs in rank order
    pub fn scores(&self) -> impl Iterator<Item = (&str, f32)> {
        self.matches.iter().map(|m| (m.route_name.as_str(), m.score))
    }
}
