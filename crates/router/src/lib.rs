//! semroute routing engine
//!
//! Routes, max-similarity scoring and top-k ranking

mod route;
mod router;
mod types;

pub use route::{Route, RouteDefinition};
pub use router::{SemanticRouter, DEFAULT_TOP_K};
pub use types::{MatchResult, RouteMatch};
