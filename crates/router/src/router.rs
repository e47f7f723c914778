use semroute_common::{Result, SemRouteError};
use semroute_encoder::{encode_checked, Encoder};
use semroute_vector::Embedding;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::route::{Route, RouteDefinition};
use crate::types::{MatchResult, RouteMatch};

/// top_k used by [`SemanticRouter::with_default_top_k`]
pub const DEFAULT_TOP_K: usize = 5;

/// Routes free-text queries to the closest of a fixed set of routes
///
/// A route's score is the maximum cosine similarity between the query and
/// any one of its examples. Routes are ranked by descending score; equal
/// scores keep registration order.
pub struct SemanticRouter {
    encoder: Arc<dyn Encoder>,
    routes: Vec<Route>,
    index: HashMap<String, usize>,
    top_k: usize,
    warm: OnceCell<()>,
}

impl SemanticRouter {
    /// Create router; example embeddings are computed on first use
    pub fn new(encoder: Arc<dyn Encoder>, routes: Vec<Route>, top_k: usize) -> Result<Self> {
        if routes.is_empty() {
            return Err(SemRouteError::configuration("No routes provided for the router"));
        }
        if top_k == 0 {
            return Err(SemRouteError::configuration("Default top_k must be at least 1"));
        }

        let mut index = HashMap::with_capacity(routes.len());
        for (idx, route) in routes.iter().enumerate() {
            if index.insert(route.name().to_string(), idx).is_some() {
                return Err(SemRouteError::configuration(format!(
                    "Duplicate route name '{}'",
                    route.name()
                )));
            }
        }

        info!(
            "Semantic router created - {} routes, top_k={}, encoder={}",
            routes.len(),
            top_k,
            encoder.name()
        );

        Ok(Self {
            encoder,
            routes,
            index,
            top_k,
            warm: OnceCell::new(),
        })
    }

    /// Create router with [`DEFAULT_TOP_K`]
    pub fn with_default_top_k(encoder: Arc<dyn Encoder>, routes: Vec<Route>) -> Result<Self> {
        Self::new(encoder, routes, DEFAULT_TOP_K)
    }

    /// Create router from catalog definitions
    pub fn from_definitions<I>(encoder: Arc<dyn Encoder>, definitions: I, top_k: usize) -> Result<Self>
    where
        I: IntoIterator<Item = RouteDefinition>,
    {
        let routes = definitions
            .into_iter()
            .map(Route::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(encoder, routes, top_k)
    }

    /// Create router and embed every route's examples up front
    pub async fn build(encoder: Arc<dyn Encoder>, routes: Vec<Route>, top_k: usize) -> Result<Self> {
        let router = Self::new(encoder, routes, top_k)?;
        router.warm_up().await?;
        Ok(router)
    }

    /// Embed all routes' examples in a single encoder call, once
    pub async fn warm_up(&self) -> Result<()> {
        self.warm.get_or_try_init(|| self.embed_pending()).await?;
        Ok(())
    }

    async fn embed_pending(&self) -> Result<()> {
        let pending: Vec<&Route> = self.routes.iter().filter(|r| !r.is_embedded()).collect();
        if pending.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = pending
            .iter()
            .flat_map(|r| r.examples().iter().cloned())
            .collect();
        info!("Embedding {} examples across {} routes", texts.len(), pending.len());

        let mut vectors = encode_checked(self.encoder.as_ref(), &texts).await?.into_iter();
        for route in pending {
            let chunk: Vec<Embedding> = vectors.by_ref().take(route.examples_count()).collect();
            route.store_embeddings(chunk)?;
        }
        Ok(())
    }

    /// Rank routes for one query
    ///
    /// `top_k` overrides the router default; it must be at least 1.
    pub async fn route(&self, query: &str, top_k: Option<usize>) -> Result<MatchResult> {
        if query.trim().is_empty() {
            return Err(SemRouteError::invalid_query("Query cannot be empty"));
        }
        let top_k = self.resolve_top_k(top_k)?;

        let mut results = self.route_validated(&[query.to_string()], top_k).await?;
        results
            .pop()
            .ok_or_else(|| SemRouteError::encoding("Encoder returned no vector for the query"))
    }

    /// Rank routes for several queries, encoding all of them in one call
    ///
    /// Results are returned in query order.
    pub async fn route_batch<S: AsRef<str>>(
        &self,
        queries: &[S],
        top_k: Option<usize>,
    ) -> Result<Vec<MatchResult>> {
        if queries.is_empty() {
            return Err(SemRouteError::invalid_query("At least one query is required"));
        }
        if let Some(idx) = queries.iter().position(|q| q.as_ref().trim().is_empty()) {
            return Err(SemRouteError::invalid_query(format!(
                "Query #{} cannot be empty",
                idx
            )));
        }
        let top_k = self.resolve_top_k(top_k)?;

        let queries: Vec<String> = queries.iter().map(|q| q.as_ref().to_string()).collect();
        self.route_validated(&queries, top_k).await
    }

    async fn route_validated(&self, queries: &[String], top_k: usize) -> Result<Vec<MatchResult>> {
        self.warm_up().await?;

        let vectors = encode_checked(self.encoder.as_ref(), queries).await?;
        debug!("Routing {} queries (top_k={})", queries.len(), top_k);

        queries
            .iter()
            .zip(&vectors)
            .map(|(query, vector)| self.rank(query, vector, top_k))
            .collect()
    }

    fn rank(&self, query: &str, vector: &Embedding, top_k: usize) -> Result<MatchResult> {
        let mut scored = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            scored.push((route.name(), route.score(vector)?));
        }

        // Stable sort: equal scores keep registration order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        let matches = scored
            .into_iter()
            .enumerate()
            .map(|(rank, (name, score))| RouteMatch {
                rank,
                route_name: name.to_string(),
                score,
            })
            .collect();

        Ok(MatchResult::new(query, matches))
    }

    fn resolve_top_k(&self, top_k: Option<usize>) -> Result<usize> {
        match top_k {
            Some(0) => Err(SemRouteError::invalid_parameter("top_k must be at least 1")),
            Some(k) => Ok(k),
            None => Ok(self.top_k),
        }
    }

    pub fn default_top_k(&self) -> usize {
        self.top_k
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in registration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(Route::name)
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.index.get(name).map(|&idx| &self.routes[idx])
    }

    pub fn encoder_name(&self) -> &str {
        self.encoder.name()
    }

    /// True once every route's examples are embedded
    pub fn is_warm(&self) -> bool {
        self.routes.iter().all(Route::is_embedded)
    }
}

impl std::fmt::Debug for SemanticRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticRouter")
            .field("encoder", &self.encoder.name())
            .field("routes", &self.routes)
            .field("top_k", &self.top_k)
            .finish()
    }
}
