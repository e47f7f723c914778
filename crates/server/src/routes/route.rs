use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{BatchRouteRequest, BatchRouteResponse, RouteRequest, RouteResponse};

/// Return the top-k matching routes for the supplied query
#[post("/route")]
pub async fn route_query(
    req: web::Json<RouteRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    debug!("Routing query ({} chars, top_k={:?})", req.query.len(), req.top_k);

    let result = state.router.route(&req.query, req.top_k).await?;

    Ok(HttpResponse::Ok().json(RouteResponse::from(result)))
}

/// Route several queries with a single encoder call
#[post("/route/batch")]
pub async fn route_batch(
    req: web::Json<BatchRouteRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    debug!("Routing batch of {} queries (top_k={:?})", req.queries.len(), req.top_k);

    let results = state.router.route_batch(&req.queries, req.top_k).await?;

    Ok(HttpResponse::Ok().json(BatchRouteResponse {
        results: results.into_iter().map(RouteResponse::from).collect(),
    }))
}
