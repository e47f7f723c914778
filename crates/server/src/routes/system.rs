use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::{HealthResponse, RouteInfo};

#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        routes: state.router.len(),
        encoder: state.router.encoder_name().to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// List configured routes in registration order
#[get("/routes")]
pub async fn list_routes(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let routes: Vec<RouteInfo> = state
        .router
        .routes()
        .iter()
        .map(|r| RouteInfo {
            name: r.name().to_string(),
            description: r.description().to_string(),
            examples: r.examples_count(),
        })
        .collect();

    HttpResponse::Ok().json(routes)
}
