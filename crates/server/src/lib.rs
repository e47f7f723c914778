//! semroute HTTP server
//!
//! actix-web boundary over the semantic router: `/route`, `/route/batch`,
//! `/routes` and `/health`

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use semroute_common::{AppConfig, Result, SemRouteError};
use semroute_router::SemanticRouter;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use state::AppState;

/// Register all endpoints
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(routes::route::route_query)
        .service(routes::route::route_batch)
        .service(routes::system::list_routes)
        .service(routes::system::health);
}

/// Body extractor settings; rejected payloads answer with the JSON error body
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError(SemRouteError::invalid_parameter(format!("Invalid request body: {}", err))).into()
    })
}

/// Run the HTTP server until shutdown
pub async fn start_server(config: AppConfig, router: Arc<SemanticRouter>) -> Result<()> {
    let state = Arc::new(AppState::new(router));
    let bind_addr = config.server_bind_address();

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header();

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
