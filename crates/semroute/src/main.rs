mod catalog;

use anyhow::Result;
use clap::{Parser, Subcommand};
use semroute_common::{logger, AppConfig, EncoderBackend};
use semroute_encoder::{Encoder, HashEncoder, OllamaEncoder};
use semroute_router::SemanticRouter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "semroute")]
#[command(about = "semroute - embedding-based semantic routing of free-text queries", long_about = None)]
struct Cli {
    /// JSON file with route definitions (overrides ROUTES_PATH)
    #[arg(long, global = true)]
    routes: Option<PathBuf>,

    /// Default number of matches per query (overrides DEFAULT_TOP_K)
    #[arg(long, global = true)]
    top_k: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Route one or more queries and print the ranked matches as JSON
    Route {
        /// Queries to route
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Print the route catalog
    Routes,
}

/// Encoder selected by configuration
fn build_encoder(config: &AppConfig) -> Result<Arc<dyn Encoder>> {
    let encoder: Arc<dyn Encoder> = match config.encoder_backend {
        EncoderBackend::Ollama => Arc::new(OllamaEncoder::new(
            &config.ollama_base_url,
            &config.embedding_model,
            Duration::from_secs(config.encoder_timeout_secs),
            config.encoder_max_retries,
        )?),
        EncoderBackend::Hash => Arc::new(HashEncoder::new(config.hash_dimension)?),
    };
    Ok(encoder)
}

fn build_router(config: &AppConfig) -> Result<SemanticRouter> {
    let encoder = build_encoder(config)?;
    let definitions = catalog::resolve(config.routes_path.as_deref())?;
    Ok(SemanticRouter::from_definitions(encoder, definitions, config.default_top_k)?)
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI flags override environment / .env values
    if let Some(routes) = &cli.routes {
        std::env::set_var("ROUTES_PATH", routes);
    }
    if let Some(top_k) = cli.top_k {
        std::env::set_var("DEFAULT_TOP_K", top_k.to_string());
    }

    match cli.command {
        Some(Commands::Route { queries }) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;

            let router = build_router(&config)?;
            let results = router.route_batch(&queries, None).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Some(Commands::Routes) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;

            let definitions = catalog::resolve(config.routes_path.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = &host {
                std::env::set_var("SERVER_HOST", host);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }
            serve(AppConfig::from_env()?).await?;
        }
        None => serve(AppConfig::from_env()?).await?,
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::init_from_config(&config)?;

    tracing::info!("semroute starting...");
    tracing::info!("  Encoder: {:?} ({})", config.encoder_backend, config.embedding_model);
    tracing::info!("  Default top_k: {}", config.default_top_k);

    let router = build_router(&config)?;
    router.warm_up().await?;

    println!("Server listening on http://{}", config.server_bind_address());
    semroute_server::start_server(config, Arc::new(router)).await?;
    Ok(())
}
