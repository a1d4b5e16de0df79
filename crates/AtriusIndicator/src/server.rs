//! # Indicator Expression Server
//!
//! HTTP server exposing the expression engine over a metadata snapshot
//! loaded at startup.
//!
//! ## API Endpoints
//!
//! ```text
//! POST /api/expressions/validate
//!   Body: {"expression": "..."}
//!   Returns: {"status": "VALID"|"ERROR", "message": ..., "description"?, "code"?}
//!
//! POST /api/expressions/description
//!   Body: {"expression": "..."}
//!   Returns: {"description": "..."}
//!
//! POST /api/expressions/explode
//!   Body: {"expression": "..."}
//!   Returns: {"exploded": "..."}
//!
//! POST /api/expressions/evaluate
//!   Body: {"expression": "...", "missingValuePolicy"?, "context"?}
//!   Returns: {"value"?, "generated"?, "skipped": bool}
//!
//! GET /health
//!   Returns: Health check status
//! ```
//!
//! ## Configuration
//!
//! Command-line arguments and environment variables:
//!
//! - `INDICATOR_SERVER_PORT` / `--port`: Server port (default: 3000)
//! - `INDICATOR_SERVER_HOST` / `--host`: Server host (default: 127.0.0.1)
//! - `INDICATOR_LOG_LEVEL` / `--log-level`: Log level (default: info)
//! - `INDICATOR_ENABLE_CORS` / `--enable-cors`: Enable CORS (default: true)
//! - `INDICATOR_CORS_ORIGINS` / `--cors-origins`: Allowed origins (default: *)
//! - `INDICATOR_SNAPSHOT` / `--snapshot`: Path to the metadata snapshot JSON

use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::engine::IndicatorEngine;
use crate::error::ExpressionResult;
use crate::handlers::{
    AppState, describe_expression, evaluate_expression, explode_expression, health_check,
    validate_expression,
};
use crate::registry::MetadataSnapshot;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to.
    pub port: u16,
    /// Host address to bind to.
    pub host: String,
    /// Log level for the server.
    pub log_level: String,
    /// Whether to enable CORS.
    pub enable_cors: bool,
    /// Allowed CORS origins (comma-separated list, "*" for any).
    pub cors_origins: String,
    /// Path to the metadata snapshot JSON file.
    pub snapshot: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            enable_cors: true,
            cors_origins: "*".to_string(),
            snapshot: PathBuf::from("metadata.json"),
        }
    }
}

/// Command-line arguments for the server.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Indicator expression HTTP server",
    long_about = "HTTP server providing validation, description, expansion and evaluation of indicator expressions\n\nEnvironment variables:\n  INDICATOR_SERVER_PORT - Server port (default: 3000)\n  INDICATOR_SERVER_HOST - Server host (default: 127.0.0.1)\n  INDICATOR_LOG_LEVEL - Log level: error, warn, info, debug, trace (default: info)\n  INDICATOR_ENABLE_CORS - Enable CORS: true/false (default: true)\n  INDICATOR_CORS_ORIGINS - Allowed origins (comma-separated, * for any) (default: *)\n  INDICATOR_SNAPSHOT - Path to the metadata snapshot JSON"
)]
pub struct ServerArgs {
    /// Port to bind the server to
    #[arg(short, long, env = "INDICATOR_SERVER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Host address to bind to
    #[arg(
        short = 'H',
        long,
        env = "INDICATOR_SERVER_HOST",
        default_value = "127.0.0.1"
    )]
    pub host: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "INDICATOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable CORS
    #[arg(
        short = 'c',
        long,
        env = "INDICATOR_ENABLE_CORS",
        default_value_t = true
    )]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated list, "*" for any)
    #[arg(long, env = "INDICATOR_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Path to the metadata snapshot JSON file
    #[arg(short, long, env = "INDICATOR_SNAPSHOT", default_value = "metadata.json")]
    pub snapshot: PathBuf,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        ServerConfig {
            port: args.port,
            host: args.host,
            log_level: args.log_level,
            enable_cors: args.enable_cors,
            cors_origins: args.cors_origins,
            snapshot: args.snapshot,
        }
    }
}

/// Run the indicator expression server.
pub async fn run_server(config: ServerConfig) -> ExpressionResult<()> {
    // Initialize tracing
    let filter = format!(
        "atrius_indicator_expr={},tower_http={}",
        config.log_level, config.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .init();

    info!("Starting indicator expression server...");
    info!("Configuration: {:?}", config);

    // Load the metadata snapshot
    let json = std::fs::read_to_string(&config.snapshot)?;
    let snapshot = MetadataSnapshot::from_json(&json)?;
    info!(
        snapshot = %config.snapshot.display(),
        version = snapshot.version(),
        "Loaded metadata snapshot"
    );

    let state = Arc::new(AppState {
        engine: IndicatorEngine::from_snapshot(snapshot),
    });

    // Build the application
    let app = create_app(&config, state);

    // Parse the host address
    let host: std::net::IpAddr = config.host.parse().unwrap_or_else(|_| {
        warn!("Invalid host address '{}', using 127.0.0.1", config.host);
        "127.0.0.1".parse().expect("loopback address")
    });

    // Create the server address
    let addr = SocketAddr::from((host, config.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the axum application with all routes.
pub fn create_app(config: &ServerConfig, state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/api/expressions/validate", post(validate_expression))
        .route("/api/expressions/description", post(describe_expression))
        .route("/api/expressions/explode", post(explode_expression))
        .route("/api/expressions/evaluate", post(evaluate_expression))
        .route("/health", get(health_check))
        .with_state(state);

    // Add CORS if enabled
    if config.enable_cors {
        app = app.layer(build_cors_layer(config));
    }

    // Add tracing
    app = app.layer(TraceLayer::new_for_http());

    app
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    use tower_http::cors::AllowOrigin;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]);

    if config.cors_origins == "*" {
        cors = cors.allow_origin(AllowOrigin::any());
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors
}
