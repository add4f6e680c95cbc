//! Postgate - minimal authenticated content server

use anyhow::{Context, Result};
use clap::{Parser, builder::BoolishValueParser};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, Overrides};
use postgate_api::{AppState, MetricsHandle, create_router};
use postgate_auth::{CookieSettings, TokenCodec};
use postgate_db::Database;

/// Postgate - signup, login, and token-gated posts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "POSTGATE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Secret used to sign session tokens
    #[arg(long, env = "ACCESS_TOKEN_SECRET", hide_env_values = true)]
    token_secret: Option<String>,

    /// Production mode (Secure session cookies)
    #[arg(long, env = "POSTGATE_PRODUCTION", value_parser = BoolishValueParser::new())]
    production: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A local .env is a development convenience; real deployments set the environment
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    config.apply(Overrides {
        bind: args.bind,
        port: args.port,
        database_url: args.database_url,
        token_secret: args.token_secret,
        production: args.production,
    });

    init_logging(&config.logging.level, &config.logging.format);

    info!("Starting Postgate v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    // Fail fast on missing database URL or signing secret
    config.validate()?;

    let db = Database::new(config.database_url()?)
        .await
        .context("Failed to open user database")?;
    info!("User database ready ({} registered users)", db.count_users().await?);

    let ttl = chrono::Duration::seconds(config.auth.token_ttl_secs);
    let codec = Arc::new(TokenCodec::new(config.token_secret()?, ttl));

    let cookies = CookieSettings {
        secure: config.server.production,
        max_age: ttl,
    };
    if !config.server.production {
        warn!("Production mode is off; session cookies are sent without the Secure flag");
    }

    let metrics_handle = if config.metrics.enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(Arc::new(MetricsHandle::new(handle)))
    } else {
        None
    };

    let state = AppState::new(Arc::new(db), codec, cookies);

    let app = create_router(state, metrics_handle).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
