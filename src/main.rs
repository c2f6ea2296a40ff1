//! # Fibra Relay - Main Application Entry Point
//!
//! Single-endpoint HTTP relay: accepts an uploaded audio file, forwards it to an
//! OpenAI-compatible speech-to-text API and returns the transcript.
//!
//! ## Application Architecture:
//! - **config**: Settings from defaults, `config.toml`, `.env` files and environment
//! - **state**: Read-only state shared by all workers (config + provider client)
//! - **health**: Fixed liveness payload
//! - **handlers**: The transcription endpoint and the route table
//! - **transcription**: Provider trait and the OpenAI client
//! - **middleware**: Per-request logging
//! - **error**: Error types and their HTTP rendering

mod config;
mod error;
mod handlers;
mod health;
mod middleware;
mod state;
mod transcription;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::transcription::OpenAiClient;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Set once SIGINT or SIGTERM arrives.
static SHUTDOWN_SIGNAL: AtomicBool = AtomicBool::new(false);

#[actix_web::main]
async fn main() -> Result<()> {
    // Earlier files win: dotenv never overrides a variable that is already set
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    init_tracing()?;

    let config = AppConfig::load()?;
    config.validate()?;

    info!("Starting fibra-relay v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: {}:{}, model {}",
        config.server.host, config.server.port, config.openai.model
    );

    if !config.has_api_key() {
        warn!("OPENAI_API_KEY is not set; /api/transcribe will fail until it is configured");
    }

    // One provider client for the lifetime of the process
    let api_key = config
        .openai
        .api_key
        .clone()
        .unwrap_or_else(|| SecretString::from(String::new()));
    let provider = Arc::new(OpenAiClient::new(
        api_key,
        &config.openai.base_url,
        &config.openai.model,
    ));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let app_state = AppState::new(config, provider);

    setup_signal_handlers();

    info!("Starting HTTP server on {}", bind_addr);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(handlers::cors())
            .wrap(Logger::default())
            .wrap(middleware::RequestLogging)
            .configure(handlers::routes)
    })
    .bind(&bind_addr)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            match result {
                Ok(server_result) => {
                    if let Err(e) = server_result {
                        error!("Server error: {}", e);
                    }
                }
                Err(e) => {
                    error!("Server task error: {}", e);
                }
            }
        }
        _ = wait_for_shutdown() => {
            info!("Shutdown signal received, stopping server...");
            server_handle.stop(true).await;
        }
    }

    info!("Server stopped gracefully");
    Ok(())
}

/// Console logging filtered by `RUST_LOG`, defaulting to
/// `fibra_relay=debug,actix_web=info`.
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fibra_relay=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}

fn setup_signal_handlers() {
    tokio::spawn(async {
        let (mut sigterm, mut sigint) = match (
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()),
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to install signal handlers: {}", e);
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }

        SHUTDOWN_SIGNAL.store(true, Ordering::SeqCst);
    });
}

async fn wait_for_shutdown() {
    while !SHUTDOWN_SIGNAL.load(Ordering::SeqCst) {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
}
