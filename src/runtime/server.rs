//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::app_routes;
use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::config::StaticConfig;
use crate::runtime::startup::{StartupContext, prepare_server_startup};

/// Run the HTTP server until it is stopped (SIGINT/SIGTERM).
///
/// **Note**: Logging must be initialized before calling this function.
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let StartupContext {
        metrics,
        shortener,
        click_tracker,
        sweeper,
        ..
    } = prepare_server_startup(config).inspect_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
    })?;

    let workers = config.server.workers.max(1);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware::new(metrics.clone())) // 记录请求延迟
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .app_data(web::Data::from(shortener.clone()))
            .app_data(web::Data::from(click_tracker.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .configure(app_routes)
    })
    .workers(workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!(
        "Starting server at http://{} with {} workers",
        bind_address, workers
    );
    server.run().await.context("HTTP server error")?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    warn!("Server stopped");
    Ok(())
}
