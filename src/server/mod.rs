//! HTTP server exposing the review API and dashboard.

pub mod handlers;

use crate::service::ReviewService;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use warp::Filter;

/// Largest accepted request body.
const MAX_BODY_BYTES: u64 = 2 * 1024 * 1024;

/// Build the full route tree.
pub fn routes(
    service: Arc<ReviewService>,
) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    let service_filter = warp::any().map(move || Arc::clone(&service));

    let index = warp::path::end()
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handlers::index);

    let dashboard = warp::path!("dashboard")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handlers::dashboard);

    let analyze = warp::path!("analyze")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(service_filter.clone())
        .and_then(handlers::analyze);

    let governance = warp::path!("governance" / "check")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(service_filter.clone())
        .and_then(handlers::governance_check);

    let health = warp::path!("api" / "health")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handlers::health);

    let stats = warp::path!("api" / "stats")
        .and(warp::get())
        .and(service_filter)
        .and_then(handlers::stats);

    index
        .or(dashboard)
        .or(analyze)
        .or(governance)
        .or(health)
        .or(stats)
        .recover(handlers::handle_rejection)
        .with(warp::trace::request())
}

/// Serve until Ctrl-C is received.
pub async fn serve(service: Arc<ReviewService>, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let (bound, server) = warp::serve(routes(service))
        .try_bind_with_graceful_shutdown(addr, async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", bound);
    server.await;
    info!("Server stopped");

    Ok(())
}
