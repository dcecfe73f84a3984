//! Request handlers.
//!
//! Handlers never reject: validation failures become 400 responses and any
//! other failure becomes a 500 carrying the error message. Rejections from
//! the route filters are recovered into the same `{"error": ...}` shape.

use crate::models::{AnalyzeRequest, GovernanceRequest};
use crate::report::{render_dashboard, render_index};
use crate::service::{ReviewError, ReviewService};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{Reply, Response};
use warp::Rejection;

pub async fn index(service: Arc<ReviewService>) -> Result<Response, Infallible> {
    let recent = service.recent(crate::report::dashboard::INDEX_ANALYSES);
    Ok(warp::reply::html(render_index(&recent)).into_response())
}

pub async fn dashboard(service: Arc<ReviewService>) -> Result<Response, Infallible> {
    let analyses = service.analyses();
    let stats = crate::analysis::calculate_statistics(&analyses);
    Ok(warp::reply::html(render_dashboard(&stats, &analyses)).into_response())
}

pub async fn analyze(body: Bytes, service: Arc<ReviewService>) -> Result<Response, Infallible> {
    let result = match parse_body::<AnalyzeRequest>(&body) {
        Ok(request) => service.analyze(request).await,
        Err(e) => Err(e),
    };

    Ok(match result {
        Ok(record) => warp::reply::json(&record).into_response(),
        Err(e) => error_response(e),
    })
}

pub async fn governance_check(
    body: Bytes,
    service: Arc<ReviewService>,
) -> Result<Response, Infallible> {
    let result = match parse_body::<GovernanceRequest>(&body) {
        Ok(request) => service.governance_check(request).await,
        Err(e) => Err(e),
    };

    Ok(match result {
        Ok(verdict) => warp::reply::json(&verdict).into_response(),
        Err(e) => error_response(e),
    })
}

pub async fn health(service: Arc<ReviewService>) -> Result<Response, Infallible> {
    Ok(warp::reply::json(&service.health()).into_response())
}

pub async fn stats(service: Arc<ReviewService>) -> Result<Response, Infallible> {
    Ok(warp::reply::json(&service.statistics()).into_response())
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ReviewError> {
    serde_json::from_slice(body).map_err(ReviewError::from)
}

fn error_response(err: ReviewError) -> Response {
    let status = if err.is_validation() {
        warn!("Rejected request: {}", err);
        StatusCode::BAD_REQUEST
    } else {
        error!("Request failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    json_error(&err.to_string(), status)
}

/// Turn a filter rejection into a JSON error response.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length header required")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };

    Ok(json_error(message, status))
}

fn json_error(message: &str, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), status)
        .into_response()
}
