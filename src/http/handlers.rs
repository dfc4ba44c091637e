use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::quoting::{GatewayError, PriceQuote};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/stock`
///
/// The body is taken raw so malformed JSON gets the gateway's own 400
/// message rather than the extractor's rejection. Credentials are checked
/// before a single body byte is read.
pub async fn get_stock_price(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_owned();

    match serve_stock_request(&state, &headers, body).await {
        Ok(quote) => {
            tracing::info!(request_id = %request_id, ticker = %quote.ticker, "Stock price served");
            metrics::record_request("ok", StatusCode::OK.as_u16(), start);
            (StatusCode::OK, Json(quote)).into_response()
        }
        Err(e) => {
            log_rejection(&request_id, &e);
            metrics::record_request(e.outcome(), e.status_code().as_u16(), start);
            e.into_response()
        }
    }
}

async fn serve_stock_request(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<PriceQuote, GatewayError> {
    state.gateway.authorize(headers)?;

    let bytes = axum::body::to_bytes(body, state.max_body_size).await.map_err(|e| {
        tracing::debug!(error = %e, limit = state.max_body_size, "Request body rejected");
        GatewayError::BodyTooLarge
    })?;

    state.gateway.lookup(&bytes).await
}

fn log_rejection(request_id: &str, err: &GatewayError) {
    match err {
        GatewayError::Unauthorized => {
            tracing::warn!(request_id = %request_id, "Rejected request with bad credentials")
        }
        GatewayError::InvalidTicker => {
            tracing::debug!(request_id = %request_id, "Rejected request without a valid ticker")
        }
        GatewayError::BodyTooLarge => {
            tracing::warn!(request_id = %request_id, "Rejected oversized request body")
        }
        GatewayError::UpstreamUnavailable(source) => {
            tracing::error!(request_id = %request_id, error = %source, "Upstream error")
        }
        GatewayError::DataNotFound | GatewayError::PriceUnavailable => {
            tracing::info!(request_id = %request_id, reason = %err, "No price for ticker")
        }
    }
}
