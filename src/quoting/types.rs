//! Stock quote request, response and error types.

use axum::http::StatusCode;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Key of the quote object in a provider document.
pub const GLOBAL_QUOTE_KEY: &str = "Global Quote";
/// Key of the price inside the quote object.
pub const PRICE_KEY: &str = "05. price";

/// Failure of a single stock request. `Display` is the client-facing message.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Ticker symbol is required and must be a string")]
    InvalidTicker,

    /// Body exceeded `security.max_body_size` or could not be read.
    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Failed to fetch stock price")]
    UpstreamUnavailable(#[from] UpstreamError),

    #[error("Stock data not found")]
    DataNotFound,

    #[error("Stock price not available")]
    PriceUnavailable,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidTicker => StatusCode::BAD_REQUEST,
            GatewayError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::DataNotFound | GatewayError::PriceUnavailable => StatusCode::NOT_FOUND,
        }
    }

    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized => "unauthorized",
            GatewayError::InvalidTicker => "invalid_ticker",
            GatewayError::BodyTooLarge => "body_too_large",
            GatewayError::UpstreamUnavailable(_) => "upstream_unavailable",
            GatewayError::DataNotFound => "data_not_found",
            GatewayError::PriceUnavailable => "price_unavailable",
        }
    }
}

/// Successful lookup, serialized as `{ "<ticker>": <price> }`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub ticker: String,
    /// Price exactly as the provider sent it (a string for Alpha Vantage).
    pub price: Value,
}

impl Serialize for PriceQuote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.ticker, &self.price)?;
        map.end()
    }
}

/// Pull the `ticker` string out of a request body.
///
/// The body must be a JSON object whose `ticker` member is a string.
pub fn parse_ticker(body: &[u8]) -> Result<String, GatewayError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| GatewayError::InvalidTicker)?;

    value
        .as_object()
        .and_then(|obj| obj.get("ticker"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(GatewayError::InvalidTicker)
}

/// Find the price in a provider document.
pub fn extract_price(data: &Value) -> Result<Value, GatewayError> {
    let quote = data.get(GLOBAL_QUOTE_KEY).ok_or(GatewayError::DataNotFound)?;

    quote
        .get(PRICE_KEY)
        .filter(|price| is_truthy(price))
        .cloned()
        .ok_or(GatewayError::PriceUnavailable)
}

/// Informational message Alpha Vantage sends instead of data when a call is
/// throttled or the key is rejected.
pub fn provider_notice(data: &Value) -> Option<&str> {
    ["Note", "Information", "Error Message"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
}

// Empty strings, zero, null and empty containers count as "no price".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
