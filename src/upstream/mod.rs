//! Upstream quote provider subsystem.
//!
//! # Data Flow
//! ```text
//! gateway (validated ticker)
//!     → QuoteProvider::global_quote
//!     → alpha_vantage.rs (URL build, HTTPS GET, status check, JSON decode)
//!     → serde_json::Value handed back to the gateway for interpretation
//! ```
//!
//! # Design Decisions
//! - One attempt per request, no retries
//! - Every failure is an `UpstreamError`; the gateway treats them alike
//! - The provider body is returned untyped so absence cases stay explicit

pub mod alpha_vantage;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use alpha_vantage::AlphaVantageClient;

/// Errors raised while talking to the quote provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The configured base URL could not be parsed.
    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The call did not complete within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// Connection, DNS, TLS or protocol failure.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {0}")]
    Status(u16),

    /// The provider body was not valid JSON.
    #[error("provider returned an undecodable body: {0}")]
    Decode(String),
}

// reqwest error text embeds the request URL, and that URL carries the api key.
impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if let Some(status) = e.status() {
            UpstreamError::Status(status.as_u16())
        } else if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// Source of "global quote" documents for a ticker.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch the raw quote document for `ticker`.
    async fn global_quote(&self, ticker: &str) -> Result<Value, UpstreamError>;
}
