//! The stock price pipeline: authenticate, validate, fetch, extract.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::auth::CredentialVerifier;
use crate::quoting::types::{extract_price, parse_ticker, provider_notice, GatewayError, PriceQuote};
use crate::upstream::QuoteProvider;

/// Request-scoped pipeline over shared, read-only collaborators.
#[derive(Clone)]
pub struct QuoteGateway {
    verifier: Arc<dyn CredentialVerifier>,
    provider: Arc<dyn QuoteProvider>,
}

impl QuoteGateway {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self { verifier, provider }
    }

    /// Run one request through every guard in order.
    ///
    /// The first failing guard decides the error; the provider is only
    /// contacted once the caller is authorized and the ticker is valid.
    pub async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> Result<PriceQuote, GatewayError> {
        self.authorize(headers)?;
        self.lookup(body).await
    }

    /// First guard on its own, so callers can check credentials before
    /// reading the body.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), GatewayError> {
        if self.verifier.verify(headers) {
            Ok(())
        } else {
            Err(GatewayError::Unauthorized)
        }
    }

    /// Remaining guards for an already authorized caller.
    pub async fn lookup(&self, body: &[u8]) -> Result<PriceQuote, GatewayError> {
        let ticker = parse_ticker(body)?;
        let data = self.provider.global_quote(&ticker).await?;

        let price = extract_price(&data).inspect_err(|e| {
            if let (GatewayError::DataNotFound, Some(notice)) = (e, provider_notice(&data)) {
                tracing::warn!(ticker = %ticker, notice = %notice, "Provider returned a notice instead of data");
            }
        })?;

        Ok(PriceQuote { ticker, price })
    }
}
