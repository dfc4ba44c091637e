use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with its `{"error": ...}` body.
    #[error("gateway returned {status}: {message}")]
    Gateway { status: StatusCode, message: String },

    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

/// A price as returned by `POST /api/stock`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub ticker: String,
    pub price: Value,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    token: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str, token: &str) -> Self {
        Self::with_client(Client::new(), gateway_url, token)
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(client: Client, gateway_url: &str, token: &str) -> Self {
        Self {
            client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Look up the latest price for `ticker`.
    pub async fn fetch_price(&self, ticker: &str) -> Result<PriceQuote, SdkError> {
        let resp = self
            .post_stock(&serde_json::json!({ "ticker": ticker }), Some(&self.bearer()))
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => SdkError::Gateway {
                    status,
                    message: body.error,
                },
                Err(_) => SdkError::UnexpectedBody(text),
            });
        }

        let map: Map<String, Value> =
            serde_json::from_str(&text).map_err(|_| SdkError::UnexpectedBody(text.clone()))?;
        let mut entries = map.into_iter();
        match (entries.next(), entries.next()) {
            (Some((ticker, price)), None) => Ok(PriceQuote { ticker, price }),
            _ => Err(SdkError::UnexpectedBody(text)),
        }
    }

    /// Send an arbitrary body to `POST /api/stock` with an optional raw
    /// `Authorization` value.
    pub async fn post_stock(
        &self,
        body: &Value,
        authorization: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut req = self
            .client
            .post(format!("{}/api/stock", self.gateway_url))
            .json(body);
        if let Some(auth) = authorization {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        req.send().await
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Value, SdkError> {
        let resp = self
            .client
            .get(format!("{}/health", self.gateway_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
