//! Alpha Vantage `GLOBAL_QUOTE` client with explicit timeouts.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::ProviderConfig;
use crate::observability::metrics;
use crate::upstream::{QuoteProvider, UpstreamError};

/// Query function requested from the provider.
pub const GLOBAL_QUOTE_FUNCTION: &str = "GLOBAL_QUOTE";

/// HTTP client for the Alpha Vantage query endpoint.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl AlphaVantageClient {
    /// Create a client from provider settings.
    pub fn new(config: &ProviderConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)?;
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("quote-gateway/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        tracing::info!(
            host = base_url.host_str().unwrap_or("unknown"),
            timeout_secs = config.timeout_secs,
            "Quote provider client initialized"
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Full request URL for `ticker`. Query values are form-encoded.
    pub fn quote_url(&self, ticker: &str) -> Url {
        build_quote_url(&self.base_url, ticker, &self.api_key)
    }
}

pub fn build_quote_url(base: &Url, ticker: &str, api_key: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("function", GLOBAL_QUOTE_FUNCTION)
        .append_pair("symbol", ticker)
        .append_pair("apikey", api_key);
    url
}

#[async_trait]
impl QuoteProvider for AlphaVantageClient {
    async fn global_quote(&self, ticker: &str) -> Result<Value, UpstreamError> {
        let start = Instant::now();
        let result = fetch(&self.client, self.quote_url(ticker)).await;

        match &result {
            Ok(_) => {
                metrics::record_upstream("ok", start);
                tracing::debug!(ticker = %ticker, elapsed = ?start.elapsed(), "Provider responded");
            }
            Err(e) => {
                metrics::record_upstream("error", start);
                tracing::debug!(ticker = %ticker, error = %e, "Provider call failed");
            }
        }

        result
    }
}

async fn fetch(client: &Client, url: Url) -> Result<Value, UpstreamError> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.json::<Value>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.alphavantage.co/query").unwrap()
    }

    #[test]
    fn test_plain_ticker_url_matches_template() {
        let url = build_quote_url(&base(), "AAPL", "demo");
        assert_eq!(
            url.as_str(),
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=AAPL&apikey=demo"
        );
    }

    #[test]
    fn test_dotted_ticker_is_unchanged() {
        let url = build_quote_url(&base(), "BRK.B", "demo");
        assert!(url.as_str().contains("symbol=BRK.B&"));
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let url = build_quote_url(&base(), "A&apikey=evil", "demo");
        assert!(url.as_str().contains("symbol=A%26apikey%3Devil&apikey=demo"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1], ("symbol".into(), "A&apikey=evil".into()));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = ProviderConfig {
            base_url: "not a url".into(),
            ..ProviderConfig::default()
        };
        assert!(matches!(
            AlphaVantageClient::new(&config),
            Err(UpstreamError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_client_builds_quote_url_from_config() {
        let config = ProviderConfig {
            base_url: "http://127.0.0.1:9/query".into(),
            api_key: "k".into(),
            ..ProviderConfig::default()
        };
        let client = AlphaVantageClient::new(&config).unwrap();
        assert_eq!(
            client.quote_url("MSFT").as_str(),
            "http://127.0.0.1:9/query?function=GLOBAL_QUOTE&symbol=MSFT&apikey=k"
        );
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        let addr = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let config = ProviderConfig {
            base_url: format!("http://{}/query", addr),
            api_key: "SUPERSECRETKEY".into(),
            timeout_secs: 2,
            connect_timeout_secs: 1,
            use_system_proxy: false,
        };
        let client = AlphaVantageClient::new(&config).unwrap();

        let err = client.global_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_) | UpstreamError::Timeout), "{:?}", err);
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "{}", err);
        assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"), "{:?}", err);
    }

    #[tokio::test]
    async fn test_decode_error_does_not_leak_api_key() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let body = "<html>maintenance</html>";
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });

        let config = ProviderConfig {
            base_url: format!("http://{}/query", addr),
            api_key: "SUPERSECRETKEY".into(),
            timeout_secs: 2,
            connect_timeout_secs: 1,
            use_system_proxy: false,
        };
        let client = AlphaVantageClient::new(&config).unwrap();

        let err = client.global_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)), "{:?}", err);
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "{}", err);
    }
}
