//! HTTP transport
//!
//! The client talks to the network only through [`HttpTransport`], a single
//! `get` method returning the response body. [`ReqwestTransport`] is the
//! production implementation; tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::GeocodingConfig;
use crate::error::GeocodingError;
use crate::query::Query;

/// Per-call request options (extra headers, timeout)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Headers added to the request
    pub headers: Vec<(String, String)>,

    /// Timeout for this request, overriding the client-wide one
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Minimal HTTP capability the client depends on
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request and return the response body
    ///
    /// # Errors
    ///
    /// Returns a network error if the connection fails or times out.
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<String, GeocodingError>;
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport using the user agent and timeout from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| GeocodingError::ConfigurationError(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<String, GeocodingError> {
        let mut request = self.client.get(url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        // Status codes are not validated; error bodies are parsed like any other.
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Geocoding service returned non-success status");
        }

        Ok(response.text().await?)
    }
}

/// Send `query` to `endpoint` and parse the body as JSON
///
/// No retries are attempted.
#[instrument(skip(transport, query, options))]
pub(crate) async fn run(
    transport: &dyn HttpTransport,
    endpoint: &str,
    query: &Query,
    options: &RequestOptions,
) -> Result<Value, GeocodingError> {
    let url = format!("{endpoint}?{}", query.to_query_string());
    debug!(query = %query.redacted(), "Sending geocoding request");

    let body = transport.get(&url, options).await?;
    let json: Value = serde_json::from_str(&body)?;

    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;
    use mockall::predicate::{always, eq};

    #[test]
    fn test_request_options_builder() {
        let options = RequestOptions::default()
            .with_header("X-Trace", "abc")
            .with_timeout(Duration::from_millis(200));

        assert_eq!(options.headers, vec![("X-Trace".to_string(), "abc".to_string())]);
        assert_eq!(options.timeout, Some(Duration::from_millis(200)));
    }

    #[test]
    fn test_transport_from_config() {
        assert!(ReqwestTransport::new(&GeocodingConfig::for_testing()).is_ok());
    }

    #[tokio::test]
    async fn test_run_appends_encoded_query() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .with(
                eq("https://search.mapzen.com/v1/search?api_key=k&text=123+abc+st"),
                always(),
            )
            .times(1)
            .returning(|_, _| Ok(r#"{"features": []}"#.to_string()));

        let query = QueryBuilder::new("k").text("123 abc st").build();
        let json = run(
            &transport,
            "https://search.mapzen.com/v1/search",
            &query,
            &RequestOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(json, serde_json::json!({"features": []}));
    }

    #[tokio::test]
    async fn test_run_forwards_request_options() {
        let options = RequestOptions::default().with_header("Authorization", "Bearer t");
        let expected = options.clone();

        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .withf(move |_, opts| *opts == expected)
            .times(1)
            .returning(|_, _| Ok("{}".to_string()));

        let query = QueryBuilder::new("k").build();
        let result = run(&transport, "http://localhost/v1/search", &query, &options).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_rejects_non_json_body() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Ok("<html>Bad Gateway</html>".to_string()));

        let query = QueryBuilder::new("k").build();
        let result = run(
            &transport,
            "http://localhost/v1/search",
            &query,
            &RequestOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(GeocodingError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_run_propagates_network_errors() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Err(GeocodingError::ConnectionFailed("refused".to_string())));

        let query = QueryBuilder::new("k").build();
        let result = run(
            &transport,
            "http://localhost/v1/search",
            &query,
            &RequestOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(GeocodingError::ConnectionFailed(_))));
    }
}
