//! reqwest-backed [`Gateway`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

use bloodbridge_core::config::api::ApiConfig;
use bloodbridge_core::error::{AppError, ErrorKind, NETWORK_ERROR_MESSAGE};
use bloodbridge_core::result::AppResult;
use bloodbridge_core::types::server_message;

use super::Gateway;
use super::request::{ApiRequest, Method};

/// Gateway that talks to the backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    origin: String,
}

impl HttpGateway {
    /// Create a gateway from API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            origin: config.origin().to_string(),
        })
    }

    /// Create a gateway for an explicit origin with default settings.
    pub fn with_origin(origin: impl Into<String>) -> AppResult<Self> {
        let config = ApiConfig {
            base_url: origin.into(),
            ..ApiConfig::default()
        };
        Self::new(&config)
    }

    /// The backend origin requests are sent to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.origin, request.path_and_query())
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: ApiRequest) -> AppResult<Value> {
        let url = self.url(&request);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        debug!(method = %request.method, path = %request.path_and_query(), "Sending API request");

        let mut builder = self.client.request(method, &url);
        if let Some(token) = request.token.as_deref() {
            let value = HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|e| AppError::authentication(format!("Malformed API token: {e}")))?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if status.is_success() {
            debug!(status = status.as_u16(), path = %request.path, "API request succeeded");
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Serialization,
                    "Invalid response from server. Please try again.",
                    e,
                )
            });
        }

        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        let message = server_message(&body).unwrap_or_else(|| request.fallback.clone());
        warn!(
            status = status.as_u16(),
            path = %request.path,
            message = %message,
            "API request rejected"
        );
        Err(AppError::server_rejection(status.as_u16(), message))
    }
}

/// Map a reqwest failure that produced no usable response.
fn map_transport_error(err: reqwest::Error) -> AppError {
    if err.is_decode() {
        return AppError::with_source(
            ErrorKind::Serialization,
            "Invalid response from server. Please try again.",
            err,
        );
    }
    warn!(error = %err, "Network failure");
    AppError::with_source(ErrorKind::Network, NETWORK_ERROR_MESSAGE, err)
}
