//! HTTP gateway to the BloodBridge backend.
//!
//! The [`Gateway`] trait is the single seam through which every backend call
//! flows. [`HttpGateway`] is the reqwest-backed implementation; tests swap in
//! scripted gateways.

pub mod http;
pub mod request;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use bloodbridge_core::error::AppError;
use bloodbridge_core::result::AppResult;

pub use http::HttpGateway;
pub use request::{ApiRequest, Method, encode_query};

/// Issues one request against the backend and returns its JSON body.
///
/// Implementations must:
/// - resolve 2xx responses with the parsed body (`Value::Null` when empty);
/// - map non-2xx responses to `ErrorKind::ServerRejection`, carrying the
///   server's message when present and the request's fallback otherwise;
/// - map transport failures (no response at all) to `ErrorKind::Network`;
/// - never touch session state.
#[async_trait]
pub trait Gateway: Send + Sync + std::fmt::Debug + 'static {
    /// Send the request and return the parsed JSON body.
    async fn send(&self, request: ApiRequest) -> AppResult<Value>;
}

/// Typed helpers on top of [`Gateway::send`].
#[async_trait]
pub trait GatewayExt: Gateway {
    /// Send the request and decode the body into `T`.
    async fn send_json<T: DeserializeOwned + Send>(&self, request: ApiRequest) -> AppResult<T> {
        let path = request.path.clone();
        let body = self.send(request).await?;
        serde_json::from_value(body).map_err(|e| {
            AppError::with_source(
                bloodbridge_core::ErrorKind::Serialization,
                format!("Invalid response from server for {path}. Please try again."),
                e,
            )
        })
    }
}

impl<G: Gateway + ?Sized> GatewayExt for G {}
