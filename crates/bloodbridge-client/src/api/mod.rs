//! Typed endpoints of the BloodBridge backend.
//!
//! [`DirectoryClient`] pairs a [`Gateway`] with the [`SessionManager`]: it
//! attaches the current token to every call and applies session changes
//! that follow from server responses (login, profile edits, logout and
//! account deletion). Donation bookkeeping lives in [`crate::donation`].

pub mod auth;
pub mod donors;
pub mod requests;

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use bloodbridge_core::result::AppResult;
use bloodbridge_core::types::Page;

use crate::gateway::{ApiRequest, Gateway, GatewayExt};
use crate::session::SessionManager;

/// Client for the request and donor directory.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    gateway: Arc<dyn Gateway>,
    session: SessionManager,
}

impl DirectoryClient {
    pub fn new(gateway: Arc<dyn Gateway>, session: SessionManager) -> Self {
        Self { gateway, session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// Send `request` with the session token attached, decoding the body.
    async fn call<T: DeserializeOwned + Send>(&self, request: ApiRequest) -> AppResult<T> {
        let request = request.bearer(self.session.token().await);
        self.gateway.send_json(request).await
    }

    /// Send `request` with the session token attached, ignoring the body.
    async fn call_raw(&self, request: ApiRequest) -> AppResult<Value> {
        let request = request.bearer(self.session.token().await);
        self.gateway.send(request).await
    }
}

/// Path segment for an id, percent-encoded.
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// List endpoints answer either with a bare array or a page envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listed<T> {
    Plain(Vec<T>),
    Paged(Page<T>),
}

impl<T> Listed<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(items) => items,
            Self::Paged(page) => page.results,
        }
    }
}
