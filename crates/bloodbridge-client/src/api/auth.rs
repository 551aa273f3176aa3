//! Login, logout, and session refresh.

use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use bloodbridge_core::result::AppResult;
use bloodbridge_entity::{Donor, LoginResponse, Session};

use super::{DirectoryClient, segment};
use crate::gateway::{ApiRequest, GatewayExt};

pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Serialize, Validate)]
struct Credentials<'a> {
    #[validate(length(min = 1, message = "Please enter phone and password"))]
    contact: &'a str,
    #[validate(length(min = 1, message = "Please enter phone and password"))]
    password: &'a str,
}

impl DirectoryClient {
    /// Exchange contact and password for a session, then persist it.
    pub async fn login(&self, contact: &str, password: &str) -> AppResult<Session> {
        let credentials = Credentials { contact: contact.trim(), password };
        credentials.validate()?;

        let request = ApiRequest::post("/api/donors/login/")
            .json(&credentials)?
            .fallback(LOGIN_FAILED);
        // Credentials are sent without any stale token.
        let response: LoginResponse = self.gateway.send_json(request).await?;
        let session = Session::from(response);
        self.session.establish(session.clone()).await;
        Ok(session)
    }

    /// Forget the session locally.
    pub async fn logout(&self) {
        self.session.clear().await;
    }

    /// Re-read the logged-in donor from the server.
    ///
    /// Returns the cached donor unchanged when the server can't be reached
    /// or refuses, and `None` when logged out.
    pub async fn refresh(&self) -> Option<Donor> {
        let cached = self.session.donor().await?;
        let request = ApiRequest::get(format!("/api/donors/{}/", segment(cached.id.as_str())));
        match self.call::<Donor>(request).await {
            Ok(fresh) => {
                self.session.replace_donor(fresh.clone()).await;
                info!(donor_id = %fresh.id, "Session refreshed");
                Some(fresh)
            }
            Err(e) => {
                warn!(error = %e, "Keeping cached donor after failed refresh");
                Some(cached)
            }
        }
    }
}
