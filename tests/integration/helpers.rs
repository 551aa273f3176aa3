//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;

use bloodbridge_client::{DirectoryClient, FileSessionStore, HttpGateway, SessionManager};
use bloodbridge_entity::{BloodRequest, Donor, Session};

/// A client wired to a mock backend, with its session file in a temp dir
pub struct TestApp {
    /// Mock backend
    pub server: MockServer,
    /// Client under test
    pub client: DirectoryClient,
    /// Where the session is persisted
    pub session_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Start a mock server and a logged-out client
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let session_path = dir.path().join("session.json");

        let client = Self::client_for(&server, &session_path);
        Self {
            server,
            client,
            session_path,
            _dir: dir,
        }
    }

    /// A fresh client sharing this app's backend and session file
    pub fn restart(&self) -> DirectoryClient {
        Self::client_for(&self.server, &self.session_path)
    }

    fn client_for(server: &MockServer, session_path: &PathBuf) -> DirectoryClient {
        let gateway = HttpGateway::with_origin(server.uri()).expect("Failed to build gateway");
        let session = SessionManager::new(Arc::new(FileSessionStore::new(session_path.clone())));
        DirectoryClient::new(Arc::new(gateway), session)
    }

    /// Log in without a round trip
    pub async fn login_as(&self, donor: Donor, token: &str) {
        self.client
            .session()
            .establish(Session {
                donor,
                token: token.to_string(),
            })
            .await;
    }
}

pub fn donor_json(id: u32, group: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Donor {id}"),
        "bloodGroup": group,
        "location": "Dhanmondi, Dhaka",
        "contact": "01700000000",
        "donationCount": 2,
        "lastDonated": "2024-01-10",
        "availability": "Available",
        "verified": true,
    })
}

pub fn donor(id: u32, group: &str) -> Donor {
    serde_json::from_value(donor_json(id, group)).expect("Invalid donor fixture")
}

pub fn request_json(id: u32, group: &str, units: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Patient {id}"),
        "bloodGroup": group,
        "location": "Mirpur, Dhaka",
        "hospital": "Dhaka Medical College Hospital",
        "contact": "01800000000",
        "unitsNeeded": units,
        "urgency": "Critical",
        "requiredBy": "2024-06-01",
        "status": "Active",
        "requestedAt": "2024-05-20T08:30:00Z",
    })
}

pub fn request(id: u32, group: &str, units: u32) -> BloodRequest {
    serde_json::from_value(request_json(id, group, units)).expect("Invalid request fixture")
}

/// A list page body; `next` is set when `has_next`
pub fn page(results: Vec<Value>, has_next: bool) -> Value {
    json!({
        "results": results,
        "next": if has_next { Value::from("http://backend/api/next/") } else { Value::Null },
        "previous": null,
    })
}
