//! In-memory fakes shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use bloodbridge_core::AppError;
use bloodbridge_core::result::AppResult;
use bloodbridge_core::types::Page;
use bloodbridge_entity::{BloodRequest, Donor, Session};

use crate::api::DirectoryClient;
use crate::directory::{Filter, PageSource};
use crate::gateway::{ApiRequest, Gateway, Method};
use crate::session::{MemorySessionStore, SessionManager};

type PageFn<T> = dyn Fn(&Filter, u32) -> AppResult<Page<T>> + Send + Sync;

/// Page source answering from a closure, optionally holding one page
/// until [`ScriptedSource::release`] is called.
pub(crate) struct ScriptedSource<T> {
    pages: Box<PageFn<T>>,
    calls: Mutex<Vec<(String, u32)>>,
    /// `(filter query, page)` to hold; `None` query holds that page for any filter.
    hold: Mutex<Option<(Option<String>, u32)>>,
    gate: Notify,
}

impl<T> ScriptedSource<T> {
    pub(crate) fn new(
        pages: impl Fn(&Filter, u32) -> AppResult<Page<T>> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            pages: Box::new(pages),
            calls: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
            gate: Notify::new(),
        })
    }

    pub(crate) fn hold(&self, query: Option<String>, page: u32) {
        *self.hold.lock().unwrap() = Some((query, page));
    }

    /// Let the held request finish.
    pub(crate) fn release(&self) {
        *self.hold.lock().unwrap() = None;
        self.gate.notify_one();
    }

    /// `(filter query, page)` for every fetch so far.
    pub(crate) fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    /// Yield until at least `n` fetches have started.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        while self.calls.lock().unwrap().len() < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> PageSource<T> for ScriptedSource<T> {
    async fn fetch_page(&self, filter: &Filter, page: u32) -> AppResult<Page<T>> {
        let query = filter.to_query_string();
        self.calls.lock().unwrap().push((query.clone(), page));
        let held = self
            .hold
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|(q, p)| *p == page && q.as_ref().is_none_or(|q| *q == query));
        if held {
            self.gate.notified().await;
        }
        (self.pages)(filter, page)
    }
}

/// Gateway answering from per-route queues and recording every request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedGateway {
    routes: Mutex<HashMap<(Method, String), VecDeque<AppResult<Value>>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue one answer for `method path`.
    pub(crate) fn respond(&self, method: Method, path: &str, answer: AppResult<Value>) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(answer);
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn send(&self, request: ApiRequest) -> AppResult<Value> {
        self.sent.lock().unwrap().push(request.clone());
        let answer = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&(request.method, request.path.clone()))
            .and_then(VecDeque::pop_front);
        answer.unwrap_or_else(|| Err(AppError::server_rejection(404, request.fallback)))
    }
}

/// Client over `gateway`; logged in as donor 1 (O+) when `token` is set.
pub(crate) async fn client_with(gateway: Arc<ScriptedGateway>, token: Option<&str>) -> DirectoryClient {
    let session = SessionManager::new(Arc::new(MemorySessionStore::new()));
    if let Some(token) = token {
        session
            .establish(Session {
                donor: donor(1, "O+"),
                token: token.to_string(),
            })
            .await;
    }
    DirectoryClient::new(gateway, session)
}

pub(crate) fn donor(id: u32, group: &str) -> Donor {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Donor {id}"),
        "bloodGroup": group,
        "location": "Dhaka",
    }))
    .unwrap()
}

pub(crate) fn request(id: u32, group: &str, units: u32) -> BloodRequest {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Patient {id}"),
        "bloodGroup": group,
        "location": "Dhaka",
        "hospital": "DMCH",
        "unitsNeeded": units,
        "urgency": "High",
        "status": "Active",
    }))
    .unwrap()
}

pub(crate) fn page_of<T>(results: Vec<T>, has_next: bool) -> Page<T> {
    Page {
        results,
        next: has_next.then(|| "next".to_string()),
        previous: None,
        count: None,
    }
}
