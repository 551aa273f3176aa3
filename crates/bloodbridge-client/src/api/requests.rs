//! `/api/requests/` endpoints.

use async_trait::async_trait;
use tracing::debug;

use bloodbridge_core::result::AppResult;
use bloodbridge_core::types::{Page, RequestId};
use bloodbridge_entity::{
    BloodRequest, BloodRequestForm, CommunityStats, DonationReceipt, DonationSubmission,
};

use super::{DirectoryClient, segment};
use crate::directory::{Filter, PageSource};
use crate::gateway::ApiRequest;

pub const LOAD_REQUESTS_FAILED: &str = "Failed to load blood requests";
pub const SUBMIT_REQUEST_FAILED: &str = "Failed to submit request";
pub const DONATION_FAILED: &str = "Failed to respond to request";

impl DirectoryClient {
    /// Fetch one page of blood requests.
    pub async fn list_requests(&self, filter: &Filter, page: u32) -> AppResult<Page<BloodRequest>> {
        let request = ApiRequest::get("/api/requests/")
            .query("page", page.to_string())
            .query_pairs(filter.query_pairs())
            .fallback(LOAD_REQUESTS_FAILED);
        self.call(request).await
    }

    pub async fn get_request(&self, id: &RequestId) -> AppResult<BloodRequest> {
        let request = ApiRequest::get(format!("/api/requests/{}/", segment(id.as_str())))
            .fallback(LOAD_REQUESTS_FAILED);
        self.call(request).await
    }

    /// Validate and post a new blood request.
    pub async fn create_request(&self, form: BloodRequestForm) -> AppResult<BloodRequest> {
        let payload = form.into_payload()?;
        debug!(blood_group = %payload.blood_group, units = payload.units_needed, "Submitting blood request");
        let request = ApiRequest::post("/api/requests/")
            .json(&payload)?
            .fallback(SUBMIT_REQUEST_FAILED);
        self.call(request).await
    }

    /// Record a donation of `units` against a request.
    ///
    /// This is the raw call; the session and list bookkeeping around it is
    /// done by [`crate::donation::DonationFlow`].
    pub async fn donate(&self, id: &RequestId, units: u32) -> AppResult<DonationReceipt> {
        let request = ApiRequest::post(format!("/api/requests/{}/donated/", segment(id.as_str())))
            .json(&DonationSubmission { units_donated: units })?
            .fallback(DONATION_FAILED);
        self.call(request).await
    }

    /// Community-wide totals.
    pub async fn stats(&self) -> AppResult<CommunityStats> {
        self.call(ApiRequest::get("/api/requests/stats/").fallback("Failed to load stats"))
            .await
    }
}

#[async_trait]
impl PageSource<BloodRequest> for DirectoryClient {
    async fn fetch_page(&self, filter: &Filter, page: u32) -> AppResult<Page<BloodRequest>> {
        self.list_requests(filter, page).await
    }
}
