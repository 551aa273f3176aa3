//! `/api/donors/` and `/api/donations/` endpoints.

use async_trait::async_trait;
use tracing::info;

use bloodbridge_core::result::AppResult;
use bloodbridge_core::types::{DonorId, Page};
use bloodbridge_entity::{Donation, Donor, ProfileUpdate, RegistrationForm};

use super::{DirectoryClient, Listed, segment};
use crate::directory::{Filter, PageSource};
use crate::gateway::ApiRequest;

pub const LOAD_DONORS_FAILED: &str = "Failed to load donors";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const UPDATE_PROFILE_FAILED: &str = "Failed to update profile";
pub const DELETE_ACCOUNT_FAILED: &str = "Failed to delete account";

impl DirectoryClient {
    /// Fetch one page of donors.
    pub async fn list_donors(&self, filter: &Filter, page: u32) -> AppResult<Page<Donor>> {
        let request = ApiRequest::get("/api/donors/")
            .query("page", page.to_string())
            .query_pairs(filter.query_pairs())
            .fallback(LOAD_DONORS_FAILED);
        self.call(request).await
    }

    pub async fn get_donor(&self, id: &DonorId) -> AppResult<Donor> {
        let request = ApiRequest::get(format!("/api/donors/{}/", segment(id.as_str())))
            .fallback(LOAD_DONORS_FAILED);
        self.call(request).await
    }

    /// Validate and create a donor account. Does not log in.
    pub async fn register(&self, form: RegistrationForm) -> AppResult<Donor> {
        let payload = form.into_payload()?;
        let request = ApiRequest::post("/api/donors/")
            .json(&payload)?
            .fallback(REGISTRATION_FAILED);
        let donor: Donor = self.call(request).await?;
        info!(donor_id = %donor.id, "Donor registered");
        Ok(donor)
    }

    /// Patch the logged-in donor's editable fields and cache the result.
    pub async fn update_profile(&self, update: ProfileUpdate) -> AppResult<Donor> {
        update.check()?;
        let session = self.session.require().await?;
        let request = ApiRequest::patch(format!("/api/donors/{}/", segment(session.donor.id.as_str())))
            .json(&update)?
            .fallback(UPDATE_PROFILE_FAILED);
        let donor: Donor = self.call(request).await?;
        self.session.replace_donor(donor.clone()).await;
        info!(donor_id = %donor.id, "Profile updated");
        Ok(donor)
    }

    /// Delete the logged-in donor's account and forget the session.
    pub async fn delete_account(&self) -> AppResult<()> {
        self.session.require().await?;
        let request = ApiRequest::delete("/api/donors/delete_account/").fallback(DELETE_ACCOUNT_FAILED);
        self.call_raw(request).await?;
        self.session.clear().await;
        info!("Account deleted");
        Ok(())
    }

    /// Donations recorded by the logged-in donor.
    pub async fn my_donations(&self) -> AppResult<Vec<Donation>> {
        self.session.require().await?;
        let request = ApiRequest::get("/api/donations/my_donations/").fallback("Failed to load donations");
        let listed: Listed<Donation> = self.call(request).await?;
        Ok(listed.into_vec())
    }
}

#[async_trait]
impl PageSource<Donor> for DirectoryClient {
    async fn fetch_page(&self, filter: &Filter, page: u32) -> AppResult<Page<Donor>> {
        self.list_donors(filter, page).await
    }
}
