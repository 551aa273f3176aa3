//! The donation state machine.

use std::sync::Arc;

use tracing::{debug, info, warn};

use bloodbridge_core::AppError;
use bloodbridge_core::result::AppResult;
use bloodbridge_entity::BloodRequest;

use super::state::{DonationOutcome, DonationState, units_label};
use crate::api::DirectoryClient;
use crate::directory::PagedFetcher;
use crate::session::LOGIN_REQUIRED_MESSAGE;

/// Walks one donor through donating to one request at a time.
///
/// The donor's `donationCount` and `lastDonated` are only ever taken from
/// the server's answer; nothing is incremented locally, and a failed
/// submission leaves the session and the list exactly as they were.
#[derive(Debug)]
pub struct DonationFlow {
    client: DirectoryClient,
    list: Option<Arc<PagedFetcher<BloodRequest>>>,
    state: DonationState,
}

impl DonationFlow {
    pub fn new(client: DirectoryClient) -> Self {
        Self {
            client,
            list: None,
            state: DonationState::Idle,
        }
    }

    /// Drop settled requests from `list`.
    pub fn with_list(mut self, list: Arc<PagedFetcher<BloodRequest>>) -> Self {
        self.list = Some(list);
        self
    }

    pub fn state(&self) -> &DonationState {
        &self.state
    }

    /// Start donating to `request`.
    pub async fn select(&mut self, request: BloodRequest) -> AppResult<DonationOutcome> {
        self.state = DonationState::Idle;
        if !self.client.session().is_authenticated().await {
            return Ok(DonationOutcome::LoginRequired {
                message: LOGIN_REQUIRED_MESSAGE.to_string(),
            });
        }
        if !request.is_active() {
            return Err(AppError::validation(
                "This request is no longer accepting donations.",
            ));
        }

        let max_units = request.units_needed;
        debug!(request_id = %request.id, max_units, "Donation started");
        self.state = DonationState::UnitsPrompt { request };
        Ok(DonationOutcome::UnitsPrompt { max_units })
    }

    /// Validate the units typed by the donor. On failure the prompt stays open.
    pub fn enter_units(&mut self, input: &str) -> AppResult<DonationOutcome> {
        let DonationState::UnitsPrompt { request } = &self.state else {
            return Err(AppError::internal("No donation is waiting for units"));
        };
        let units = parse_units(input, request.units_needed)?;

        self.state = DonationState::Confirming {
            request: request.clone(),
            units,
        };
        Ok(DonationOutcome::Confirm {
            units,
            prompt: format!(
                "Are you sure you want to donate {} of blood?",
                units_label(units)
            ),
        })
    }

    /// Answer the confirmation. `false` abandons the donation; `true`
    /// submits it and, on success, reconciles the session and the list.
    pub async fn confirm(&mut self, accept: bool) -> AppResult<DonationOutcome> {
        let (request, units) = match &self.state {
            DonationState::Confirming { request, units } => (request.clone(), *units),
            _ => return Err(AppError::internal("No donation is waiting for confirmation")),
        };
        if !accept {
            debug!(request_id = %request.id, "Donation declined");
            self.state = DonationState::Idle;
            return Ok(DonationOutcome::Declined);
        }

        if let Err(e) = self.client.session().require().await {
            self.state = DonationState::Idle;
            return Err(e);
        }

        self.state = DonationState::Submitting {
            request_id: request.id.clone(),
            units,
        };
        let receipt = match self.client.donate(&request.id, units).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(request_id = %request.id, units, error = %e, "Donation failed");
                self.state = DonationState::Idle;
                return Err(e);
            }
        };

        // Without a reported count the donor is re-read instead.
        let donor = match receipt.donor.as_ref().filter(|stats| stats.has_count()) {
            Some(stats) => self.client.session().apply_stats(stats).await,
            None => self.client.refresh().await,
        };
        if let Some(list) = &self.list {
            list.remove(request.id.as_str());
        }

        let message = receipt.acknowledgment().to_string();
        info!(
            request_id = %request.id,
            units,
            donation_count = donor.as_ref().map(|d| d.donation_count),
            "Donation settled"
        );
        self.state = DonationState::Settled {
            request_id: request.id,
            units,
            message: message.clone(),
        };
        Ok(DonationOutcome::Settled { message, donor })
    }

    /// Abandon whatever step is open.
    pub fn cancel(&mut self) {
        self.state = DonationState::Idle;
    }
}

fn parse_units(input: &str, max_units: u32) -> AppResult<u32> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Please enter a valid number of units."))?;
    if value <= 0 {
        return Err(AppError::validation("Units must be greater than 0."));
    }
    if value > i64::from(max_units) {
        let verb = if max_units == 1 { "is" } else { "are" };
        return Err(AppError::validation(format!(
            "Cannot donate more than {max}. Only {max} {verb} needed.",
            max = units_label(max_units),
        )));
    }
    u32::try_from(value).map_err(|_| AppError::validation("Please enter a valid number of units."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    use bloodbridge_core::ErrorKind;

    use crate::directory::Filter;
    use crate::gateway::Method;
    use crate::testing::{ScriptedGateway, ScriptedSource, client_with, page_of, request};

    const DONATE_PATH: &str = "/api/requests/1/donated/";

    async fn list_with(req: BloodRequest) -> Arc<PagedFetcher<BloodRequest>> {
        let source = ScriptedSource::new(move |_filter, _page| Ok(page_of(vec![req.clone()], false)));
        let list = Arc::new(PagedFetcher::<BloodRequest>::new(source));
        list.reset(Filter::requests()).await.unwrap();
        list
    }

    async fn confirming(gateway: Arc<ScriptedGateway>, units: &str) -> (DonationFlow, Arc<PagedFetcher<BloodRequest>>) {
        let client = client_with(gateway, Some("tok")).await;
        let list = list_with(request(1, "O+", 3)).await;
        let mut flow = DonationFlow::new(client).with_list(list.clone());
        flow.select(request(1, "O+", 3)).await.unwrap();
        flow.enter_units(units).unwrap();
        (flow, list)
    }

    #[test]
    fn test_unit_bounds() {
        for bad in ["0", "-1", "abc", "4", "", "2.5"] {
            let err = parse_units(bad, 3).unwrap_err();
            assert!(err.is_validation(), "{bad} should be rejected");
        }
        for good in ["1", "2", " 3 "] {
            assert!(parse_units(good, 3).is_ok(), "{good} should be accepted");
        }
    }

    #[test]
    fn test_unit_messages() {
        assert_eq!(
            parse_units("abc", 3).unwrap_err().message,
            "Please enter a valid number of units."
        );
        assert_eq!(
            parse_units("-1", 3).unwrap_err().message,
            "Units must be greater than 0."
        );
        assert_eq!(
            parse_units("4", 3).unwrap_err().message,
            "Cannot donate more than 3 units. Only 3 units are needed."
        );
        assert_eq!(
            parse_units("2", 1).unwrap_err().message,
            "Cannot donate more than 1 unit. Only 1 unit is needed."
        );
    }

    #[tokio::test]
    async fn test_guest_is_sent_to_login() {
        let gateway = ScriptedGateway::new();
        let client = client_with(gateway.clone(), None).await;
        let mut flow = DonationFlow::new(client);

        let outcome = flow.select(request(1, "A+", 2)).await.unwrap();
        assert!(matches!(outcome, DonationOutcome::LoginRequired { .. }));
        assert!(flow.state().is_idle());
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_bad_units_keep_prompt_open() {
        let gateway = ScriptedGateway::new();
        let client = client_with(gateway, Some("tok")).await;
        let mut flow = DonationFlow::new(client);

        let outcome = flow.select(request(1, "A+", 2)).await.unwrap();
        assert_eq!(outcome, DonationOutcome::UnitsPrompt { max_units: 2 });
        assert!(flow.enter_units("3").is_err());
        assert_eq!(flow.state().name(), "units_prompt");

        let outcome = flow.enter_units("2").unwrap();
        assert_eq!(
            outcome,
            DonationOutcome::Confirm {
                units: 2,
                prompt: "Are you sure you want to donate 2 units of blood?".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_decline_sends_nothing() {
        let gateway = ScriptedGateway::new();
        let (mut flow, list) = confirming(gateway.clone(), "1").await;

        assert_eq!(flow.confirm(false).await.unwrap(), DonationOutcome::Declined);
        assert!(flow.state().is_idle());
        assert!(gateway.requests().is_empty());
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_changes_nothing() {
        let gateway = ScriptedGateway::new();
        gateway.respond(
            Method::Post,
            DONATE_PATH,
            Err(AppError::server_rejection(400, "Request already fulfilled")),
        );
        let (mut flow, list) = confirming(gateway.clone(), "2").await;
        let before = flow.client.session().donor().await.unwrap();

        let err = flow.confirm(true).await.unwrap_err();
        assert_eq!(err.message, "Request already fulfilled");
        assert!(flow.state().is_idle());
        assert_eq!(list.len(), 1);

        let after = flow.client.session().donor().await.unwrap();
        assert_eq!(after.donation_count, before.donation_count);
        assert_eq!(after.last_donated, before.last_donated);
    }

    #[tokio::test]
    async fn test_settle_takes_server_counts() {
        let gateway = ScriptedGateway::new();
        gateway.respond(
            Method::Post,
            DONATE_PATH,
            Ok(json!({
                "message": "Thank you, hero!",
                "donor": {"donationCount": 5, "lastDonated": "2024-05-01"}
            })),
        );
        let (mut flow, list) = confirming(gateway.clone(), "2").await;

        let outcome = flow.confirm(true).await.unwrap();
        let DonationOutcome::Settled { message, donor } = outcome else {
            panic!("expected settle, got {outcome:?}");
        };
        assert_eq!(message, "Thank you, hero!");
        let donor = donor.unwrap();
        assert_eq!(donor.donation_count, 5);
        assert_eq!(donor.last_donated, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(list.is_empty());
        assert_eq!(flow.state().name(), "settled");

        let sent = &gateway.requests()[0];
        assert_eq!(sent.body.clone().unwrap(), json!({"unitsDonated": 2}));
        assert_eq!(sent.token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_settle_without_counts_refreshes_donor() {
        let gateway = ScriptedGateway::new();
        gateway.respond(Method::Post, DONATE_PATH, Ok(json!({})));
        gateway.respond(
            Method::Get,
            "/api/donors/1/",
            Ok(json!({"id": 1, "name": "Donor 1", "bloodGroup": "O+", "donationCount": 8})),
        );
        let (mut flow, _list) = confirming(gateway.clone(), "1").await;

        let DonationOutcome::Settled { message, donor } = flow.confirm(true).await.unwrap() else {
            panic!("expected settle");
        };
        assert_eq!(message, "Thank you for your donation!");
        assert_eq!(donor.unwrap().donation_count, 8);
    }

    #[tokio::test]
    async fn test_partial_donor_stats_never_lower_the_count() {
        let gateway = ScriptedGateway::new();
        gateway.respond(
            Method::Post,
            DONATE_PATH,
            Ok(json!({"message": "ok", "donor": {"lastDonated": "2024-05-01"}})),
        );
        // The re-read donor is unreachable, so the cached record must survive.
        gateway.respond(Method::Get, "/api/donors/1/", Err(AppError::network("down")));
        let (mut flow, list) = confirming(gateway.clone(), "1").await;
        let mut cached = flow.client.session().donor().await.unwrap();
        cached.donation_count = 7;
        flow.client.session().replace_donor(cached).await;

        let DonationOutcome::Settled { donor, .. } = flow.confirm(true).await.unwrap() else {
            panic!("expected settle");
        };
        assert_eq!(donor.unwrap().donation_count, 7);
        let after = flow.client.session().donor().await.unwrap();
        assert_eq!(after.donation_count, 7);
        assert!(list.is_empty());
        assert_eq!(gateway.requests()[1].path, "/api/donors/1/");
    }

    #[tokio::test]
    async fn test_network_failure_changes_nothing() {
        let gateway = ScriptedGateway::new();
        gateway.respond(Method::Post, DONATE_PATH, Err(AppError::network("connection reset")));
        let (mut flow, list) = confirming(gateway.clone(), "3").await;
        let before = flow.client.session().current().await.unwrap();

        let err = flow.confirm(true).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.user_message(), bloodbridge_core::error::NETWORK_ERROR_MESSAGE);
        assert!(flow.state().is_idle());
        assert_eq!(list.len(), 1);
        assert_eq!(flow.client.session().current().await.unwrap(), before);
        assert_eq!(gateway.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_order_steps_are_rejected() {
        let gateway = ScriptedGateway::new();
        let client = client_with(gateway, Some("tok")).await;
        let mut flow = DonationFlow::new(client);

        assert_eq!(flow.enter_units("1").unwrap_err().kind, ErrorKind::Internal);
        assert_eq!(flow.confirm(true).await.unwrap_err().kind, ErrorKind::Internal);
    }
}
