//! Integration tests for the donation flow against a mock backend.

mod helpers;

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use bloodbridge_client::directory::{Filter, PagedFetcher};
use bloodbridge_client::{DonationFlow, DonationOutcome};
use bloodbridge_entity::BloodRequest;

async fn active_list(app: &helpers::TestApp) -> Arc<PagedFetcher<BloodRequest>> {
    Mock::given(method("GET"))
        .and(path("/api/requests/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(helpers::page(
            vec![
                helpers::request_json(7, "O+", 3),
                helpers::request_json(8, "O+", 1),
            ],
            false,
        )))
        .mount(&app.server)
        .await;

    let list = Arc::new(PagedFetcher::<BloodRequest>::new(Arc::new(app.client.clone())));
    list.reset(Filter::requests()).await.unwrap();
    list
}

#[tokio::test]
async fn test_settled_donation_reconciles_with_server() {
    let app = helpers::TestApp::new().await;
    app.login_as(helpers::donor(1, "O+"), "tok-1").await;
    let list = active_list(&app).await;

    Mock::given(method("POST"))
        .and(path("/api/requests/7/donated/"))
        .and(header("Authorization", "Token tok-1"))
        .and(body_json(json!({"unitsDonated": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Thank you for donating 2 units!",
            "donor": {"donationCount": 9, "lastDonated": "2024-05-21"},
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut flow = DonationFlow::new(app.client.clone()).with_list(list.clone());
    flow.select(helpers::request(7, "O+", 3)).await.unwrap();
    flow.enter_units("2").unwrap();
    let outcome = flow.confirm(true).await.unwrap();

    let DonationOutcome::Settled { message, donor } = outcome else {
        panic!("expected a settled donation, got {outcome:?}");
    };
    assert_eq!(message, "Thank you for donating 2 units!");
    // The server's count wins; the cached 2 is not incremented locally.
    assert_eq!(donor.unwrap().donation_count, 9);

    let ids: Vec<String> = list.items().iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["8".to_string()]);

    let stored = app.restart().session().restore().await.unwrap();
    assert_eq!(stored.donor.donation_count, 9);
    assert_eq!(stored.donor.last_donated, NaiveDate::from_ymd_opt(2024, 5, 21));
}

#[tokio::test]
async fn test_rejected_donation_changes_nothing() {
    let app = helpers::TestApp::new().await;
    app.login_as(helpers::donor(1, "O+"), "tok-1").await;
    let list = active_list(&app).await;

    Mock::given(method("POST"))
        .and(path("/api/requests/7/donated/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "This request has already been fulfilled"})),
        )
        .mount(&app.server)
        .await;

    let mut flow = DonationFlow::new(app.client.clone()).with_list(list.clone());
    flow.select(helpers::request(7, "O+", 3)).await.unwrap();
    flow.enter_units("1").unwrap();
    let err = flow.confirm(true).await.unwrap_err();

    assert_eq!(err.user_message(), "This request has already been fulfilled");
    assert!(flow.state().is_idle());
    assert_eq!(list.len(), 2);

    let donor = app.client.session().donor().await.unwrap();
    assert_eq!(donor.donation_count, 2);
    assert_eq!(donor.last_donated, NaiveDate::from_ymd_opt(2024, 1, 10));
}

#[tokio::test]
async fn test_rejection_without_message_uses_fallback() {
    let app = helpers::TestApp::new().await;
    app.login_as(helpers::donor(1, "O+"), "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/api/requests/8/donated/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&app.server)
        .await;

    let mut flow = DonationFlow::new(app.client.clone());
    flow.select(helpers::request(8, "O+", 1)).await.unwrap();
    flow.enter_units("1").unwrap();
    let err = flow.confirm(true).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to respond to request");
}

#[tokio::test]
async fn test_guest_never_reaches_server() {
    let app = helpers::TestApp::new().await;

    let mut flow = DonationFlow::new(app.client.clone());
    let outcome = flow.select(helpers::request(7, "O+", 3)).await.unwrap();
    assert!(matches!(outcome, DonationOutcome::LoginRequired { .. }));
    assert!(app.server.received_requests().await.unwrap().is_empty());
}
