//! Integration tests for paginated lists and debounced search over HTTP.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use bloodbridge_client::directory::{Filter, LoadOutcome, PagedFetcher, SkipReason};
use bloodbridge_client::{SearchController, SearchEvent};
use bloodbridge_core::ErrorKind;
use bloodbridge_entity::{BloodGroup, BloodRequest, Donor};

fn donors(range: std::ops::Range<u32>) -> Vec<serde_json::Value> {
    range.map(|i| helpers::donor_json(i, "O+")).collect()
}

#[tokio::test]
async fn test_two_pages_of_donors() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/donors/"))
        .and(query_param("page", "1"))
        .and(query_param("bloodGroup", "O+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(helpers::page(donors(1..11), true)))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/donors/"))
        .and(query_param("page", "2"))
        .and(query_param("bloodGroup", "O+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(helpers::page(donors(11..21), false)))
        .expect(1)
        .mount(&app.server)
        .await;

    let fetcher = PagedFetcher::<Donor>::new(Arc::new(app.client.clone()));
    let filter = Filter::donors().with_blood_group(Some(BloodGroup::OPos));

    fetcher.reset(filter).await.unwrap();
    assert_eq!(fetcher.len(), 10);
    assert!(!fetcher.is_exhausted());

    fetcher.load_more().await.unwrap();
    assert_eq!(fetcher.len(), 20);
    assert!(fetcher.is_exhausted());

    // Exhausted: no third request reaches the server.
    assert_eq!(
        fetcher.load_more().await.unwrap(),
        LoadOutcome::Skipped(SkipReason::Exhausted)
    );
}

#[tokio::test]
async fn test_request_filter_reaches_server() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/requests/"))
        .and(query_param("page", "1"))
        .and(query_param("status", "Active"))
        .and(query_param("bloodGroup", "AB-"))
        .and(query_param("location", "Mirpur, Dhaka"))
        .and(query_param("urgency", "Critical"))
        .respond_with(ResponseTemplate::new(200).set_body_json(helpers::page(
            vec![
                helpers::request_json(1, "AB-", 2),
                // Fully served requests are never shown.
                helpers::request_json(2, "AB-", 0),
            ],
            false,
        )))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut filter = Filter::requests();
    filter.set_blood_group_label("AB-").unwrap();
    filter.set_urgency_label("critical").unwrap();
    filter.set_location(" Mirpur, Dhaka ");

    let fetcher = PagedFetcher::<BloodRequest>::new(Arc::new(app.client.clone()));
    fetcher.reset(filter).await.unwrap();

    let items = fetcher.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_str(), "1");
    assert!(fetcher.is_exhausted());
}

#[tokio::test]
async fn test_failed_page_keeps_list() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/donors/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(helpers::page(donors(1..4), true)))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/donors/"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": "Service temporarily unavailable"})),
        )
        .mount(&app.server)
        .await;

    let fetcher = PagedFetcher::<Donor>::new(Arc::new(app.client.clone()));
    fetcher.reset(Filter::donors()).await.unwrap();

    let err = fetcher.load_more().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServerRejection);
    assert_eq!(err.user_message(), "Service temporarily unavailable");
    assert_eq!(fetcher.len(), 3);
    assert_eq!(fetcher.current_page(), 1);
    assert!(!fetcher.is_exhausted());
}

#[tokio::test]
async fn test_garbled_body_is_serialization_error() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/requests/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&app.server)
        .await;

    let fetcher = PagedFetcher::<BloodRequest>::new(Arc::new(app.client.clone()));
    let err = fetcher.reset(Filter::requests()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Serialization);
    assert!(fetcher.is_empty());
}

#[tokio::test]
async fn test_debounced_edits_send_one_request() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/donors/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(helpers::page(donors(1..3), false)))
        .mount(&app.server)
        .await;

    let fetcher = Arc::new(PagedFetcher::<Donor>::new(Arc::new(app.client.clone())));
    let (search, mut events) =
        SearchController::new(fetcher.clone(), Filter::donors(), Duration::from_millis(100));

    search.update(|f| f.set_location("D"));
    search.update(|f| f.set_location("Dh"));
    search.update(|f| f.set_location("Dhaka"));

    match tokio::time::timeout(Duration::from_secs(5), events.recv()).await {
        Ok(Some(SearchEvent::Loaded { filter, .. })) => assert_eq!(filter.location(), "Dhaka"),
        other => panic!("unexpected: {other:?}"),
    }

    let received = app.server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("page=1&location=Dhaka"));
    assert_eq!(fetcher.len(), 2);

    search.dispose();
}
