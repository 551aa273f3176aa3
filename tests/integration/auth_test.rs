//! Integration tests for login, session persistence, and refresh.

mod helpers;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use bloodbridge_core::ErrorKind;

#[tokio::test]
async fn test_login_persists_session() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/donors/login/"))
        .and(body_json(json!({"contact": "01700000000", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-42",
            "donor": helpers::donor_json(42, "O+"),
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.client.login("01700000000", "secret1").await.unwrap();
    assert_eq!(session.token, "tok-42");
    assert!(app.session_path.exists());

    // A new process picks the session back up.
    let restarted = app.restart();
    let restored = restarted.session().restore().await.unwrap();
    assert_eq!(restored.donor.id.as_str(), "42");
    assert_eq!(restored.token, "tok-42");
}

#[tokio::test]
async fn test_login_rejection_uses_server_detail() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/donors/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid phone or password"})),
        )
        .mount(&app.server)
        .await;

    let err = app.client.login("01700000000", "wrong!").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServerRejection);
    assert_eq!(err.status, Some(401));
    assert_eq!(err.user_message(), "Invalid phone or password");
    assert!(!app.client.session().is_authenticated().await);
    assert!(!app.session_path.exists());
}

#[tokio::test]
async fn test_login_rejection_without_body_falls_back() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/donors/login/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    let err = app.client.login("01700000000", "secret1").await.unwrap_err();
    assert_eq!(err.user_message(), "Login failed");
}

#[tokio::test]
async fn test_refresh_merges_server_record() {
    let app = helpers::TestApp::new().await;
    app.login_as(helpers::donor(7, "A+"), "tok-7").await;

    let mut fresh = helpers::donor_json(7, "A+");
    fresh["donationCount"] = json!(6);
    fresh["location"] = json!("Uttara, Dhaka");
    Mock::given(method("GET"))
        .and(path("/api/donors/7/"))
        .and(header("Authorization", "Token tok-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fresh))
        .expect(1)
        .mount(&app.server)
        .await;

    let donor = app.client.refresh().await.unwrap();
    assert_eq!(donor.donation_count, 6);
    assert_eq!(donor.location, "Uttara, Dhaka");
    assert_eq!(app.client.session().token().await.as_deref(), Some("tok-7"));
}

#[tokio::test]
async fn test_logout_removes_stored_session() {
    let app = helpers::TestApp::new().await;
    app.login_as(helpers::donor(3, "B-"), "tok-3").await;
    assert!(app.session_path.exists());

    app.client.logout().await;
    assert!(!app.session_path.exists());
    assert!(app.restart().session().restore().await.is_none());
}

#[tokio::test]
async fn test_registration_surfaces_first_field_error() {
    let app = helpers::TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/donors/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "contact": ["Donor with this contact already exists."]
        })))
        .mount(&app.server)
        .await;

    let form = bloodbridge_entity::RegistrationForm {
        name: "Karim".into(),
        contact: "01700000000".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        blood_group: Some(bloodbridge_entity::BloodGroup::BNeg),
        location: "Sylhet".into(),
        ..Default::default()
    };
    let err = app.client.register(form).await.unwrap_err();
    assert_eq!(err.user_message(), "Donor with this contact already exists.");
}
