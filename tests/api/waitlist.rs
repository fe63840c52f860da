use crate::helpers::{spawn_app, TestApp};
use helthy_site::crm::EnrollmentMode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_token_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mock_list_subscribe(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/v1.1/json/listsubscribe"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn valid_submission_is_enrolled_and_acknowledged() {
    // Arrange
    let app = spawn_app().await;
    mock_token_success(&app.crm_server).await;
    mock_list_subscribe(
        &app.crm_server,
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "code": "0",
            "listname": "Helthy Waitlist",
        })),
    )
    .await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json!(true), body["success"]);
    assert_eq!(json!("Successfully added to waitlist!"), body["message"]);
}

#[tokio::test]
async fn the_first_name_is_forwarded_to_the_platform() {
    // Arrange
    let app = spawn_app().await;
    mock_token_success(&app.crm_server).await;
    mock_list_subscribe(
        &app.crm_server,
        ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "code": 0 })),
    )
    .await;

    // Act
    let response = app
        .post_waitlist(json!({ "email": "user@example.com", "firstName": "Ada" }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let requests = app.crm_server.received_requests().await.unwrap();
    let enrollment = requests
        .iter()
        .find(|request| request.url.path() == "/api/v1.1/json/listsubscribe")
        .expect("No enrollment call was made");
    let query = enrollment.url.query().unwrap_or_default();
    assert!(query.contains("listkey=test-list-key"));
    assert!(query.contains("Ada"));
}

#[tokio::test]
async fn malformed_emails_are_rejected_before_any_outbound_call() {
    // Arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("not-an-email", "no @ at all"),
        ("user@example", "no dot in the domain"),
        ("user name@example.com", "whitespace in the local part"),
        ("@example.com", "empty local part"),
        ("user@host@example.com", "two @ symbols"),
        ("user@.com", "dot leads the domain"),
        ("user@example.", "dot ends the domain"),
    ];

    for (email, reason) in test_cases {
        // Act
        let response = app.post_waitlist(json!({ "email": email })).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not reject the address with {}",
            reason
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json!("Valid email address is required"), body["error"]);
    }
    assert_eq!(0, app.outbound_call_count().await);
}

#[tokio::test]
async fn bodies_without_a_string_email_are_rejected() {
    // Arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({}), "missing email field"),
        (json!({ "email": 42 }), "email is a number"),
        (json!({ "email": null }), "email is null"),
        (json!({ "firstName": "Ada" }), "only a first name"),
    ];

    for (body, reason) in test_cases {
        // Act
        let response = app.post_waitlist(body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not reject the payload with {}",
            reason
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json!("Valid email address is required"), body["error"]);
    }
    assert_eq!(0, app.outbound_call_count().await);
}

#[tokio::test]
async fn missing_credentials_fail_fast_without_touching_the_platform() {
    // Arrange
    let app = TestApp::builder().without_crm_credentials().build().await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json!("Server configuration error"), body["error"]);
    assert_eq!(0, app.outbound_call_count().await);
}

#[tokio::test]
async fn a_rejected_token_exchange_stops_before_enrollment() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.crm_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1.1/json/listsubscribe"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    // The upstream detail must not leak to the caller
    assert_eq!(
        json!("Failed to join waitlist. Please try again later."),
        body["error"]
    );
}

#[tokio::test]
async fn an_unparseable_token_payload_is_a_hard_failure() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn a_200_enrollment_response_with_a_failure_payload_is_an_error() {
    // Arrange
    let app = spawn_app().await;
    mock_token_success(&app.crm_server).await;
    mock_list_subscribe(
        &app.crm_server,
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "2004",
            "message": "Contact already exists",
        })),
    )
    .await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        json!("Failed to join waitlist. Please try again later."),
        body["error"]
    );
}

#[tokio::test]
async fn an_enrollment_transport_error_is_an_error() {
    // Arrange
    let app = spawn_app().await;
    mock_token_success(&app.crm_server).await;
    mock_list_subscribe(
        &app.crm_server,
        ResponseTemplate::new(500).set_body_json(json!({ "message": "internal error" })),
    )
    .await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn lead_creation_mode_reaches_the_crm_surface() {
    // Arrange
    let app = TestApp::builder()
        .enrollment(EnrollmentMode::LeadCreate)
        .build()
        .await;
    mock_token_success(&app.crm_server).await;
    Mock::given(method("POST"))
        .and(path("/crm/v2/Leads"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": [{ "code": "SUCCESS", "status": "success" }]
        })))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json!(true), body["success"]);
}

#[tokio::test]
async fn lead_creation_mode_detects_a_failure_record() {
    // Arrange
    let app = TestApp::builder()
        .enrollment(EnrollmentMode::LeadCreate)
        .build()
        .await;
    mock_token_success(&app.crm_server).await;
    Mock::given(method("POST"))
        .and(path("/crm/v2/Leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "code": "DUPLICATE_DATA", "status": "error" }]
        })))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app.post_waitlist(json!({ "email": "user@example.com" })).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
}
