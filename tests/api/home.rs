use crate::helpers::spawn_app;

#[tokio::test]
async fn home_page_serves_the_waitlist_form() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = reqwest::Client::new()
        .get(&app.addr)
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert!(response.status().is_success());
    let content_type = response
        .headers()
        .get("Content-Type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/html"));

    let body = response.text().await.expect("Failed to read the body");
    assert!(body.contains(r#"<form id="waitlist""#));
    assert!(body.contains("/api/waitlist"));
}
