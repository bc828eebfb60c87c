mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn login_rejects_unknown_user() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .form(&[("username", "nobody@example.com"), ("password", "wrong-password")])
        .send()
        .await?;

    // BAD_REQUEST with a database, SERVICE_UNAVAILABLE or INTERNAL_SERVER_ERROR without one
    assert!(
        res.status() == StatusCode::BAD_REQUEST
            || res.status() == StatusCode::SERVICE_UNAVAILABLE
            || res.status() == StatusCode::INTERNAL_SERVER_ERROR,
        "unexpected status: {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true, "Should be an error envelope: {}", body);
    assert!(body.get("message").is_some(), "Response should have 'message' field: {}", body);

    Ok(())
}

#[tokio::test]
async fn login_requires_form_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .form(&[("username", "admin@example.com")])
        .send()
        .await?;

    assert!(res.status().is_client_error(), "Expected client error, got {}", res.status());
    Ok(())
}
