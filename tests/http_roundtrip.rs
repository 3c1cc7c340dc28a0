//! Round trips through the real HTTP transport against a local mock server.

use std::time::Duration;

use serde_json::json;
use textbelt::{
    ApiKey, BulkRequest, BulkSendError, E164Phone, MessageStatus, MessageText, OtpCode, SendText,
    TextId, TextbeltClient, TextbeltError, UserId, VerifyOtp,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TextbeltClient {
    TextbeltClient::builder(ApiKey::new("test_key").unwrap())
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .user_agent("textbelt-tests")
        .build()
        .expect("Failed to build client")
}

fn hello(phone: &str) -> SendText {
    SendText::new(
        E164Phone::new(phone).unwrap(),
        MessageText::new("hello there").unwrap(),
    )
}

#[tokio::test]
async fn send_text_posts_form_encoded_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text"))
        .and(body_string_contains("phone=%2B12025550108"))
        .and(body_string_contains("message=hello+there"))
        .and(body_string_contains("key=test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "quotaRemaining": 40,
            "textId": "9876"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .send_text(&hello("+12025550108"))
        .await
        .expect("send failed");

    assert!(response.success);
    assert_eq!(response.quota_remaining, 40);
    assert_eq!(response.text_id.unwrap().as_str(), "9876");
}

#[tokio::test]
async fn rate_limited_response_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "success": false,
            "error": "Rate limit exceeded",
            "retryAfter": 60
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_text(&hello("+12025550108"))
        .await
        .unwrap_err();

    match err {
        TextbeltError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(60)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn check_status_and_quota_use_path_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status/9876"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SENT"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/quota/test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "quotaRemaining": 12
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client
        .check_status(&TextId::new("9876").unwrap())
        .await
        .unwrap();
    assert_eq!(status.status, MessageStatus::Sent);

    let quota = client.check_quota().await.unwrap();
    assert_eq!(quota.quota_remaining, 12);
}

#[tokio::test]
async fn verify_otp_sends_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/otp/verify"))
        .and(query_param("otp", "123456"))
        .and(query_param("userid", "user123"))
        .and(query_param("key", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "isValidOtp": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .verify_otp(&VerifyOtp::new(
            OtpCode::new("123456").unwrap(),
            UserId::new("user123").unwrap(),
        ))
        .await
        .unwrap();
    assert!(response.is_valid_otp);
}

#[tokio::test]
async fn bulk_send_records_per_recipient_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text"))
        .and(body_string_contains("phone=%2B12025550108"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "quotaRemaining": 99,
            "textId": "1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/text"))
        .and(body_string_contains("phone=%2B12025550109"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "quotaRemaining": 99,
            "error": "Invalid number"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = client_for(&server)
        .send_bulk(
            &BulkRequest::shared(["+12025550108", "+12025550109"], "Test bulk message")
                .delay(BulkRequest::MIN_DELAY),
        )
        .await
        .unwrap();

    assert_eq!(report.total_messages(), 2);
    assert_eq!(report.successful_messages(), 1);
    assert_eq!(report.failed_messages(), 1);
    assert!(report.partial_success());
    let phone = E164Phone::new("+12025550109").unwrap();
    assert_eq!(report.error_for(&phone), Some("Invalid number"));
}

#[tokio::test]
async fn bulk_send_stops_after_first_batch_when_out_of_quota() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "quotaRemaining": 0,
            "error": "Out of quota"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let phones = ["+12025550101", "+12025550102", "+12025550103", "+12025550104"];
    let err = client_for(&server)
        .send_bulk(
            &BulkRequest::shared(phones, "hi")
                .batch_size(2)
                .delay(BulkRequest::MIN_DELAY),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BulkSendError::QuotaExceeded { .. }));
    assert_eq!(err.partial().map(|report| report.skipped_messages()), Some(2));
}

#[tokio::test]
async fn slow_server_hits_client_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "quotaRemaining": 1}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = TextbeltClient::builder(ApiKey::new("test_key").unwrap())
        .base_url(server.uri())
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = client.send_text(&hello("+12025550108")).await.unwrap_err();
    assert!(matches!(err, TextbeltError::Transport(_)));
}
