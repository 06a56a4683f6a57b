use super::{HttpUpstreamClient, UpstreamClient, UpstreamError};

use std::net::TcpListener;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Result<HttpUpstreamClient> {
    Ok(HttpUpstreamClient::new(&server.uri(), Duration::from_secs(2))?)
}

#[tokio::test]
async fn test_update_status_puts_status_body_and_acks_on_success() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/transactions/5001"))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5001",
            "account_id": "1001",
            "amount": 25.5,
            "type": "deposit",
            "description": "",
            "status": "completed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server)?.update_status("5001", "completed").await?;

    assert_eq!(ack.status_code, 200);
    let record = ack.record.ok_or_else(|| anyhow::anyhow!("record missing from ack"))?;
    assert_eq!(record.status.as_deref(), Some("completed"));
    assert_eq!(record.amount, Some(25.5));

    Ok(())
}

#[tokio::test]
async fn test_update_status_accepts_any_2xx_without_body() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/transactions/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ack = client_for(&server)?.update_status("7", "completed").await?;

    assert_eq!(ack.status_code, 204);
    assert!(ack.record.is_none());

    Ok(())
}

#[tokio::test]
async fn test_update_status_maps_non_success_to_rejection_with_body() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/transactions/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Transaction not found\n"))
        .mount(&server)
        .await;

    let result = client_for(&server)?.update_status("missing", "completed").await;

    assert_eq!(result, Err(UpstreamError::Rejected { status: 404, body: "Transaction not found".to_string() }));

    Ok(())
}

#[tokio::test]
async fn test_update_status_escapes_transaction_id_as_single_segment() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/transactions/a%2Fb"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)?.update_status("a/b", "completed").await?;

    Ok(())
}

#[tokio::test]
async fn test_slow_upstream_is_reported_as_timeout() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(100);
    let client = HttpUpstreamClient::new(&server.uri(), timeout)?;

    assert_eq!(client.fetch_all().await, Err(UpstreamError::Timeout(timeout)));

    Ok(())
}

#[tokio::test]
async fn test_unreachable_upstream_is_reported_as_transport_error() -> Result<()> {
    let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();

    let client = HttpUpstreamClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(1))?;
    let result = client.update_status("1", "completed").await;

    assert!(matches!(result, Err(UpstreamError::Transport(_)) | Err(UpstreamError::Timeout(_))));

    Ok(())
}

#[tokio::test]
async fn test_fetch_all_reads_loosely_shaped_records() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "account_id": "A1", "amount": 100, "type": "deposit", "status": "completed" },
            { "id": "2" }
        ])))
        .mount(&server)
        .await;

    let transactions = client_for(&server)?.fetch_all().await?;

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].amount, Some(100.0));
    assert_eq!(transactions[1].amount, None);
    assert_eq!(transactions[1].status, None);

    Ok(())
}

#[tokio::test]
async fn test_fetch_all_rejects_non_array_body() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let result = client_for(&server)?.fetch_all().await;

    assert!(matches!(result, Err(UpstreamError::Decode(_))));

    Ok(())
}

#[tokio::test]
async fn test_fetch_all_maps_server_error_to_rejection() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let result = client_for(&server)?.fetch_all().await;

    assert_eq!(result, Err(UpstreamError::Rejected { status: 500, body: "database offline".to_string() }));

    Ok(())
}

#[test]
fn test_client_rejects_invalid_base_url() {
    assert!(matches!(
        HttpUpstreamClient::new("not a url", Duration::from_secs(1)),
        Err(UpstreamError::InvalidUrl(_))
    ));
    assert!(matches!(
        HttpUpstreamClient::new("mailto:ops@example.com", Duration::from_secs(1)),
        Err(UpstreamError::InvalidUrl(_))
    ));
}

#[test]
fn test_transactions_url_keeps_base_path_prefix() -> Result<()> {
    let client = HttpUpstreamClient::new("http://api:8080/v1/", Duration::from_secs(1))?;

    assert_eq!(client.transactions_url(None)?.as_str(), "http://api:8080/v1/transactions");
    assert_eq!(client.transactions_url(Some("42"))?.as_str(), "http://api:8080/v1/transactions/42");

    Ok(())
}

#[tokio::test]
async fn test_fetch_all_accepts_amounts_beyond_decimal_range() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "account_id": "A1", "amount": 1e30, "type": "deposit", "status": "completed" },
            { "id": "2", "account_id": "A2", "amount": -2.5e29 }
        ])))
        .mount(&server)
        .await;

    let transactions = client_for(&server)?.fetch_all().await?;

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].amount, Some(1e30));
    assert_eq!(transactions[1].amount, Some(-2.5e29));

    Ok(())
}
