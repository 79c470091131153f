use httpmock::prelude::*;
use invoice_service::{AirtableClient, AirtableConfig, RecordFetcher, ServiceError, Table};
use serde_json::json;

fn client_for(server: &MockServer) -> AirtableClient {
    let config = AirtableConfig {
        api_key: "test-key".to_string(),
        space_id: "app1".to_string(),
        api_base_url: server.url("/v0"),
        request_timeout_secs: Some(5),
    };
    AirtableClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_sends_bearer_token() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v0/app1/Invoice/rec1")
            .header("Authorization", "Bearer test-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "id": "rec1",
                "createdTime": "2019-05-01T10:00:00.000Z",
                "fields": {"Total Amount": 42}
            }));
    });

    let record = client_for(&server).fetch_invoice("rec1").await.unwrap();

    api_mock.assert();
    assert_eq!(record.id(), Some("rec1"));
    assert_eq!(record.fields.get("Total Amount"), Some(&json!(42)));
    assert_eq!(
        record.meta.get("createdTime"),
        Some(&json!("2019-05-01T10:00:00.000Z"))
    );
}

#[tokio::test]
async fn test_each_record_kind_uses_its_table() {
    let server = MockServer::start();
    let client_mock = server.mock(|when, then| {
        when.method(GET).path("/v0/app1/Clients/c1");
        then.status(200).json_body(json!({"fields": {"Name": "Acme"}}));
    });
    let item_mock = server.mock(|when, then| {
        when.method(GET).path_contains("Item/it1");
        then.status(200).json_body(json!({"fields": {"Amount": 5}}));
    });

    let client = client_for(&server);
    let acme = client.fetch_client("c1").await.unwrap();
    let item = client.fetch_invoice_item("it1").await.unwrap();

    client_mock.assert();
    item_mock.assert();
    assert_eq!(acme.fields.get("Name"), Some(&json!("Acme")));
    assert_eq!(item.fields.get("Amount"), Some(&json!(5)));
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v0/app1/Invoice/nope");
        then.status(404)
            .json_body(json!({"error": "NOT_FOUND"}));
    });

    let err = client_for(&server).fetch_invoice("nope").await.unwrap_err();

    api_mock.assert();
    match err {
        ServiceError::RecordNotFound { table, id } => {
            assert_eq!(table, Table::Invoice);
            assert_eq!(id, "nope");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_upstream_status() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v0/app1/Invoice/rec1");
        then.status(401).body("AUTHENTICATION_REQUIRED");
    });

    let err = client_for(&server).fetch_invoice("rec1").await.unwrap_err();

    api_mock.assert();
    match err {
        ServiceError::UpstreamStatusError { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "AUTHENTICATION_REQUIRED");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v0/app1/Invoice/rec1");
        then.status(200).body("<html>maintenance</html>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/v0/app1/Invoice/rec2");
        then.status(200).json_body(json!({"id": "rec2"}));
    });

    let client = client_for(&server);
    for id in ["rec1", "rec2"] {
        let err = client.fetch_invoice(id).await.unwrap_err();
        assert!(matches!(err, ServiceError::MalformedRecordError { .. }));
    }
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error() {
    let config = AirtableConfig {
        api_key: "test-key".to_string(),
        space_id: "app1".to_string(),
        api_base_url: "http://127.0.0.1:1/v0".to_string(),
        request_timeout_secs: Some(2),
    };
    let client = AirtableClient::new(&config).unwrap();

    let err = client.fetch_invoice("rec1").await.unwrap_err();
    assert!(matches!(err, ServiceError::TransportError(_)));
}
