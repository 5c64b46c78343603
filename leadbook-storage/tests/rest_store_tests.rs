//! Wire-level tests for the PostgREST record store.

use leadbook_core::StoreError;
use leadbook_storage::{Query, RecordStore, RestRecordStore, StoreEndpoint, Table};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer) -> StoreEndpoint {
    StoreEndpoint {
        url: server.uri(),
        api_key: "anon-key".to_string(),
        access_token: Some("user-token".to_string()),
        request_timeout: None,
    }
}

#[tokio::test]
async fn select_sends_filters_order_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/leads"))
        .and(query_param("select", "*"))
        .and(query_param("remarks", "eq.Approved"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestRecordStore::new(&endpoint(&server)).unwrap();
    let query = Query::new()
        .eq("remarks", "Approved")
        .order_by("created_at", false);
    let rows = store.select(Table::Leads, &query).await.unwrap();
    assert_eq!(rows, vec![json!({"id": "1"})]);
}

#[tokio::test]
async fn insert_asks_for_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/called_by_users"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!([{"name": "Luisa"}])))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([{"id": "7", "name": "Luisa"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = RestRecordStore::new(&endpoint(&server)).unwrap();
    let rows = store
        .insert(Table::CalledByUsers, vec![json!({"name": "Luisa"})])
        .await
        .unwrap();
    assert_eq!(rows[0]["name"], "Luisa");
}

#[tokio::test]
async fn update_targets_id_and_reports_missing_rows() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/leads"))
        .and(query_param("id", "eq.42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestRecordStore::new(&endpoint(&server)).unwrap();
    let err = store
        .update(Table::Leads, "42", json!({"remarks": "Approved"}))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn error_body_becomes_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/lead_notes"))
        .and(query_param("id", "eq.9"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "permission denied for table lead_notes",
            "details": null,
            "hint": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestRecordStore::new(&endpoint(&server)).unwrap();
    let err = store.delete(Table::LeadNotes, "9").await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Remote {
            status: 403,
            code: Some("42501".to_string()),
            message: "permission denied for table lead_notes".to_string(),
        }
    );
}
