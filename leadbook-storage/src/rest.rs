//! PostgREST client for the hosted record store.

use crate::{first_row, Query, RecordStore, StoreResult, Table};
use async_trait::async_trait;
use leadbook_core::StoreError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Where and how to reach the hosted store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoint {
    /// Project URL; `/rest/v1/{table}` is appended per request.
    pub url: String,
    /// Public API key, sent as `apikey`.
    pub api_key: String,
    /// Bearer token. Defaults to the API key when unset.
    pub access_token: Option<String>,
    /// No timeout is applied when unset.
    pub request_timeout: Option<Duration>,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: String,
    details: Option<String>,
    hint: Option<String>,
}

#[derive(Clone)]
pub struct RestRecordStore {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestRecordStore {
    pub fn new(endpoint: &StoreEndpoint) -> StoreResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = endpoint.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(http_error)?;

        let auth_header = build_auth_headers(endpoint)?;
        Ok(Self {
            client,
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn id_filter(id: &str) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        table: Table,
        response: reqwest::Response,
    ) -> StoreResult<T> {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|e| StoreError::Decode {
                table: table.to_string(),
                reason: e.to_string(),
            })
        } else {
            let text = response.text().await.map_err(http_error)?;
            Err(remote_error(status.as_u16(), &text))
        }
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn select(&self, table: Table, query: &Query) -> StoreResult<Vec<Value>> {
        tracing::debug!(table = %table, params = ?query.to_params(), "select");
        let response = self
            .client
            .get(self.table_url(table))
            .headers(self.auth_header.clone())
            .query(&query.to_params())
            .send()
            .await
            .map_err(http_error)?;
        self.parse_response(table, response).await
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        tracing::debug!(table = %table, rows = rows.len(), "insert");
        let response = self
            .client
            .post(self.table_url(table))
            .headers(self.auth_header.clone())
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await
            .map_err(http_error)?;
        self.parse_response(table, response).await
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<Value> {
        tracing::debug!(table = %table, id, "update");
        let response = self
            .client
            .patch(self.table_url(table))
            .headers(self.auth_header.clone())
            .header("Prefer", "return=representation")
            .query(&Self::id_filter(id))
            .json(&patch)
            .send()
            .await
            .map_err(http_error)?;
        let rows: Vec<Value> = self.parse_response(table, response).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        first_row(table, rows)
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        tracing::debug!(table = %table, id, "delete");
        let response = self
            .client
            .delete(self.table_url(table))
            .headers(self.auth_header.clone())
            .query(&Self::id_filter(id))
            .send()
            .await
            .map_err(http_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.map_err(http_error)?;
            Err(remote_error(status.as_u16(), &text))
        }
    }
}

fn http_error(err: reqwest::Error) -> StoreError {
    StoreError::Http {
        reason: err.to_string(),
    }
}

fn remote_error(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => {
            let mut message = err.message;
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                message = format!("{} ({})", message, details);
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_empty()) {
                message = format!("{}; hint: {}", message, hint);
            }
            StoreError::Remote {
                status,
                code: err.code,
                message,
            }
        }
        Err(_) => StoreError::Remote {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

fn build_auth_headers(endpoint: &StoreEndpoint) -> StoreResult<HeaderMap> {
    let invalid = |field: &str, e: reqwest::header::InvalidHeaderValue| StoreError::Http {
        reason: format!("invalid {}: {}", field, e),
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("apikey"),
        HeaderValue::from_str(&endpoint.api_key).map_err(|e| invalid("api key", e))?,
    );
    let token = endpoint
        .access_token
        .as_deref()
        .unwrap_or(&endpoint.api_key);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| invalid("access token", e))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgrest_error_body_maps_to_remote() {
        let body = r#"{"code":"23505","message":"duplicate key value","details":"Key (name)=(Ian) already exists.","hint":null}"#;
        let err = remote_error(409, body);
        match err {
            StoreError::Remote {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("23505"));
                assert!(message.starts_with("duplicate key value"));
                assert!(message.contains("already exists"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn plain_error_body_is_kept_verbatim() {
        let err = remote_error(502, "Bad Gateway");
        assert_eq!(
            err,
            StoreError::Remote {
                status: 502,
                code: None,
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn bearer_defaults_to_api_key() {
        let endpoint = StoreEndpoint {
            url: "https://example.supabase.co/".to_string(),
            api_key: "anon".to_string(),
            access_token: None,
            request_timeout: None,
        };
        let headers = build_auth_headers(&endpoint).unwrap();
        assert_eq!(headers["apikey"], "anon");
        assert_eq!(headers[AUTHORIZATION], "Bearer anon");

        let store = RestRecordStore::new(&endpoint).unwrap();
        assert_eq!(
            store.table_url(Table::LeadNotes),
            "https://example.supabase.co/rest/v1/lead_notes"
        );
    }
}
