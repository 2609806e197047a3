//! reqwest-backed [`IncidentApi`] talking to the incident.io v2 REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use incli_core::models::{CatalogEntry, CatalogType, Incident, Page};
use incli_core::settings::ApiConfig;
use incli_core::{IncliError, Result};

use crate::api::IncidentApi;

// ── Wire shapes ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct PaginationMeta {
    #[serde(default)]
    after: Option<String>,
}

#[derive(Deserialize)]
struct ListCatalogTypes {
    catalog_types: Vec<CatalogType>,
}

#[derive(Deserialize)]
struct ListCatalogEntries {
    catalog_entries: Vec<CatalogEntry>,
    #[serde(default)]
    pagination_meta: PaginationMeta,
}

#[derive(Deserialize)]
struct ShowCatalogEntry {
    catalog_entry: CatalogEntry,
}

#[derive(Deserialize)]
struct ListIncidents {
    incidents: Vec<Incident>,
    #[serde(default)]
    pagination_meta: PaginationMeta,
}

#[derive(Deserialize)]
struct ShowIncident {
    incident: Incident,
}

/// Upper bound on one request, connect to last body byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── HttpClient ────────────────────────────────────────────────────────────────

/// API client holding one pooled HTTP connection set.
///
/// Built once per invocation and passed by reference to each command.
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    page_size: u32,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| IncliError::Config("API key contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("incli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IncliError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| IncliError::Config(format!("invalid base URL {:?}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(IncliError::Config(format!(
                "base URL {:?} cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            page_size: config.page_size,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL extended by `segments`, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET `url` and decode a JSON body.
    ///
    /// A 404 becomes [`IncliError::NotFound`] naming `what`; any other
    /// failure, a timeout included, becomes [`IncliError::Remote`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        tracing::debug!(%url, ?query, "GET");

        let response = self
            .http
            .get(url.clone())
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(remote_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(IncliError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "request failed");
            return Err(IncliError::Remote {
                status: Some(status.as_u16()),
                message: format!("{} returned {}: {}", url.path(), status, body.trim()),
            });
        }

        response.json::<T>().await.map_err(remote_error)
    }

    fn page_query(&self, after: Option<String>) -> Vec<(&'static str, String)> {
        let mut query = vec![("page_size", self.page_size.to_string())];
        if let Some(after) = after {
            query.push(("after", after));
        }
        query
    }
}

fn remote_error(err: reqwest::Error) -> IncliError {
    IncliError::Remote {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

#[async_trait]
impl IncidentApi for HttpClient {
    async fn list_catalog_types(&self) -> Result<Vec<CatalogType>> {
        let body: ListCatalogTypes = self
            .get_json(self.endpoint(&["v2", "catalog_types"]), &[], "catalog types")
            .await?;
        Ok(body.catalog_types)
    }

    async fn list_catalog_entries_page(
        &self,
        catalog_type_id: &str,
        after: Option<String>,
    ) -> Result<Page<CatalogEntry>> {
        let mut query = self.page_query(after);
        query.push(("catalog_type_id", catalog_type_id.to_string()));
        let body: ListCatalogEntries = self
            .get_json(
                self.endpoint(&["v2", "catalog_entries"]),
                &query,
                &format!("catalog type {catalog_type_id}"),
            )
            .await?;
        Ok(Page::new(body.catalog_entries, body.pagination_meta.after))
    }

    async fn get_catalog_entry(&self, id: &str) -> Result<CatalogEntry> {
        let body: ShowCatalogEntry = self
            .get_json(
                self.endpoint(&["v2", "catalog_entries", id]),
                &[],
                &format!("catalog entry {id}"),
            )
            .await?;
        Ok(body.catalog_entry)
    }

    async fn list_incidents_page(&self, after: Option<String>) -> Result<Page<Incident>> {
        let query = self.page_query(after);
        let body: ListIncidents = self
            .get_json(self.endpoint(&["v2", "incidents"]), &query, "incidents")
            .await?;
        Ok(Page::new(body.incidents, body.pagination_meta.after))
    }

    async fn get_incident(&self, id_or_reference: &str) -> Result<Incident> {
        let body: ShowIncident = self
            .get_json(
                self.endpoint(&["v2", "incidents", id_or_reference]),
                &[],
                &format!("incident {id_or_reference}"),
            )
            .await?;
        Ok(body.incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::new(&ApiConfig {
            api_key: "test-key".to_string(),
            base_url: format!("{}/", server.uri()),
            page_size: 2,
        })
        .expect("client")
    }

    fn incident_json(id: &str, reference: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("incident {id}"),
            "reference": reference,
            "permalink": format!("https://app.incident.io/acme/incidents/{id}"),
            "incident_status": {"id": "s", "name": "Investigating"}
        })
    }

    #[tokio::test]
    async fn test_list_incidents_follows_after_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/incidents"))
            .and(query_param("after", "cur-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incidents": [incident_json("3", "INC-3")],
                "pagination_meta": {"page_size": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/incidents"))
            .and(header("authorization", "Bearer test-key"))
            .and(query_param("page_size", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incidents": [incident_json("1", "INC-1"), incident_json("2", "INC-2")],
                "pagination_meta": {"after": "cur-1", "page_size": 2}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let all = Locator::new(&client).incidents().await.unwrap();
        let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_empty_after_means_last_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/incidents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incidents": [incident_json("1", "INC-1")],
                "pagination_meta": {"after": ""}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).list_incidents_page(None).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_get_catalog_entry_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/catalog_entries/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"type": "not_found"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_catalog_entry("missing")
            .await
            .unwrap_err();
        match err {
            IncliError::NotFound(msg) => assert_eq!(msg, "catalog entry missing"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_remote_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/catalog_types"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_catalog_types().await.unwrap_err();
        match err {
            IncliError::Remote { status, message } => {
                assert_eq!(status, Some(503));
                assert!(message.contains("maintenance"));
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_remote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/incidents/27"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_incident("27").await.unwrap_err();
        assert!(matches!(err, IncliError::Remote { .. }));
    }

    #[tokio::test]
    async fn test_catalog_entries_by_type_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/catalog_types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "catalog_types": [
                    {"id": "T1", "name": "PagerDuty Service", "type_name": "PagerdutyService"},
                    {"id": "T2", "name": "Team", "type_name": "Team"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/catalog_entries"))
            .and(query_param("catalog_type_id", "T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "catalog_entries": [
                    {"id": "E1", "name": "Serving Infra Default", "catalog_type_id": "T1"},
                    {"id": "E2", "name": "Payments", "catalog_type_id": "T1"}
                ],
                "pagination_meta": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let scope = incli_core::query::Scope::TypeName("PagerdutyService".to_string());
        let found = Locator::new(&client)
            .catalog_entries_by_name("Serving Infra Default", Some(&scope))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "E1");
    }

    #[tokio::test]
    async fn test_id_is_encoded_as_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/catalog_entries/a%2Fb%3Fc%23d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "catalog_entry": {"id": "a/b?c#d", "name": "odd", "catalog_type_id": "T1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let entry = client_for(&server)
            .get_catalog_entry("a/b?c#d")
            .await
            .unwrap();
        assert_eq!(entry.id, "a/b?c#d");
    }

    #[tokio::test]
    async fn test_base_url_path_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/incidents/27"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incident": incident_json("27", "INC-27")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&ApiConfig {
            api_key: "test-key".to_string(),
            base_url: format!("{}/api/", server.uri()),
            page_size: 2,
        })
        .unwrap();
        let inc = client.get_incident("27").await.unwrap();
        assert_eq!(inc.reference, "INC-27");
    }

    #[tokio::test]
    async fn test_slow_response_times_out_as_remote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/incidents"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"incidents": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).with_timeout(Duration::from_millis(100));
        let err = tokio::time::timeout(
            Duration::from_secs(3),
            client.list_incidents_page(None),
        )
        .await
        .expect("request must give up on its own")
        .unwrap_err();
        assert!(matches!(err, IncliError::Remote { status: None, .. }));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpClient::new(&ApiConfig {
            api_key: "k".to_string(),
            base_url: "not a url".to_string(),
            page_size: 10,
        })
        .err()
        .expect("unparseable base URL must be rejected");
        assert!(matches!(err, IncliError::Config(_)));
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let err = HttpClient::new(&ApiConfig {
            api_key: "bad\nkey".to_string(),
            base_url: "http://localhost".to_string(),
            page_size: 10,
        })
        .err()
        .expect("newline in key must be rejected");
        assert!(matches!(err, IncliError::Config(_)));
    }
}
