//! Catalog REST API Client
//!
//! HTTP client for the remote catalog service.

use super::types::{AppSummary, FilterState, IssuePreview, Review, SentimentAnalysis};
use super::CatalogService;
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Catalog service REST client
pub struct CatalogClient {
    client: Client,
    config: ClientConfig,
}

/// Configuration for the catalog client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the catalog service (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Per-request timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_API_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl CatalogClient {
    /// Create a new catalog client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, CatalogError> {
        let mut builder = Client::builder().user_agent(concat!("appsight/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn app_url(&self, prefix: &str, app_id: &str, suffix: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.base(),
            prefix,
            urlencoding::encode(app_id),
            suffix
        )
    }

    /// Send a request and reject non-success statuses
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, CatalogError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(request_id = %request_id, method = %method, url, "Catalog request");

        let mut request = self
            .client
            .request(method, url)
            .header("X-Request-Id", &request_id);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(CatalogError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(request_id = %request_id, status = status.as_u16(), "Catalog request rejected");
            Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self.send::<()>(Method::GET, url, query, None).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    let bytes = response.bytes().await.map_err(CatalogError::from_transport)?;
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::Decode(e.to_string()))
}

#[async_trait]
impl CatalogService for CatalogClient {
    async fn list_apps(&self, filters: &FilterState) -> Result<Vec<AppSummary>, CatalogError> {
        let url = format!("{}/api/apps", self.base());
        self.get_json(&url, &filters.query_pairs()).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/api/categories", self.base());
        self.get_json(&url, &[]).await
    }

    async fn app_reviews(&self, app_id: &str, limit: u32) -> Result<Vec<Review>, CatalogError> {
        let url = self.app_url("/api/apps", app_id, "/reviews");
        self.get_json(&url, &[("limit", limit.to_string())]).await
    }

    async fn app_analysis(
        &self,
        app_id: &str,
    ) -> Result<Option<SentimentAnalysis>, CatalogError> {
        let url = self.app_url("/api/apps", app_id, "/analysis");
        self.get_json(&url, &[]).await
    }

    async fn collect_reviews(&self, app_id: &str, limit: u32) -> Result<(), CatalogError> {
        let url = self.app_url("/api/scraping/app", app_id, "/reviews");
        self.send(Method::POST, &url, &[], Some(&LimitRequest { limit }))
            .await?;
        Ok(())
    }

    async fn analyze_app(&self, app_id: &str, limit: u32) -> Result<(), CatalogError> {
        let url = self.app_url("/api/sentiment/analyze-app", app_id, "");
        self.send(Method::POST, &url, &[], Some(&LimitRequest { limit }))
            .await?;
        Ok(())
    }

    async fn simulate_issue(&self, app_id: &str) -> Result<IssuePreview, CatalogError> {
        let url = self.app_url("/api/github/simulate-issue", app_id, "");
        let response = self.send::<()>(Method::POST, &url, &[], None).await?;
        decode(response).await
    }
}

// ============================================
// Request DTOs
// ============================================

#[derive(Debug, Serialize)]
struct LimitRequest {
    limit: u32,
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the catalog service
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog service unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl CatalogError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_connect() {
            CatalogError::Unavailable
        } else if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Request(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Sentiment, Store};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(ClientConfig {
            base_url: format!("{}/", server.uri()),
            request_timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_apps_sends_only_present_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/apps"))
            .and(query_param("store", "google_play"))
            .and(query_param("search", "chat"))
            .and(query_param_is_missing("category"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"app_id": "x1", "name": "Foo", "store": "google_play", "category": "Social",
                 "rating": 4.5, "total_reviews": 120}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let filters = FilterState::new(Some(Store::GooglePlay), None, Some("chat".into()));
        let apps = client_for(&server).list_apps(&filters).await.unwrap();

        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Foo");
        assert_eq!(apps[0].store, Store::GooglePlay);
    }

    #[tokio::test]
    async fn test_reviews_use_limit_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/apps/com.example.app/reviews"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "user_name": "ana", "rating": 5, "content": "love it",
                 "date": "2024-03-01T10:00:00Z", "sentiment": "positive", "sentiment_score": 0.97},
                {"id": 2, "rating": 2, "content": "meh"}
            ])))
            .mount(&server)
            .await;

        let reviews = client_for(&server)
            .app_reviews("com.example.app", 20)
            .await
            .unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].sentiment, Some(Sentiment::Positive));
        assert_eq!(reviews[1].sentiment, None);
    }

    #[tokio::test]
    async fn test_analysis_values_and_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/apps/x1/analysis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "positive_percentage": 70, "negative_percentage": 20, "neutral_percentage": 10,
                "total_reviews": 50, "avg_sentiment_score": 0.81,
                "last_updated": "2024-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/apps/x2/analysis"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let analysis = client.app_analysis("x1").await.unwrap().unwrap();
        assert_eq!(analysis.positive_percentage, 70.0);
        assert_eq!(analysis.total_reviews, 50);
        assert_eq!(analysis.avg_sentiment_score, 0.81);

        assert!(client.app_analysis("x2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mutating_actions_post_limits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/scraping/app/x1/reviews"))
            .and(body_json(json!({"limit": 50})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/sentiment/analyze-app/x1"))
            .and(body_json(json!({"limit": 100})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"status": "queued"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/github/simulate-issue/x1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"preview": {"title": "Users report crashes"}})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.collect_reviews("x1", 50).await.unwrap();
        client.analyze_app("x1", 100).await.unwrap();
        let preview = client.simulate_issue("x1").await.unwrap();
        assert_eq!(preview.title(), "Users report crashes");
    }

    #[tokio::test]
    async fn test_error_status_and_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/apps"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client.list_categories().await {
            Err(CatalogError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected API error, got {:?}", other),
        }

        let err = client.list_apps(&FilterState::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let client = CatalogClient::new(ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout: Some(Duration::from_secs(2)),
        })
        .unwrap();

        let err = client.list_categories().await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Unavailable | CatalogError::Timeout | CatalogError::Request(_)
        ));
    }

    #[test]
    fn test_app_url_encodes_identifier() {
        let client = CatalogClient::new(ClientConfig {
            base_url: "http://catalog.local/".to_string(),
            request_timeout: None,
        })
        .unwrap();
        assert_eq!(
            client.app_url("/api/apps", "my app/1", "/analysis"),
            "http://catalog.local/api/apps/my%20app%2F1/analysis"
        );
    }
}
