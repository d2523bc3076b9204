//! HTTP client for the external search webhook.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use pubseek_core::models::{SearchParams, SearchResults};

use crate::protocol::SearchRequest;

/// Failures crossing the webhook boundary. Both variants are recovered at
/// the controller and shown to the user as the same generic failure notice.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    Parse(String),
}

/// Client for the external search webhook. One request per call; no
/// retries, no queue.
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one search request. The webhook replies with a JSON array
    /// whose first element is the complete result snapshot; any other
    /// shape is a `Parse` failure.
    #[instrument(skip(self, params), fields(keywords = %params.keywords))]
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResults, WebhookError> {
        let req = SearchRequest::from(params);
        let resp = self.client.post(&self.url).json(&req).send().await?;
        let body = resp.error_for_status()?.text().await?;

        let mut batches: Vec<SearchResults> =
            serde_json::from_str(&body).map_err(|e| WebhookError::Parse(e.to_string()))?;
        if batches.is_empty() {
            return Err(WebhookError::Parse("empty response array".to_string()));
        }

        let results = batches.swap_remove(0);
        debug!(
            "Search returned {} publications",
            results.statistics.total_publications
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn params() -> SearchParams {
        SearchParams {
            keywords: "neural networks".to_string(),
            limit: 10,
            year_from: 2020,
            open_access: true,
        }
    }

    fn snapshot_json(query: &str, total: u32) -> serde_json::Value {
        serde_json::json!({
            "search_query": query,
            "statistics": {
                "total_publications": total,
                "open_access_count": 1,
                "avg_citations": 3.5,
                "max_citations": 7,
                "year_range": {"min": 2020, "max": 2024},
                "top_cited": []
            },
            "publications": [{
                "id": "W1",
                "title": "First result",
                "authors": "A. Author",
                "year": 2021,
                "doi": null,
                "citations": 7,
                "open_access": true,
                "source": "openalex",
                "pdf_url": null,
                "landing_page_url": null,
                "relevance_score": 1.0
            }],
            "generated_at": "2024-06-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn search_returns_first_array_element() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhook")
            .match_body(Matcher::Json(serde_json::json!({
                "keywords": "neural networks",
                "limit": 10,
                "year_from": 2020,
                "open_access.any_repository_has_fulltext": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!([snapshot_json("neural networks", 3), snapshot_json("extra", 9)])
                    .to_string(),
            )
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/webhook", server.url()),
            Duration::from_secs(5),
        );
        let results = client.search(&params()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.search_query, "neural networks");
        assert_eq!(results.statistics.total_publications, 3);
        assert_eq!(results.publications.len(), 1);
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/webhook")
            .with_status(500)
            .with_body("workflow error")
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/webhook", server.url()),
            Duration::from_secs(5),
        );
        let err = client.search(&params()).await.unwrap_err();
        assert!(matches!(err, WebhookError::Transport(_)));
    }

    #[tokio::test]
    async fn non_array_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/webhook")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(snapshot_json("neural networks", 3).to_string())
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/webhook", server.url()),
            Duration::from_secs(5),
        );
        let err = client.search(&params()).await.unwrap_err();
        assert!(matches!(err, WebhookError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_array_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/webhook")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/webhook", server.url()),
            Duration::from_secs(5),
        );
        let err = client.search(&params()).await.unwrap_err();
        assert!(matches!(err, WebhookError::Parse(_)));
    }
}
