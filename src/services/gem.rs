use crate::models::TenderCollection;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the GeM marketplace
#[derive(Debug, Error)]
pub enum GemError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// GeM services listing client
///
/// Fetches the public services feed and parses it into a `TenderCollection`.
pub struct GemClient {
    listing_url: String,
    client: Client,
}

impl GemClient {
    /// Create a new client for the listing at `base_url`
    pub fn new(
        base_url: &str,
        status: &str,
        language: &str,
        timeout_secs: u64,
    ) -> Result<Self, GemError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            listing_url: listing_url(base_url, status, language),
            client,
        })
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Fetch the current tender listing
    pub async fn fetch_tenders(&self) -> Result<TenderCollection, GemError> {
        tracing::info!("Fetching tenders from GeM: {}", self.listing_url);

        let response = self.client.get(&self.listing_url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("GeM listing request failed: {} - {}", status, body);
            return Err(GemError::ApiError(format!(
                "Failed to fetch tenders: {}",
                status
            )));
        }

        let body = response.text().await?;
        let collection: TenderCollection = serde_json::from_str(&body)
            .map_err(|e| GemError::InvalidResponse(format!("Failed to parse tender listing: {}", e)))?;

        tracing::info!(
            "Fetched {} tenders from GeM (reported total: {})",
            collection.services.len(),
            collection.total_count
        );

        Ok(collection)
    }
}

/// Build the listing URL, e.g. `...list.json?search%5Bstatus_in%5D%5B%5D=active&_ln=en`
pub fn listing_url(base_url: &str, status: &str, language: &str) -> String {
    format!(
        "{}?{}={}&_ln={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode("search[status_in][]"),
        urlencoding::encode(status),
        urlencoding::encode(language)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_matches_marketplace_format() {
        let url = listing_url(
            "https://mkp.gem.gov.in/cms/others/api/services/list.json",
            "active",
            "en",
        );

        assert_eq!(
            url,
            "https://mkp.gem.gov.in/cms/others/api/services/list.json?search%5Bstatus_in%5D%5B%5D=active&_ln=en"
        );
    }

    #[tokio::test]
    async fn test_fetch_tenders_parses_listing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/list\.json".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "total_count": 2,
                    "services": [
                        {"id": "s1", "display_name": "Cloud Hosting", "search_tags": ["Cloud"], "market_url": "https://x/s1"},
                        {"id": "s2", "display_name": "Catering", "description": null, "status": "inactive", "market_url": "https://x/s2"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = GemClient::new(&format!("{}/list.json", server.url()), "active", "en", 5).unwrap();
        let collection = client.fetch_tenders().await.unwrap();

        mock.assert_async().await;
        assert_eq!(collection.total_count, 2);
        assert_eq!(collection.source, "GeM");
        assert_eq!(collection.services.len(), 2);
        assert!(collection.services[0].is_active());
        assert!(!collection.services[1].is_active());
        assert_eq!(collection.services[1].description, "");
    }

    #[tokio::test]
    async fn test_fetch_tenders_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = GemClient::new(&server.url(), "active", "en", 5).unwrap();
        let err = client.fetch_tenders().await.unwrap_err();

        assert!(matches!(err, GemError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_fetch_tenders_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = GemClient::new(&server.url(), "active", "en", 5).unwrap();
        let err = client.fetch_tenders().await.unwrap_err();

        assert!(matches!(err, GemError::InvalidResponse(_)));
    }
}
