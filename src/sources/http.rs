use crate::models::ListingRecord;
use crate::search::FilterState;
use crate::sources::traits::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Listing source backed by a search endpoint that understands the same
/// query string the filters encode, and answers with a JSON array.
pub struct HttpListingSource {
    client: Client,
    endpoint: Url,
}

impl HttpListingSource {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid listings endpoint: {}", endpoint))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("housing-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// Endpoint URL carrying the encoded filters.
    pub fn request_url(&self, filters: &FilterState) -> Url {
        let mut url = self.endpoint.clone();
        let query = filters.to_query_string();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        url
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self, filters: &FilterState) -> Result<Vec<ListingRecord>> {
        let url = self.request_url(filters);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch listings")?;

        if !response.status().is_success() {
            warn!("Listings endpoint returned status: {}", response.status());
            anyhow::bail!("Failed to fetch listings: {}", response.status());
        }

        let listings: Vec<ListingRecord> = response
            .json()
            .await
            .context("Failed to decode listings response")?;

        info!("Fetched {} listings from {}", listings.len(), self.endpoint);
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_carries_filters() {
        let source = HttpListingSource::new("https://api.example.se/listings").unwrap();
        let filters = FilterState::from_query_string("location=Solna&features=Hiss&features=Balkong");
        assert_eq!(
            source.request_url(&filters).as_str(),
            "https://api.example.se/listings?location=Solna&features=Hiss&features=Balkong"
        );
    }

    #[test]
    fn request_url_without_filters_has_no_query() {
        let source = HttpListingSource::new("https://api.example.se/listings?stale=1").unwrap();
        assert_eq!(
            source.request_url(&FilterState::default()).as_str(),
            "https://api.example.se/listings"
        );
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(HttpListingSource::new("not a url").is_err());
    }
}
