use crate::models::ListingRecord;
use crate::search::FilterState;
use crate::sources::traits::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Listing source backed by a JSON array on disk, e.g. the output of a
/// scrape run. Filtering and sorting happen in memory.
pub struct FileListingSource {
    path: PathBuf,
}

impl FileListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<ListingRecord>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let listings: Vec<ListingRecord> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse listings in {}", self.path.display()))?;
        debug!("Loaded {} listings from {}", listings.len(), self.path.display());
        Ok(listings)
    }
}

#[async_trait]
impl ListingSource for FileListingSource {
    async fn fetch(&self, filters: &FilterState) -> Result<Vec<ListingRecord>> {
        let listings = self.load().await?;
        let total = listings.len();
        let matched = filters.apply(listings);
        info!("{} of {} listings match", matched.len(), total);
        Ok(matched)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
