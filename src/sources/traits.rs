use crate::models::ListingRecord;
use crate::search::FilterState;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing sources
/// Sources hand back the listings matching the committed filters, already
/// in the order `sortBy` asks for.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch listings matching `filters`
    async fn fetch(&self, filters: &FilterState) -> Result<Vec<ListingRecord>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
