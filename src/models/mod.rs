use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location information for a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A property listing as delivered by a listing source.
///
/// Only `id` is required; everything else is whatever the source knows.
/// Listings without `created_at` are left out of recency grouping.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Location,
    /// e.g. "villa", "lagenhet", "radhus"
    #[serde(default)]
    pub property_type: Option<String>,
    /// e.g. "sale", "rent"
    #[serde(default)]
    pub listing_type: Option<String>,
    /// Asking price (SEK)
    #[serde(default)]
    pub price: Option<u64>,
    /// Monthly rent (SEK), rentals only
    #[serde(default)]
    pub rent: Option<u64>,
    /// Monthly association fee (SEK)
    #[serde(default)]
    pub monthly_fee: Option<u64>,
    #[serde(default)]
    pub rooms: Option<f32>,
    /// Living area in square meters
    #[serde(default)]
    pub sqm: Option<u32>,
    /// Plot area in square meters
    #[serde(default)]
    pub plot_area: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub energy_class: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_listing() {
        let listing: ListingRecord = serde_json::from_str(r#"{"id": "booli_1"}"#).unwrap();
        assert_eq!(listing.id, "booli_1");
        assert!(listing.created_at.is_none());
        assert!(listing.features.is_empty());
        assert_eq!(listing.location, Location::default());
    }

    #[test]
    fn deserializes_full_listing() {
        let listing: ListingRecord = serde_json::from_str(
            r#"{
                "id": "booli_sodermalm_1",
                "address": "Götgatan 120",
                "location": {"city": "Stockholm", "area": "Södermalm"},
                "property_type": "lagenhet",
                "price": 5195000,
                "monthly_fee": 3449,
                "rooms": 2.0,
                "sqm": 70,
                "features": ["Hiss", "Balkong"],
                "created_at": "2026-10-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(listing.location.area.as_deref(), Some("Södermalm"));
        assert_eq!(listing.price, Some(5_195_000));
        assert_eq!(listing.sqm, Some(70));
        assert!(listing.created_at.is_some());
    }
}
