use std::cmp::Ordering;

use crate::models::ListingRecord;

use super::types::FilterState;

/// Result orderings selectable through `sortBy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    AreaAsc,
    AreaDesc,
}

impl SortOrder {
    /// Unknown or missing tags fall back to newest first.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("oldest") => SortOrder::Oldest,
            Some("price-asc") => SortOrder::PriceAsc,
            Some("price-desc") => SortOrder::PriceDesc,
            Some("area-asc") => SortOrder::AreaAsc,
            Some("area-desc") => SortOrder::AreaDesc,
            _ => SortOrder::Newest,
        }
    }

    /// Stable sort; listings missing the sort key go last.
    pub fn sort(self, listings: &mut [ListingRecord]) {
        match self {
            SortOrder::Newest => listings.sort_by(|a, b| desc(a.created_at, b.created_at)),
            SortOrder::Oldest => listings.sort_by(|a, b| asc(a.created_at, b.created_at)),
            SortOrder::PriceAsc => listings.sort_by(|a, b| asc(a.price, b.price)),
            SortOrder::PriceDesc => listings.sort_by(|a, b| desc(a.price, b.price)),
            SortOrder::AreaAsc => listings.sort_by(|a, b| asc(a.sqm, b.sqm)),
            SortOrder::AreaDesc => listings.sort_by(|a, b| desc(a.sqm, b.sqm)),
        }
    }
}

fn asc<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn desc<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (a, b) => asc(a, b),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn in_range(value: Option<u64>, min: Option<u64>, max: Option<u64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match value {
        Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
        None => false,
    }
}

impl FilterState {
    /// Whether `listing` passes every filter that is set.
    ///
    /// Used by sources that filter locally. A bound on a value the listing
    /// does not carry (rent on a sale listing, say) excludes it.
    pub fn matches(&self, listing: &ListingRecord) -> bool {
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let area = listing.location.area.as_deref().unwrap_or_default();
            if !(contains_ci(&listing.address, query)
                || contains_ci(&listing.description, query)
                || contains_ci(area, query))
            {
                return false;
            }
        }

        if let Some(location) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            let area = listing.location.area.as_deref().unwrap_or_default();
            if !(contains_ci(&listing.location.city, location)
                || contains_ci(area, location)
                || contains_ci(&listing.address, location))
            {
                return false;
            }
        }

        let same_tag = |wanted: &Option<String>, actual: &Option<String>| match wanted {
            Some(w) => actual.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(w)),
            None => true,
        };
        if !same_tag(&self.property_type, &listing.property_type)
            || !same_tag(&self.listing_type, &listing.listing_type)
        {
            return false;
        }

        let rooms_ok = match (self.min_rooms, self.max_rooms) {
            (None, None) => true,
            (min, max) => listing.rooms.is_some_and(|r| {
                min.map_or(true, |m| r >= m as f32) && max.map_or(true, |m| r <= m as f32)
            }),
        };
        if !rooms_ok {
            return false;
        }

        let ranges = [
            (listing.price, self.min_price, self.max_price),
            (listing.sqm.map(u64::from), self.min_area, self.max_area),
            (listing.rent, self.min_rent, self.max_rent),
            (listing.monthly_fee, self.min_monthly_fee, self.max_monthly_fee),
            (listing.plot_area.map(u64::from), self.min_plot_area, self.max_plot_area),
        ];
        if !ranges.iter().all(|&(value, min, max)| in_range(value, min, max)) {
            return false;
        }

        if !self
            .features
            .iter()
            .all(|f| listing.features.iter().any(|have| have.eq_ignore_ascii_case(f)))
        {
            return false;
        }

        if !self.energy_class.is_empty() {
            match listing.energy_class.as_deref() {
                Some(class) if self.energy_class.iter().any(|c| c == class) => {}
                _ => return false,
            }
        }

        true
    }

    /// Filter and sort `listings` in place of a server-side query.
    pub fn apply(&self, listings: Vec<ListingRecord>) -> Vec<ListingRecord> {
        let mut matched: Vec<_> = listings.into_iter().filter(|l| self.matches(l)).collect();
        SortOrder::from_tag(self.sort_by.as_deref()).sort(&mut matched);
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::{TimeZone, Utc};

    fn gotgatan() -> ListingRecord {
        ListingRecord {
            id: "booli_sodermalm_1".to_string(),
            address: "Götgatan 120".to_string(),
            location: Location {
                city: "Stockholm".to_string(),
                area: Some("Södermalm".to_string()),
                ..Default::default()
            },
            property_type: Some("lagenhet".to_string()),
            listing_type: Some("sale".to_string()),
            price: Some(5_195_000),
            monthly_fee: Some(3_449),
            rooms: Some(2.0),
            sqm: Some(70),
            features: vec!["Hiss".to_string(), "Balkong".to_string()],
            energy_class: Some("C".to_string()),
            description: "Lägenhet på Södermalm. Hiss och balkong.".to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn filters(query: &str) -> FilterState {
        FilterState::from_query_string(query)
    }

    #[test]
    fn empty_filters_match_everything() {
        assert!(FilterState::default().matches(&gotgatan()));
        assert!(FilterState::default().matches(&ListingRecord::default()));
    }

    #[test]
    fn text_and_location_match_case_insensitively() {
        assert!(filters("query=BALKONG").matches(&gotgatan()));
        assert!(filters("location=södermalm").matches(&gotgatan()));
        assert!(filters("location=stockholm").matches(&gotgatan()));
        assert!(!filters("location=Solna").matches(&gotgatan()));
    }

    #[test]
    fn ranges_bound_present_values() {
        assert!(filters("minPrice=5000000&maxPrice=6000000").matches(&gotgatan()));
        assert!(!filters("maxPrice=5000000").matches(&gotgatan()));
        assert!(filters("minArea=70&minRooms=2&maxRooms=2").matches(&gotgatan()));
        assert!(!filters("maxMonthlyFee=3000").matches(&gotgatan()));
    }

    #[test]
    fn half_rooms_compare_against_bounds() {
        let mut listing = gotgatan();
        listing.rooms = Some(2.5);
        assert!(!filters("maxRooms=2").matches(&listing));
        assert!(filters("minRooms=2&maxRooms=3").matches(&listing));
        assert!(!filters("minRooms=3").matches(&listing));

        listing.rooms = None;
        assert!(!filters("minRooms=1").matches(&listing));
    }

    #[test]
    fn bound_on_missing_value_excludes() {
        assert!(!filters("maxRent=12000").matches(&gotgatan()));
        assert!(!filters("minPlotArea=100").matches(&gotgatan()));
    }

    #[test]
    fn types_features_and_energy_class() {
        assert!(filters("propertyType=Lagenhet&listingType=sale").matches(&gotgatan()));
        assert!(!filters("propertyType=villa").matches(&gotgatan()));
        assert!(filters("features=hiss&features=Balkong").matches(&gotgatan()));
        assert!(!filters("features=Eldstad").matches(&gotgatan()));
        assert!(filters("energyClass=B,C").matches(&gotgatan()));
        assert!(!filters("energyClass=A").matches(&gotgatan()));
    }

    #[test]
    fn apply_sorts_with_missing_keys_last() {
        let mut cheap = gotgatan();
        cheap.id = "cheap".to_string();
        cheap.price = Some(2_395_000);
        let mut unpriced = gotgatan();
        unpriced.id = "unpriced".to_string();
        unpriced.price = None;

        let listings = vec![unpriced, gotgatan(), cheap];
        let ids = |ls: &[ListingRecord]| ls.iter().map(|l| l.id.clone()).collect::<Vec<_>>();

        let sorted = filters("sortBy=price-asc").apply(listings.clone());
        assert_eq!(ids(&sorted), vec!["cheap", "booli_sodermalm_1", "unpriced"]);

        let sorted = filters("sortBy=price-desc").apply(listings);
        assert_eq!(ids(&sorted), vec!["booli_sodermalm_1", "cheap", "unpriced"]);
    }

    #[test]
    fn newest_is_default_order() {
        let mut older = gotgatan();
        older.id = "older".to_string();
        older.created_at = Some(Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap());

        let sorted = filters("sortBy=bogus").apply(vec![older, gotgatan()]);
        assert_eq!(sorted[0].id, "booli_sodermalm_1");
        assert_eq!(SortOrder::from_tag(None), SortOrder::Newest);
    }
}
