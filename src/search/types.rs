use serde::{Deserialize, Serialize};

use super::params::QueryParams;

/// Query keys understood by [`FilterState`].
pub mod keys {
    pub const QUERY: &str = "query";
    pub const AI: &str = "ai";
    pub const LOCATION: &str = "location";
    pub const PROPERTY_TYPE: &str = "propertyType";
    pub const LISTING_TYPE: &str = "listingType";
    pub const MIN_PRICE: &str = "minPrice";
    pub const MAX_PRICE: &str = "maxPrice";
    pub const MIN_AREA: &str = "minArea";
    pub const MAX_AREA: &str = "maxArea";
    pub const MIN_ROOMS: &str = "minRooms";
    pub const MAX_ROOMS: &str = "maxRooms";
    pub const FEATURES: &str = "features";
    pub const ENERGY_CLASS: &str = "energyClass";
    pub const SORT_BY: &str = "sortBy";
    pub const MIN_RENT: &str = "minRent";
    pub const MAX_RENT: &str = "maxRent";
    pub const MIN_MONTHLY_FEE: &str = "minMonthlyFee";
    pub const MAX_MONTHLY_FEE: &str = "maxMonthlyFee";
    pub const MIN_PLOT_AREA: &str = "minPlotArea";
    pub const MAX_PLOT_AREA: &str = "maxPlotArea";
}

/// Slider floor/ceiling for living area (m²). Bounds at these values are
/// left out of the query string.
pub const AREA_RANGE: (u64, u64) = (0, 1000);
/// Slider floor/ceiling for number of rooms.
pub const ROOMS_RANGE: (u64, u64) = (0, 10);

/// Energy classes offered by the filter panel, including the Swedish
/// plus-grades.
pub const ENERGY_CLASSES: &[&str] = &["A+++", "A++", "A+", "A", "B", "C", "D", "E", "F", "G"];

pub fn is_known_energy_class(tag: &str) -> bool {
    ENERGY_CLASSES.contains(&tag)
}

/// The committed search filters.
///
/// This is what the query string encodes: a shared URL must rebuild an
/// identical `FilterState`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub query: Option<String>,
    /// Free-text query is an AI query. `false` is never written to the URL.
    pub ai: bool,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_area: Option<u64>,
    pub max_area: Option<u64>,
    pub min_rooms: Option<u64>,
    pub max_rooms: Option<u64>,
    /// Written as a repeated `features` key.
    pub features: Vec<String>,
    /// Written as a single comma-joined `energyClass` value.
    pub energy_class: Vec<String>,
    pub sort_by: Option<String>,
    pub min_rent: Option<u64>,
    pub max_rent: Option<u64>,
    pub min_monthly_fee: Option<u64>,
    pub max_monthly_fee: Option<u64>,
    pub min_plot_area: Option<u64>,
    pub max_plot_area: Option<u64>,
}

impl FilterState {
    /// Decode filters from a raw query string. Never fails: anything that
    /// does not parse is treated as absent, and so is a `maxPrice` below
    /// `minPrice`.
    pub fn from_query_string(query: &str) -> Self {
        Self::from_params(&QueryParams::parse(query))
    }

    pub fn from_params(params: &QueryParams) -> Self {
        let text = |key: &str| {
            params
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let number = |key: &str| params.get(key).and_then(parse_number);
        let min_price = number(keys::MIN_PRICE);
        let max_price = number(keys::MAX_PRICE)
            .filter(|&max| min_price.map_or(true, |min| min <= max));

        Self {
            query: text(keys::QUERY),
            ai: params.get(keys::AI) == Some("true"),
            location: text(keys::LOCATION),
            property_type: text(keys::PROPERTY_TYPE),
            listing_type: text(keys::LISTING_TYPE),
            min_price,
            max_price,
            min_area: number(keys::MIN_AREA),
            max_area: number(keys::MAX_AREA),
            min_rooms: number(keys::MIN_ROOMS),
            max_rooms: number(keys::MAX_ROOMS),
            features: params
                .get_all(keys::FEATURES)
                .into_iter()
                .map(str::to_string)
                .collect(),
            energy_class: params
                .get(keys::ENERGY_CLASS)
                .map(|v| {
                    v.split(',')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            sort_by: text(keys::SORT_BY),
            min_rent: number(keys::MIN_RENT),
            max_rent: number(keys::MAX_RENT),
            min_monthly_fee: number(keys::MIN_MONTHLY_FEE),
            max_monthly_fee: number(keys::MAX_MONTHLY_FEE),
            min_plot_area: number(keys::MIN_PLOT_AREA),
            max_plot_area: number(keys::MAX_PLOT_AREA),
        }
    }

    /// Encode every recognized key into `params`, leaving other keys alone.
    pub fn write_params(&self, params: &mut QueryParams) {
        params.encode(keys::QUERY, self.query.as_deref());
        params.encode(keys::AI, self.ai.then_some(true));
        params.encode(keys::LOCATION, self.location.as_deref());
        params.encode(keys::PROPERTY_TYPE, self.property_type.as_deref());
        params.encode(keys::LISTING_TYPE, self.listing_type.as_deref());
        params.encode(keys::MIN_PRICE, self.min_price);
        params.encode(keys::MAX_PRICE, self.max_price);
        params.encode(keys::MIN_AREA, self.min_area);
        params.encode(keys::MAX_AREA, self.max_area);
        params.encode(keys::MIN_ROOMS, self.min_rooms);
        params.encode(keys::MAX_ROOMS, self.max_rooms);
        params.encode(keys::FEATURES, self.features.as_slice());
        params.encode(
            keys::ENERGY_CLASS,
            (!self.energy_class.is_empty()).then(|| self.energy_class.join(",")),
        );
        params.encode(keys::SORT_BY, self.sort_by.as_deref());
        params.encode(keys::MIN_RENT, self.min_rent);
        params.encode(keys::MAX_RENT, self.max_rent);
        params.encode(keys::MIN_MONTHLY_FEE, self.min_monthly_fee);
        params.encode(keys::MAX_MONTHLY_FEE, self.max_monthly_fee);
        params.encode(keys::MIN_PLOT_AREA, self.min_plot_area);
        params.encode(keys::MAX_PLOT_AREA, self.max_plot_area);
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.write_params(&mut params);
        params
    }

    pub fn to_query_string(&self) -> String {
        self.to_params().to_string()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a base-10 number from a query value.
///
/// Returns `None` for empty, non-numeric, non-finite or negative input.
/// Fractions are truncated.
pub fn parse_number(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<u64>() {
        return Some(n);
    }
    let n = trimmed.parse::<f64>().ok()?;
    if !n.is_finite() || n < 0.0 || n > u64::MAX as f64 {
        return None;
    }
    Some(n.trunc() as u64)
}

/// How the free-text query should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Basic,
    Ai,
}

impl std::str::FromStr for SearchMode {
    type Err = std::convert::Infallible;

    /// Anything other than `"ai"` is a basic search.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "ai" { SearchMode::Ai } else { SearchMode::Basic })
    }
}

/// Which end of the price range an input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    Min,
    Max,
}

/// Uncommitted input values, updated on every keystroke.
///
/// Text and number inputs render from here so they stay responsive while
/// the committed [`FilterState`] waits for the debounce window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputState {
    pub basic_search: String,
    pub ai_search: String,
    pub location: String,
    pub property_type: String,
    pub min_price: String,
    pub max_price: String,
    pub min_area: u64,
    pub max_area: u64,
    pub min_rooms: u64,
    pub max_rooms: u64,
    pub energy_class: Vec<String>,
}

impl Default for RawInputState {
    fn default() -> Self {
        Self {
            basic_search: String::new(),
            ai_search: String::new(),
            location: String::new(),
            property_type: String::new(),
            min_price: String::new(),
            max_price: String::new(),
            min_area: AREA_RANGE.0,
            max_area: AREA_RANGE.1,
            min_rooms: ROOMS_RANGE.0,
            max_rooms: ROOMS_RANGE.1,
            energy_class: Vec::new(),
        }
    }
}

impl From<&FilterState> for RawInputState {
    fn from(filters: &FilterState) -> Self {
        let query = filters.query.clone().unwrap_or_default();
        let (basic_search, ai_search) = if filters.ai {
            (String::new(), query)
        } else {
            (query, String::new())
        };
        let number = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_default();

        Self {
            basic_search,
            ai_search,
            location: filters.location.clone().unwrap_or_default(),
            property_type: filters.property_type.clone().unwrap_or_default(),
            min_price: number(filters.min_price),
            max_price: number(filters.max_price),
            min_area: filters.min_area.unwrap_or(AREA_RANGE.0),
            max_area: filters.max_area.unwrap_or(AREA_RANGE.1),
            min_rooms: filters.min_rooms.unwrap_or(ROOMS_RANGE.0),
            max_rooms: filters.max_rooms.unwrap_or(ROOMS_RANGE.1),
            energy_class: filters.energy_class.clone(),
        }
    }
}
