//! Property search filters for a housing marketplace: query-string codec,
//! debounced filter state, and recency grouping of listings.

pub mod config;
pub mod grouping;
pub mod models;
pub mod search;
pub mod session;
pub mod sources;

pub use grouping::{group_by_recency, Bucket, ListingGroup, Recency};
pub use models::{ListingRecord, Location};
pub use search::{FilterMachine, FilterState, QueryParams, RawInputState};
