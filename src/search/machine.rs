use std::time::Duration;

use tracing::debug;

use super::debounce::Debouncer;
use super::params::QueryParams;
use super::sink::CommitSink;
use super::types::{
    parse_number, FilterState, PriceBound, RawInputState, SearchMode, AREA_RANGE, ROOMS_RANGE,
};

/// Debounce window for text and price inputs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Inputs that commit after the debounce window rather than immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebouncedField {
    BasicSearch,
    Location,
    MinPrice,
    MaxPrice,
}

/// Keeps the committed [`FilterState`] and the per-keystroke
/// [`RawInputState`] in sync with the location's query string.
///
/// Every commit re-encodes the filters and hands the query string to the
/// [`CommitSink`]. Text and price inputs are debounced per field; the owner
/// drives them with [`settle_next`](Self::settle_next). Dropping the machine
/// cancels every pending input, so the sink is never called afterwards.
///
/// Debounce timers run on the current Tokio runtime. Without one, debounced
/// inputs commit immediately.
pub struct FilterMachine<S: CommitSink> {
    filters: FilterState,
    raw: RawInputState,
    params: QueryParams,
    sink: S,
    debouncer: Debouncer<DebouncedField>,
}

impl<S: CommitSink> FilterMachine<S> {
    pub fn new(query: &str, sink: S) -> Self {
        Self::with_debounce(query, sink, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(query: &str, sink: S, window: Duration) -> Self {
        let params = QueryParams::parse(query);
        let filters = FilterState::from_params(&params);
        let raw = RawInputState::from(&filters);
        Self {
            filters,
            raw,
            params,
            sink,
            debouncer: Debouncer::new(window),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn raw(&self) -> &RawInputState {
        &self.raw
    }

    /// The query string as of the last commit.
    pub fn query_string(&self) -> String {
        self.params.to_string()
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Commit the free-text query.
    ///
    /// A non-blank AI query sets the `ai` flag and clears the basic search
    /// box; anything else clears the AI box and unsets the flag.
    pub fn search(&mut self, value: &str, mode: SearchMode) {
        self.filters.query = non_empty(value);
        if mode == SearchMode::Ai && !value.trim().is_empty() {
            self.raw.basic_search.clear();
            self.raw.ai_search = value.to_string();
            self.filters.ai = true;
        } else {
            self.raw.ai_search.clear();
            self.filters.ai = false;
        }
        self.commit();
    }

    /// Update the AI search box without committing.
    pub fn ai_input(&mut self, value: &str) {
        self.raw.ai_search = value.to_string();
    }

    pub fn basic_search(&mut self, value: &str) {
        self.raw.basic_search = value.to_string();
        self.debounce(DebouncedField::BasicSearch, value);
    }

    pub fn location_search(&mut self, value: &str) {
        self.raw.location = value.to_string();
        self.debounce(DebouncedField::Location, value);
    }

    /// Select a property type, or clear it when `value` is already selected.
    pub fn property_type(&mut self, value: &str) {
        let next = if self.filters.property_type.as_deref() == Some(value) {
            None
        } else {
            non_empty(value)
        };
        self.raw.property_type = next.clone().unwrap_or_default();
        self.filters.property_type = next;
        self.commit();
    }

    pub fn price_range(&mut self, value: &str, bound: PriceBound) {
        let field = match bound {
            PriceBound::Min => {
                self.raw.min_price = value.to_string();
                DebouncedField::MinPrice
            }
            PriceBound::Max => {
                self.raw.max_price = value.to_string();
                DebouncedField::MaxPrice
            }
        };
        self.debounce(field, value);
    }

    /// Commit the living-area slider. Bounds at the slider's ends are
    /// dropped from the query string.
    pub fn area_range(&mut self, min: u64, max: u64) {
        self.raw.min_area = min;
        self.raw.max_area = max;
        self.filters.min_area = (min != AREA_RANGE.0).then_some(min);
        self.filters.max_area = (max != AREA_RANGE.1).then_some(max);
        self.commit();
    }

    pub fn rooms_range(&mut self, min: u64, max: u64) {
        self.raw.min_rooms = min;
        self.raw.max_rooms = max;
        self.filters.min_rooms = (min != ROOMS_RANGE.0).then_some(min);
        self.filters.max_rooms = (max != ROOMS_RANGE.1).then_some(max);
        self.commit();
    }

    pub fn energy_class_toggle(&mut self, tag: &str) {
        toggle(&mut self.raw.energy_class, tag);
        self.filters.energy_class = self.raw.energy_class.clone();
        self.commit();
    }

    pub fn features_toggle(&mut self, tag: &str) {
        toggle(&mut self.filters.features, tag);
        self.commit();
    }

    pub fn sort_by(&mut self, value: &str) {
        self.filters.sort_by = non_empty(value);
        self.commit();
    }

    pub fn listing_type(&mut self, value: &str) {
        self.filters.listing_type = non_empty(value);
        self.commit();
    }

    /// Reset every filter and input, dropping pending inputs as well.
    pub fn clear_all(&mut self) {
        self.debouncer.cancel_all();
        self.filters = FilterState::default();
        self.raw = RawInputState::default();
        self.params = QueryParams::new();
        debug!("Clearing all filters");
        self.sink.replace("");
    }

    /// Wait for the next debounced input to settle and commit it.
    ///
    /// Returns `false` without waiting when nothing is pending. Cancel safe,
    /// so it can sit in a `tokio::select!` branch.
    pub async fn settle_next(&mut self) -> bool {
        match self.debouncer.next().await {
            Some((field, value)) => {
                self.apply(field, &value);
                true
            }
            None => false,
        }
    }

    /// Commit every pending input as its window elapses.
    pub async fn settle_all(&mut self) {
        while self.settle_next().await {}
    }

    /// Stop the machine, discarding pending inputs.
    pub fn dispose(self) {
        debug!("Disposing filter machine");
    }

    fn apply(&mut self, field: DebouncedField, value: &str) {
        match field {
            DebouncedField::BasicSearch => self.search(value, SearchMode::Basic),
            DebouncedField::Location => {
                self.filters.location = non_empty(value);
                self.commit();
            }
            DebouncedField::MinPrice => {
                let max = self.filters.max_price;
                self.filters.min_price =
                    parse_number(value).filter(|&min| max.map_or(true, |max| min <= max));
                self.commit();
            }
            DebouncedField::MaxPrice => {
                let min = self.filters.min_price;
                self.filters.max_price =
                    parse_number(value).filter(|&max| min.map_or(true, |min| min <= max));
                self.commit();
            }
        }
    }

    fn debounce(&mut self, field: DebouncedField, value: &str) {
        if !self.debouncer.schedule(field, value.to_string()) {
            self.apply(field, value);
        }
    }

    fn commit(&mut self) {
        self.filters.write_params(&mut self.params);
        let query = self.params.to_string();
        debug!(%query, "Committing filters");
        self.sink.replace(&query);
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn toggle(tags: &mut Vec<String>, tag: &str) {
    match tags.iter().position(|t| t == tag) {
        Some(idx) => {
            tags.remove(idx);
        }
        None => tags.push(tag.to_string()),
    }
}
