//! Line-oriented driver for the filter machine.
//!
//! Each stdin line is one filter input, standing in for the search page's
//! controls: text boxes debounce, toggles and sliders commit at once.

use std::fmt::Write;

use crate::grouping::ListingGroup;
use crate::models::ListingRecord;
use crate::search::{CommitSink, FilterMachine, PriceBound, SearchMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Keystrokes in the basic search box
    Search(String),
    /// Submitted AI search
    Ai(String),
    PropertyType(String),
    ListingType(String),
    Location(String),
    Price(PriceBound, String),
    Area(u64, u64),
    Rooms(u64, u64),
    Energy(String),
    Feature(String),
    Sort(String),
    Clear,
    Show,
    Quit,
}

impl Command {
    /// Parse one input line. Returns `None` for blank, unknown or malformed
    /// input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "search" => Command::Search(rest.to_string()),
            "ai" => Command::Ai(rest.to_string()),
            "type" => Command::PropertyType(rest.to_string()),
            "listing" => Command::ListingType(rest.to_string()),
            "location" => Command::Location(rest.to_string()),
            "min-price" => Command::Price(PriceBound::Min, rest.to_string()),
            "max-price" => Command::Price(PriceBound::Max, rest.to_string()),
            "area" => {
                let (min, max) = two_numbers(rest)?;
                Command::Area(min, max)
            }
            "rooms" => {
                let (min, max) = two_numbers(rest)?;
                Command::Rooms(min, max)
            }
            "energy" if !rest.is_empty() => Command::Energy(rest.to_string()),
            "feature" if !rest.is_empty() => Command::Feature(rest.to_string()),
            "sort" => Command::Sort(rest.to_string()),
            "clear" => Command::Clear,
            "show" => Command::Show,
            "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }

    /// Feed the command to `machine`. `Show` and `Quit` are handled by the
    /// caller and do nothing here.
    pub fn apply<S: CommitSink>(self, machine: &mut FilterMachine<S>) {
        match self {
            Command::Search(value) => machine.basic_search(&value),
            Command::Ai(value) => {
                machine.ai_input(&value);
                machine.search(&value, SearchMode::Ai);
            }
            Command::PropertyType(value) => machine.property_type(&value),
            Command::ListingType(value) => machine.listing_type(&value),
            Command::Location(value) => machine.location_search(&value),
            Command::Price(bound, value) => machine.price_range(&value, bound),
            Command::Area(min, max) => machine.area_range(min, max),
            Command::Rooms(min, max) => machine.rooms_range(min, max),
            Command::Energy(tag) => machine.energy_class_toggle(&tag),
            Command::Feature(tag) => machine.features_toggle(&tag),
            Command::Sort(value) => machine.sort_by(&value),
            Command::Clear => machine.clear_all(),
            Command::Show | Command::Quit => {}
        }
    }
}

fn two_numbers(rest: &str) -> Option<(u64, u64)> {
    let mut parts = rest.split_whitespace();
    let min = parts.next()?.parse().ok()?;
    let max = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((min, max))
}

/// Render grouped listings the way the results page lists them.
pub fn render_groups(groups: &[ListingGroup<'_, ListingRecord>]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({})", group.label, group.listings.len());
        for listing in &group.listings {
            let price = listing
                .price
                .map(|p| format!("{} kr", p))
                .unwrap_or_else(|| "pris saknas".to_string());
            let _ = writeln!(out, "  {} ({})", listing.address, price);
            let mut details = Vec::new();
            if let Some(rooms) = listing.rooms {
                details.push(format!("{} rum", rooms));
            }
            if let Some(sqm) = listing.sqm {
                details.push(format!("{} kvm", sqm));
            }
            if let Some(area) = &listing.location.area {
                details.push(area.clone());
            }
            if !details.is_empty() {
                let _ = writeln!(out, "    {}", details.join(", "));
            }
        }
    }
    out
}
