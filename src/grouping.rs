use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::ListingRecord;

/// Anything that can be placed on the recency timeline.
pub trait Recency {
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl Recency for ListingRecord {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Relative age of a listing, in display order.
///
/// The derived ordering is the order buckets are shown in: today, yesterday,
/// then days ascending, then weeks ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Today,
    Yesterday,
    Days(i64),
    Weeks(i64),
}

impl Bucket {
    /// Bucket for an age given in whole elapsed days.
    pub fn from_days(days: i64) -> Self {
        match days {
            0 => Bucket::Today,
            1 => Bucket::Yesterday,
            2..=7 => Bucket::Days(days),
            _ => Bucket::Weeks(days / 7),
        }
    }

    /// Bucket for a timestamp, measured as absolute elapsed time from `now`
    /// rather than by calendar days.
    pub fn for_timestamp(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_days((now - created_at).num_days().abs())
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Today => f.write_str("Idag"),
            Bucket::Yesterday => f.write_str("Igår"),
            Bucket::Days(n) => write!(f, "{} dagar", n),
            Bucket::Weeks(1) => f.write_str("1 vecka"),
            Bucket::Weeks(n) => write!(f, "{} veckor", n),
        }
    }
}

/// Listings sharing a recency label.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingGroup<'a, T> {
    pub label: String,
    pub bucket: Bucket,
    pub listings: Vec<&'a T>,
}

/// Group listings into recency buckets relative to `now`.
///
/// Listings without a creation time are skipped. Groups come back in display
/// order and keep the input order of their listings.
pub fn group_by_recency<T: Recency>(listings: &[T], now: DateTime<Utc>) -> Vec<ListingGroup<'_, T>> {
    let mut buckets: BTreeMap<Bucket, Vec<&T>> = BTreeMap::new();
    for listing in listings {
        if let Some(created_at) = listing.created_at() {
            buckets
                .entry(Bucket::for_timestamp(created_at, now))
                .or_default()
                .push(listing);
        }
    }

    buckets
        .into_iter()
        .map(|(bucket, listings)| ListingGroup {
            label: bucket.to_string(),
            bucket,
            listings,
        })
        .collect()
}
