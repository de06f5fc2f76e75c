#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Aggregation result types for the occurrence pipeline.
//!
//! These are the derived views computed from a filtered record set: the
//! per-location frequency ranking, the location × activity-type
//! cross-tabulation, per-location aggregates, and dataset overview counts.
//! All of them are recomputed fresh from each filtered view and never
//! cached or diffed incrementally.

use serde::{Deserialize, Serialize};

/// One entry of the per-location frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFrequency {
    /// Location name.
    pub location: String,
    /// Dataset-wide frequency for this location (first observed value).
    pub total_frequency: u32,
}

/// Count of occurrences for a single activity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCount {
    /// Activity type name.
    pub activity_type: String,
    /// Number of filtered records with this activity type.
    pub count: u64,
}

/// Derived per-location summary over a filtered record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAggregate {
    /// Location name.
    pub location: String,
    /// Mean latitude over the location's filtered records.
    ///
    /// Averaged rather than taken from a single record because per-record
    /// coordinates may carry noise.
    pub mean_latitude: f64,
    /// Mean longitude over the location's filtered records.
    pub mean_longitude: f64,
    /// Dataset-wide frequency (first observed value for the location).
    pub total_frequency: u32,
    /// Activity-type distribution, descending by count; ties keep
    /// first-appearance order.
    pub activity_counts: Vec<ActivityCount>,
    /// Involved characters, de-duplicated, in order of first appearance.
    pub characters: Vec<String>,
}

/// Location × activity-type count matrix over a filtered record set.
///
/// Axes hold the values present after filtering, in first-appearance
/// order. Cells with no matching records are zero, not absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossTab {
    /// Row axis: locations in first-appearance order.
    pub locations: Vec<String>,
    /// Column axis: activity types in first-appearance order.
    pub activity_types: Vec<String>,
    /// `counts[row][column]` is the number of filtered records at
    /// (location, activity type).
    pub counts: Vec<Vec<u64>>,
}

impl CrossTab {
    /// Returns the total count for the given location row.
    #[must_use]
    pub fn row_total(&self, row: usize) -> u64 {
        self.counts.get(row).map_or(0, |r| r.iter().sum())
    }

    /// Returns the total count for the given activity-type column.
    #[must_use]
    pub fn column_total(&self, column: usize) -> u64 {
        self.counts
            .iter()
            .map(|row| row.get(column).copied().unwrap_or(0))
            .sum()
    }
}

/// Headline counts for the loaded dataset, shown before any filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetOverview {
    /// Total record count.
    pub records: u64,
    /// Distinct location count.
    pub locations: u64,
    /// Distinct character count.
    pub characters: u64,
    /// Distinct chapter count.
    pub chapters: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_tab_totals() {
        let tab = CrossTab {
            locations: vec!["杭州".to_owned(), "南京".to_owned()],
            activity_types: vec!["游览".to_owned(), "赴宴".to_owned()],
            counts: vec![vec![2, 1], vec![0, 4]],
        };
        assert_eq!(tab.row_total(0), 3);
        assert_eq!(tab.row_total(1), 4);
        assert_eq!(tab.column_total(0), 2);
        assert_eq!(tab.column_total(1), 5);
    }

    #[test]
    fn cross_tab_totals_out_of_range_are_zero() {
        let tab = CrossTab {
            locations: vec![],
            activity_types: vec![],
            counts: vec![],
        };
        assert_eq!(tab.row_total(5), 0);
        assert_eq!(tab.column_total(5), 0);
    }
}
