#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Occurrence record and filter selection types.
//!
//! This crate defines the canonical typed record produced by ingestion and
//! consumed by every downstream component, along with the column schema of
//! the tabular source and the three-dimensional filter selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One occurrence of a character performing an activity at a location in a
/// chapter of the text.
///
/// Records are immutable once produced by ingestion. Numeric fields have
/// already been through the zero-fill coercion pass, so every consumer can
/// rely on them being well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Chapter number the occurrence appears in.
    pub chapter: u32,
    /// Location name (e.g. a city or landmark from the text).
    pub location: String,
    /// Latitude in degrees. Exactly `0.0` means missing (see coercion policy).
    pub latitude: f64,
    /// Longitude in degrees. Exactly `0.0` means missing (see coercion policy).
    pub longitude: f64,
    /// Character involved in the occurrence.
    pub character: String,
    /// Low-cardinality activity category (e.g. "banquet", "examination").
    pub activity_type: String,
    /// Free-text description of the activity.
    pub activity_description: String,
    /// Excerpt from the source text supporting this occurrence.
    pub source_excerpt: String,
    /// Occurrences of this location within this specific chapter.
    pub chapter_frequency: u32,
    /// Occurrences of this location across the whole dataset.
    ///
    /// Ground truth from ingestion: every record sharing a location carries
    /// the same value. It is never recomputed from `chapter_frequency` sums.
    pub total_frequency: u32,
}

/// The ten columns of the tabular source, in canonical order.
///
/// The source contract is semantic, not tied to a literal label set: the
/// reference dataset uses Chinese-language headers, so each column resolves
/// from either its canonical English name or its reference header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// Chapter number.
    Chapter,
    /// Location name.
    Location,
    /// Latitude in degrees.
    Latitude,
    /// Longitude in degrees.
    Longitude,
    /// Character name.
    Character,
    /// Activity category.
    ActivityType,
    /// Free-text activity description.
    ActivityDescription,
    /// Source text excerpt.
    SourceExcerpt,
    /// Per-chapter location frequency.
    ChapterFrequency,
    /// Dataset-wide location frequency.
    TotalFrequency,
}

impl Column {
    /// Returns the canonical English header for this column.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Location => "location",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Character => "character",
            Self::ActivityType => "activity_type",
            Self::ActivityDescription => "activity_description",
            Self::SourceExcerpt => "source_excerpt",
            Self::ChapterFrequency => "chapter_frequency",
            Self::TotalFrequency => "total_frequency",
        }
    }

    /// Returns the Chinese-language header used by the reference dataset.
    #[must_use]
    pub const fn reference_header(self) -> &'static str {
        match self {
            Self::Chapter => "章回",
            Self::Location => "地点",
            Self::Latitude => "北纬",
            Self::Longitude => "东经",
            Self::Character => "人物",
            Self::ActivityType => "活动类型",
            Self::ActivityDescription => "活动描述",
            Self::SourceExcerpt => "原文摘录",
            Self::ChapterFrequency => "本章频次",
            Self::TotalFrequency => "总频次",
        }
    }

    /// Resolves a header cell to a column, accepting either the canonical
    /// English name (case-insensitive) or the reference dataset header.
    /// Surrounding whitespace is ignored.
    #[must_use]
    pub fn resolve(header: &str) -> Option<Self> {
        let trimmed = header.trim();
        Self::all().iter().copied().find(|column| {
            trimmed.eq_ignore_ascii_case(column.name())
                || trimmed == column.reference_header()
        })
    }

    /// Returns all columns in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Chapter,
            Self::Location,
            Self::Latitude,
            Self::Longitude,
            Self::Character,
            Self::ActivityType,
            Self::ActivityDescription,
            Self::SourceExcerpt,
            Self::ChapterFrequency,
            Self::TotalFrequency,
        ]
    }
}

/// The three independent set selections applied when filtering records.
///
/// Each dimension is a set-membership predicate and the three are combined
/// as a conjunction. An empty set on any dimension matches nothing — it is
/// an empty selection, not "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Locations to retain.
    pub locations: BTreeSet<String>,
    /// Activity types to retain.
    pub activity_types: BTreeSet<String>,
    /// Chapters to retain.
    pub chapters: BTreeSet<u32>,
}

impl FilterSelection {
    /// Builds the default selection: every observed value on every
    /// dimension, so that filtering with it is the identity.
    #[must_use]
    pub fn select_all(records: &[Record]) -> Self {
        Self {
            locations: records.iter().map(|r| r.location.clone()).collect(),
            activity_types: records.iter().map(|r| r.activity_type.clone()).collect(),
            chapters: records.iter().map(|r| r.chapter).collect(),
        }
    }

    /// Returns whether the record satisfies all three set-membership
    /// predicates.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.locations.contains(&record.location)
            && self.activity_types.contains(&record.activity_type)
            && self.chapters.contains(&record.chapter)
    }
}
