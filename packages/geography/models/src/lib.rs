#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Frequency tier taxonomy and map marker types.
//!
//! This crate defines the three-band frequency classification used to
//! visually encode locations on the map, and the marker descriptor the
//! rendering collaborator consumes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// `total_frequency` at or above which a location is high tier.
pub const HIGH_TIER_THRESHOLD: u32 = 10;

/// `total_frequency` at or above which a location is medium tier.
pub const MEDIUM_TIER_THRESHOLD: u32 = 5;

/// Minimum marker radius so zero-frequency locations stay visible.
pub const MIN_MARKER_RADIUS: u32 = 3;

/// Three-band classification of a location's dataset-wide frequency.
///
/// Band bounds are inclusive on the lower end: 10 and up is high, 5
/// through 9 is medium, everything below is low.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FrequencyTier {
    /// `total_frequency` >= 10.
    High,
    /// 5 <= `total_frequency` < 10.
    Medium,
    /// `total_frequency` < 5.
    Low,
}

impl FrequencyTier {
    /// Classifies a dataset-wide frequency into its tier.
    #[must_use]
    pub const fn from_frequency(total_frequency: u32) -> Self {
        if total_frequency >= HIGH_TIER_THRESHOLD {
            Self::High
        } else if total_frequency >= MEDIUM_TIER_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns the marker fill color for this tier.
    #[must_use]
    pub const fn fill_color(self) -> &'static str {
        match self {
            Self::High => "#E74C3C",
            Self::Medium => "#3498DB",
            Self::Low => "#F39C12",
        }
    }

    /// Returns the darker marker border color for this tier.
    #[must_use]
    pub const fn stroke_color(self) -> &'static str {
        match self {
            Self::High => "#C0392B",
            Self::Medium => "#2980B9",
            Self::Low => "#D35400",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Low]
    }
}

/// Derived per-location map marker.
///
/// Position is the mean of the location's filtered record coordinates;
/// radius and tier encode the dataset-wide frequency; the popup carries a
/// formatted summary for the map collaborator to display. Draw order is
/// the consumer's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDescriptor {
    /// Location name (also the hover tooltip).
    pub location: String,
    /// Mean latitude in degrees.
    pub latitude: f64,
    /// Mean longitude in degrees.
    pub longitude: f64,
    /// Marker radius: the location's `total_frequency`, floored at
    /// [`MIN_MARKER_RADIUS`].
    pub radius: u32,
    /// Frequency tier for color encoding.
    pub tier: FrequencyTier,
    /// Formatted popup summary text.
    pub popup: String,
}
