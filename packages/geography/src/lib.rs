#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map marker synthesis from per-location aggregates.
//!
//! Turns [`LocationAggregate`]s into [`MarkerDescriptor`]s — position,
//! frequency-scaled radius, tier color band, and popup summary — and
//! serializes the marker set as a `GeoJSON` layer for the map-rendering
//! collaborator.
//!
//! Locations whose mean coordinate is exactly zero on either axis are
//! excluded: under the zero-fill coercion policy a zero coordinate means
//! "missing", so such markers would land in the Gulf of Guinea. A location
//! genuinely at the equator or prime meridian would be wrongly excluded;
//! the reference dataset contains no such location.

use std::fmt::Write as _;

use chapter_map_analytics_models::LocationAggregate;
use chapter_map_geography_models::{FrequencyTier, MIN_MARKER_RADIUS, MarkerDescriptor};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

/// Derives one marker per mappable location aggregate.
///
/// Radius is the location's `total_frequency`, or [`MIN_MARKER_RADIUS`]
/// when the frequency is zero. No draw order is guaranteed; ordering is
/// the rendering consumer's concern.
#[must_use]
pub fn synthesize_markers(aggregates: &[LocationAggregate]) -> Vec<MarkerDescriptor> {
    let markers: Vec<MarkerDescriptor> = aggregates
        .iter()
        .filter(|aggregate| {
            let mappable =
                aggregate.mean_latitude != 0.0 && aggregate.mean_longitude != 0.0;
            if !mappable {
                log::debug!(
                    "Skipping marker for {}: missing coordinates",
                    aggregate.location
                );
            }
            mappable
        })
        .map(|aggregate| MarkerDescriptor {
            location: aggregate.location.clone(),
            latitude: aggregate.mean_latitude,
            longitude: aggregate.mean_longitude,
            radius: if aggregate.total_frequency > 0 {
                aggregate.total_frequency
            } else {
                MIN_MARKER_RADIUS
            },
            tier: FrequencyTier::from_frequency(aggregate.total_frequency),
            popup: popup_text(aggregate),
        })
        .collect();

    log::info!(
        "Synthesized {} marker(s) from {} location aggregate(s)",
        markers.len(),
        aggregates.len()
    );
    markers
}

/// Formats the popup summary for one location: name, dataset-wide
/// frequency, involved characters, and the activity-type breakdown in
/// descending count order.
fn popup_text(aggregate: &LocationAggregate) -> String {
    let characters = if aggregate.characters.is_empty() {
        "none".to_owned()
    } else {
        aggregate.characters.join("、")
    };

    let mut popup = String::new();
    let _ = writeln!(popup, "{}", aggregate.location);
    let _ = writeln!(popup, "Total frequency: {}", aggregate.total_frequency);
    let _ = writeln!(popup, "Characters: {characters}");
    let _ = writeln!(popup, "Activities:");
    for activity in &aggregate.activity_counts {
        let _ = writeln!(popup, "  {}: {}", activity.activity_type, activity.count);
    }
    popup
}

/// Serializes markers as a `GeoJSON` `FeatureCollection` (one Point
/// feature per marker, with radius/tier/colors/popup as properties).
#[must_use]
pub fn marker_layer(markers: &[MarkerDescriptor]) -> FeatureCollection {
    let features = markers
        .iter()
        .map(|marker| {
            let mut properties = JsonObject::new();
            properties.insert("location".to_owned(), JsonValue::from(marker.location.clone()));
            properties.insert("radius".to_owned(), JsonValue::from(marker.radius));
            properties.insert("tier".to_owned(), JsonValue::from(marker.tier.to_string()));
            properties.insert(
                "fillColor".to_owned(),
                JsonValue::from(marker.tier.fill_color()),
            );
            properties.insert(
                "strokeColor".to_owned(),
                JsonValue::from(marker.tier.stroke_color()),
            );
            properties.insert("popup".to_owned(), JsonValue::from(marker.popup.clone()));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    marker.longitude,
                    marker.latitude,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use chapter_map_analytics_models::ActivityCount;

    use super::*;

    fn aggregate(location: &str, total_frequency: u32) -> LocationAggregate {
        LocationAggregate {
            location: location.to_owned(),
            mean_latitude: 30.25,
            mean_longitude: 120.17,
            total_frequency,
            activity_counts: vec![
                ActivityCount {
                    activity_type: "游览".to_owned(),
                    count: 4,
                },
                ActivityCount {
                    activity_type: "赴宴".to_owned(),
                    count: 2,
                },
            ],
            characters: vec!["马二先生".to_owned(), "匡超人".to_owned()],
        }
    }

    #[test]
    fn radius_is_frequency_with_minimum_floor() {
        let markers = synthesize_markers(&[aggregate("杭州", 12), aggregate("五河", 0)]);
        assert_eq!(markers[0].radius, 12);
        assert_eq!(markers[1].radius, MIN_MARKER_RADIUS);
    }

    #[test]
    fn tier_follows_frequency_bands() {
        let markers = synthesize_markers(&[
            aggregate("杭州", 12),
            aggregate("南京", 7),
            aggregate("五河", 2),
        ]);
        assert_eq!(markers[0].tier, FrequencyTier::High);
        assert_eq!(markers[1].tier, FrequencyTier::Medium);
        assert_eq!(markers[2].tier, FrequencyTier::Low);
    }

    #[test]
    fn zero_coordinates_are_excluded() {
        let mut missing = aggregate("失考", 8);
        missing.mean_latitude = 0.0;
        missing.mean_longitude = 0.0;
        let mut half_missing = aggregate("半考", 8);
        half_missing.mean_longitude = 0.0;

        let markers = synthesize_markers(&[aggregate("杭州", 8), missing, half_missing]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].location, "杭州");
    }

    #[test]
    fn popup_lists_frequency_characters_and_activities() {
        let markers = synthesize_markers(&[aggregate("杭州", 6)]);
        let popup = &markers[0].popup;
        assert!(popup.starts_with("杭州\n"));
        assert!(popup.contains("Total frequency: 6"));
        assert!(popup.contains("Characters: 马二先生、匡超人"));
        let tour = popup.find("游览: 4").unwrap();
        let banquet = popup.find("赴宴: 2").unwrap();
        assert!(tour < banquet);
    }

    #[test]
    fn popup_marks_missing_characters_explicitly() {
        let mut lonely = aggregate("野外", 1);
        lonely.characters.clear();
        let markers = synthesize_markers(&[lonely]);
        assert!(markers[0].popup.contains("Characters: none"));
    }

    #[test]
    fn layer_emits_one_point_feature_per_marker() {
        let markers = synthesize_markers(&[aggregate("杭州", 12), aggregate("南京", 3)]);
        let layer = marker_layer(&markers);
        assert_eq!(layer.features.len(), 2);

        let feature = &layer.features[0];
        let Some(Geometry {
            value: Value::Point(position),
            ..
        }) = &feature.geometry
        else {
            panic!("expected point geometry");
        };
        assert!((position[0] - 120.17).abs() < f64::EPSILON);
        assert!((position[1] - 30.25).abs() < f64::EPSILON);

        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["tier"], "HIGH");
        assert_eq!(properties["fillColor"], "#E74C3C");
        assert_eq!(properties["radius"], 12);
    }

    #[test]
    fn layer_serializes_as_feature_collection() {
        let markers = synthesize_markers(&[aggregate("杭州", 12)]);
        let json = serde_json::to_value(marker_layer(&markers)).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
    }

    #[test]
    fn unmapped_locations_still_rank_and_tabulate() {
        use chapter_map_analytics::aggregate::{
            cross_tabulation, frequency_ranking, location_aggregates,
        };
        use chapter_map_record_models::Record;

        // A location whose coordinates were zero-filled at ingestion stays
        // in the frequency ranking and cross-tabulation; only the marker
        // layer drops it.
        let records = vec![
            Record {
                chapter: 1,
                location: "杭州".to_owned(),
                latitude: 30.25,
                longitude: 120.17,
                character: "马二先生".to_owned(),
                activity_type: "游览".to_owned(),
                activity_description: String::new(),
                source_excerpt: String::new(),
                chapter_frequency: 1,
                total_frequency: 6,
            },
            Record {
                chapter: 2,
                location: "失考".to_owned(),
                latitude: 0.0,
                longitude: 0.0,
                character: "王冕".to_owned(),
                activity_type: "隐居".to_owned(),
                activity_description: String::new(),
                source_excerpt: String::new(),
                chapter_frequency: 1,
                total_frequency: 9,
            },
        ];

        let ranking = frequency_ranking(&records);
        assert!(ranking.iter().any(|e| e.location == "失考"));

        let tab = cross_tabulation(&records);
        assert!(tab.locations.contains(&"失考".to_owned()));

        let markers = synthesize_markers(&location_aggregates(&records));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].location, "杭州");
    }
}
