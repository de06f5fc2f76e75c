//! Deterministic per-location aggregation.
//!
//! All groupings key on the location in source order, so "first occurrence"
//! semantics fall out of the stable order the filter engine preserves.

use std::collections::{BTreeSet, HashMap, HashSet};

use chapter_map_analytics_models::{
    ActivityCount, CrossTab, DatasetOverview, LocationAggregate, LocationFrequency,
};
use chapter_map_record_models::Record;

/// Ranks the distinct locations of a filtered set descending by
/// `total_frequency`.
///
/// Each location contributes the `total_frequency` of its first-encountered
/// record. All records for a location should carry the same value (it is
/// location-invariant ground truth); if source data ever violates that, the
/// first-encountered value wins deterministically. Ties keep
/// first-appearance order (stable sort).
#[must_use]
pub fn frequency_ranking(records: &[Record]) -> Vec<LocationFrequency> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ranking: Vec<LocationFrequency> = Vec::new();

    for record in records {
        if seen.insert(record.location.as_str()) {
            ranking.push(LocationFrequency {
                location: record.location.clone(),
                total_frequency: record.total_frequency,
            });
        }
    }

    ranking.sort_by(|a, b| b.total_frequency.cmp(&a.total_frequency));
    ranking
}

/// Builds the location × activity-type count matrix of a filtered set.
///
/// Axes hold the values present after filtering in first-appearance order;
/// combinations with no records are present as zero cells.
#[must_use]
pub fn cross_tabulation(records: &[Record]) -> CrossTab {
    let mut locations: Vec<String> = Vec::new();
    let mut location_index: HashMap<&str, usize> = HashMap::new();
    let mut activity_types: Vec<String> = Vec::new();
    let mut activity_index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if !location_index.contains_key(record.location.as_str()) {
            location_index.insert(record.location.as_str(), locations.len());
            locations.push(record.location.clone());
        }
        if !activity_index.contains_key(record.activity_type.as_str()) {
            activity_index.insert(record.activity_type.as_str(), activity_types.len());
            activity_types.push(record.activity_type.clone());
        }
    }

    let mut counts = vec![vec![0_u64; activity_types.len()]; locations.len()];
    for record in records {
        let row = location_index[record.location.as_str()];
        let column = activity_index[record.activity_type.as_str()];
        counts[row][column] += 1;
    }

    CrossTab {
        locations,
        activity_types,
        counts,
    }
}

struct Accumulator {
    latitude_sum: f64,
    longitude_sum: f64,
    record_count: u64,
    total_frequency: u32,
    activities: Vec<(String, u64)>,
    characters: Vec<String>,
}

/// Computes one [`LocationAggregate`] per distinct location of a filtered
/// set, in first-appearance order.
///
/// Coordinates are averaged over the location's filtered records since
/// per-record coordinates may carry noise; `total_frequency` is the first
/// observed value. Blank character cells are skipped when collecting the
/// involved-character list.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn location_aggregates(records: &[Record]) -> Vec<LocationAggregate> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Accumulator> = HashMap::new();

    for record in records {
        let group = groups
            .entry(record.location.clone())
            .or_insert_with(|| {
                order.push(record.location.clone());
                Accumulator {
                    latitude_sum: 0.0,
                    longitude_sum: 0.0,
                    record_count: 0,
                    total_frequency: record.total_frequency,
                    activities: Vec::new(),
                    characters: Vec::new(),
                }
            });

        group.latitude_sum += record.latitude;
        group.longitude_sum += record.longitude;
        group.record_count += 1;

        if let Some(entry) = group
            .activities
            .iter_mut()
            .find(|(activity, _)| *activity == record.activity_type)
        {
            entry.1 += 1;
        } else {
            group.activities.push((record.activity_type.clone(), 1));
        }

        if !record.character.is_empty() && !group.characters.contains(&record.character) {
            group.characters.push(record.character.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|location| {
            let group = groups.remove(&location)?;
            let n = group.record_count as f64;
            let mut activity_counts: Vec<ActivityCount> = group
                .activities
                .into_iter()
                .map(|(activity_type, count)| ActivityCount {
                    activity_type,
                    count,
                })
                .collect();
            activity_counts.sort_by(|a, b| b.count.cmp(&a.count));

            Some(LocationAggregate {
                location,
                mean_latitude: group.latitude_sum / n,
                mean_longitude: group.longitude_sum / n,
                total_frequency: group.total_frequency,
                activity_counts,
                characters: group.characters,
            })
        })
        .collect()
}

/// Computes the headline counts shown before any filtering.
#[must_use]
pub fn overview(records: &[Record]) -> DatasetOverview {
    let locations: BTreeSet<&str> = records.iter().map(|r| r.location.as_str()).collect();
    let characters: BTreeSet<&str> = records
        .iter()
        .map(|r| r.character.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    let chapters: BTreeSet<u32> = records.iter().map(|r| r.chapter).collect();

    DatasetOverview {
        records: records.len() as u64,
        locations: locations.len() as u64,
        characters: characters.len() as u64,
        chapters: chapters.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        location: &str,
        character: &str,
        activity_type: &str,
        total_frequency: u32,
    ) -> Record {
        Record {
            chapter: 1,
            location: location.to_owned(),
            latitude: 30.0,
            longitude: 120.0,
            character: character.to_owned(),
            activity_type: activity_type.to_owned(),
            activity_description: String::new(),
            source_excerpt: String::new(),
            chapter_frequency: 1,
            total_frequency,
        }
    }

    #[test]
    fn ranking_sorts_descending_with_first_values() {
        let records = vec![
            record("杭州", "a", "游览", 12),
            record("南京", "b", "赴宴", 7),
            record("杭州", "c", "游览", 12),
        ];
        let ranking = frequency_ranking(&records);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].location, "杭州");
        assert_eq!(ranking[0].total_frequency, 12);
        assert_eq!(ranking[1].location, "南京");
        assert_eq!(ranking[1].total_frequency, 7);
    }

    #[test]
    fn ranking_breaks_ties_by_first_appearance() {
        let records = vec![
            record("五河", "a", "访友", 4),
            record("扬州", "b", "游览", 9),
            record("天长", "c", "访友", 4),
        ];
        let ranking = frequency_ranking(&records);
        let locations: Vec<&str> = ranking.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(locations, vec!["扬州", "五河", "天长"]);
    }

    #[test]
    fn ranking_is_permutation_of_distinct_locations() {
        let records = vec![
            record("杭州", "a", "游览", 6),
            record("南京", "b", "赴宴", 12),
            record("杭州", "c", "科举", 6),
            record("京师", "d", "科举", 3),
        ];
        let ranking = frequency_ranking(&records);
        let mut ranked: Vec<&str> = ranking.iter().map(|e| e.location.as_str()).collect();
        ranked.sort_unstable();
        assert_eq!(ranked, vec!["京师", "南京", "杭州"]);
    }

    #[test]
    fn conflicting_total_frequency_first_wins() {
        let records = vec![
            record("杭州", "a", "游览", 6),
            record("杭州", "b", "游览", 99),
        ];
        let ranking = frequency_ranking(&records);
        assert_eq!(ranking[0].total_frequency, 6);
    }

    #[test]
    fn cross_tab_counts_and_zero_cells() {
        let records = vec![
            record("杭州", "a", "游览", 6),
            record("杭州", "b", "游览", 6),
            record("杭州", "c", "赴宴", 6),
            record("南京", "d", "赴宴", 12),
        ];
        let tab = cross_tabulation(&records);
        assert_eq!(tab.locations, vec!["杭州", "南京"]);
        assert_eq!(tab.activity_types, vec!["游览", "赴宴"]);
        assert_eq!(tab.counts, vec![vec![2, 1], vec![0, 1]]);
    }

    #[test]
    fn cross_tab_marginals_match_record_counts() {
        let records = vec![
            record("杭州", "a", "游览", 6),
            record("杭州", "b", "赴宴", 6),
            record("南京", "c", "赴宴", 12),
            record("南京", "d", "赴宴", 12),
            record("京师", "e", "科举", 3),
        ];
        let tab = cross_tabulation(&records);

        for (row, location) in tab.locations.iter().enumerate() {
            let expected = records.iter().filter(|r| &r.location == location).count() as u64;
            assert_eq!(tab.row_total(row), expected);
        }
        for (column, activity) in tab.activity_types.iter().enumerate() {
            let expected = records
                .iter()
                .filter(|r| &r.activity_type == activity)
                .count() as u64;
            assert_eq!(tab.column_total(column), expected);
        }
    }

    #[test]
    fn aggregates_average_coordinates() {
        let mut first = record("杭州", "a", "游览", 6);
        first.latitude = 30.0;
        first.longitude = 120.0;
        let mut second = record("杭州", "b", "赴宴", 6);
        second.latitude = 30.5;
        second.longitude = 120.3;

        let aggregates = location_aggregates(&[first, second]);
        assert_eq!(aggregates.len(), 1);
        assert!((aggregates[0].mean_latitude - 30.25).abs() < 1e-9);
        assert!((aggregates[0].mean_longitude - 120.15).abs() < 1e-9);
    }

    #[test]
    fn aggregates_dedupe_characters_in_first_appearance_order() {
        let records = vec![
            record("杭州", "马二先生", "游览", 6),
            record("杭州", "匡超人", "游览", 6),
            record("杭州", "马二先生", "赴宴", 6),
            record("杭州", "", "赴宴", 6),
        ];
        let aggregates = location_aggregates(&records);
        assert_eq!(aggregates[0].characters, vec!["马二先生", "匡超人"]);
    }

    #[test]
    fn aggregates_sort_activity_counts_descending() {
        let records = vec![
            record("杭州", "a", "赴宴", 6),
            record("杭州", "b", "游览", 6),
            record("杭州", "c", "游览", 6),
        ];
        let aggregates = location_aggregates(&records);
        let counts: Vec<(&str, u64)> = aggregates[0]
            .activity_counts
            .iter()
            .map(|a| (a.activity_type.as_str(), a.count))
            .collect();
        assert_eq!(counts, vec![("游览", 2), ("赴宴", 1)]);
    }

    #[test]
    fn overview_counts_distinct_values() {
        let records = vec![
            record("杭州", "马二先生", "游览", 6),
            record("杭州", "匡超人", "科举", 6),
            record("南京", "马二先生", "赴宴", 12),
        ];
        let stats = overview(&records);
        assert_eq!(stats.records, 3);
        assert_eq!(stats.locations, 2);
        assert_eq!(stats.characters, 2);
        assert_eq!(stats.chapters, 1);
    }

    #[test]
    fn empty_input_produces_empty_outputs() {
        assert!(frequency_ranking(&[]).is_empty());
        let tab = cross_tabulation(&[]);
        assert!(tab.locations.is_empty());
        assert!(tab.counts.is_empty());
        assert!(location_aggregates(&[]).is_empty());
        assert_eq!(overview(&[]).records, 0);
    }
}
