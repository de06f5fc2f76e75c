//! Conjunctive set-membership filtering.

use chapter_map_record_models::{FilterSelection, Record};

/// Returns the subsequence of `records` whose location, activity type, and
/// chapter are all members of the corresponding selection sets.
///
/// Source order is preserved and the base table is never mutated, so the
/// result is a stable view suitable for "first occurrence" semantics
/// downstream. Selection values absent from the data match nothing; a
/// selection equal to the full observed domain returns all records.
#[must_use]
pub fn filter_records(records: &[Record], selection: &FilterSelection) -> Vec<Record> {
    records
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chapter_map_record_models::FilterSelection;

    use super::*;

    fn record(location: &str, activity_type: &str, chapter: u32) -> Record {
        Record {
            chapter,
            location: location.to_owned(),
            latitude: 30.25,
            longitude: 120.17,
            character: "匡超人".to_owned(),
            activity_type: activity_type.to_owned(),
            activity_description: String::new(),
            source_excerpt: String::new(),
            chapter_frequency: 1,
            total_frequency: 2,
        }
    }

    fn dataset() -> Vec<Record> {
        vec![
            record("杭州", "游览", 1),
            record("南京", "赴宴", 2),
            record("杭州", "科举", 3),
            record("京师", "科举", 3),
        ]
    }

    #[test]
    fn full_domain_selection_is_identity() {
        let records = dataset();
        let selection = FilterSelection::select_all(&records);
        assert_eq!(filter_records(&records, &selection), records);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = dataset();
        let mut selection = FilterSelection::select_all(&records);
        selection.chapters.remove(&2);

        let once = filter_records(&records, &selection);
        let twice = filter_records(&once, &selection);
        assert_eq!(once, twice);
    }

    #[test]
    fn conjunction_requires_all_dimensions() {
        let records = dataset();
        let mut selection = FilterSelection::select_all(&records);
        selection.locations.remove("杭州");
        selection.activity_types.remove("赴宴");

        let filtered = filter_records(&records, &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].location, "京师");
    }

    #[test]
    fn empty_dimension_yields_empty_result() {
        let records = dataset();
        let mut selection = FilterSelection::select_all(&records);
        selection.activity_types.clear();
        assert!(filter_records(&records, &selection).is_empty());
    }

    #[test]
    fn unknown_selection_values_do_not_error() {
        let records = dataset();
        let mut selection = FilterSelection::select_all(&records);
        selection.locations.insert("扬州".to_owned());
        assert_eq!(filter_records(&records, &selection), records);
    }

    #[test]
    fn preserves_source_order() {
        let records = dataset();
        let mut selection = FilterSelection::select_all(&records);
        selection.chapters.remove(&2);

        let filtered = filter_records(&records, &selection);
        let locations: Vec<&str> = filtered.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(locations, vec!["杭州", "杭州", "京师"]);
    }
}
