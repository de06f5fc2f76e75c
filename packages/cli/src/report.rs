//! Plain-text rendering of pipeline outputs for the terminal.
//!
//! Rendering stays out of the core crates: these helpers consume the
//! aggregation results and print aligned tables, nothing more.

use chapter_map_analytics_models::{CrossTab, DatasetOverview, LocationFrequency};
use chapter_map_record_models::Record;

/// Prints the dataset overview banner.
pub fn print_overview(stats: &DatasetOverview, coercions: u64) {
    println!(
        "{} record(s) across {} location(s), {} character(s), {} chapter(s)",
        stats.records, stats.locations, stats.characters, stats.chapters
    );
    if coercions > 0 {
        println!("({coercions} unparsable numeric field(s) were zero-filled during load)");
    }
}

/// Prints up to `limit` records as an aligned table.
pub fn print_records(records: &[Record], limit: usize) {
    println!(
        "{:<8} {:<12} {:<10} {:<10} {:<12} {:<10} {:>6} {:>6}",
        "CHAPTER", "LOCATION", "LAT", "LON", "CHARACTER", "ACTIVITY", "CH.FREQ", "TOTAL"
    );
    println!("{}", "-".repeat(84));
    for record in records.iter().take(limit) {
        println!(
            "{:<8} {:<12} {:<10} {:<10} {:<12} {:<10} {:>6} {:>6}",
            record.chapter,
            record.location,
            record.latitude,
            record.longitude,
            record.character,
            record.activity_type,
            record.chapter_frequency,
            record.total_frequency
        );
    }
    if records.len() > limit {
        println!("... {} more record(s)", records.len() - limit);
    }
}

/// Prints the frequency ranking, highest first.
pub fn print_ranking(ranking: &[LocationFrequency]) {
    if ranking.is_empty() {
        println!("No records match the current selection.");
        return;
    }
    println!("{:<16} TOTAL FREQUENCY", "LOCATION");
    println!("{}", "-".repeat(34));
    for entry in ranking {
        println!("{:<16} {}", entry.location, entry.total_frequency);
    }
}

/// Prints the location x activity-type count matrix.
pub fn print_cross_tab(tab: &CrossTab) {
    if tab.locations.is_empty() {
        println!("No records match the current selection.");
        return;
    }

    print!("{:<16}", "LOCATION");
    for activity in &tab.activity_types {
        print!(" {activity:>10}");
    }
    println!(" {:>10}", "TOTAL");

    for (row, location) in tab.locations.iter().enumerate() {
        print!("{location:<16}");
        for count in &tab.counts[row] {
            print!(" {count:>10}");
        }
        println!(" {:>10}", tab.row_total(row));
    }
}
