//! Interactive mode for the occurrence pipeline.
//!
//! Prompts for the dataset path once, then loops: multi-select the three
//! filter dimensions (everything pre-selected, matching the "all observed
//! values" default), show the ranking and cross-tabulation, and offer the
//! marker-layer and CSV exports. Reloads between iterations go through the
//! memoizing [`RecordStore`], so an unchanged source is never re-read.

use std::path::{Path, PathBuf};

use chapter_map_analytics::aggregate::{
    cross_tabulation, frequency_ranking, location_aggregates, overview,
};
use chapter_map_analytics::filter::filter_records;
use chapter_map_geography::{marker_layer, synthesize_markers};
use chapter_map_ingest::store::RecordStore;
use chapter_map_record_models::{FilterSelection, Record};
use dialoguer::{Confirm, Input, MultiSelect};

use crate::report;

/// Runs the interactive filter-and-report loop.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Chapter Map");
    println!();

    let data: String = Input::new()
        .with_prompt("Path to the occurrence dataset (CSV)")
        .interact_text()?;
    let path = PathBuf::from(data.trim());

    let store = RecordStore::new();

    loop {
        let records = store.get_or_load(&path)?;
        report::print_overview(&overview(&records), store.coercions(&path).unwrap_or(0));
        println!();

        let selection = prompt_selection(&records)?;
        let filtered = filter_records(&records, &selection);

        if filtered.is_empty() {
            println!("No records match the current selection.");
        } else {
            println!();
            report::print_ranking(&frequency_ranking(&filtered));
            println!();
            report::print_cross_tab(&cross_tabulation(&filtered));
            println!();

            if Confirm::new()
                .with_prompt("Write marker layer GeoJSON?")
                .default(false)
                .interact()?
            {
                let out: String = Input::new()
                    .with_prompt("Output path")
                    .default("markers.geojson".to_owned())
                    .interact_text()?;
                let markers = synthesize_markers(&location_aggregates(&filtered));
                let layer = serde_json::to_string_pretty(&marker_layer(&markers))?;
                std::fs::write(out.trim(), layer)?;
                println!("Wrote {} marker(s) to {}", markers.len(), out.trim());
            }

            if Confirm::new()
                .with_prompt("Export filtered records to CSV?")
                .default(false)
                .interact()?
            {
                let out: String = Input::new()
                    .with_prompt("Output path")
                    .default("filtered_records.csv".to_owned())
                    .interact_text()?;
                chapter_map_export::write_csv(Path::new(out.trim()), &filtered)?;
                println!("Exported {} record(s) to {}", filtered.len(), out.trim());
            }
        }

        println!();
        if !Confirm::new()
            .with_prompt("Adjust filters and run again?")
            .default(true)
            .interact()?
        {
            break;
        }
    }

    Ok(())
}

/// Gathers the three filter dimensions through multi-select prompts, with
/// every observed value pre-selected.
fn prompt_selection(records: &[Record]) -> Result<FilterSelection, dialoguer::Error> {
    let full = FilterSelection::select_all(records);

    let locations: Vec<String> = full.locations.into_iter().collect();
    let activity_types: Vec<String> = full.activity_types.into_iter().collect();
    let chapters: Vec<String> = full.chapters.iter().map(ToString::to_string).collect();

    Ok(FilterSelection {
        locations: multi_select("Locations", &locations)?.into_iter().collect(),
        activity_types: multi_select("Activity types", &activity_types)?
            .into_iter()
            .collect(),
        chapters: multi_select("Chapters", &chapters)?
            .iter()
            .filter_map(|c| c.parse().ok())
            .collect(),
    })
}

/// Prompts a multi-select over `items` with everything pre-selected and
/// returns the chosen values.
fn multi_select(prompt: &str, items: &[String]) -> Result<Vec<String>, dialoguer::Error> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let defaults = vec![true; items.len()];
    let picked = MultiSelect::new()
        .with_prompt(prompt)
        .items(items)
        .defaults(&defaults)
        .interact()?;
    Ok(picked.into_iter().map(|i| items[i].clone()).collect())
}
