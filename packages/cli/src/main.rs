#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI front end for the chapter occurrence pipeline.
//!
//! Thin glue over the core crates: loads the dataset, builds a filter
//! selection from flags (absent flag = all observed values), and hands the
//! filtered table to the aggregation, marker, or export consumer. Running
//! without a subcommand enters the interactive mode, which gathers the
//! three filter dimensions through multi-select prompts.

mod interactive;
mod report;

use std::path::PathBuf;

use chapter_map_analytics::aggregate::{
    cross_tabulation, frequency_ranking, location_aggregates, overview,
};
use chapter_map_analytics::filter::filter_records;
use chapter_map_geography::{marker_layer, synthesize_markers};
use chapter_map_record_models::{FilterSelection, Record};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chapter_map_cli", about = "Chapter occurrence analysis tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Dataset path plus the three optional filter dimensions, shared by every
/// subcommand.
#[derive(Args)]
struct QueryArgs {
    /// Path to the occurrence dataset (CSV)
    #[arg(long)]
    data: PathBuf,
    /// Comma-separated locations to retain (default: all observed)
    #[arg(long)]
    locations: Option<String>,
    /// Comma-separated activity types to retain (default: all observed)
    #[arg(long)]
    activities: Option<String>,
    /// Comma-separated chapter numbers to retain (default: all observed)
    #[arg(long)]
    chapters: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dataset overview counts and the first records
    Overview {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Rank locations by dataset-wide frequency
    Rank {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Print the location x activity-type count matrix
    Crosstab {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Write the map marker layer as GeoJSON
    Markers {
        #[command(flatten)]
        query: QueryArgs,
        /// Output path; stdout if omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export the filtered records as BOM-prefixed CSV
    Export {
        #[command(flatten)]
        query: QueryArgs,
        /// Output path
        #[arg(long, default_value = "filtered_records.csv")]
        out: PathBuf,
    },
}

/// Builds the effective selection: every dimension defaults to the full
/// observed domain, then each provided flag replaces its dimension.
fn build_selection(records: &[Record], query: &QueryArgs) -> FilterSelection {
    let mut selection = FilterSelection::select_all(records);

    if let Some(locations) = &query.locations {
        selection.locations = locations
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(activities) = &query.activities {
        selection.activity_types = activities
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(chapters) = &query.chapters {
        selection.chapters = chapters
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                let parsed = trimmed.parse().ok();
                if parsed.is_none() {
                    log::warn!("Ignoring unparsable chapter filter value {trimmed:?}");
                }
                parsed
            })
            .collect();
    }

    selection
}

/// Loads the dataset and applies the flag-driven selection.
fn load_filtered(query: &QueryArgs) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let outcome = chapter_map_ingest::load_path(&query.data)?;
    let selection = build_selection(&outcome.records, query);
    Ok(filter_records(&outcome.records, &selection))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run();
    };

    match command {
        Commands::Overview { query } => {
            let outcome = chapter_map_ingest::load_path(&query.data)?;
            let selection = build_selection(&outcome.records, &query);
            let filtered = filter_records(&outcome.records, &selection);
            report::print_overview(&overview(&outcome.records), outcome.coercions);
            report::print_records(&filtered, 10);
        }
        Commands::Rank { query } => {
            let filtered = load_filtered(&query)?;
            report::print_ranking(&frequency_ranking(&filtered));
        }
        Commands::Crosstab { query } => {
            let filtered = load_filtered(&query)?;
            report::print_cross_tab(&cross_tabulation(&filtered));
        }
        Commands::Markers { query, out } => {
            let filtered = load_filtered(&query)?;
            let markers = synthesize_markers(&location_aggregates(&filtered));
            let layer = serde_json::to_string_pretty(&marker_layer(&markers))?;
            match out {
                Some(path) => {
                    std::fs::write(&path, layer)?;
                    log::info!("Wrote {} marker(s) to {}", markers.len(), path.display());
                }
                None => println!("{layer}"),
            }
        }
        Commands::Export { query, out } => {
            let filtered = load_filtered(&query)?;
            chapter_map_export::write_csv(&out, &filtered)?;
            println!("Exported {} record(s) to {}", filtered.len(), out.display());
        }
    }

    Ok(())
}
