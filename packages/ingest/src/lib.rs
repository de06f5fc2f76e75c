#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Type-coercing ingestion of the occurrence dataset.
//!
//! Parses the delimited source into typed [`Record`]s, mapping headers by
//! name (canonical English or the reference dataset's Chinese labels) and
//! applying the lenient zero-fill coercion policy to numeric fields: a value
//! that fails to parse becomes its type's zero instead of aborting the load.
//! Every coercion is counted and logged so data problems stay observable.
//!
//! A structurally broken source — unreadable, malformed, or missing a
//! required column — fails the whole load; no partial table is returned.

pub mod store;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chapter_map_record_models::{Column, Record};
use thiserror::Error;

/// Errors that can occur while loading the occurrence dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source is not well-formed delimited data.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A structurally required column is absent from the header row.
    #[error("Missing required column: {name}")]
    MissingColumn {
        /// Canonical name of the missing column.
        name: &'static str,
    },
}

/// Result of a successful load: the typed table plus how many numeric
/// fields were zero-filled by the coercion policy.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Records in source order.
    pub records: Vec<Record>,
    /// Number of numeric fields that failed to parse and were zero-filled.
    pub coercions: u64,
}

/// Maps the header row to source column indexes.
///
/// Each required [`Column`] must resolve from some header cell; the first
/// matching cell wins.
fn resolve_columns(
    headers: &csv::StringRecord,
) -> Result<BTreeMap<Column, usize>, IngestError> {
    let mut indexes = BTreeMap::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(column) = Column::resolve(header) {
            indexes.entry(column).or_insert(i);
        }
    }
    for column in Column::all() {
        if !indexes.contains_key(column) {
            return Err(IngestError::MissingColumn {
                name: column.name(),
            });
        }
    }
    Ok(indexes)
}

/// Parses a non-negative integer field, zero-filling on failure.
///
/// Accepts plain integers as well as integral floats (spreadsheet exports
/// frequently render counts as `"12.0"`). Anything else — including
/// negative, fractional, or non-numeric input — coerces to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_u32(raw: &str, column: Column, row: u64, coercions: &mut u64) -> u32 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return value;
    }
    if let Ok(value) = trimmed.parse::<f64>()
        && value.is_finite()
        && value >= 0.0
        && value <= f64::from(u32::MAX)
        && value.fract() == 0.0
    {
        return value as u32;
    }
    *coercions += 1;
    log::debug!(
        "Row {row}: coerced unparsable {} value {trimmed:?} to 0",
        column.name()
    );
    0
}

/// Parses a coordinate field, zero-filling on failure.
///
/// Non-finite values count as failures: downstream treats exactly-zero
/// coordinates as missing, so `inf`/`NaN` must not leak through.
fn coerce_f64(raw: &str, column: Column, row: u64, coercions: &mut u64) -> f64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>()
        && value.is_finite()
    {
        return value;
    }
    *coercions += 1;
    log::debug!(
        "Row {row}: coerced unparsable {} value {trimmed:?} to 0.0",
        column.name()
    );
    0.0
}

/// Parses delimited occurrence data from a reader into typed records.
///
/// Records are returned in source order; order is preserved downstream for
/// all "first occurrence" semantics.
///
/// # Errors
///
/// Returns an error if the source cannot be read, is not well-formed
/// delimited data, or lacks a required column.
pub fn read_records<R: Read>(reader: R) -> Result<LoadOutcome, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let indexes = resolve_columns(csv_reader.headers()?)?;
    let field = |record: &csv::StringRecord, column: Column| -> String {
        record
            .get(indexes[&column])
            .unwrap_or("")
            .trim()
            .to_owned()
    };

    let mut records = Vec::new();
    let mut coercions: u64 = 0;

    for result in csv_reader.records() {
        let raw = result?;
        let row = records.len() as u64 + 1;

        records.push(Record {
            chapter: coerce_u32(&field(&raw, Column::Chapter), Column::Chapter, row, &mut coercions),
            location: field(&raw, Column::Location),
            latitude: coerce_f64(&field(&raw, Column::Latitude), Column::Latitude, row, &mut coercions),
            longitude: coerce_f64(&field(&raw, Column::Longitude), Column::Longitude, row, &mut coercions),
            character: field(&raw, Column::Character),
            activity_type: field(&raw, Column::ActivityType),
            activity_description: field(&raw, Column::ActivityDescription),
            source_excerpt: field(&raw, Column::SourceExcerpt),
            chapter_frequency: coerce_u32(
                &field(&raw, Column::ChapterFrequency),
                Column::ChapterFrequency,
                row,
                &mut coercions,
            ),
            total_frequency: coerce_u32(
                &field(&raw, Column::TotalFrequency),
                Column::TotalFrequency,
                row,
                &mut coercions,
            ),
        });
    }

    if coercions > 0 {
        log::warn!(
            "Zero-filled {coercions} unparsable numeric field(s) across {} record(s)",
            records.len()
        );
    }
    log::info!("Parsed {} occurrence record(s)", records.len());

    Ok(LoadOutcome { records, coercions })
}

/// Loads the occurrence dataset from a file path.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or [`read_records`] fails.
pub fn load_path(path: &Path) -> Result<LoadOutcome, IngestError> {
    log::info!("Loading occurrence data from {}", path.display());
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}
