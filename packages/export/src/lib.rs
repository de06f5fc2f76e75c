#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV serialization of filtered occurrence records.
//!
//! Serializes an (already-filtered) record sequence to UTF-8 CSV with the
//! canonical column order. The blob starts with a byte-order mark so
//! spreadsheet tools detect the encoding of the Chinese text correctly.
//! Quoting and escaping follow RFC 4180 via the `csv` crate; an empty
//! input yields a header-only blob, never a failure.

use std::path::Path;

use chapter_map_record_models::{Column, Record};
use thiserror::Error;

/// UTF-8 byte-order mark prepended to every export for spreadsheet
/// compatibility.
pub const UTF8_BOM: &str = "\u{feff}";

/// Errors that can occur while exporting records.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The serialized bytes were not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes records to a BOM-prefixed CSV blob in canonical column
/// order: chapter, location, latitude, longitude, character,
/// `activity_type`, `activity_description`, `source_excerpt`,
/// `chapter_frequency`, `total_frequency`.
///
/// # Errors
///
/// Returns an error if CSV serialization fails.
pub fn to_csv(records: &[Record]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(Column::all().iter().map(|column| column.name()))?;
    for record in records {
        writer.write_record([
            record.chapter.to_string(),
            record.location.clone(),
            record.latitude.to_string(),
            record.longitude.to_string(),
            record.character.clone(),
            record.activity_type.clone(),
            record.activity_description.clone(),
            record.source_excerpt.clone(),
            record.chapter_frequency.to_string(),
            record.total_frequency.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    let body = String::from_utf8(bytes)?;
    Ok(format!("{UTF8_BOM}{body}"))
}

/// Serializes records with [`to_csv`] and writes the blob to `path`.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_csv(path: &Path, records: &[Record]) -> Result<(), ExportError> {
    let blob = to_csv(records)?;
    std::fs::write(path, blob)?;
    log::info!("Exported {} record(s) to {}", records.len(), path.display());
    Ok(())
}
