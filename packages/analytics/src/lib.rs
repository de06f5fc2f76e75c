#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and deterministic aggregation over occurrence records.
//!
//! Every function here is a pure transformation of an immutable record
//! slice: ingestion already guarantees well-formed fields, so nothing in
//! this crate can fail, and computing the same inputs always produces the
//! same outputs regardless of ordering or concurrency.

pub mod aggregate;
pub mod filter;
