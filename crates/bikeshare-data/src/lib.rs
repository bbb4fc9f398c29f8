//! Data layer for the bikeshare explorer.
//!
//! Reads per-city CSV trip exports, normalises and filters them into a record
//! set, computes the four statistic groups and pages through raw records.

pub mod aggregator;
pub mod analysis;
pub mod loader;
pub mod pagination;
pub mod reader;
pub mod stats;

pub use bikeshare_core as core;
