//! Builds the working record set for one query.
//!
//! Picks the source file(s) named by the filter, tags merged records with
//! their city, and narrows the result by month and day.

use std::path::Path;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{City, FilterSpec, TripRecord};
use tracing::{debug, info};

use crate::reader::read_city;

/// Load and filter the trips selected by `spec` from `data_dir`.
///
/// * City set: only that city's file is read and `source_city` stays `None`.
/// * City absent: every city is read in [`City::ALL`] order and each record
///   is tagged with its origin.
///
/// Month and day restrictions are applied afterwards. An empty result is not
/// an error.
pub fn load(spec: &FilterSpec, data_dir: &Path) -> Result<Vec<TripRecord>> {
    if !data_dir.is_dir() {
        return Err(BikeshareError::DataPathNotFound(data_dir.to_path_buf()));
    }

    let records = match spec.city {
        Some(city) => read_city(data_dir, city)?,
        None => load_all_cities(data_dir)?,
    };
    let loaded = records.len();

    let filtered = apply_time_filters(records, spec);
    info!(
        "Loaded {} trips, {} match filters ({})",
        loaded,
        filtered.len(),
        spec
    );

    Ok(filtered)
}

/// Read every city's file and merge them in [`City::ALL`] order, tagging each
/// record with its source city.
pub fn load_all_cities(data_dir: &Path) -> Result<Vec<TripRecord>> {
    let mut merged = Vec::new();
    for city in City::ALL {
        let records = read_city(data_dir, city)?;
        debug!("{}: {} trips", city, records.len());
        merged.extend(records.into_iter().map(|r| r.with_source_city(city)));
    }
    Ok(merged)
}

/// Keep only records matching the month and day parts of `spec`.
///
/// Surviving records are neither modified nor reordered.
pub fn apply_time_filters(mut records: Vec<TripRecord>, spec: &FilterSpec) -> Vec<TripRecord> {
    if spec.month.is_some() || spec.day.is_some() {
        records.retain(|r| spec.matches(r));
    }
    records
}

// ── Tests ─────────────────────────────────────────────────────────────────────
