//! CSV loading for per-city trip exports.
//!
//! Each city ships one file with a header row. Columns are matched by name, so
//! the unnamed index column and anything else the loader does not use are
//! ignored. Washington's export has no `Gender` or `Birth Year` columns.

use std::io;
use std::path::{Path, PathBuf};

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{City, Gender, TripRecord, UserType};
use bikeshare_core::time_utils::{parse_optional_timestamp, parse_timestamp};
use serde::Deserialize;
use tracing::{debug, warn};

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Start Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

// ── Raw row ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    // Blank durations keep the row; only the duration figures skip it.
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<f64>,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // Exports write birth years as floats ("1992.0").
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTrip {
    /// Convert into a [`TripRecord`]; `None` when the start time is unusable.
    fn into_record(self) -> Option<TripRecord> {
        let start_time = parse_timestamp(&self.start_time)?;
        let end_time = parse_optional_timestamp(self.end_time.as_deref());
        let user_type = self
            .user_type
            .as_deref()
            .map_or(UserType::Unknown, UserType::from_raw);
        let gender = self.gender.as_deref().and_then(Gender::from_raw);
        let birth_year = self
            .birth_year
            .filter(|y| y.is_finite())
            .map(|y| y.round() as i32);

        Some(
            TripRecord::new(
                start_time,
                self.start_station,
                self.end_station,
                self.trip_duration,
                user_type,
            )
            .with_end_time(end_time)
            .with_gender(gender)
            .with_birth_year(birth_year),
        )
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Location of `city`'s export inside `data_dir`.
pub fn source_path(data_dir: &Path, city: City) -> PathBuf {
    data_dir.join(city.file_name())
}

/// Read every trip of one city from `data_dir`.
///
/// Fails with [`BikeshareError::DataSource`] when the file is missing or an
/// I/O error interrupts reading, and with [`BikeshareError::MissingColumn`]
/// when the header lacks a required column. Rows whose required fields do not
/// parse are skipped and logged.
pub fn read_city(data_dir: &Path, city: City) -> Result<Vec<TripRecord>> {
    let path = source_path(data_dir, city);
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(&path)
        .map_err(|source| BikeshareError::DataSource {
            city,
            path: path.clone(),
            source,
        })?;

    read_trips(reader, city, &path)
}

/// Read trips from an already-open CSV reader. `path` is only used for error
/// messages and logging.
pub fn read_trips<R: io::Read>(
    mut reader: csv::Reader<R>,
    city: City,
    path: &Path,
) -> Result<Vec<TripRecord>> {
    let data_source_error = |source: csv::Error| BikeshareError::DataSource {
        city,
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(data_source_error)?.clone();
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(BikeshareError::MissingColumn {
            city,
            path: path.to_path_buf(),
            column,
        });
    }

    let mut records = Vec::new();
    let mut rows_read = 0u64;
    let mut rows_skipped = 0u64;

    for result in reader.deserialize::<RawTrip>() {
        rows_read += 1;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Err(data_source_error(e)),
            Err(e) => {
                rows_skipped += 1;
                warn!("Skipping malformed row in {}: {}", path.display(), e);
                continue;
            }
        };

        match raw.into_record() {
            Some(record) => records.push(record),
            None => {
                rows_skipped += 1;
                warn!(
                    "Skipping row {} in {}: unparseable start time",
                    rows_read,
                    path.display()
                );
            }
        }
    }

    debug!(
        "File {}: {} read, {} skipped, {} mapped",
        path.display(),
        rows_read,
        rows_skipped,
        records.len(),
    );

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
