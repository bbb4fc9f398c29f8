//! The four statistic groups computed over a filtered record set.
//!
//! Every function takes the records by shared reference and never mutates
//! them, so repeated calls over the same slice return equal results.

use std::fmt;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{DayOfWeek, FilterSpec, Gender, TripRecord, UserType};
use serde::Serialize;

use crate::aggregator::{Popular, Tally};

// ── Report types ──────────────────────────────────────────────────────────────

/// Most frequent travel times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Most common calendar month (1..=12). Absent when both a month and a day
    /// filter are active.
    pub popular_month: Option<Popular<u32>>,
    /// Absent under the same condition as `popular_month`.
    pub popular_day: Option<Popular<DayOfWeek>>,
    /// Most common start hour (0..=23).
    pub popular_hour: Popular<u32>,
}

/// A directed trip between two stations; A→B and B→A are distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

impl fmt::Display for StationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub popular_start: Popular<String>,
    pub popular_end: Popular<String>,
    pub popular_trip: Popular<StationPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    /// Sum of trip durations in seconds.
    pub total: f64,
    /// Trips that carried a usable duration.
    pub count: usize,
    /// `total / count`; absent for an empty record set.
    pub average: Option<f64>,
}

/// Gender and birth-year breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Demographics {
    pub male: usize,
    pub female: usize,
    /// Records with no gender recorded.
    pub unspecified: usize,
    pub earliest_birth_year: Option<i32>,
    pub latest_birth_year: Option<i32>,
    pub most_common_birth_year: Option<Popular<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub subscriber_count: usize,
    pub customer_count: usize,
    /// Absent when the query is restricted to a city without gender and
    /// birth-year data.
    pub demographics: Option<Demographics>,
}

// ── Time of travel ────────────────────────────────────────────────────────────

/// Most common month, day and start hour.
///
/// Month and day are left out when `spec` restricts both, since every record
/// then shares them. Fails with [`BikeshareError::EmptyDataset`] on an empty
/// slice.
pub fn compute_time_stats(records: &[TripRecord], spec: &FilterSpec) -> Result<TimeStats> {
    let hours: Tally<u32> = records.iter().map(TripRecord::start_hour).collect();
    let popular_hour = hours
        .most_common()
        .ok_or(BikeshareError::EmptyDataset("time of travel"))?
        .map(|h| *h);

    let (popular_month, popular_day) = if spec.has_month_and_day() {
        (None, None)
    } else {
        let months: Tally<u32> = records.iter().map(TripRecord::month).collect();
        let days: Tally<DayOfWeek> = records.iter().map(TripRecord::day_of_week).collect();
        (
            months.most_common().map(|p| p.map(|m| *m)),
            days.most_common().map(|p| p.map(|d| *d)),
        )
    };

    Ok(TimeStats {
        popular_month,
        popular_day,
        popular_hour,
    })
}

// ── Stations ──────────────────────────────────────────────────────────────────

/// Most common start station, end station and directed trip.
///
/// Fails with [`BikeshareError::EmptyDataset`] on an empty slice.
pub fn compute_station_stats(records: &[TripRecord]) -> Result<StationStats> {
    let mut starts: Tally<&str> = Tally::new();
    let mut ends: Tally<&str> = Tally::new();
    let mut trips: Tally<(&str, &str)> = Tally::new();

    for record in records {
        let (start, end) = (record.start_station.as_str(), record.end_station.as_str());
        starts.add(start);
        ends.add(end);
        trips.add((start, end));
    }

    let empty = || BikeshareError::EmptyDataset("station");
    let popular_start = starts.most_common().ok_or_else(empty)?;
    let popular_end = ends.most_common().ok_or_else(empty)?;
    let popular_trip = trips.most_common().ok_or_else(empty)?;

    Ok(StationStats {
        popular_start: popular_start.map(|s| s.to_string()),
        popular_end: popular_end.map(|s| s.to_string()),
        popular_trip: popular_trip.map(|(start, end)| StationPair {
            start: start.to_string(),
            end: end.to_string(),
        }),
    })
}

// ── Durations ─────────────────────────────────────────────────────────────────

/// Total, count and mean trip duration over records that have one. No such
/// record yields zero totals and no average.
pub fn compute_duration_stats(records: &[TripRecord]) -> DurationStats {
    let durations: Vec<f64> = records.iter().filter_map(|r| r.trip_duration_seconds).collect();
    let total: f64 = durations.iter().sum();
    let count = durations.len();
    let average = (count > 0).then(|| total / count as f64);

    DurationStats {
        total,
        count,
        average,
    }
}

// ── Users ─────────────────────────────────────────────────────────────────────

/// User-type counts plus demographics where `spec` allows them.
///
/// Records of an unknown user type count toward `total` only. In a merged
/// multi-city set, records without gender count as `unspecified` and records
/// without a birth year are left out of the birth-year figures.
pub fn compute_user_stats(records: &[TripRecord], spec: &FilterSpec) -> UserStats {
    let count_type = |t: UserType| records.iter().filter(|r| r.user_type == t).count();

    UserStats {
        total: records.len(),
        subscriber_count: count_type(UserType::Subscriber),
        customer_count: count_type(UserType::Customer),
        demographics: spec
            .includes_demographics()
            .then(|| compute_demographics(records)),
    }
}

fn compute_demographics(records: &[TripRecord]) -> Demographics {
    let mut male = 0;
    let mut female = 0;
    let mut unspecified = 0;
    for record in records {
        match record.gender {
            Some(Gender::Male) => male += 1,
            Some(Gender::Female) => female += 1,
            None => unspecified += 1,
        }
    }

    let birth_years: Tally<i32> = records.iter().filter_map(|r| r.birth_year).collect();
    let earliest_birth_year = records.iter().filter_map(|r| r.birth_year).min();
    let latest_birth_year = records.iter().filter_map(|r| r.birth_year).max();

    Demographics {
        male,
        female,
        unspecified,
        earliest_birth_year,
        latest_birth_year,
        most_common_birth_year: birth_years.most_common().map(|p| p.map(|y| *y)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
