//! Query pipeline: load the filtered record set, then compute every
//! statistic group into a [`TripReport`].

use std::path::Path;
use std::time::Instant;

use bikeshare_core::error::Result;
use bikeshare_core::models::{FilterSpec, TripRecord};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::loader::load;
use crate::stats::{
    compute_duration_stats, compute_station_stats, compute_time_stats, compute_user_stats,
    DurationStats, StationStats, TimeStats, UserStats,
};

// ── Public types ──────────────────────────────────────────────────────────────

/// Wall-clock seconds spent on each statistic group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatTimings {
    pub time_seconds: f64,
    pub station_seconds: f64,
    pub duration_seconds: f64,
    pub user_seconds: f64,
}

/// All four statistic groups for one query.
///
/// `time` and `stations` are `None` when the record set was empty.
#[derive(Debug, Clone, Serialize)]
pub struct TripReport {
    pub filters: FilterSpec,
    pub time: Option<TimeStats>,
    pub stations: Option<StationStats>,
    pub durations: DurationStats,
    pub users: UserStats,
    pub timings: StatTimings,
}

/// Metadata produced alongside the report.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub filters: FilterSpec,
    /// Number of records left after filtering.
    pub records_matched: usize,
    /// Wall-clock seconds spent reading and filtering the sources.
    pub load_time_seconds: f64,
}

/// Output of [`analyze_trips`]: the record set the report was computed over,
/// kept for paging through raw trips.
#[derive(Debug, Clone)]
pub struct TripAnalysis {
    pub records: Vec<TripRecord>,
    pub report: TripReport,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run one query end to end.
///
/// Source errors abort the query; no partial report is produced.
pub fn analyze_trips(spec: FilterSpec, data_dir: &Path) -> Result<TripAnalysis> {
    let (records, load_time) = timed(|| load(&spec, data_dir));
    let records = records?;

    let report = build_report(&records, spec)?;

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        filters: spec,
        records_matched: records.len(),
        load_time_seconds: load_time,
    };

    info!(
        "Analysis complete: {} trips in {:.3}s",
        metadata.records_matched, metadata.load_time_seconds
    );

    Ok(TripAnalysis {
        records,
        report,
        metadata,
    })
}

/// Compute the four statistic groups in order over `records`.
///
/// An empty record set turns the time and station groups into `None`
/// instead of failing the report.
pub fn build_report(records: &[TripRecord], spec: FilterSpec) -> Result<TripReport> {
    let (time, time_seconds) = timed(|| compute_time_stats(records, &spec));
    let (stations, station_seconds) = timed(|| compute_station_stats(records));
    let (durations, duration_seconds) = timed(|| compute_duration_stats(records));
    let (users, user_seconds) = timed(|| compute_user_stats(records, &spec));

    Ok(TripReport {
        filters: spec,
        time: recover_empty(time)?,
        stations: recover_empty(stations)?,
        durations,
        users,
        timings: StatTimings {
            time_seconds,
            station_seconds,
            duration_seconds,
            user_seconds,
        },
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64())
}

/// Map non-fatal errors (an empty record set) to `None`; pass fatal ones
/// through.
fn recover_empty<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if !e.is_fatal() => {
            info!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::error::BikeshareError;
    use bikeshare_core::models::{City, DayOfWeek, Month};
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    fn chicago_fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "chicago.csv",
            &[
                HEADER,
                "0,2017-01-02 08:00:00,,300,A,B,Subscriber,Male,1980",
                "1,2017-01-02 08:30:00,,600,A,B,Customer,Female,1990",
                "2,2017-03-07 18:00:00,,900,C,D,Subscriber,,",
            ],
        );
        dir
    }

    // ── analyze_trips ─────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_trips_builds_full_report() {
        let dir = chicago_fixture();
        let spec = FilterSpec::all().with_city(City::Chicago);
        let analysis = analyze_trips(spec, dir.path()).unwrap();

        assert_eq!(analysis.records.len(), 3);
        assert_eq!(analysis.metadata.records_matched, 3);
        assert_eq!(analysis.metadata.filters, spec);

        let report = &analysis.report;
        assert_eq!(report.filters, spec);
        let time = report.time.as_ref().unwrap();
        assert_eq!(time.popular_hour.value, 8);
        assert_eq!(time.popular_month.as_ref().unwrap().value, 1);
        assert_eq!(report.stations.as_ref().unwrap().popular_trip.count, 2);
        assert_eq!(report.durations.total, 1800.0);
        assert_eq!(report.users.subscriber_count, 2);
        assert!(report.users.demographics.is_some());
    }

    #[test]
    fn test_analyze_trips_empty_selection_reports_no_data() {
        let dir = chicago_fixture();
        let spec = FilterSpec::all()
            .with_city(City::Chicago)
            .with_month(Month::June)
            .with_day(DayOfWeek::Friday);
        let analysis = analyze_trips(spec, dir.path()).unwrap();

        assert!(analysis.records.is_empty());
        assert!(analysis.report.time.is_none());
        assert!(analysis.report.stations.is_none());
        assert_eq!(analysis.report.durations.count, 0);
        assert!(analysis.report.durations.average.is_none());
        assert_eq!(analysis.report.users.total, 0);
    }

    #[test]
    fn test_analyze_trips_missing_source_is_fatal() {
        let dir = chicago_fixture();
        let spec = FilterSpec::all().with_city(City::Washington);
        let err = analyze_trips(spec, dir.path()).unwrap_err();
        assert!(matches!(err, BikeshareError::DataSource { .. }));
    }

    // ── build_report ──────────────────────────────────────────────────────────

    #[test]
    fn test_build_report_serialises_to_json() {
        let dir = chicago_fixture();
        let spec = FilterSpec::all().with_city(City::Chicago);
        let records = load(&spec, dir.path()).unwrap();
        let report = build_report(&records, spec).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filters"]["city"], "chicago");
        assert!(json["filters"]["month"].is_null());
        assert_eq!(json["durations"]["count"], 3);
        assert_eq!(json["stations"]["popular_trip"]["value"]["start"], "A");
        assert_eq!(json["time"]["popular_day"]["value"], "Monday");
    }

    #[test]
    fn test_recover_empty_passes_other_errors() {
        let result: Result<u32> = Err(BikeshareError::InputClosed);
        assert!(recover_empty(result).is_err());

        let result: Result<u32> = Err(BikeshareError::EmptyDataset("station"));
        assert_eq!(recover_empty(result).unwrap(), None);
    }
}
