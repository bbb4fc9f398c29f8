//! Console rendering of trip reports, raw-trip pages and errors.

use std::io::{self, Write};

use bikeshare_core::error::BikeshareError;
use bikeshare_core::formatting::{format_count, format_duration, format_hour, format_number};
use bikeshare_core::models::{calendar_month_name, City};
use bikeshare_data::aggregator::Popular;
use bikeshare_data::analysis::{TripAnalysis, TripReport};
use bikeshare_data::pagination::Page;
use bikeshare_data::stats::{Demographics, DurationStats, StationStats, TimeStats, UserStats};

use crate::themes::Theme;

const SEPARATOR_WIDTH: usize = 40;

/// Render all four statistic groups as styled text.
pub fn render_report<W: Write>(out: &mut W, report: &TripReport, theme: &Theme) -> io::Result<()> {
    let timings = &report.timings;

    heading(out, theme, "Calculating The Most Frequent Times of Travel...")?;
    match &report.time {
        Some(time) => render_time(out, time, theme)?,
        None => no_data(out, theme)?,
    }
    footer(out, theme, timings.time_seconds)?;

    heading(out, theme, "Calculating The Most Popular Stations and Trip...")?;
    match &report.stations {
        Some(stations) => render_stations(out, stations, theme)?,
        None => no_data(out, theme)?,
    }
    footer(out, theme, timings.station_seconds)?;

    heading(out, theme, "Calculating Trip Duration...")?;
    render_durations(out, &report.durations, theme)?;
    footer(out, theme, timings.duration_seconds)?;

    heading(out, theme, "Calculating User Stats...")?;
    render_users(out, &report.users, report.filters.city, theme)?;
    footer(out, theme, timings.user_seconds)?;

    Ok(())
}

/// Render the report and its metadata as one pretty JSON document.
pub fn render_report_json<W: Write>(out: &mut W, analysis: &TripAnalysis) -> io::Result<()> {
    let document = serde_json::json!({
        "metadata": analysis.metadata,
        "report": analysis.report,
    });
    let text = serde_json::to_string_pretty(&document).map_err(io::Error::other)?;
    writeln!(out, "{}", text)
}

/// Print one page of raw trips as JSON framed by chunk markers.
pub fn render_page<W: Write>(out: &mut W, page: &Page<'_>, theme: &Theme) -> io::Result<()> {
    let json = page.to_json().map_err(io::Error::other)?;
    writeln!(
        out,
        "\n{}",
        Theme::paint(theme.heading, format!("Chunk [{}/{}]", page.number, page.total))
    )?;
    writeln!(out, "{}", json)?;
    writeln!(
        out,
        "{}",
        Theme::paint(
            theme.dim,
            format!("End of Chunk [{}/{}]", page.number, page.total)
        )
    )?;
    separator(out, theme)
}

/// Describe a failed query, with a hint when the source files are the cause.
pub fn render_error<W: Write>(out: &mut W, err: &BikeshareError, theme: &Theme) -> io::Result<()> {
    writeln!(out, "\n{}", Theme::paint(theme.error, err))?;
    if matches!(
        err,
        BikeshareError::DataSource { .. }
            | BikeshareError::MissingColumn { .. }
            | BikeshareError::DataPathNotFound(_)
    ) {
        let files: Vec<&str> = City::ALL.iter().map(|c| c.file_name()).collect();
        writeln!(
            out,
            "{}",
            Theme::paint(
                theme.notice,
                format!(
                    "Unable to run the analysis. Please make sure {} are in the data directory (see --data-dir).",
                    files.join(", ")
                )
            )
        )?;
    }
    Ok(())
}

pub fn separator<W: Write>(out: &mut W, theme: &Theme) -> io::Result<()> {
    writeln!(out, "{}", Theme::paint(theme.dim, "-".repeat(SEPARATOR_WIDTH)))
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_time<W: Write>(out: &mut W, time: &TimeStats, theme: &Theme) -> io::Result<()> {
    if let Some(month) = &time.popular_month {
        let name = calendar_month_name(month.value).unwrap_or("Unknown");
        popular_line(out, theme, "Most popular month", name, month)?;
    }
    if let Some(day) = &time.popular_day {
        popular_line(out, theme, "Most popular day", day.value, day)?;
    }
    let hour = &time.popular_hour;
    popular_line(
        out,
        theme,
        "Most popular start hour",
        format!("{} ({}:00)", format_hour(hour.value), hour.value),
        hour,
    )
}

fn render_stations<W: Write>(out: &mut W, stations: &StationStats, theme: &Theme) -> io::Result<()> {
    let start = &stations.popular_start;
    popular_line(out, theme, "Most popular start station", &start.value, start)?;
    let end = &stations.popular_end;
    popular_line(out, theme, "Most popular end station", &end.value, end)?;
    let trip = &stations.popular_trip;
    popular_line(out, theme, "Most frequent trip", &trip.value, trip)
}

fn render_durations<W: Write>(out: &mut W, durations: &DurationStats, theme: &Theme) -> io::Result<()> {
    field(
        out,
        theme,
        "Total duration",
        format!(
            "{} s ({})",
            format_number(durations.total, 0),
            format_duration(durations.total)
        ),
    )?;
    field(out, theme, "Trips", format_count(durations.count))?;
    let average = match durations.average {
        Some(avg) => format!("{} s ({})", format_number(avg, 2), format_duration(avg)),
        None => "n/a (no trips)".to_string(),
    };
    field(out, theme, "Average duration", average)
}

fn render_users<W: Write>(
    out: &mut W,
    users: &UserStats,
    city: Option<City>,
    theme: &Theme,
) -> io::Result<()> {
    field(out, theme, "Total users", format_count(users.total))?;
    field(out, theme, "Subscribers", format_count(users.subscriber_count))?;
    field(out, theme, "Customers", format_count(users.customer_count))?;

    match &users.demographics {
        Some(demo) => render_demographics(out, demo, theme),
        None => {
            let city = city.map_or_else(|| "this selection".to_string(), |c| c.to_string());
            writeln!(
                out,
                "\n{}",
                Theme::paint(
                    theme.notice,
                    format!(
                        "Unfortunately gender and birth information is not available for {}.",
                        city
                    )
                )
            )
        }
    }
}

fn render_demographics<W: Write>(out: &mut W, demo: &Demographics, theme: &Theme) -> io::Result<()> {
    field(out, theme, "Male", format_count(demo.male))?;
    field(out, theme, "Female", format_count(demo.female))?;
    field(out, theme, "Not specified", format_count(demo.unspecified))?;

    let year = |y: Option<i32>| y.map_or_else(|| "n/a".to_string(), |y| y.to_string());
    field(out, theme, "Earliest birth year", year(demo.earliest_birth_year))?;
    field(out, theme, "Most recent birth year", year(demo.latest_birth_year))?;
    match &demo.most_common_birth_year {
        Some(mode) => popular_line(out, theme, "Most common birth year", mode.value, mode),
        None => field(out, theme, "Most common birth year", "n/a"),
    }
}

// ── Line helpers ──────────────────────────────────────────────────────────────

fn heading<W: Write>(out: &mut W, theme: &Theme, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}\n", Theme::paint(theme.heading, title))
}

fn footer<W: Write>(out: &mut W, theme: &Theme, seconds: f64) -> io::Result<()> {
    writeln!(
        out,
        "\n{}",
        Theme::paint(theme.dim, format!("This took {:.6} seconds.", seconds))
    )?;
    separator(out, theme)
}

fn no_data<W: Write>(out: &mut W, theme: &Theme) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        Theme::paint(theme.notice, "No data for the selected filters.")
    )
}

fn field<W: Write>(
    out: &mut W,
    theme: &Theme,
    label: &str,
    value: impl std::fmt::Display,
) -> io::Result<()> {
    writeln!(
        out,
        "{}: {}",
        Theme::paint(theme.label, label),
        Theme::paint(theme.value, value)
    )
}

fn popular_line<W: Write, T>(
    out: &mut W,
    theme: &Theme,
    label: &str,
    value: impl std::fmt::Display,
    popular: &Popular<T>,
) -> io::Result<()> {
    writeln!(
        out,
        "{}: {}, {} {}",
        Theme::paint(theme.label, label),
        Theme::paint(theme.value, value),
        Theme::paint(theme.label, "Count:"),
        format_count(popular.count)
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
