use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::{FilterSpec, ALL_KEYWORD};

/// Trips shown per page unless `--page-size` says otherwise.
pub const DEFAULT_PAGE_SIZE: u16 = 5;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Explore US bikeshare trip data",
    version
)]
pub struct Settings {
    /// City to analyse; omit to choose interactively
    #[arg(long, ignore_case = true, value_parser = ["chicago", "new york city", "washington", "all"])]
    pub city: Option<String>,

    /// Month filter (only used together with --city)
    #[arg(long, default_value = "all", ignore_case = true, value_parser = ["all", "january", "february", "march", "april", "may", "june"])]
    pub month: String,

    /// Day-of-week filter (only used together with --city)
    #[arg(long, default_value = "all", ignore_case = true, value_parser = ["all", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"])]
    pub day: String,

    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, env = "BIKESHARE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Number of raw trips shown per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub page_size: u16,

    /// Report output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["auto", "dark", "light", "plain"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse CLI arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The filter requested on the command line.
    ///
    /// Returns `Ok(None)` when `--city` was not given, meaning the filter is to
    /// be collected interactively.
    pub fn filter_spec(&self) -> Result<Option<FilterSpec>> {
        match &self.city {
            None => Ok(None),
            Some(city) => FilterSpec::parse(city, &self.month, &self.day).map(Some),
        }
    }

    /// `true` when the month or day flag was set without `--city`; those flags
    /// only apply to a single non-interactive query.
    pub fn has_orphan_time_filters(&self) -> bool {
        self.city.is_none()
            && !(self.month.eq_ignore_ascii_case(ALL_KEYWORD)
                && self.day.eq_ignore_ascii_case(ALL_KEYWORD))
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
