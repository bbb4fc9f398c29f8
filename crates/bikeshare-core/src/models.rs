use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{BikeshareError, Result};

/// Keyword that stands for "no restriction" in every filter prompt and flag.
pub const ALL_KEYWORD: &str = "all";

// ── City ──────────────────────────────────────────────────────────────────────

/// A city with a bikeshare source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Every known city, in the fixed order used when merging sources.
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Source file name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Lowercase name accepted at the input boundary.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Whether the city's source carries gender and birth-year columns.
    pub fn has_demographics(self) -> bool {
        !matches!(self, City::Washington)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        f.write_str(name)
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = normalise_input(s);
        match normalised.as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(BikeshareError::invalid_filter("city", s)),
        }
    }
}

// ── Month ─────────────────────────────────────────────────────────────────────

/// A month the source data covers. The published datasets stop at June.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// Calendar number, January = 1.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = normalise_input(s);
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(&normalised))
            .ok_or_else(|| BikeshareError::invalid_filter("month", s))
    }
}

/// English name of any calendar month number (1..=12), used for reporting
/// derived months that fall outside the filterable range.
pub fn calendar_month_name(n: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    n.checked_sub(1).and_then(|idx| NAMES.get(idx as usize).copied())
}

// ── DayOfWeek ─────────────────────────────────────────────────────────────────

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = normalise_input(s);
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(&normalised))
            .ok_or_else(|| BikeshareError::invalid_filter("day", s))
    }
}

// ── FilterSpec ────────────────────────────────────────────────────────────────

/// Which slice of the data a query looks at.
///
/// `None` in any field means "no restriction" for that dimension. The value is
/// built once per query and passed by value everywhere afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub city: Option<City>,
    pub month: Option<Month>,
    pub day: Option<DayOfWeek>,
}

impl FilterSpec {
    pub fn new(city: Option<City>, month: Option<Month>, day: Option<DayOfWeek>) -> Self {
        Self { city, month, day }
    }

    /// All cities, no time restriction.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_city(self, city: City) -> Self {
        Self {
            city: Some(city),
            ..self
        }
    }

    pub fn with_month(self, month: Month) -> Self {
        Self {
            month: Some(month),
            ..self
        }
    }

    pub fn with_day(self, day: DayOfWeek) -> Self {
        Self {
            day: Some(day),
            ..self
        }
    }

    /// Build a spec from raw user strings.
    ///
    /// Each value must be one of its enumerated names or the literal `"all"`.
    /// Blank or unrecognised strings are rejected rather than read as "no
    /// filter".
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self> {
        Ok(Self {
            city: parse_optional(city, "city")?,
            month: parse_optional(month, "month")?,
            day: parse_optional(day, "day")?,
        })
    }

    /// Both a month and a day restriction are active.
    pub fn has_month_and_day(&self) -> bool {
        self.month.is_some() && self.day.is_some()
    }

    /// Whether gender and birth-year statistics make sense for this query.
    pub fn includes_demographics(&self) -> bool {
        self.city.map_or(true, City::has_demographics)
    }

    /// Month/day predicate applied after loading. The city dimension is
    /// handled by source selection, not here.
    pub fn matches(&self, record: &TripRecord) -> bool {
        let month_ok = self
            .month
            .map_or(true, |m| record.month() == m.number());
        let day_ok = self.day.map_or(true, |d| record.day_of_week() == d);
        month_ok && day_ok
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_all<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| ALL_KEYWORD.to_string(), |v| v.to_string())
        }
        write!(
            f,
            "city: {}, month: {}, day: {}",
            or_all(self.city),
            or_all(self.month),
            or_all(self.day)
        )
    }
}

fn parse_optional<T>(raw: &str, field: &'static str) -> Result<Option<T>>
where
    T: FromStr<Err = BikeshareError>,
{
    let normalised = normalise_input(raw);
    if normalised.is_empty() {
        return Err(BikeshareError::invalid_filter(field, raw));
    }
    if normalised == ALL_KEYWORD {
        return Ok(None);
    }
    normalised.parse().map(Some)
}

/// Trim, lowercase and collapse inner whitespace.
fn normalise_input(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ── UserType / Gender ─────────────────────────────────────────────────────────

/// Rider category as recorded by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    Subscriber,
    Customer,
    Unknown,
}

impl UserType {
    /// Map the raw CSV value; blanks and unrecognised categories are `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "Subscriber" => UserType::Subscriber,
            "Customer" => UserType::Customer,
            _ => UserType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            _ => None,
        }
    }
}

// ── TripRecord ────────────────────────────────────────────────────────────────

/// One row of the working dataset.
///
/// The start time and the calendar fields derived from it are private so the
/// two can never disagree; construct records with [`TripRecord::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    pub start_station: String,
    pub end_station: String,
    /// `None` when the source left the duration blank or non-finite.
    pub trip_duration_seconds: Option<f64>,
    pub user_type: UserType,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_city: Option<City>,
    month: u32,
    day_of_week: DayOfWeek,
    start_hour: u32,
}

impl TripRecord {
    /// Create a record and derive its month, weekday and start hour.
    ///
    /// Non-finite durations are stored as `None`.
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration_seconds: impl Into<Option<f64>>,
        user_type: UserType,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration_seconds: trip_duration_seconds.into().filter(|d| d.is_finite()),
            user_type,
            gender: None,
            birth_year: None,
            source_city: None,
            month: start_time.month(),
            day_of_week: start_time.weekday().into(),
            start_hour: start_time.hour(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn with_source_city(mut self, city: City) -> Self {
        self.source_city = Some(city);
        self
    }

    /// Calendar month of the start time, 1..=12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    /// Hour of the start time, 0..=23.
    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
