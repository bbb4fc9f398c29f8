//! Line-oriented prompts that collect a [`FilterSpec`] from the user.
//!
//! Generic over the input and output streams so sessions can be scripted in
//! tests. Answers are trimmed and case-insensitive; an invalid answer repeats
//! the question together with the accepted values.

use std::io::{BufRead, Write};

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{City, DayOfWeek, FilterSpec, Month, ALL_KEYWORD};
use tracing::debug;

use crate::themes::Theme;

/// Which time dimensions the user wants to restrict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilterChoice {
    Month,
    Day,
    Both,
    None,
}

impl TimeFilterChoice {
    const ANSWERS: [&'static str; 4] = ["month", "day", "both", "none"];

    fn parse(answer: &str) -> Option<Self> {
        match answer {
            "month" => Some(Self::Month),
            "day" => Some(Self::Day),
            "both" => Some(Self::Both),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    fn wants_month(self) -> bool {
        matches!(self, Self::Month | Self::Both)
    }

    fn wants_day(self) -> bool {
        matches!(self, Self::Day | Self::Both)
    }
}

/// Interactive filter prompts bound to an input and an output stream.
pub struct FilterPrompter<'t, R, W> {
    input: R,
    output: W,
    theme: &'t Theme,
}

impl<'t, R: BufRead, W: Write> FilterPrompter<'t, R, W> {
    pub fn new(input: R, output: W, theme: &'t Theme) -> Self {
        Self {
            input,
            output,
            theme,
        }
    }

    /// Stream that prompts are written to; report output goes here too.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask for city, time-filter kind, and then month and/or day.
    pub fn prompt_filters(&mut self) -> Result<FilterSpec> {
        let city_answers = [
            City::Chicago.key(),
            City::NewYorkCity.key(),
            City::Washington.key(),
            ALL_KEYWORD,
        ];
        let city = self.ask_choice(
            "Would you like to see data for Chicago, New York City, Washington or all?",
            &city_answers,
            |a| parse_or_all::<City>(a),
        )?;
        let city_label = city.map_or_else(|| "all cities".to_string(), |c| c.to_string());
        writeln!(
            self.output,
            "\nLooks like you want to hear about {}! If this is not true, restart the program now!",
            city_label
        )?;

        let time_filter = self.ask_choice(
            "Would you like to filter the data by month, day, both or not at all? Type 'none' for no time filter.",
            &TimeFilterChoice::ANSWERS,
            TimeFilterChoice::parse,
        )?;

        let month = if time_filter.wants_month() {
            let answers: Vec<&str> = std::iter::once(ALL_KEYWORD)
                .chain(Month::ALL.iter().map(|m| m.name()))
                .collect();
            self.ask_choice(
                "Which month? January, February, March, April, May, or June?",
                &answers,
                |a| parse_or_all::<Month>(a),
            )?
        } else {
            None
        };

        let day = if time_filter.wants_day() {
            let answers: Vec<&str> = std::iter::once(ALL_KEYWORD)
                .chain(DayOfWeek::ALL.iter().map(|d| d.name()))
                .collect();
            self.ask_choice(
                "Which day? Please type your response as a string (e.g. Monday, Tuesday).",
                &answers,
                |a| parse_or_all::<DayOfWeek>(a),
            )?
        } else {
            None
        };

        let spec = FilterSpec::new(city, month, day);
        debug!("Filters chosen: {}", spec);
        Ok(spec)
    }

    /// Yes/no question; only `yes` counts as agreement.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(question)? == "yes")
    }

    /// Repeat `question` until `parse` accepts the answer.
    fn ask_choice<T>(
        &mut self,
        question: &str,
        answers: &[&str],
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(question)?;
            if let Some(value) = parse(&answer) {
                return Ok(value);
            }
            writeln!(
                self.output,
                "\n{} Please enter one of: {}",
                Theme::paint(self.theme.error, format!("Invalid input \"{}\"!", answer)),
                answers.join(", ")
            )?;
        }
    }

    /// Print `question`, read one line, return it trimmed and lowercased.
    fn ask(&mut self, question: &str) -> Result<String> {
        writeln!(self.output, "\n{}", Theme::paint(self.theme.prompt, question))?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(BikeshareError::InputClosed);
        }
        Ok(line.trim().to_lowercase())
    }
}

/// `"all"` → `Some(None)`; a valid value → `Some(Some(v))`; otherwise `None`.
fn parse_or_all<T>(answer: &str) -> Option<Option<T>>
where
    T: std::str::FromStr<Err = BikeshareError>,
{
    if answer == ALL_KEYWORD {
        return Some(None);
    }
    answer.parse::<T>().ok().map(Some)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
