use std::io::{BufRead, Write};
use std::path::PathBuf;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{FilterSpec, TripRecord};
use bikeshare_data::analysis::{analyze_trips, TripAnalysis};
use bikeshare_data::pagination::RecordPages;
use tracing::info;

use crate::prompt::FilterPrompter;
use crate::report_view::{render_page, render_report, render_report_json};
use crate::themes::Theme;

const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
const VIEW_TRIPS_QUESTION: &str = "Would you like to view individual trip data? Type 'yes' or 'no'.";
const RESTART_QUESTION: &str = "Would you like to restart? Enter yes or no.";

/// How reports are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Top-level application state.
pub struct App {
    theme: Theme,
    data_dir: PathBuf,
    page_size: usize,
    format: OutputFormat,
}

impl App {
    pub fn new(theme_name: &str, data_dir: PathBuf, page_size: usize, format: OutputFormat) -> Self {
        Self {
            theme: Theme::for_name(theme_name),
            data_dir,
            page_size,
            format,
        }
    }

    /// Run a single query and render its report to `out`.
    pub fn run_once<W: Write>(&self, spec: FilterSpec, out: &mut W) -> Result<()> {
        info!("Running query for {}", spec);
        let analysis = analyze_trips(spec, &self.data_dir)?;
        self.render(out, &analysis)
    }

    /// Prompt, analyse, render and page until the user declines to restart.
    ///
    /// Closing the input stream ends the session cleanly. Source errors are
    /// returned to the caller and end the session.
    pub fn run_interactive<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<()> {
        let mut prompter = FilterPrompter::new(input, output, &self.theme);
        writeln!(prompter.output(), "{}", Theme::paint(self.theme.heading, GREETING))?;

        loop {
            let spec = match prompter.prompt_filters() {
                Ok(spec) => spec,
                Err(BikeshareError::InputClosed) => {
                    info!("Input closed; ending session");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let analysis = analyze_trips(spec, &self.data_dir)?;
            self.render(prompter.output(), &analysis)?;
            self.page_trips(&mut prompter, &analysis.records)?;

            if !answered_yes(prompter.confirm(RESTART_QUESTION))? {
                break;
            }
        }

        info!("Session finished");
        Ok(())
    }

    fn render<W: Write>(&self, out: &mut W, analysis: &TripAnalysis) -> Result<()> {
        match self.format {
            OutputFormat::Text => render_report(out, &analysis.report, &self.theme)?,
            OutputFormat::Json => render_report_json(out, analysis)?,
        }
        out.flush()?;
        Ok(())
    }

    /// Offer raw trips page by page while the user keeps answering `yes`.
    fn page_trips<R: BufRead, W: Write>(
        &self,
        prompter: &mut FilterPrompter<'_, R, W>,
        records: &[TripRecord],
    ) -> Result<()> {
        let mut pages = RecordPages::new(records, self.page_size);
        while pages.remaining() > 0 {
            if !answered_yes(prompter.confirm(VIEW_TRIPS_QUESTION))? {
                break;
            }
            if let Some(page) = pages.next() {
                render_page(prompter.output(), &page, &self.theme)?;
            }
        }
        Ok(())
    }
}

/// A closed input stream counts as `no`.
fn answered_yes(answer: Result<bool>) -> Result<bool> {
    match answer {
        Err(BikeshareError::InputClosed) => Ok(false),
        other => other,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::City;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";

    fn write_csv(dir: &Path, name: &str, lines: &[String]) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    /// Chicago with seven January Monday trips; the other cities with one each.
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let mut chicago = vec![HEADER.to_string()];
        for i in 0..7 {
            chicago.push(format!(
                "{i},2017-01-02 08:0{i}:00,,300,Station {i},Lake,Subscriber,Male,1980"
            ));
        }
        write_csv(dir.path(), "chicago.csv", &chicago);
        write_csv(
            dir.path(),
            "new_york_city.csv",
            &[
                HEADER.to_string(),
                "0,2017-02-07 09:00:00,,600,Broadway,Wall St,Customer,Female,1990".to_string(),
            ],
        );
        write_csv(
            dir.path(),
            "washington.csv",
            &[
                ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type"
                    .to_string(),
                "0,2017-03-08 10:00:00,,900,Mall,Capitol,Subscriber".to_string(),
            ],
        );
        dir
    }

    fn interact(dir: &TempDir, script: &str) -> (Result<()>, String) {
        let app = App::new("plain", dir.path().to_path_buf(), 5, OutputFormat::Text);
        let mut out = Vec::new();
        let result = app.run_interactive(Cursor::new(script.as_bytes()), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    // ── run_interactive ───────────────────────────────────────────────────────

    #[test]
    fn test_session_single_query() {
        let dir = fixture();
        let (result, out) = interact(&dir, "chicago\nnone\nno\nno\n");

        assert!(result.is_ok());
        assert!(out.starts_with(GREETING));
        assert!(out.contains("Most popular start hour: 8 AM (8:00), Count: 7"));
        assert!(!out.contains("Chunk ["));
        assert_eq!(out.matches(RESTART_QUESTION).count(), 1);
    }

    #[test]
    fn test_session_pages_until_exhausted() {
        let dir = fixture();
        let (result, out) = interact(&dir, "chicago\nnone\nyes\nyes\nno\n");

        assert!(result.is_ok());
        assert!(out.contains("Chunk [1/2]"));
        assert!(out.contains("End of Chunk [2/2]"));
        // Two pages only; no third offer once pages run out.
        assert_eq!(out.matches(VIEW_TRIPS_QUESTION).count(), 2);
    }

    #[test]
    fn test_session_stops_paging_on_no() {
        let dir = fixture();
        let (_, out) = interact(&dir, "chicago\nnone\nyes\nnope\nno\n");
        assert!(out.contains("Chunk [1/2]"));
        assert!(!out.contains("Chunk [2/2]"));
    }

    #[test]
    fn test_session_restart_runs_second_query() {
        let dir = fixture();
        let (result, out) = interact(&dir, "chicago\nnone\nno\nyes\nwashington\nnone\nno\nno\n");

        assert!(result.is_ok());
        assert_eq!(out.matches("Calculating User Stats...").count(), 2);
        assert!(out.contains("not available for Washington"));
    }

    #[test]
    fn test_session_all_cities_merges_sources() {
        let dir = fixture();
        let (_, out) = interact(&dir, "all\nnone\nno\nno\n");
        assert!(out.contains("Total users: 9"));
        assert!(out.contains("Customers: 1"));
    }

    #[test]
    fn test_session_empty_selection() {
        let dir = fixture();
        let (result, out) = interact(&dir, "new york city\nmonth\njune\nno\n");

        assert!(result.is_ok());
        assert!(out.contains("No data for the selected filters."));
        assert!(!out.contains(VIEW_TRIPS_QUESTION));
    }

    #[test]
    fn test_session_eof_ends_cleanly() {
        let dir = fixture();
        let (result, _) = interact(&dir, "chicago\n");
        assert!(result.is_ok());
    }

    #[test]
    fn test_session_missing_source_is_fatal() {
        let dir = fixture();
        std::fs::remove_file(dir.path().join("washington.csv")).unwrap();
        let (result, _) = interact(&dir, "washington\nnone\n");
        assert!(matches!(result, Err(BikeshareError::DataSource { .. })));
    }

    // ── run_once ──────────────────────────────────────────────────────────────

    #[test]
    fn test_run_once_json() {
        let dir = fixture();
        let app = App::new("plain", dir.path().to_path_buf(), 5, OutputFormat::Json);
        let mut out = Vec::new();
        app.run_once(FilterSpec::all().with_city(City::NewYorkCity), &mut out)
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["metadata"]["records_matched"], 1);
        assert_eq!(json["report"]["users"]["customer_count"], 1);
        assert_eq!(json["report"]["filters"]["city"], "new_york_city");
    }

    #[test]
    fn test_run_once_text() {
        let dir = fixture();
        let app = App::new("plain", dir.path().to_path_buf(), 5, OutputFormat::Text);
        let mut out = Vec::new();
        app.run_once(FilterSpec::all().with_city(City::Chicago), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Most popular end station: Lake, Count: 7"));
    }

    #[test]
    fn test_output_format_from_flag() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Text);
    }
}
