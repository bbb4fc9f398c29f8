use std::path::PathBuf;
use thiserror::Error;

use crate::models::City;

/// All errors produced by the bikeshare explorer.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// A city's source file is missing, unreadable, or failed mid-read.
    #[error("Failed to read {city} data from {path}: {source}")]
    DataSource {
        city: City,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A city's source file lacks a column the loader requires.
    #[error("{city} data in {path} is missing the \"{column}\" column")]
    MissingColumn {
        city: City,
        path: PathBuf,
        column: &'static str,
    },

    /// The configured data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A statistic that needs at least one trip was asked to run over none.
    #[error("No trips available to compute {0} statistics")]
    EmptyDataset(&'static str),

    /// A filter value outside its enumerated domain.
    #[error("Invalid {field} filter: \"{value}\"")]
    InvalidFilter { field: &'static str, value: String },

    /// The interactive input stream reached end-of-file.
    #[error("Input stream closed")]
    InputClosed,

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BikeshareError {
    /// Shorthand for an [`BikeshareError::InvalidFilter`] value.
    pub fn invalid_filter(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field,
            value: value.into(),
        }
    }

    /// `true` for errors that abort the whole query rather than a single
    /// statistic group.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::EmptyDataset(_))
    }
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_file_error() -> csv::Error {
        csv::Reader::from_path("/definitely/not/here/chicago.csv").unwrap_err()
    }

    #[test]
    fn test_error_display_data_source() {
        let err = BikeshareError::DataSource {
            city: City::Chicago,
            path: PathBuf::from("/data/chicago.csv"),
            source: missing_file_error(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read Chicago data"));
        assert!(msg.contains("/data/chicago.csv"));
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = BikeshareError::MissingColumn {
            city: City::Washington,
            path: PathBuf::from("washington.csv"),
            column: "Start Time",
        };
        assert_eq!(
            err.to_string(),
            "Washington data in washington.csv is missing the \"Start Time\" column"
        );
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = BikeshareError::DataPathNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_empty_dataset() {
        let err = BikeshareError::EmptyDataset("station");
        assert_eq!(
            err.to_string(),
            "No trips available to compute station statistics"
        );
    }

    #[test]
    fn test_error_display_invalid_filter() {
        let err = BikeshareError::invalid_filter("month", "july");
        assert_eq!(err.to_string(), "Invalid month filter: \"july\"");
    }

    #[test]
    fn test_empty_dataset_is_not_fatal() {
        assert!(!BikeshareError::EmptyDataset("time of travel").is_fatal());
        assert!(BikeshareError::InputClosed.is_fatal());
        assert!(BikeshareError::DataPathNotFound(PathBuf::from("x")).is_fatal());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BikeshareError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
