//! Shared domain layer for the bikeshare explorer.
//!
//! Holds the filter and trip-record models, the error taxonomy, CLI settings,
//! timestamp parsing and number formatting used by the data and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
