//! Console layer for the bikeshare explorer.
//!
//! Provides themes, line-oriented filter prompts, report and trip-page
//! rendering, and the interactive session loop that ties them to the
//! analysis pipeline in [`bikeshare_data`].

pub mod app;
pub mod prompt;
pub mod report_view;
pub mod themes;

pub use bikeshare_core as core;
