use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::City;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map Python-style level names to an `EnvFilter` directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr unless `log_file` is given, in which case they are
/// appended to that file without ANSI colours. An unrecognised level falls
/// back to `"info"`.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false);
            registry.with(layer).init();
        }
        None => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false);
            registry.with(layer).init();
        }
    }

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the directory holding the per-city CSV files.
///
/// An explicit path must exist. Otherwise the first match of:
/// 1. the current directory, when it holds the Chicago export
/// 2. `<data dir>/bikeshare` (e.g. `~/.local/share/bikeshare`)
///
/// falling back to the current directory.
pub fn discover_data_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    discover_data_path_from(explicit, &cwd)
}

fn discover_data_path_from(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if path.is_dir() {
            Ok(path.to_path_buf())
        } else {
            Err(BikeshareError::DataPathNotFound(path.to_path_buf()))
        };
    }

    if cwd.join(City::Chicago.file_name()).is_file() {
        return Ok(cwd.to_path_buf());
    }

    let candidate = dirs::data_dir()
        .map(|d| d.join("bikeshare"))
        .filter(|p| p.is_dir());
    Ok(candidate.unwrap_or_else(|| cwd.to_path_buf()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("warning"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("TRACE"), "trace");
    }

    // ── discover_data_path ────────────────────────────────────────────────────

    #[test]
    fn test_explicit_path_is_used() {
        let tmp = TempDir::new().expect("tempdir");
        let path = discover_data_path_from(Some(tmp.path()), Path::new("/")).unwrap();
        assert_eq!(path, tmp.path());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("nope");
        let err = discover_data_path_from(Some(&missing), tmp.path()).unwrap_err();
        assert!(matches!(err, BikeshareError::DataPathNotFound(p) if p == missing));
    }

    #[test]
    fn test_cwd_with_chicago_csv_wins() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::write(tmp.path().join("chicago.csv"), "").expect("write csv");
        let path = discover_data_path_from(None, tmp.path()).unwrap();
        assert_eq!(path, tmp.path());
    }

    #[test]
    fn test_user_data_dir_then_cwd_fallback() {
        let tmp = TempDir::new().expect("tempdir");
        let cwd = tmp.path().join("work");
        std::fs::create_dir_all(&cwd).expect("create cwd");
        let share = tmp.path().join("share");

        // Point dirs::data_dir() at our temp dir.
        let original = std::env::var_os("XDG_DATA_HOME");
        std::env::set_var("XDG_DATA_HOME", &share);

        let before = discover_data_path_from(None, &cwd);
        std::fs::create_dir_all(share.join("bikeshare")).expect("create data dir");
        let after = discover_data_path_from(None, &cwd);

        match original {
            Some(v) => std::env::set_var("XDG_DATA_HOME", v),
            None => std::env::remove_var("XDG_DATA_HOME"),
        }

        assert_eq!(before.unwrap(), cwd);
        if cfg!(target_os = "linux") {
            assert_eq!(after.unwrap(), share.join("bikeshare"));
        }
    }
}
