mod bootstrap;

use std::io::{self, Write};

use anyhow::Result;
use bikeshare_core::error::BikeshareError;
use bikeshare_core::settings::Settings;
use bikeshare_ui::app::{App, OutputFormat};
use bikeshare_ui::report_view::render_error;
use bikeshare_ui::themes::Theme;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Bikeshare explorer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Format: {}, Theme: {}, Page size: {}",
        settings.format,
        settings.theme,
        settings.page_size
    );

    if settings.has_orphan_time_filters() {
        tracing::warn!("--month and --day only apply together with --city; ignoring them");
    }

    if let Err(err) = run(&settings) {
        tracing::error!("{}", err);
        let mut stderr = io::stderr();
        render_error(&mut stderr, &err, &Theme::for_name(&settings.theme))?;
        stderr.flush()?;
        std::process::exit(1);
    }

    Ok(())
}

fn run(settings: &Settings) -> Result<(), BikeshareError> {
    let data_dir = bootstrap::discover_data_path(settings.data_dir.as_deref())?;
    tracing::info!("Reading trip data from {}", data_dir.display());

    let app = App::new(
        &settings.theme,
        data_dir,
        usize::from(settings.page_size),
        OutputFormat::from_json_flag(settings.wants_json()),
    );

    match settings.filter_spec()? {
        Some(spec) => {
            let mut stdout = io::stdout().lock();
            app.run_once(spec, &mut stdout)
        }
        None => app.run_interactive(io::stdin().lock(), io::stdout().lock()),
    }
}
