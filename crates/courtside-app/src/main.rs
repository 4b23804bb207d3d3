// Courtside entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout carries the report)
// 2. Load config
// 3. Load the current week's payload
// 4. Prefetch every historical week the prediction windows need
// 5. Build the week report
// 6. Write the report

use courtside_app::config;
use courtside_app::report;
use courtside_app::source::WeekFiles;

use anyhow::Context;
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Courtside starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, season {}, {} teams, week {}",
        config.league.name, config.league.season, config.league.num_teams, config.league.current_week
    );

    // 3. Load the current week
    let files = WeekFiles::new(&config.data.dir);
    let week = config.league.current_week;
    info!("Reading week files from {}", files.dir().display());
    let current = files
        .load_week(week)
        .await
        .with_context(|| format!("failed to load week {week}"))?;
    info!(
        "Week {week}: {} matchups, {} teams",
        current.matchups.len(),
        current.snapshots.len()
    );

    // 4. Prefetch history
    let periods = report::history_periods(&config.windows, week);
    let mut history = files.prefetch(&periods).await;

    // 5. Build the report
    let report = report::build_report(&config, &current, &mut history);

    // 6. Write it
    report::write_report(&report, config.data.output.as_deref().map(Path::new))
        .context("failed to write report")?;

    info!("Courtside finished");
    Ok(())
}

/// Initialize tracing to log to a file so stdout stays clean for the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("courtside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtside_app=info,courtside_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
