mod config;
mod error;
mod loader;
mod model;
mod stats;
mod ui;

use config::{ChartConfig, BANNER_LABELS, COUNT_UNCHANGED_AS_USED, DATA_FILE, LAST_DAY};
use error::PrimoResult;
use stats::UnchangedPolicy;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs go to stderr so the summary on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "primo_plot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> PrimoResult<()> {
    let rows = loader::load_rows(DATA_FILE, LAST_DAY)?;
    let policy = UnchangedPolicy::new(COUNT_UNCHANGED_AS_USED);
    let analysis = stats::analyze(&rows, &BANNER_LABELS, policy)?;

    println!("{}", analysis.totals);

    info!(
        rows = analysis.series.len(),
        pulls = analysis.drops.len(),
        largest_pull = analysis.drops.iter().map(|d| d.spent()).max(),
        "analysis complete"
    );

    ui::show(&analysis, ChartConfig::default())
}
