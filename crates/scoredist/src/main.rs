#[cfg(feature = "native")]
use clap::Parser;
#[cfg(feature = "native")]
use scoredist::source::HttpSource;
#[cfg(feature = "native")]
use scoredist::{App, AppConfig, DemoSource, DistributionSource, SelectionOverrides, init_logging};
#[cfg(feature = "native")]
use scoredist_core::model::TimeRange;
#[cfg(feature = "native")]
use std::path::PathBuf;
#[cfg(feature = "native")]
use std::time::Duration;

#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(name = "scoredist")]
#[command(about = "Animated score distribution charts in the terminal")]
struct Args {
    /// Path to the data directory (default: ~/.scoredist/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Config file (default: <data_dir>/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use generated data instead of the API
    #[arg(long)]
    demo: bool,

    /// Initial index, e.g. SPX
    #[arg(long)]
    index: Option<String>,

    /// Initial metric, e.g. momentum
    #[arg(long)]
    metric: Option<String>,

    /// Initial range: 1M, 3M, 6M, 1Y, 3Y or 5Y
    #[arg(long)]
    range: Option<TimeRange>,
}

#[cfg(feature = "native")]
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".scoredist")
}

#[cfg(feature = "native")]
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let config_path = args.config.unwrap_or_else(|| AppConfig::path(&data_dir));
    let mut config = AppConfig::load(&config_path)?;
    config.apply_overrides(&SelectionOverrides {
        index: args.index,
        metric: args.metric,
        range: args.range,
    });

    let source: Box<dyn DistributionSource> = if args.demo {
        Box::new(DemoSource::default())
    } else {
        Box::new(HttpSource::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?)
    };
    tracing::info!(source = %source.describe(), config = %config_path.display(), "starting");

    let mut app = App::new(config, source);

    crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture)?;
    let result = ratatui::run(|terminal| app.run(terminal));
    if let Err(err) = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture) {
        tracing::error!("Failed to release mouse capture: {err}");
    }

    tracing::info!("Application shutting down");

    if let Err(err) = ratatui::try_restore() {
        tracing::error!("Failed to restore terminal: {err}");
    }

    result
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("This binary requires the 'native' feature.");
}
