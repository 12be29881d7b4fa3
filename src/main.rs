//! vaporwair - weather and air quality forecast for where you are

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use tracing::{debug, warn};

use vaporwair::cache::CacheStore;
use vaporwair::cli::Cli;
use vaporwair::config::Settings;
use vaporwair::error::AppError;
use vaporwair::fetch::HttpFetcher;
use vaporwair::orchestrator::Orchestrator;
use vaporwair::report::Renderer;

/// Log to stderr, filtered by `RUST_LOG` and quiet by default
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let renderer = Renderer::new(cli.report_mode());
    let store = match cli.home {
        Some(dir) => CacheStore::with_dir(dir),
        None => CacheStore::new().ok_or(AppError::HomeDirectory)?,
    };
    if let Err(err) = store.ensure_dir() {
        warn!(dir = %store.dir().display(), error = %err, "could not create storage directory");
    }

    let config = store.load_config()?;
    let settings = Settings::resolve(&config, cli.max_age);
    let fetcher = Arc::new(HttpFetcher::new());
    let orchestrator = Orchestrator::new(store, fetcher, &config, settings, renderer);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "{}", Local::now().format("%a %b %-d %H:%M:%S %Z %Y"))?;

    let cycle = orchestrator.run(&mut out).await?;
    out.flush()?;
    debug!(?cycle, "done");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("{}", hint);
            }
            ExitCode::from(err.exit_code())
        }
    }
}
