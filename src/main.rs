use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use geocheck_spiral::{
    load_config, search_with_distances, CaptchaTable, FileLedger, GeocheckClient, Hunter, Point,
    Puzzle, StdinPrompt,
};

#[derive(Debug, Parser)]
#[command(name = "geocheck-spiral")]
#[command(about = "Try the points around a center nearest first against a coordinate checker")]
struct Cli {
    /// Checker's identifier of the puzzle
    gid: String,
    /// Name shown by the checker
    cache_name: String,
    /// Geocache code, e.g. GC12345
    gc_code: String,
    /// Center of the search, e.g. "S41 16.814 E173 14.980"
    center: Point,
    /// Only the points closer than that many meters are tried
    max_distance: f64,
    /// File with the already checked points
    #[arg(long, env = "GEOCHECK_LEDGER_PATH")]
    ledger: Option<PathBuf>,
    /// Print the candidates with their distances without contacting the checker
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log).context("invalid GEOCHECK_LOG")?)
        .with_writer(std::io::stderr)
        .init();

    if cli.dry_run {
        for (point, distance) in search_with_distances(&cli.center, cli.max_distance) {
            println!("{point}\t{distance:.2}");
        }
        return Ok(());
    }

    let ledger_path = cli.ledger.unwrap_or(config.ledger_path);
    info!(ledger = %ledger_path.display(), "Using the checked points ledger");

    let captcha = Arc::new(CaptchaTable::build());
    let puzzle = Puzzle {
        gid: cli.gid,
        cache_name: cli.cache_name,
        gc_code: cli.gc_code,
    };
    let client = GeocheckClient::new(
        &config.base_url,
        config.request_timeout,
        &config.user_agent,
        puzzle,
        captcha,
    );

    let mut hunter = Hunter::new(client, FileLedger::new(ledger_path), StdinPrompt::new())
        .with_max_rate_limit_waits(config.max_rate_limit_waits);
    let outcome = hunter.hunt(&cli.center, cli.max_distance)?;

    println!("Final result: {outcome}");
    Ok(())
}
