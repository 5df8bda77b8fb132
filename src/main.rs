//! Rift-Ripple main entry point
//!
//! This is the command-line interface for the Rift-Ripple player crawler.

use clap::Parser;
use rift_ripple::config::{load_config_with_hash, resolve_api_key, Config};
use rift_ripple::crawler::{format_counts, run_crawl};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rift-Ripple: A polite player-profile crawler
///
/// Rift-Ripple starts from a few seed players, analyzes their recent matches
/// through the Riot API, and expands breadth-first through the other
/// participants it meets, storing complete player profiles in SQLite.
#[derive(Parser, Debug)]
#[command(name = "rift-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A polite player-profile crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_leaderboard"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_leaderboard"])]
    stats: bool,

    /// Write the markdown leaderboard from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_leaderboard: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_leaderboard {
        handle_export_leaderboard(&config)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rift_ripple=info,warn"),
            1 => EnvFilter::new("rift_ripple=debug,info"),
            2 => EnvFilter::new("rift_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Rift-Ripple Dry Run ===\n");

    println!("API:");
    println!("  Key variable: {}", config.api.api_key_env);
    println!("  Account endpoint: {}", config.api.account_base);
    println!(
        "  Rate: {} requests per {}s (one every {:?})",
        config.api.requests_per_window,
        config.api.window_seconds,
        config.api.min_spacing()
    );
    println!("  Request timeout: {}s", config.api.request_timeout_secs);
    println!("  Regional endpoints (in search order):");
    for base in &config.api.regional_bases {
        println!("    - {}", base);
    }

    println!("\nCrawler:");
    println!("  Matches per player: {}", config.crawler.matches_per_player);
    println!(
        "  Target inserted players: {}",
        config.crawler.target_inserted_players
    );
    println!(
        "  Max processed players: {}",
        config.crawler.max_processed_players
    );
    println!("  Region cap: {}", config.crawler.region_cap);
    println!("  On cap exhausted: {:?}", config.crawler.on_cap_exhausted);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Leaderboard: {}", config.output.leaderboard_path);

    println!("\nSeed Players ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}#{}", seed.name, seed.tag);
    }

    println!("\n✓ Configuration is valid");
    match resolve_api_key(&config.api) {
        Ok(_) => println!("✓ API key found in {}", config.api.api_key_env),
        Err(e) => println!("✗ {}", e),
    }
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use rift_ripple::output::{load_statistics, print_statistics};
    use rift_ripple::storage::SqliteStorage;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-leaderboard mode: writes the markdown leaderboard
fn handle_export_leaderboard(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use rift_ripple::output::export_leaderboard;
    use rift_ripple::storage::SqliteStorage;
    use std::path::Path;

    println!("=== Exporting Leaderboard ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.leaderboard_path);
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let players = export_leaderboard(&storage, Path::new(&config.output.leaderboard_path))?;

    println!(
        "✓ Leaderboard of {} players exported to: {}",
        players, config.output.leaderboard_path
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = resolve_api_key(&config.api)?;

    tracing::info!(
        "Seeds: {}, regional endpoints: {}, region cap: {}",
        config.seeds.len(),
        config.api.regional_bases.len(),
        config.crawler.region_cap
    );

    match run_crawl(config, api_key, config_hash).await {
        Ok(report) => {
            println!("\n=== Crawl Finished ===");
            println!("  Stop reason: {}", report.stop_reason);
            println!("  Total processed players: {}", report.processed);
            println!("  Total inserted players: {}", report.inserted);
            println!("  Remaining in queue: {}", report.remaining);
            println!("  Final region counts: {}", format_counts(&report.region_counts));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
