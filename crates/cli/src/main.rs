use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::{inspect, sort, watch};
use sorter_core::config;
use sorter_core::config::AppConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut cfg = config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Watch { dir, sweep, dry_run } => {
            apply_overrides(&mut cfg, dir, dry_run);
            cfg.watch.sweep_on_start |= sweep;
            watch::run(cfg).await
        }
        Commands::Sort { dir, dry_run, json } => {
            apply_overrides(&mut cfg, dir, dry_run);
            let summary = sort::sort_once(cfg).await?;
            summary.print(json)
        }
        Commands::Classify { file, json } => {
            let report = inspect::inspect_file(&cfg, &file).await?;
            report.print(json)
        }
    }
}

#[derive(Parser)]
#[command(name = "downloads-sorter")]
#[command(about = "Sorts new downloads into folders by their real file type", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the downloads folder and sort files as they arrive
    Watch {
        /// Folder to watch instead of the configured one
        #[arg(long)]
        dir: Option<String>,
        /// Sort files already in the folder before watching
        #[arg(long, default_value_t = false)]
        sweep: bool,
        /// Log what would be moved without moving anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Sort the files currently in the folder once and exit
    Sort {
        #[arg(long)]
        dir: Option<String>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Show how a single file would be classified
    Classify {
        file: PathBuf,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn apply_overrides(cfg: &mut AppConfig, dir: Option<String>, dry_run: bool) {
    if let Some(dir) = dir {
        cfg.watch.directory = dir;
    }
    cfg.watch.dry_run |= dry_run;
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
