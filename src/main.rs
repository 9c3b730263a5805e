use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use pbp_scraper::app::ports::PageSource;
use pbp_scraper::cluster::{assign_clusters, build_trajectories, join_clusters};
use pbp_scraper::config::{Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use pbp_scraper::infra::ReqwestSource;
use pbp_scraper::logging;
use pbp_scraper::pipeline::{DayAggregator, Pipeline};
use pbp_scraper::storage;

#[derive(Parser)]
#[command(name = "pbp_scraper")]
#[command(about = "Play-by-play scraper and score trajectory clustering")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $PBP_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every scheduled day in a date range into one event table
    Scrape {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "data/pbp.csv")]
        out: PathBuf,
        /// Keep the raw scoring events instead of resampling onto the time grid
        #[arg(long)]
        raw: bool,
    },
    /// Scrape a single play-by-play page
    Game {
        #[arg(long)]
        url: String,
        #[arg(long, default_value_t = 0)]
        round: u32,
        /// Write CSV here instead of printing JSON lines
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        raw: bool,
    },
    /// Cluster stored games by trajectory and join the labels back on
    Cluster {
        #[arg(long, default_value = "data/pbp.csv")]
        input: PathBuf,
        #[arg(long, default_value = "data/with_clusters.csv")]
        output: PathBuf,
        #[arg(long)]
        k: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path.or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from)) {
        Some(path) => Config::load(&path).with_context(|| format!("loading {}", path.display())),
        None => Ok(Config::load_or_default(DEFAULT_CONFIG_PATH)?),
    }
}

fn aggregator(config: &Config, raw: bool) -> anyhow::Result<DayAggregator> {
    let source: Arc<dyn PageSource> = Arc::new(ReqwestSource::new(&config.source)?);
    let mut config = config.clone();
    if raw {
        config.resample.enabled = false;
    }
    Ok(DayAggregator::from_config(&config, source))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Scrape { start, end, out, raw } => {
            if end < start {
                bail!("--end {} is before --start {}", end, start);
            }
            if config.schedule.is_empty() {
                warn!("No [[schedule]] windows configured; every day will be skipped");
            }
            let agg = aggregator(&config, raw)?;
            let result = Pipeline::run_range(&agg, &config.source.scoreboard_url, &config.schedule, start, end).await;

            info!(
                days = result.days_processed,
                skipped = result.days_skipped,
                games = result.games_processed,
                failed = result.games_failed,
                events = result.events.len(),
                "Scrape finished"
            );
            for e in &result.errors {
                error!("{}", e);
            }
            storage::write_events(&out, &result.events)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Game { url, round, out, raw } => {
            let agg = aggregator(&config, raw)?;
            let events = agg.process_game(&url, round).await?;
            match out {
                Some(path) => storage::write_events(&path, &events)?,
                None => {
                    for event in &events {
                        println!("{}", serde_json::to_string(event)?);
                    }
                }
            }
        }
        Commands::Cluster { input, output, k, seed } => {
            let mut params = config.cluster.clone();
            if let Some(k) = k {
                params.k = k;
            }
            if seed.is_some() {
                params.seed = seed;
            }

            let events = storage::read_events(&input)?;
            let trajectories = build_trajectories(&events);
            let assignments = assign_clusters(&trajectories, &params)?;
            for a in &assignments {
                println!("{}\t{}\t{}\t{}", a.round_num, a.away, a.home, a.cluster);
            }
            storage::write_clustered(&output, &join_clusters(&events, &assignments))?;
        }
    }
    Ok(())
}
