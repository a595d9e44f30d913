mod config;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use catalog::{CatalogService, ContentType, Fixture, SuggestionService};
use clients::{build_http_client, GeminiSuggester, YouTubeCatalog};
use engine::{OutlierSearchOrchestrator, SearchOutcome, SearchRequest};
use pipeline::{outlier_score, ScoreBand};

use config::Config;

/// Outlier Scout - find videos that beat their channel's usual numbers
#[derive(Parser)]
#[command(name = "outlier-scout")]
#[command(about = "Rank YouTube videos by how far they outperform their channel", long_about = None)]
struct Cli {
    /// Answer from a recorded JSON fixture instead of the live APIs
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a keyword and rank the outliers
    Search {
        /// Keyword to search for
        #[arg(long)]
        keyword: String,

        /// Search short-form videos instead of standard ones
        #[arg(long)]
        shorts: bool,

        /// Histogram bin count (default: OUTLIER_SCOUT_HISTOGRAM_BINS or 20)
        #[arg(long)]
        bins: Option<usize>,

        /// Only keep videos published within this many days
        #[arg(long)]
        max_age_days: Option<u32>,

        /// Suggested terms to search besides the keyword
        #[arg(long)]
        suggestions: Option<usize>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,

        /// Show how each result was found and what was skipped
        #[arg(long)]
        explain: bool,
    },

    /// Show a channel's baseline (mean views of its recent uploads)
    Baseline {
        /// Channel ID (UC...)
        #[arg(long)]
        channel_id: String,

        /// Print the baseline as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a view count against a baseline, offline
    Score {
        #[arg(long)]
        views: u64,

        #[arg(long)]
        baseline: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Score { views, baseline } => handle_score(views, baseline),
        command => match &cli.fixture {
            Some(path) => {
                let (catalog, suggester) = load_fixture(path)?;
                dispatch(command, &config, catalog, suggester).await
            }
            None => {
                let (catalog, suggester) = connect_live(&config)?;
                dispatch(command, &config, catalog, suggester).await
            }
        },
    }
}

fn load_fixture(path: &Path) -> Result<(catalog::InMemoryCatalog, catalog::StaticSuggestions)> {
    let fixture = Fixture::load_from_file(path).context("Failed to load fixture")?;
    info!("Answering from fixture {}", path.display());
    Ok(fixture.into_services())
}

/// Build the HTTP collaborators, failing before any request if a key is missing.
fn connect_live(config: &Config) -> Result<(YouTubeCatalog, GeminiSuggester)> {
    let youtube_key = config
        .youtube_api_key
        .as_deref()
        .ok_or_else(|| anyhow!("YOUTUBE_API_KEY is not set (or pass --fixture <path>)"))?;
    let gemini_key = config
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set (or pass --fixture <path>)"))?;

    let http = build_http_client(config.timeout())?;

    let mut catalog = YouTubeCatalog::new(http.clone(), youtube_key)?;
    if let Some(url) = &config.youtube_base_url {
        catalog = catalog.with_base_url(url)?;
    }

    let mut suggester = GeminiSuggester::new(http, gemini_key)?.with_model(&config.gemini_model);
    if let Some(url) = &config.gemini_base_url {
        suggester = suggester.with_base_url(url)?;
    }

    Ok((catalog, suggester))
}

async fn dispatch<C, S>(command: Commands, config: &Config, catalog: C, suggester: S) -> Result<()>
where
    C: CatalogService,
    S: SuggestionService,
{
    let orchestrator =
        OutlierSearchOrchestrator::new(catalog, suggester).with_settings(config.search_settings());

    match command {
        Commands::Search {
            keyword,
            shorts,
            bins,
            max_age_days,
            suggestions,
            json,
            explain,
        } => {
            let mut settings = *orchestrator.settings();
            if let Some(bins) = bins {
                settings.histogram_bins = bins;
            }
            if let Some(max) = suggestions {
                settings.max_suggestions = max;
            }
            settings.max_age_days = max_age_days;

            let content_type = if shorts {
                ContentType::Short
            } else {
                ContentType::Video
            };
            let request = SearchRequest::new(keyword, content_type);
            handle_search(&orchestrator.with_settings(settings), &request, json, explain).await
        }
        Commands::Baseline { channel_id, json } => {
            handle_baseline(&orchestrator, &channel_id, json).await
        }
        Commands::Score { views, baseline } => handle_score(views, baseline),
    }
}

/// Handle the 'search' command
async fn handle_search<C, S>(
    orchestrator: &OutlierSearchOrchestrator<C, S>,
    request: &SearchRequest,
    json: bool,
    explain: bool,
) -> Result<()>
where
    C: CatalogService,
    S: SuggestionService,
{
    let outcome = orchestrator.search(request).await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
        return match outcome {
            SearchOutcome::Completed(_) => Ok(()),
            _ => Err(anyhow!("search did not complete")),
        };
    }

    let report = outcome.into_result()?;
    print!("{}", render::format_search(&report, explain));
    Ok(())
}

/// Handle the 'baseline' command
async fn handle_baseline<C, S>(
    orchestrator: &OutlierSearchOrchestrator<C, S>,
    channel_id: &str,
    json: bool,
) -> Result<()>
where
    C: CatalogService,
    S: SuggestionService,
{
    let baseline = orchestrator.channel_baseline(channel_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&baseline)?);
    } else {
        println!(
            "{} {}",
            format!("Channel {channel_id}:").bold().blue(),
            render::describe_baseline(&baseline)
        );
    }

    if baseline.is_unavailable() {
        return Err(anyhow!("baseline for {channel_id} could not be fetched"));
    }
    Ok(())
}

/// Handle the 'score' command
fn handle_score(views: u64, baseline: f64) -> Result<()> {
    let score = outlier_score(views, baseline);
    let band = ScoreBand::from_score(score);
    println!(
        "{} views against a baseline of {}: {} ({})",
        render::format_count(views),
        baseline,
        render::colored_score(score),
        band
    );
    Ok(())
}
