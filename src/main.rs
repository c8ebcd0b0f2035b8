use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use yt_insights::{render, Config, ExtensionMessage, Feature, InsightSession};

#[derive(Parser)]
#[command(name = "yt-insights")]
#[command(version, author = "TigreRoll")]
#[command(about = "AI insights for YouTube videos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Insights backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Saved watch page HTML used to resolve the video title
    #[arg(long, global = true)]
    page: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,
    /// Summarize a video
    Summarize { url: String },
    /// Generate chapter timestamps
    Timestamps { url: String },
    /// Extract key terms with Wikipedia context
    Keypoints { url: String },
    /// Analyze comment sentiment
    Factcheck { url: String },
    /// Summarize one chapter
    Segment { url: String, segment_id: u32 },
    /// Send a raw extension message, e.g. '{"action":"getVideoDetails"}'
    Message { url: String, json: String },
}

fn load_config(cli: &Cli) -> (Config, Option<String>) {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let (mut config, warning) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (
            Config::default(),
            Some(format!("Failed to load config, using defaults: {}", e)),
        ),
    };

    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    (config, warning)
}

async fn open_session(cli: &Cli, config: Config, url: &str) -> Result<InsightSession> {
    let html = match &cli.page {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read page {}", path.display()))?,
        ),
        None => None,
    };

    let session = InsightSession::connect(config)?;
    session.observe_page(url, html.as_deref()).await;

    match session.video() {
        Some(video) => info!("🎬 {} ({})", video.title(), video.id()),
        None => bail!("Not a YouTube video URL: {}", url),
    }
    Ok(session)
}

async fn run_feature(cli: &Cli, config: Config, url: &str, feature: Feature) -> Result<()> {
    let session = open_session(cli, config, url).await?;
    let payload = session.request(feature).await?;
    println!("{}", render(&payload).to_text());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, warning) = load_config(&cli);

    // Initialize logging
    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("yt_insights={},warn", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(warning) = warning {
        warn!("{}", warning);
    }
    debug!("{}", config.summary());

    match &cli.command {
        Commands::Health => {
            let base_url = config.backend.base_url.clone();
            let session = InsightSession::connect(config)?;
            if session.verify_connection().await {
                info!("✅ Backend reachable at {}", base_url);
                println!("ok");
            } else {
                bail!(yt_insights::DispatchError::Connection { base_url });
            }
        }
        Commands::Summarize { url } => run_feature(&cli, config, url, Feature::Summarize).await?,
        Commands::Timestamps { url } => run_feature(&cli, config, url, Feature::Timestamps).await?,
        Commands::Keypoints { url } => {
            run_feature(&cli, config, url, Feature::KeyPointsWiki).await?
        }
        Commands::Factcheck { url } => run_feature(&cli, config, url, Feature::FactCheck).await?,
        Commands::Segment { url, segment_id } => {
            let session = open_session(&cli, config, url).await?;
            let summary = session.segment_summary(*segment_id).await?;
            println!("{}", summary.trim());
        }
        Commands::Message { url, json } => {
            let message = ExtensionMessage::from_json(json)
                .map_err(|e| anyhow!("Invalid extension message: {}", e))?;
            let session = open_session(&cli, config, url).await?;
            let response = session.handle_message(message).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
