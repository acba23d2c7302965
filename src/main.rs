use anyhow::Context;
use clap::{Parser, Subcommand};
use peoria_dei_scraper::config::Config;
use peoria_dei_scraper::fetch::{CachedPageSource, HttpPageSource, PageCache};
use peoria_dei_scraper::logging;
use peoria_dei_scraper::metrics::{init_metrics, write_snapshot};
use peoria_dei_scraper::normalize::UsAddressParser;
use peoria_dei_scraper::output::{write_json, write_output};
use peoria_dei_scraper::pipeline::Pipeline;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "peoria_dei_scraper")]
#[command(about = "Business diversity certification directory scraper")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every listed business and write CSV and JSON output
    Run {
        #[arg(long)]
        listing_url: Option<String>,
        /// Directory where fetched detail pages are cached
        #[arg(long)]
        pages_dir: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the detail page URLs found on the listing
    Links {
        #[arg(long)]
        listing_url: Option<String>,
    },
    /// Parse a saved detail page and print its record as JSON
    Parse {
        file: PathBuf,
        /// URL the page was fetched from
        #[arg(long, default_value = "")]
        url: String,
    },
}

fn http_source(config: &Config) -> anyhow::Result<HttpPageSource> {
    HttpPageSource::new(config.http.timeout_seconds, &config.http.user_agent)
        .context("Failed to build HTTP client")
}

fn run(
    config: &Config,
    listing_url: Option<String>,
    pages_dir: Option<PathBuf>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let listing_url = listing_url.unwrap_or_else(|| config.scrape.listing_url.clone());
    let pages_dir = pages_dir.unwrap_or_else(|| config.scrape.pages_dir.clone());
    let csv = csv.unwrap_or_else(|| config.output.csv_path.clone());
    let json = json.unwrap_or_else(|| config.output.json_path.clone());

    let metrics = init_metrics();
    let http = http_source(config)?;
    let pages = CachedPageSource::new(http_source(config)?, PageCache::new(&pages_dir));
    let addresses = UsAddressParser::new();
    let pipeline = Pipeline::new(&http, &pages, &addresses);

    let result = pipeline
        .run(&listing_url)
        .with_context(|| format!("Failed to read listing {}", listing_url))?;

    if !result.errors.is_empty() {
        warn!("{} pages failed", result.errors.len());
        for e in &result.errors {
            warn!("  - {}", e);
        }
    }

    write_output(&result.records, &csv, &json).context("Failed to write output")?;
    if let Some(handle) = &metrics {
        write_snapshot(handle, &config.output.metrics_path).context("Failed to write metrics")?;
    }
    info!(
        "Wrote {} records ({} of {} pages failed)",
        result.records.len(),
        result.failed,
        result.total_links
    );
    Ok(())
}

fn links(config: &Config, listing_url: Option<String>) -> anyhow::Result<()> {
    let listing_url = listing_url.unwrap_or_else(|| config.scrape.listing_url.clone());
    let http = http_source(config)?;
    let addresses = UsAddressParser::new();
    let pipeline = Pipeline::new(&http, &http, &addresses);
    for link in pipeline.discover(&listing_url)? {
        println!("{}", link);
    }
    Ok(())
}

fn parse(config: &Config, file: &Path, url: &str) -> anyhow::Result<()> {
    let html = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let http = http_source(config)?;
    let addresses = UsAddressParser::new();
    let pipeline = Pipeline::new(&http, &http, &addresses);
    let record = pipeline.process_page(url, &html)?;
    write_json(std::io::stdout().lock(), &[record])?;
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli.log_dir);

    let config = Config::load(cli.config.as_deref())?;

    let outcome = match cli.command {
        Commands::Run {
            listing_url,
            pages_dir,
            csv,
            json,
        } => run(&config, listing_url, pages_dir, csv, json),
        Commands::Links { listing_url } => links(&config, listing_url),
        Commands::Parse { file, url } => parse(&config, &file, &url),
    };

    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    outcome
}
