use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use ef_core::{Error, Result};
use ef_feed::ChannelInfo;
use ef_scraper::pipeline::{self, RunConfig};
use ef_scraper::HttpFetcher;
use ef_web::AppState;
use tracing::{error, info};
use url::Url;

/// Interval value accepting unit suffixes, e.g. `1d`, `12h`, `1h30m`, `90s`.
/// A bare number is read as seconds.
#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds += num;
                    has_unit = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Republish an essay archive as a feed", long_about = None)]
struct Cli {
    /// Base URL of the site; article links resolve against it
    #[arg(long, default_value = "https://paulgraham.com/")]
    base_url: String,
    /// Index page listing every essay, relative to the base URL
    #[arg(long, default_value = "articles.html")]
    index_page: String,
    /// How many of the newest articles the feed holds (at most 10)
    #[arg(long, default_value_t = 5)]
    window: usize,
    /// Pause between article fetches, in milliseconds
    #[arg(long, default_value_t = 50)]
    delay_ms: u64,
    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline once and write the feed out
    Scrape {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Output path; "-" writes to stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Scrape on an interval and serve the feed over HTTP
    Serve {
        /// Rescrape interval, e.g. 1d, 12h, 90m
        #[arg(long, default_value = "1d")]
        interval: HumanDuration,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Rss,
}

fn run_config(cli: &Cli) -> Result<RunConfig> {
    let base_url = Url::parse(&cli.base_url)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", cli.base_url, e)))?;
    let mut config = RunConfig::new(base_url);
    config.index_page = cli.index_page.clone();
    config.window = cli.window;
    config.delay = Duration::from_millis(cli.delay_ms);
    Ok(config)
}

fn channel_info(config: &RunConfig) -> ChannelInfo {
    ChannelInfo {
        title: "Paul Graham: Essays".to_string(),
        link: config.base_url.to_string(),
        description: format!("The latest essays from {}", config.base_url),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = run_config(&cli)?;
    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout))?;

    match cli.command {
        Commands::Scrape { format, out } => {
            let records = pipeline::run(&fetcher, &config).await?;
            let (rendered, default_path) = match format {
                Format::Json => (ef_feed::json::render(&records)?, "rss_feed.json"),
                Format::Rss => {
                    let channel = channel_info(&config);
                    (ef_feed::rss::render(&channel, &records)?, "feed.xml")
                }
            };
            let out = out.unwrap_or_else(|| PathBuf::from(default_path));
            if out.as_os_str() == "-" {
                println!("{}", rendered);
            } else {
                std::fs::write(&out, rendered)?;
                info!("Feed with {} records written to {}", records.len(), out.display());
            }
        }
        Commands::Serve { interval, port } => {
            serve(fetcher, config, interval.0, port).await?;
        }
    }
    Ok(())
}

async fn serve(fetcher: HttpFetcher, config: RunConfig, interval: Duration, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new());

    // The first run happens before the listener binds, so the feed is
    // populated at the first request. If it fails the server still comes up
    // with an empty feed and the next cycle retries.
    match pipeline::run(&fetcher, &config).await {
        Ok(records) => state.replace_feed(records).await,
        Err(e) => error!("Initial scrape failed: {}", e),
    }

    // One loop, scrape then sleep: cycles can never overlap, so the origin
    // server never sees more than one crawl at a time.
    let loop_state = state.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            info!("Starting scrape cycle");
            match pipeline::run(&fetcher, &config).await {
                Ok(records) => loop_state.replace_feed(records).await,
                Err(e) => error!("Scrape cycle failed: {}", e),
            }
        }
    });

    let app = ef_web::create_app(state);
    let addr = format!("0.0.0.0:{}", port);
    info!("Serving feed on http://{}/feed.json", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
