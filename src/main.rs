// Harvest - website contact extraction service
// Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use harvest::config::{load_config, LogFormat, Settings};
use harvest::crawl::Scraper;
use harvest::report::{read_url_column, ResultStore};

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Find emails and phone numbers on websites", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults: ~/.harvest/config.toml, ./harvest.toml)
    #[arg(short, long, global = true, env = "HARVEST_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format (overrides config)
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Bind address, e.g. 0.0.0.0:8000
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Scrape one site and print the report as JSON
    Extract {
        /// Site URL or bare host
        url: String,
    },

    /// Scrape many sites and write a results CSV
    Bulk {
        /// A header-less CSV whose first column holds URLs
        #[arg(short, long, conflicts_with = "urls")]
        file: Option<PathBuf>,

        /// URLs given directly
        urls: Vec<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn parse_log_format(s: &str) -> std::result::Result<LogFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormat::Pretty),
        "compact" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format '{other}' (pretty, compact, json)")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    harvest::logging::init(&settings.logging);

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.server.bind_address = bind;
                settings.validate()?;
            }
            harvest::server::serve(&settings).await
        }
        Commands::Extract { url } => {
            let scraper = Scraper::from_config(&settings.scraper)?;
            let report = scraper.scrape(&url).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Bulk { file, urls } => run_bulk(&settings, file, urls).await,
        Commands::Config => {
            print!("{}", settings.to_toml().context("Failed to render configuration")?);
            Ok(())
        }
    }
}

async fn run_bulk(settings: &Settings, file: Option<PathBuf>, urls: Vec<String>) -> Result<()> {
    let urls = match file {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            read_url_column(&bytes)?
        }
        None => urls,
    };
    if urls.is_empty() {
        anyhow::bail!("No URLs given. Pass URLs as arguments or use --file <csv>");
    }

    let scraper = Scraper::from_config(&settings.scraper)?;
    let reports = scraper.scrape_many(urls).await;

    let store = ResultStore::new(&settings.output.results_dir);
    let filename = store.write(&reports)?;

    let reachable = reports.iter().filter(|r| r.is_reachable()).count();
    eprintln!(
        "✓ {} of {} sites reachable, results in {}",
        reachable,
        reports.len(),
        store.dir().join(&filename).display()
    );
    Ok(())
}
