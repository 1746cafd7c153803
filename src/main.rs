//! Event Registry command-line entry point
//!
//! Counts and lists the articles of an event through the paged iterator.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use event_registry::config::{load_settings_with_hash, Settings};
use event_registry::query::{QuerySpec, SortBy, SortDirection};
use event_registry::{HttpExecutor, PagedIterator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Event Registry client
///
/// Queries the articles of an event, page by page, and checks that the
/// service's counts agree with what it returns.
#[derive(Parser, Debug)]
#[command(name = "event-registry")]
#[command(version)]
#[command(about = "Event Registry article iteration client", long_about = None)]
struct Cli {
    /// Path to TOML settings file
    #[arg(value_name = "SETTINGS")]
    settings: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the settings file and show what would be used
    Check,

    /// Print the number of articles matching the filters
    Count(FilterArgs),

    /// Print the URI of every matching article, one per line
    Articles {
        #[command(flatten)]
        filters: FilterArgs,

        /// Sort key (date, id, rel, cosSim, socialScore, sourceImportance)
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort ascending
        #[arg(long, requires = "sort_by", conflicts_with = "desc")]
        asc: bool,

        /// Sort descending
        #[arg(long, requires = "sort_by")]
        desc: bool,

        /// Stop after this many articles
        #[arg(long)]
        limit: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Event URI, e.g. eng-2860795
    #[arg(long)]
    event: String,

    /// Article language (ISO 639-3)
    #[arg(long)]
    lang: Option<String>,

    /// Concept URI
    #[arg(long)]
    concept: Option<String>,

    /// Keyword
    #[arg(long)]
    keyword: Option<String>,

    /// News source URI
    #[arg(long)]
    source: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading settings from: {}", cli.settings.display());
    let (settings, hash) = load_settings_with_hash(&cli.settings)
        .with_context(|| format!("failed to load settings from {}", cli.settings.display()))?;
    tracing::info!("Settings loaded (hash: {})", hash);

    match cli.command {
        Command::Check => handle_check(&settings),
        Command::Count(filters) => handle_count(&settings, &filters).await,
        Command::Articles {
            filters,
            sort_by,
            asc,
            desc,
            limit,
        } => {
            let sort = match sort_by {
                Some(key) => {
                    let key = SortBy::from_wire(&key)
                        .with_context(|| format!("unknown sort key '{}'", key))?;
                    let direction = if asc {
                        Some(SortDirection::Ascending)
                    } else if desc {
                        Some(SortDirection::Descending)
                    } else {
                        None
                    };
                    Some((key, direction))
                }
                None => None,
            };
            handle_articles(&settings, &filters, sort, limit).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("event_registry=info,warn"),
            1 => EnvFilter::new("event_registry=debug,info"),
            2 => EnvFilter::new("event_registry=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_spec(
    settings: &Settings,
    filters: &FilterArgs,
    sort: Option<(SortBy, Option<SortDirection>)>,
) -> Result<QuerySpec> {
    let mut builder = QuerySpec::for_event(&filters.event).page_size(settings.paging.page_size);
    if let Some(lang) = &filters.lang {
        builder = builder.lang(lang);
    }
    if let Some(concept) = &filters.concept {
        builder = builder.concept(concept);
    }
    if let Some(keyword) = &filters.keyword {
        builder = builder.keyword(keyword);
    }
    if let Some(source) = &filters.source {
        builder = builder.source(source);
    }
    builder = match sort {
        Some((key, Some(direction))) => builder.sort(key, direction),
        Some((key, None)) => builder.sort_by(key),
        None => builder,
    };
    builder.build().context("invalid query")
}

/// Handles `check`: shows the effective settings
fn handle_check(settings: &Settings) -> Result<()> {
    println!("=== Event Registry Settings ===\n");
    println!("Service:");
    println!("  Base URL: {}", settings.service.base_url);
    println!(
        "  API key: {}",
        if settings.service.api_key.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    println!("  Request timeout: {}s", settings.service.request_timeout_secs);
    println!("  Connect timeout: {}s", settings.service.connect_timeout_secs);
    println!("\nClient:");
    println!("  User agent: {}", settings.client.user_agent());
    println!("\nPaging:");
    println!("  Page size: {}", settings.paging.page_size);
    println!("\n✓ Settings are valid");
    Ok(())
}

/// Handles `count`: one probe request, prints the total
async fn handle_count(settings: &Settings, filters: &FilterArgs) -> Result<()> {
    let executor = HttpExecutor::new(settings)?;
    let spec = build_spec(settings, filters, None)?;

    let mut iter = PagedIterator::new(&spec);
    let total = iter
        .count(&executor)
        .await
        .with_context(|| format!("failed to count articles of {}", spec.describe()))?;

    println!("{}", total);
    Ok(())
}

/// Handles `articles`: enumerates every page and prints article URIs
async fn handle_articles(
    settings: &Settings,
    filters: &FilterArgs,
    sort: Option<(SortBy, Option<SortDirection>)>,
    limit: Option<u64>,
) -> Result<()> {
    let executor = HttpExecutor::new(settings)?;
    let spec = build_spec(settings, filters, sort)?;

    let mut iter = PagedIterator::new(&spec);
    let total = iter.count(&executor).await?;
    tracing::info!("{} reports {} articles", spec.describe(), total);

    loop {
        if limit_reached(iter.yielded(), limit) {
            tracing::info!("Stopping after {} articles", iter.yielded());
            return Ok(());
        }
        let Some(article) = iter.next(&executor).await else {
            break;
        };
        let article = article?;
        println!("{}", article["uri"].as_str().unwrap_or("<no uri>"));
    }

    iter.ensure_consistent()?;
    tracing::info!(
        "Listed {} articles in {} pages",
        iter.yielded(),
        iter.pages_fetched()
    );
    Ok(())
}

/// Whether `--limit` allows no more articles after `yielded`
fn limit_reached(yielded: u64, limit: Option<u64>) -> bool {
    limit.is_some_and(|limit| yielded >= limit)
}
