//! Command-line front end.
//!
//! Runs one catalog search through the enrichment pipeline and writes either
//! a spreadsheet or a directory of geodatabase tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bildested::catalog::FetchLimit;
use bildested::export::{write_geodatabase, write_spreadsheet, GeodatabaseOptions};
use bildested::{Config, ParsePolicy, Pipeline, PipelineOptions, PipelineOutput, SearchRequest};

#[derive(Parser, Debug)]
#[command(name = "bildested")]
#[command(about = "Place NB catalog images on the map via Geonorge place names")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one spreadsheet row per image
    Spreadsheet {
        #[command(flatten)]
        search: SearchArgs,

        /// Output file; `.xlsx` is appended when missing
        #[arg(short, long, default_value = "bilder.xlsx")]
        output: PathBuf,
    },
    /// Write a main table plus one point table per place-name category
    Geodatabase {
        #[command(flatten)]
        search: SearchArgs,

        /// Output directory
        #[arg(long)]
        gdb: PathBuf,

        /// Main table name (overrides config)
        #[arg(long)]
        main_table: Option<String>,

        /// Point table prefix (overrides config)
        #[arg(long)]
        point_prefix: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Free-text catalog search
    #[arg(short, long)]
    query: String,

    /// Stop after this many images with geographic metadata
    #[arg(long, conflicts_with = "max_pages")]
    max_results: Option<usize>,

    /// Request at most this many catalog pages
    #[arg(long)]
    max_pages: Option<usize>,

    /// Catalog page size (overrides config)
    #[arg(long)]
    page_size: Option<usize>,

    /// How geographic strings are split into fields
    #[arg(long, value_enum)]
    policy: Option<ParsePolicy>,
}

impl SearchArgs {
    fn request(&self) -> SearchRequest {
        let limit = match (self.max_results, self.max_pages) {
            (Some(n), _) => FetchLimit::MaxResults(n),
            (None, Some(n)) => FetchLimit::MaxPages(n),
            (None, None) => FetchLimit::Unbounded,
        };
        SearchRequest {
            query: self.query.clone(),
            limit,
        }
    }
}

fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

async fn run_search(
    config: &Config,
    search: &SearchArgs,
    preset: PipelineOptions,
) -> Result<PipelineOutput> {
    let mut config = config.clone();
    if let Some(size) = search.page_size {
        config.catalog.page_size = size;
    }

    let mut options = preset.with_parser_config(&config.parser);
    if let Some(policy) = search.policy {
        options.policy = policy;
    }

    let pipeline =
        Pipeline::from_config(&config, &options).context("Failed to set up HTTP clients")?;

    let pb = progress_bar()?;
    let output = pipeline.run(&search.request(), &pb).await;
    pb.finish_and_clear();

    if let Some(e) = &output.fetch_error {
        warn!(
            "Search was cut short after {} page(s); exporting partial results ({})",
            output.pages_fetched, e
        );
    }
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::default(),
    };

    match &args.command {
        Command::Spreadsheet { search, output } => {
            let result = run_search(&config, search, PipelineOptions::spreadsheet()).await?;
            if result.records.is_empty() {
                println!("no results with geographic information");
                return Ok(());
            }

            let path = write_spreadsheet(&result.records, output)
                .context("Failed to write spreadsheet")?;
            info!("Spreadsheet written to {}", path.display());
        }
        Command::Geodatabase {
            search,
            gdb,
            main_table,
            point_prefix,
        } => {
            let result = run_search(&config, search, PipelineOptions::geodatabase()).await?;
            if result.records.is_empty() {
                println!("no results with geographic information");
                return Ok(());
            }

            let mut options = GeodatabaseOptions::from(&config.geodatabase);
            if let Some(name) = main_table {
                options.main_table = name.clone();
            }
            if let Some(prefix) = point_prefix {
                options.point_table_prefix = prefix.clone();
            }

            let written = write_geodatabase(&result.records, &result.categories, gdb, &options)
                .with_context(|| format!("Failed to write geodatabase: {}", gdb.display()))?;
            info!("{} table(s) written to {}", written.len(), gdb.display());
        }
    }

    Ok(())
}
