//! stacksift - search, filter and export a curated Python library catalog
//!
//! Results go to stdout; logs and traces go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stacksift_core::catalog::{Catalog, CollectionSet};
use stacksift_core::config::StacksiftConfig;
use stacksift_core::search::SearchEngine;

mod catalog_cli;
mod guided_cli;

use catalog_cli::{ExportScopeArg, QueryArgs};
use guided_cli::GuidedArgs;

/// Trace modules for structured tracing
#[derive(Debug, Clone, ValueEnum)]
enum TraceModule {
    Normalize,
    Search,
    Guided,
    Export,
    All,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "stacksift",
    about = "Search, filter and export a curated catalog of Python libraries",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Configuration file (defaults to the platform config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for popularity jitter, making scores reproducible
    #[clap(long, global = true)]
    seed: Option<u64>,

    /// Enable structured tracing (comma-separated: normalize,search,guided,export,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog
    Search {
        #[clap(flatten)]
        query: QueryArgs,

        /// Show at most this many results
        #[clap(long)]
        limit: Option<usize>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show one library in detail
    Show {
        /// Library id (e.g. lib_3) or name
        name: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List categories with entry counts
    Categories {
        /// Only categories containing this text
        #[clap(long)]
        filter: Option<String>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List curated collections
    Collections {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Compare two libraries side by side
    Compare {
        /// First library id or name
        left: String,
        /// Second library id or name
        right: String,
    },

    /// Domain distribution and most popular libraries of a result set
    Stats {
        #[clap(flatten)]
        query: QueryArgs,

        /// Number of libraries in the popularity ranking
        #[clap(long, default_value_t = 10)]
        top: usize,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Write a requirements file
    Export {
        /// Which libraries to export
        #[clap(long, value_enum, default_value = "visible")]
        scope: ExportScopeArg,

        #[clap(flatten)]
        query: QueryArgs,

        /// Output file or directory (stdout when omitted)
        #[clap(long, short)]
        output: Option<PathBuf>,
    },

    /// Build a search from guided choices and run it
    Guided(GuidedArgs),
}

/// Everything a command needs, loaded once per invocation
pub struct App {
    pub config: StacksiftConfig,
    pub catalog: Catalog,
    pub collections: CollectionSet,
    pub engine: SearchEngine,
}

impl App {
    fn load(config_path: Option<&Path>, seed: Option<u64>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => StacksiftConfig::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => StacksiftConfig::load().context("Failed to load configuration")?,
        };
        if seed.is_some() {
            config.popularity.jitter_seed = seed;
        }

        let catalog = config.catalog().context("Failed to load library catalog")?;
        let collections = config.collections().context("Failed to load collections")?;
        let engine = config.engine();
        debug!(
            entries = catalog.len(),
            collections = collections.len(),
            "Catalog ready"
        );

        Ok(Self {
            config,
            catalog,
            collections,
            engine,
        })
    }
}

fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule]) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        let directive = match module {
            TraceModule::Normalize => "stacksift_core::catalog=trace",
            TraceModule::Search => "stacksift_core::search=trace",
            TraceModule::Guided => "stacksift_core::guided=trace",
            TraceModule::Export => "stacksift_core::export=trace",
            TraceModule::All => "stacksift_core=trace",
        };

        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }

    if !trace_modules.is_empty() {
        // JSON output for structured tracing, on stderr
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(trace_modules = ?trace_modules, "stacksift tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace);

    let app = App::load(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Command::Search { query, limit, json } => {
            catalog_cli::execute_search(&app, &query, limit, json)
        }
        Command::Show { name, json } => catalog_cli::execute_show(&app, &name, json),
        Command::Categories { filter, json } => {
            catalog_cli::execute_categories(&app, filter.as_deref(), json)
        }
        Command::Collections { json } => catalog_cli::execute_collections(&app, json),
        Command::Compare { left, right } => catalog_cli::execute_compare(&app, &left, &right),
        Command::Stats { query, top, json } => {
            catalog_cli::execute_stats(&app, &query, top, json)
        }
        Command::Export {
            scope,
            query,
            output,
        } => catalog_cli::execute_export(&app, scope, &query, output.as_deref()),
        Command::Guided(args) => guided_cli::execute(&app, &args),
    }
}
