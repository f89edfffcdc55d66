//! javalint CLI tool.
//!
//! Usage:
//! ```bash
//! javalint check [OPTIONS] [PATH]
//! javalint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use javalint_core::Severity;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Naming-convention linter for Java source trees
#[derive(Parser)]
#[command(name = "javalint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "JAVALINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check naming rules and write the JSON reports
    Check {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Extraction strategy; overrides the config file
        #[arg(long)]
        strategy: Option<StrategyArg>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Print results without writing report files
        #[arg(long)]
        no_write: bool,

        /// Exit with status 1 if a violation at or above this severity exists
        #[arg(long, value_parser = parse_severity)]
        fail_on: Option<Severity>,
    },

    /// Initialize configuration and rule files
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output with source snippets.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Extraction strategy selection.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    /// Regex scanning of comment-stripped text
    Heuristic,
    /// In-process Tree-sitter parse
    TreeSitter,
    /// External parser command from the config file
    Subprocess,
}

impl From<StrategyArg> for javalint_core::Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Heuristic => Self::Heuristic,
            StrategyArg::TreeSitter => Self::TreeSitter,
            StrategyArg::Subprocess => Self::Subprocess,
        }
    }
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            strategy,
            format,
            exclude,
            no_write,
            fail_on,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                strategy: strategy.map(Into::into),
                format,
                exclude,
                no_write,
                fail_on,
            };
            let passed = commands::check::run(&path, &source, &options)?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init::run(std::path::Path::new("."), force),
    }
}
