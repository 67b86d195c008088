//! prisma-lint CLI tool.
//!
//! Usage:
//! ```bash
//! prisma-lint check [OPTIONS] [PATH]
//! prisma-lint list-rules
//! prisma-lint init
//! prisma-lint ast FILE
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Naming and soft-delete conventions for Prisma data access
#[derive(Parser)]
#[command(name = "prisma-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Directory or file to analyze (default: `[analyzer] root`, else the current directory)
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Preset to use instead of the configured one
        #[arg(long)]
        preset: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: ListFormat,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Print the syntax tree the rules see for a file, as JSON
    Ast {
        /// TypeScript or JavaScript file
        file: PathBuf,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets with labels, rendered by miette.
    Pretty,
}

/// Output format for `list-rules`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ListFormat {
    /// Table.
    #[default]
    Text,
    /// Full rule metadata as JSON.
    Json,
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
            format,
            rules,
            preset,
            exclude,
        } => {
            let start = path.clone().unwrap_or_else(|| PathBuf::from("."));
            let resolved = config_resolver::load(&start, cli.config.as_deref())?;
            let target = resolved.target(path.as_deref());
            let options = commands::check::CheckOptions {
                format,
                rules,
                preset,
                exclude,
            };
            let failed = commands::check::run(&target, &options, resolved.config)?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules { format } => {
            let resolved = config_resolver::load(std::path::Path::new("."), cli.config.as_deref())?;
            commands::list_rules::run(format, &resolved.config)
        }
        Commands::Init { force } => commands::init::run(force),
        Commands::Ast { file } => commands::ast::run(&file),
    }
}
