//! misra-report CLI tool.
//!
//! Usage:
//! ```bash
//! misra-report report [OPTIONS]
//! misra-report violations <XML> [-o FILE]
//! misra-report summary <XML> <CATALOG>
//! misra-report init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod renderer;
mod vcs;

/// MISRA C:2012 compliance reporting from cppcheck XML output
#[derive(Parser)]
#[command(name = "misra-report")]
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
    /// Run the full reporting pipeline: CSVs plus the compliance document
    Report {
        /// File name of the rendered document (placed in the output directory)
        #[arg(long, default_value = "compliance_report.html")]
        document: String,

        /// Custom HTML template with named {{slot}} placeholders
        #[arg(long)]
        template: Option<PathBuf>,

        /// Convert the HTML document to PDF with this external binary
        #[arg(long)]
        pdf_converter: Option<PathBuf>,

        /// Repository to read commit metadata from
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Skip the document stage; emit only the CSV artifacts
        #[arg(long)]
        no_document: bool,

        /// Exit with a nonzero status when the result is Noncompliant
        #[arg(long)]
        strict: bool,
    },

    /// Parse violations XML and emit the flat per-violation CSV only
    Violations {
        /// cppcheck XML output file
        xml: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Violation id to exclude (can be specified multiple times)
        #[arg(long = "ignore")]
        ignored: Vec<String>,
    },

    /// Aggregate violations against the catalog and print the summary
    Summary {
        /// cppcheck XML output file
        xml: PathBuf,

        /// Plain-text rule catalog
        catalog: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Violation id to exclude (can be specified multiple times)
        #[arg(long = "ignore")]
        ignored: Vec<String>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for the summary command.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
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
        .init();

    match cli.command {
        Commands::Report {
            document,
            template,
            pdf_converter,
            repo,
            no_document,
            strict,
        } => commands::report::run(&commands::report::Options {
            config: cli.config,
            document,
            template,
            pdf_converter,
            repo,
            no_document,
            strict,
        }),
        Commands::Violations {
            xml,
            output,
            ignored,
        } => commands::violations::run(&xml, output.as_deref(), ignored),
        Commands::Summary {
            xml,
            catalog,
            format,
            ignored,
        } => commands::summary::run(&xml, &catalog, format, ignored),
        Commands::Init { force } => commands::init::run(force),
    }
}
