//! scss-doc CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "scss-doc")]
#[command(version)]
#[command(about = "Extract documentation from SCSS stylesheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract documentation from a single SCSS file
    Parse {
        /// SCSS file to read
        file: PathBuf,

        /// Content type stamped on every entity
        #[arg(long, default_value = scss_doc::STYLESHEET_SOURCE)]
        content_type: String,

        /// Content kind stamped on every entity
        #[arg(long, default_value = scss_doc::CSS)]
        content_kind: String,

        /// Fail on SCSS syntax errors instead of printing no documentation
        #[arg(long)]
        strict: bool,
    },

    /// Extract documentation from every matching SCSS file below a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Glob relative to DIR (repeatable, defaults to /*.scss and /sass/*.scss)
        #[arg(short, long = "glob")]
        globs: Vec<String>,

        /// Content type stamped on every entity
        #[arg(long, default_value = scss_doc::STYLESHEET_SOURCE)]
        content_type: String,

        /// Content kind stamped on every entity
        #[arg(long, default_value = scss_doc::CSS)]
        content_kind: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scss_doc=info,scss_doc_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Parse {
            file,
            content_type,
            content_kind,
            strict,
        } => commands::parse::execute(commands::parse::ParseArgs {
            file,
            content_type,
            content_kind,
            strict,
        })?,
        Commands::Scan {
            dir,
            globs,
            content_type,
            content_kind,
        } => commands::scan::execute(commands::scan::ScanArgs {
            dir,
            globs,
            content_type,
            content_kind,
        })?,
    };

    println!("{output}");
    Ok(())
}
