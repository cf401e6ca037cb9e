//! Tally unified CLI.
//!
//! Quota-driven synthetic record generation with live dashboard snapshots.
//!
//! # Quick Start
//!
//! ```bash
//! # Write a tally.toml with the demo quotas
//! tally init ./demo
//!
//! # Generate until every quota is met (Ctrl+C to stop early)
//! tally run --project ./demo
//!
//! # Inspect the charts for one year
//! tally report --project ./demo --year 2024
//! ```

mod commands;
mod style;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Tally - quota-driven synthetic record generation with live dashboard snapshots.
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Write a tally.toml with the demo quotas.
    Init {
        /// Project directory.
        #[arg(default_value = ".")]
        path: String,

        /// Overwrite an existing tally.toml.
        #[arg(long)]
        force: bool,
    },

    /// Generate on a schedule until every quota is met or Ctrl+C.
    Run {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Keep records in memory instead of the configured file.
        #[arg(long)]
        ephemeral: bool,
    },

    /// Run a single generation batch.
    Generate {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Records to request (defaults to generator.batch_size).
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        count: Option<u64>,
    },

    /// List stored records.
    List {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Show at most this many records, newest first.
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },

    /// Print the dashboard aggregates.
    Report {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Year for the monthly trend (defaults to dashboard.year).
        #[arg(short, long)]
        year: Option<i32>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete every stored record.
    Reset {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Init { path, force } => commands::init::run(&path, force),
        Commands::Run { project, ephemeral } => commands::run::run(&project, ephemeral),
        Commands::Generate { project, count } => commands::generate::run(&project, count),
        Commands::List { project, limit } => commands::list::run(&project, limit),
        Commands::Report {
            project,
            year,
            json,
        } => commands::report::run(&project, year, json),
        Commands::Reset { project } => commands::reset::run(&project),
    }
}
