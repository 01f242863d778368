use crate::io::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seaplan")]
#[command(about = "Marine spatial planning overlap metric reports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an overlap report for a plan
    Report {
        /// Path to the plan JSON (a sketch or sketch collection)
        plan: PathBuf,

        /// Project configuration JSON (metric groups, objectives, precalc)
        #[arg(short, long)]
        config: PathBuf,

        /// Precomputed overlap metrics JSON
        #[arg(short, long)]
        metrics: PathBuf,

        /// Metric group to report on
        #[arg(short = 'g', long = "metric-group")]
        metric_group: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a project configuration file
    Validate {
        /// Project configuration JSON
        config: PathBuf,
    },
}
