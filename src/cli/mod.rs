pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(about = "Harvest featured repositories and their owners into CSV files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through search results and write users.csv and repositories.csv
    Harvest {
        /// Directory the CSV files are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Search keyword placed in front of the featured filter
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Validate configuration and probe the search endpoint
    Check,
}
