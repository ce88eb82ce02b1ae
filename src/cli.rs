use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dmboard")]
#[command(about = "DM activity dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show today's activity once (default)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Use sample data instead of Google Drive
        #[arg(long)]
        sample: bool,
    },

    /// Interactive dashboard (r to refresh, q to quit)
    Watch {
        /// Use sample data instead of Google Drive
        #[arg(long)]
        sample: bool,
    },

    /// Print a synthetic dataset
    Sample {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration status
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a Google service account key file
    Auth {
        /// Path to the service account JSON key
        path: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Show {
            json: false,
            sample: false,
        }
    }
}
