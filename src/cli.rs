//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stortab")]
#[command(author, version, about = "Storage definition table for flash tools", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the storage definition file (.ron or .toml)
    /// Defaults to ./storage_setting.ron and /usr/share/stortab/storage_setting.ron
    #[arg(long, global = true)]
    pub storage_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a storage for a platform and show its configuration
    Query {
        /// Platform name (e.g. MT6765)
        #[arg(short, long)]
        platform: String,

        /// Storage name as defined for the platform
        #[arg(short, long)]
        storage: String,
    },

    /// List storage entries
    List {
        /// Only show this platform
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Show the storage type to name index
    Types,

    /// Dump the whole table to the log
    Dump,

    /// Write the table back out (format chosen by extension)
    Convert {
        /// Output file (.ron or .toml)
        #[arg(short, long)]
        output: PathBuf,
    },
}
