//! stortab - Storage definition table for flash tools
//!
//! Loads a storage definition file and answers which storage devices a
//! platform supports and how they must be addressed.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use stortab_core::{global, StorageTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let table = match load_storage_table(cli.storage_db.as_deref()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Failed to load storage table: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Loaded {} storage entries for {} platforms",
        table.entry_count(),
        table.platform_count()
    );
    if table.skipped_entries() > 0 {
        log::warn!("{} invalid storage entries skipped", table.skipped_entries());
    }

    let table = global::install(table)?;

    match cli.command {
        Commands::Query { platform, storage } => commands::cmd_query(table, &platform, &storage),
        Commands::List { platform } => commands::cmd_list(table, platform.as_deref()),
        Commands::Types => {
            commands::cmd_types(table);
            Ok(())
        }
        Commands::Dump => {
            table.dump();
            Ok(())
        }
        Commands::Convert { output } => commands::cmd_convert(table, &output),
    }
}

/// Load the storage table from the specified path or default locations
fn load_storage_table(path: Option<&Path>) -> Result<StorageTable, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(StorageTable::load_file(path)?);
    }

    let default_paths = [
        PathBuf::from("storage_setting.ron"),
        PathBuf::from("/usr/share/stortab/storage_setting.ron"),
        PathBuf::from("/usr/local/share/stortab/storage_setting.ron"),
    ];

    for file in &default_paths {
        if file.is_file() {
            log::debug!("Using storage table {}", file.display());
            return Ok(StorageTable::load_file(file)?);
        }
    }

    Err("No storage definition file found in default locations (use --storage-db)".into())
}
