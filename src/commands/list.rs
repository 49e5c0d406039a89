//! List commands implementation

use stortab_core::{StorageTable, StorageType};

/// List storage entries, optionally for one platform only
pub fn cmd_list(
    table: &StorageTable,
    platform_filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(name) = platform_filter {
        if table.platform(name).is_none() {
            return Err(format!("Platform '{}' not found in storage table", name).into());
        }
    }

    println!(
        "{:<12} {:<16} {:<8} {:<9} {:<7} {:<8} {:>5}",
        "Platform", "Storage", "Support", "AutoFmt", "Type", "Memory", "Width"
    );
    println!("{}", "-".repeat(71));

    for platform in table.platforms() {
        if platform_filter.is_some_and(|name| name != platform.name()) {
            continue;
        }

        for info in platform.iter() {
            println!(
                "{:<12} {:<16} {:<8} {:<9} {:<7} {:<8} {:>5}",
                platform.name(),
                info.storage_name(),
                yes_no(info.is_support()),
                yes_no(info.is_support_auto_format()),
                info.storage_type(),
                info.memory_type(),
                info.addressing_width()
            );
        }
    }

    Ok(())
}

/// Show which storage name each storage type maps to
pub fn cmd_types(table: &StorageTable) {
    println!("{:<8} Name", "Type");
    println!("{}", "-".repeat(24));
    for ty in StorageType::ALL {
        println!("{:<8} {}", ty, table.display_name_for(ty));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
