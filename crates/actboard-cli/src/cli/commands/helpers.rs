//! Shared helpers for CLI commands.

use anyhow::{Context, Result};

use actboard_core::{ActivityStore, Settings};

/// Open the store at the configured path and make sure its schema exists.
///
/// This is the recommended way to get a store in commands.
pub fn open_store(settings: &Settings) -> Result<ActivityStore> {
    let store = ActivityStore::open(&settings.db_path)?;
    store
        .init_schema()
        .with_context(|| format!("Failed to prepare {}", settings.db_path.display()))?;
    Ok(store)
}

#[cfg(test)]
pub mod testing {
    use std::path::Path;

    use actboard_core::Settings;

    pub fn settings(db: &Path, user: &str, group: &str) -> Settings {
        Settings {
            db_path: db.to_path_buf(),
            user: user.to_string(),
            group: group.to_string(),
        }
    }
}
