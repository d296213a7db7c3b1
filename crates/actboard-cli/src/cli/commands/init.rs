//! Implementation of `actboard init`.

use std::io::Write;

use anyhow::Result;

use actboard_core::Settings;

use crate::cli::commands::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// Create the database and its membership table.
#[tracing::instrument(skip(settings, format, out), fields(db = %settings.db_path.display()))]
pub fn run_init(settings: &Settings, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    open_store(settings)?;

    let output = serde_json::json!({
        "db": settings.db_path.display().to_string(),
        "initialized": true,
    });
    Formatter::new(format).write(out, &output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::helpers::testing::settings;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_database() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("board.db");
        let mut out = Vec::new();

        run_init(&settings(&db, "", ""), OutputFormat::Json, &mut out).unwrap();

        assert!(db.exists());
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["initialized"], true);
    }
}
