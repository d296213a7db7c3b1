//! Implementation of `actboard activities`.

use std::io::Write;

use anyhow::Result;

use actboard_core::{AggregatingActivityCache, Settings, TableModel};

use crate::cli::commands::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// Show the merged activities of every group the current user belongs to.
///
/// Groups whose table can't be read are skipped and listed on stderr.
#[tracing::instrument(skip(settings, format, out), fields(user = %settings.user))]
pub fn run_activities(settings: &Settings, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let store = open_store(settings)?;
    let mut cache = AggregatingActivityCache::new(&store);

    let report = cache.refresh(&settings.user)?;
    for failure in &report.failures {
        eprintln!("warning: skipped group '{}': {}", failure.group, failure.error);
    }

    Formatter::new(format).write_table(out, "activities", &cache.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::helpers::testing::settings;
    use actboard_core::{ActivityStore, GroupActivity};
    use tempfile::tempdir;

    fn seed(db: &std::path::Path) {
        let store = ActivityStore::open(db).unwrap();
        store.init_schema().unwrap();
        store.add_membership("g1", "u1", "u1").unwrap();
        store.add_membership("g2", "u2", "u1").unwrap();
        for (group, data) in [("g1", "a"), ("g2", "b"), ("g2", "a")] {
            store.create_group(group).unwrap();
            store
                .add_activity(
                    group,
                    &GroupActivity {
                        data: data.to_string(),
                        added_by: "u1".to_string(),
                        value: String::new(),
                        description: "d".to_string(),
                    },
                )
                .unwrap();
        }
    }

    #[test]
    fn test_activities_are_merged_across_groups() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("board.db");
        seed(&db);
        let mut out = Vec::new();

        run_activities(&settings(&db, "u1", ""), OutputFormat::Text, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "activities (2 rows)");
        assert!(lines[2].starts_with('a'));
        assert!(lines[3].starts_with('b'));
    }

    #[test]
    fn test_no_user_prints_empty_table() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("board.db");
        seed(&db);
        let mut out = Vec::new();

        run_activities(&settings(&db, "", ""), OutputFormat::Json, &mut out).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["count"], 0);
    }
}
