//! SQLite storage for group memberships and per-group activity tables.
//!
//! `groups_relations` is a symmetric relation: a user belongs to a group if
//! they appear in either `user_1` or `user_2` of one of its rows. Each group
//! owns a separate `<group>_activities` table created on demand.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{params, Connection};

use crate::activity::{ActivityTable, GroupActivity};
use crate::errors::QueryError;
use crate::query::{QueryExecutor, Record};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS groups_relations (
    group_name TEXT NOT NULL,
    user_1 TEXT NOT NULL,
    user_2 TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_groups_relations_user_1 ON groups_relations(user_1);
CREATE INDEX IF NOT EXISTS idx_groups_relations_user_2 ON groups_relations(user_2);
";

/// Database holding memberships and activity tables.
pub struct ActivityStore {
    conn: Connection,
}

impl ActivityStore {
    /// Open or create a store at the given path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directories: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        Ok(Self { conn })
    }

    /// Create an in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Ok(Self { conn })
    }

    /// Create the membership table and its indexes if missing.
    pub fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .context("Failed to initialize schema")?;
        Ok(())
    }

    /// Create the activity table for `group` if it doesn't exist yet.
    pub fn create_group(&self, group: &str) -> Result<ActivityTable> {
        let table = ActivityTable::for_group(group)?;
        self.conn
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    data TEXT NOT NULL,
                    added_by TEXT NOT NULL,
                    value TEXT NOT NULL DEFAULT '',
                    description TEXT NOT NULL DEFAULT ''
                );",
                table.quoted()
            ))
            .with_context(|| format!("Failed to create table {table}"))?;
        Ok(table)
    }

    /// Record that `user_1` and `user_2` are related through `group`.
    pub fn add_membership(&self, group: &str, user_1: &str, user_2: &str) -> Result<()> {
        ActivityTable::for_group(group)?;
        self.conn
            .execute(
                "INSERT INTO groups_relations (group_name, user_1, user_2) VALUES (?, ?, ?)",
                params![group, user_1, user_2],
            )
            .context("Failed to insert group relation")?;
        Ok(())
    }

    /// Append an activity to the group's table.
    pub fn add_activity(&self, group: &str, activity: &GroupActivity) -> Result<()> {
        let table = ActivityTable::for_group(group)?;
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (data, added_by, value, description) VALUES (?, ?, ?, ?)",
                    table.quoted()
                ),
                params![
                    activity.data,
                    activity.added_by,
                    activity.value,
                    activity.description
                ],
            )
            .with_context(|| format!("Failed to insert activity into {table}"))?;
        Ok(())
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl QueryExecutor for ActivityStore {
    fn fetch(&self, sql: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, QueryError> {
        let mut stmt = self.conn.prepare(sql).map_err(|source| QueryError::Prepare {
            sql: sql.to_string(),
            source,
        })?;

        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let bound: Vec<(&str, &dyn ToSql)> = params
            .iter()
            .map(|(name, value)| (*name, value as &dyn ToSql))
            .collect();

        let execute_err = |source: rusqlite::Error| QueryError::Execute {
            sql: sql.to_string(),
            source,
        };

        let mut rows = stmt.query(bound.as_slice()).map_err(execute_err)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(execute_err)? {
            let mut fields = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                let value = row.get_ref(idx).map_err(execute_err)?;
                fields.push((name.clone(), value_to_text(value)));
            }
            records.push(Record::new(fields));
        }
        Ok(records)
    }
}

/// Render any SQLite value as display text. NULL becomes the empty string.
fn value_to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup_store() -> ActivityStore {
        let store = ActivityStore::open_in_memory().unwrap();
        store.init_schema().unwrap();
        store
    }

    fn activity(data: &str, added_by: &str) -> GroupActivity {
        GroupActivity {
            data: data.to_string(),
            added_by: added_by.to_string(),
            value: "10".to_string(),
            description: "desc".to_string(),
        }
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("actboard.db");

        let store = ActivityStore::open(&db_path).unwrap();
        store.init_schema().unwrap();

        assert!(db_path.exists());
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let store = setup_store();
        store.init_schema().unwrap();
    }

    #[test]
    fn test_fetch_binds_named_parameters() {
        let store = setup_store();
        store.add_membership("g1", "u1", "u2").unwrap();
        store.add_membership("g2", "u3", "u4").unwrap();

        let rows = store
            .fetch(
                "SELECT group_name FROM groups_relations WHERE user_1=:user OR user_2=:user",
                &[(":user", "u2")],
            )
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field("group_name").unwrap(), "g1");
    }

    #[test]
    fn test_fetch_renders_values_as_text() {
        let store = setup_store();
        let rows = store
            .fetch("SELECT 42 AS n, NULL AS missing, 'x' AS s", &[])
            .unwrap();

        assert_eq!(rows[0].field("n").unwrap(), "42");
        assert_eq!(rows[0].field("missing").unwrap(), "");
        assert_eq!(rows[0].field("s").unwrap(), "x");
    }

    #[test]
    fn test_fetch_reports_missing_table_as_prepare_error() {
        let store = setup_store();
        let err = store.fetch("SELECT data FROM nope_activities", &[]).unwrap_err();
        assert!(matches!(err, QueryError::Prepare { .. }));
    }

    #[test]
    fn test_activity_round_trip_through_group_table() {
        let store = setup_store();
        let table = store.create_group("g1").unwrap();
        store.add_activity("g1", &activity("run", "u1")).unwrap();

        let rows = store
            .fetch(
                &format!("SELECT data, added_by, value, description FROM {}", table.quoted()),
                &[],
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field("value").unwrap(), "10");
    }

    #[test]
    fn test_invalid_group_name_is_rejected_before_sql() {
        let store = setup_store();
        assert!(store.create_group("g1; DROP TABLE groups_relations").is_err());
        assert!(store.add_membership("bad name", "u1", "u2").is_err());
        assert!(store.add_activity("", &activity("x", "u1")).is_err());
    }
}
