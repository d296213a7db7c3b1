//! Implementation of `actboard group` subcommands and `actboard post`.

use std::io::Write;

use anyhow::{bail, Result};

use actboard_core::{GroupActivity, RefreshOutcome, Settings, SingleGroupActivityCache, TableModel};

use crate::cli::commands::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// Create a group's activity table.
#[tracing::instrument(skip(settings, format, out))]
pub fn run_group_create(
    settings: &Settings,
    name: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let store = open_store(settings)?;
    let table = store.create_group(name)?;

    let output = serde_json::json!({
        "group": table.group(),
        "table": table.name(),
    });
    Formatter::new(format).write(out, &output)
}

/// Relate `user` and `other` (or `user` with itself) through `group`.
#[tracing::instrument(skip(settings, format, out))]
pub fn run_group_join(
    settings: &Settings,
    group: &str,
    user: &str,
    other: Option<&str>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let store = open_store(settings)?;
    let other = other.unwrap_or(user);
    store.add_membership(group, user, other)?;

    let output = serde_json::json!({
        "group": group,
        "user_1": user,
        "user_2": other,
    });
    Formatter::new(format).write(out, &output)
}

/// Add an activity to a group's table.
#[tracing::instrument(skip(settings, activity, format, out))]
pub fn run_post(
    settings: &Settings,
    group: &str,
    activity: GroupActivity,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    if activity.added_by.is_empty() {
        bail!("No contributor. Pass --added-by, --user, or set ACTBOARD_USER.");
    }

    let store = open_store(settings)?;
    store.add_activity(group, &activity)?;

    let output = serde_json::json!({
        "group": group,
        "activity": activity,
    });
    Formatter::new(format).write(out, &output)
}

/// Show the current group's activity table.
#[tracing::instrument(skip(settings, format, out), fields(group = %settings.group, user = %settings.user))]
pub fn run_group_show(settings: &Settings, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let store = open_store(settings)?;
    let mut cache = SingleGroupActivityCache::new(&store);

    match cache.refresh(&settings.group, &settings.user)? {
        RefreshOutcome::Skipped => {
            bail!("Group or user not set. Pass --group and --user, or set ACTBOARD_GROUP/ACTBOARD_USER.")
        }
        RefreshOutcome::Refreshed { .. } => {
            Formatter::new(format).write_table(out, &settings.group, &cache.snapshot())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::helpers::testing::settings;
    use tempfile::tempdir;

    fn activity(data: &str, added_by: &str) -> GroupActivity {
        GroupActivity {
            data: data.to_string(),
            added_by: added_by.to_string(),
            value: "3".to_string(),
            description: "climb".to_string(),
        }
    }

    #[test]
    fn test_create_post_and_show() {
        let dir = tempdir().unwrap();
        let s = settings(&dir.path().join("board.db"), "u1", "g1");
        let mut sink = Vec::new();

        run_group_create(&s, "g1", OutputFormat::Json, &mut sink).unwrap();
        run_post(&s, "g1", activity("wall", "u1"), OutputFormat::Json, &mut sink).unwrap();
        run_post(&s, "g1", activity("wall", "u1"), OutputFormat::Json, &mut sink).unwrap();

        let mut out = Vec::new();
        run_group_show(&s, OutputFormat::Json, &mut out).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed["view"], "g1");
        assert_eq!(parsed["count"], 2);
        assert_eq!(parsed["rows"][1]["value"], "3");
    }

    #[test]
    fn test_show_without_group_is_reported() {
        let dir = tempdir().unwrap();
        let s = settings(&dir.path().join("board.db"), "u1", "");
        let mut out = Vec::new();

        let err = run_group_show(&s, OutputFormat::Text, &mut out).unwrap_err();

        assert!(err.to_string().contains("Group or user not set"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_show_missing_group_table_fails() {
        let dir = tempdir().unwrap();
        let s = settings(&dir.path().join("board.db"), "u1", "nowhere");
        let mut out = Vec::new();

        assert!(run_group_show(&s, OutputFormat::Text, &mut out).is_err());
    }

    #[test]
    fn test_join_defaults_second_user() {
        let dir = tempdir().unwrap();
        let s = settings(&dir.path().join("board.db"), "", "");
        let mut out = Vec::new();

        run_group_join(&s, "g1", "u1", None, OutputFormat::Json, &mut out).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["user_2"], "u1");
    }

    #[test]
    fn test_post_requires_contributor() {
        let dir = tempdir().unwrap();
        let s = settings(&dir.path().join("board.db"), "", "");
        let mut out = Vec::new();

        let err = run_post(&s, "g1", activity("x", ""), OutputFormat::Text, &mut out).unwrap_err();
        assert!(err.to_string().contains("No contributor"));
    }

    #[test]
    fn test_create_rejects_unsafe_name() {
        let dir = tempdir().unwrap();
        let s = settings(&dir.path().join("board.db"), "", "");
        let mut out = Vec::new();

        assert!(run_group_create(&s, "g1; DROP TABLE x", OutputFormat::Text, &mut out).is_err());
    }
}
