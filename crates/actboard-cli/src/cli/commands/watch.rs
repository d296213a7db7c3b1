//! Implementation of `actboard watch`.
//!
//! Both activity views are bound to one state provider. Each input line
//! changes the current user or group; every view that reset as a result
//! is printed again.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::{bail, Result};

use actboard_core::{
    AggregatingActivityCache, Binding, RefreshOutcome, Settings, SingleGroupActivityCache,
    StateProvider, TableModel,
};

use crate::cli::commands::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// One line of watch input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WatchCommand {
    User(String),
    Group(String),
    Quit,
}

/// Which view announced a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Activities,
    Group,
}

/// Parse `user <id>`, `group <id>` or `quit`. Blank lines and `#` comments
/// yield `None`. A bare `user`/`group` clears the value.
fn parse_command(line: &str) -> Result<Option<WatchCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(v, a)| (v, a.trim()));

    let command = match verb {
        "user" => WatchCommand::User(arg.to_string()),
        "group" => WatchCommand::Group(arg.to_string()),
        "quit" | "exit" => WatchCommand::Quit,
        other => bail!("Unknown command '{other}' (expected: user <id>, group <id>, quit)"),
    };
    Ok(Some(command))
}

/// Drive the state provider from `input` and print views to `out`.
///
/// Diagnostics (skipped refreshes, failed groups, bad input) go to `diag`.
#[tracing::instrument(skip_all, fields(user = %settings.user, group = %settings.group))]
pub fn run_watch(
    settings: &Settings,
    format: OutputFormat,
    input: impl BufRead,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<()> {
    let store = Rc::new(open_store(settings)?);
    let provider = StateProvider::new();
    let pending: Rc<RefCell<Vec<View>>> = Rc::new(RefCell::new(Vec::new()));

    let mut activities = AggregatingActivityCache::new(Rc::clone(&store));
    let sink = Rc::clone(&pending);
    activities.on_reset(move |_| sink.borrow_mut().push(View::Activities));
    let activities = Binding::attach(activities, &provider);

    let mut group = SingleGroupActivityCache::new(Rc::clone(&store));
    let sink = Rc::clone(&pending);
    group.on_reset(move |_| sink.borrow_mut().push(View::Group));
    let group = Binding::attach(group, &provider);

    let formatter = Formatter::new(format);

    let commands = vec![
        WatchCommand::User(settings.user.clone()),
        WatchCommand::Group(settings.group.clone()),
    ]
    .into_iter()
    .map(Ok)
    .chain(
        input
            .lines()
            .map(|line| -> Result<Option<WatchCommand>> { parse_command(&line?) })
            .filter_map(Result::transpose),
    );

    for command in commands {
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                writeln!(diag, "warning: {e}")?;
                continue;
            }
        };

        match command {
            WatchCommand::User(user) => {
                provider.set_current_user(user);
            }
            WatchCommand::Group(name) => {
                provider.set_current_group(name);
            }
            WatchCommand::Quit => break,
        }

        if let Some(result) = activities.take_last_result() {
            match result {
                Ok(report) => {
                    for failure in &report.failures {
                        writeln!(diag, "warning: skipped group '{}': {}", failure.group, failure.error)?;
                    }
                }
                Err(e) => writeln!(diag, "warning: activities not refreshed: {e}")?,
            }
        }
        match group.take_last_result() {
            Some(Ok(RefreshOutcome::Skipped)) => {
                writeln!(diag, "note: group or user not set, group view unchanged")?;
            }
            Some(Err(e)) => writeln!(diag, "warning: group view not refreshed: {e}")?,
            Some(Ok(RefreshOutcome::Refreshed { .. })) | None => {}
        }

        let views: Vec<View> = pending.borrow_mut().drain(..).collect();
        for view in [View::Activities, View::Group] {
            if !views.contains(&view) {
                continue;
            }
            match view {
                View::Activities => {
                    formatter.write_table(out, "activities", &activities.cache().snapshot())?;
                }
                View::Group => {
                    let title = provider.current_group();
                    formatter.write_table(out, &title, &group.cache().snapshot())?;
                }
            }
        }
    }

    Ok(())
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
        store.add_membership("g1", "u1", "u2").unwrap();
        store.add_membership("g2", "u2", "u3").unwrap();
        for group in ["g1", "g2"] {
            store.create_group(group).unwrap();
            store
                .add_activity(
                    group,
                    &GroupActivity {
                        data: format!("{group}-run"),
                        added_by: "u2".to_string(),
                        value: "5".to_string(),
                        description: String::new(),
                    },
                )
                .unwrap();
        }
    }

    fn watch(user: &str, group: &str, script: &str) -> (String, String) {
        let dir = tempdir().unwrap();
        let db = dir.path().join("board.db");
        seed(&db);
        let mut out = Vec::new();
        let mut diag = Vec::new();

        run_watch(
            &settings(&db, user, group),
            OutputFormat::Text,
            script.as_bytes(),
            &mut out,
            &mut diag,
        )
        .unwrap();

        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("user  u1 ").unwrap(),
            Some(WatchCommand::User("u1".to_string()))
        );
        assert_eq!(
            parse_command("group").unwrap(),
            Some(WatchCommand::Group(String::new()))
        );
        assert_eq!(parse_command("quit").unwrap(), Some(WatchCommand::Quit));
        assert_eq!(parse_command("  # note").unwrap(), None);
        assert!(parse_command("dance now").is_err());
    }

    #[test]
    fn test_user_change_reprints_both_views() {
        let (out, _) = watch("", "g1", "user u1\n");

        assert!(out.contains("activities (1 row)"));
        assert!(out.contains("g1 (1 row)"));
        assert!(out.contains("g1-run"));
    }

    #[test]
    fn test_group_change_reprints_only_group_view() {
        let (out, _) = watch("u2", "", "group g2\n");

        // Initial user prints activities once; the group change prints g2.
        assert_eq!(out.matches("activities (").count(), 1);
        assert!(out.contains("activities (2 rows)"));
        assert!(out.contains("g2 (1 row)"));
    }

    #[test]
    fn test_skip_and_bad_input_are_diagnosed() {
        let (out, diag) = watch("", "", "group g1\nfly away\nquit\nuser u1\n");

        assert!(out.is_empty());
        assert!(diag.contains("group or user not set"));
        assert!(diag.contains("Unknown command 'fly'"));
    }

    #[test]
    fn test_missing_group_table_keeps_previous_view() {
        let (out, diag) = watch("u1", "g1", "group ghost\n");

        assert!(diag.contains("group view not refreshed"));
        assert_eq!(out.matches("g1 (1 row)").count(), 1);
        assert!(!out.contains("ghost ("));
    }
}
