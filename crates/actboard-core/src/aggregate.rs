//! Merged activity view across every group a user belongs to.
//!
//! A refresh runs in two stages: look up the user's groups in
//! `groups_relations`, then read each group's `<group>_activities` table.
//! Rows from all groups are merged into one ordered, duplicate-free set.
//! A group whose table can't be read is skipped and reported; the other
//! groups still contribute.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::activity::{Activity, ActivityTable};
use crate::binding::StateBound;
use crate::errors::{CacheError, CoreResult, QueryError};
use crate::query::QueryExecutor;
use crate::state::{StateChange, StateProvider};
use crate::table::{Column, HeaderSchema, ModelReset, ResetNotifier, RowSet, TableModel};

/// Groups a user appears in, on either side of the relation.
pub const MEMBERSHIP_SQL: &str =
    "SELECT DISTINCT group_name FROM groups_relations WHERE user_1=:user OR user_2=:user";

const COLUMNS: &[Column] = &[
    Column {
        role: "data",
        header: "Data",
    },
    Column {
        role: "added_by",
        header: "Added by",
    },
    Column {
        role: "description",
        header: "Description",
    },
];

/// A group whose activities were left out of a refresh.
#[derive(Debug)]
pub struct GroupFailure {
    pub group: String,
    pub error: CacheError,
}

/// Summary of one aggregating refresh.
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Groups found for the user.
    pub groups: usize,
    /// Rows exposed after the merge.
    pub rows: usize,
    /// Groups skipped because their query failed.
    pub failures: Vec<GroupFailure>,
}

impl RefreshReport {
    /// True when at least one group was skipped.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Activities from all of a user's groups, deduplicated and sorted.
pub struct AggregatingActivityCache<E> {
    executor: E,
    schema: HeaderSchema,
    rows: RowSet,
    notifier: ResetNotifier,
}

impl<E: QueryExecutor> AggregatingActivityCache<E> {
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            schema: HeaderSchema::new(COLUMNS),
            rows: RowSet::empty(COLUMNS.len()),
            notifier: ResetNotifier::default(),
        }
    }

    /// Register a listener for structural resets.
    pub fn on_reset(&mut self, listener: impl Fn(ModelReset) + 'static) {
        self.notifier.subscribe(Box::new(listener));
    }

    /// Rebuild the rows for `user`.
    ///
    /// An empty user clears the table without querying. A failed membership
    /// lookup aborts the refresh and leaves the previous rows in place.
    pub fn refresh(&mut self, user: &str) -> CoreResult<RefreshReport> {
        if user.is_empty() {
            debug!("no current user, clearing activities");
            self.install(BTreeSet::new());
            return Ok(RefreshReport::default());
        }

        let groups = self.groups_for(user)?;

        let mut merged = BTreeSet::new();
        let mut failures = Vec::new();
        for group in &groups {
            match self.activities_of(group) {
                Ok(activities) => merged.extend(activities),
                Err(error) => {
                    warn!(group = %group, error = %error, "skipping group activities");
                    failures.push(GroupFailure {
                        group: group.clone(),
                        error,
                    });
                }
            }
        }

        let report = RefreshReport {
            groups: groups.len(),
            rows: merged.len(),
            failures,
        };
        self.install(merged);

        info!(
            user,
            groups = report.groups,
            rows = report.rows,
            failed = report.failures.len(),
            "activities refreshed"
        );
        Ok(report)
    }

    fn groups_for(&self, user: &str) -> CoreResult<Vec<String>> {
        let records = self
            .executor
            .fetch(MEMBERSHIP_SQL, &[(":user", user)])
            .map_err(|source| CacheError::Membership {
                user: user.to_string(),
                source,
            })?;

        records
            .into_iter()
            .map(|mut r| r.take("group_name"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| CacheError::Membership {
                user: user.to_string(),
                source,
            })
    }

    fn activities_of(&self, group: &str) -> CoreResult<Vec<Activity>> {
        let table = ActivityTable::for_group(group)?;
        let sql = format!("SELECT data, added_by, description FROM {}", table.quoted());

        let to_error = |source| CacheError::GroupQuery {
            group: group.to_string(),
            source,
        };

        let records = self.executor.fetch(&sql, &[]).map_err(to_error)?;
        records
            .into_iter()
            .map(|mut r| -> Result<Activity, QueryError> {
                Ok(Activity {
                    data: r.take("data")?,
                    added_by: r.take("added_by")?,
                    description: r.take("description")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_error)
    }

    /// Swap in the new rows in one assignment, then announce the reset.
    fn install(&mut self, activities: BTreeSet<Activity>) {
        let rows = activities.into_iter().map(Activity::into_cells).collect();
        self.rows = RowSet::from_rows(COLUMNS.len(), rows);
        self.notifier.reset(self.rows.len());
    }
}

impl<E> TableModel for AggregatingActivityCache<E> {
    fn schema(&self) -> &HeaderSchema {
        &self.schema
    }

    fn rows(&self) -> &RowSet {
        &self.rows
    }

    fn generation(&self) -> u64 {
        self.notifier.generation()
    }
}

impl<E: QueryExecutor> StateBound for AggregatingActivityCache<E> {
    type Outcome = RefreshReport;

    const TRIGGERS: &'static [StateChange] = &[StateChange::User];

    fn refresh_from(&mut self, state: &StateProvider) -> CoreResult<RefreshReport> {
        self.refresh(&state.current_user())
    }
}
