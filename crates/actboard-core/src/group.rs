//! Activity table of the currently selected group.

use tracing::{debug, info};

use crate::activity::{ActivityTable, GroupActivity};
use crate::binding::StateBound;
use crate::errors::{CacheError, CoreResult, QueryError};
use crate::query::QueryExecutor;
use crate::state::{StateChange, StateProvider};
use crate::table::{Column, HeaderSchema, ModelReset, ResetNotifier, RowSet, TableModel};

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
        role: "value",
        header: "Value",
    },
    Column {
        role: "description",
        header: "Description",
    },
];

/// What a single-group refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Rows were replaced with the table's current contents.
    Refreshed { rows: usize },
    /// Group or user was not set; the previous rows were kept.
    Skipped,
}

/// Rows of one group's activity table, as returned by the database.
///
/// No deduplication or reordering is applied.
pub struct SingleGroupActivityCache<E> {
    executor: E,
    schema: HeaderSchema,
    rows: RowSet,
    notifier: ResetNotifier,
}

impl<E: QueryExecutor> SingleGroupActivityCache<E> {
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

    /// Reload the rows of `group`'s activity table.
    ///
    /// Both `group` and `user` must be set, otherwise nothing is queried and
    /// [`RefreshOutcome::Skipped`] is returned. A failed query is returned as
    /// an error and the previous rows stay in place.
    pub fn refresh(&mut self, group: &str, user: &str) -> CoreResult<RefreshOutcome> {
        if group.is_empty() || user.is_empty() {
            debug!(group, user, "group or user not set, skipping refresh");
            return Ok(RefreshOutcome::Skipped);
        }

        let table = ActivityTable::for_group(group)?;
        let sql = format!(
            "SELECT data, added_by, value, description FROM {}",
            table.quoted()
        );

        let to_error = |source| CacheError::GroupQuery {
            group: group.to_string(),
            source,
        };

        let records = self.executor.fetch(&sql, &[]).map_err(to_error)?;
        let rows = records
            .into_iter()
            .map(|mut r| -> Result<Vec<String>, QueryError> {
                let activity = GroupActivity {
                    data: r.take("data")?,
                    added_by: r.take("added_by")?,
                    value: r.take("value")?,
                    description: r.take("description")?,
                };
                Ok(activity.into_cells())
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_error)?;

        self.rows = RowSet::from_rows(COLUMNS.len(), rows);
        self.notifier.reset(self.rows.len());

        info!(group, rows = self.rows.len(), "group activities refreshed");
        Ok(RefreshOutcome::Refreshed {
            rows: self.rows.len(),
        })
    }
}

impl<E> TableModel for SingleGroupActivityCache<E> {
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

impl<E: QueryExecutor> StateBound for SingleGroupActivityCache<E> {
    type Outcome = RefreshOutcome;

    const TRIGGERS: &'static [StateChange] = &[StateChange::User, StateChange::Group];

    fn refresh_from(&mut self, state: &StateProvider) -> CoreResult<RefreshOutcome> {
        self.refresh(&state.current_group(), &state.current_user())
    }
}
