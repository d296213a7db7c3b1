//! Activity records and per-group table naming.

use std::fmt;

use serde::Serialize;

use crate::errors::CacheError;

/// Suffix appended to a group name to form its activity table.
pub const ACTIVITY_TABLE_SUFFIX: &str = "_activities";

/// An activity as shown in the merged, per-user view.
///
/// Ordering is lexicographic over `(data, added_by, description)`, so two
/// activities compare equal exactly when every field matches.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Activity {
    pub data: String,
    pub added_by: String,
    pub description: String,
}

impl Activity {
    pub fn new(
        data: impl Into<String>,
        added_by: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            added_by: added_by.into(),
            description: description.into(),
        }
    }

    /// Cells in column order: data, added_by, description.
    #[must_use]
    pub fn into_cells(self) -> Vec<String> {
        vec![self.data, self.added_by, self.description]
    }
}

/// An activity as stored in a group table, including its `value` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupActivity {
    pub data: String,
    pub added_by: String,
    pub value: String,
    pub description: String,
}

impl GroupActivity {
    /// Cells in column order: data, added_by, value, description.
    #[must_use]
    pub fn into_cells(self) -> Vec<String> {
        vec![self.data, self.added_by, self.value, self.description]
    }
}

/// Activity table belonging to one group.
///
/// Constructed only from group names made of ASCII letters, digits and `_`,
/// which keeps the derived identifier safe to splice into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActivityTable {
    group: String,
    name: String,
}

impl ActivityTable {
    /// Derive the table for `group` (`<group>_activities`).
    pub fn for_group(group: &str) -> Result<Self, CacheError> {
        let valid = !group.is_empty()
            && group
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(CacheError::InvalidGroupName {
                group: group.to_string(),
            });
        }
        Ok(Self {
            group: group.to_string(),
            name: format!("{group}{ACTIVITY_TABLE_SUFFIX}"),
        })
    }

    /// The group this table belongs to.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Bare table name, e.g. `g1_activities`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table name quoted as an SQL identifier.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.name)
    }
}

impl fmt::Display for ActivityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
