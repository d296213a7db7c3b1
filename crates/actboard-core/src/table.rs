//! Tabular addressing shared by the activity caches.
//!
//! A display surface reads a cache through [`TableModel`]: positional
//! cell and header access with strict bounds, plus symbolic role names
//! (`data`, `added_by`, ...) that map to fixed column indexes.

use std::fmt;

use serde::Serialize;

use crate::errors::OutOfRange;

/// One column of a header schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Stable symbolic name, e.g. `added_by`.
    pub role: &'static str,
    /// Display header.
    pub header: &'static str,
}

/// Ordered, fixed set of columns for a cache type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSchema {
    columns: &'static [Column],
}

impl HeaderSchema {
    #[must_use]
    pub const fn new(columns: &'static [Column]) -> Self {
        Self { columns }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub const fn columns(&self) -> &'static [Column] {
        self.columns
    }

    /// Header text of column `col`.
    pub fn header(&self, col: usize) -> Result<&'static str, OutOfRange> {
        self.columns
            .get(col)
            .map(|c| c.header)
            .ok_or(OutOfRange::Column {
                index: col,
                len: self.columns.len(),
            })
    }

    /// Column index for a role name, if the schema has it.
    #[must_use]
    pub fn column_for_role(&self, role: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.role == role)
    }

    /// Role names in column order.
    #[must_use]
    pub fn role_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.role).collect()
    }
}

/// Materialized rows backing a table.
///
/// Every row has exactly `arity` cells. A cache builds a new `RowSet` off
/// to the side and swaps it in whole; rows are never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    arity: usize,
    rows: Vec<Vec<String>>,
}

impl RowSet {
    /// An empty row set for a schema of `arity` columns.
    #[must_use]
    pub const fn empty(arity: usize) -> Self {
        Self {
            arity,
            rows: Vec::new(),
        }
    }

    /// Build a row set from rows that all have `arity` cells.
    ///
    /// # Panics
    ///
    /// Panics if any row has a different number of cells.
    #[must_use]
    pub fn from_rows(arity: usize, rows: Vec<Vec<String>>) -> Self {
        assert!(
            rows.iter().all(|r| r.len() == arity),
            "every row must have {arity} cells"
        );
        Self { arity, rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Cell at `(row, col)`, bounds-checked on both axes.
    pub fn cell(&self, row: usize, col: usize) -> Result<&str, OutOfRange> {
        let cells = self.rows.get(row).ok_or(OutOfRange::Row {
            index: row,
            len: self.rows.len(),
        })?;
        cells.get(col).map(String::as_str).ok_or(OutOfRange::Column {
            index: col,
            len: self.arity,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Notification that the whole table may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelReset {
    /// Monotonic counter, bumped once per completed refresh.
    pub generation: u64,
    pub row_count: usize,
}

type ResetListener = Box<dyn Fn(ModelReset)>;

/// Generation counter plus the listeners that want structural resets.
#[derive(Default)]
pub struct ResetNotifier {
    generation: u64,
    listeners: Vec<ResetListener>,
}

impl ResetNotifier {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subscribe(&mut self, listener: ResetListener) {
        self.listeners.push(listener);
    }

    /// Bump the generation and tell every listener.
    pub fn reset(&mut self, row_count: usize) -> ModelReset {
        self.generation += 1;
        let event = ModelReset {
            generation: self.generation,
            row_count,
        };
        for listener in &self.listeners {
            listener(event);
        }
        event
    }
}

impl fmt::Debug for ResetNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetNotifier")
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Read access for a display surface.
pub trait TableModel {
    fn schema(&self) -> &HeaderSchema;

    fn rows(&self) -> &RowSet;

    /// Number of completed refreshes so far.
    fn generation(&self) -> u64;

    fn row_count(&self) -> usize {
        self.rows().len()
    }

    fn column_count(&self) -> usize {
        self.schema().len()
    }

    fn cell_value(&self, row: usize, col: usize) -> Result<&str, OutOfRange> {
        if col >= self.column_count() {
            // Row bound still wins so an empty table reports the row.
            if row >= self.row_count() {
                return Err(OutOfRange::Row {
                    index: row,
                    len: self.row_count(),
                });
            }
            return Err(OutOfRange::Column {
                index: col,
                len: self.column_count(),
            });
        }
        self.rows().cell(row, col)
    }

    fn column_header(&self, col: usize) -> Result<&str, OutOfRange> {
        self.schema().header(col)
    }

    /// Cell addressed by role name. `Ok(None)` when the role is unknown.
    fn role_value(&self, row: usize, role: &str) -> Result<Option<&str>, OutOfRange> {
        match self.schema().column_for_role(role) {
            Some(col) => self.cell_value(row, col).map(Some),
            None if row >= self.row_count() => Err(OutOfRange::Row {
                index: row,
                len: self.row_count(),
            }),
            None => Ok(None),
        }
    }

    fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            columns: self.schema().role_names(),
            rows: self.rows().iter().map(<[String]>::to_vec).collect(),
        }
    }
}

/// Serializable copy of a table's current contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}
