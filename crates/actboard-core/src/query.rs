//! Query executor seam.
//!
//! Caches never talk to SQLite directly. They hand a statement and its
//! named parameters to a [`QueryExecutor`] and get back fully materialized
//! [`Record`]s whose cells are all text.

use std::rc::Rc;

use crate::errors::QueryError;

/// One result row with named, text-valued fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record from `(name, value)` pairs in column order.
    #[must_use]
    pub const fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value of the named field.
    pub fn field(&self, name: &str) -> Result<&str, QueryError> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| QueryError::MissingField {
                field: name.to_string(),
            })
    }

    /// Take the named field out of the record.
    pub fn take(&mut self, name: &str) -> Result<String, QueryError> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| std::mem::take(v))
            .ok_or_else(|| QueryError::MissingField {
                field: name.to_string(),
            })
    }

    /// Number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Trait for running parameterized read queries.
///
/// Parameters are named (`:user`) and bound as text. Implementations run
/// synchronously on the calling thread and may block on I/O.
pub trait QueryExecutor {
    /// Prepare `sql`, bind `params`, execute it and collect every row.
    fn fetch(&self, sql: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, QueryError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn fetch(&self, sql: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, QueryError> {
        (**self).fetch(sql, params)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Rc<T> {
    fn fetch(&self, sql: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, QueryError> {
        (**self).fetch(sql, params)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Box<T> {
    fn fetch(&self, sql: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, QueryError> {
        (**self).fetch(sql, params)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Executor wrapper that records every statement it forwards.

    use std::cell::RefCell;

    use super::{QueryExecutor, Record};
    use crate::errors::QueryError;

    pub struct RecordingExecutor<E> {
        inner: E,
        statements: RefCell<Vec<String>>,
    }

    impl<E: QueryExecutor> RecordingExecutor<E> {
        pub const fn new(inner: E) -> Self {
            Self {
                inner,
                statements: RefCell::new(Vec::new()),
            }
        }

        pub fn statements(&self) -> Vec<String> {
            self.statements.borrow().clone()
        }

        pub fn clear(&self) {
            self.statements.borrow_mut().clear();
        }
    }

    impl<E: QueryExecutor> QueryExecutor for RecordingExecutor<E> {
        fn fetch(&self, sql: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, QueryError> {
            self.statements.borrow_mut().push(sql.to_string());
            self.inner.fetch(sql, params)
        }
    }
}
