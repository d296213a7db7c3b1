//! actboard-core: query-driven activity tables.
//!
//! This crate owns the activity model, the SQLite store, the query executor
//! seam, the two activity caches and the state binding that keeps them in
//! sync with the current user and group.
//!
//! # Usage
//!
//! ```no_run
//! use std::rc::Rc;
//! use actboard_core::{
//!     ActivityStore, AggregatingActivityCache, Binding, StateProvider, TableModel,
//! };
//!
//! let store = Rc::new(ActivityStore::open_in_memory().unwrap());
//! store.init_schema().unwrap();
//!
//! let provider = StateProvider::new();
//! let activities = Binding::attach(AggregatingActivityCache::new(Rc::clone(&store)), &provider);
//!
//! provider.set_current_user("alice");
//! println!("{} rows", activities.cache().row_count());
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod activity;
pub mod aggregate;
pub mod binding;
pub mod config;
pub mod errors;
pub mod group;
pub mod query;
pub mod state;
pub mod store;
pub mod table;

pub use activity::{Activity, ActivityTable, GroupActivity};
pub use aggregate::{AggregatingActivityCache, GroupFailure, RefreshReport};
pub use binding::{Binding, StateBound};
pub use config::{Overrides, Settings};
pub use errors::{CacheError, CoreResult, OutOfRange, QueryError};
pub use group::{RefreshOutcome, SingleGroupActivityCache};
pub use query::{QueryExecutor, Record};
pub use state::{StateChange, StateObserver, StateProvider};
pub use store::ActivityStore;
pub use table::{Column, HeaderSchema, ModelReset, RowSet, TableModel, TableSnapshot};
