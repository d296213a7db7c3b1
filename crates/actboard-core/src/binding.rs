//! Connects a cache to a [`StateProvider`] so it refreshes on change.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::errors::CoreResult;
use crate::state::{StateChange, StateObserver, StateProvider};
use crate::table::TableModel;

/// A cache that knows how to rebuild itself from the current state.
pub trait StateBound: TableModel {
    /// Result of a successful refresh.
    type Outcome: fmt::Debug;

    /// Changes that trigger a refresh.
    const TRIGGERS: &'static [StateChange];

    /// Rebuild the rows from the provider's current values.
    fn refresh_from(&mut self, state: &StateProvider) -> CoreResult<Self::Outcome>;
}

/// Owns a cache and refreshes it whenever one of its triggers fires.
///
/// Refresh is not reentrant. A notification that arrives while the cache
/// is borrowed (say, from a reset listener that changes the current user)
/// is deferred. The refresh in progress runs again once it finishes, so
/// the rows always end up matching the provider's latest values. If the
/// borrow is a [`Self::cache`] guard held by the host, the deferred
/// refresh runs on the next notification or [`Self::refresh_now`].
pub struct Binding<C: StateBound> {
    cache: RefCell<C>,
    last: RefCell<Option<CoreResult<C::Outcome>>>,
    pending: Cell<bool>,
}

impl<C: StateBound + 'static> Binding<C> {
    /// Wrap `cache` and subscribe it to `provider`.
    ///
    /// No refresh runs until the first change, or until [`Self::refresh_now`].
    pub fn attach(cache: C, provider: &StateProvider) -> Rc<Self> {
        let binding = Rc::new(Self {
            cache: RefCell::new(cache),
            last: RefCell::new(None),
            pending: Cell::new(false),
        });
        let observer = Rc::downgrade(&binding);
        provider.subscribe(observer);
        binding
    }

    /// Refresh immediately from the provider's current values.
    pub fn refresh_now(&self, provider: &StateProvider) {
        self.run(provider, None);
    }

    /// Borrow the cache for reading.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a refresh of this same cache.
    pub fn cache(&self) -> Ref<'_, C> {
        self.cache.borrow()
    }

    /// Result of the most recent refresh, if any ran since the last call.
    pub fn take_last_result(&self) -> Option<CoreResult<C::Outcome>> {
        self.last.borrow_mut().take()
    }

    /// Whether a notification is waiting for the cache to be released.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.get()
    }

    fn run(&self, provider: &StateProvider, change: Option<StateChange>) {
        loop {
            let Ok(mut cache) = self.cache.try_borrow_mut() else {
                debug!(?change, "cache busy, deferring refresh");
                self.pending.set(true);
                return;
            };
            self.pending.set(false);
            let result = cache.refresh_from(provider);
            drop(cache);

            if let Err(e) = &result {
                warn!(?change, error = %e, "refresh failed, keeping previous rows");
            }
            *self.last.borrow_mut() = Some(result);

            // A change delivered during this refresh left the rows stale.
            if !self.pending.get() {
                break;
            }
        }
    }
}

impl<C: StateBound + 'static> StateObserver for Binding<C> {
    fn state_changed(&self, change: StateChange, state: &StateProvider) {
        if C::TRIGGERS.contains(&change) {
            self.run(state, Some(change));
        }
    }
}

impl<C: StateBound + fmt::Debug> fmt::Debug for Binding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("cache", &self.cache).finish()
    }
}
