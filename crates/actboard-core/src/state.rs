//! Current user/group selection with change notifications.
//!
//! The provider is shared by several caches and outlives them. It only holds
//! weak references to its observers; dropped observers are pruned the next
//! time a change is delivered.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Which piece of state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    User,
    Group,
}

/// Receives change notifications from a [`StateProvider`].
///
/// Notifications carry no payload; handlers read the current values back
/// from the provider.
pub trait StateObserver {
    fn state_changed(&self, change: StateChange, state: &StateProvider);
}

/// Holds the current user and group identifiers.
///
/// Empty strings mean "not set".
#[derive(Default)]
pub struct StateProvider {
    user: RefCell<String>,
    group: RefCell<String>,
    observers: RefCell<Vec<Weak<dyn StateObserver>>>,
}

impl StateProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_user(&self) -> String {
        self.user.borrow().clone()
    }

    #[must_use]
    pub fn current_group(&self) -> String {
        self.group.borrow().clone()
    }

    /// Set the current user. Observers are notified only if the value changed.
    ///
    /// Returns whether a notification was sent.
    pub fn set_current_user(&self, user: impl Into<String>) -> bool {
        if Self::replace(&self.user, user.into()) {
            self.notify(StateChange::User);
            return true;
        }
        false
    }

    /// Set the current group. Observers are notified only if the value changed.
    ///
    /// Returns whether a notification was sent.
    pub fn set_current_group(&self, group: impl Into<String>) -> bool {
        if Self::replace(&self.group, group.into()) {
            self.notify(StateChange::Group);
            return true;
        }
        false
    }

    /// Register an observer. The provider keeps only a weak reference.
    pub fn subscribe(&self, observer: Weak<dyn StateObserver>) {
        self.observers.borrow_mut().push(observer);
    }

    /// Number of observers that are still alive.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    fn replace(slot: &RefCell<String>, value: String) -> bool {
        let mut current = slot.borrow_mut();
        if *current == value {
            return false;
        }
        *current = value;
        true
    }

    fn notify(&self, change: StateChange) {
        // Collect first so observers may subscribe or change state while
        // being notified without tripping over the borrow.
        let live: Vec<Rc<dyn StateObserver>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::trace!(?change, observers = live.len(), "delivering state change");
        for observer in live {
            observer.state_changed(change, self);
        }
    }
}

impl fmt::Debug for StateProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateProvider")
            .field("user", &*self.user.borrow())
            .field("group", &*self.group.borrow())
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(StateChange, String, String)>>,
    }

    impl StateObserver for Recorder {
        fn state_changed(&self, change: StateChange, state: &StateProvider) {
            self.seen
                .borrow_mut()
                .push((change, state.current_user(), state.current_group()));
        }
    }

    fn subscribed(provider: &StateProvider) -> Rc<Recorder> {
        let recorder = Rc::new(Recorder::default());
        let weak = Rc::downgrade(&recorder);
        provider.subscribe(weak);
        recorder
    }

    #[test]
    fn test_change_notifies_with_current_values() {
        let provider = StateProvider::new();
        let recorder = subscribed(&provider);

        assert!(provider.set_current_user("u1"));
        assert!(provider.set_current_group("g1"));

        assert_eq!(
            *recorder.seen.borrow(),
            vec![
                (StateChange::User, "u1".to_string(), String::new()),
                (StateChange::Group, "u1".to_string(), "g1".to_string()),
            ]
        );
    }

    #[test]
    fn test_same_value_does_not_notify() {
        let provider = StateProvider::new();
        let recorder = subscribed(&provider);

        provider.set_current_user("u1");
        assert!(!provider.set_current_user("u1"));

        assert_eq!(recorder.seen.borrow().len(), 1);
    }

    #[test]
    fn test_dropped_observers_are_pruned() {
        let provider = StateProvider::new();
        let kept = subscribed(&provider);
        let dropped = subscribed(&provider);
        assert_eq!(provider.observer_count(), 2);

        drop(dropped);
        provider.set_current_user("u1");

        assert_eq!(provider.observer_count(), 1);
        assert_eq!(kept.seen.borrow().len(), 1);
    }
}
