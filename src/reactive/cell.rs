use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Change delivered to a watcher.
///
/// `old` is `None` only for the immediate delivery made when a watch is
/// registered with `immediate = true`; there is no previous value then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchEvent<'a> {
    pub new: &'a str,
    pub old: Option<&'a str>,
}

struct WatcherSlot {
    id: u64,
    active: Cell<bool>,
    callback: Box<dyn Fn(&WatchEvent<'_>)>,
}

struct CellInner {
    value: RefCell<String>,
    version: Cell<u64>,
    next_id: Cell<u64>,
    watchers: RefCell<Vec<Rc<WatcherSlot>>>,
}

/// A shared, observable string value.
///
/// Clones share the same value and the same watcher list. Assigning a value
/// equal to the current one does nothing: no version bump and no
/// notification.
#[derive(Clone)]
pub struct ConfigCell {
    inner: Rc<CellInner>,
}

impl ConfigCell {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: RefCell::new(value.into()),
                version: Cell::new(0),
                next_id: Cell::new(0),
                watchers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Current value (cloned).
    pub fn get(&self) -> String {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write to this cell.
    pub fn with<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(self.inner.value.borrow().as_str())
    }

    /// Number of effective changes since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Replace the value and notify watchers if it changed.
    ///
    /// Returns `true` when the value actually changed.
    pub fn set(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        let old = {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            std::mem::replace(&mut *current, value.clone())
        };
        self.inner.version.set(self.inner.version.get() + 1);
        self.notify(&value, Some(&old));
        true
    }

    /// Observe changes to this cell.
    ///
    /// With `immediate`, `callback` runs once before this returns, with the
    /// current value as `new` and no `old`. The subscription lives until the
    /// returned handle is stopped or dropped.
    pub fn watch<F>(&self, immediate: bool, callback: F) -> WatchHandle
    where
        F: Fn(&WatchEvent<'_>) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let slot = Rc::new(WatcherSlot {
            id,
            active: Cell::new(true),
            callback: Box::new(callback),
        });
        self.inner.watchers.borrow_mut().push(Rc::clone(&slot));

        if immediate {
            let current = self.get();
            (slot.callback)(&WatchEvent {
                new: &current,
                old: None,
            });
        }

        WatchHandle {
            cell: Rc::downgrade(&self.inner),
            slot: Some(slot),
        }
    }

    /// Number of live subscriptions.
    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.borrow().len()
    }

    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // Watchers run in registration order against a snapshot of the list, so
    // callbacks may write the cell or stop subscriptions while we iterate.
    // A nested change supersedes this round: the nested round has already
    // delivered the newer value to everyone.
    fn notify(&self, new: &str, old: Option<&str>) {
        let version = self.inner.version.get();
        let snapshot: Vec<Rc<WatcherSlot>> = self.inner.watchers.borrow().clone();
        let event = WatchEvent { new, old };
        for slot in snapshot {
            if self.inner.version.get() != version {
                break;
            }
            if slot.active.get() {
                (slot.callback)(&event);
            }
        }
    }
}

impl Default for ConfigCell {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl std::fmt::Debug for ConfigCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCell")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .field("watchers", &self.watcher_count())
            .finish()
    }
}

/// Cancellable subscription returned by [`ConfigCell::watch`].
///
/// Dropping the handle cancels the subscription.
pub struct WatchHandle {
    cell: Weak<CellInner>,
    slot: Option<Rc<WatcherSlot>>,
}

impl WatchHandle {
    /// Cancel the subscription. Later calls do nothing.
    pub fn stop(&mut self) {
        let Some(slot) = self.slot.take() else {
            return;
        };
        slot.active.set(false);
        if let Some(cell) = self.cell.upgrade() {
            cell.watchers.borrow_mut().retain(|w| w.id != slot.id);
        }
    }

    pub const fn is_active(&self) -> bool {
        self.slot.is_some()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<(String, Option<String>)>>>, impl Fn(&WatchEvent<'_>)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let callback = move |event: &WatchEvent<'_>| {
            sink.borrow_mut()
                .push((event.new.to_string(), event.old.map(str::to_string)));
        };
        (seen, callback)
    }

    #[test]
    fn test_new_cell_holds_value_at_version_zero() {
        let cell = ConfigCell::new("hello");
        assert_eq!(cell.get(), "hello");
        assert_eq!(cell.version(), 0);
        assert_eq!(cell.watcher_count(), 0);
    }

    #[test]
    fn test_set_changes_value_and_bumps_version() {
        let cell = ConfigCell::new("a");
        assert!(cell.set("b"));
        assert_eq!(cell.get(), "b");
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn test_set_equal_value_is_noop() {
        let cell = ConfigCell::new("a");
        let (seen, callback) = recorder();
        let _handle = cell.watch(false, callback);

        assert!(!cell.set("a"));
        assert_eq!(cell.version(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_watch_delivers_old_and_new() {
        let cell = ConfigCell::new("a");
        let (seen, callback) = recorder();
        let _handle = cell.watch(false, callback);

        cell.set("b");
        cell.set("c");
        assert_eq!(
            *seen.borrow(),
            vec![
                ("b".to_string(), Some("a".to_string())),
                ("c".to_string(), Some("b".to_string())),
            ]
        );
    }

    #[test]
    fn test_immediate_watch_fires_once_without_old_value() {
        let cell = ConfigCell::new("start");
        let (seen, callback) = recorder();
        let _handle = cell.watch(true, callback);
        assert_eq!(*seen.borrow(), vec![("start".to_string(), None)]);
    }

    #[test]
    fn test_lazy_watch_does_not_fire_on_registration() {
        let cell = ConfigCell::new("start");
        let (seen, callback) = recorder();
        let _handle = cell.watch(false, callback);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_stop_cancels_and_is_idempotent() {
        let cell = ConfigCell::new("a");
        let (seen, callback) = recorder();
        let mut handle = cell.watch(false, callback);
        assert!(handle.is_active());
        assert_eq!(cell.watcher_count(), 1);

        handle.stop();
        handle.stop();
        assert!(!handle.is_active());
        assert_eq!(cell.watcher_count(), 0);

        cell.set("b");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_dropping_handle_unsubscribes() {
        let cell = ConfigCell::new("a");
        let (seen, callback) = recorder();
        drop(cell.watch(false, callback));
        assert_eq!(cell.watcher_count(), 0);
        cell.set("b");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_handle_outliving_cell_stops_cleanly() {
        let cell = ConfigCell::new("a");
        let mut handle = cell.watch(false, |_| {});
        drop(cell);
        handle.stop();
        assert!(!handle.is_active());
    }

    #[test]
    fn test_watchers_notified_in_registration_order() {
        let cell = ConfigCell::new("a");
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&order);
        let second = Rc::clone(&order);
        let _h1 = cell.watch(false, move |_| first.borrow_mut().push(1));
        let _h2 = cell.watch(false, move |_| second.borrow_mut().push(2));

        cell.set("b");
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_callback_may_write_cell_during_dispatch() {
        let cell = ConfigCell::new("a");
        let writer = cell.clone();
        let _h = cell.watch(false, move |event| {
            if event.new == "b" {
                writer.set("c");
            }
        });

        cell.set("b");
        assert_eq!(cell.get(), "c");
        assert_eq!(cell.version(), 2);
    }

    #[test]
    fn test_nested_change_supersedes_outer_round() {
        let cell = ConfigCell::new("a");
        let writer = cell.clone();
        let _h1 = cell.watch(false, move |event| {
            if event.new == "b" {
                writer.set("c");
            }
        });
        let (seen, callback) = recorder();
        let _h2 = cell.watch(false, callback);

        cell.set("b");
        // The second watcher only sees the newest value, never the stale "b".
        assert_eq!(
            *seen.borrow(),
            vec![("c".to_string(), Some("b".to_string()))]
        );
    }

    #[test]
    fn test_clones_share_value_and_watchers() {
        let cell = ConfigCell::new("a");
        let other = cell.clone();
        let (seen, callback) = recorder();
        let _h = cell.watch(false, callback);

        other.set("b");
        assert!(cell.ptr_eq(&other));
        assert_eq!(cell.get(), "b");
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_with_borrows_without_cloning() {
        let cell = ConfigCell::new("hello");
        assert_eq!(cell.with(str::len), 5);
    }
}
