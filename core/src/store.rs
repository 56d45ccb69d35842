//! Observable key/value store for page-scoped state.
//!
//! Each page controller owns one [`DataStore`] for the lifetime of that
//! page. Data-fetch code writes results into the store; rendering code
//! registers change listeners at construction and re-reads the store when
//! notified. Neither side calls the other directly, which keeps fetch
//! logic and rendering logic decoupled.
//!
//! The store is strictly single-threaded (`Rc`/`RefCell`, not `Send`).
//! All of the notification guarantees below assume one logical thread of
//! control; adopting this type under real parallelism would require a
//! mutex around both the map and the notification pass.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;


/// A page-scoped observable map from string keys to shared values.
///
/// Values are stored as `Rc<dyn Any>` and read back with a typed
/// [`get`](DataStore::get), so a single store can hold a device record
/// under one key and a work-order list under another. Reads hand out a
/// clone of the `Rc`, never a copy of the value: callers share ownership
/// of whatever allocation was stored. Mutating a value behind its own
/// interior mutability does NOT notify listeners; only
/// [`set`](DataStore::set) does.
pub struct DataStore {
    values: RefCell<HashMap<String, Rc<dyn Any>>>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}


impl DataStore {
    /// Create an empty store with no listeners.
    pub fn new() -> Self {
        DataStore {
            values: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Return the value stored under `key`, or `None` if the key was
    /// never set or the stored value is not a `T`.
    ///
    /// Never notifies and never mutates state.
    pub fn get<T: Any>(&self, key: &str) -> Option<Rc<T>> {
        let value = self.values.borrow().get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    /// Return the untyped value stored under `key`.
    pub fn get_raw(&self, key: &str) -> Option<Rc<dyn Any>> {
        self.values.borrow().get(key).cloned()
    }

    /// Store `value` under `key`, then run a full notification pass.
    ///
    /// The write is unconditional: storing a value equal to the current
    /// one still replaces it and still triggers a complete pass. Callers
    /// that need batching must coalesce before calling `set` — the store
    /// never coalesces.
    ///
    /// Listener failure policy: a panicking listener unwinds out of this
    /// call and the remaining listeners of the pass do not run. The store
    /// itself stays usable afterwards.
    pub fn set<T: Any>(&self, key: &str, value: T) {
        self.set_shared(key, Rc::new(value));
    }

    /// Store an already-shared value under `key`, then run a full
    /// notification pass. The same `Rc` handed in here is the one that
    /// [`get`](DataStore::get) returns.
    pub fn set_shared(&self, key: &str, value: Rc<dyn Any>) {
        self.values.borrow_mut().insert(key.to_string(), value);
        self.notify();
    }

    /// Append a change listener. Listeners run in registration order on
    /// every subsequent write, and are never removed for the lifetime of
    /// the store. A listener may itself call `get` and `set`; a
    /// re-entrant `set` runs its own complete nested pass.
    pub fn add_change_listener<F: Fn() + 'static>(&self, callback: F) {
        self.listeners.borrow_mut().push(Rc::new(callback));
    }

    /// Whether a value has ever been stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Number of registered change listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invoke every listener registered at the start of this pass, in
    /// registration order. The listener list is snapshotted and all
    /// internal borrows released first, so listeners are free to call
    /// `get`, `set`, and `add_change_listener` re-entrantly. Listeners
    /// registered during the pass only see later writes.
    fn notify(&self) {
        let snapshot: Vec<Rc<dyn Fn()>> = self.listeners.borrow().clone();
        for listener in snapshot {
            listener();
        }
    }
}


impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
