#![forbid(unsafe_code)]

//! Mutable observable state cells.
//!
//! # Design
//!
//! [`ValueCell<T>`] keeps its value, listener list and liveness flag in
//! shared, reference-counted storage. Every read consults the
//! [`Tracker`] the cell was created with; when a tracking session is open the
//! read registers the cell before returning the value.
//!
//! Writes short-circuit on textual equality: a new value whose `Debug`
//! rendering matches the current one is dropped without notifying anyone.
//! Otherwise listeners fire synchronously, in insertion order, before
//! [`set`](ValueCell::set) returns.
//!
//! # Invariants
//!
//! 1. Listeners fire exactly once per effective write, duplicates included.
//! 2. A textually equal write never notifies, even on a disposed cell.
//! 3. Once disposed, effective writes, notification and listener removal
//!    fail with [`DisposedAccess`](crate::ReactiveError::DisposedAccess);
//!    a failed write leaves the stored value untouched.
//!
//! # Failure Modes
//!
//! - **Re-entrant writes**: a listener may write to the cell that is
//!   notifying it. The nested write notifies immediately, before the outer
//!   loop reaches the remaining listeners.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::observable::{Listener, ListenerList, Observable, Subscription, textual};
use crate::tracker::{Tracker, WeakTracker};

/// Shared storage behind [`ValueCell`] and
/// [`DerivedCell`](crate::DerivedCell).
pub(crate) struct CellCore<T> {
    label: &'static str,
    value: RefCell<T>,
    listeners: ListenerList,
    alive: Cell<bool>,
    tracker: WeakTracker,
}

impl<T: fmt::Debug + 'static> CellCore<T> {
    pub(crate) fn new(label: &'static str, tracker: WeakTracker, value: T) -> Rc<Self> {
        Rc::new(Self {
            label,
            value: RefCell::new(value),
            listeners: ListenerList::default(),
            alive: Cell::new(true),
            tracker,
        })
    }

    pub(crate) fn read<R>(self: &Rc<Self>, f: impl FnOnce(&T) -> R) -> R {
        self.tracker.record(|| Rc::clone(self) as Rc<dyn Observable>);
        f(&self.value.borrow())
    }

    pub(crate) fn peek<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    pub(crate) fn write(&self, value: T) -> Result<()> {
        if textual(&*self.value.borrow()) == textual(&value) {
            return Ok(());
        }
        self.assert_alive()?;
        *self.value.borrow_mut() = value;
        self.notify()
    }

    pub(crate) fn notify(&self) -> Result<()> {
        self.assert_alive()?;
        let fired = self.listeners.notify();
        tracing::trace!(message = "cell.notify", cell = self.label, listeners = fired);
        Ok(())
    }
}

impl<T: fmt::Debug + 'static> Observable for CellCore<T> {
    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn has_listeners(&self) -> bool {
        self.listeners.len() > 0
    }

    fn contains_listener(&self, listener: &Listener) -> bool {
        self.listeners.contains(listener)
    }

    fn add_listener(&self, listener: Listener) {
        self.listeners.push(listener);
    }

    fn remove_listener(&self, listener: &Listener) -> Result<()> {
        self.assert_alive()?;
        self.listeners.remove_first(listener);
        Ok(())
    }

    fn dispose(&self) {
        if !self.alive.get() {
            return;
        }
        self.alive.set(false);
        self.listeners.clear();
    }

    fn type_label(&self) -> &'static str {
        self.label
    }

    fn describe(&self) -> String {
        format!("{}({:?})", self.label, self.value.borrow())
    }
}

/// A single mutable observable value.
///
/// Cloning a `ValueCell` creates a new handle to the **same** cell.
pub struct ValueCell<T> {
    core: Rc<CellCore<T>>,
}

impl<T> Clone for ValueCell<T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T: fmt::Debug + 'static> ValueCell<T> {
    /// Create a cell whose reads are reported to `tracker`.
    pub fn new(tracker: &Tracker, value: T) -> Self {
        Self {
            core: CellCore::new("ValueCell", tracker.downgrade(), value),
        }
    }

    /// Create a cell that no tracker ever sees.
    pub fn detached(value: T) -> Self {
        Self {
            core: CellCore::new("ValueCell", WeakTracker::default(), value),
        }
    }

    /// Current value. Registers the read with an open tracking session.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.core.read(T::clone)
    }

    /// Borrow the current value. Registers the read like [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics if `f` writes to this same cell (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.core.read(f)
    }

    /// Current value without registering the read.
    #[must_use]
    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        self.core.peek(T::clone)
    }

    /// Store `value` and notify listeners, unless it is textually equal to
    /// the current value.
    ///
    /// # Errors
    ///
    /// [`DisposedAccess`](crate::ReactiveError::DisposedAccess) if the value
    /// differs and the cell was disposed.
    pub fn set(&self, value: T) -> Result<()> {
        self.core.write(value)
    }

    /// Replace the value with `f(current)`, following [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<()> {
        let next = self.core.peek(f);
        self.core.write(next)
    }

    /// Fire every listener without changing the value.
    ///
    /// # Errors
    ///
    /// [`DisposedAccess`](crate::ReactiveError::DisposedAccess) if the cell
    /// was disposed.
    pub fn notify(&self) -> Result<()> {
        self.core.notify()
    }

    /// Add `f` as a listener; dropping the returned guard removes it.
    pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription {
        let listener = Listener::new(f);
        self.core.add_listener(listener.clone());
        Subscription::new(self.as_observable(), listener)
    }

    /// Type-erased handle to this cell.
    #[must_use]
    pub fn as_observable(&self) -> Rc<dyn Observable> {
        Rc::clone(&self.core) as Rc<dyn Observable>
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.core.listeners.len()
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl<T: fmt::Debug + 'static> Observable for ValueCell<T> {
    fn is_alive(&self) -> bool {
        self.core.is_alive()
    }

    fn has_listeners(&self) -> bool {
        self.core.has_listeners()
    }

    fn contains_listener(&self, listener: &Listener) -> bool {
        self.core.contains_listener(listener)
    }

    fn add_listener(&self, listener: Listener) {
        self.core.add_listener(listener);
    }

    fn remove_listener(&self, listener: &Listener) -> Result<()> {
        self.core.remove_listener(listener)
    }

    fn dispose(&self) {
        self.core.dispose();
    }

    fn type_label(&self) -> &'static str {
        self.core.type_label()
    }

    fn describe(&self) -> String {
        self.core.describe()
    }
}

impl<T: fmt::Debug + 'static> fmt::Display for ValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.core.describe())
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("value", &self.core.value.borrow())
            .field("listeners", &self.core.listeners.len())
            .field("alive", &self.core.alive.get())
            .finish()
    }
}

// Used by `DerivedCell`, which wraps the same core under its own label.
impl<T> ValueCell<T> {
    pub(crate) fn from_core(core: Rc<CellCore<T>>) -> Self {
        Self { core }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
