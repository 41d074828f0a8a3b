#![forbid(unsafe_code)]

//! Observable cells whose value comes from a compute function.
//!
//! # Design
//!
//! [`DerivedCell<T>`] has the same shape as [`ValueCell<T>`]: a value, an
//! ordered listener list and a liveness flag. The difference is where the
//! value comes from. The compute function runs once, at construction, to
//! produce the initial value. If a tracking session is open at that moment
//! the reads made by the compute function are attributed to that session.
//!
//! The cell does **not** subscribe to whatever the compute function reads.
//! Recomputing on change is left to the owner, typically a UI adapter that
//! watches the sources and calls [`recompute`](DerivedCell::recompute).
//!
//! # Invariants
//!
//! 1. Construction calls the compute function exactly once.
//! 2. `recompute` follows the write rules of `ValueCell::set`: a textually
//!    equal result notifies nobody.

use std::fmt;
use std::rc::Rc;

use crate::cell::{CellCore, ValueCell};
use crate::error::Result;
use crate::observable::{Listener, Observable, Subscription};
use crate::tracker::Tracker;

/// A cell initialised, and on demand refreshed, from a compute function.
///
/// Cloning a `DerivedCell` creates a new handle to the **same** cell.
pub struct DerivedCell<T> {
    cell: ValueCell<T>,
    compute: Rc<dyn Fn() -> T>,
}

impl<T> Clone for DerivedCell<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            compute: Rc::clone(&self.compute),
        }
    }
}

impl<T: fmt::Debug + 'static> DerivedCell<T> {
    /// Create the cell, running `compute` once for its initial value.
    pub fn new(tracker: &Tracker, compute: impl Fn() -> T + 'static) -> Self {
        let initial = compute();
        Self {
            cell: ValueCell::from_core(CellCore::new(
                "DerivedCell",
                tracker.downgrade(),
                initial,
            )),
            compute: Rc::new(compute),
        }
    }

    /// Run the compute function again and store its result.
    ///
    /// # Errors
    ///
    /// [`DisposedAccess`](crate::ReactiveError::DisposedAccess) if the result
    /// differs and the cell was disposed.
    pub fn recompute(&self) -> Result<()> {
        let next = (self.compute)();
        self.cell.set(next)
    }

    /// Current value. Registers the read with an open tracking session.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.get()
    }

    /// Borrow the current value, registering the read.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }

    /// Current value without registering the read.
    #[must_use]
    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        self.cell.peek()
    }

    /// Overwrite the value directly.
    ///
    /// # Errors
    ///
    /// Same as [`ValueCell::set`].
    pub fn set(&self, value: T) -> Result<()> {
        self.cell.set(value)
    }

    /// Fire every listener without changing the value.
    ///
    /// # Errors
    ///
    /// [`DisposedAccess`](crate::ReactiveError::DisposedAccess) if the cell
    /// was disposed.
    pub fn notify(&self) -> Result<()> {
        self.cell.notify()
    }

    /// Add `f` as a listener; dropping the returned guard removes it.
    pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription {
        self.cell.subscribe(f)
    }

    /// Type-erased handle to this cell.
    #[must_use]
    pub fn as_observable(&self) -> Rc<dyn Observable> {
        self.cell.as_observable()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.cell.listener_count()
    }
}

impl<T: fmt::Debug + 'static> Observable for DerivedCell<T> {
    fn is_alive(&self) -> bool {
        self.cell.is_alive()
    }

    fn has_listeners(&self) -> bool {
        self.cell.has_listeners()
    }

    fn contains_listener(&self, listener: &Listener) -> bool {
        self.cell.contains_listener(listener)
    }

    fn add_listener(&self, listener: Listener) {
        self.cell.add_listener(listener);
    }

    fn remove_listener(&self, listener: &Listener) -> Result<()> {
        self.cell.remove_listener(listener)
    }

    fn dispose(&self) {
        self.cell.dispose();
    }

    fn type_label(&self) -> &'static str {
        self.cell.type_label()
    }

    fn describe(&self) -> String {
        self.cell.describe()
    }
}

impl<T: fmt::Debug + 'static> fmt::Display for DerivedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cell.describe())
    }
}

impl<T: fmt::Debug> fmt::Debug for DerivedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedCell")
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
