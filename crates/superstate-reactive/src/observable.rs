#![forbid(unsafe_code)]

//! The observable capability shared by every reactive value.
//!
//! # Design
//!
//! [`Observable`] is object-safe so heterogeneous cells can be collected into
//! one list by the [`Tracker`](crate::Tracker) and merged into a
//! [`MergedObservable`](crate::MergedObservable). Typed reads and writes live
//! on the concrete cells; the trait only covers listener management,
//! liveness, and disposal.
//!
//! Listeners are zero-argument callbacks. A [`Listener`] compares by
//! identity, so the same handle added twice fires twice per notification and
//! needs two removals to detach completely.
//!
//! # Invariants
//!
//! 1. Listeners fire in insertion order, duplicates included.
//! 2. `add_listener` never checks liveness; `remove_listener` does.
//! 3. `dispose` clears listeners without firing them and is irreversible.
//!
//! # Failure Modes
//!
//! - **Notification cycles**: listeners run synchronously and re-entrantly. A
//!   listener that writes back into an observable it is subscribed to, or two
//!   observables that update each other, recurse without any guard. Callers
//!   must not build such cycles.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{ReactiveError, Result};

/// A change callback with reference identity.
///
/// Cloning a `Listener` yields another handle to the **same** callback, which
/// is what removal matches against.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn()>);

impl Listener {
    /// Wrap a callback.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.0)();
    }

    /// Whether both handles refer to the same callback.
    #[must_use]
    pub fn same(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Non-owning handle, used by callbacks that need to remove themselves.
    #[must_use]
    pub fn downgrade(&self) -> WeakListener {
        WeakListener(Rc::downgrade(&self.0))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Weak counterpart of [`Listener`].
#[derive(Clone)]
pub struct WeakListener(Weak<dyn Fn()>);

impl WeakListener {
    #[must_use]
    pub fn upgrade(&self) -> Option<Listener> {
        self.0.upgrade().map(Listener)
    }
}

impl fmt::Debug for WeakListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakListener")
    }
}

/// The capability set every reactive value implements.
pub trait Observable {
    /// False once [`dispose`](Observable::dispose) has run.
    fn is_alive(&self) -> bool;

    /// Whether any listener is registered.
    fn has_listeners(&self) -> bool;

    /// Whether `listener` itself is registered.
    fn contains_listener(&self, listener: &Listener) -> bool;

    /// Append a listener. Permitted after dispose, but the listener will
    /// never fire.
    fn add_listener(&self, listener: Listener);

    /// Remove the first registered occurrence of `listener`.
    ///
    /// # Errors
    ///
    /// [`ReactiveError::DisposedAccess`] if the observable was disposed.
    fn remove_listener(&self, listener: &Listener) -> Result<()>;

    /// Release listeners without notifying them and mark the observable as
    /// unusable. Calling it again is a no-op.
    fn dispose(&self);

    /// Unqualified name of the concrete type, used in error messages.
    fn type_label(&self) -> &'static str;

    /// Textual form, `TypeName(value)` for cells.
    fn describe(&self) -> String;

    /// Fail with [`ReactiveError::DisposedAccess`] unless alive.
    fn assert_alive(&self) -> Result<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(ReactiveError::disposed(self.type_label()))
        }
    }
}

impl fmt::Debug for dyn Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// RAII guard returned by the `subscribe` methods of the cells and of
/// [`MergedObservable`](crate::MergedObservable).
///
/// Dropping it removes the listener from every target. Each target is
/// handled on its own: one that was disposed in the meantime is left alone
/// and the rest are still detached.
#[must_use = "dropping a Subscription removes the listener immediately"]
pub struct Subscription {
    targets: Vec<Rc<dyn Observable>>,
    listener: Listener,
}

impl Subscription {
    pub(crate) fn new(target: Rc<dyn Observable>, listener: Listener) -> Self {
        Self::fan_out(vec![target], listener)
    }

    pub(crate) fn fan_out(targets: Vec<Rc<dyn Observable>>, listener: Listener) -> Self {
        Self { targets, listener }
    }

    /// The listener this guard owns.
    #[must_use]
    pub fn listener(&self) -> &Listener {
        &self.listener
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for target in &self.targets {
            let _ = target.remove_listener(&self.listener);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("listener", &self.listener)
            .field(
                "targets",
                &self.targets.iter().map(|t| t.type_label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Ordered listener storage shared by the cell types.
#[derive(Default)]
pub(crate) struct ListenerList {
    listeners: RefCell<Vec<Listener>>,
}

impl ListenerList {
    pub(crate) fn push(&self, listener: Listener) {
        self.listeners.borrow_mut().push(listener);
    }

    pub(crate) fn remove_first(&self, listener: &Listener) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(index) = listeners.iter().position(|l| l.same(listener)) {
            listeners.remove(index);
        }
    }

    pub(crate) fn contains(&self, listener: &Listener) -> bool {
        self.listeners.borrow().iter().any(|l| l.same(listener))
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Fire every listener registered at call time.
    ///
    /// The borrow is released before any callback runs, so callbacks may add
    /// or remove listeners on the same list.
    pub(crate) fn notify(&self) -> usize {
        let snapshot = self.listeners.borrow().clone();
        for listener in &snapshot {
            listener.call();
        }
        snapshot.len()
    }
}

/// Textual form used for write short-circuiting.
///
/// Two values are "the same" when their `Debug` renderings are identical;
/// no structural comparison takes place.
#[must_use]
pub fn textual<T: fmt::Debug + ?Sized>(value: &T) -> String {
    format!("{value:?}")
}

/// Unqualified type name: `Counter` for `app::state::Counter`, `ValueCell`
/// for `superstate_reactive::cell::ValueCell<i32>`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
