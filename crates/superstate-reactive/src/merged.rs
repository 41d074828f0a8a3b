#![forbid(unsafe_code)]

//! Read-only composite over a fixed list of observables.
//!
//! # Design
//!
//! A [`MergedObservable`] is what a tracking session produces: the group of
//! observables one evaluation read. It is an opaque handle. Its
//! [`value`](MergedObservable::value) is the child list itself, not the
//! children's values, and it can never be written.
//!
//! Listener operations fan out to every present child. Liveness and
//! `has_listeners` only look at the **first** slot; the other children are
//! not consulted. Adapters rely on this exact behaviour, so it is kept as-is.
//!
//! # Invariants
//!
//! 1. The child list is captured at construction and never resized.
//! 2. Absent slots are skipped by every fan-out operation.
//! 3. With no children, or an absent first slot, `is_alive` and
//!    `has_listeners` return `false`.
//! 4. `dispose` disposes the children but keeps the list.

use std::fmt;
use std::rc::Rc;

use crate::error::{ReactiveError, Result};
use crate::observable::{Listener, Observable, Subscription};

/// One slot of a [`MergedObservable`].
pub type Slot = Option<Rc<dyn Observable>>;

/// Composite observable over a fixed, ordered list of children.
///
/// Cloning a `MergedObservable` creates a new handle to the **same** list.
#[derive(Clone)]
pub struct MergedObservable {
    children: Rc<[Slot]>,
}

impl MergedObservable {
    /// Merge `children`, keeping their order. Absent slots are allowed.
    pub fn new(children: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    /// The child list itself.
    #[must_use]
    pub fn value(&self) -> &[Slot] {
        &self.children
    }

    /// Always rejected.
    ///
    /// # Errors
    ///
    /// [`ReactiveError::UnsettableComposite`], unconditionally.
    pub fn set_value(&self, _value: Vec<Slot>) -> Result<()> {
        Err(ReactiveError::UnsettableComposite)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Add `f` to every child; dropping the returned guard removes it again.
    ///
    /// The guard detaches from each child separately, so a child disposed in
    /// the meantime does not keep the listener on the others.
    pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription {
        let listener = Listener::new(f);
        self.add_listener(listener.clone());
        Subscription::fan_out(self.present().cloned().collect(), listener)
    }

    fn present(&self) -> impl Iterator<Item = &Rc<dyn Observable>> {
        self.children.iter().flatten()
    }
}

impl Observable for MergedObservable {
    fn is_alive(&self) -> bool {
        self.children
            .first()
            .and_then(Option::as_ref)
            .is_some_and(|first| first.is_alive())
    }

    fn has_listeners(&self) -> bool {
        self.children
            .first()
            .and_then(Option::as_ref)
            .is_some_and(|first| first.has_listeners())
    }

    fn contains_listener(&self, listener: &Listener) -> bool {
        self.present().any(|child| child.contains_listener(listener))
    }

    fn add_listener(&self, listener: Listener) {
        for child in self.present() {
            child.add_listener(listener.clone());
        }
    }

    fn remove_listener(&self, listener: &Listener) -> Result<()> {
        for child in self.present() {
            child.remove_listener(listener)?;
        }
        Ok(())
    }

    fn dispose(&self) {
        for child in self.present() {
            child.dispose();
        }
    }

    fn type_label(&self) -> &'static str {
        "MergedObservable"
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self
            .children
            .iter()
            .map(|slot| match slot {
                Some(child) => child.describe(),
                None => "None".to_string(),
            })
            .collect();
        format!("MergedObservable([{}])", parts.join(", "))
    }
}

impl fmt::Display for MergedObservable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for MergedObservable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.children.iter()).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
