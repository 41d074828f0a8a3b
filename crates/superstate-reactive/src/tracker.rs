#![forbid(unsafe_code)]

//! Implicit read tracking.
//!
//! # Design
//!
//! A [`Tracker`] is an explicitly constructed context shared (by cheap clone)
//! between the cells it was handed to. While it is listening, every cell read
//! appends that cell to the tracker's collection buffer; harvesting drains
//! the buffer into a [`MergedObservable`].
//!
//! Two entry styles exist. The raw pair
//! [`start_listening`](Tracker::start_listening) /
//! [`harvest`](Tracker::harvest) mirrors what UI adapters call at the start
//! and end of a render. [`begin`](Tracker::begin) returns a
//! [`TrackingScope`] guard that always stops listening and drops the buffer
//! when it goes out of scope, including during a panic unwind.
//!
//! # Invariants
//!
//! 1. Collection order equals read order; repeated reads are kept.
//! 2. Harvesting always stops listening and leaves the buffer empty, even
//!    when it fails.
//! 3. Harvesting an empty buffer is an error, never an empty merge.
//!
//! # Failure Modes
//!
//! - **Nested sessions**: starting a second session while one is open shares
//!   the same buffer. The inner harvest takes the outer session's reads as
//!   well and switches listening off for both. Only one session may be open
//!   at a time.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{ReactiveError, Result};
use crate::merged::MergedObservable;
use crate::observable::Observable;

#[derive(Default)]
struct TrackerInner {
    listening: Cell<bool>,
    collected: RefCell<Vec<Rc<dyn Observable>>>,
}

/// Read-tracking context.
///
/// Cloning a `Tracker` creates a new handle to the **same** state.
#[derive(Clone, Default)]
pub struct Tracker {
    inner: Rc<TrackerInner>,
}

impl Tracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch collection on. Calling it while already listening does nothing.
    pub fn start_listening(&self) {
        self.inner.listening.set(true);
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.inner.listening.get()
    }

    /// Number of reads collected so far in the open session.
    #[must_use]
    pub fn collected_len(&self) -> usize {
        self.inner.collected.borrow().len()
    }

    /// Record a read. Ignored unless listening.
    pub fn record(&self, observable: Rc<dyn Observable>) {
        if !self.inner.listening.get() {
            return;
        }
        tracing::trace!(
            message = "tracker.read",
            observable = observable.type_label()
        );
        self.inner.collected.borrow_mut().push(observable);
    }

    /// Stop listening and merge everything read since
    /// [`start_listening`](Tracker::start_listening).
    ///
    /// # Errors
    ///
    /// [`ReactiveError::NoObservableRead`] when nothing was read.
    pub fn harvest(&self) -> Result<MergedObservable> {
        self.inner.listening.set(false);
        let collected = std::mem::take(&mut *self.inner.collected.borrow_mut());
        if collected.is_empty() {
            tracing::warn!(message = "tracker.harvest_empty");
            return Err(ReactiveError::NoObservableRead);
        }
        tracing::debug!(message = "tracker.harvest", reads = collected.len());
        Ok(MergedObservable::new(collected.into_iter().map(Some)))
    }

    /// Open a scoped tracking session.
    pub fn begin(&self) -> TrackingScope {
        self.start_listening();
        TrackingScope {
            tracker: self.clone(),
            finished: false,
        }
    }

    /// Run `f` inside a scoped session and merge what it read.
    ///
    /// # Errors
    ///
    /// [`ReactiveError::NoObservableRead`] when `f` read nothing.
    pub fn track<R>(&self, f: impl FnOnce() -> R) -> Result<(R, MergedObservable)> {
        let scope = self.begin();
        let out = f();
        let merged = scope.finish()?;
        Ok((out, merged))
    }

    pub(crate) fn downgrade(&self) -> WeakTracker {
        WeakTracker(Rc::downgrade(&self.inner))
    }

    /// Whether both handles share the same state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Tracker) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("listening", &self.is_listening())
            .field("collected", &self.collected_len())
            .finish()
    }
}

/// Non-owning tracker handle held by cells.
#[derive(Clone, Default)]
pub(crate) struct WeakTracker(Weak<TrackerInner>);

impl WeakTracker {
    pub(crate) fn record(&self, observable: impl FnOnce() -> Rc<dyn Observable>) {
        if let Some(inner) = self.0.upgrade()
            && inner.listening.get()
        {
            Tracker { inner }.record(observable());
        }
    }
}

/// Guard for one tracking session, returned by [`Tracker::begin`].
///
/// Dropping it without calling [`finish`](TrackingScope::finish) stops
/// listening and discards the collected reads.
#[must_use = "dropping a TrackingScope ends the session immediately"]
pub struct TrackingScope {
    tracker: Tracker,
    finished: bool,
}

impl TrackingScope {
    /// End the session and merge the reads.
    ///
    /// # Errors
    ///
    /// [`ReactiveError::NoObservableRead`] when nothing was read.
    pub fn finish(mut self) -> Result<MergedObservable> {
        self.finished = true;
        self.tracker.harvest()
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.tracker.inner.listening.set(false);
        self.tracker.inner.collected.borrow_mut().clear();
    }
}

impl fmt::Debug for TrackingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingScope")
            .field("tracker", &self.tracker)
            .field("finished", &self.finished)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
