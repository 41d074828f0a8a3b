#![forbid(unsafe_code)]

//! Run a callback, then re-run it whenever something it read changes.
//!
//! # Design
//!
//! [`watch`] opens a tracking session, calls the callback once, harvests the
//! reads into a [`MergedObservable`] and subscribes a re-run listener to it.
//! The dependency set is fixed by that first run; later runs are not tracked
//! and do not widen or narrow it.
//!
//! [`watch_until`] adds a stop condition that is checked on every
//! notification, **before** re-running. Once it holds, the listener detaches
//! itself and the callback is not called for that notification.
//!
//! # Failure Modes
//!
//! - **No reads**: the first run must read at least one observable, otherwise
//!   [`ReactiveError::NoObservableRead`](crate::ReactiveError::NoObservableRead)
//!   is returned and nothing is subscribed.
//! - **Unstopped watches**: the re-run listener stays on its sources until
//!   [`Watch::stop`] runs, the stop condition holds, or the sources are
//!   disposed. It only holds weak handles to them, so sources whose last
//!   user handle is gone are freed along with the listener.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::merged::MergedObservable;
use crate::observable::{Listener, Observable, WeakListener};
use crate::tracker::Tracker;

type StopCondition = Box<dyn Fn() -> bool>;

/// Handle to an installed watch.
pub struct Watch {
    merged: MergedObservable,
    listener: Listener,
}

impl Watch {
    /// The observables the first run read.
    #[must_use]
    pub fn sources(&self) -> &MergedObservable {
        &self.merged
    }

    /// Whether this watch's re-run listener is still attached to a live
    /// source.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.merged
            .value()
            .iter()
            .flatten()
            .any(|source| source.is_alive() && source.contains_listener(&self.listener))
    }

    /// Detach the re-run listener from every source.
    ///
    /// # Errors
    ///
    /// [`DisposedAccess`](crate::ReactiveError::DisposedAccess) if a source
    /// was disposed.
    pub fn stop(&self) -> Result<()> {
        self.merged.remove_listener(&self.listener)
    }
}

impl fmt::Debug for Watch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("sources", &self.merged)
            .field("listener", &self.listener)
            .finish()
    }
}

/// Run `callback` now and again after every change to what it read.
///
/// # Errors
///
/// [`NoObservableRead`](crate::ReactiveError::NoObservableRead) if the first
/// run read nothing.
pub fn watch(tracker: &Tracker, callback: impl Fn() + 'static) -> Result<Watch> {
    install(tracker, Rc::new(callback), None)
}

/// Like [`watch`], but detach as soon as `stop_when` returns `true` at a
/// notification.
///
/// # Errors
///
/// [`NoObservableRead`](crate::ReactiveError::NoObservableRead) if the first
/// run read nothing.
pub fn watch_until(
    tracker: &Tracker,
    callback: impl Fn() + 'static,
    stop_when: impl Fn() -> bool + 'static,
) -> Result<Watch> {
    install(tracker, Rc::new(callback), Some(Box::new(stop_when)))
}

fn install(
    tracker: &Tracker,
    callback: Rc<dyn Fn()>,
    stop_when: Option<StopCondition>,
) -> Result<Watch> {
    let merged = {
        let scope = tracker.begin();
        callback();
        scope.finish()?
    };

    let me: Rc<RefCell<Option<WeakListener>>> = Rc::default();
    let listener = {
        let sources: Vec<Weak<dyn Observable>> =
            merged.value().iter().flatten().map(Rc::downgrade).collect();
        let me = Rc::clone(&me);
        Listener::new(move || {
            let keep_running = stop_when.as_ref().is_none_or(|stop| !stop());
            if keep_running {
                callback();
                return;
            }
            let Some(this) = me.borrow().as_ref().and_then(WeakListener::upgrade) else {
                return;
            };
            tracing::debug!(message = "watch.detach", sources = sources.len());
            for source in sources.iter().filter_map(Weak::upgrade) {
                let _ = source.remove_listener(&this);
            }
        })
    };
    *me.borrow_mut() = Some(listener.downgrade());

    merged.add_listener(listener.clone());
    Ok(Watch { merged, listener })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
