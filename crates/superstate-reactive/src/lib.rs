#![forbid(unsafe_code)]

//! Observable state with implicit dependency tracking.
//!
//! This crate provides the reactive half of superstate:
//!
//! - [`ValueCell`]: a shared mutable value that notifies listeners when it
//!   changes textually.
//! - [`DerivedCell`]: the same shape, initialised from a compute function.
//! - [`MergedObservable`]: a read-only group of observables that fans
//!   listener operations out to its members.
//! - [`Tracker`]: the read-tracking context. While a session is open every
//!   cell read is recorded, and harvesting the session yields the
//!   `MergedObservable` of everything read.
//! - [`watch`] / [`watch_until`]: run a callback and re-run it on change.
//!
//! # Architecture
//!
//! Everything is single-threaded and synchronous. Cells use
//! `Rc<RefCell<..>>` storage and fire listeners before `set` returns. The
//! only shared state is the `Tracker`, which is constructed explicitly and
//! handed to each cell; there are no process-wide globals.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use superstate_reactive::{Tracker, ValueCell};
//!
//! let tracker = Tracker::new();
//! let x = ValueCell::new(&tracker, 1);
//! let y = ValueCell::new(&tracker, 2);
//! let z = ValueCell::new(&tracker, 3);
//!
//! let (sum, merged) = tracker.track(|| x.get() + y.get()).unwrap();
//! assert_eq!(sum, 3);
//!
//! let renders = Rc::new(Cell::new(0));
//! let r = Rc::clone(&renders);
//! let _sub = merged.subscribe(move || r.set(r.get() + 1));
//!
//! z.set(30).unwrap(); // not read, no notification
//! x.set(10).unwrap();
//! assert_eq!(renders.get(), 1);
//! ```

pub mod cell;
pub mod derived;
pub mod error;
pub mod merged;
pub mod observable;
pub mod tracker;
pub mod watch;

pub use cell::ValueCell;
pub use derived::DerivedCell;
pub use error::{ReactiveError, Result};
pub use merged::{MergedObservable, Slot};
pub use observable::{Listener, Observable, Subscription, WeakListener, short_type_name, textual};
pub use tracker::{Tracker, TrackingScope};
pub use watch::{Watch, watch, watch_until};
