#![forbid(unsafe_code)]

//! Next-frame callback queue.
//!
//! # Design
//!
//! UI hosts call [`FrameScheduler::run_frame`] once per paint. Callbacks
//! requested before that call run during it, in request order. Callbacks
//! requested while a frame is running wait for the next frame, so a callback
//! that reschedules itself cannot starve the caller.
//!
//! Every request returns a [`FrameHandle`]; [`cancel`](FrameScheduler::cancel)
//! removes a callback that has not started yet. Controllers use this to drop
//! a pending `on_alive` when they are disabled before the frame arrives.
//!
//! # Invariants
//!
//! 1. Each callback runs at most once.
//! 2. A cancelled callback never runs.
//! 3. Handles are never reused.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Identifies one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct FrameQueue {
    next_id: u64,
    queued: VecDeque<(FrameHandle, Box<dyn FnOnce()>)>,
    frames_run: u64,
}

/// Single-threaded queue of callbacks deferred to the next frame.
///
/// Cloning a `FrameScheduler` creates a new handle to the **same** queue.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    inner: Rc<RefCell<FrameQueue>>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer `callback` to the next [`run_frame`](Self::run_frame).
    pub fn request(&self, callback: impl FnOnce() + 'static) -> FrameHandle {
        let mut queue = self.inner.borrow_mut();
        queue.next_id += 1;
        let handle = FrameHandle(queue.next_id);
        queue.queued.push_back((handle, Box::new(callback)));
        handle
    }

    /// Drop a callback that has not run yet. Returns whether it was pending.
    pub fn cancel(&self, handle: FrameHandle) -> bool {
        let mut queue = self.inner.borrow_mut();
        let before = queue.queued.len();
        queue.queued.retain(|(h, _)| *h != handle);
        queue.queued.len() != before
    }

    /// Run every callback queued before this call. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let batch = {
            let mut queue = self.inner.borrow_mut();
            queue.frames_run += 1;
            std::mem::take(&mut queue.queued)
        };
        let ran = batch.len();
        for (_, callback) in batch {
            callback();
        }
        if ran > 0 {
            tracing::debug!(message = "frame.run", callbacks = ran);
        }
        ran
    }

    /// Number of callbacks waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().queued.len()
    }

    /// Whether `handle` is still waiting.
    #[must_use]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.inner.borrow().queued.iter().any(|(h, _)| *h == handle)
    }

    /// Number of [`run_frame`](Self::run_frame) calls so far.
    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.inner.borrow().frames_run
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("pending", &queue.queued.len())
            .field("frames_run", &queue.frames_run)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn runs_in_request_order_once() {
        let frames = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for id in 0..3 {
            let log = Rc::clone(&log);
            frames.request(move || log.borrow_mut().push(id));
        }
        assert_eq!(frames.pending(), 3);
        assert_eq!(frames.run_frame(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert_eq!(frames.run_frame(), 0);
        assert_eq!(frames.frames_run(), 2);
    }

    #[test]
    fn cancelled_callback_never_runs() {
        let frames = FrameScheduler::new();
        let ran = Rc::new(Cell::new(false));
        let r = Rc::clone(&ran);
        let handle = frames.request(move || r.set(true));
        assert!(frames.is_pending(handle));
        assert!(frames.cancel(handle));
        assert!(!frames.cancel(handle));
        frames.run_frame();
        assert!(!ran.get());
    }

    #[test]
    fn requests_during_a_frame_wait_for_the_next() {
        let frames = FrameScheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let f = frames.clone();
        let c = Rc::clone(&count);
        frames.request(move || {
            c.set(c.get() + 1);
            let c = Rc::clone(&c);
            f.request(move || c.set(c.get() + 1));
        });

        assert_eq!(frames.run_frame(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(frames.pending(), 1);
        assert_eq!(frames.run_frame(), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn handles_are_unique() {
        let frames = FrameScheduler::new();
        let a = frames.request(|| {});
        let b = frames.request(|| {});
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
