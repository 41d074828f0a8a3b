#![forbid(unsafe_code)]

//! Enable/disable lifecycle for stateful registry objects.
//!
//! # Design
//!
//! A controller is any [`Injectable`](crate::Injectable) that owns a
//! [`Lifecycle`] and implements [`Controller`]. The registry drives it:
//! [`Registry::of`](crate::Registry::of) enables it and
//! [`Registry::delete`](crate::Registry::delete) disables it. Hooks are plain
//! trait methods with empty defaults, except
//! [`on_disable`](Controller::on_disable) which unregisters the controller
//! under its own type name.
//!
//! `enable` runs `on_enable` synchronously and then requests `on_alive` on
//! the registry's [`FrameScheduler`](crate::FrameScheduler). The frame handle
//! is stored in the lifecycle so that `disable` can cancel an `on_alive` that
//! has not fired yet.
//!
//! # Invariants
//!
//! 1. `on_enable` and `on_disable` each run once per transition; repeated
//!    `enable` or `disable` calls are no-ops.
//! 2. `alive` is set before `on_alive` is scheduled and cleared before
//!    `on_disable` runs.
//! 3. `on_alive` only runs while the controller is still enabled.
//!
//! # Failure Modes
//!
//! - **Re-entrant hooks**: `on_disable` runs with no registry borrow held, so
//!   it may call back into the registry. The default does exactly that.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use superstate_reactive::short_type_name;

use crate::frame::{FrameHandle, FrameScheduler};
use crate::registry::Registry;

/// Per-controller lifecycle state. Embed one in each controller.
#[derive(Default)]
pub struct Lifecycle {
    alive: Cell<bool>,
    pending_alive: Cell<Option<FrameHandle>>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Frame handle of an `on_alive` that has not run yet.
    #[must_use]
    pub fn pending_alive(&self) -> Option<FrameHandle> {
        self.pending_alive.get()
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("alive", &self.alive.get())
            .field("pending_alive", &self.pending_alive.get())
            .finish()
    }
}

/// A registry object with an enabled/disabled lifecycle.
pub trait Controller: 'static {
    fn lifecycle(&self) -> &Lifecycle;

    /// Runs synchronously when the controller becomes enabled.
    fn on_enable(&self) {}

    /// Runs on the first frame after enabling, unless disabled first.
    fn on_alive(&self) {}

    /// Runs after the controller becomes disabled. Unregisters the
    /// controller under [`name`](Controller::name) by default.
    fn on_disable(&self, registry: &Registry) {
        registry.delete(self.name(), false);
    }

    /// Registry key this controller answers to.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    fn is_alive(&self) -> bool {
        self.lifecycle().is_alive()
    }
}

/// Transition to enabled. No-op if already enabled.
pub fn enable(controller: &Rc<dyn Controller>, frames: &FrameScheduler) {
    let lifecycle = controller.lifecycle();
    if lifecycle.is_alive() {
        return;
    }
    controller.on_enable();
    lifecycle.alive.set(true);

    let weak = Rc::downgrade(controller);
    let handle = frames.request(move || {
        let Some(controller) = weak.upgrade() else {
            return;
        };
        controller.lifecycle().pending_alive.set(None);
        if controller.is_alive() {
            tracing::debug!(message = "controller.alive", name = controller.name());
            controller.on_alive();
        }
    });
    lifecycle.pending_alive.set(Some(handle));
    tracing::debug!(
        message = "controller.enable",
        name = controller.name(),
        frame = handle.raw()
    );
}

/// Transition to disabled. No-op if already disabled.
///
/// A pending `on_alive` is cancelled before `on_disable` runs.
pub fn disable(controller: &dyn Controller, registry: &Registry) {
    let lifecycle = controller.lifecycle();
    if !lifecycle.is_alive() {
        return;
    }
    lifecycle.alive.set(false);
    if let Some(handle) = lifecycle.pending_alive.take()
        && registry.frames().cancel(handle)
    {
        tracing::warn!(
            message = "controller.alive_cancelled",
            name = controller.name(),
            frame = handle.raw()
        );
    }
    tracing::debug!(message = "controller.disable", name = controller.name());
    controller.on_disable(registry);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
