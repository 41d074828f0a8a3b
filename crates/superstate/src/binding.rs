#![forbid(unsafe_code)]

//! Component mount/unmount for controllers.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use superstate_inject::{Controller, Registry, controller};

/// An enabled controller that is disabled when the binding drops.
///
/// Created by [`Runtime::use_controller`](crate::Runtime::use_controller).
#[must_use = "dropping a ControllerBinding disables the controller immediately"]
pub struct ControllerBinding<T: Controller> {
    controller: Rc<T>,
    registry: Registry,
}

impl<T: Controller> ControllerBinding<T> {
    pub(crate) fn mount(controller: Rc<T>, registry: Registry) -> Self {
        let dynamic: Rc<dyn Controller> = controller.clone();
        controller::enable(&dynamic, registry.frames());
        tracing::debug!(message = "controller.mount", name = controller.name());
        Self {
            controller,
            registry,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &Rc<T> {
        &self.controller
    }
}

impl<T: Controller> Deref for ControllerBinding<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.controller
    }
}

impl<T: Controller> Drop for ControllerBinding<T> {
    fn drop(&mut self) {
        tracing::debug!(message = "controller.unmount", name = self.controller.name());
        controller::disable(self.controller.as_ref(), &self.registry);
    }
}

impl<T: Controller> fmt::Debug for ControllerBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerBinding")
            .field("name", &self.controller.name())
            .field("alive", &self.controller.is_alive())
            .finish()
    }
}
