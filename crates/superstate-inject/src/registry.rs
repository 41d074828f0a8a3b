#![forbid(unsafe_code)]

//! Named-singleton store.
//!
//! # Design
//!
//! A [`Registry`] maps logical names (by convention the type name of the
//! stored object) to [`Instance`]s. It moves between two states:
//!
//! ```text
//! inactive --activate()--> active --deactivate()--> inactive
//! ```
//!
//! Only an active registry accepts [`create`](Registry::create). Lookups go
//! through [`of`](Registry::of), which also enables stored controllers, and
//! [`init`](Registry::init) is the get-or-create form of it.
//!
//! In test mode with mocks configured, `create` stores the first mock of the
//! same concrete type instead of the real object, so that later `of` calls
//! hand out the double.
//!
//! Entries are kept in insertion order, which is the order
//! [`delete_all`](Registry::delete_all) tears them down in.
//!
//! # Invariants
//!
//! 1. Keys are unique; a second `create` under the same key replaces the
//!    entry without running any teardown.
//! 2. `delete` never fails. Unknown keys are ignored, as are unforced deletes
//!    while auto-dispose is explicitly off.
//! 3. Deleting disables a controller before disposing an observable, and
//!    both happen before the entry is removed.
//! 4. No internal borrow is held while user hooks run.
//!
//! # Failure Modes
//!
//! - **Teardown re-entry**: a controller's default `on_disable` deletes its
//!   own type-name key while the outer delete is still in progress. The
//!   outer delete tolerates the entry being gone by the time it removes it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::config::ActivateConfig;
use crate::controller;
use crate::error::{RegistryError, Result};
use crate::frame::FrameScheduler;
use crate::instance::{Injectable, Instance, Mock};

#[derive(Default)]
struct RegistryState {
    instances: IndexMap<String, Instance>,
    mocks: Vec<Mock>,
    scoped: bool,
    test_mode: bool,
    auto_dispose: Option<bool>,
}

#[derive(Default)]
struct RegistryInner {
    state: RefCell<RegistryState>,
    frames: FrameScheduler,
}

/// Singleton store with controller lifecycle and mock substitution.
///
/// Cloning a `Registry` creates a new handle to the **same** store.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Rc<RegistryInner>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- State ----

    /// Enter the active state.
    ///
    /// `mocks` replaces the configured mocks only when non-empty.
    pub fn activate(&self, config: ActivateConfig) {
        let ActivateConfig {
            test_mode,
            auto_dispose,
            mocks,
        } = config;
        let mut state = self.inner.state.borrow_mut();
        state.scoped = true;
        state.test_mode = test_mode;
        state.auto_dispose = Some(auto_dispose);
        let replaced = !mocks.is_empty();
        if replaced {
            state.mocks = mocks;
        }
        tracing::debug!(
            message = "registry.activate",
            test_mode,
            auto_dispose,
            mocks = state.mocks.len(),
            replaced
        );
    }

    /// Delete everything and return to the inactive state with all options
    /// reset.
    pub fn deactivate(&self) {
        self.delete_all();
        let mocks = {
            let mut state = self.inner.state.borrow_mut();
            state.scoped = false;
            state.test_mode = false;
            state.auto_dispose = None;
            std::mem::take(&mut state.mocks)
        };
        drop(mocks);
        tracing::debug!(message = "registry.deactivate");
    }

    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.inner.state.borrow().scoped
    }

    #[must_use]
    pub fn is_test_mode(&self) -> bool {
        self.inner.state.borrow().test_mode
    }

    /// `None` until activated and after deactivation.
    #[must_use]
    pub fn auto_dispose(&self) -> Option<bool> {
        self.inner.state.borrow().auto_dispose
    }

    #[must_use]
    pub fn mock_count(&self) -> usize {
        self.inner.state.borrow().mocks.len()
    }

    // ---- Entries ----

    /// Register `object` under `key`, or its mock in test mode.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotActivated`] unless the registry is active.
    pub fn create<T: Injectable>(&self, key: impl Into<String>, object: Rc<T>) -> Result<()> {
        let key = key.into();
        let mock = {
            let state = self.inner.state.borrow();
            if !state.scoped {
                drop(state);
                tracing::warn!(message = "registry.create_inactive", key = %key);
                return Err(RegistryError::NotActivated);
            }
            if state.test_mode {
                state
                    .mocks
                    .iter()
                    .find(|m| m.fits::<T>())
                    .map(|m| m.instance().clone())
            } else {
                None
            }
        };
        let substituted = mock.is_some();
        // Instance::new runs the object's Injectable hooks.
        let instance = mock.unwrap_or_else(|| Instance::new(object));
        tracing::debug!(
            message = "registry.create",
            key = %key,
            type_name = instance.type_name(),
            substituted
        );
        let mut state = self.inner.state.borrow_mut();
        let previous = state.instances.insert(key, instance);
        drop(state);
        drop(previous);
        Ok(())
    }

    /// Typed handle to the object under `key`. Enables it if it is a
    /// controller.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for an unknown key and
    /// [`RegistryError::TypeMismatch`] if the entry is not a `T`.
    pub fn of<T: Injectable>(&self, key: &str) -> Result<Rc<T>> {
        let instance = self.lookup(key)?;
        let object = instance.downcast::<T>(key)?;
        self.enable(key, &instance);
        Ok(object)
    }

    /// Untyped form of [`of`](Self::of).
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for an unknown key.
    pub fn of_dyn(&self, key: &str) -> Result<Instance> {
        let instance = self.lookup(key)?;
        self.enable(key, &instance);
        Ok(instance)
    }

    /// Get-or-create. The get path still enables controllers.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotActivated`] if `key` is absent and the registry
    /// is inactive, [`RegistryError::TypeMismatch`] if the entry is not a
    /// `T`.
    pub fn init<T: Injectable>(&self, key: impl Into<String>, object: Rc<T>) -> Result<Rc<T>> {
        self.init_with(key, || object)
    }

    /// Like [`init`](Self::init), building the object only when `key` is
    /// absent.
    ///
    /// # Errors
    ///
    /// Same as [`init`](Self::init).
    pub fn init_with<T: Injectable>(
        &self,
        key: impl Into<String>,
        make: impl FnOnce() -> Rc<T>,
    ) -> Result<Rc<T>> {
        let key = key.into();
        match self.of::<T>(&key) {
            Err(err) if err.is_not_found() => {
                self.create(key.clone(), make())?;
                self.of::<T>(&key)
            }
            found => found,
        }
    }

    /// Tear down and remove `key`.
    ///
    /// Returns whether an entry was torn down. Unforced deletes are skipped
    /// while auto-dispose is explicitly off.
    pub fn delete(&self, key: &str, force: bool) -> bool {
        let instance = {
            let state = self.inner.state.borrow();
            if state.auto_dispose == Some(false) && !force {
                tracing::debug!(message = "registry.delete_skipped", key);
                return false;
            }
            match state.instances.get(key) {
                Some(instance) => instance.clone(),
                None => return false,
            }
        };

        if let Some(ctrl) = instance.controller() {
            controller::disable(ctrl.as_ref(), self);
        }
        if let Some(observable) = instance.observable() {
            observable.dispose();
        }
        let removed = self.inner.state.borrow_mut().instances.shift_remove(key);
        drop(removed);
        tracing::debug!(message = "registry.delete", key, force);
        true
    }

    /// Force-delete every entry, then clear whatever remains.
    pub fn delete_all(&self) {
        let keys = self.keys();
        for key in &keys {
            self.delete(key, true);
        }
        let leftovers = std::mem::take(&mut self.inner.state.borrow_mut().instances);
        drop(leftovers);
        tracing::debug!(message = "registry.delete_all", deleted = keys.len());
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.state.borrow().instances.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.borrow().instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.state.borrow().instances.keys().cloned().collect()
    }

    // ---- Frames ----

    /// Queue that runs controllers' `on_alive` hooks.
    #[must_use]
    pub fn frames(&self) -> &FrameScheduler {
        &self.inner.frames
    }

    /// Run one frame of deferred hooks. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        self.inner.frames.run_frame()
    }

    /// Whether both handles refer to the same store.
    #[must_use]
    pub fn ptr_eq(&self, other: &Registry) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn lookup(&self, key: &str) -> Result<Instance> {
        self.inner
            .state
            .borrow()
            .instances
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(key))
    }

    fn enable(&self, key: &str, instance: &Instance) {
        if let Some(ctrl) = instance.controller() {
            controller::enable(ctrl, &self.inner.frames);
        }
        tracing::trace!(message = "registry.of", key, type_name = instance.type_name());
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Registry")
            .field("keys", &state.instances.keys().collect::<Vec<_>>())
            .field("mocks", &state.mocks.len())
            .field("scoped", &state.scoped)
            .field("test_mode", &state.test_mode)
            .field("auto_dispose", &state.auto_dispose)
            .field("frames", &self.inner.frames)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
