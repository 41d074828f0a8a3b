#![forbid(unsafe_code)]

//! The application-wide context object.
//!
//! # Design
//!
//! A [`Runtime`] owns the two pieces of shared state an application needs:
//! one [`Tracker`] for implicit read tracking and one [`Registry`] for
//! singletons. It is cheap to clone; every clone talks to the same state.
//! UI adapters keep one per application and pass it down.
//!
//! Registry access on the runtime is keyed by type: `runtime.of::<Cart>()`
//! looks up the key `"Cart"`. [`Runtime::registry`] exposes the string-keyed
//! API for objects registered under custom names.
//!
//! # Invariants
//!
//! 1. Every cell built through the runtime reports reads to its tracker.
//! 2. [`delete`](Runtime::delete) is always forced; auto-dispose only
//!    governs [`delete_key`](Runtime::delete_key) and controller
//!    self-removal.

use std::rc::Rc;

use superstate_inject::{ActivateConfig, Controller, Injectable, Registry, RegistryError};
use superstate_reactive::{
    DerivedCell, MergedObservable, ReactiveError, Tracker, TrackingScope, ValueCell, Watch,
    short_type_name,
};

use crate::binding::ControllerBinding;
use crate::scope::AppScope;

/// Tracker plus registry.
#[derive(Clone, Debug, Default)]
pub struct Runtime {
    tracker: Tracker,
    registry: Registry,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ---- Cells ----

    /// A value cell reporting reads to this runtime.
    pub fn cell<T: std::fmt::Debug + 'static>(&self, value: T) -> ValueCell<T> {
        ValueCell::new(&self.tracker, value)
    }

    /// A derived cell computed once, now.
    pub fn derived<T: std::fmt::Debug + 'static>(
        &self,
        compute: impl Fn() -> T + 'static,
    ) -> DerivedCell<T> {
        DerivedCell::new(&self.tracker, compute)
    }

    // ---- Tracking ----

    /// Start recording reads. Pair with
    /// [`end_tracked_evaluation`](Self::end_tracked_evaluation).
    pub fn begin_tracked_evaluation(&self) {
        self.tracker.start_listening();
    }

    /// Stop recording and merge everything read since
    /// [`begin_tracked_evaluation`](Self::begin_tracked_evaluation).
    ///
    /// # Errors
    ///
    /// [`ReactiveError::NoObservableRead`] if nothing was read.
    pub fn end_tracked_evaluation(&self) -> Result<MergedObservable, ReactiveError> {
        self.tracker.harvest()
    }

    /// Guard form of the begin/end pair.
    pub fn tracking_scope(&self) -> TrackingScope {
        self.tracker.begin()
    }

    /// Run `f` while recording reads.
    ///
    /// # Errors
    ///
    /// [`ReactiveError::NoObservableRead`] if `f` read nothing.
    pub fn track<R>(&self, f: impl FnOnce() -> R) -> Result<(R, MergedObservable), ReactiveError> {
        self.tracker.track(f)
    }

    /// Run `f` now and again after every change to what it read.
    ///
    /// # Errors
    ///
    /// [`ReactiveError::NoObservableRead`] if the first run read nothing.
    pub fn watch(&self, f: impl Fn() + 'static) -> Result<Watch, ReactiveError> {
        superstate_reactive::watch(&self.tracker, f)
    }

    /// Like [`watch`](Self::watch), detaching once `stop_when` holds at a
    /// notification.
    ///
    /// # Errors
    ///
    /// [`ReactiveError::NoObservableRead`] if the first run read nothing.
    pub fn watch_until(
        &self,
        f: impl Fn() + 'static,
        stop_when: impl Fn() -> bool + 'static,
    ) -> Result<Watch, ReactiveError> {
        superstate_reactive::watch_until(&self.tracker, f, stop_when)
    }

    // ---- Registry ----

    pub fn activate(&self, config: ActivateConfig) {
        self.registry.activate(config);
    }

    pub fn deactivate(&self) {
        self.registry.deactivate();
    }

    /// Activate now and deactivate when the returned guard drops.
    pub fn scope(&self, config: ActivateConfig) -> AppScope {
        AppScope::new(self.clone(), config)
    }

    /// Register `object` under its type name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotActivated`] outside an active scope.
    pub fn create<T: Injectable>(&self, object: Rc<T>) -> Result<(), RegistryError> {
        self.registry.create(short_type_name::<T>(), object)
    }

    /// Get-or-create under the type name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotActivated`] if absent and outside an active scope.
    pub fn init<T: Injectable>(&self, object: Rc<T>) -> Result<Rc<T>, RegistryError> {
        self.registry.init(short_type_name::<T>(), object)
    }

    /// Like [`init`](Self::init), building the object only when absent.
    ///
    /// # Errors
    ///
    /// Same as [`init`](Self::init).
    pub fn init_with<T: Injectable>(
        &self,
        make: impl FnOnce() -> Rc<T>,
    ) -> Result<Rc<T>, RegistryError> {
        self.registry.init_with(short_type_name::<T>(), make)
    }

    /// Fetch by type name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if nothing is registered for `T`.
    pub fn of<T: Injectable>(&self) -> Result<Rc<T>, RegistryError> {
        self.registry.of(short_type_name::<T>())
    }

    /// Force-delete the entry for `T`.
    pub fn delete<T: Injectable>(&self) -> bool {
        self.registry.delete(short_type_name::<T>(), true)
    }

    /// Delete a named entry, honouring auto-dispose.
    pub fn delete_key(&self, key: &str) -> bool {
        self.registry.delete(key, false)
    }

    pub fn delete_all(&self) {
        self.registry.delete_all();
    }

    /// Get-or-create `controller`, enable it, and disable it when the
    /// returned binding drops.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotActivated`] if absent and outside an active scope.
    pub fn use_controller<T>(&self, controller: Rc<T>) -> Result<ControllerBinding<T>, RegistryError>
    where
        T: Controller + Injectable,
    {
        let controller = self.init(controller)?;
        Ok(ControllerBinding::mount(controller, self.registry.clone()))
    }

    // ---- Frames ----

    /// Run deferred `on_alive` hooks. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        self.registry.run_frame()
    }
}
