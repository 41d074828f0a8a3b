#![forbid(unsafe_code)]

//! Type-erased registry entries.
//!
//! # Design
//!
//! The registry stores heterogeneous objects behind one [`Instance`] type.
//! Each entry keeps three views of the same allocation:
//!
//! - an `Rc<dyn Any>` for typed retrieval,
//! - an optional `Rc<dyn Controller>` when the object has a lifecycle,
//! - an optional `Rc<dyn Observable>` when the object must be disposed on
//!   removal.
//!
//! Which views exist is decided once, when the instance is built, by the
//! object's [`Injectable`] implementation. Plain state holders implement the
//! trait with an empty body.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use superstate_reactive::{DerivedCell, MergedObservable, Observable, ValueCell, short_type_name};

use crate::controller::Controller;
use crate::error::{RegistryError, Result};

/// Objects that can be stored in a [`Registry`](crate::Registry).
///
/// Override [`controller`](Injectable::controller) to opt into enable/disable
/// handling and [`observable`](Injectable::observable) to be disposed when
/// the entry is deleted.
///
/// ```
/// use std::rc::Rc;
/// use superstate_inject::{Injectable, Instance};
///
/// struct Settings {
///     dark: bool,
/// }
///
/// impl Injectable for Settings {}
///
/// let entry = Instance::new(Rc::new(Settings { dark: true }));
/// assert_eq!(entry.type_name(), "Settings");
/// assert!(entry.controller().is_none());
/// ```
pub trait Injectable: Any {
    /// Lifecycle view of this object, if it has one.
    fn controller(self: Rc<Self>) -> Option<Rc<dyn Controller>> {
        None
    }

    /// Observable view of this object, if it has one.
    fn observable(self: Rc<Self>) -> Option<Rc<dyn Observable>> {
        None
    }
}

impl<T: fmt::Debug + 'static> Injectable for ValueCell<T> {
    fn observable(self: Rc<Self>) -> Option<Rc<dyn Observable>> {
        Some(self)
    }
}

impl<T: fmt::Debug + 'static> Injectable for DerivedCell<T> {
    fn observable(self: Rc<Self>) -> Option<Rc<dyn Observable>> {
        Some(self)
    }
}

impl Injectable for MergedObservable {
    fn observable(self: Rc<Self>) -> Option<Rc<dyn Observable>> {
        Some(self)
    }
}

/// A stored object with its capability views resolved.
#[derive(Clone)]
pub struct Instance {
    any: Rc<dyn Any>,
    controller: Option<Rc<dyn Controller>>,
    observable: Option<Rc<dyn Observable>>,
    type_name: &'static str,
}

impl Instance {
    pub fn new<T: Injectable>(object: Rc<T>) -> Self {
        Self {
            controller: Injectable::controller(Rc::clone(&object)),
            observable: Injectable::observable(Rc::clone(&object)),
            type_name: short_type_name::<T>(),
            any: object,
        }
    }

    /// Unqualified name of the stored type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the stored object is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.any.is::<T>()
    }

    /// Typed handle to the stored object.
    ///
    /// # Errors
    ///
    /// [`RegistryError::TypeMismatch`] if the stored object is not a `T`.
    pub fn downcast<T: Any>(&self, key: &str) -> Result<Rc<T>> {
        Rc::clone(&self.any)
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.to_owned(),
                expected: short_type_name::<T>(),
                found: self.type_name,
            })
    }

    #[must_use]
    pub fn controller(&self) -> Option<&Rc<dyn Controller>> {
        self.controller.as_ref()
    }

    #[must_use]
    pub fn observable(&self) -> Option<&Rc<dyn Observable>> {
        self.observable.as_ref()
    }

    /// Whether both instances wrap the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.any, &other.any)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name)
            .field("controller", &self.controller.is_some())
            .field("observable", &self.observable.is_some())
            .finish()
    }
}

/// A test double offered to the registry through
/// [`ActivateConfig::with_mock`](crate::ActivateConfig::with_mock).
///
/// In test mode, `create` stores the first mock whose concrete type matches
/// the object being registered instead of the object itself.
#[derive(Clone, Debug)]
pub struct Mock(Instance);

impl Mock {
    pub fn new<T: Injectable>(object: Rc<T>) -> Self {
        Self(Instance::new(object))
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Whether this mock can stand in for a `T`.
    #[must_use]
    pub fn fits<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub(crate) fn instance(&self) -> &Instance {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
