#![forbid(unsafe_code)]

//! Singleton registry and controller lifecycle.
//!
//! - [`Registry`]: named-singleton store with an explicit
//!   activate/deactivate scope, test-mode mock substitution, and cascading
//!   teardown of controllers and observables.
//! - [`Controller`]: enabled/disabled lifecycle with overridable hooks,
//!   driven by the registry.
//! - [`FrameScheduler`]: the next-frame queue that runs `on_alive` hooks.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use superstate_inject::{ActivateConfig, Injectable, Registry};
//!
//! struct Settings {
//!     volume: u8,
//! }
//! impl Injectable for Settings {}
//!
//! let registry = Registry::new();
//! registry.activate(ActivateConfig::default());
//!
//! let settings = registry.init("Settings", Rc::new(Settings { volume: 3 })).unwrap();
//! let again = registry.of::<Settings>("Settings").unwrap();
//! assert!(Rc::ptr_eq(&settings, &again));
//! assert_eq!(again.volume, 3);
//!
//! registry.deactivate();
//! assert!(registry.of::<Settings>("Settings").is_err());
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod instance;
pub mod registry;

pub use config::ActivateConfig;
pub use controller::{Controller, Lifecycle};
pub use error::{RegistryError, Result};
pub use frame::{FrameHandle, FrameScheduler};
pub use instance::{Injectable, Instance, Mock};
pub use registry::Registry;
