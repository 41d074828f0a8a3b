#![forbid(unsafe_code)]

//! superstate public facade crate.
//!
//! Reactive state cells with implicit read tracking, paired with a
//! singleton registry whose lifetime follows the application's
//! mount/unmount cycle. Most applications only need the [`prelude`].
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use superstate::prelude::*;
//!
//! struct Cart {
//!     items: ValueCell<Vec<&'static str>>,
//! }
//! impl Injectable for Cart {}
//!
//! let rt = Runtime::new();
//! let _app = rt.scope(ActivateConfig::default());
//!
//! let cart = rt.init(Rc::new(Cart { items: rt.cell(vec![]) })).unwrap();
//!
//! // Render once while tracking, then re-render on change.
//! let (count, reads) = rt.track(|| cart.items.with(Vec::len)).unwrap();
//! assert_eq!(count, 0);
//! let renders = Rc::new(Cell::new(0));
//! let r = Rc::clone(&renders);
//! let _sub = reads.subscribe(move || r.set(r.get() + 1));
//!
//! cart.items
//!     .update(|items| {
//!         let mut next = items.clone();
//!         next.push("tea");
//!         next
//!     })
//!     .unwrap();
//! assert_eq!(renders.get(), 1);
//! ```

pub mod binding;
pub mod error;
pub mod model;
pub mod runtime;
pub mod scope;

pub use binding::ControllerBinding;
pub use error::{Error, Result};
pub use model::Model;
pub use runtime::Runtime;
pub use scope::AppScope;

pub use superstate_inject as inject;
pub use superstate_reactive as reactive;

pub mod prelude {
    pub use crate::{AppScope, ControllerBinding, Model, Runtime};
    pub use superstate_inject::{
        ActivateConfig, Controller, Injectable, Lifecycle, Mock, Registry, RegistryError,
    };
    pub use superstate_reactive::{
        DerivedCell, MergedObservable, Observable, ReactiveError, Subscription, ValueCell, Watch,
    };
}
