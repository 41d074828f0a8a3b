//! End-to-end registry scenarios: activation, lookup, mocks, teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use superstate_inject::{
    ActivateConfig, Controller, Injectable, Lifecycle, Mock, Registry, RegistryError,
};
use superstate_reactive::{Listener, Observable, ReactiveError, Tracker, ValueCell};

// ── Fixtures ────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Profile {
    name: &'static str,
}
impl Injectable for Profile {}

/// Records every hook call into a shared journal.
struct Dashboard {
    lifecycle: Lifecycle,
    journal: Rc<RefCell<Vec<String>>>,
}

impl Dashboard {
    fn new(journal: &Rc<RefCell<Vec<String>>>) -> Rc<Self> {
        Rc::new(Self {
            lifecycle: Lifecycle::new(),
            journal: Rc::clone(journal),
        })
    }
}

impl Controller for Dashboard {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
    fn on_enable(&self) {
        self.journal.borrow_mut().push("enable".into());
    }
    fn on_alive(&self) {
        self.journal.borrow_mut().push("alive".into());
    }
    fn on_disable(&self, registry: &Registry) {
        self.journal.borrow_mut().push("disable".into());
        registry.delete(self.name(), false);
    }
}

impl Injectable for Dashboard {
    fn controller(self: Rc<Self>) -> Option<Rc<dyn Controller>> {
        Some(self)
    }
}

fn journal() -> Rc<RefCell<Vec<String>>> {
    Rc::new(RefCell::new(Vec::new()))
}

// ═════════════════════════════════════════════════════════════════════════
// Scenario A: create, fetch, delete
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_a_create_of_delete() {
    let registry = Registry::new();
    registry.activate(
        ActivateConfig::default()
            .with_test_mode(false)
            .with_auto_dispose(true),
    );

    let profile = Rc::new(Profile { name: "ada" });
    registry.create("A", Rc::clone(&profile)).unwrap();
    let got = registry.of::<Profile>("A").unwrap();
    assert!(Rc::ptr_eq(&profile, &got));
    assert_eq!(got.name, "ada");

    registry.delete("A", false);
    assert_eq!(
        registry.of::<Profile>("A").unwrap_err(),
        RegistryError::not_found("A")
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Scenario B: test mode substitutes the mock
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_b_mock_substitution() {
    let registry = Registry::new();
    let mock = Rc::new(Profile { name: "mock" });
    registry.activate(
        ActivateConfig::default()
            .with_test_mode(true)
            .with_mocks([Mock::new(Rc::clone(&mock))]),
    );

    registry.create("B", Rc::new(Profile { name: "real" })).unwrap();
    let got = registry.of::<Profile>("B").unwrap();
    assert!(Rc::ptr_eq(&mock, &got));
    assert_eq!(got.name, "mock");
}

#[test]
fn mock_controller_is_enabled_instead_of_real_one() {
    let log = journal();
    let registry = Registry::new();
    let mock = Dashboard::new(&log);
    registry.activate(
        ActivateConfig::default()
            .with_test_mode(true)
            .with_mock(Rc::clone(&mock)),
    );

    let real = Dashboard::new(&journal());
    let got = registry.init("Dashboard", Rc::clone(&real)).unwrap();
    assert!(Rc::ptr_eq(&got, &mock));
    assert!(mock.is_alive());
    assert!(!real.is_alive());
}

// ═════════════════════════════════════════════════════════════════════════
// Scenario E: auto-dispose off
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_e_unforced_delete_is_skipped() {
    let registry = Registry::new();
    registry.activate(ActivateConfig::default().with_auto_dispose(false));
    registry.create("k", Rc::new(Profile { name: "kept" })).unwrap();

    registry.delete("k", false);
    assert!(registry.contains("k"));

    registry.delete("k", true);
    assert!(!registry.contains("k"));
}

#[test]
fn auto_dispose_off_keeps_controllers_enabled_across_unforced_deletes() {
    let log = journal();
    let registry = Registry::new();
    registry.activate(ActivateConfig::default().with_auto_dispose(false));
    let dash = registry.init("Dashboard", Dashboard::new(&log)).unwrap();

    registry.delete("Dashboard", false);
    assert!(dash.is_alive());
    assert_eq!(*log.borrow(), vec!["enable"]);
}

// ═════════════════════════════════════════════════════════════════════════
// Missing keys and lifecycle
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn deleting_missing_keys_never_fails() {
    let registry = Registry::new();
    registry.delete("missing", false);
    registry.activate(ActivateConfig::default());
    registry.delete("missing", false);
    registry.delete("missing", true);
    assert!(registry.is_empty());
}

#[test]
fn controller_full_lifecycle_through_registry() {
    let log = journal();
    let registry = Registry::new();
    registry.activate(ActivateConfig::default());

    let dash = registry.init("Dashboard", Dashboard::new(&log)).unwrap();
    registry.of::<Dashboard>("Dashboard").unwrap();
    assert_eq!(*log.borrow(), vec!["enable"]);

    assert_eq!(registry.run_frame(), 1);
    assert_eq!(*log.borrow(), vec!["enable", "alive"]);

    registry.delete("Dashboard", false);
    assert!(!dash.is_alive());
    assert!(!registry.contains("Dashboard"));
    assert_eq!(*log.borrow(), vec!["enable", "alive", "disable"]);
}

#[test]
fn disable_before_first_frame_cancels_on_alive() {
    let log = journal();
    let registry = Registry::new();
    registry.activate(ActivateConfig::default());

    registry.init("Dashboard", Dashboard::new(&log)).unwrap();
    registry.delete("Dashboard", false);
    assert_eq!(registry.run_frame(), 0);
    assert_eq!(*log.borrow(), vec!["enable", "disable"]);
}

#[test]
fn deactivate_tears_down_cells_and_controllers() {
    let log = journal();
    let tracker = Tracker::new();
    let registry = Registry::new();
    registry.activate(ActivateConfig::default());

    let cell = registry
        .init("Clicks", Rc::new(ValueCell::new(&tracker, 0u32)))
        .unwrap();
    let dash = registry.init("Dashboard", Dashboard::new(&log)).unwrap();

    registry.deactivate();
    assert!(!cell.is_alive());
    assert!(!dash.is_alive());
    assert!(cell.set(1).is_err_and(|e| e.is_disposed()));
    assert!(registry.is_empty());
    assert!(!registry.is_scoped());
}

#[test]
fn reactivation_after_deactivate_starts_clean() {
    let registry = Registry::new();
    registry.activate(ActivateConfig::default());
    registry.create("A", Rc::new(Profile { name: "one" })).unwrap();
    registry.deactivate();

    registry.activate(ActivateConfig::default());
    assert!(registry.of::<Profile>("A").unwrap_err().is_not_found());
    let got = registry.init("A", Rc::new(Profile { name: "two" })).unwrap();
    assert_eq!(got.name, "two");
}

// ═════════════════════════════════════════════════════════════════════════
// Objects that are both controller and observable
// ═════════════════════════════════════════════════════════════════════════

/// A controller that also owns observable state.
struct Panel {
    lifecycle: Lifecycle,
    open: Cell<bool>,
    journal: Rc<RefCell<Vec<String>>>,
}

impl Controller for Panel {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
    fn on_disable(&self, _registry: &Registry) {
        self.journal.borrow_mut().push("disable".into());
    }
}

impl Observable for Panel {
    fn is_alive(&self) -> bool {
        self.open.get()
    }
    fn has_listeners(&self) -> bool {
        false
    }
    fn contains_listener(&self, _listener: &Listener) -> bool {
        false
    }
    fn add_listener(&self, _listener: Listener) {}
    fn remove_listener(&self, _listener: &Listener) -> Result<(), ReactiveError> {
        Ok(())
    }
    fn dispose(&self) {
        if !self.open.replace(false) {
            return;
        }
        self.journal.borrow_mut().push("dispose".into());
    }
    fn type_label(&self) -> &'static str {
        "Panel"
    }
    fn describe(&self) -> String {
        "Panel".into()
    }
}

impl Injectable for Panel {
    fn controller(self: Rc<Self>) -> Option<Rc<dyn Controller>> {
        Some(self)
    }
    fn observable(self: Rc<Self>) -> Option<Rc<dyn Observable>> {
        Some(self)
    }
}

#[test]
fn delete_disables_before_disposing() {
    let log = journal();
    let registry = Registry::new();
    registry.activate(ActivateConfig::default());

    let panel = registry
        .init(
            "Panel",
            Rc::new(Panel {
                lifecycle: Lifecycle::new(),
                open: Cell::new(true),
                journal: Rc::clone(&log),
            }),
        )
        .unwrap();
    assert!(Controller::is_alive(&*panel));

    assert!(registry.delete("Panel", true));
    assert_eq!(*log.borrow(), vec!["disable", "dispose"]);
    assert!(!Controller::is_alive(&*panel));
    assert!(!Observable::is_alive(&*panel));
    assert!(!registry.contains("Panel"));
}
