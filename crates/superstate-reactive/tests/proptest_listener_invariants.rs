//! Property-based invariant tests for cell notification.
//!
//! These must hold for any write sequence and listener layout:
//!
//! 1. A write notifies iff its textual form differs from the current one.
//! 2. Each listener fires once per effective write, in insertion order,
//!    duplicates included.
//! 3. Removing a listener drops exactly one of its occurrences.
//! 4. After dispose, no listener ever fires again.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use superstate_reactive::{Listener, Observable, ValueCell, textual};

// ── Helpers ─────────────────────────────────────────────────────────────

fn recording_listeners(
    layout: &[usize],
    log: &Rc<RefCell<Vec<usize>>>,
) -> (Vec<Listener>, Vec<Listener>) {
    let distinct: Vec<Listener> = (0..=layout.iter().copied().max().unwrap_or(0))
        .map(|id| {
            let log = Rc::clone(log);
            Listener::new(move || log.borrow_mut().push(id))
        })
        .collect();
    let ordered = layout.iter().map(|&id| distinct[id].clone()).collect();
    (distinct, ordered)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Notification happens exactly on textual change
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn notifies_iff_textually_different(writes in proptest::collection::vec(0i8..4, 1..40)) {
        let cell = ValueCell::detached(0i8);
        let fired = Rc::new(RefCell::new(0usize));
        let f = Rc::clone(&fired);
        cell.add_listener(Listener::new(move || *f.borrow_mut() += 1));

        let mut expected = 0usize;
        let mut current = 0i8;
        for w in writes {
            if textual(&w) != textual(&current) {
                expected += 1;
                current = w;
            }
            cell.set(w).unwrap();
        }
        prop_assert_eq!(*fired.borrow(), expected);
        prop_assert_eq!(cell.peek(), current);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Insertion order with duplicates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fires_in_insertion_order(layout in proptest::collection::vec(0usize..5, 1..12)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (_, ordered) = recording_listeners(&layout, &log);
        let cell = ValueCell::detached(0u8);
        for l in &ordered {
            cell.add_listener(l.clone());
        }

        cell.set(1).unwrap();
        prop_assert_eq!(&*log.borrow(), &layout);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Removal drops one occurrence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn removal_drops_first_occurrence(
        layout in proptest::collection::vec(0usize..4, 1..12),
        victim in 0usize..4,
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (distinct, ordered) = recording_listeners(&layout, &log);
        let cell = ValueCell::detached(0u8);
        for l in &ordered {
            cell.add_listener(l.clone());
        }

        let mut expected = layout.clone();
        if let Some(target) = distinct.get(victim) {
            cell.remove_listener(target).unwrap();
            if let Some(pos) = expected.iter().position(|&id| id == victim) {
                expected.remove(pos);
            }
        }

        cell.set(1).unwrap();
        prop_assert_eq!(&*log.borrow(), &expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Dispose silences everything
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn disposed_cells_never_notify(
        layout in proptest::collection::vec(0usize..4, 0..8),
        writes in proptest::collection::vec(1u8..10, 1..10),
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (_, ordered) = recording_listeners(&layout, &log);
        let cell = ValueCell::detached(0u8);
        for l in &ordered {
            cell.add_listener(l.clone());
        }
        cell.dispose();
        for l in &ordered {
            cell.add_listener(l.clone());
        }

        for w in writes {
            let result = cell.set(w);
            prop_assert!(result.is_err_and(|e| e.is_disposed()));
        }
        prop_assert!(log.borrow().is_empty());
    }
}
