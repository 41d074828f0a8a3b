#![forbid(unsafe_code)]

//! Textual value equality for plain data types.
//!
//! A [`Model`] lists the properties that identify it. Two models are equal
//! when their `Name(prop,prop,..)` strings are equal, which is the same rule
//! cells use to decide whether a write is a change. Implementing `Debug`
//! through [`Model::fmt_model`] makes a model stored in a cell skip writes
//! of equal models.

use std::fmt;

use superstate_reactive::short_type_name;

pub trait Model {
    /// Properties that take part in equality, in order.
    fn props(&self) -> Vec<&dyn fmt::Debug>;

    fn model_name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// `Name(prop,prop,..)`.
    fn model_string(&self) -> String {
        let props: Vec<String> = self.props().iter().map(|p| format!("{p:?}")).collect();
        format!("{}({})", self.model_name(), props.join(","))
    }

    fn model_eq(&self, other: &dyn Model) -> bool {
        self.model_string() == other.model_string()
    }

    /// Write [`model_string`](Model::model_string); use it as the body of
    /// a `Debug` impl.
    fn fmt_model(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.model_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use superstate_reactive::ValueCell;

    struct User {
        id: u32,
        name: String,
        cached_at: u64,
    }

    impl Model for User {
        fn props(&self) -> Vec<&dyn fmt::Debug> {
            vec![&self.id, &self.name]
        }
    }

    impl fmt::Debug for User {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.fmt_model(f)
        }
    }

    struct Team {
        id: u32,
    }

    impl Model for Team {
        fn props(&self) -> Vec<&dyn fmt::Debug> {
            vec![&self.id]
        }
    }

    fn user(id: u32, name: &str, cached_at: u64) -> User {
        User {
            id,
            name: name.to_owned(),
            cached_at,
        }
    }

    #[test]
    fn string_form() {
        assert_eq!(user(1, "ada", 0).model_string(), "User(1,\"ada\")");
        assert_eq!(Team { id: 4 }.model_string(), "Team(4)");
    }

    #[test]
    fn unlisted_fields_do_not_matter() {
        let a = user(1, "ada", 10);
        let b = user(1, "ada", 99);
        assert_ne!(a.cached_at, b.cached_at);
        assert!(a.model_eq(&b));
        assert!(!a.model_eq(&user(2, "ada", 10)));
    }

    #[test]
    fn type_name_takes_part() {
        struct Other {
            id: u32,
        }
        impl Model for Other {
            fn props(&self) -> Vec<&dyn fmt::Debug> {
                vec![&self.id]
            }
        }
        assert!(!Team { id: 1 }.model_eq(&Other { id: 1 }));
    }

    #[test]
    fn equal_models_do_not_notify_cells() {
        let cell = ValueCell::detached(user(1, "ada", 0));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = cell.subscribe(move || h.set(h.get() + 1));

        cell.set(user(1, "ada", 42)).unwrap();
        assert_eq!(hits.get(), 0);
        cell.set(user(1, "bob", 42)).unwrap();
        assert_eq!(hits.get(), 1);
    }

    proptest! {
        #[test]
        fn equality_tracks_props(
            a in (0u32..4, "[ab]{0,2}"),
            b in (0u32..4, "[ab]{0,2}"),
        ) {
            let left = user(a.0, &a.1, 1);
            let right = user(b.0, &b.1, 2);
            prop_assert_eq!(left.model_eq(&right), a == b);
            prop_assert_eq!(left.model_eq(&right), right.model_eq(&left));
        }
    }
}
