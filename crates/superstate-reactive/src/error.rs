use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReactiveError>;

/// Failures raised by observables and the read tracker.
///
/// Every variant is returned synchronously at the call site; nothing in this
/// crate retries or recovers internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactiveError {
    #[error(
        "the {type_name} object was accessed or utilized after being disposed; \
         once dispose() is called on a {type_name} object, it becomes unusable"
    )]
    DisposedAccess { type_name: &'static str },

    #[error(
        "couldn't find any observable: a tracked evaluation must read the value \
         of at least one observable, i.e. a ValueCell or DerivedCell"
    )]
    NoObservableRead,

    #[error("cannot set the value of a MergedObservable")]
    UnsettableComposite,
}

impl ReactiveError {
    #[must_use]
    pub fn disposed(type_name: &'static str) -> Self {
        Self::DisposedAccess { type_name }
    }

    /// Whether this is a [`DisposedAccess`](ReactiveError::DisposedAccess).
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::DisposedAccess { .. })
    }
}
