use superstate_inject::RegistryError;
use superstate_reactive::ReactiveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Either half of the runtime failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Reactive(#[from] ReactiveError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl Error {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry(e) if e.is_not_found())
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Reactive(e) if e.is_disposed())
    }
}
