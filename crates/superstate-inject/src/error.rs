use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(
        "the registry is not active: activate it (or open an AppScope) \
         before creating dependencies"
    )]
    NotActivated,

    #[error(
        "failed to retrieve {key} dependency; \
         call init with an instance for {key} instead"
    )]
    NotFound { key: String },

    #[error("dependency {key} is stored as {found}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl RegistryError {
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
