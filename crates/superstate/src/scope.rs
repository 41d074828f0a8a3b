#![forbid(unsafe_code)]

//! Application mount/unmount as a guard.

use superstate_inject::ActivateConfig;

use crate::runtime::Runtime;

/// Keeps the registry active for as long as it lives.
///
/// Created by [`Runtime::scope`]. Dropping it deactivates the registry,
/// which tears down every entry and resets all options.
#[must_use = "dropping an AppScope deactivates the registry immediately"]
#[derive(Debug)]
pub struct AppScope {
    runtime: Runtime,
}

impl AppScope {
    pub(crate) fn new(runtime: Runtime, config: ActivateConfig) -> Self {
        runtime.activate(config);
        tracing::debug!(message = "app.mount");
        Self { runtime }
    }

    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

impl Drop for AppScope {
    fn drop(&mut self) {
        self.runtime.deactivate();
        tracing::debug!(message = "app.unmount");
    }
}
