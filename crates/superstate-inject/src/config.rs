#![forbid(unsafe_code)]

//! Registry activation options.

use std::env;
use std::rc::Rc;

use crate::instance::{Injectable, Mock};

/// Options passed to [`Registry::activate`](crate::Registry::activate).
#[derive(Debug, Clone)]
pub struct ActivateConfig {
    /// Substitute configured mocks on `create`.
    pub test_mode: bool,
    /// When false, unforced deletes leave their entries in place.
    pub auto_dispose: bool,
    /// Candidate test doubles, in priority order. An empty list keeps the
    /// mocks from a previous activation.
    pub mocks: Vec<Mock>,
}

impl Default for ActivateConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            auto_dispose: true,
            mocks: Vec::new(),
        }
    }
}

impl ActivateConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `SUPERSTATE_TEST_MODE` and
    /// `SUPERSTATE_AUTO_DISPOSE`.
    ///
    /// Both accept `1`/`true`/`0`/`false` in any case. Anything else is
    /// ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(val) = lookup("SUPERSTATE_TEST_MODE")
            && let Some(enabled) = parse_flag(&val)
        {
            config.test_mode = enabled;
        }
        if let Some(val) = lookup("SUPERSTATE_AUTO_DISPOSE")
            && let Some(enabled) = parse_flag(&val)
        {
            config.auto_dispose = enabled;
        }
        config
    }

    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    #[must_use]
    pub fn with_auto_dispose(mut self, auto_dispose: bool) -> Self {
        self.auto_dispose = auto_dispose;
        self
    }

    /// Append one test double.
    #[must_use]
    pub fn with_mock<T: Injectable>(mut self, mock: Rc<T>) -> Self {
        self.mocks.push(Mock::new(mock));
        self
    }

    #[must_use]
    pub fn with_mocks(mut self, mocks: impl IntoIterator<Item = Mock>) -> Self {
        self.mocks.extend(mocks);
        self
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    let val = val.trim();
    if val == "1" || val.eq_ignore_ascii_case("true") {
        Some(true)
    } else if val == "0" || val.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
