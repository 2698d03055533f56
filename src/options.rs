//! Loader configuration

use serde::Deserialize;

/// How duplicate `(source, target)` pairs are detected during validation.
///
/// Both strategies accept and reject the same edge lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateCheck {
    /// Parallel-sort a copy of the edge keys and scan adjacent pairs
    #[default]
    ParallelSort,
    /// Single pass over a hash set of edge keys
    HashSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Check edge invariants after loading
    pub validate: bool,
    pub duplicate_check: DuplicateCheck,
}

impl Default for LoadOptions {
    /// Validation is on in debug builds and off in release builds
    fn default() -> Self {
        Self {
            validate: cfg!(debug_assertions),
            duplicate_check: DuplicateCheck::default(),
        }
    }
}

impl LoadOptions {
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_duplicate_check(mut self, duplicate_check: DuplicateCheck) -> Self {
        self.duplicate_check = duplicate_check;
        self
    }
}
