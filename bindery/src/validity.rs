//! Named validation-error keys and the aggregate validity derived from them.

use std::collections::BTreeSet;

/// The set of error keys that are currently failing for one control.
///
/// Each key is an independent flag. The registry reports whether a call
/// actually changed a flag so callers can propagate edges, not levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidityRegistry {
    errors: BTreeSet<String>,
}

impl ValidityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as failing. Returns `true` if it was not failing before.
    pub fn raise(&mut self, key: &str) -> bool {
        if self.errors.contains(key) {
            return false;
        }
        self.errors.insert(key.to_string())
    }

    /// Mark `key` as passing. Returns `true` if it was failing before.
    pub fn clear(&mut self, key: &str) -> bool {
        self.errors.remove(key)
    }

    /// Apply a validity result for `key`. Returns `true` on a state change.
    pub fn set(&mut self, key: &str, is_valid: bool) -> bool {
        if is_valid {
            self.clear(key)
        } else {
            self.raise(key)
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.errors.contains(key)
    }

    /// `true` when no key is failing.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Failing keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
