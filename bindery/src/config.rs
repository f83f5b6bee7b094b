//! Controller and scope configuration types.

/// Per-controller configuration.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    /// Key under which a parent form records this controller.
    pub name: String,

    /// Which view events commit the view value.
    pub update_on: UpdateTrigger,
}

impl ModelConfig {
    /// Create a new config with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the update trigger.
    pub fn update_on(mut self, trigger: UpdateTrigger) -> Self {
        self.update_on = trigger;
        self
    }

    /// Commit on every keystroke instead of on blur.
    pub fn instant(mut self) -> Self {
        self.update_on = UpdateTrigger::Instant;
        self
    }
}

/// When a widget commits its raw value into the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateTrigger {
    /// Commit when the field loses focus.
    #[default]
    OnBlur,

    /// Also commit on `change`/`input` events immediately and on `keydown`
    /// through the defer queue, once the keystroke has landed in the field.
    Instant,
}

/// Change-detection configuration for a [`Scope`](crate::scope::Scope).
#[derive(Debug, Clone)]
pub struct ScopeConfig {
    /// Maximum number of dirty watcher passes in one digest.
    pub digest_ttl: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self { digest_ttl: 10 }
    }
}

impl ScopeConfig {
    /// Set the digest iteration limit (at least one pass).
    pub fn digest_ttl(mut self, ttl: usize) -> Self {
        self.digest_ttl = ttl.max(1);
        self
    }
}
