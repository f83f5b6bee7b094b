//! Pristine/dirty tracking.

/// Whether a view has ever been changed interactively.
///
/// The only transition driven by normal flow is `Pristine -> Dirty`.
/// Going back to `Pristine` is an administrative [`reset`](Self::reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirtyState {
    /// Never edited by the user.
    #[default]
    Pristine,
    /// Edited at least once.
    Dirty,
}

impl DirtyState {
    pub fn is_pristine(self) -> bool {
        matches!(self, Self::Pristine)
    }

    pub fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }

    /// Move to `Dirty`. Returns `true` only when this call crossed the edge.
    pub fn mark_dirty(&mut self) -> bool {
        match self {
            Self::Pristine => {
                *self = Self::Dirty;
                true
            }
            Self::Dirty => false,
        }
    }

    /// Return to `Pristine`; the next `mark_dirty` reports an edge again.
    pub fn reset(&mut self) {
        *self = Self::Pristine;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_pristine() {
        let state = DirtyState::default();
        assert!(state.is_pristine());
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_edge_reported_once() {
        let mut state = DirtyState::default();
        assert!(state.mark_dirty());
        assert!(!state.mark_dirty());
        assert!(!state.mark_dirty());
        assert!(state.is_dirty());
    }

    #[test]
    fn test_reset_rearms_edge() {
        let mut state = DirtyState::Dirty;
        state.reset();
        assert!(state.is_pristine());
        assert!(state.mark_dirty());
    }
}
