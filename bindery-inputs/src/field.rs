//! Widget-side state for a bound form field.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique identifier for a field instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__field_{}", self.0)
    }
}

/// View events a host forwards to an [`InputBinding`](crate::InputBinding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEvent {
    /// The field lost focus.
    Blur,
    /// The field's value was committed by the platform.
    Change,
    /// The field's value changed while typing.
    Input,
    /// A key was pressed; the new text is not in the field yet.
    KeyDown,
    /// The field was clicked (checkbox and radio).
    Click,
}

/// Internal state for a field
#[derive(Debug, Default)]
struct FieldInner {
    /// Current text, or the option value for radio buttons
    value: String,
    /// Checked state for checkbox and radio buttons
    checked: bool,
}

/// The displayed state of one form field.
///
/// A `Field` is what the user sees and edits: a line of text, or a checked
/// flag. Hosts write user edits into it and forward [`FieldEvent`]s to the
/// binding; the binding's render callback writes formatted model values back.
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct Field {
    id: FieldId,
    inner: Rc<RefCell<FieldInner>>,
}

impl Field {
    /// Create an empty, unchecked field
    pub fn new() -> Self {
        Self::with_value(String::new())
    }

    /// Create a field with an initial value (the option value for radios)
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            id: FieldId::new(),
            inner: Rc::new(RefCell::new(FieldInner {
                value: value.into(),
                checked: false,
            })),
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn value(&self) -> String {
        self.inner.borrow().value.clone()
    }

    pub fn checked(&self) -> bool {
        self.inner.borrow().checked
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    pub fn set_value(&self, value: impl Into<String>) {
        self.inner.borrow_mut().value = value.into();
    }

    pub fn set_checked(&self, checked: bool) {
        self.inner.borrow_mut().checked = checked;
    }

    /// Flip the checked state, returning the new state
    pub fn toggle(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        inner.checked = !inner.checked;
        inner.checked
    }

    /// Clear the text value
    pub fn clear(&self) {
        self.set_value(String::new());
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}
