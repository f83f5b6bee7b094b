//! Read/write capability over a bound model location.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::BindError;
use crate::value::Value;

/// Two-shaped access to one location in the application model.
///
/// `get` reads the current value (`None` when undefined); `set` writes a new
/// value and returns the value that was actually stored, so callers can
/// round-trip through it.
pub trait ModelAccessor {
    fn get(&self) -> Option<Value>;

    fn set(&self, value: Value) -> Result<Value, BindError>;
}

impl<A: ModelAccessor + ?Sized> ModelAccessor for Rc<A> {
    fn get(&self) -> Option<Value> {
        (**self).get()
    }

    fn set(&self, value: Value) -> Result<Value, BindError> {
        (**self).set(value)
    }
}

/// An accessor over a standalone, shared slot.
///
/// Clones share the same slot, which makes it handy for hosts without a
/// [`Scope`](crate::scope::Scope) and for tests.
#[derive(Debug, Clone, Default)]
pub struct LocalAccessor {
    slot: Rc<RefCell<Option<Value>>>,
}

impl LocalAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(value.into()))),
        }
    }

    /// Overwrite the slot from the model side, bypassing any controller.
    pub fn replace(&self, value: Option<Value>) {
        *self.slot.borrow_mut() = value;
    }
}

impl ModelAccessor for LocalAccessor {
    fn get(&self) -> Option<Value> {
        self.slot.borrow().clone()
    }

    fn set(&self, value: Value) -> Result<Value, BindError> {
        *self.slot.borrow_mut() = Some(value.clone());
        Ok(value)
    }
}

/// An accessor built from a getter and a setter closure.
pub struct FnAccessor<G, S> {
    getter: G,
    setter: S,
}

impl<G, S> FnAccessor<G, S>
where
    G: Fn() -> Option<Value>,
    S: Fn(Value) -> Result<Value, BindError>,
{
    pub fn new(getter: G, setter: S) -> Self {
        Self { getter, setter }
    }
}

impl<G, S> ModelAccessor for FnAccessor<G, S>
where
    G: Fn() -> Option<Value>,
    S: Fn(Value) -> Result<Value, BindError>,
{
    fn get(&self) -> Option<Value> {
        (self.getter)()
    }

    fn set(&self, value: Value) -> Result<Value, BindError> {
        (self.setter)(value)
    }
}

impl<G, S> fmt::Debug for FnAccessor<G, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAccessor").finish_non_exhaustive()
    }
}
