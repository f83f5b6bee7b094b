//! The contract between a controller and the form that contains it.

use crate::controller::ModelController;

/// A form-level aggregate that child controllers report into.
///
/// Controllers hold only a weak reference to their aggregate and call it on
/// edges: `set_validity` once per actual transition of an error key,
/// `set_dirty` once per pristine-to-dirty transition.
pub trait ParentAggregate {
    /// A child's error `key` became failing (`is_valid == false`) or passing.
    fn set_validity(&self, key: &str, is_valid: bool, source: &ModelController);

    /// A child went from pristine to dirty.
    fn set_dirty(&self);

    /// A child is being destroyed; forget everything it contributed.
    fn remove_control(&self, control: &ModelController);
}
