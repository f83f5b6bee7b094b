//! Form-level aggregate of model controllers.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::aggregate::ParentAggregate;
use crate::controller::ModelController;
use crate::dirty::DirtyState;
use crate::result::{FieldError, ValidationResult};

#[derive(Default)]
struct FormState {
    controls: Vec<ModelController>,
    /// Failing controls per error key
    errors: BTreeMap<String, Vec<ModelController>>,
    dirty: DirtyState,
}

/// Aggregates validity and dirtiness of the controls registered with it.
///
/// A form is valid when no error key has a failing control, and dirty as
/// soon as any control has been edited. Controls hold a weak reference back
/// to the form, so the form is shared through an `Rc`.
///
/// # Example
///
/// ```
/// use bindery::{FormController, LocalAccessor, ModelConfig, ModelController};
///
/// let form = FormController::new("signup");
/// let email = ModelController::new(ModelConfig::new("email"), LocalAccessor::new());
/// form.add_control(&email);
///
/// email.set_validity("REQUIRED", false);
/// assert!(form.is_invalid());
/// assert_eq!(form.error_count("REQUIRED"), 1);
///
/// email.destroy();
/// assert!(form.is_valid());
/// ```
pub struct FormController {
    name: String,
    state: RefCell<FormState>,
}

impl FormController {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            state: RefCell::new(FormState::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `control` with this form and make the form its parent.
    ///
    /// Errors the control already has, and its dirtiness, are taken over.
    pub fn add_control(self: &Rc<Self>, control: &ModelController) {
        let parent = Rc::downgrade(self);
        control.set_parent(parent);

        let mut state = self.state.borrow_mut();
        state.controls.push(control.clone());
        for key in control.error_keys() {
            let failing = state.errors.entry(key).or_default();
            if !failing.iter().any(|c| c.ptr_eq(control)) {
                failing.push(control.clone());
            }
        }
        if control.is_dirty() {
            state.dirty.mark_dirty();
        }
        debug!("form '{}': added control '{}'", self.name, control.name());
    }

    /// The first control registered under `name`.
    pub fn control(&self, name: &str) -> Option<ModelController> {
        self.state
            .borrow()
            .controls
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    pub fn controls(&self) -> Vec<ModelController> {
        self.state.borrow().controls.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.state.borrow().errors.is_empty()
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn is_pristine(&self) -> bool {
        self.state.borrow().dirty.is_pristine()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().dirty.is_dirty()
    }

    /// Number of controls currently failing `key`.
    pub fn error_count(&self, key: &str) -> usize {
        self.state
            .borrow()
            .errors
            .get(key)
            .map_or(0, Vec::len)
    }

    /// Error keys failing on at least one control.
    pub fn error_keys(&self) -> Vec<String> {
        self.state.borrow().errors.keys().cloned().collect()
    }

    /// Controls currently failing `key`.
    pub fn failing_controls(&self, key: &str) -> Vec<ModelController> {
        self.state
            .borrow()
            .errors
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of every failing `(control, key)` pair, in control order.
    pub fn validation_result(&self) -> ValidationResult {
        let state = self.state.borrow();
        let errors: Vec<FieldError> = state
            .controls
            .iter()
            .flat_map(|control| {
                control.error_keys().into_iter().map(|key| FieldError {
                    control_name: control.name().to_string(),
                    error_key: key,
                })
            })
            .collect();

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    /// Reset the form and every registered control to pristine.
    pub fn set_pristine(&self) {
        let controls = {
            let mut state = self.state.borrow_mut();
            state.dirty.reset();
            state.controls.clone()
        };
        for control in controls {
            control.set_pristine();
        }
    }
}

impl ParentAggregate for FormController {
    fn set_validity(&self, key: &str, is_valid: bool, source: &ModelController) {
        let mut state = self.state.borrow_mut();
        if is_valid {
            if let Some(failing) = state.errors.get_mut(key) {
                failing.retain(|c| !c.ptr_eq(source));
                if failing.is_empty() {
                    state.errors.remove(key);
                }
            }
        } else {
            let failing = state.errors.entry(key.to_string()).or_default();
            if !failing.iter().any(|c| c.ptr_eq(source)) {
                failing.push(source.clone());
            }
        }
        debug!(
            "form '{}': {} on '{}' -> {} failing",
            self.name,
            key,
            source.name(),
            state.errors.get(key).map_or(0, Vec::len)
        );
    }

    fn set_dirty(&self) {
        if self.state.borrow_mut().dirty.mark_dirty() {
            debug!("form '{}': pristine -> dirty", self.name);
        }
    }

    fn remove_control(&self, control: &ModelController) {
        let mut state = self.state.borrow_mut();
        state.controls.retain(|c| !c.ptr_eq(control));
        state.errors.retain(|_, failing| {
            failing.retain(|c| !c.ptr_eq(control));
            !failing.is_empty()
        });
        debug!("form '{}': removed control '{}'", self.name, control.name());
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FormController")
            .field("name", &self.name)
            .field("controls", &state.controls.len())
            .field("errors", &state.errors.keys().collect::<Vec<_>>())
            .field("dirty", &state.dirty)
            .finish()
    }
}
