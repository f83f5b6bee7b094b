//! The model controller: mediates between a view value and a model value.
//!
//! Two flows pass through a controller:
//!
//! - **view -> model** ([`ModelController::set_view_value`]): the widget hands
//!   over raw view state. The controller records it, runs the parsers, writes
//!   a successful result through the accessor, leaves pristine on the first
//!   edit (telling the parent form once), then notifies view-change listeners.
//! - **model -> view** ([`ModelController::model_changed`]): change detection
//!   hands over a new model value. The controller records it, runs the
//!   formatters in reverse, and calls the render callback only if the
//!   displayed value actually changed.
//!
//! Validity is a set of named error keys maintained through
//! [`ModelController::set_validity`], usually by validator stages in the
//! pipelines. Every actual flip of a key is forwarded to the parent form once.
//!
//! The step order within each flow is fixed and observable.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, trace};

use crate::accessor::ModelAccessor;
use crate::aggregate::ParentAggregate;
use crate::config::ModelConfig;
use crate::dirty::DirtyState;
use crate::error::BindError;
use crate::listeners::{ListenerId, ListenerSet};
use crate::pipeline::{FormatterFn, ParserFn, Pipeline, StageId};
use crate::validity::ValidityRegistry;
use crate::value::Value;

/// Render callback installed by the attaching widget.
pub type RenderFn = dyn Fn(&ModelController);

/// Unique identifier for a controller instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(usize);

impl ControllerId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__model_{}", self.0)
    }
}

/// Mutable controller state
#[derive(Debug, Default)]
struct ControllerState {
    /// Last raw view value, or last formatted value
    view_value: Option<Value>,
    /// Last value accepted into the model
    model_value: Option<Value>,
    dirty: DirtyState,
    validity: ValidityRegistry,
}

struct ControllerInner {
    id: ControllerId,
    config: ModelConfig,
    state: RefCell<ControllerState>,
    parsers: Pipeline<ParserFn>,
    formatters: Pipeline<FormatterFn>,
    listeners: ListenerSet,
    render: RefCell<Option<Rc<RenderFn>>>,
    accessor: Rc<dyn ModelAccessor>,
    parent: RefCell<Option<Weak<dyn ParentAggregate>>>,
}

/// Two-way binding controller for one input.
///
/// `ModelController` is a cheap handle; clones refer to the same controller.
/// It is single-threaded: every operation runs to completion synchronously
/// on the caller's turn.
///
/// # Example
///
/// ```
/// use bindery::{LocalAccessor, ModelAccessor, ModelConfig, ModelController, Value};
///
/// let model = LocalAccessor::new();
/// let ctrl = ModelController::new(ModelConfig::new("age"), model.clone());
///
/// ctrl.add_parser(|_, view| view.as_str()?.parse::<f64>().ok().map(Value::from));
///
/// ctrl.set_view_value("42").unwrap();
/// assert_eq!(ctrl.model_value(), Some(Value::from(42)));
/// assert_eq!(model.get(), Some(Value::from(42)));
/// assert!(ctrl.is_dirty());
/// ```
#[derive(Clone)]
pub struct ModelController {
    inner: Rc<ControllerInner>,
}

impl ModelController {
    /// Create a pristine, valid controller bound to `accessor`.
    pub fn new(config: ModelConfig, accessor: impl ModelAccessor + 'static) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                id: ControllerId::new(),
                config,
                state: RefCell::new(ControllerState::default()),
                parsers: Pipeline::new(),
                formatters: Pipeline::new(),
                listeners: ListenerSet::new(),
                render: RefCell::new(None),
                accessor: Rc::new(accessor),
                parent: RefCell::new(None),
            }),
        }
    }

    pub fn id(&self) -> ControllerId {
        self.inner.id
    }

    /// Name under which a parent form records this controller.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn config(&self) -> &ModelConfig {
        &self.inner.config
    }

    /// Whether two handles refer to the same controller.
    pub fn ptr_eq(&self, other: &ModelController) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn view_value(&self) -> Option<Value> {
        self.inner.state.borrow().view_value.clone()
    }

    pub fn model_value(&self) -> Option<Value> {
        self.inner.state.borrow().model_value.clone()
    }

    pub fn is_pristine(&self) -> bool {
        self.inner.state.borrow().dirty.is_pristine()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.state.borrow().dirty.is_dirty()
    }

    pub fn is_valid(&self) -> bool {
        self.inner.state.borrow().validity.is_valid()
    }

    pub fn is_invalid(&self) -> bool {
        self.inner.state.borrow().validity.is_invalid()
    }

    /// Whether the error `key` is currently failing.
    pub fn has_error(&self, key: &str) -> bool {
        self.inner.state.borrow().validity.contains(key)
    }

    /// Currently failing error keys, sorted.
    pub fn error_keys(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .validity
            .keys()
            .map(str::to_string)
            .collect()
    }

    /// Read the bound model location through the accessor.
    pub fn read_model(&self) -> Option<Value> {
        self.inner.accessor.get()
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// The `view -> model` pipeline.
    pub fn parsers(&self) -> &Pipeline<ParserFn> {
        &self.inner.parsers
    }

    /// The `model -> view` pipeline.
    pub fn formatters(&self) -> &Pipeline<FormatterFn> {
        &self.inner.formatters
    }

    /// Append a parser; it runs after every parser registered before it.
    pub fn add_parser<F>(&self, parser: F) -> StageId
    where
        F: Fn(&ModelController, Value) -> Option<Value> + 'static,
    {
        self.inner.parsers.push(Rc::new(parser))
    }

    /// Append a formatter; it runs before every formatter registered before it.
    pub fn add_formatter<F>(&self, formatter: F) -> StageId
    where
        F: Fn(&ModelController, Option<Value>) -> Option<Value> + 'static,
    {
        self.inner.formatters.push(Rc::new(formatter))
    }

    /// Prepend a formatter; it runs after every formatter registered so far.
    pub fn add_formatter_front<F>(&self, formatter: F) -> StageId
    where
        F: Fn(&ModelController, Option<Value>) -> Option<Value> + 'static,
    {
        self.inner.formatters.push_front(Rc::new(formatter))
    }

    /// Register a listener called after every committed view change.
    pub fn on_view_change(&self, listener: impl Fn() + 'static) -> ListenerId {
        self.inner.listeners.add(listener)
    }

    pub fn remove_view_change(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Install the callback that redisplays the view value.
    pub fn set_render(&self, render: impl Fn(&ModelController) + 'static) {
        *self.inner.render.borrow_mut() = Some(Rc::new(render));
    }

    /// Invoke the render callback, if any.
    pub fn render(&self) {
        let render = self.inner.render.borrow().clone();
        if let Some(render) = render {
            render(self);
        }
    }

    // -------------------------------------------------------------------------
    // Parent aggregate
    // -------------------------------------------------------------------------

    /// Attach to a parent aggregate. Only a weak reference is kept.
    pub fn set_parent(&self, parent: Weak<dyn ParentAggregate>) {
        *self.inner.parent.borrow_mut() = Some(parent);
    }

    /// The parent aggregate, if attached and still alive.
    pub fn parent(&self) -> Option<Rc<dyn ParentAggregate>> {
        self.inner
            .parent
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Detach from the parent without notifying it.
    pub fn clear_parent(&self) {
        self.inner.parent.borrow_mut().take();
    }

    /// Deregister from the parent aggregate, removing every error key this
    /// controller contributed. Calling it again is a no-op.
    pub fn destroy(&self) {
        let parent = self.inner.parent.borrow_mut().take();
        if let Some(parent) = parent.as_ref().and_then(Weak::upgrade) {
            debug!("{}: removing from parent", self.name());
            parent.remove_control(self);
        }
    }

    // -------------------------------------------------------------------------
    // View -> model
    // -------------------------------------------------------------------------

    /// Commit a user-originated view value.
    ///
    /// Runs, in order: record the view value, parse, write a successful parse
    /// result to the model, leave pristine (notifying the parent on the edge
    /// only), notify view-change listeners. A parse yielding undefined leaves
    /// the model value untouched but still runs the later steps.
    ///
    /// Errors from the accessor are returned unchanged and end the call.
    pub fn set_view_value(&self, raw: impl Into<Value>) -> Result<(), BindError> {
        let raw = raw.into();
        trace!("{}: set_view_value({:?})", self.name(), raw);
        self.inner.state.borrow_mut().view_value = Some(raw.clone());

        if let Some(candidate) = self.inner.parsers.parse(self, raw) {
            let written = self.inner.accessor.set(candidate)?;
            self.inner.state.borrow_mut().model_value = Some(written);
        }

        let became_dirty = self.inner.state.borrow_mut().dirty.mark_dirty();
        if became_dirty {
            debug!("{}: pristine -> dirty", self.name());
            if let Some(parent) = self.parent() {
                parent.set_dirty();
            }
        }

        self.inner.listeners.notify();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Validity
    // -------------------------------------------------------------------------

    /// Set or clear the error `key`.
    ///
    /// The parent is told only when the key actually flips; repeating the
    /// current state is silent.
    pub fn set_validity(&self, key: &str, is_valid: bool) {
        let changed = self.inner.state.borrow_mut().validity.set(key, is_valid);
        if !changed {
            return;
        }
        debug!(
            "{}: {} is now {}",
            self.name(),
            key,
            if is_valid { "valid" } else { "invalid" }
        );
        if let Some(parent) = self.parent() {
            parent.set_validity(key, is_valid, self);
        }
    }

    // -------------------------------------------------------------------------
    // Model -> view
    // -------------------------------------------------------------------------

    /// Take in a model value changed outside the view.
    ///
    /// Records the model value, formats it through the formatters in reverse
    /// registration order, stores the result as the view value and renders
    /// only if that differs from the previously displayed value. An undefined
    /// result still renders when it clears a displayed value.
    pub fn model_changed(&self, value: Option<Value>) {
        trace!("{}: model_changed({:?})", self.name(), value);
        self.inner.state.borrow_mut().model_value = value.clone();

        let formatted = self.inner.formatters.format(self, value);
        let previous = std::mem::replace(
            &mut self.inner.state.borrow_mut().view_value,
            formatted.clone(),
        );

        if previous != formatted {
            self.render();
        }
    }

    /// Administrative reset to pristine. The next view change is treated as
    /// a fresh first edit and notifies the parent again.
    pub fn set_pristine(&self) {
        self.inner.state.borrow_mut().dirty.reset();
    }
}

impl fmt::Debug for ModelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ModelController")
            .field("id", &self.inner.id)
            .field("name", &self.inner.config.name)
            .field("view_value", &state.view_value)
            .field("model_value", &state.model_value)
            .field("dirty", &state.dirty)
            .field("validity", &state.validity)
            .finish()
    }
}
