//! Ordered transform chains applied on each direction of data flow.
//!
//! A [`Pipeline`] is a plain ordered list of stages. The controller owns two
//! of them:
//!
//! - **parsers** (`view -> model`) run in registration order, each stage
//!   consuming the previous stage's output. A stage that returns `None`
//!   (undefined) ends the run and the whole parse yields `None`.
//! - **formatters** (`model -> view`) run in *reverse* registration order,
//!   so the most recently registered formatter sees the model value first.
//!   Every stage runs, and stages may receive or produce `None`.
//!
//! Stages are read from a fresh snapshot on every run. Widgets may register
//! stages after the controller exists, and a stage may even register another
//! stage while a run is in progress; the new stage takes effect next run.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

use crate::controller::ModelController;
use crate::value::Value;

/// A `view -> model` stage.
pub type ParserFn = dyn Fn(&ModelController, Value) -> Option<Value>;

/// A `model -> view` stage.
pub type FormatterFn = dyn Fn(&ModelController, Option<Value>) -> Option<Value>;

/// Handle identifying a registered stage, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageId(usize);

impl StageId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__stage_{}", self.0)
    }
}

/// An externally mutable, ordered list of stages.
pub struct Pipeline<S: ?Sized> {
    stages: RefCell<Vec<(StageId, Rc<S>)>>,
}

impl<S: ?Sized> Pipeline<S> {
    pub fn new() -> Self {
        Self {
            stages: RefCell::new(Vec::new()),
        }
    }

    /// Append a stage at the end of the registration order.
    pub fn push(&self, stage: Rc<S>) -> StageId {
        let id = StageId::new();
        self.stages.borrow_mut().push((id, stage));
        id
    }

    /// Insert a stage at the start of the registration order.
    pub fn push_front(&self, stage: Rc<S>) -> StageId {
        let id = StageId::new();
        self.stages.borrow_mut().insert(0, (id, stage));
        id
    }

    /// Unregister a stage. Returns `false` if it was not registered.
    pub fn remove(&self, id: StageId) -> bool {
        let mut stages = self.stages.borrow_mut();
        let before = stages.len();
        stages.retain(|(stage_id, _)| *stage_id != id);
        stages.len() != before
    }

    pub fn clear(&self) {
        self.stages.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.stages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.borrow().is_empty()
    }

    /// Current stages in registration order.
    pub fn snapshot(&self) -> Vec<Rc<S>> {
        self.stages
            .borrow()
            .iter()
            .map(|(_, stage)| Rc::clone(stage))
            .collect()
    }
}

impl<S: ?Sized> Default for Pipeline<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.len())
            .finish()
    }
}

impl Pipeline<ParserFn> {
    /// Run the parsers left to right, seeded with `raw`.
    pub fn parse(&self, ctrl: &ModelController, raw: Value) -> Option<Value> {
        let mut value = raw;
        for (index, stage) in self.snapshot().into_iter().enumerate() {
            match stage(ctrl, value) {
                Some(next) => value = next,
                None => {
                    trace!("{}: parser {} rejected the view value", ctrl.name(), index);
                    return None;
                }
            }
        }
        Some(value)
    }
}

impl Pipeline<FormatterFn> {
    /// Run the formatters right to left, seeded with `value`.
    pub fn format(&self, ctrl: &ModelController, value: Option<Value>) -> Option<Value> {
        self.snapshot()
            .iter()
            .rev()
            .fold(value, |acc, stage| stage(ctrl, acc))
    }
}
