//! A shared model store with dirty-checking change detection.
//!
//! A [`Scope`] owns a JSON-like root map. Controllers bind to locations in it
//! through [`ScopeAccessor`]s, and [`Scope::digest`] drives the model -> view
//! flow: every registered watcher compares the current model against what it
//! last saw and reacts to differences, repeating until nothing changes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, trace, warn};

use crate::accessor::ModelAccessor;
use crate::config::ScopeConfig;
use crate::controller::ModelController;
use crate::error::BindError;
use crate::path::ModelPath;
use crate::value::{Value, same_value};

/// Handle identifying a registered watcher, for [`Scope::unwatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(usize);

impl WatchId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

trait Watcher {
    /// Run one check. Returns `true` if the watcher saw a change.
    fn check(&self, scope: &Scope) -> bool;
}

/// Feeds model changes into a controller.
struct ModelWatcher {
    ctrl: ModelController,
    primed: Cell<bool>,
}

impl Watcher for ModelWatcher {
    fn check(&self, _scope: &Scope) -> bool {
        let current = self.ctrl.read_model();
        if self.primed.get() && same_value(current.as_ref(), self.ctrl.model_value().as_ref()) {
            return false;
        }
        self.primed.set(true);
        self.ctrl.model_changed(current);
        true
    }
}

/// Calls a listener whenever the value at a path changes.
struct ValueWatcher {
    path: ModelPath,
    last: RefCell<Option<Option<Value>>>,
    listener: Box<dyn Fn(Option<Value>)>,
}

impl Watcher for ValueWatcher {
    fn check(&self, scope: &Scope) -> bool {
        let current = scope.get_path(&self.path);
        let unchanged = self
            .last
            .borrow()
            .as_ref()
            .is_some_and(|last| same_value(last.as_ref(), current.as_ref()));
        if unchanged {
            return false;
        }
        *self.last.borrow_mut() = Some(current.clone());
        (self.listener)(current);
        true
    }
}

struct ScopeInner {
    config: ScopeConfig,
    root: RefCell<Value>,
    watchers: RefCell<Vec<(WatchId, Rc<dyn Watcher>)>>,
}

/// Shared model root plus the watchers that observe it.
///
/// `Scope` is a cheap handle; clones share the same model and watchers.
///
/// # Example
///
/// ```
/// use bindery::{ModelConfig, ModelController, Scope, Value};
///
/// let scope = Scope::new();
/// let ctrl = ModelController::new(ModelConfig::new("name"), scope.accessor("user.name")?);
/// scope.watch_model(&ctrl);
///
/// scope.apply(|| scope.set("user.name", "misko"))?;
/// assert_eq!(ctrl.view_value(), Some(Value::from("misko")));
/// # Ok::<(), bindery::BindError>(())
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

impl Scope {
    pub fn new() -> Self {
        Self::with_config(ScopeConfig::default())
    }

    pub fn with_config(config: ScopeConfig) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                config,
                root: RefCell::new(Value::empty_map()),
                watchers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.inner.config
    }

    /// Read the value at `path`. Missing locations read as `None`.
    pub fn get(&self, path: &str) -> Result<Option<Value>, BindError> {
        let path = ModelPath::parse(path)?;
        Ok(self.get_path(&path))
    }

    /// Write `value` at `path`, creating intermediate maps as needed.
    ///
    /// This does not run change detection; use [`apply`](Self::apply).
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<Value, BindError> {
        let path = ModelPath::parse(path)?;
        self.set_path(&path, value.into())
    }

    pub fn get_path(&self, path: &ModelPath) -> Option<Value> {
        path.resolve(&self.inner.root.borrow()).cloned()
    }

    pub fn set_path(&self, path: &ModelPath, value: Value) -> Result<Value, BindError> {
        path.assign(&mut self.inner.root.borrow_mut(), value.clone())?;
        Ok(value)
    }

    /// Snapshot of the whole model.
    pub fn root(&self) -> Value {
        self.inner.root.borrow().clone()
    }

    /// Build an accessor for `path`. The path is parsed now, so a malformed
    /// expression fails here rather than on first use.
    pub fn accessor(&self, path: &str) -> Result<ScopeAccessor, BindError> {
        Ok(ScopeAccessor {
            scope: Rc::downgrade(&self.inner),
            path: ModelPath::parse(path)?,
        })
    }

    /// Feed changes of `ctrl`'s bound model into [`ModelController::model_changed`].
    ///
    /// The first digest always formats the current model value. After that
    /// the controller is only told when the model differs from its own
    /// `model_value`, so values the controller wrote itself do not bounce
    /// back into the view. NaN counts as equal to NaN.
    pub fn watch_model(&self, ctrl: &ModelController) -> WatchId {
        self.add_watcher(Rc::new(ModelWatcher {
            ctrl: ctrl.clone(),
            primed: Cell::new(false),
        }))
    }

    /// Call `listener` on the next digest and whenever the value at `path`
    /// changes afterwards.
    pub fn watch_value(
        &self,
        path: &str,
        listener: impl Fn(Option<Value>) + 'static,
    ) -> Result<WatchId, BindError> {
        let path = ModelPath::parse(path)?;
        Ok(self.add_watcher(Rc::new(ValueWatcher {
            path,
            last: RefCell::new(None),
            listener: Box::new(listener),
        })))
    }

    fn add_watcher(&self, watcher: Rc<dyn Watcher>) -> WatchId {
        let id = WatchId::new();
        self.inner.watchers.borrow_mut().push((id, watcher));
        id
    }

    /// Remove a watcher. Returns `false` if it was already gone.
    ///
    /// A watcher removed while a digest is running still finishes the
    /// current pass.
    pub fn unwatch(&self, id: WatchId) -> bool {
        let mut watchers = self.inner.watchers.borrow_mut();
        let before = watchers.len();
        watchers.retain(|(watch_id, _)| *watch_id != id);
        let removed = watchers.len() != before;
        if removed {
            debug!("scope: removed watcher {:?}", id);
        }
        removed
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.borrow().len()
    }

    /// Run watchers until a full pass sees no change.
    pub fn digest(&self) -> Result<(), BindError> {
        let ttl = self.inner.config.digest_ttl;
        for pass in 1..=ttl {
            let watchers: Vec<_> = self
                .inner
                .watchers
                .borrow()
                .iter()
                .map(|(_, watcher)| Rc::clone(watcher))
                .collect();
            let mut changed = false;
            for watcher in watchers {
                changed |= watcher.check(self);
            }
            if !changed {
                trace!("digest settled after {} pass(es)", pass);
                return Ok(());
            }
        }
        warn!("digest did not settle after {} passes", ttl);
        Err(BindError::DigestLimit { ttl })
    }

    /// Run `f`, then digest, even if `f` failed. An error from `f` wins.
    pub fn apply<T>(&self, f: impl FnOnce() -> Result<T, BindError>) -> Result<T, BindError> {
        let result = f();
        let digested = self.digest();
        let value = result?;
        digested?;
        Ok(value)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("root", &self.inner.root.borrow())
            .field("watchers", &self.watcher_count())
            .finish()
    }
}

/// Accessor for one path inside a [`Scope`].
///
/// Holds the scope weakly, so binding a controller does not keep the model
/// alive.
#[derive(Clone)]
pub struct ScopeAccessor {
    scope: Weak<ScopeInner>,
    path: ModelPath,
}

impl ScopeAccessor {
    pub fn path(&self) -> &ModelPath {
        &self.path
    }

    fn scope(&self) -> Option<Scope> {
        self.scope.upgrade().map(|inner| Scope { inner })
    }
}

impl ModelAccessor for ScopeAccessor {
    fn get(&self) -> Option<Value> {
        self.scope()?.get_path(&self.path)
    }

    fn set(&self, value: Value) -> Result<Value, BindError> {
        let scope = self
            .scope()
            .ok_or_else(|| BindError::ScopeDropped(self.path.to_string()))?;
        scope.set_path(&self.path, value)
    }
}

impl fmt::Debug for ScopeAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeAccessor")
            .field("path", &self.path.as_str())
            .finish()
    }
}
