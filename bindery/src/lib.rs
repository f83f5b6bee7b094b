//! Two-way binding between form input views and application models.
//!
//! The centre of the crate is [`ModelController`], which sits between a
//! widget's raw view value and a location in the application model:
//!
//! - `view -> model`: [`ModelController::set_view_value`] runs the parser
//!   pipeline and writes the result through a [`ModelAccessor`].
//! - `model -> view`: [`ModelController::model_changed`] runs the formatter
//!   pipeline and asks the widget to re-render when the display changes.
//!
//! Validity is tracked as named error keys and, together with dirtiness,
//! propagated on edges to an optional [`FormController`]. A [`Scope`]
//! provides a ready-made model store with dirty-checking change detection.

pub mod accessor;
pub mod aggregate;
pub mod config;
pub mod controller;
pub mod defer;
pub mod dirty;
pub mod error;
pub mod form;
pub mod listeners;
pub mod path;
pub mod pipeline;
pub mod result;
pub mod scope;
pub mod validity;
pub mod value;

pub use accessor::{FnAccessor, LocalAccessor, ModelAccessor};
pub use aggregate::ParentAggregate;
pub use config::{ModelConfig, ScopeConfig, UpdateTrigger};
pub use controller::{ControllerId, ModelController};
pub use defer::DeferQueue;
pub use dirty::DirtyState;
pub use error::BindError;
pub use form::FormController;
pub use listeners::ListenerId;
pub use path::ModelPath;
pub use pipeline::{Pipeline, StageId};
pub use result::{FieldError, ValidationResult};
pub use scope::{Scope, ScopeAccessor, WatchId};
pub use validity::ValidityRegistry;
pub use value::{Value, is_empty_value, same_value};

pub mod prelude {
    pub use crate::accessor::{LocalAccessor, ModelAccessor};
    pub use crate::aggregate::ParentAggregate;
    pub use crate::config::{ModelConfig, ScopeConfig, UpdateTrigger};
    pub use crate::controller::ModelController;
    pub use crate::defer::DeferQueue;
    pub use crate::error::BindError;
    pub use crate::form::FormController;
    pub use crate::result::ValidationResult;
    pub use crate::scope::Scope;
    pub use crate::value::Value;
}
