//! Validator stages registered on a controller's pipelines.
//!
//! Every validator is installed on both pipelines: as a parser it checks the
//! user's input, as a formatter it checks values arriving from the model.
//! A passing check returns the value unchanged; a failing one raises its
//! error key and yields undefined. Empty values pass every check except
//! [`REQUIRED`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery::{
    ModelAccessor, ModelController, Scope, ScopeAccessor, Value, WatchId, is_empty_value,
};
use log::{debug, warn};
use regex::Regex;

use crate::error::InputError;
use crate::options::{PatternSource, Required, Validation};

pub const REQUIRED: &str = "REQUIRED";
pub const PATTERN: &str = "PATTERN";
pub const MINLENGTH: &str = "MINLENGTH";
pub const MAXLENGTH: &str = "MAXLENGTH";
pub const NUMBER: &str = "NUMBER";
pub const MIN: &str = "MIN";
pub const MAX: &str = "MAX";
pub const EMAIL: &str = "EMAIL";
pub const URL: &str = "URL";

type Check = dyn Fn(&Value) -> bool;

fn run_check(ctrl: &ModelController, key: &str, check: &Check, value: Option<Value>) -> Option<Value> {
    let is_valid = match &value {
        Some(v) if !is_empty_value(Some(v)) => check(v),
        _ => true,
    };
    ctrl.set_validity(key, is_valid);
    if is_valid { value } else { None }
}

/// Install a check on both pipelines under `key`.
pub fn install(ctrl: &ModelController, key: &'static str, check: impl Fn(&Value) -> bool + 'static) {
    let check: Rc<Check> = Rc::new(check);
    let for_parser = Rc::clone(&check);
    ctrl.add_parser(move |ctrl, value| run_check(ctrl, key, &*for_parser, Some(value)));
    ctrl.add_formatter(move |ctrl, value| run_check(ctrl, key, &*check, value));
}

/// Install the validators described by `validation`.
///
/// `PATTERN`, `MINLENGTH` and `MAXLENGTH` are appended to the pipelines.
/// `REQUIRED` is not; call [`install_required`] once the widget's own stages
/// are in place so it runs first in both directions.
pub fn install_validation(
    scope: &Scope,
    ctrl: &ModelController,
    validation: &Validation,
) -> Result<(), InputError> {
    if let Some(source) = &validation.pattern {
        install_pattern(scope, ctrl, source)?;
    }
    if let Some(min) = validation.min_length {
        install(ctrl, MINLENGTH, move |v| length(v) >= min);
    }
    if let Some(max) = validation.max_length {
        install(ctrl, MAXLENGTH, move |v| length(v) <= max);
    }
    Ok(())
}

fn length(value: &Value) -> usize {
    value
        .len()
        .unwrap_or_else(|| value.to_string().chars().count())
}

// =============================================================================
// Pattern
// =============================================================================

/// Install a `PATTERN` check.
///
/// A literal expression is compiled now. A scope-bound expression is read on
/// every check and recompiled only when it changes; a missing or malformed
/// one fails the check and logs a warning.
pub fn install_pattern(
    scope: &Scope,
    ctrl: &ModelController,
    source: &PatternSource,
) -> Result<(), InputError> {
    match source {
        PatternSource::Literal(pattern) => {
            let regex = Regex::new(pattern).map_err(|source| InputError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            install(ctrl, PATTERN, move |v| regex.is_match(&v.to_string()));
        }
        PatternSource::Scope(path) => {
            let pattern = ScopePattern {
                accessor: scope.accessor(path)?,
                compiled: RefCell::new(None),
            };
            install(ctrl, PATTERN, move |v| pattern.is_match(&v.to_string()));
        }
    }
    Ok(())
}

struct ScopePattern {
    accessor: ScopeAccessor,
    /// Last compiled expression and its source
    compiled: RefCell<Option<(String, Regex)>>,
}

impl ScopePattern {
    fn is_match(&self, text: &str) -> bool {
        let Some(Value::String(source)) = self.accessor.get() else {
            warn!(
                "pattern at '{}' is not a string; treating '{}' as invalid",
                self.accessor.path(),
                text
            );
            return false;
        };

        let mut compiled = self.compiled.borrow_mut();
        if compiled.as_ref().is_none_or(|(cached, _)| *cached != source) {
            match Regex::new(&source) {
                Ok(regex) => *compiled = Some((source, regex)),
                Err(err) => {
                    warn!("pattern at '{}' does not compile: {}", self.accessor.path(), err);
                    *compiled = None;
                    return false;
                }
            }
        }
        compiled.as_ref().is_some_and(|(_, regex)| regex.is_match(text))
    }
}

// =============================================================================
// Required
// =============================================================================

/// Whether a scope value switches a flag on.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => *n != 0.0 && !n.is_nan(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::List(_)) | Some(Value::Map(_)) => true,
    }
}

fn check_required(ctrl: &ModelController, required: bool, value: Option<Value>) -> Option<Value> {
    let missing = is_empty_value(value.as_ref()) || value == Some(Value::Bool(false));
    if required && missing {
        ctrl.set_validity(REQUIRED, false);
        None
    } else {
        ctrl.set_validity(REQUIRED, true);
        value
    }
}

/// Install the `REQUIRED` check so it runs before every other stage.
///
/// With [`Required::Scope`] the flag follows the scope value, and every flip
/// re-validates the current view value. The returned watcher must be removed
/// from `scope` when the control goes away.
pub fn install_required(
    scope: &Scope,
    ctrl: &ModelController,
    required: &Required,
) -> Result<Option<WatchId>, InputError> {
    let flag = Rc::new(Cell::new(false));
    let watch = match required {
        Required::Off => return Ok(None),
        Required::On => {
            flag.set(true);
            None
        }
        Required::Scope(path) => {
            let (flag, ctrl) = (Rc::clone(&flag), ctrl.clone());
            let id = scope.watch_value(path, move |value| {
                flag.set(is_truthy(value.as_ref()));
                debug!("{}: required is now {}", ctrl.name(), flag.get());
                check_required(&ctrl, flag.get(), ctrl.view_value());
            })?;
            Some(id)
        }
    };

    let for_parser = Rc::clone(&flag);
    ctrl.parsers().push_front(Rc::new(move |ctrl: &ModelController, value: Value| {
        check_required(ctrl, for_parser.get(), Some(value))
    }));
    ctrl.add_formatter(move |ctrl, value| check_required(ctrl, flag.get(), value));
    Ok(watch)
}

#[cfg(test)]
mod tests {
    use bindery::{LocalAccessor, ModelConfig};

    use super::*;

    fn controller() -> ModelController {
        ModelController::new(ModelConfig::new("field"), LocalAccessor::new())
    }

    #[test]
    fn test_empty_passes_checks() {
        let ctrl = controller();
        install(&ctrl, MINLENGTH, |v| length(v) >= 3);

        ctrl.set_view_value("").expect("set view value");
        assert!(ctrl.is_valid());

        ctrl.set_view_value("ab").expect("set view value");
        assert!(ctrl.has_error(MINLENGTH));
    }

    #[test]
    fn test_required_rejects_false() {
        let ctrl = controller();
        install_required(&Scope::new(), &ctrl, &Required::On).expect("install");

        ctrl.set_view_value(false).expect("set view value");
        assert!(ctrl.has_error(REQUIRED));

        ctrl.set_view_value(true).expect("set view value");
        assert!(ctrl.is_valid());
    }

    #[test]
    fn test_length_counts_chars() {
        assert_eq!(length(&Value::from("żółw")), 4);
        assert_eq!(length(&Value::from(vec!["a", "b"])), 2);
        assert_eq!(length(&Value::from(12345)), 5);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&Value::from(false))));
        assert!(!is_truthy(Some(&Value::from(0))));
        assert!(!is_truthy(Some(&Value::from(""))));
        assert!(is_truthy(Some(&Value::from("yes"))));
        assert!(is_truthy(Some(&Value::from(true))));
    }

    #[test]
    fn test_invalid_literal_pattern() {
        let err = install_pattern(
            &Scope::new(),
            &controller(),
            &PatternSource::Literal("(".to_string()),
        )
        .expect_err("should fail");
        assert!(matches!(err, InputError::InvalidPattern { .. }));
    }
}
