//! Input-type bindings.
//!
//! An [`InputBinding`] joins three things: a [`Field`] (what the user sees),
//! a [`ModelController`] (the two-way binding) and the [`Scope`] that owns the
//! model. Each constructor installs the stages and render callback for one
//! input type, then registers the controller with the scope's change
//! detection. Hosts forward view events through [`InputBinding::dispatch`].

use bindery::{
    BindError, DeferQueue, ModelController, Scope, UpdateTrigger, Value, WatchId, is_empty_value,
};
use log::{debug, warn};

use crate::error::InputError;
use crate::field::{Field, FieldEvent};
use crate::options::{CheckboxOptions, ListOptions, NumberOptions, TextOptions};
use crate::patterns::{EMAIL_REGEXP, NUMBER_REGEXP, URL_REGEXP};
use crate::validators::{self, EMAIL, MAX, MIN, NUMBER, URL};

/// The kind of input a binding drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Textarea,
    Number,
    Email,
    Url,
    List,
    Checkbox,
    Radio,
}

impl InputKind {
    fn is_text_like(self) -> bool {
        !matches!(self, InputKind::Checkbox | InputKind::Radio)
    }
}

/// Everything needed to move the field's state into the controller.
#[derive(Clone)]
struct Intake {
    kind: InputKind,
    trim: bool,
    scope: Scope,
    field: Field,
    ctrl: ModelController,
}

impl Intake {
    fn commit(&self) -> Result<(), BindError> {
        let value = match self.kind {
            InputKind::Checkbox => Value::Bool(self.field.checked()),
            InputKind::Radio => {
                if !self.field.checked() {
                    return Ok(());
                }
                Value::from(self.field.value())
            }
            _ => {
                let text = self.field.value();
                let text = if self.trim { text.trim().to_string() } else { text };
                let value = Value::from(text);
                if self.ctrl.view_value().as_ref() == Some(&value) {
                    return Ok(());
                }
                value
            }
        };
        self.scope.apply(|| self.ctrl.set_view_value(value))
    }
}

/// A widget attached to a model controller.
pub struct InputBinding {
    intake: Intake,
    defer: DeferQueue,
    watches: Vec<WatchId>,
}

impl InputBinding {
    /// Bind a single-line text input.
    pub fn text(
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: TextOptions,
    ) -> Result<Self, InputError> {
        Self::text_like(InputKind::Text, scope, field, ctrl, options)
    }

    /// Bind a multi-line text input. Behaves like [`text`](Self::text).
    pub fn textarea(
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: TextOptions,
    ) -> Result<Self, InputError> {
        Self::text_like(InputKind::Textarea, scope, field, ctrl, options)
    }

    /// Bind an email input: text plus an `EMAIL` check.
    pub fn email(
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: TextOptions,
    ) -> Result<Self, InputError> {
        Self::text_with_check(InputKind::Email, scope, field, ctrl, options, |ctrl| {
            validators::install(ctrl, EMAIL, |v| EMAIL_REGEXP.is_match(&v.to_string()));
        })
    }

    /// Bind a url input: text plus a `URL` check.
    pub fn url(
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: TextOptions,
    ) -> Result<Self, InputError> {
        Self::text_with_check(InputKind::Url, scope, field, ctrl, options, |ctrl| {
            validators::install(ctrl, URL, |v| URL_REGEXP.is_match(&v.to_string()));
        })
    }

    /// Bind a number input.
    ///
    /// Numeric text parses to a number and an empty field to null. Anything
    /// else raises `NUMBER`. `MIN` and `MAX` are checked against the parsed
    /// number, and the model is displayed as plain text.
    pub fn number(
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: NumberOptions,
    ) -> Result<Self, InputError> {
        render_text(field, ctrl);
        validators::install_validation(scope, ctrl, &options.validation)?;

        ctrl.add_parser(parse_number);
        ctrl.add_formatter(|_, value| {
            Some(match value {
                Some(v) if !is_empty_value(Some(&v)) => Value::from(v.to_string()),
                _ => Value::from(""),
            })
        });
        if let Some(min) = options.min {
            validators::install(ctrl, MIN, move |v| as_number(v).is_none_or(|n| n >= min));
        }
        if let Some(max) = options.max {
            validators::install(ctrl, MAX, move |v| as_number(v).is_none_or(|n| n <= max));
        }

        let required = validators::install_required(scope, ctrl, &options.validation.required)?;
        Ok(Self::attach(InputKind::Number, scope, field, ctrl, true, required))
    }

    /// Bind a checkbox.
    ///
    /// The model holds `true_value` or `false_value`; the view is the checked
    /// flag, set only when the model equals `true_value`.
    pub fn checkbox(
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: CheckboxOptions,
    ) -> Result<Self, InputError> {
        let display = field.clone();
        ctrl.set_render(move |ctrl| {
            display.set_checked(ctrl.view_value() == Some(Value::Bool(true)));
        });

        let CheckboxOptions {
            true_value,
            false_value,
            required,
        } = options;
        let checked_value = true_value.clone();
        ctrl.add_formatter(move |_, value| {
            Some(Value::Bool(value.as_ref() == Some(&checked_value)))
        });
        ctrl.add_parser(move |_, value| {
            Some(if value == Value::Bool(true) {
                true_value.clone()
            } else {
                false_value.clone()
            })
        });

        let required = validators::install_required(scope, ctrl, &required)?;
        Ok(Self::attach(InputKind::Checkbox, scope, field, ctrl, false, required))
    }

    /// Bind one radio button of a group.
    ///
    /// The field's value is the option this button stands for. Every button
    /// of a group gets its own controller bound to the same model path.
    pub fn radio(scope: &Scope, field: &Field, ctrl: &ModelController) -> Result<Self, InputError> {
        let display = field.clone();
        ctrl.set_render(move |ctrl| {
            let option = display.value();
            let selected = ctrl.view_value().is_some_and(|v| v.to_string() == option);
            display.set_checked(selected);
        });
        Ok(Self::attach(InputKind::Radio, scope, field, ctrl, false, None))
    }

    /// Bind a text input holding a separated list.
    ///
    /// The text is split on the separator, items are trimmed and empty ones
    /// dropped. A list model is displayed joined with `", "`.
    pub fn list(
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: ListOptions,
    ) -> Result<Self, InputError> {
        let ListOptions { separator, text } = options;
        let separator = if separator.is_empty() {
            ",".to_string()
        } else {
            separator
        };

        render_text(field, ctrl);
        validators::install_validation(scope, ctrl, &text.validation)?;

        ctrl.add_parser(move |_, value| {
            let items = value
                .to_string()
                .split(separator.as_str())
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Value::from)
                .collect();
            Some(Value::List(items))
        });
        ctrl.add_formatter(|_, value| {
            let joined = value?
                .as_list()?
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Some(Value::from(joined))
        });

        let required = validators::install_required(scope, ctrl, &text.validation.required)?;
        Ok(Self::attach(InputKind::List, scope, field, ctrl, text.trim, required))
    }

    fn text_like(
        kind: InputKind,
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: TextOptions,
    ) -> Result<Self, InputError> {
        Self::text_with_check(kind, scope, field, ctrl, options, |_| {})
    }

    fn text_with_check(
        kind: InputKind,
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        options: TextOptions,
        install_check: impl FnOnce(&ModelController),
    ) -> Result<Self, InputError> {
        render_text(field, ctrl);
        validators::install_validation(scope, ctrl, &options.validation)?;
        install_check(ctrl);
        let required = validators::install_required(scope, ctrl, &options.validation.required)?;
        Ok(Self::attach(kind, scope, field, ctrl, options.trim, required))
    }

    fn attach(
        kind: InputKind,
        scope: &Scope,
        field: &Field,
        ctrl: &ModelController,
        trim: bool,
        required: Option<WatchId>,
    ) -> Self {
        let mut watches: Vec<WatchId> = required.into_iter().collect();
        watches.push(scope.watch_model(ctrl));
        debug!("{}: attached {:?} input to {}", ctrl.name(), kind, field.id());
        Self {
            intake: Intake {
                kind,
                trim,
                scope: scope.clone(),
                field: field.clone(),
                ctrl: ctrl.clone(),
            },
            defer: DeferQueue::new(),
            watches,
        }
    }

    /// Share the host's defer queue for instant-update key handling.
    pub fn with_defer_queue(mut self, queue: DeferQueue) -> Self {
        self.defer = queue;
        self
    }

    pub fn kind(&self) -> InputKind {
        self.intake.kind
    }

    pub fn field(&self) -> &Field {
        &self.intake.field
    }

    pub fn controller(&self) -> &ModelController {
        &self.intake.ctrl
    }

    pub fn defer_queue(&self) -> &DeferQueue {
        &self.defer
    }

    fn is_instant(&self) -> bool {
        self.intake.ctrl.config().update_on == UpdateTrigger::Instant
    }

    /// Handle a view event.
    ///
    /// Text-like inputs commit on `Blur`, and with an instant trigger also on
    /// `Change` and `Input`, plus on `KeyDown` once the defer queue is
    /// flushed. A `Click` toggles a checkbox or selects a radio button and
    /// commits. Text is only committed when it differs from the view value.
    pub fn dispatch(&self, event: FieldEvent) -> Result<(), BindError> {
        let kind = self.intake.kind;
        match event {
            FieldEvent::Click if kind == InputKind::Checkbox => {
                self.intake.field.toggle();
                self.intake.commit()
            }
            FieldEvent::Click if kind == InputKind::Radio => {
                self.intake.field.set_checked(true);
                self.intake.commit()
            }
            _ if !kind.is_text_like() => Ok(()),
            FieldEvent::Blur => self.intake.commit(),
            FieldEvent::Change | FieldEvent::Input if self.is_instant() => self.intake.commit(),
            FieldEvent::KeyDown if self.is_instant() => {
                let intake = self.intake.clone();
                self.defer.defer(move || {
                    if let Err(err) = intake.commit() {
                        warn!("{}: deferred commit failed: {}", intake.ctrl.name(), err);
                    }
                });
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Detach the controller from its form and stop watching the model.
    ///
    /// After this the field is no longer rendered on digests. Calling it
    /// again is a no-op.
    pub fn destroy(&self) {
        self.intake.ctrl.destroy();
        for id in &self.watches {
            self.intake.scope.unwatch(*id);
        }
    }
}

impl std::fmt::Debug for InputBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBinding")
            .field("kind", &self.intake.kind)
            .field("field", &self.intake.field.id())
            .field("controller", &self.intake.ctrl.name())
            .finish()
    }
}

/// Display the view value as text, blank when empty.
fn render_text(field: &Field, ctrl: &ModelController) {
    let display = field.clone();
    ctrl.set_render(move |ctrl| {
        let text = match ctrl.view_value() {
            Some(v) if !is_empty_value(Some(&v)) => v.to_string(),
            _ => String::new(),
        };
        display.set_value(text);
    });
}

fn parse_number(ctrl: &ModelController, value: Value) -> Option<Value> {
    if is_empty_value(Some(&value)) {
        ctrl.set_validity(NUMBER, true);
        if value.as_str() == Some("") {
            return Some(Value::Null);
        }
        return Some(value);
    }
    let text = value.to_string();
    // The pattern admits a lone sign and point, which do not parse.
    let parsed = NUMBER_REGEXP
        .is_match(&text)
        .then(|| text.trim().parse::<f64>().ok())
        .flatten();
    ctrl.set_validity(NUMBER, parsed.is_some());
    parsed.map(Value::Number)
}

fn as_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use bindery::{LocalAccessor, ModelConfig};

    use super::*;

    #[test]
    fn test_parse_number() {
        let ctrl = ModelController::new(ModelConfig::new("n"), LocalAccessor::new());
        assert_eq!(parse_number(&ctrl, Value::from("")), Some(Value::Null));
        assert_eq!(parse_number(&ctrl, Value::from(" 12.5 ")), Some(Value::from(12.5)));
        assert!(ctrl.is_valid());

        assert_eq!(parse_number(&ctrl, Value::from("12x")), None);
        assert!(ctrl.has_error(NUMBER));
    }

    #[test]
    fn test_parse_number_rejects_lone_point() {
        let ctrl = ModelController::new(ModelConfig::new("n"), LocalAccessor::new());
        for text in [".", "+.", "-."] {
            assert_eq!(parse_number(&ctrl, Value::from(text)), None);
            assert!(ctrl.has_error(NUMBER));
        }
        assert_eq!(parse_number(&ctrl, Value::from("-.5")), Some(Value::from(-0.5)));
        assert!(ctrl.is_valid());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&Value::from(3)), Some(3.0));
        assert_eq!(as_number(&Value::from(" 4 ")), Some(4.0));
        assert_eq!(as_number(&Value::from(true)), None);
    }
}
