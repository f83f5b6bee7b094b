//! Tests for checkbox and radio inputs.

use bindery::{ModelConfig, ModelController, Scope, Value};
use bindery_inputs::validators::REQUIRED;
use bindery_inputs::{CheckboxOptions, Field, FieldEvent, InputBinding};

fn controller(scope: &Scope, path: &str) -> ModelController {
    let accessor = scope.accessor(path).expect("accessor");
    ModelController::new(ModelConfig::new(path), accessor)
}

fn checkbox(scope: &Scope, options: CheckboxOptions) -> InputBinding {
    let ctrl = controller(scope, "checkbox");
    InputBinding::checkbox(scope, &Field::new(), &ctrl, options).expect("bind")
}

fn radio(scope: &Scope, option: &str) -> InputBinding {
    let ctrl = controller(scope, "color");
    InputBinding::radio(scope, &Field::with_value(option), &ctrl).expect("bind")
}

#[test]
fn test_checkbox_formats_and_parses() {
    let scope = Scope::new();
    let input = checkbox(&scope, CheckboxOptions::new());

    scope.apply(|| scope.set("checkbox", true)).expect("apply");
    assert!(input.field().checked());

    scope.apply(|| scope.set("checkbox", false)).expect("apply");
    assert!(!input.field().checked());

    input.dispatch(FieldEvent::Click).expect("dispatch");
    assert!(input.field().checked());
    assert_eq!(scope.get("checkbox").expect("get"), Some(Value::from(true)));

    input.dispatch(FieldEvent::Click).expect("dispatch");
    assert_eq!(scope.get("checkbox").expect("get"), Some(Value::from(false)));
}

#[test]
fn test_checkbox_custom_values() {
    let scope = Scope::new();
    scope.set("checkbox", "y").expect("set");
    let input = checkbox(&scope, CheckboxOptions::new().values("y", "n"));

    scope.digest().expect("digest");
    assert!(input.field().checked());

    input.dispatch(FieldEvent::Click).expect("dispatch");
    assert!(!input.field().checked());
    assert_eq!(scope.get("checkbox").expect("get"), Some(Value::from("n")));

    scope.apply(|| scope.set("checkbox", "y")).expect("apply");
    assert!(input.field().checked());
}

#[test]
fn test_checkbox_unknown_model_is_unchecked() {
    let scope = Scope::new();
    scope.set("checkbox", "maybe").expect("set");
    let input = checkbox(&scope, CheckboxOptions::new().values("y", "n"));

    input.field().set_checked(true);
    scope.digest().expect("digest");
    assert!(!input.field().checked());
}

#[test]
fn test_required_checkbox() {
    let scope = Scope::new();
    let input = checkbox(&scope, CheckboxOptions::new().required());
    scope.digest().expect("digest");
    assert!(input.controller().has_error(REQUIRED));

    input.dispatch(FieldEvent::Click).expect("dispatch");
    assert!(input.controller().is_valid());
    assert_eq!(scope.get("checkbox").expect("get"), Some(Value::from(true)));

    input.dispatch(FieldEvent::Click).expect("dispatch");
    assert!(input.controller().has_error(REQUIRED));
    assert_eq!(scope.get("checkbox").expect("get"), Some(Value::from(true)));
}

#[test]
fn test_checkbox_ignores_text_events() {
    let scope = Scope::new();
    let input = checkbox(&scope, CheckboxOptions::new());

    input.dispatch(FieldEvent::Blur).expect("dispatch");
    assert!(input.controller().is_pristine());
    assert_eq!(scope.get("checkbox").expect("get"), None);
}

#[test]
fn test_radio_group() {
    let scope = Scope::new();
    scope.set("color", "red").expect("set");
    let red = radio(&scope, "red");
    let blue = radio(&scope, "blue");

    scope.digest().expect("digest");
    assert!(red.field().checked());
    assert!(!blue.field().checked());

    blue.dispatch(FieldEvent::Click).expect("dispatch");
    assert_eq!(scope.get("color").expect("get"), Some(Value::from("blue")));
    assert!(!red.field().checked());
    assert!(blue.field().checked());
}

#[test]
fn test_radio_model_change() {
    let scope = Scope::new();
    let red = radio(&scope, "red");
    let blue = radio(&scope, "blue");
    scope.digest().expect("digest");
    assert!(!red.field().checked());
    assert!(!blue.field().checked());

    scope.apply(|| scope.set("color", "blue")).expect("apply");
    assert!(!red.field().checked());
    assert!(blue.field().checked());
}

#[test]
fn test_radio_number_model_matches_text_option() {
    let scope = Scope::new();
    scope.set("color", 2).expect("set");
    let two = radio(&scope, "2");

    scope.digest().expect("digest");
    assert!(two.field().checked());
}
