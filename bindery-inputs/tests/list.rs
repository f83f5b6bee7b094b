//! Tests for list inputs.

use bindery::{ModelConfig, ModelController, Scope, Value};
use bindery_inputs::validators::REQUIRED;
use bindery_inputs::{Field, FieldEvent, InputBinding, ListOptions, Validation};

fn list(scope: &Scope, options: ListOptions) -> InputBinding {
    let accessor = scope.accessor("list").expect("accessor");
    let ctrl = ModelController::new(ModelConfig::new("list"), accessor);
    InputBinding::list(scope, &Field::new(), &ctrl, options).expect("bind")
}

fn type_and_blur(input: &InputBinding, text: &str) {
    input.field().set_value(text);
    input.dispatch(FieldEvent::Blur).expect("dispatch");
}

fn model(scope: &Scope) -> Option<Value> {
    scope.get("list").expect("get")
}

#[test]
fn test_parses_separated_text() {
    let scope = Scope::new();
    let input = list(&scope, ListOptions::new());

    type_and_blur(&input, "a, b, c");
    assert_eq!(model(&scope), Some(Value::from(vec!["a", "b", "c"])));
}

#[test]
fn test_drops_empty_items() {
    let scope = Scope::new();
    let input = list(&scope, ListOptions::new());

    type_and_blur(&input, "a,, b ,  ,c");
    assert_eq!(model(&scope), Some(Value::from(vec!["a", "b", "c"])));
}

#[test]
fn test_custom_separator() {
    let scope = Scope::new();
    let input = list(&scope, ListOptions::new().separator("|"));

    type_and_blur(&input, "a | b,c");
    assert_eq!(model(&scope), Some(Value::from(vec!["a", "b,c"])));
}

#[test]
fn test_formats_list_model() {
    let scope = Scope::new();
    let input = list(&scope, ListOptions::new());

    scope.apply(|| scope.set("list", vec!["x", "y", "z"])).expect("apply");
    assert_eq!(input.field().value(), "x, y, z");
}

#[test]
fn test_non_list_model_renders_blank() {
    let scope = Scope::new();
    scope.set("list", vec!["a"]).expect("set");
    let input = list(&scope, ListOptions::new());
    scope.digest().expect("digest");
    assert_eq!(input.field().value(), "a");

    scope.apply(|| scope.set("list", "not a list")).expect("apply");
    assert_eq!(input.field().value(), "");
    assert_eq!(input.controller().view_value(), None);
}

#[test]
fn test_own_edit_is_not_reformatted() {
    let scope = Scope::new();
    let input = list(&scope, ListOptions::new());
    scope.digest().expect("digest");

    type_and_blur(&input, "a,b,");
    assert_eq!(model(&scope), Some(Value::from(vec!["a", "b"])));
    assert_eq!(input.field().value(), "a,b,");
}

#[test]
fn test_required_list() {
    let scope = Scope::new();
    let input = list(
        &scope,
        ListOptions::new().validation(Validation::new().required()),
    );
    scope.digest().expect("digest");
    assert!(input.controller().has_error(REQUIRED));

    type_and_blur(&input, "one");
    assert!(input.controller().is_valid());
    assert_eq!(model(&scope), Some(Value::from(vec!["one"])));
}
