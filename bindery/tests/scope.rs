//! Tests for scope-backed bindings and change detection.

use std::cell::Cell;
use std::rc::Rc;

use bindery::{BindError, ModelConfig, ModelController, Scope, Value};

fn bound(scope: &Scope, path: &str) -> ModelController {
    let accessor = scope.accessor(path).expect("accessor");
    let ctrl = ModelController::new(ModelConfig::new(path), accessor);
    scope.watch_model(&ctrl);
    ctrl
}

#[test]
fn test_first_digest_formats_model() {
    let scope = Scope::new();
    scope.set("name", "misko").expect("set");
    let ctrl = bound(&scope, "name");

    scope.digest().expect("digest");
    assert_eq!(ctrl.view_value(), Some(Value::from("misko")));
    assert_eq!(ctrl.model_value(), Some(Value::from("misko")));
}

#[test]
fn test_undefined_model_renders_on_first_digest() {
    let scope = Scope::new();
    let ctrl = bound(&scope, "name");
    let renders = Rc::new(Cell::new(0));
    let counter = Rc::clone(&renders);
    ctrl.set_render(move |_| counter.set(counter.get() + 1));
    ctrl.add_formatter(|_, v| Some(v.unwrap_or(Value::from(""))));

    scope.digest().expect("digest");
    assert_eq!(renders.get(), 1);
    assert_eq!(ctrl.view_value(), Some(Value::from("")));
}

#[test]
fn test_view_writes_into_scope() {
    let scope = Scope::new();
    let ctrl = bound(&scope, "user.email");

    scope
        .apply(|| ctrl.set_view_value("a@b.com"))
        .expect("apply");
    assert_eq!(
        scope.get("user.email").expect("get"),
        Some(Value::from("a@b.com"))
    );
}

#[test]
fn test_own_write_does_not_reformat_view() {
    let scope = Scope::new();
    let ctrl = bound(&scope, "list");
    ctrl.add_parser(|_, v| {
        let items: Vec<Value> = v
            .as_str()?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Value::from)
            .collect();
        Some(Value::List(items))
    });
    ctrl.add_formatter(|_, v| {
        let joined = v?
            .as_list()?
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Some(Value::from(joined))
    });
    scope.digest().expect("digest");

    scope.apply(|| ctrl.set_view_value("a,b,")).expect("apply");
    assert_eq!(ctrl.view_value(), Some(Value::from("a,b,")));
    assert_eq!(
        scope.get("list").expect("get"),
        Some(Value::from(vec!["a", "b"]))
    );

    scope
        .apply(|| scope.set("list", vec!["x", "y"]))
        .expect("apply");
    assert_eq!(ctrl.view_value(), Some(Value::from("x, y")));
}

#[test]
fn test_model_change_renders() {
    let scope = Scope::new();
    let ctrl = bound(&scope, "count");
    let shown = Rc::new(Cell::new(0.0));
    let display = Rc::clone(&shown);
    ctrl.set_render(move |ctrl| {
        display.set(ctrl.view_value().and_then(|v| v.as_f64()).unwrap_or(0.0));
    });

    scope.apply(|| scope.set("count", 7)).expect("apply");
    assert_eq!(shown.get(), 7.0);
}

#[test]
fn test_nested_paths() {
    let scope = Scope::new();
    scope.set("obj['abc'].items[1]", "x").expect("set");
    assert_eq!(
        scope.get("obj.abc.items[1]").expect("get"),
        Some(Value::from("x"))
    );
    assert_eq!(
        scope.get("obj.abc.items[0]").expect("get"),
        Some(Value::Null)
    );
}

#[test]
fn test_malformed_path_is_rejected() {
    let scope = Scope::new();
    let err = scope.accessor("throw ''").expect_err("should fail");
    assert_eq!(
        err.to_string(),
        "Syntax Error: Token '''' is an unexpected token at column 7 of the expression [throw '']"
    );
}

#[test]
fn test_apply_digests_even_on_error() {
    let scope = Scope::new();
    let ctrl = bound(&scope, "name");
    scope.set("name", "kept").expect("set");

    let result: Result<(), BindError> =
        scope.apply(|| Err(BindError::Accessor("boom".to_string())));
    assert_eq!(result, Err(BindError::Accessor("boom".to_string())));
    assert_eq!(ctrl.view_value(), Some(Value::from("kept")));
}

#[test]
fn test_dropped_scope_write_fails() {
    let ctrl = {
        let scope = Scope::new();
        let accessor = scope.accessor("name").expect("accessor");
        ModelController::new(ModelConfig::new("name"), accessor)
    };

    assert_eq!(
        ctrl.set_view_value("x"),
        Err(BindError::ScopeDropped("name".to_string()))
    );
}

#[test]
fn test_formatters_run_only_on_model_change() {
    let scope = Scope::new();
    scope.set("name", "misko").expect("set");
    let ctrl = bound(&scope, "name");
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    ctrl.add_formatter(move |_, v| {
        counter.set(counter.get() + 1);
        v
    });

    scope.digest().expect("digest");
    scope.digest().expect("digest");
    assert_eq!(calls.get(), 1);

    scope.apply(|| scope.set("name", "adam")).expect("apply");
    scope.digest().expect("digest");
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_nan_model_settles() {
    let scope = Scope::new();
    let ctrl = bound(&scope, "n");
    ctrl.add_parser(|_, _| Some(Value::from(f64::NAN)));
    scope.digest().expect("digest");

    scope.apply(|| ctrl.set_view_value(".")).expect("apply");
    assert!(matches!(
        scope.get("n").expect("get"),
        Some(Value::Number(n)) if n.is_nan()
    ));
}

#[test]
fn test_huge_list_index_is_rejected() {
    let scope = Scope::new();
    let err = scope
        .set("a[18446744073709551615]", 1)
        .expect_err("should fail");
    assert!(matches!(err, BindError::IndexOutOfRange { .. }));
    assert_eq!(scope.get("a").expect("get"), Some(Value::List(Vec::new())));
}
