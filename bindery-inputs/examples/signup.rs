//! Signup Example
//!
//! Binds a small signup form to a scope and replays a scripted user session:
//! - text input with a required flag and a length limit
//! - email and number inputs with built-in checks
//! - checkbox for accepting the terms
//! - list input for tags
//!
//! Debug logs are written to `signup.log`.

use std::fs::File;

use bindery::{BindError, FormController, ModelConfig, ModelController, Scope};
use bindery_inputs::{
    CheckboxOptions, Field, FieldEvent, InputBinding, InputError, ListOptions, NumberOptions,
    TextOptions, Validation,
};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

fn controller(scope: &Scope, path: &str) -> Result<ModelController, BindError> {
    Ok(ModelController::new(ModelConfig::new(path), scope.accessor(path)?))
}

fn type_into(input: &InputBinding, text: &str) -> Result<(), BindError> {
    input.field().set_value(text);
    input.dispatch(FieldEvent::Blur)
}

fn report(form: &FormController, scope: &Scope) {
    let result = form.validation_result();
    println!(
        "  valid: {}  dirty: {}  model: {}",
        result.is_valid(),
        form.is_dirty(),
        model_json(scope)
    );
    for error in result.errors() {
        println!("    {} -> {}", error.control_name, error.error_key);
    }
}

fn model_json(scope: &Scope) -> String {
    let root: serde_json::Value = scope.root().into();
    root.to_string()
}

fn main() -> Result<(), InputError> {
    if let Ok(log_file) = File::create("signup.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let scope = Scope::new();
    scope.set("user.age", 30)?;
    let form = FormController::new("signup");

    let name = InputBinding::text(
        &scope,
        &Field::new(),
        &controller(&scope, "user.name")?,
        TextOptions::new().validation(Validation::new().required().max_length(20)),
    )?;
    let email = InputBinding::email(
        &scope,
        &Field::new(),
        &controller(&scope, "user.email")?,
        TextOptions::new().validation(Validation::new().required()),
    )?;
    let age = InputBinding::number(
        &scope,
        &Field::new(),
        &controller(&scope, "user.age")?,
        NumberOptions::new().min(13.0).max(120.0),
    )?;
    let terms = InputBinding::checkbox(
        &scope,
        &Field::new(),
        &controller(&scope, "user.terms")?,
        CheckboxOptions::new().required(),
    )?;
    let tags = InputBinding::list(
        &scope,
        &Field::new(),
        &controller(&scope, "user.tags")?,
        ListOptions::new(),
    )?;

    for input in [&name, &email, &age, &terms, &tags] {
        form.add_control(input.controller());
    }

    scope.digest()?;
    println!("initial (age field shows '{}')", age.field().value());
    report(&form, &scope);

    type_into(&name, "  Ada Lovelace ")?;
    type_into(&email, "ada@")?;
    type_into(&age, "12")?;
    type_into(&tags, "math, engines,")?;
    println!("after first pass");
    report(&form, &scope);

    type_into(&email, "ada@example.org")?;
    type_into(&age, "36")?;
    terms.dispatch(FieldEvent::Click)?;
    println!("after corrections");
    report(&form, &scope);

    scope.apply(|| scope.set("user.tags", vec!["poetry", "science"]))?;
    println!("tags field after model update: '{}'", tags.field().value());

    Ok(())
}
