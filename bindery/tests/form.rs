//! Tests for form-level aggregation.

use bindery::{
    FieldError, FormController, LocalAccessor, ModelConfig, ModelController, ValidationResult,
};

fn control(name: &str) -> ModelController {
    ModelController::new(ModelConfig::new(name), LocalAccessor::new())
}

#[test]
fn test_new_form_is_valid_and_pristine() {
    let form = FormController::new("signup");
    assert!(form.is_valid());
    assert!(form.is_pristine());
    assert_eq!(form.validation_result(), ValidationResult::Valid);
}

#[test]
fn test_error_counted_per_control() {
    let form = FormController::new("signup");
    let name = control("name");
    let email = control("email");
    form.add_control(&name);
    form.add_control(&email);

    name.set_validity("REQUIRED", false);
    email.set_validity("REQUIRED", false);
    assert_eq!(form.error_count("REQUIRED"), 2);
    assert!(form.is_invalid());

    name.set_validity("REQUIRED", true);
    assert_eq!(form.error_count("REQUIRED"), 1);
    assert!(form.is_invalid());

    email.set_validity("REQUIRED", true);
    assert_eq!(form.error_count("REQUIRED"), 0);
    assert!(form.is_valid());
    assert!(form.error_keys().is_empty());
}

#[test]
fn test_repeated_invalid_not_double_counted() {
    let form = FormController::new("f");
    let name = control("name");
    form.add_control(&name);

    name.set_validity("PATTERN", false);
    name.set_validity("PATTERN", false);
    assert_eq!(form.error_count("PATTERN"), 1);
}

#[test]
fn test_first_edit_makes_form_dirty() {
    let form = FormController::new("f");
    let name = control("name");
    form.add_control(&name);

    name.set_view_value("a").expect("set view value");
    assert!(form.is_dirty());
    assert!(!form.is_pristine());
}

#[test]
fn test_add_control_takes_over_existing_state() {
    let form = FormController::new("f");
    let name = control("name");
    name.set_validity("REQUIRED", false);
    name.set_view_value("a").expect("set view value");

    form.add_control(&name);
    assert_eq!(form.error_count("REQUIRED"), 1);
    assert!(form.is_dirty());
}

#[test]
fn test_destroy_removes_errors() {
    let form = FormController::new("f");
    let name = control("name");
    let email = control("email");
    form.add_control(&name);
    form.add_control(&email);

    name.set_validity("REQUIRED", false);
    name.set_validity("MINLENGTH", false);
    email.set_validity("REQUIRED", false);

    name.destroy();
    assert_eq!(form.error_count("REQUIRED"), 1);
    assert_eq!(form.error_count("MINLENGTH"), 0);
    assert_eq!(form.controls().len(), 1);
    assert!(form.control("name").is_none());
    assert!(form.control("email").is_some());
}

#[test]
fn test_validation_result_lists_failures() {
    let form = FormController::new("f");
    let name = control("name");
    let email = control("email");
    form.add_control(&name);
    form.add_control(&email);

    email.set_validity("EMAIL", false);
    let result = form.validation_result();
    assert!(result.is_invalid());
    assert_eq!(
        result.errors(),
        &[FieldError {
            control_name: "email".to_string(),
            error_key: "EMAIL".to_string(),
        }]
    );
    assert_eq!(result.failing_control_names(), vec!["email"]);
}

#[test]
fn test_failing_controls() {
    let form = FormController::new("f");
    let name = control("name");
    form.add_control(&name);
    name.set_validity("REQUIRED", false);

    let failing = form.failing_controls("REQUIRED");
    assert_eq!(failing.len(), 1);
    assert!(failing[0].ptr_eq(&name));
    assert!(form.failing_controls("EMAIL").is_empty());
}

#[test]
fn test_set_pristine_resets_controls() {
    let form = FormController::new("f");
    let name = control("name");
    form.add_control(&name);
    name.set_view_value("a").expect("set view value");

    form.set_pristine();
    assert!(form.is_pristine());
    assert!(name.is_pristine());

    name.set_view_value("b").expect("set view value");
    assert!(form.is_dirty());
}

#[test]
fn test_controls_outlive_dropped_form() {
    let name = control("name");
    {
        let form = FormController::new("f");
        form.add_control(&name);
    }
    name.set_validity("REQUIRED", false);
    name.set_view_value("a").expect("set view value");
    assert!(name.is_invalid());
}
