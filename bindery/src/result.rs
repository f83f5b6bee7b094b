//! Form validity snapshots.

/// One error key raised by one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// From [`ModelConfig::name`](crate::ModelConfig).
    pub control_name: String,
    /// e.g. `REQUIRED`.
    pub error_key: String,
}

/// What [`FormController::validation_result`](crate::FormController::validation_result)
/// reports: either nothing fails, or the failing `(control, key)` pairs in
/// control registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Every failing pair for `error_key`, in control registration order.
    pub fn errors_for<'a>(&'a self, error_key: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors().iter().filter(move |e| e.error_key == error_key)
    }

    /// Names of the controls failing at least one key, without repeats.
    pub fn failing_control_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for error in self.errors() {
            if !names.contains(&error.control_name.as_str()) {
                names.push(&error.control_name);
            }
        }
        names
    }
}
