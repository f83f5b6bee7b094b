//! Per-widget configuration.

use bindery::Value;

/// Whether a field must hold a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Required {
    /// No `REQUIRED` check.
    #[default]
    Off,
    /// Always required.
    On,
    /// Required while the value at this scope path is truthy.
    Scope(String),
}

/// Where a `PATTERN` check gets its regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    /// A fixed expression, compiled when the binding is attached.
    Literal(String),
    /// An expression read from this scope path on every check.
    Scope(String),
}

/// Validators shared by every text-like input.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    pub required: Required,
    pub pattern: Option<PatternSource>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always require a value.
    pub fn required(mut self) -> Self {
        self.required = Required::On;
        self
    }

    /// Require a value while the scope value at `path` is truthy.
    pub fn required_if(mut self, path: impl Into<String>) -> Self {
        self.required = Required::Scope(path.into());
        self
    }

    /// Match a fixed regular expression.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(PatternSource::Literal(pattern.into()));
        self
    }

    /// Match the regular expression stored at a scope path.
    pub fn pattern_from_scope(mut self, path: impl Into<String>) -> Self {
        self.pattern = Some(PatternSource::Scope(path.into()));
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }
}

/// Options for text, textarea, email and url inputs.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Trim surrounding whitespace before committing.
    pub trim: bool,
    pub validation: Validation,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            trim: true,
            validation: Validation::default(),
        }
    }
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep surrounding whitespace.
    pub fn untrimmed(mut self) -> Self {
        self.trim = false;
        self
    }

    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }
}

/// Options for number inputs.
#[derive(Debug, Clone, Default)]
pub struct NumberOptions {
    pub validation: Validation,
    /// Smallest accepted value (`MIN`).
    pub min: Option<f64>,
    /// Largest accepted value (`MAX`).
    pub max: Option<f64>,
}

impl NumberOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

/// Options for checkbox inputs.
#[derive(Debug, Clone)]
pub struct CheckboxOptions {
    /// Model value written when checked.
    pub true_value: Value,
    /// Model value written when unchecked.
    pub false_value: Value,
    pub required: Required,
}

impl Default for CheckboxOptions {
    fn default() -> Self {
        Self {
            true_value: Value::Bool(true),
            false_value: Value::Bool(false),
            required: Required::Off,
        }
    }
}

impl CheckboxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model values for the checked and unchecked states.
    pub fn values(mut self, true_value: impl Into<Value>, false_value: impl Into<Value>) -> Self {
        self.true_value = true_value.into();
        self.false_value = false_value.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = Required::On;
        self
    }
}

/// Options for list inputs.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Item separator used when parsing.
    pub separator: String,
    pub text: TextOptions,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            text: TextOptions::default(),
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn validation(mut self, validation: Validation) -> Self {
        self.text.validation = validation;
        self
    }
}
