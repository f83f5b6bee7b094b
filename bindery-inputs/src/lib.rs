//! Input widgets for `bindery` model controllers.
//!
//! Each input type installs parsers, formatters, validators and a render
//! callback on a [`ModelController`](bindery::ModelController), and moves a
//! [`Field`]'s state into it when the host reports a [`FieldEvent`]:
//!
//! | Kind       | View            | Model                  | Error keys               |
//! |------------|-----------------|------------------------|--------------------------|
//! | text       | text            | string                 | `PATTERN`, `MINLENGTH`, `MAXLENGTH` |
//! | number     | text            | number, or null        | `NUMBER`, `MIN`, `MAX`   |
//! | email      | text            | string                 | `EMAIL`                  |
//! | url        | text            | string                 | `URL`                    |
//! | list       | text            | list of strings        |                          |
//! | checkbox   | checked flag    | true / false value     |                          |
//! | radio      | checked flag    | the option's value     |                          |
//!
//! Every kind except radio also accepts `REQUIRED`.

pub mod binding;
pub mod error;
pub mod field;
pub mod options;
pub mod patterns;
pub mod validators;

pub use binding::{InputBinding, InputKind};
pub use error::InputError;
pub use field::{Field, FieldEvent, FieldId};
pub use options::{
    CheckboxOptions, ListOptions, NumberOptions, PatternSource, Required, TextOptions, Validation,
};
pub use patterns::{EMAIL_REGEXP, NUMBER_REGEXP, URL_REGEXP};
