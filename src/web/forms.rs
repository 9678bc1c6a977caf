//! Form schemas and validation
//!
//! Submissions arrive as url-encoded key/value pairs. Each schema validates
//! the raw pairs into a typed form or into a set of field errors; invalid
//! submissions keep their values so the page can be shown again.

use std::collections::{BTreeMap, HashMap};

use crate::core::entry::validate_title;

/// Raw url-encoded form body
pub type RawForm = HashMap<String, String>;

const REQUIRED: &str = "This field is required.";

/// Error messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Messages for one field
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of validating a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    Valid(T),
    Invalid(FieldErrors),
}

/// Trimmed value of a required field
fn required<'a>(raw: &'a RawForm, field: &'static str, errors: &mut FieldErrors) -> &'a str {
    let value = raw.get(field).map(|v| v.trim()).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value
}

/// Sidebar search box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub title: String,
}

impl SearchForm {
    pub fn validate(raw: &RawForm) -> Validation<Self> {
        let mut errors = FieldErrors::default();
        let title = required(raw, "title", &mut errors);

        if errors.is_empty() {
            Validation::Valid(Self {
                title: title.to_string(),
            })
        } else {
            Validation::Invalid(errors)
        }
    }
}

/// New page form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub text: String,
}

impl CreateForm {
    /// Submitted values, as typed
    pub fn from_raw(raw: &RawForm) -> Self {
        Self {
            title: raw.get("title").cloned().unwrap_or_default(),
            text: raw.get("text").cloned().unwrap_or_default(),
        }
    }

    pub fn validate(raw: &RawForm) -> Validation<Self> {
        let mut errors = FieldErrors::default();
        let title = required(raw, "title", &mut errors);
        let text = required(raw, "text", &mut errors);

        if !title.is_empty() {
            if let Err(reason) = validate_title(title) {
                errors.add("title", reason.to_string());
            }
        }

        if errors.is_empty() {
            Validation::Valid(Self {
                title: title.to_string(),
                text: text.to_string(),
            })
        } else {
            Validation::Invalid(errors)
        }
    }
}

/// Page edit form; the title comes from the URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub text: String,
}

impl EditForm {
    pub fn from_raw(raw: &RawForm) -> Self {
        Self {
            text: raw.get("text").cloned().unwrap_or_default(),
        }
    }

    pub fn validate(raw: &RawForm) -> Validation<Self> {
        let mut errors = FieldErrors::default();
        let text = required(raw, "text", &mut errors);

        if errors.is_empty() {
            Validation::Valid(Self {
                text: text.to_string(),
            })
        } else {
            Validation::Invalid(errors)
        }
    }
}
