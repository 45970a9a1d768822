//! Allow-list request validation shared by every write endpoint.
//!
//! A request body (JSON or multipart) is parsed into a [`RequestForm`], checked
//! against a per-endpoint table of [`FieldRule`]s and handed back as a
//! [`Validated`] bag of normalized values. Database-backed rules (existence,
//! uniqueness) are layered on by the handlers using [`ValidationErrors`].

pub mod form;
pub mod rules;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::AppError;

pub use form::{RequestForm, UploadedFile};
pub use rules::{FieldDefault, FieldRule, Kind, Presence, Validated, validate};

/// Per-field error messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// First message overall, used as the top-level `message` of a 422.
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().flatten().next().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

/// Human form of a field name as used in messages ("sort_order" → "sort order").
pub(crate) fn display_name(field: &str) -> String {
    field.replace('_', " ")
}
