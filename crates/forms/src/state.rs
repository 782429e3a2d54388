//! Form runtime (mutable) state.
//!
//! This module contains only the data structures representing the *current
//! filling state* of a form:
//!   * Answers keyed by field id (`AnswerMap`)
//!   * Validation errors keyed by field id (`ErrorMap`)
//!   * A form-level error (submission failures reported back by the caller)
//!
//! The validation pass (`validate.rs`) produces reports; `progression.rs`
//! decides when they are merged in here.

use std::collections::BTreeMap;

use serde_json::Value;

/// Answers keyed by field id. Values are kept as JSON so they can be posted
/// back to the backend unchanged.
pub type AnswerMap = BTreeMap<String, Value>;

/// Per-field validation messages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<String, String>,
}

impl ErrorMap {
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.entries.get(field_id).map(String::as_str)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.entries.contains_key(field_id)
    }

    pub fn clear_field(&mut self, field_id: &str) {
        self.entries.remove(field_id);
    }

    /// Replace the entries of one section's fields with `errors`. Entries of
    /// fields outside `section_fields` are kept as they are.
    pub fn merge_section<'a>(
        &mut self,
        section_fields: impl IntoIterator<Item = &'a str>,
        errors: &BTreeMap<String, String>,
    ) {
        for id in section_fields {
            match errors.get(id) {
                Some(msg) => {
                    self.entries.insert(id.to_string(), msg.clone());
                }
                None => {
                    self.entries.remove(id);
                }
            }
        }
    }

    pub fn replace_all(&mut self, errors: BTreeMap<String, String>) {
        self.entries = errors;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

/// Mutable state captured while filling a form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormState {
    pub answers: AnswerMap,
    pub errors: ErrorMap,
    pub form_error: Option<String>,
}

impl FormState {
    /// Store a value and drop that field's error. No re-validation happens here.
    pub fn set_answer(&mut self, field_id: &str, value: Value) {
        self.answers.insert(field_id.to_string(), value);
        self.errors.clear_field(field_id);
    }

    pub fn answer(&self, field_id: &str) -> Option<&Value> {
        self.answers.get(field_id)
    }

    pub fn clear(&mut self) {
        self.answers.clear();
        self.errors.clear();
        self.form_error = None;
    }
}
