//! Field and section validation.
//!
//! `Validator` is side-effect free: it never touches `FormState`, it only
//! reports. Custom rules are named predicates registered at runtime, since a
//! form document fetched from the backend can only refer to them by name.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::FormError;
use crate::field::{FieldDefinition, ValidationRule};
use crate::schema::FormDefinition;
use crate::state::AnswerMap;

const REQUIRED_MESSAGE: &str = "This field is required";
const NOT_A_NUMBER_MESSAGE: &str = "Must be a number";
const NOT_AN_OPTION_MESSAGE: &str = "Please choose one of the listed options";

pub type CustomPredicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

/// True for a missing value, `null`, `""` and `[]`. Everything else (including
/// `false`, `0` and `{}`) counts as an answer.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// Length used by `minLength` / `maxLength`: characters for text, entries for lists.
fn measured_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Number(n) => Some(n.to_string().chars().count()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Select and radio answers name one option; checkbox answers list several.
fn picks_listed_options(field: &FieldDefinition, value: &Value) -> bool {
    let listed = |v: &Value| {
        as_text(v).is_some_and(|s| field.options.iter().any(|o| o.as_str() == s.as_ref()))
    };
    match value {
        Value::Array(items) => items.iter().all(listed),
        other => listed(other),
    }
}

/// Result of validating one section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub errors: BTreeMap<String, String>,
    pub valid: bool,
}

/// Result of validating every section of a form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormReport {
    pub errors: BTreeMap<String, String>,
    pub invalid_sections: Vec<usize>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.invalid_sections.is_empty()
    }
}

#[derive(Default)]
pub struct Validator {
    custom: HashMap<String, CustomPredicate>,
    /// Compiled `pattern` rules, keyed by their source.
    patterns: Mutex<HashMap<String, Regex>>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Validator")
            .field("custom", &names)
            .field("patterns", &self.cached_patterns())
            .finish()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named predicate for `ValidationRule::Custom { name, .. }`.
    pub fn with_rule(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.register(name, predicate);
        self
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) {
        self.custom.insert(name.into(), Box::new(predicate));
    }

    /// Validate a single value against its field definition.
    ///
    /// Order: required, then declared rules (only with a value present), then
    /// the numeric range for number fields. The first failure wins.
    pub fn validate_field(&self, field: &FieldDefinition, value: Option<&Value>) -> Option<String> {
        if is_empty_value(value) {
            return field.required.then(|| REQUIRED_MESSAGE.to_string());
        }
        let value = value?;

        for rule in &field.validation {
            if !self.rule_passes(field, rule, value) {
                return Some(
                    rule.message()
                        .map(str::to_string)
                        .unwrap_or_else(|| rule.default_message()),
                );
            }
        }

        if field.is_choice() && !field.options.is_empty() && !picks_listed_options(field, value) {
            return Some(NOT_AN_OPTION_MESSAGE.into());
        }

        if field.is_numeric() {
            let Some(n) = as_number(value) else {
                return Some(NOT_A_NUMBER_MESSAGE.into());
            };
            if let Some(min) = field.min.filter(|min| n < *min) {
                return Some(format!("Must be at least {min}"));
            }
            if let Some(max) = field.max.filter(|max| n > *max) {
                return Some(format!("Must be at most {max}"));
            }
        }

        None
    }

    fn rule_passes(&self, field: &FieldDefinition, rule: &ValidationRule, value: &Value) -> bool {
        match rule {
            ValidationRule::Email { .. } => {
                as_text(value).is_some_and(|s| email_regex().is_match(&s))
            }
            ValidationRule::Url { .. } => {
                as_text(value).is_some_and(|s| url::Url::parse(&s).is_ok())
            }
            ValidationRule::MinLength { value: min, .. } => {
                measured_len(value).map_or(true, |len| len >= *min)
            }
            ValidationRule::MaxLength { value: max, .. } => {
                measured_len(value).map_or(true, |len| len <= *max)
            }
            ValidationRule::Pattern { value: pattern, .. } => match self.pattern(pattern) {
                Ok(re) => as_text(value).is_some_and(|s| re.is_match(&s)),
                Err(e) => {
                    warn!(field = %field.id, "skipping invalid pattern rule: {e}");
                    true
                }
            },
            ValidationRule::Custom { name, .. } => match self.custom.get(name) {
                Some(predicate) => predicate(value),
                None => {
                    warn!(field = %field.id, rule = %name, "custom rule not registered; skipping");
                    true
                }
            },
        }
    }

    fn pattern(&self, source: &str) -> Result<Regex, regex::Error> {
        let mut patterns = self.patterns.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(re) = patterns.get(source) {
            return Ok(re.clone());
        }
        let re = Regex::new(source)?;
        patterns.insert(source.to_string(), re.clone());
        Ok(re)
    }

    fn cached_patterns(&self) -> usize {
        self.patterns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Validate every field of one section. Fields of other sections are not consulted.
    pub fn validate_section(
        &self,
        form: &FormDefinition,
        section_index: usize,
        answers: &AnswerMap,
    ) -> Result<SectionReport, FormError> {
        let section = form.section(section_index)?;
        let errors: BTreeMap<String, String> = section
            .fields
            .iter()
            .filter_map(|field| {
                self.validate_field(field, answers.get(&field.id))
                    .map(|msg| (field.id.clone(), msg))
            })
            .collect();
        Ok(SectionReport {
            valid: errors.is_empty(),
            errors,
        })
    }

    /// Validate all sections and union their errors.
    pub fn validate_all(&self, form: &FormDefinition, answers: &AnswerMap) -> FormReport {
        let mut report = FormReport::default();
        for index in 0..form.section_count() {
            let Ok(section) = self.validate_section(form, index, answers) else {
                continue;
            };
            if !section.valid {
                report.invalid_sections.push(index);
                report.errors.extend(section.errors);
            }
        }
        report
    }
}
