use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("form has no sections")]
    NoSections,

    #[error("duplicate field id: {0}")]
    DuplicateFieldId(String),

    #[error("section index {index} out of range (form has {count} sections)")]
    SectionOutOfRange { index: usize, count: usize },

    #[error("invalid pattern on field {field}: {message}")]
    InvalidPattern { field: String, message: String },
}
