use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RearrangeError {
    #[error("duplicate item id: {0}")]
    DuplicateItem(String),

    #[error("unknown item id: {0}")]
    UnknownItem(String),

    #[error("order is not a permutation of the item set")]
    NotAPermutation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("duration must be positive")]
    NonPositiveDuration,

    #[error("test window ends before it starts")]
    WindowEndsBeforeStart,

    #[error("test has no questions")]
    NoQuestions,
}
