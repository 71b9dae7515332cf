use thiserror::Error;

/// Failures a grid or timeline build can report.
///
/// Everything else (missing fields, unsorted or duplicate records, negative
/// counts) is normalized to zero instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid bucket width: {0} minutes")]
    InvalidBucketWidth(i64),

    #[error("palette must contain at least one colour")]
    EmptyPalette,

    #[error("invalid colour: {0:?} (expected #rgb, #rrggbb or a keyword)")]
    InvalidColor(String),

    #[error("invalid date key: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}
