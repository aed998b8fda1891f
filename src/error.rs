use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: needs either a reported solved count or a handle to fetch it")]
    NoMetricSource { row: usize },

    #[error("row {row}: academic score {value} outside 0..={max}")]
    AcademicScoreOutOfRange { row: usize, value: f64, max: f64 },

    #[error("row {row}: solved count {value} is negative")]
    NegativeMetric { row: usize, value: i64 },

    #[error("row {row}: solved count {value} is too large")]
    MetricOverflow { row: usize, value: i64 },

    #[error("row {row}: duplicate email {email}")]
    DuplicateIdentifier { row: usize, email: String },

    #[error("section count {requested} invalid for {students} students (max {max_labels})")]
    InvalidSectionCount {
        requested: i64,
        students: usize,
        max_labels: usize,
    },

    #[error("non-finite score computed for row {row}")]
    NonFiniteScore { row: usize },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("lookup service returned {0}")]
    Status(u16),

    #[error("unexpected payload: {0}")]
    Parse(String),
}
