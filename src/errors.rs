use thiserror::Error;

/// Errors raised while parsing dates or PSA result files.
#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("empty input: no header line")]
    EmptyInput,
    #[error("no date column in header")]
    MissingDateColumn,
    #[error("no value column in header")]
    MissingValueColumn,
    #[error("invalid date \"{0}\"")]
    DateFormat(String),
    #[error("line {line}: invalid date \"{content}\"")]
    BadDate { line: usize, content: String },
    #[error("line {line}: invalid value \"{content}\"")]
    BadValue { line: usize, content: String },
    #[error("line {line}: negative value {value}")]
    NegativeValue { line: usize, value: f64 },
    #[error("line {line}: expecting at least {expected} fields")]
    MissingFields { line: usize, expected: usize },
}
