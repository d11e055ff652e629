use thiserror::Error;

pub type Result<T> = std::result::Result<T, PatternError>;

/// Failure to load a hyphenation pattern source.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("I/O error reading patterns: {0}")]
    Io(#[from] std::io::Error),

    #[error("pattern source is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("unterminated \\{group} group opened on line {line}")]
    UnterminatedGroup { group: String, line: usize },

    #[error("invalid pattern `{token}` on line {line}")]
    InvalidPattern { token: String, line: usize },

    #[error("invalid hyphenation exception `{token}` on line {line}")]
    InvalidException { token: String, line: usize },

    #[error("pattern source contains no patterns or exceptions")]
    Empty,
}
