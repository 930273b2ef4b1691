//! All error types for the pocodec crate.
//!
//! These are returned from all fallible operations (scanning, record assembly, caching, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("line {line}: malformed quoted string: {source}")]
    Unquote {
        line: usize,
        #[source]
        source: UnquoteError,
    },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Reasons a single quoted literal fails to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnquoteError {
    #[error("literal is not enclosed in double quotes")]
    MissingQuotes,

    #[error("unescaped double quote inside literal")]
    UnescapedQuote,

    #[error("raw newline inside literal")]
    Newline,

    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),

    #[error("literal ends with a lone backslash")]
    TrailingBackslash,

    #[error("octal escape `\\{0}` is out of range")]
    OctalOutOfRange(String),

    #[error("invalid unicode escape `{0:#x}`")]
    InvalidCodePoint(u32),

    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

impl Error {
    /// Creates a decode error pinned to a physical line.
    pub fn unquote(line: usize, source: UnquoteError) -> Self {
        Error::Unquote { line, source }
    }
}
