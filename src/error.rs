use std::fmt;

/// The error type used in this crate.
///
/// Incompleteness is never an error: a fragment that adds no decodable
/// information makes `parse_chunk` return `Ok(None)`. Errors signal a broken
/// schema or an upstream data source violating the declared contract, and
/// propagate to the caller unchanged.
#[derive(Debug)]
pub enum StreamError {
    /// A numeric or boolean leaf lacks both an explicit and a stream
    /// default. Raised at construction, before any chunk is processed.
    Schema(String),
    /// Completed text failed to parse as JSON. Defensive; unreachable with a
    /// correctly behaving completer.
    Parse(String),
    /// A present value's JSON kind conflicts with its declared type, or no
    /// union variant matches.
    Validation(String),
}

impl StreamError {
    pub(crate) fn in_field(self, name: &str) -> StreamError {
        match self {
            StreamError::Schema(msg) => StreamError::Schema(format!("field '{name}': {msg}")),
            StreamError::Validation(msg) => {
                StreamError::Validation(format!("field '{name}': {msg}"))
            }
            parse => parse,
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Schema(msg) => write!(f, "schema build error: {msg}"),
            StreamError::Parse(msg) => write!(f, "parse error: {msg}"),
            StreamError::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for StreamError {}

/// A type alias for `Result<T, StreamError>`.
pub type StreamResult<T> = Result<T, StreamError>;
