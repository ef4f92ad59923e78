use std::result;
use std::fmt::{self, Display};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A character or construct the scanner can't classify. Recoverable.
    Lexical { line: usize },
    /// A numeric lexeme the decoder rejected. The digit filters in the
    /// scanner should make this impossible, so it is treated as fatal.
    InvalidNumber { line: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn lexical<S: Into<String>>(line: usize, message: S) -> Error {
        let kind = ErrorKind::Lexical { line };
        Error { kind, message: message.into() }
    }

    pub fn invalid_number(line: usize, lexeme: &str) -> Error {
        let kind = ErrorKind::InvalidNumber { line };
        Error { kind, message: format!("Could not convert {} into a number.", lexeme) }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        use ErrorKind::*;
        match self.kind() {
            Lexical { line } | InvalidNumber { line } => *line,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidNumber { .. })
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line(), self.message)
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> std::io::Error {
        use std::io::ErrorKind::*;
        std::io::Error::new(Other, e)
    }
}
