//! Front end for the glocks scripting language: a scanner that turns source
//! text into tokens, and the expression tree later passes walk through its
//! visitor.

pub mod diagnostics;
pub mod error;
pub mod expr;
pub mod printer;
pub mod scanner;
pub mod token;
pub mod value;

pub use crate::diagnostics::Diagnostics;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::scanner::Scanner;
pub use crate::token::{Token, TokenKind};

/// Scans `source` into tokens, recording lexical errors in `diagnostics`.
pub fn scan(source: &str, diagnostics: &mut Diagnostics) -> Result<Vec<Token>> {
    Scanner::new(source).scan_tokens(diagnostics)
}
