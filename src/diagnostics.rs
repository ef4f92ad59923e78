//! Collector for the line-tagged errors produced while scanning.
//!
//! A `Diagnostics` is handed to each pass by the host rather than living in
//! global state, so several passes over one input can share a single
//! "had error" flag and independent inputs can't see each other's errors.

use std::io::{self, Write};

use crate::error::Error;

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<S: Into<String>>(&mut self, line: usize, message: S) {
        self.push(Error::lexical(line, message));
    }

    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Clears everything recorded so far, e.g. between REPL lines.
    pub fn reset(&mut self) {
        self.errors.clear();
    }

    /// Writes one diagnostic per line, in the order they were recorded.
    pub fn emit<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for e in self.errors.iter() {
            writeln!(out, "{}", e)?;
        }
        Ok(())
    }
}
