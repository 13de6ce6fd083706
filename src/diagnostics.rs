//! Accumulating error collector.
//!
//! The scanner, parser and resolver keep going after an error so a single run
//! can surface as many problems as possible; each hands its findings back in
//! one of these instead of flipping a process‑wide flag.

use std::fmt;

use crate::error::LoxError;

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: LoxError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Plain messages, without line decoration.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(LoxError::message).collect()
    }
}

impl From<Vec<LoxError>> for Diagnostics {
    fn from(errors: Vec<LoxError>) -> Self {
        Diagnostics { errors }
    }
}

/// One diagnostic per line, in the order they were reported.
impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}
