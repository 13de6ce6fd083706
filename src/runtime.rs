//! Runs one program (or one REPL line) through the whole pipeline:
//! scan → parse → resolve → interpret.
//!
//! Lexical and syntax errors are collected together and reported as one
//! static failure; resolution errors are a separate static failure.  In both
//! cases nothing executes.  A runtime error stops the program where it occurs.

use std::io::Write;

use log::{debug, info};
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::stmt::Stmt;
use crate::value::Value;

/// Exit status for a static (syntax / resolution) failure.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for an unrecovered runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Native stack for a thread that drives a [`Runtime`].  Each nested call
/// costs several evaluator frames, so the default main-thread stack runs out
/// long before [`MAX_CALL_DEPTH`](crate::interpreter::MAX_CALL_DEPTH).
pub const STACK_SIZE: usize = 256 * 1024 * 1024;

/// Why a run did not complete.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0}")]
    Static(Diagnostics),

    #[error("{0}")]
    Runtime(LoxError),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Static(_) => EXIT_STATIC_ERROR,
            RunError::Runtime(_) => EXIT_RUNTIME_ERROR,
        }
    }
}

/// A long‑lived session: one interpreter, many runs.
pub struct Runtime {
    interpreter: Interpreter,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Runtime {
            interpreter: Interpreter::new(),
        }
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Runtime {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn interpreter(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Runs a complete program.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        info!("Running program of {} bytes", source.len());

        let statements: Vec<Stmt> = self.front_end(source)?;

        self.interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)
    }

    /// Parses `source` as a single expression and evaluates it.
    pub fn evaluate(&mut self, source: &str) -> Result<Value, RunError> {
        info!("Evaluating expression of {} bytes", source.len());

        let (tokens, lex_errors) = Scanner::new(source).scan_all();
        let mut diagnostics = Diagnostics::from(lex_errors);

        let parsed = Parser::new(tokens).parse_expression();
        let expr = match parsed {
            Ok(expr) if !diagnostics.has_errors() => expr,
            Ok(_) => return Err(RunError::Static(diagnostics)),
            Err(parse_errors) => {
                diagnostics.extend(parse_errors);
                return Err(RunError::Static(diagnostics));
            }
        };

        let locals = Resolver::new()
            .resolve_expression(&expr)
            .map_err(RunError::Static)?;
        self.interpreter.resolve(locals);

        self.interpreter.evaluate(&expr).map_err(RunError::Runtime)
    }

    /// Scan, parse and resolve.  Returns the program only if all three phases
    /// were clean.
    fn front_end(&mut self, source: &str) -> Result<Vec<Stmt>, RunError> {
        let (tokens, lex_errors) = Scanner::new(source).scan_all();
        let mut diagnostics = Diagnostics::from(lex_errors);

        let statements = match Parser::new(tokens).parse() {
            Ok(statements) => statements,
            Err(parse_errors) => {
                diagnostics.extend(parse_errors);
                Vec::new()
            }
        };

        if diagnostics.has_errors() {
            debug!("Front end reported {} error(s)", diagnostics.len());
            return Err(RunError::Static(diagnostics));
        }

        let locals = Resolver::new()
            .resolve(&statements)
            .map_err(RunError::Static)?;
        self.interpreter.resolve(locals);

        Ok(statements)
    }
}
