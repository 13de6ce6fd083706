#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;

use rox::parser::Parser;
use rox::runtime::{RunError, Runtime, STACK_SIZE};
use rox::scanner::Scanner;
use rox::stmt::Stmt;

/// A `Write` sink the test can read back after handing a clone to the
/// interpreter.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A fresh session whose `print` output is captured.
pub fn session() -> (Runtime, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let runtime = Runtime::with_output(Box::new(buffer.clone()));
    (runtime, buffer)
}

/// Runs `source` in a fresh session and returns what it printed.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let (mut runtime, buffer) = session();
    let result = runtime.run(source);
    (buffer.contents(), result)
}

/// Like [`run`], but on a thread with the stack the CLI gives the
/// interpreter.  Errors come back rendered.
pub fn run_deep(source: &str) -> (String, Result<(), String>) {
    let source = source.to_owned();

    thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(move || {
            let (out, result) = run(&source);
            (out, result.map_err(|e| e.to_string()))
        })
        .expect("spawn interpreter thread")
        .join()
        .expect("interpreter thread panicked")
}

/// Scans and parses `source`, panicking on any static error.
pub fn parse(source: &str) -> Vec<Stmt> {
    let (tokens, errors) = Scanner::new(source).scan_all();
    assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);

    match Parser::new(tokens).parse() {
        Ok(statements) => statements,
        Err(diagnostics) => panic!("unexpected parse errors:\n{}", diagnostics),
    }
}
