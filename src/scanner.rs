//! Streaming lexer: source text in, [`Token`]s out.
//!
//! The scanner is an iterator over `Result<Token>`.  A lexical error is
//! yielded in place of the offending lexeme and scanning resumes right after
//! it, so one pass reports every bad character.  Exactly one `EOF` token ends
//! the stream, after which the iterator is fused.
//!
//! Whitespace and `//` comments produce nothing.  Strings may span lines;
//! numbers are integer or decimal (`12`, `3.5`, never `.5` or `5.`).
//!
//! ```rust
//! use rox::scanner::Scanner;
//!
//! let (tokens, errors) = Scanner::new("print 123; // example").scan_all();
//! assert_eq!(tokens.len(), 4);
//! assert!(errors.is_empty());
//! ```

use std::iter::FusedIterator;

use log::{debug, info};
use memchr::{memchr, memchr_iter};
use phf::phf_map;

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

/// Reserved words, looked up once an identifier-shaped lexeme is complete.
static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"for"    => TokenType::FOR,
    b"fun"    => TokenType::FUN,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

pub struct Scanner<'a> {
    src: &'a str,
    /// First byte of the lexeme being scanned.
    start: usize,
    /// Next byte to look at.
    pos: usize,
    line: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    /// Drains the scanner, separating tokens from lexical errors.
    pub fn scan_all(self) -> (Vec<Token>, Vec<LoxError>) {
        let mut tokens: Vec<Token> = Vec::new();
        let mut errors: Vec<LoxError> = Vec::new();

        for item in self {
            match item {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }

        info!(
            "Scanned {} token(s) with {} error(s)",
            tokens.len(),
            errors.len()
        );

        (tokens, errors)
    }

    #[inline(always)]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    #[inline(always)]
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Byte `offset` positions ahead, or `0` past the end.
    #[inline(always)]
    fn look(&self, offset: usize) -> u8 {
        self.bytes().get(self.pos + offset).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn bump(&mut self) -> u8 {
        let b = self.look(0);
        self.pos += 1;
        b
    }

    /// `matched` if the next byte is `next` (consuming it), else `single`.
    #[inline(always)]
    fn either(&mut self, next: u8, matched: TokenType, single: TokenType) -> TokenType {
        if !self.at_end() && self.look(0) == next {
            self.pos += 1;
            matched
        } else {
            single
        }
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.at_end() && pred(self.look(0)) {
            self.pos += 1;
        }
    }

    /// Scans one lexeme starting at `self.start`.  `Ok(None)` means the lexeme
    /// was trivia (whitespace or a comment).
    fn scan_token(&mut self) -> Result<Option<TokenType>> {
        let kind = match self.bump() {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,

            b'!' => self.either(b'=', TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.either(b'=', TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.either(b'=', TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.either(b'=', TokenType::GREATER_EQUAL, TokenType::GREATER),

            b'/' if self.look(0) == b'/' => {
                // The newline itself is left for the next call so it bumps `line`.
                self.pos = match memchr(b'\n', &self.bytes()[self.pos..]) {
                    Some(offset) => self.pos + offset,
                    None => self.src.len(),
                };
                return Ok(None);
            }
            b'/' => TokenType::SLASH,

            b' ' | b'\r' | b'\t' => return Ok(None),

            b'\n' => {
                self.line += 1;
                return Ok(None);
            }

            b'"' => self.string()?,

            b'0'..=b'9' => self.number(),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            other => {
                // Step over the whole character, not just its first byte.
                let ch: char = self.src[self.start..]
                    .chars()
                    .next()
                    .unwrap_or(other as char);
                self.pos = self.start + ch.len_utf8();

                return Err(LoxError::lex(
                    self.line,
                    format!("Unexpected character: {}", ch),
                ));
            }
        };

        Ok(Some(kind))
    }

    fn string(&mut self) -> Result<TokenType> {
        let rest = &self.bytes()[self.pos..];

        let Some(len) = memchr(b'"', rest) else {
            self.line += memchr_iter(b'\n', rest).count();
            self.pos = self.src.len();
            return Err(LoxError::lex(self.line, "Unterminated string."));
        };

        self.line += memchr_iter(b'\n', &rest[..len]).count();

        let contents: &str = &self.src[self.pos..self.pos + len];
        self.pos += len + 1;

        Ok(TokenType::STRING(contents.to_owned()))
    }

    fn number(&mut self) -> TokenType {
        self.skip_while(|b| b.is_ascii_digit());

        if self.look(0) == b'.' && self.look(1).is_ascii_digit() {
            self.pos += 1;
            self.skip_while(|b| b.is_ascii_digit());
        }

        // Only digits and one interior '.', so parsing cannot fail.
        let value: f64 = self.src[self.start..self.pos].parse().unwrap_or(0.0);
        TokenType::NUMBER(value)
    }

    fn identifier(&mut self) -> TokenType {
        self.skip_while(|b| b.is_ascii_alphanumeric() || b == b'_');

        KEYWORDS
            .get(&self.bytes()[self.start..self.pos])
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while !self.at_end() {
            self.start = self.pos;

            match self.scan_token() {
                Err(e) => return Some(Err(e)),
                Ok(None) => continue,
                Ok(Some(kind)) => {
                    let lexeme: &str = &self.src[self.start..self.pos];
                    debug!("Scanned {:?} on line {}", kind, self.line);
                    return Some(Ok(Token::new(kind, lexeme, self.line)));
                }
            }
        }

        self.finished = true;
        Some(Ok(Token::new(TokenType::EOF, "", self.line)))
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
