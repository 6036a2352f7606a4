//! Integration tests for the Lox scanner
//!
//! Exercises the scanner end to end through its public API:
//! Source → Scanner → Tokens + Diagnostics

use lox_error::Diagnostics;
use lox_lexer::{Scanner, Token, TokenKind};

/// Result of scanning a Lox source string
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Tokens, always ending with EOF
    pub tokens: Vec<Token>,
    /// Errors reported during the scan
    pub diagnostics: Diagnostics,
}

impl ScanResult {
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    pub fn lexemes(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }

    /// `(line, message)` of every reported error
    pub fn errors(&self) -> Vec<(u32, String)> {
        self.diagnostics
            .iter()
            .map(|d| (d.line, d.message.clone()))
            .collect()
    }

    /// Lexemes joined in order, which is the source minus whitespace and comments
    pub fn joined_lexemes(&self) -> String {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }
}

/// Scans Lox source with a fresh scanner
pub fn scan(source: &str) -> ScanResult {
    let mut diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source, &mut diagnostics).scan_tokens();
    ScanResult {
        tokens,
        diagnostics,
    }
}

/// Asserts that source scans without errors
pub fn assert_scans(source: &str) -> ScanResult {
    let result = scan(source);
    if result.diagnostics.has_errors() {
        panic!(
            "Expected source to scan cleanly, but got errors:\n{:?}",
            result.errors()
        );
    }
    result
}

/// Asserts that source scans to exactly `expected` kinds (EOF included)
pub fn assert_kinds(source: &str, expected: &[TokenKind]) {
    let result = assert_scans(source);
    let kinds = result.kinds();
    if kinds != expected {
        panic!(
            "Token kinds differ for {:?}\n  expected: {:?}\n  found:    {:?}",
            source, expected, kinds
        );
    }
}

/// Removes whitespace and `//` comments, outside of string literals
pub fn strip_trivia(source: &str) -> String {
    let mut out = String::new();
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            in_string = ch != '"';
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().map_or(false, |c| *c != '\n') {
                    chars.next();
                }
            }
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }

    out
}
