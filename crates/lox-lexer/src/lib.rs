//! lox-lexer - Scanner for the Lox language
//!
//! This crate converts Lox source code into a sequence of tokens.
//!
//! # Features
//!
//! - Single- and two-character operators with maximal munch (`!=`, `<=`, ...)
//! - `//` line comments
//! - Number literals (`42`, `3.14`) as `f64`
//! - String literals spanning lines, without escape sequences
//! - Case-sensitive reserved words
//! - Recoverable errors reported through a [`lox_error::Reporter`]
//!
//! # Example
//!
//! ```rust
//! use lox_error::Diagnostics;
//! use lox_lexer::{Scanner, TokenKind};
//!
//! let source = r#"
//! var greeting = "hello";
//! print greeting;
//! "#;
//!
//! let mut diagnostics = Diagnostics::new();
//! let tokens = Scanner::new(source, &mut diagnostics).scan_tokens();
//!
//! assert!(!diagnostics.has_errors());
//! assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
//!
//! for token in &tokens {
//!     println!("{}", token);
//! }
//! ```

pub mod error;
pub mod scanner;
pub mod token;

pub use error::ScanError;
pub use scanner::{scan_tokens, Scanner};
pub use token::{Literal, Token, TokenKind};
