//! Scanner for the Lox language
//!
//! Converts source code into a sequence of tokens in a single
//! left-to-right pass.

use crate::error::ScanError;
use crate::token::{Literal, Token, TokenKind};
use lox_error::{Diagnostics, Reporter};
use tracing::{debug, trace};

/// The Lox language scanner.
///
/// Single-use: build it over one source unit, call [`Scanner::scan_tokens`]
/// once, and it is consumed.
pub struct Scanner<'src, 'r> {
    /// Source code being analyzed
    source: &'src str,
    /// Byte offset of the first character of the current lexeme
    start: usize,
    /// Byte offset of the character about to be read
    current: usize,
    /// Current line (1-indexed)
    line: u32,
    /// Tokens produced so far
    tokens: Vec<Token>,
    /// Where recoverable errors go
    reporter: &'r mut dyn Reporter,
    /// Number of errors reported
    errors: usize,
}

impl<'src, 'r> Scanner<'src, 'r> {
    /// Creates a new scanner for the given source code
    pub fn new(source: &'src str, reporter: &'r mut dyn Reporter) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            reporter,
            errors: 0,
        }
    }

    /// Scans the whole source. The result always ends with exactly one EOF.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        debug!(bytes = self.source.len(), "scanning source");

        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::eof(self.line));

        debug!(
            tokens = self.tokens.len(),
            errors = self.errors,
            lines = self.line,
            "scan finished"
        );
        self.tokens
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Returns the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    /// Returns the character after the current one without advancing
    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    /// Advances to the next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += ch.len_utf8();
        Some(ch)
    }

    /// Consumes the current character only if it is `expected`
    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Source text of the lexeme being scanned
    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.push_token(kind, None, self.line);
    }

    fn push_token(&mut self, kind: TokenKind, literal: Option<Literal>, line: u32) {
        let lexeme = self.lexeme();
        trace!(kind = %kind, lexeme, line, "token");
        self.tokens.push(Token::new(kind, lexeme, literal, line));
    }

    fn error(&mut self, error: ScanError) {
        debug!(line = error.line(), %error, "scan error");
        self.errors += 1;
        self.reporter.report_diagnostic(error.into());
    }

    /// Scans one lexeme starting at `self.start`
    fn scan_token(&mut self) {
        let Some(ch) = self.advance() else {
            return;
        };

        match ch {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => {
                let kind = if self.matches('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    self.skip_comment();
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.read_string(),
            c if c.is_ascii_digit() => self.read_number(),
            c if is_identifier_start(c) => self.read_identifier(),
            c => self.error(ScanError::UnexpectedCharacter {
                line: self.line,
                ch: c,
            }),
        }
    }

    /// Skips a `//` comment up to, but not including, the line terminator
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Reads a string; the opening quote is already consumed
    fn read_string(&mut self) {
        let start_line = self.line;

        loop {
            match self.peek() {
                None => {
                    self.error(ScanError::UnterminatedString { line: start_line });
                    return;
                }
                Some('"') => break,
                Some(ch) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.advance();
                }
            }
        }

        // Closing quote
        self.advance();

        let value = &self.source[self.start + 1..self.current - 1];
        self.push_token(
            TokenKind::String,
            Some(Literal::String(value.to_string())),
            start_line,
        );
    }

    /// Reads a number; the first digit is already consumed
    fn read_number(&mut self) {
        self.skip_digits();

        // A `.` only belongs to the number when a digit follows it
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            self.skip_digits();
        }

        let lexeme = self.lexeme();
        match lexeme.parse::<f64>() {
            Ok(value) => self.push_token(TokenKind::Number, Some(Literal::Number(value)), self.line),
            Err(_) => self.error(ScanError::InvalidNumber {
                line: self.line,
                lexeme: lexeme.to_string(),
            }),
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Reads an identifier or keyword; the first character is already consumed
    fn read_identifier(&mut self) {
        while self.peek().map_or(false, is_identifier_continue) {
            self.advance();
        }

        let kind = TokenKind::keyword_from_str(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Scans source code and returns the tokens together with any errors
pub fn scan_tokens(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source, &mut diagnostics).scan_tokens();
    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_error::ErrorCode;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = scan_tokens(source);
        tokens
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }

    fn errors(source: &str) -> Vec<(u32, String)> {
        let (_, diagnostics) = scan_tokens(source);
        diagnostics
            .iter()
            .map(|d| (d.line, d.message.clone()))
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = lex("var x = 10;");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_single_character_tokens() {
        let tokens = lex("(){},.-+;*/");
        assert_eq!(
            tokens,
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::Slash,
            ]
        );
    }

    #[test]
    fn test_maximal_munch() {
        let tokens = lex("!!====<<=>>=");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::EqualEqual,
                TokenKind::Equal,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ]
        );
    }

    #[test]
    fn test_separated_operators_do_not_merge() {
        let tokens = lex("! = < = > = = =");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Bang,
                TokenKind::Equal,
                TokenKind::Less,
                TokenKind::Equal,
                TokenKind::Greater,
                TokenKind::Equal,
                TokenKind::Equal,
                TokenKind::Equal,
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(lex("// nothing here"), Vec::<TokenKind>::new());
        assert_eq!(lex("1 // one\n2"), vec![TokenKind::Number, TokenKind::Number]);
        assert_eq!(lex("a / b"), vec![TokenKind::Identifier, TokenKind::Slash, TokenKind::Identifier]);
        assert_eq!(lex("/ /"), vec![TokenKind::Slash, TokenKind::Slash]);
    }

    #[test]
    fn test_comment_keeps_line_terminator() {
        let (tokens, _) = scan_tokens("// comment\nprint");
        assert_eq!(tokens[0].kind, TokenKind::Print);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_numbers() {
        let (tokens, diagnostics) = scan_tokens("123 3.14159 0 42.0");
        assert!(diagnostics.is_empty());

        let values: Vec<_> = tokens
            .iter()
            .filter_map(|t| t.literal.as_ref().and_then(Literal::as_number))
            .collect();
        assert_eq!(values, vec![123.0, 3.14159, 0.0, 42.0]);

        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["123", "3.14159", "0", "42.0", ""]);
    }

    #[test]
    fn test_trailing_dot_is_not_part_of_number() {
        let (tokens, _) = scan_tokens("42.");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[0].literal, Some(Literal::Number(42.0)));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_method_call_on_number() {
        let tokens = lex("12.abs()");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Number,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn test_leading_dot_is_not_part_of_number() {
        let (tokens, _) = scan_tokens(".5");
        assert_eq!(tokens[0].kind, TokenKind::Dot);
        assert_eq!(tokens[1].lexeme, "5");
        assert_eq!(tokens[1].literal, Some(Literal::Number(5.0)));
    }

    #[test]
    fn test_strings() {
        let (tokens, diagnostics) = scan_tokens(r#""hello" "" "a // not a comment""#);
        assert!(diagnostics.is_empty());

        assert_eq!(tokens[0].lexeme, "\"hello\"");
        assert_eq!(tokens[0].literal, Some(Literal::String("hello".into())));
        assert_eq!(tokens[1].lexeme, "\"\"");
        assert_eq!(tokens[1].literal, Some(Literal::String(String::new())));
        assert_eq!(
            tokens[2].literal,
            Some(Literal::String("a // not a comment".into()))
        );
    }

    #[test]
    fn test_backslash_is_not_an_escape() {
        let (tokens, diagnostics) = scan_tokens(r#""a\n""#);
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].literal, Some(Literal::String(r"a\n".into())));
    }

    #[test]
    fn test_multiline_string() {
        let (tokens, _) = scan_tokens("\"one\ntwo\" x");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].literal, Some(Literal::String("one\ntwo".into())));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, diagnostics) = scan_tokens("var s = \"abc\ndef");

        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Var, TokenKind::Identifier, TokenKind::Equal, TokenKind::Eof]
        );
        assert_eq!(tokens.last().map(|t| t.line), Some(2));

        let reported: Vec<_> = diagnostics.iter().collect();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].line, 1);
        assert_eq!(reported[0].message, "Unterminated string.");
        assert_eq!(reported[0].code, Some(ErrorCode::UNTERMINATED_STRING));
    }

    #[test]
    fn test_identifiers_and_keywords() {
        let (tokens, _) = scan_tokens("and class var this identifier fooBar _underscore a1_b2");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::And,
                TokenKind::Class,
                TokenKind::Var,
                TokenKind::This,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[5].lexeme, "fooBar");
        assert_eq!(tokens[6].lexeme, "_underscore");
        assert!(tokens.iter().all(|t| t.literal.is_none()));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            lex("nil Nil NIL orchid or"),
            vec![
                TokenKind::Nil,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Or,
            ]
        );
    }

    #[test]
    fn test_unexpected_characters_do_not_stop_the_scan() {
        let (tokens, diagnostics) = scan_tokens("a @ b\n# $");

        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(
            errors("a @ b\n# $"),
            vec![
                (1, "Unexpected character.".to_string()),
                (2, "Unexpected character.".to_string()),
                (2, "Unexpected character.".to_string()),
            ]
        );
        assert!(diagnostics
            .iter()
            .all(|d| d.code == Some(ErrorCode::UNEXPECTED_CHAR)));
    }

    #[test]
    fn test_non_ascii_character_is_one_error() {
        let (tokens, diagnostics) = scan_tokens("é+");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Plus);
        assert_eq!(tokens[0].lexeme, "+");
    }

    #[test]
    fn test_line_counting() {
        let (tokens, _) = scan_tokens("a\n\nb\r\n\tc\n");
        let lines: Vec<_> = tokens.iter().map(|t| (t.kind, t.line)).collect();
        assert_eq!(
            lines,
            vec![
                (TokenKind::Identifier, 1),
                (TokenKind::Identifier, 3),
                (TokenKind::Identifier, 4),
                (TokenKind::Eof, 5),
            ]
        );
    }

    #[test]
    fn test_empty_source() {
        let (tokens, diagnostics) = scan_tokens("");
        assert_eq!(tokens, vec![Token::eof(1)]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_custom_reporter() {
        struct Lines(Vec<u32>);

        impl Reporter for Lines {
            fn report(&mut self, line: u32, _message: &str) {
                self.0.push(line);
            }
        }

        let mut lines = Lines(Vec::new());
        let tokens = Scanner::new("1\n@\n\"open", &mut lines).scan_tokens();

        assert_eq!(lines.0, vec![2, 3]);
        assert_eq!(tokens.len(), 2);
    }
}
