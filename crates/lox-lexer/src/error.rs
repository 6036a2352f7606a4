//! Recoverable errors raised while scanning

use lox_error::{Diagnostic, ErrorCode};
use thiserror::Error;

/// An error local to one lexeme. None of these stop the scan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// A character that starts no token
    #[error("Unexpected character.")]
    UnexpectedCharacter { line: u32, ch: char },

    /// A `"` with no closing `"` before end of input
    #[error("Unterminated string.")]
    UnterminatedString { line: u32 },

    /// A digit run that does not parse as a float
    #[error("Invalid number.")]
    InvalidNumber { line: u32, lexeme: String },
}

impl ScanError {
    /// Line the error is reported at
    pub fn line(&self) -> u32 {
        match self {
            ScanError::UnexpectedCharacter { line, .. }
            | ScanError::UnterminatedString { line }
            | ScanError::InvalidNumber { line, .. } => *line,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ScanError::UnexpectedCharacter { .. } => ErrorCode::UNEXPECTED_CHAR,
            ScanError::UnterminatedString { .. } => ErrorCode::UNTERMINATED_STRING,
            ScanError::InvalidNumber { .. } => ErrorCode::INVALID_NUMBER,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string())
            .with_code(self.code())
            .with_line(self.line());

        match self {
            ScanError::UnexpectedCharacter { ch, .. } => {
                diagnostic.with_note(format!("found {:?}, which starts no token", ch))
            }
            ScanError::UnterminatedString { .. } => {
                diagnostic.with_help("add a closing `\"` to end the string")
            }
            ScanError::InvalidNumber { lexeme, .. } => {
                diagnostic.with_note(format!("could not convert `{}` to a number", lexeme))
            }
        }
    }
}

impl From<ScanError> for Diagnostic {
    fn from(error: ScanError) -> Self {
        error.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes() {
        let unexpected = ScanError::UnexpectedCharacter { line: 2, ch: '@' };
        assert_eq!(unexpected.to_string(), "Unexpected character.");
        assert_eq!(unexpected.line(), 2);
        assert_eq!(unexpected.code(), ErrorCode::UNEXPECTED_CHAR);

        let unterminated = ScanError::UnterminatedString { line: 5 };
        assert_eq!(unterminated.to_string(), "Unterminated string.");
        assert_eq!(unterminated.code().to_string(), "EL002");
    }

    #[test]
    fn test_into_diagnostic() {
        let diagnostic: Diagnostic = ScanError::UnexpectedCharacter { line: 3, ch: '#' }.into();

        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.line, 3);
        assert_eq!(diagnostic.message, "Unexpected character.");
        assert_eq!(diagnostic.code, Some(ErrorCode::UNEXPECTED_CHAR));
        assert_eq!(diagnostic.notes, vec!["found '#', which starts no token".to_string()]);
    }
}
