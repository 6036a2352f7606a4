//! lox-error - Diagnostics system for the Lox scanner
//!
//! This crate defines the error-report boundary between the scanner and
//! whoever consumes its errors, plus structures for rendering them in a
//! compiler-like style.
//!
//! # Example
//!
//! ```rust
//! use lox_error::{Diagnostic, DiagnosticRenderer, Diagnostics, ErrorCode, Reporter, SourceCache};
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add("example.lox", "var @ = 10;");
//!
//! let mut diagnostics = Diagnostics::new();
//! diagnostics.report_diagnostic(
//!     Diagnostic::error("Unexpected character.")
//!         .with_code(ErrorCode::UNEXPECTED_CHAR)
//!         .with_line(1),
//! );
//!
//! let renderer = DiagnosticRenderer::new(&cache, file_id);
//! println!("{}", diagnostics.render(&renderer));
//! ```

pub mod diagnostic;

pub use diagnostic::{Diagnostic, DiagnosticRenderer, ErrorCode, Level, SourceCache, SourceFile};

/// Receiver of recoverable errors found while scanning.
///
/// Implementors decide how to surface or aggregate reports; the caller
/// never stops on a report.
pub trait Reporter {
    /// Reports an error message at a 1-based line.
    fn report(&mut self, line: u32, message: &str);

    /// Reports a structured diagnostic. Defaults to [`Reporter::report`],
    /// dropping everything but the line and message.
    fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.report(diagnostic.line, &diagnostic.message);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, line: u32, message: &str) {
        (**self).report(line, message);
    }

    fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        (**self).report_diagnostic(diagnostic);
    }
}

/// Collection of diagnostics accumulated during a scan
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Renders all diagnostics
    pub fn render(&self, renderer: &DiagnosticRenderer<'_>) -> String {
        self.items
            .iter()
            .map(|d| renderer.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, line: u32, message: &str) {
        self.push(Diagnostic::error(message).with_line(line));
    }

    fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
