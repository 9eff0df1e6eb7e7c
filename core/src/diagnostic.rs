//! Diagnostic model shared by compilation, validation and resolution.
//!
//! Every stage of the pipeline reports problems as [`Diagnostic`] values and
//! appends them to a flat `Vec<Diagnostic>`. Nothing short-circuits on a
//! diagnostic except an unrecoverable parse or resolution failure, so a single
//! pass reports as many problems as it can find.
//!
//! Positions are 1-indexed, matching what the HCL parser reports. Consumers
//! that need zero-indexed positions (editors, the CLI) convert at their
//! boundary.
//!
//! # Examples
//!
//! ```
//! use hcl_schema_core::{Diagnostic, DiagnosticsExt, Severity};
//!
//! let diags = vec![
//!     Diagnostic::warning("Unused schema id"),
//!     Diagnostic::error("Unsupported argument")
//!         .with_detail("An argument named \"extra\" is not expected here."),
//! ];
//! assert!(diags.has_errors());
//! assert_eq!(diags[1].severity, Severity::Error);
//! assert_eq!(
//!     diags[1].message(),
//!     "Unsupported argument: An argument named \"extra\" is not expected here."
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The document (or schema) is invalid, or could not be checked.
    Error,
    /// Suspicious but not invalid.
    Warning,
    /// Informational only.
    Info,
}

impl Severity {
    /// Returns the lowercase label used in machine-readable output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-indexed line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column, counted in characters.
    pub column: usize,
}

impl Position {
    /// Creates a position from 1-indexed line and column numbers.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A span of source text in a named file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// File the range belongs to.
    pub filename: String,
    /// Inclusive start position.
    pub start: Position,
    /// Exclusive end position.
    pub end: Position,
}

impl SourceRange {
    /// Creates a zero-width range at `position`.
    pub fn point(filename: impl Into<String>, position: Position) -> Self {
        Self {
            filename: filename.into(),
            start: position,
            end: position,
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{},{}",
            self.filename, self.start.line, self.start.column
        )
    }
}

/// A structured report of a parse, compile, validation or resolution problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the condition.
    pub severity: Severity,
    /// Short, stable description (e.g. `"Unsupported argument"`).
    pub summary: String,
    /// Longer explanation, if any.
    pub detail: Option<String>,
    /// Source range the diagnostic refers to, if it has one.
    pub subject: Option<SourceRange>,
}

impl Diagnostic {
    /// Creates a diagnostic with the given severity and summary.
    pub fn new(severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: None,
            subject: None,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(summary: impl Into<String>) -> Self {
        Self::new(Severity::Error, summary)
    }

    /// Creates a warning diagnostic.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self::new(Severity::Warning, summary)
    }

    /// Attaches a detail message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attaches (or clears) the subject range.
    pub fn with_subject(mut self, subject: Option<SourceRange>) -> Self {
        self.subject = subject;
        self
    }

    /// Returns `true` for error-severity diagnostics.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Combines summary and detail into a single line: `summary: detail`,
    /// or whichever of the two is present.
    pub fn message(&self) -> String {
        match (self.summary.is_empty(), self.detail.as_deref()) {
            (false, Some(detail)) if !detail.is_empty() => {
                format!("{}: {detail}", self.summary)
            }
            (true, Some(detail)) => detail.to_string(),
            _ => self.summary.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(subject) = &self.subject {
            write!(
                f,
                "{}:{}:{}: ",
                subject.filename, subject.start.line, subject.start.column
            )?;
        }
        write!(f, "{}: {}", self.severity, self.message())
    }
}

/// Convenience queries over a collection of diagnostics.
pub trait DiagnosticsExt {
    /// Returns `true` if any diagnostic has error severity.
    fn has_errors(&self) -> bool;

    /// Counts error-severity diagnostics.
    fn error_count(&self) -> usize;
}

impl DiagnosticsExt for [Diagnostic] {
    fn has_errors(&self) -> bool {
        self.iter().any(Diagnostic::is_error)
    }

    fn error_count(&self) -> usize {
        self.iter().filter(|d| d.is_error()).count()
    }
}

impl DiagnosticsExt for Vec<Diagnostic> {
    fn has_errors(&self) -> bool {
        self.as_slice().has_errors()
    }

    fn error_count(&self) -> usize {
        self.as_slice().error_count()
    }
}
