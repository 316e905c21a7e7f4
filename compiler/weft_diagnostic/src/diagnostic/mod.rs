//! Core diagnostic types for structured error reporting.
//!
//! Defines [`Diagnostic`], [`Label`], [`Severity`] and [`Location`], the
//! building blocks every compiler phase uses to report errors and warnings.

use std::fmt;
use std::path::Path;

use weft_ir::{LineRef, Span};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The source line a diagnostic is about.
///
/// Declarations are line-oriented, so a single line is all an emitter needs
/// to render a snippet.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    pub file: String,
    /// 1-based line number; 0 when the diagnostic is about the whole file.
    pub line: u32,
    /// Text of the line, if known.
    pub source: Option<String>,
}

impl Location {
    /// A whole-file location with no snippet.
    pub fn file(path: impl Into<String>) -> Self {
        Location {
            file: path.into(),
            line: 0,
            source: None,
        }
    }
}

impl From<&LineRef> for Location {
    fn from(line: &LineRef) -> Self {
        Location {
            file: line.file.clone(),
            line: line.line,
            source: Some(line.text.clone()),
        }
    }
}

impl From<LineRef> for Location {
    fn from(line: LineRef) -> Self {
        Location {
            file: line.file,
            line: line.line,
            source: Some(line.text),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

/// A labeled span within the diagnostic's source line.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// Whether this is the primary error location.
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A rich diagnostic with all context needed for a good error message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    /// Where the problem is, when it is tied to a file.
    pub location: Option<Location>,
    /// Labeled spans within the location's line.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
    /// Text suggestions for fixing the error.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            location: None,
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        debug_assert!(!code.is_warning(), "{code} is a warning code");
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        debug_assert!(code.is_warning(), "{code} is not a warning code");
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the source location.
    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    /// Check if this is an error (vs warning).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        if let Some(location) = &self.location {
            write!(f, "\n  --> {location}")?;
        }

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

/// Create a "missing arguments" diagnostic carrying the usage text.
pub fn missing_arguments(usage: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0001)
        .with_message("missing required arguments")
        .with_note(usage.to_owned())
}

/// Create a diagnostic for a failed read (`E0002`) or write (`E0003`).
#[cold]
pub fn io_error(code: ErrorCode, path: &Path, err: &std::io::Error) -> Diagnostic {
    let verb = if code == ErrorCode::E0003 {
        "write"
    } else {
        "read"
    };
    Diagnostic::error(code)
        .with_message(format!("could not {verb} `{}`: {err}", path.display()))
        .with_location(Location::file(path.display().to_string()))
}

/// Create an internal compiler error.
#[cold]
pub fn internal_error(message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001)
        .with_message(message)
        .with_note("this is a bug in the compiler")
}
