//! Parse error types.
//!
//! A [`ParseError`] pairs a structured [`ParseErrorKind`] with the span it
//! applies to and, once known, the source line it came from. Errors raised by
//! the signature parser start out with spans relative to the declaration text;
//! [`ParseError::in_member`] moves them onto the full source line.

use std::fmt;

use weft_diagnostic::{Diagnostic, ErrorCode, Location};
use weft_ir::{LineRef, RawMember, Span};

/// Structured parse error kinds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Input file does not end in `.idl` or `.ts`.
    WrongExtension { path: String },
    /// Top-level line that is not a recognised declaration.
    BadDeclarationStart,
    /// `class` line without a name or without `{`.
    MalformedClassStart,
    /// `(` with no matching `)`.
    UnterminatedArgs,
    /// Method type without `->` directly after its argument list.
    MissingArrow,
    UnexpectedToken { found: String },
    /// Member line without a `name:` prefix.
    MalformedMember,
    DuplicateOut,
    /// Nothing where a type was expected.
    EmptyType,
    /// Reference to a class no input file declares.
    UnknownType { name: String },
    /// Member or constructor whose type is not a method type.
    NotAMethod { member: String, found: String },
    PureVirtualNotExtensible { class: String, method: String },
}

impl ParseErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ParseErrorKind::WrongExtension { .. } => ErrorCode::E1001,
            ParseErrorKind::BadDeclarationStart => ErrorCode::E1002,
            ParseErrorKind::MalformedClassStart => ErrorCode::E1003,
            ParseErrorKind::UnterminatedArgs => ErrorCode::E1004,
            ParseErrorKind::MissingArrow => ErrorCode::E1005,
            ParseErrorKind::UnexpectedToken { .. } => ErrorCode::E1006,
            ParseErrorKind::MalformedMember => ErrorCode::E1007,
            ParseErrorKind::DuplicateOut => ErrorCode::E1008,
            ParseErrorKind::EmptyType => ErrorCode::E1009,
            ParseErrorKind::UnknownType { .. } => ErrorCode::E2003,
            ParseErrorKind::NotAMethod { .. } => ErrorCode::E2004,
            ParseErrorKind::PureVirtualNotExtensible { .. } => ErrorCode::E2005,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParseErrorKind::WrongExtension { path } => {
                format!("`{path}` is not an .idl or .ts file")
            }
            ParseErrorKind::BadDeclarationStart => "bad declaration start".to_owned(),
            ParseErrorKind::MalformedClassStart => "malformed class declaration".to_owned(),
            ParseErrorKind::UnterminatedArgs => "unterminated argument list".to_owned(),
            ParseErrorKind::MissingArrow => "expected `->` after argument list".to_owned(),
            ParseErrorKind::UnexpectedToken { found } if found.is_empty() => {
                "unexpected end of type expression".to_owned()
            }
            ParseErrorKind::UnexpectedToken { found } => {
                format!("unexpected `{found}` in type expression")
            }
            ParseErrorKind::MalformedMember => "malformed member declaration".to_owned(),
            ParseErrorKind::DuplicateOut => "more than one `out` parameter".to_owned(),
            ParseErrorKind::EmptyType => "expected a type".to_owned(),
            ParseErrorKind::UnknownType { name } => format!("unknown type `{name}`"),
            ParseErrorKind::NotAMethod { member, found } => {
                format!("`{member}` must have a method type, found `{found}`")
            }
            ParseErrorKind::PureVirtualNotExtensible { class, method } => format!(
                "class `{class}` declares pure virtual method `{method}` but is not extensible"
            ),
        }
    }

    /// Text for the label under the offending fragment.
    pub fn label(&self) -> &'static str {
        match self {
            ParseErrorKind::WrongExtension { .. } => "unsupported file",
            ParseErrorKind::BadDeclarationStart => "not a declaration",
            ParseErrorKind::MalformedClassStart => "expected `class Name {`",
            ParseErrorKind::UnterminatedArgs => "this `(` is never closed",
            ParseErrorKind::MissingArrow => "expected `->` here",
            ParseErrorKind::UnexpectedToken { .. } => "unexpected token",
            ParseErrorKind::MalformedMember => "expected `name: type;`",
            ParseErrorKind::DuplicateOut => "second `out` parameter",
            ParseErrorKind::EmptyType => "expected a type here",
            ParseErrorKind::UnknownType { .. } => "not a declared class",
            ParseErrorKind::NotAMethod { .. } => "not a method type",
            ParseErrorKind::PureVirtualNotExtensible { .. } => "pure virtual here",
        }
    }

    /// Actionable hint, when there is one.
    pub fn hint(&self) -> Option<String> {
        match self {
            ParseErrorKind::WrongExtension { .. } => {
                Some("pass interface files ending in `.idl` or `.ts`".to_owned())
            }
            ParseErrorKind::BadDeclarationStart => Some(
                "top-level lines must start a class, an include, a `using namespace` or `inline:`"
                    .to_owned(),
            ),
            ParseErrorKind::MissingArrow => {
                Some("method types are written `[](args) -> ret`".to_owned())
            }
            ParseErrorKind::MalformedMember | ParseErrorKind::NotAMethod { .. } => {
                Some("members are written `name: [](args) -> ret;`".to_owned())
            }
            ParseErrorKind::UnknownType { name } => Some(format!(
                "declare `class {name} {{ ... }}` in one of the input files"
            )),
            ParseErrorKind::PureVirtualNotExtensible { .. } => {
                Some("add `deriving Wrappable;` to the class body".to_owned())
            }
            ParseErrorKind::MalformedClassStart
            | ParseErrorKind::UnterminatedArgs
            | ParseErrorKind::UnexpectedToken { .. }
            | ParseErrorKind::DuplicateOut
            | ParseErrorKind::EmptyType => None,
        }
    }
}

/// A parse error with its location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Span within the location's line (or declaration, before
    /// [`ParseError::in_member`]).
    pub span: Span,
    pub location: Option<Location>,
    /// What was being parsed, e.g. "argument 2 of `show`".
    pub context: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError {
            kind,
            span,
            location: None,
            context: None,
        }
    }

    /// Error on a specific source line.
    #[cold]
    pub fn at_line(kind: ParseErrorKind, span: Span, line: &LineRef) -> Self {
        ParseError::new(kind, span).with_location(line)
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Place an error raised while parsing `member.decl` onto its source line.
    #[must_use]
    pub fn in_member(mut self, member: &RawMember) -> Self {
        self.span = member.line_span(self.span);
        self.with_location(&member.origin)
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.error_code()
    }

    /// Convert to a diagnostic for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.kind.message());

        if let Some(location) = &self.location {
            diag = diag.with_location(location.clone());
            if location.source.is_some() {
                diag = diag.with_label(self.span, self.kind.label());
            }
        }
        if let Some(context) = &self.context {
            diag = diag.with_note(format!("while parsing {context}"));
        }
        if let Some(hint) = self.kind.hint() {
            diag = diag.with_suggestion(hint);
        }
        diag
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_member_shifts_span() {
        let member = RawMember {
            decl: "show: [](Foo) -> void;".into(),
            indent: 4,
            origin: LineRef::new("ui.idl", 3, "    show: [](Foo) -> void;"),
        };
        let err = ParseError::new(
            ParseErrorKind::UnknownType { name: "Foo".into() },
            Span::new(9, 12),
        )
        .in_member(&member);

        assert_eq!(err.span, Span::new(13, 16));
        assert_eq!(err.to_string(), "ui.idl:3: unknown type `Foo`");
    }

    #[test]
    fn test_to_diagnostic_carries_everything() {
        let line = LineRef::new("ui.idl", 3, "class {");
        let diag = ParseError::at_line(ParseErrorKind::MalformedClassStart, Span::new(0, 7), &line)
            .with_context("class `Button`")
            .to_diagnostic();

        assert_eq!(diag.code, ErrorCode::E1003);
        assert_eq!(diag.primary_span(), Some(Span::new(0, 7)));
        assert_eq!(diag.notes, vec!["while parsing class `Button`".to_owned()]);
        assert_eq!(diag.location.map(|l| l.line), Some(3));
    }

    #[test]
    fn test_whole_file_error_has_no_label() {
        let diag = ParseError::new(
            ParseErrorKind::WrongExtension {
                path: "a.txt".into(),
            },
            Span::DUMMY,
        )
        .with_location(Location::file("a.txt"))
        .to_diagnostic();

        assert!(diag.labels.is_empty());
        assert_eq!(diag.code, ErrorCode::E1001);
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_every_kind_maps_to_an_error_code() {
        let kinds = [
            ParseErrorKind::BadDeclarationStart,
            ParseErrorKind::UnterminatedArgs,
            ParseErrorKind::MissingArrow,
            ParseErrorKind::MalformedMember,
            ParseErrorKind::DuplicateOut,
            ParseErrorKind::EmptyType,
        ];
        for kind in kinds {
            assert!(kind.error_code().as_str().starts_with("E1"), "{kind:?}");
        }
        assert_eq!(
            ParseErrorKind::UnknownType { name: "X".into() }.error_code(),
            ErrorCode::E2003
        );
    }
}
