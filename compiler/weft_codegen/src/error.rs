//! Code generation errors.

use std::fmt;

use weft_diagnostic::{internal_error, Diagnostic, ErrorCode, Location};
use weft_ir::LineRef;

/// What went wrong while generating glue.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodegenErrorKind {
    /// A `void` value reached a marshalling rule.
    VoidMarshalled,
    /// A native function value would have to become a runtime closure.
    MethodWrapped,
    /// Reverse dispatch cannot return both an output parameter and a value.
    VirtualOutAndReturn { class: String, method: String },
    /// A class referenced during generation is missing from the registry.
    UnknownClass { name: String },
}

impl CodegenErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CodegenErrorKind::VoidMarshalled => ErrorCode::E2001,
            CodegenErrorKind::MethodWrapped => ErrorCode::E2002,
            CodegenErrorKind::VirtualOutAndReturn { .. } => ErrorCode::E2006,
            CodegenErrorKind::UnknownClass { .. } => ErrorCode::E9001,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CodegenErrorKind::VoidMarshalled => "cannot marshal a value of type `void`".to_owned(),
            CodegenErrorKind::MethodWrapped => {
                "cannot pass a native function value to the runtime".to_owned()
            }
            CodegenErrorKind::VirtualOutAndReturn { class, method } => format!(
                "virtual method `{class}::{method}` has both an `out` parameter and a return value"
            ),
            CodegenErrorKind::UnknownClass { name } => {
                format!("class `{name}` missing from the resolved registry")
            }
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            CodegenErrorKind::VoidMarshalled => {
                Some("`void` is only valid as a return type or as the sole argument")
            }
            CodegenErrorKind::MethodWrapped => {
                Some("method types may appear as arguments, not as results")
            }
            CodegenErrorKind::VirtualOutAndReturn { .. } => {
                Some("return the value through the `out` parameter and declare `-> void`")
            }
            CodegenErrorKind::UnknownClass { .. } => None,
        }
    }
}

/// A code generation error, located at the declaration that caused it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodegenError {
    pub kind: CodegenErrorKind,
    pub location: Option<Location>,
    /// What was being generated, e.g. "method glue for `Button::show`".
    pub context: Option<String>,
}

impl CodegenError {
    #[cold]
    pub fn new(kind: CodegenErrorKind) -> Self {
        CodegenError {
            kind,
            location: None,
            context: None,
        }
    }

    /// Attach the declaring line unless a more specific one is already set.
    #[must_use]
    pub fn at(mut self, line: &LineRef) -> Self {
        if self.location.is_none() {
            self.location = Some(Location::from(line));
        }
        self
    }

    /// Attach context unless already set; the innermost context wins.
    #[must_use]
    pub fn while_generating(mut self, context: impl Into<String>) -> Self {
        if self.context.is_none() {
            self.context = Some(context.into());
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.error_code()
    }

    /// Convert to a diagnostic for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = if self.code().is_internal_error() {
            internal_error(self.kind.message())
        } else {
            Diagnostic::error(self.code()).with_message(self.kind.message())
        };
        if let Some(location) = &self.location {
            diag = diag.with_location(location.clone());
        }
        if let Some(context) = &self.context {
            diag = diag.with_note(format!("while generating {context}"));
        }
        if let Some(hint) = self.kind.hint() {
            diag = diag.with_suggestion(hint);
        }
        diag
    }
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for CodegenError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_location_and_context_win() {
        let inner = LineRef::new("ui.idl", 4, "  show: [](void, int) -> void;");
        let outer = LineRef::new("ui.idl", 1, "class A {");
        let err = CodegenError::new(CodegenErrorKind::VoidMarshalled)
            .at(&inner)
            .while_generating("method glue for `A::show`")
            .at(&outer)
            .while_generating("class `A`");

        assert_eq!(err.location.as_ref().map(|l| l.line), Some(4));
        assert_eq!(err.to_string(), "ui.idl:4: cannot marshal a value of type `void`");
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E2001);
        assert_eq!(diag.notes, vec!["while generating method glue for `A::show`".to_owned()]);
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_unknown_class_is_internal() {
        let diag = CodegenError::new(CodegenErrorKind::UnknownClass { name: "X".into() })
            .to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E9001);
        assert_eq!(diag.notes, vec!["this is a bug in the compiler".to_owned()]);
    }
}
