//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the failure class.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates class:
/// - E0xxx: Usage and I/O errors
/// - E1xxx: Lexical errors (declaration and signature syntax)
/// - E2xxx: Semantic errors (types, marshalling, class modifiers)
/// - E9xxx: Internal compiler errors
///
/// Warnings use the W prefix with the same class digits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Usage / IO Errors (E0xxx)
    /// Missing command-line arguments
    E0001,
    /// Input file could not be read
    E0002,
    /// Output file could not be written
    E0003,

    // Lexical Errors (E1xxx)
    /// Input file has an unsupported extension
    E1001,
    /// Line is not a valid top-level declaration
    E1002,
    /// Malformed `class` declaration line
    E1003,
    /// Argument list is never closed
    E1004,
    /// Method type has no `->` after its argument list
    E1005,
    /// Unexpected token in a type expression
    E1006,
    /// Member declaration has no `name:` prefix
    E1007,
    /// More than one `out` parameter
    E1008,
    /// Empty type expression
    E1009,

    // Semantic Errors (E2xxx)
    /// A `void` value would be marshalled
    E2001,
    /// A native function value would be wrapped for managed code
    E2002,
    /// Type name is not a declared class
    E2003,
    /// Member or constructor is not a method type
    E2004,
    /// Pure virtual method on a class that is not extensible
    E2005,
    /// Reverse-dispatched method has both an out parameter and a return value
    E2006,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,

    // Warnings (Wxxx)
    /// Class body still open at end of file
    W1001,
    /// Class declared more than once
    W2001,
    /// Method declared more than once in a class
    W2002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// Kept in sync with `as_str()` which is exhaustive (Rust match enforces it).
    pub const ALL: &[ErrorCode] = &[
        // Usage / IO
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        // Lexical
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E1009,
        // Semantic
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        // Internal
        ErrorCode::E9001,
        // Warnings
        ErrorCode::W1001,
        ErrorCode::W2001,
        ErrorCode::W2002,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E9001 => "E9001",
            ErrorCode::W1001 => "W1001",
            ErrorCode::W2001 => "W2001",
            ErrorCode::W2002 => "W2002",
        }
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }

    /// Check if this is a warning code (Wxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W1001 | ErrorCode::W2001 | ErrorCode::W2002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
