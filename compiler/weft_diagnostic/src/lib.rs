//! Diagnostic system for rich error reporting.
//!
//! Every failure the compiler can report carries:
//! - An error code for searchability
//! - A clear message (what went wrong)
//! - The offending file, line and source text (where it went wrong)
//! - Labels pointing into that line, plus notes and suggestions
//!
//! Phase errors (`ParseError`, `CodegenError`) convert into [`Diagnostic`]s;
//! emitters render them.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{
    internal_error, io_error, missing_arguments, Diagnostic, Label, Location, Severity,
};
pub use error_code::ErrorCode;
