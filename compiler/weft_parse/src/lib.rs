//! Parser for Weft interface files.
//!
//! Parsing runs in two passes so that class names can be referenced before
//! they are declared:
//!
//! 1. [`Declarations::parse_file`] walks each file's lines, recording class
//!    shapes (flags, cast sources, raw member text), includes and inline glue.
//! 2. [`resolve`] runs once every file has been through pass 1. Each raw
//!    member line goes through the signature parser and every class reference
//!    is checked against the registry.
//!
//! Type expressions are tokenised with `logos`; everything above that is
//! line-oriented.

mod decl;
mod error;
mod lexer;
mod resolve;
mod signature;

pub use decl::{Declarations, SUPPORTED_EXTENSIONS};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{lex, Token, TypeToken};
pub use resolve::resolve;
pub use signature::{parse_declaration, parse_type, DeclKind, Declaration, CONSTRUCTOR_SENTINEL};
