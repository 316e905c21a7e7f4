//! Weft compiler driver.
//!
//! Runs the whole pipeline over in-memory sources and returns the generated
//! artifacts plus diagnostics. IO lives in `weftc`.
//!
//! # Architecture
//!
//! ```text
//! weft_ir, weft_diagnostic, weft_parse, weft_codegen
//!                      ↓
//!               weft_compiler  ← this crate
//!                      ↓
//!                    weftc
//! ```

mod artifacts;
mod output;
mod pipeline;

pub use artifacts::{linkage, type_descriptor, Global, Indirection, Linkage};
pub use output::{Artifacts, CompileOutput, ErrorPhase};
pub use pipeline::{compile, CompilationUnit, CompileConfig, SourceFile};

use weft_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use weft_diagnostic::Diagnostic;

/// Render diagnostics to a string.
///
/// Diagnostics carry their own source line, so no source map is needed.
/// `is_tty` describes the final destination and decides [`ColorMode::Auto`].
pub fn render_diagnostics(diagnostics: &[Diagnostic], color: ColorMode, is_tty: bool) -> String {
    let mut buf = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut buf, color, is_tty);
        emitter.emit_all(diagnostics);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
