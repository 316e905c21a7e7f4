//! Result types for the compilation pipeline.
//!
//! These are the interface between the pipeline and its consumers (the CLI,
//! tests). They carry everything needed to write outputs and report
//! diagnostics without exposing phase-internal types.

use weft_diagnostic::Diagnostic;

/// Which phase produced the error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPhase {
    /// Extension checks and the declaration pass.
    Parse,
    /// Signature parsing and name resolution.
    Resolve,
    /// Glue source generation.
    Codegen,
    /// Descriptor and linkage serialization.
    Emit,
}

/// The three generated documents, all computed in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    /// `<basename>.json`
    pub descriptor: String,
    /// `<basename>.cpp`
    pub source: String,
    /// `<basename>.linkage.json`
    pub linkage: String,
}

impl Artifacts {
    /// `(suffix, contents)` for each output file, in write order.
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (".json", &self.descriptor),
            (".cpp", &self.source),
            (".linkage.json", &self.linkage),
        ]
    }
}

/// Result of compiling a set of interface files.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// Whether every phase completed without errors.
    pub success: bool,
    /// Generated documents; `None` unless `success`.
    pub artifacts: Option<Artifacts>,
    /// Warnings from every phase, followed by the error if there was one.
    pub diagnostics: Vec<Diagnostic>,
    /// Which phase produced the error (if any).
    pub error_phase: Option<ErrorPhase>,
}

impl CompileOutput {
    pub(crate) fn failed(phase: ErrorPhase, mut diagnostics: Vec<Diagnostic>, error: Diagnostic) -> Self {
        diagnostics.push(error);
        CompileOutput {
            success: false,
            artifacts: None,
            diagnostics,
            error_phase: Some(phase),
        }
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.is_error()).count()
    }
}
