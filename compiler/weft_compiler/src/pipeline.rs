//! Core pipeline: declaration pass → resolve → generate → emit.
//!
//! No filesystem IO. Sources come in as [`SourceFile`]s, results come out as
//! a [`CompileOutput`]. All three artifacts are produced in memory; if any
//! phase fails none of them are returned.

use tracing::{debug, info};
use weft_codegen::{generate_source, GlueSource};
use weft_diagnostic::{internal_error, Diagnostic};
use weft_ir::{ClassRegistry, RootLayout};
use weft_parse::{resolve, Declarations, ParseError};

use crate::artifacts::{linkage, to_pretty_json, type_descriptor};
use crate::output::{Artifacts, CompileOutput, ErrorPhase};

/// Configuration for a compilation run.
#[derive(Clone, Debug)]
pub struct CompileConfig {
    /// Name of the root aggregate exported to the runtime.
    pub root_name: String,
    /// Argument type of the platform result hook.
    pub hook_type: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            root_name: "NativeLib".to_string(),
            hook_type: "Application".to_string(),
        }
    }
}

/// One input file.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Path as given; used in diagnostics and for the extension check.
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Accumulated state of one compilation: the declaration pass output across
/// every file added so far.
#[derive(Debug)]
pub struct CompilationUnit {
    config: CompileConfig,
    decls: Declarations,
}

impl CompilationUnit {
    pub fn new(config: CompileConfig) -> Self {
        CompilationUnit {
            config,
            decls: Declarations::new(),
        }
    }

    /// Run the declaration pass over one file.
    pub fn add_file(&mut self, file: &SourceFile) -> Result<(), ParseError> {
        self.decls.parse_file(&file.path, &file.text)
    }

    /// Warnings reported so far.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.decls.warnings
    }

    /// Resolve, generate and emit.
    pub fn finish(self) -> CompileOutput {
        let CompilationUnit { config, decls } = self;
        let Declarations {
            shapes,
            includes,
            inline_glue,
            mut warnings,
        } = decls;

        let classes = match resolve(shapes, &mut warnings) {
            Ok(classes) => classes,
            Err(e) => {
                return CompileOutput::failed(ErrorPhase::Resolve, warnings, e.to_diagnostic())
            }
        };
        let root = RootLayout::of(&classes, &config.root_name);

        let glue = GlueSource {
            classes: &classes,
            root: &root,
            includes: &includes,
            inline_glue: &inline_glue,
        };
        let source = match generate_source(&glue) {
            Ok(source) => source,
            Err(e) => {
                return CompileOutput::failed(ErrorPhase::Codegen, warnings, e.to_diagnostic())
            }
        };

        match emit_documents(&classes, &root, &config) {
            Ok((descriptor, linkage)) => {
                info!(classes = classes.len(), casts = root.casts().len(), "compiled");
                CompileOutput {
                    success: true,
                    artifacts: Some(Artifacts {
                        descriptor,
                        source,
                        linkage,
                    }),
                    diagnostics: warnings,
                    error_phase: None,
                }
            }
            Err(e) => CompileOutput::failed(
                ErrorPhase::Emit,
                warnings,
                internal_error(format!("could not serialize artifacts: {e}")),
            ),
        }
    }
}

fn emit_documents(
    classes: &ClassRegistry,
    root: &RootLayout,
    config: &CompileConfig,
) -> Result<(String, String), serde_json::Error> {
    debug!("emitting descriptors");
    let descriptor = to_pretty_json(&type_descriptor(classes, root, &config.hook_type))?;
    let linkage = to_pretty_json(&linkage(classes, root))?;
    Ok((descriptor, linkage))
}

/// Full pipeline over a set of files.
///
/// Every file goes through the declaration pass before any signature is
/// resolved, so classes may be referenced across files in any order.
pub fn compile(files: &[SourceFile], config: &CompileConfig) -> CompileOutput {
    let mut unit = CompilationUnit::new(config.clone());
    for file in files {
        if let Err(e) = unit.add_file(file) {
            let warnings = unit.warnings().to_vec();
            return CompileOutput::failed(ErrorPhase::Parse, warnings, e.to_diagnostic());
        }
    }
    unit.finish()
}
