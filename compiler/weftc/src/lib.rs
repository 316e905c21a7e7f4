//! Weft compiler CLI.
//!
//! Argument handling, file IO and logging setup around
//! [`weft_compiler::compile`]. Outputs are only written once every artifact
//! has been generated and staged in a temporary file next to its target.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

use tempfile::NamedTempFile;
use tracing::{debug, info};
use weft_compiler::{compile, render_diagnostics, Artifacts, CompileConfig, SourceFile};
use weft_diagnostic::emitter::ColorMode;
use weft_diagnostic::{io_error, missing_arguments, Diagnostic, ErrorCode};

pub const USAGE: &str = "\
Usage: weftc [options] <basename> <file.idl|file.ts>...

Options:
  --root=<Name>        Root aggregate name (default: NativeLib)
  --hook-type=<Name>   Platform result hook argument type (default: Application)
  --color=<mode>       auto, always or never (default: auto)
  -h, --help           Print this message

Writes <basename>.json, <basename>.cpp and <basename>.linkage.json.";

/// Exit status for usage errors.
pub const EXIT_USAGE: i32 = 2;

/// Exit status when compilation or IO fails.
pub const EXIT_FAILURE: i32 = 1;

/// Parsed command line.
#[derive(Clone, Debug)]
pub struct Options {
    /// Output path prefix; each artifact appends its own suffix.
    pub basename: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub config: CompileConfig,
    pub color: ColorMode,
}

#[derive(Clone, Debug)]
pub enum Command {
    Help,
    Compile(Options),
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Command, Diagnostic> {
    let mut config = CompileConfig::default();
    let mut color = ColorMode::Auto;
    let mut positional = Vec::new();

    for arg in args {
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        } else if let Some(root) = arg.strip_prefix("--root=") {
            config.root_name = non_empty(arg, root)?;
        } else if let Some(hook) = arg.strip_prefix("--hook-type=") {
            config.hook_type = non_empty(arg, hook)?;
        } else if let Some(mode) = arg.strip_prefix("--color=") {
            color = ColorMode::parse(mode).ok_or_else(|| bad_option(arg))?;
        } else if arg.starts_with('-') {
            return Err(bad_option(arg));
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    if positional.len() < 2 {
        return Err(missing_arguments(USAGE));
    }
    let basename = positional.remove(0);
    Ok(Command::Compile(Options {
        basename,
        inputs: positional,
        config,
        color,
    }))
}

fn non_empty(arg: &str, value: &str) -> Result<String, Diagnostic> {
    if value.is_empty() {
        return Err(bad_option(arg));
    }
    Ok(value.to_owned())
}

#[cold]
fn bad_option(arg: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0001)
        .with_message(format!("unrecognized option `{arg}`"))
        .with_note(USAGE)
}

/// Compile the inputs and write the outputs; returns the exit status.
///
/// Diagnostics, warnings included, are rendered to `stderr`. `is_tty` says
/// whether `stderr` is a terminal, for `--color=auto`.
pub fn run(options: &Options, stderr: &mut impl Write, is_tty: bool) -> i32 {
    let report = |stderr: &mut dyn Write, diagnostics: &[Diagnostic]| {
        let rendered = render_diagnostics(diagnostics, options.color, is_tty);
        let _ = stderr.write_all(rendered.as_bytes());
    };

    let files = match read_inputs(&options.inputs) {
        Ok(files) => files,
        Err(diag) => {
            report(stderr, &[diag]);
            return EXIT_FAILURE;
        }
    };

    let output = compile(&files, &options.config);
    report(stderr, &output.diagnostics);
    let warnings = output.warning_count();
    let Some(artifacts) = output.artifacts.filter(|_| output.success) else {
        return EXIT_FAILURE;
    };

    match write_outputs(&options.basename, &artifacts) {
        Ok(()) => {
            info!(basename = %options.basename.display(), warnings, "wrote artifacts");
            0
        }
        Err(diag) => {
            report(stderr, &[diag]);
            EXIT_FAILURE
        }
    }
}

fn read_inputs(paths: &[PathBuf]) -> Result<Vec<SourceFile>, Diagnostic> {
    paths
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "reading input");
            fs::read_to_string(path)
                .map(|text| SourceFile::new(path.display().to_string(), text))
                .map_err(|e| io_error(ErrorCode::E0002, path, &e))
        })
        .collect()
}

/// `<basename><suffix>` for each artifact.
pub fn output_path(basename: &Path, suffix: &str) -> PathBuf {
    let mut name = basename.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn write_outputs(basename: &Path, artifacts: &Artifacts) -> Result<(), Diagnostic> {
    let files: Vec<(PathBuf, &str)> = artifacts
        .files()
        .into_iter()
        .map(|(suffix, contents)| (output_path(basename, suffix), contents))
        .collect();
    write_all_or_nothing(&files)
}

/// Stage every file in a temporary file beside its target, then rename them
/// all into place.
///
/// A failure while staging leaves every target untouched; the staged files
/// are removed when dropped.
fn write_all_or_nothing(files: &[(PathBuf, &str)]) -> Result<(), Diagnostic> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let tmp = stage(path, contents).map_err(|e| io_error(ErrorCode::E0003, path, &e))?;
        staged.push((tmp, path));
    }
    for (tmp, path) in staged {
        tmp.persist(path)
            .map_err(|e| io_error(ErrorCode::E0003, path, &e.error))?;
        debug!(path = %path.display(), "wrote output");
    }
    Ok(())
}

fn stage(path: &Path, contents: &str) -> io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`, if it is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
