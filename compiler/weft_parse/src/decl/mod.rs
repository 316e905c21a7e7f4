//! Declaration pass.
//!
//! Walks the lines of each input file and records class shapes, includes and
//! inline glue. Member lines are kept as raw text; their signatures are parsed
//! by [`crate::resolve`] once every class name is known.

use tracing::{debug, trace, warn};
use weft_diagnostic::{Diagnostic, ErrorCode, Location};
use weft_ir::{CastSource, ClassFlags, ClassShape, LineRef, RawMember, ShapeRegistry, Span};

use crate::{ParseError, ParseErrorKind};

/// File extensions accepted as interface files.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["idl", "ts"];

const CLASS_KEYWORD: &str = "class";
const INLINE_MARKER: &str = "inline:";
const NO_CONSTRUCTOR: &str = "noconstructor;";
const EXTENSIBLE: &str = "deriving Wrappable;";
const CAST_PREFIX: &str = "cast from ";

/// Everything the declaration pass collects across the input files.
#[derive(Clone, Debug, Default)]
pub struct Declarations {
    pub shapes: ShapeRegistry,
    /// `#include` and `using namespace` lines, verbatim.
    pub includes: Vec<String>,
    /// Lines following an `inline:` marker, verbatim.
    pub inline_glue: Vec<String>,
    pub warnings: Vec<Diagnostic>,
}

/// Outcome of scanning one line at top level or inside a class body.
enum Flow {
    Continue,
    /// An `inline:` marker; the rest of the file is glue.
    Inline,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the extension, then run the declaration pass over `text`.
    pub fn parse_file(&mut self, path: &str, text: &str) -> Result<(), ParseError> {
        check_extension(path)?;
        debug!(file = path, "declaration pass");

        let mut lines = text.lines().zip(1u32..);
        while let Some((line, number)) = lines.next() {
            let origin = || LineRef::new(path, number, line);
            let trimmed = line.trim();

            if is_class_start(trimmed) {
                let (shape, open) = parse_class_header(line, &origin())?;
                if !open {
                    self.register(shape);
                    continue;
                }
                if let Flow::Inline = self.parse_class_body(shape, path, &mut lines)? {
                    self.inline_glue
                        .extend(lines.by_ref().map(|(l, _)| l.to_owned()));
                }
                continue;
            }

            match self.top_level_line(line, trimmed) {
                Some(Flow::Continue) => {}
                Some(Flow::Inline) => {
                    self.inline_glue
                        .extend(lines.by_ref().map(|(l, _)| l.to_owned()));
                }
                None => {
                    let start = line.len() - line.trim_start().len();
                    return Err(ParseError::at_line(
                        ParseErrorKind::BadDeclarationStart,
                        Span::from_range(start..start + trimmed.len()),
                        &origin(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Lines that mean the same inside and outside a class body. `None` if
    /// the line is none of them.
    fn top_level_line(&mut self, line: &str, trimmed: &str) -> Option<Flow> {
        if trimmed.is_empty() || trimmed.starts_with("//") {
            return Some(Flow::Continue);
        }
        if trimmed.starts_with("#include") || trimmed.starts_with("using namespace ") {
            self.includes.push(line.to_owned());
            return Some(Flow::Continue);
        }
        if trimmed.starts_with(INLINE_MARKER) {
            return Some(Flow::Inline);
        }
        None
    }

    fn parse_class_body<'a>(
        &mut self,
        mut shape: ClassShape,
        path: &str,
        lines: &mut impl Iterator<Item = (&'a str, u32)>,
    ) -> Result<Flow, ParseError> {
        for (line, number) in lines.by_ref() {
            let trimmed = line.trim();
            if trimmed == "}" {
                self.register(shape);
                return Ok(Flow::Continue);
            }

            if trimmed == NO_CONSTRUCTOR {
                shape.flags |= ClassFlags::NO_CONSTRUCTOR;
                continue;
            }
            if trimmed == EXTENSIBLE {
                shape.flags |= ClassFlags::EXTENSIBLE;
                continue;
            }
            if trimmed.starts_with(CAST_PREFIX) {
                let origin = LineRef::new(path, number, line);
                shape.casts.extend(parse_cast_list(&origin));
                continue;
            }

            match self.top_level_line(line, trimmed) {
                Some(Flow::Continue) => {}
                Some(Flow::Inline) => {
                    self.register(shape);
                    return Ok(Flow::Inline);
                }
                None => shape.members.push(RawMember {
                    decl: trimmed.to_owned(),
                    indent: indent_of(line),
                    origin: LineRef::new(path, number, line),
                }),
            }
        }

        let origin = shape.origin.clone();
        let name = shape.name.clone();
        self.warn(
            Diagnostic::warning(ErrorCode::W1001)
                .with_message(format!("class `{name}` is not closed before end of file"))
                .with_location(&origin)
                .with_label(Span::from_range(0..origin.text.trim_end().len()), "class opened here")
                .with_suggestion("add a line containing only `}`"),
        );
        self.register(shape);
        Ok(Flow::Continue)
    }

    /// Add a class, replacing and reporting any earlier declaration.
    fn register(&mut self, shape: ClassShape) {
        trace!(class = %shape.name, members = shape.members.len(), "class declared");
        let name = shape.name.clone();
        let origin = shape.origin.clone();
        if let Some(previous) = self.shapes.insert(shape) {
            let prior = Location::from(&previous.origin);
            self.warn(
                Diagnostic::warning(ErrorCode::W2001)
                    .with_message(format!("class `{name}` is declared more than once"))
                    .with_location(&origin)
                    .with_label(name_span(&origin.text, &name), "this declaration replaces the earlier one")
                    .with_note(format!("previous declaration at {prior}")),
            );
        }
    }

    fn warn(&mut self, diagnostic: Diagnostic) {
        warn!(code = %diagnostic.code, "{}", diagnostic.message);
        self.warnings.push(diagnostic);
    }
}

fn check_extension(path: &str) -> Result<(), ParseError> {
    let supported = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
    if supported {
        return Ok(());
    }
    Err(ParseError::new(
        ParseErrorKind::WrongExtension {
            path: path.to_owned(),
        },
        Span::DUMMY,
    )
    .with_location(Location::file(path)))
}

fn is_class_start(trimmed: &str) -> bool {
    trimmed
        .strip_prefix(CLASS_KEYWORD)
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

fn indent_of(line: &str) -> u32 {
    u32::try_from(line.len() - line.trim_start().len()).unwrap_or(u32::MAX)
}

/// Span of the class name in a `class Name {` line.
fn name_span(text: &str, name: &str) -> Span {
    let after_keyword = text.find(CLASS_KEYWORD).map_or(0, |i| i + CLASS_KEYWORD.len());
    text[after_keyword..]
        .find(name)
        .map_or(Span::DUMMY, |i| {
            let start = after_keyword + i;
            Span::from_range(start..start + name.len())
        })
}

/// Parse `class Name {`. Returns the shape and whether the body is still open
/// (`class Name { }` on one line is an empty class).
fn parse_class_header(line: &str, origin: &LineRef) -> Result<(ClassShape, bool), ParseError> {
    let malformed = || {
        let start = line.len() - line.trim_start().len();
        ParseError::at_line(
            ParseErrorKind::MalformedClassStart,
            Span::from_range(start..line.trim_end().len()),
            origin,
        )
    };

    let trimmed = line.trim();
    let rest = trimmed
        .strip_prefix(CLASS_KEYWORD)
        .ok_or_else(malformed)?;
    let (name, after) = rest.split_once('{').ok_or_else(malformed)?;
    let name = name.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    if !valid {
        return Err(malformed());
    }

    let open = match after.trim() {
        "" => true,
        "}" | "};" => false,
        _ => return Err(malformed()),
    };
    Ok((ClassShape::new(name, origin.clone()), open))
}

/// Parse `cast from A, B*, C;` into its source names with their spans.
fn parse_cast_list(origin: &LineRef) -> Vec<CastSource> {
    let line = origin.text.as_str();
    let Some(list_start) = line.find(CAST_PREFIX).map(|i| i + CAST_PREFIX.len()) else {
        return Vec::new();
    };
    let list = &line[list_start..];
    let list = list.find(';').map_or(list, |end| &list[..end]);

    let mut sources = Vec::new();
    let mut cursor = list_start;
    for piece in list.split(',') {
        let leading = piece.len() - piece.trim_start().len();
        let name = piece.trim().trim_end_matches('*').trim_end();
        if !name.is_empty() {
            let start = cursor + leading;
            sources.push(CastSource {
                name: name.to_owned(),
                span: Span::from_range(start..start + name.len()),
                origin: origin.clone(),
            });
        }
        cursor += piece.len() + 1;
    }
    sources
}
