//! Signature resolution.
//!
//! Second pass over the declarations: every class name is now known, so member
//! signatures are parsed and every class reference checked. The result is a
//! [`ClassRegistry`], the only form code generation accepts.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};
use weft_diagnostic::{Diagnostic, ErrorCode};
use weft_ir::{
    ClassDecl, ClassRegistry, ClassShape, Method, MethodKind, RawMember, ShapeRegistry, Span,
    Type,
};

use crate::signature::{parse_declaration, DeclKind, Declaration};
use crate::{ParseError, ParseErrorKind};

/// Resolve every class shape into a [`ClassDecl`].
///
/// Redeclared members replace earlier ones and are reported into `warnings`.
/// Stops at the first error.
pub fn resolve(
    shapes: ShapeRegistry,
    warnings: &mut Vec<Diagnostic>,
) -> Result<ClassRegistry, ParseError> {
    let known: FxHashSet<String> = shapes.names().map(str::to_owned).collect();
    debug!(classes = known.len(), "resolving signatures");

    let mut resolver = Resolver {
        known: &known,
        warnings,
    };
    shapes.try_map(|shape| resolver.class(shape))
}

struct Resolver<'a> {
    known: &'a FxHashSet<String>,
    warnings: &'a mut Vec<Diagnostic>,
}

impl Resolver<'_> {
    fn class(&mut self, shape: ClassShape) -> Result<ClassDecl, ParseError> {
        let ClassShape {
            name,
            origin,
            flags,
            casts,
            members,
        } = shape;
        let mut class = ClassDecl::new(name, origin, flags);

        for cast in casts {
            if !self.known.contains(&cast.name) {
                return Err(ParseError::at_line(
                    ParseErrorKind::UnknownType { name: cast.name },
                    cast.span,
                    &cast.origin,
                )
                .with_context(format!("the casts of class `{}`", class.name)));
            }
            if !class.casts.contains(&cast.name) {
                class.casts.push(cast.name);
            }
        }

        for member in &members {
            self.member(&mut class, member)?;
        }

        Ok(class)
    }

    fn member(&mut self, class: &mut ClassDecl, member: &RawMember) -> Result<(), ParseError> {
        let decl = parse_declaration(&member.decl).map_err(|e| e.in_member(member))?;
        self.check_names(&decl, member)?;

        let Declaration {
            name,
            kind,
            ty,
            name_span,
            type_span,
        } = decl;
        let shown_name = match kind {
            DeclKind::Constructor => "constructor".to_owned(),
            DeclKind::Method(_) => name.clone(),
        };
        let ty = match ty {
            Type::Method(method) => method,
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::NotAMethod {
                        member: shown_name,
                        found: other.to_string(),
                    },
                    type_span,
                )
                .in_member(member))
            }
        };

        if kind == DeclKind::Method(MethodKind::PureVirtual) && !class.is_extensible() {
            return Err(ParseError::new(
                ParseErrorKind::PureVirtualNotExtensible {
                    class: class.name.clone(),
                    method: name,
                },
                name_span,
            )
            .in_member(member));
        }

        match kind {
            DeclKind::Constructor => {
                if class.ctor.replace(ty).is_some() {
                    self.redeclared(class, &shown_name, member, name_span);
                }
            }
            DeclKind::Method(kind) => {
                let method = Method {
                    name,
                    kind,
                    ty,
                    origin: member.origin.clone(),
                };
                if class.insert_method(method).is_some() {
                    self.redeclared(class, &shown_name, member, name_span);
                }
            }
        }
        Ok(())
    }

    /// Every class referenced by the declared type must exist.
    fn check_names(&self, decl: &Declaration, member: &RawMember) -> Result<(), ParseError> {
        for named in decl.ty.named_types() {
            if self.known.contains(&named.name) {
                continue;
            }
            let span = find_word(&member.decl, &named.name, decl.type_span.start as usize)
                .unwrap_or(decl.type_span);
            return Err(ParseError::new(
                ParseErrorKind::UnknownType {
                    name: named.name.clone(),
                },
                span,
            )
            .in_member(member));
        }
        Ok(())
    }

    fn redeclared(&mut self, class: &ClassDecl, member_name: &str, member: &RawMember, span: Span) {
        warn!(class = %class.name, member = member_name, "member redeclared");
        self.warnings.push(
            Diagnostic::warning(ErrorCode::W2002)
                .with_message(format!(
                    "`{member_name}` is declared more than once in class `{}`",
                    class.name
                ))
                .with_location(&member.origin)
                .with_label(member.line_span(span), "this declaration replaces the earlier one"),
        );
    }
}

/// Span of the first whole-word occurrence of `word` at or after `from`.
fn find_word(text: &str, word: &str, from: usize) -> Option<Span> {
    let is_word_byte = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b':';
    let bytes = text.as_bytes();
    let mut search = from.min(text.len());
    while let Some(i) = text[search..].find(word) {
        let start = search + i;
        let end = start + word.len();
        let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(Span::from_range(start..end));
        }
        search = end;
    }
    None
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
