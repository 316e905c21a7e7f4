//! Member declaration and type expression parsing.
//!
//! A member declaration is one trimmed line of a class body:
//!
//! ```text
//! [static | virtual | pure virtual] name: <type>;
//! ^^constructor: <method type>;
//! ```
//!
//! The name is split off at the first single `:`; `::` scope separators are
//! not split points. The type ends at the first `;`.

use std::ops::Range;

use smallvec::SmallVec;
use weft_ir::{MethodKind, MethodType, NamedType, Span, Type};

use crate::lexer::{lex, Token, TypeToken};
use crate::{ParseError, ParseErrorKind};

/// Member name that declares the constructor signature.
pub const CONSTRUCTOR_SENTINEL: &str = "^^constructor";

/// What a member declaration declares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Constructor,
    Method(MethodKind),
}

/// A parsed member declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Member name with modifiers stripped.
    pub name: String,
    pub kind: DeclKind,
    pub ty: Type,
    pub name_span: Span,
    /// Span of the trimmed type text.
    pub type_span: Span,
}

/// Parse one member declaration. Spans are relative to `decl`.
pub fn parse_declaration(decl: &str) -> Result<Declaration, ParseError> {
    let colon = find_name_separator(decl).ok_or_else(|| {
        ParseError::new(ParseErrorKind::MalformedMember, Span::from_range(0..decl.len()))
    })?;

    let (kind, name, name_span) = parse_member_head(&decl[..colon])?;

    let type_start = colon + 1;
    let rest = &decl[type_start..];
    let type_text = rest.find(';').map_or(rest, |end| &rest[..end]);
    let leading = type_text.len() - type_text.trim_start().len();
    let type_span = Span::from_range(
        type_start + leading..type_start + type_text.trim_end().len().max(leading),
    );

    let ty = parse_type_at(type_text, type_start)?;

    Ok(Declaration {
        name: name.to_owned(),
        kind,
        ty,
        name_span,
        type_span,
    })
}

/// Parse a standalone type expression.
pub fn parse_type(text: &str) -> Result<Type, ParseError> {
    parse_type_at(text, 0)
}

fn parse_type_at(text: &str, offset: usize) -> Result<Type, ParseError> {
    let extent = Span::from_range(offset..offset + text.trim_end().len());
    let tokens = lex(text, extent.start)?;
    TypeParser::parse_complete(&tokens, Span::point(extent.end))
}

/// Index of the first `:` that is not part of a `::`.
fn find_name_separator(decl: &str) -> Option<usize> {
    let bytes = decl.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i] == b':'
            && (i == 0 || bytes[i - 1] != b':')
            && bytes.get(i + 1).copied() != Some(b':')
    })
}

/// Whitespace-separated words with their byte offsets.
fn words(text: &str) -> SmallVec<[(usize, &str); 3]> {
    let mut out = SmallVec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_member_head(head: &str) -> Result<(DeclKind, &str, Span), ParseError> {
    let malformed = || {
        let trimmed = head.trim_end();
        ParseError::new(
            ParseErrorKind::MalformedMember,
            Span::from_range(head.len() - head.trim_start().len()..trimmed.len()),
        )
    };

    let words = words(head);
    let Some((&(name_start, name), modifiers)) = words.split_last() else {
        return Err(malformed());
    };
    let name_span = Span::from_range(name_start..name_start + name.len());

    let modifiers: SmallVec<[&str; 2]> = modifiers.iter().map(|&(_, w)| w).collect();
    let method_kind = match modifiers.as_slice() {
        [] => MethodKind::Instance,
        ["static"] => MethodKind::Static,
        ["virtual"] => MethodKind::Virtual,
        ["pure", "virtual"] => MethodKind::PureVirtual,
        _ => return Err(malformed()),
    };

    if name == CONSTRUCTOR_SENTINEL {
        if method_kind != MethodKind::Instance {
            return Err(malformed());
        }
        return Ok((DeclKind::Constructor, name, name_span));
    }

    if !is_identifier(name) {
        return Err(ParseError::new(ParseErrorKind::MalformedMember, name_span));
    }
    Ok((DeclKind::Method(method_kind), name, name_span))
}

/// Recursive descent over the tokens of one type expression.
struct TypeParser<'t, 'src> {
    tokens: &'t [Token<'src>],
    pos: usize,
    /// Zero-width span just past the last token.
    end: Span,
}

impl<'t, 'src> TypeParser<'t, 'src> {
    /// Parse `tokens` as exactly one type.
    fn parse_complete(tokens: &'t [Token<'src>], end: Span) -> Result<Type, ParseError> {
        let mut parser = TypeParser {
            tokens,
            pos: 0,
            end,
        };
        let ty = parser.parse_type()?;
        if let Some(tok) = parser.peek() {
            return Err(unexpected(tok));
        }
        Ok(ty)
    }

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token<'src>> {
        let tok = self.tokens.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TypeToken) -> Result<Token<'src>, ParseError> {
        match self.bump() {
            Some(tok) if tok.kind == kind => Ok(tok),
            Some(tok) => Err(unexpected(&tok)),
            None => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    found: String::new(),
                },
                self.end,
            )),
        }
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let Some(tok) = self.bump() else {
            return Err(ParseError::new(ParseErrorKind::EmptyType, self.end));
        };

        let ty = match tok.kind {
            TypeToken::Int => Type::INT,
            TypeToken::UInt => Type::UINT,
            TypeToken::Bool => Type::BOOL,
            TypeToken::Double => Type::DOUBLE,
            TypeToken::Void => Type::VOID,
            TypeToken::String => Type::String,
            TypeToken::Enum => {
                let name = self.expect(TypeToken::Ident)?;
                Type::Enum(name.text.to_owned())
            }
            TypeToken::Array => {
                self.expect(TypeToken::Lt)?;
                let elem = self.parse_type()?;
                self.expect(TypeToken::Gt)?;
                Type::Array(Box::new(elem))
            }
            TypeToken::Const => {
                let name = self.expect(TypeToken::Ident)?;
                self.finish_named(NamedType::new(name.text).with_const())
            }
            TypeToken::Ident => self.finish_named(NamedType::new(tok.text)),
            TypeToken::LBracket => {
                self.expect(TypeToken::RBracket)?;
                self.parse_method()?
            }
            _ => return Err(unexpected(&tok)),
        };
        Ok(ty)
    }

    fn finish_named(&mut self, named: NamedType) -> Type {
        if self.peek().is_some_and(|t| t.kind == TypeToken::Amp) {
            self.pos += 1;
            return Type::Named(named.by_ref());
        }
        Type::Named(named)
    }

    /// `(<args>) -> <ret>`, after the leading `[]`.
    fn parse_method(&mut self) -> Result<Type, ParseError> {
        let open = self.expect(TypeToken::LParen)?;
        let args_start = self.pos;
        let close = self
            .matching_paren(args_start)
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnterminatedArgs, open.span))?;
        let close_span = self.tokens[close].span;
        self.pos = close + 1;

        let (args, out) = parse_args(&self.tokens[args_start..close], close_span)?;

        match self.bump() {
            Some(tok) if tok.kind == TypeToken::Arrow => {}
            Some(tok) => return Err(ParseError::new(ParseErrorKind::MissingArrow, tok.span)),
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingArrow,
                    Span::point(close_span.end),
                ))
            }
        }

        let ret = self.parse_type()?;
        let method = MethodType::new(args, ret);
        Ok(Type::Method(match out {
            Some(out) => method.with_out(out),
            None => method,
        }))
    }

    /// Index of the `)` closing the group that starts at `start`.
    fn matching_paren(&self, start: usize) -> Option<usize> {
        let mut depth = 1usize;
        for (i, tok) in self.tokens.iter().enumerate().skip(start) {
            match tok.kind {
                TypeToken::LParen => depth += 1,
                TypeToken::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// Parse an argument list, returning positional arguments and the optional
/// output parameter.
fn parse_args(tokens: &[Token<'_>], close: Span) -> Result<(Vec<Type>, Option<Type>), ParseError> {
    let mut args = Vec::new();
    let mut out: Option<Type> = None;

    for range in split_top_level(tokens) {
        let arg = &tokens[range.clone()];
        let Some(first) = arg.first() else {
            continue;
        };
        let end = tokens
            .get(range.end)
            .map_or(Span::point(close.start), |comma| Span::point(comma.span.start));

        if first.kind == TypeToken::Out {
            if out.is_some() {
                return Err(ParseError::new(ParseErrorKind::DuplicateOut, first.span));
            }
            out = Some(TypeParser::parse_complete(&arg[1..], end)?);
        } else {
            args.push(TypeParser::parse_complete(arg, end)?);
        }
    }

    if matches!(args.as_slice(), [only] if only.is_void()) {
        args.clear();
    }
    Ok((args, out))
}

/// Split at commas outside any parentheses or angle brackets.
fn split_top_level(tokens: &[Token<'_>]) -> SmallVec<[Range<usize>; 4]> {
    let mut ranges = SmallVec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TypeToken::Comma if depth == 0 => {
                ranges.push(start..i);
                start = i + 1;
            }
            kind => depth += kind.depth_delta(),
        }
    }
    ranges.push(start..tokens.len());
    ranges
}

#[cold]
fn unexpected(tok: &Token<'_>) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedToken {
            found: tok.text.to_owned(),
        },
        tok.span,
    )
}
