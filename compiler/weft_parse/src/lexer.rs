//! Type expression lexer.

use logos::Logos;
use weft_ir::Span;

use crate::{ParseError, ParseErrorKind};

/// Tokens of a type expression.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TypeToken {
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token("->")]
    Arrow,
    #[token("&")]
    Amp,

    #[token("int")]
    Int,
    #[token("uint")]
    UInt,
    #[token("bool")]
    Bool,
    #[token("double")]
    Double,
    #[token("string")]
    String,
    #[token("void")]
    Void,
    #[token("enum")]
    Enum,
    #[token("const")]
    Const,
    #[token("out")]
    Out,
    #[token("Array")]
    Array,

    /// Class or enum name, optionally scoped with `::`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*")]
    Ident,
}

impl TypeToken {
    /// Nesting delta for argument splitting: parens and angle brackets open
    /// and close groups.
    pub fn depth_delta(self) -> i32 {
        match self {
            TypeToken::LParen | TypeToken::Lt => 1,
            TypeToken::RParen | TypeToken::Gt => -1,
            _ => 0,
        }
    }
}

/// A token with its text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TypeToken,
    pub text: &'src str,
    pub span: Span,
}

/// Lex a type expression. `offset` is added to every span so they point into
/// the enclosing declaration.
pub fn lex(source: &str, offset: u32) -> Result<Vec<Token<'_>>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = TypeToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span()).shifted(offset);
        let text = lexer.slice();
        match result {
            Ok(kind) => tokens.push(Token { kind, text, span }),
            Err(()) => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        found: text.to_owned(),
                    },
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}
