//! Structured C++ builder.
//!
//! Generated code is built as [`Item`]s, [`Stmt`]s and [`Expr`]s and only
//! turned into text by [`CppWriter`]. Marshalling rules return expressions,
//! so they can be composed and compared before anything is rendered.

mod ast;
mod normalize;
mod writer;

pub use ast::{ClassDef, Expr, Function, Global, Init, Item, MemberDecl, Param, Signature, Stmt};
pub use normalize::normalize;
pub use writer::CppWriter;

/// Render items to source text.
pub fn render(items: &[Item]) -> String {
    let mut writer = CppWriter::new();
    writer.write_items(items);
    writer.take_output()
}
