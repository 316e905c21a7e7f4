//! C++ Glue Generation for Weft
//!
//! Turns a resolved [`ClassRegistry`](weft_ir::ClassRegistry) into the native
//! glue source that lets the managed runtime call into C++ objects and lets
//! C++ call back into managed overrides.
//!
//! # Architecture
//!
//! ```text
//! ClassRegistry + RootLayout
//!        ↓
//!   emit::*            (one builder per kind of item, using Marshal rules)
//!        ↓
//!   Vec<cpp::Item>     (structured C++)
//!        ↓
//!   CppWriter          (text)
//! ```
//!
//! Slot positions are never computed here; they are read off
//! [`ShellLayout`](weft_ir::ShellLayout) and [`RootLayout`](weft_ir::RootLayout).

pub mod cpp;
mod emit;
mod error;
pub mod marshal;
mod source;

pub use error::{CodegenError, CodegenErrorKind};
pub use marshal::{Marshal, MarshalCx};
pub use source::{generate_source, GlueSource};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod test_support {
    use weft_ir::ClassRegistry;
    use weft_parse::{resolve, Declarations};

    /// Parse and resolve a single interface file.
    pub(crate) fn registry(idl: &str) -> ClassRegistry {
        let mut decls = Declarations::new();
        decls.parse_file("test.idl", idl).unwrap();
        resolve(decls.shapes, &mut decls.warnings).unwrap()
    }
}
