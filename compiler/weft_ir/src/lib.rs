//! Weft IR - Interface Types and Layouts
//!
//! This crate contains the core data structures shared by every phase of the
//! Weft IDL compiler:
//! - Spans and source line references for diagnostics
//! - The closed [`Type`] model and its structural [`Descriptor`] projection
//! - Class declarations, before ([`ClassShape`]) and after ([`ClassDecl`])
//!   signature resolution
//! - The ordered [`Registry`] of classes in a compilation unit
//! - Slot layouts ([`ShellLayout`], [`RootLayout`]) shared by code generation
//!   and the linkage descriptor
//!
//! # Design Philosophy
//!
//! Anything that fixes a slot position is computed in exactly one place.
//! The generated installer code, the class descriptor members and the linkage
//! field lists are all read off the same layout value, so they cannot drift.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod class;
pub mod descriptor;
pub mod layout;
mod registry;
mod span;
pub mod symbols;
mod ty;

pub use class::{
    CastSource, ClassDecl, ClassFlags, ClassShape, LineRef, Method, MethodKind, RawMember,
};
pub use descriptor::{Descriptor, Member};
pub use layout::{CastEntry, RootLayout, ShellLayout, Slot};
pub use registry::{ClassRegistry, Registry, RegistryEntry, ShapeRegistry};
pub use span::Span;
pub use ty::{MethodType, NamedType, Primitive, Type};
