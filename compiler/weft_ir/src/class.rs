//! Class declarations.
//!
//! A class passes through two states. The declaration pass produces a
//! [`ClassShape`]: flags, cast sources and the raw text of each member line.
//! Once every class name in the compilation unit is known, each raw member is
//! parsed and the shape becomes a [`ClassDecl`].

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::descriptor::{Descriptor, Member};
use crate::layout::{ShellLayout, Slot};
use crate::{MethodType, Span, Type};

/// A source line, kept for diagnostics.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct LineRef {
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// Full text of the line without its terminator.
    pub text: String,
}

impl LineRef {
    pub fn new(file: impl Into<String>, line: u32, text: impl Into<String>) -> Self {
        LineRef {
            file: file.into(),
            line,
            text: text.into(),
        }
    }
}

bitflags! {
    /// Class-level modifiers from the declaration body.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClassFlags: u8 {
        /// `deriving Wrappable;` - managed code may subclass and override
        /// virtual methods.
        const EXTENSIBLE = 1 << 0;
        /// `noconstructor;` - no native instance is built by the factory.
        const NO_CONSTRUCTOR = 1 << 1;
    }
}

/// A member line whose signature has not been parsed yet.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RawMember {
    /// The trimmed declaration text.
    pub decl: String,
    /// Byte offset of `decl` within the source line.
    pub indent: u32,
    pub origin: LineRef,
}

impl RawMember {
    /// Map a span within `decl` back onto the source line.
    pub fn line_span(&self, span: Span) -> Span {
        span.shifted(self.indent)
    }
}

/// One entry of a `cast from` list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CastSource {
    pub name: String,
    /// Location of the name within `origin`.
    pub span: Span,
    pub origin: LineRef,
}

/// A class after the declaration pass.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ClassShape {
    pub name: String,
    /// The `class Name {` line.
    pub origin: LineRef,
    pub flags: ClassFlags,
    pub casts: Vec<CastSource>,
    pub members: Vec<RawMember>,
}

impl ClassShape {
    pub fn new(name: impl Into<String>, origin: LineRef) -> Self {
        ClassShape {
            name: name.into(),
            origin,
            flags: ClassFlags::empty(),
            casts: Vec::new(),
            members: Vec::new(),
        }
    }
}

/// How a method is dispatched.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MethodKind {
    Instance,
    /// Called as `Class::name(...)`; no receiver.
    Static,
    /// Overridable by managed code on extensible classes.
    Virtual,
    /// Must be implemented by managed code.
    PureVirtual,
}

impl MethodKind {
    pub fn is_virtual(self) -> bool {
        matches!(self, MethodKind::Virtual | MethodKind::PureVirtual)
    }
}

/// A resolved method.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Method {
    pub name: String,
    pub kind: MethodKind,
    pub ty: MethodType,
    pub origin: LineRef,
}

/// A fully resolved class.
///
/// Method order is declaration order and fixes slot order; it is never
/// re-sorted.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ClassDecl {
    pub name: String,
    pub origin: LineRef,
    pub ctor: Option<MethodType>,
    methods: Vec<Method>,
    method_index: FxHashMap<String, usize>,
    pub impure_virtual: Vec<String>,
    pub pure_virtual: Vec<String>,
    pub flags: ClassFlags,
    pub casts: Vec<String>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, origin: LineRef, flags: ClassFlags) -> Self {
        ClassDecl {
            name: name.into(),
            origin,
            ctor: None,
            methods: Vec::new(),
            method_index: FxHashMap::default(),
            impure_virtual: Vec::new(),
            pure_virtual: Vec::new(),
            flags,
            casts: Vec::new(),
        }
    }

    /// Add a method, or replace an existing one with the same name in place.
    ///
    /// Returns the replaced method so the caller can report it.
    pub fn insert_method(&mut self, method: Method) -> Option<Method> {
        self.impure_virtual.retain(|n| *n != method.name);
        self.pure_virtual.retain(|n| *n != method.name);
        match method.kind {
            MethodKind::Virtual => self.impure_virtual.push(method.name.clone()),
            MethodKind::PureVirtual => self.pure_virtual.push(method.name.clone()),
            MethodKind::Instance | MethodKind::Static => {}
        }

        if let Some(&idx) = self.method_index.get(&method.name) {
            return Some(std::mem::replace(&mut self.methods[idx], method));
        }
        self.method_index
            .insert(method.name.clone(), self.methods.len());
        self.methods.push(method);
        None
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.method_index.get(name).map(|&idx| &self.methods[idx])
    }

    /// Virtual and pure virtual methods, in declaration order.
    pub fn virtual_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.kind.is_virtual())
    }

    pub fn is_extensible(&self) -> bool {
        self.flags.contains(ClassFlags::EXTENSIBLE)
    }

    /// Whether the factory constructs a native instance.
    pub fn constructs_instance(&self) -> bool {
        !self.flags.contains(ClassFlags::NO_CONSTRUCTOR)
    }

    pub fn has_pure_virtual(&self) -> bool {
        !self.pure_virtual.is_empty()
    }

    pub fn ctor_args(&self) -> &[Type] {
        self.ctor.as_ref().map_or(&[], |ctor| ctor.args.as_slice())
    }

    pub fn layout(&self) -> ShellLayout {
        ShellLayout::of(self)
    }

    /// Object descriptor: one member per shell slot, reserved slots `void`.
    pub fn object_descriptor(&self) -> Descriptor {
        let members = self
            .layout()
            .slots()
            .iter()
            .map(|slot| match slot {
                Slot::Method { index, name } => {
                    Member::new(name.clone(), self.methods[*index].ty.descriptor())
                }
                reserved => Member::new(reserved.field_name(), Descriptor::Void),
            })
            .collect();
        Descriptor::typed_object(members, &self.name)
    }

    /// Constructor descriptor, as exposed on the root aggregate.
    pub fn constructor_descriptor(&self) -> Descriptor {
        let args = self
            .ctor_args()
            .iter()
            .map(|arg| Member::arg(arg.descriptor()))
            .collect();
        Descriptor::constructor(args, self.object_descriptor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn origin() -> LineRef {
        LineRef::new("ui.idl", 1, "class Button {")
    }

    fn method(name: &str, kind: MethodKind, ty: MethodType) -> Method {
        Method {
            name: name.to_owned(),
            kind,
            ty,
            origin: origin(),
        }
    }

    #[test]
    fn test_insert_keeps_declaration_order() {
        let mut class = ClassDecl::new("Button", origin(), ClassFlags::empty());
        for name in ["zeta", "alpha", "mid"] {
            class.insert_method(method(name, MethodKind::Instance, MethodType::new(vec![], Type::VOID)));
        }
        let names: Vec<&str> = class.methods().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_redeclared_method_keeps_slot() {
        let mut class = ClassDecl::new("Button", origin(), ClassFlags::EXTENSIBLE);
        class.insert_method(method("a", MethodKind::Instance, MethodType::new(vec![], Type::VOID)));
        class.insert_method(method("b", MethodKind::Virtual, MethodType::new(vec![], Type::VOID)));
        let replaced = class.insert_method(method(
            "a",
            MethodKind::PureVirtual,
            MethodType::new(vec![], Type::INT),
        ));

        assert!(replaced.is_some());
        assert_eq!(class.methods()[0].name, "a");
        assert_eq!(class.methods()[0].ty.ret.as_ref(), &Type::INT);
        assert_eq!(class.pure_virtual, vec!["a".to_owned()]);
        assert_eq!(class.impure_virtual, vec!["b".to_owned()]);
    }

    #[test]
    fn test_object_descriptor_reserved_members() {
        let mut class = ClassDecl::new("Button", origin(), ClassFlags::EXTENSIBLE);
        class.insert_method(method("click", MethodKind::Virtual, MethodType::new(vec![], Type::VOID)));

        let Descriptor::Object { members, typename } = class.object_descriptor() else {
            panic!("expected object descriptor");
        };
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["_____cpp_receiver", "_____gen_cpp_proxy", "click"]);
        assert_eq!(members[0].ty, Descriptor::Void);
        assert_eq!(typename.as_deref(), Some("Button"));
    }

    #[test]
    fn test_constructor_descriptor_args() {
        let mut class = ClassDecl::new("Label", origin(), ClassFlags::empty());
        class.ctor = Some(MethodType::new(vec![Type::String], Type::VOID));
        let Descriptor::Constructor { args, .. } = class.constructor_descriptor() else {
            panic!("expected constructor descriptor");
        };
        assert_eq!(args, vec![Member::arg(Descriptor::String)]);
    }

    #[test]
    fn test_flags() {
        let class = ClassDecl::new(
            "Shape",
            origin(),
            ClassFlags::EXTENSIBLE | ClassFlags::NO_CONSTRUCTOR,
        );
        assert!(class.is_extensible());
        assert!(!class.constructs_instance());
        assert!(!class.has_pure_virtual());
    }
}
