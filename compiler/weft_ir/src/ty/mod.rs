//! The interface type model.
//!
//! [`Type`] is closed: every form an IDL signature can spell is a variant
//! here, and each variant knows its structural descriptor and its native
//! (C++) spelling. Value conversions across the boundary live with code
//! generation, which builds them as structured expressions.

use std::fmt;

use crate::descriptor::{Descriptor, Member};

/// Scalar types with a fixed native spelling.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Primitive {
    Int,
    /// Unsigned on the native side; the managed runtime only sees `int`.
    UInt,
    Bool,
    Double,
    Void,
}

impl Primitive {
    /// The IDL keyword spelling this primitive.
    pub const fn keyword(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::UInt => "uint",
            Primitive::Bool => "bool",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    pub const fn native_spelling(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::UInt => "unsigned long",
            Primitive::Bool => "bool",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    pub fn descriptor(self) -> Descriptor {
        match self {
            Primitive::Int | Primitive::UInt => Descriptor::Int,
            Primitive::Bool => Descriptor::Bool,
            Primitive::Double => Descriptor::Double,
            Primitive::Void => Descriptor::Void,
        }
    }
}

/// Reference to a registered class.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamedType {
    /// Class name; may contain `::` scope separators.
    pub name: String,
    pub is_const: bool,
    /// Passed as `T&` rather than `T*` on the native side.
    pub is_by_ref: bool,
}

impl NamedType {
    pub fn new(name: impl Into<String>) -> Self {
        NamedType {
            name: name.into(),
            is_const: false,
            is_by_ref: false,
        }
    }

    #[must_use]
    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    #[must_use]
    pub fn by_ref(mut self) -> Self {
        self.is_by_ref = true;
        self
    }

    /// `[const ]Name*`, or `[const ]Name&` when passed by reference.
    pub fn native_spelling(&self) -> String {
        let qualifier = if self.is_const { "const " } else { "" };
        let marker = if self.is_by_ref { '&' } else { '*' };
        format!("{qualifier}{}{marker}", self.name)
    }

    /// Plain mutable pointer spelling, used for casts out of slot 0.
    pub fn pointer_spelling(&self) -> String {
        format!("{}*", self.name)
    }
}

/// A method signature: positional arguments, a return type and at most one
/// output parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodType {
    pub args: Vec<Type>,
    pub ret: Box<Type>,
    /// Output parameter, passed by the caller and filled in by the callee.
    pub out: Option<Box<Type>>,
}

impl MethodType {
    pub fn new(args: Vec<Type>, ret: Type) -> Self {
        MethodType {
            args,
            ret: Box::new(ret),
            out: None,
        }
    }

    #[must_use]
    pub fn with_out(mut self, out: Type) -> Self {
        self.out = Some(Box::new(out));
        self
    }

    pub fn out(&self) -> Option<&Type> {
        self.out.as_deref()
    }

    /// The value handed back to managed code: the output parameter when
    /// present, the return value otherwise.
    pub fn result(&self) -> &Type {
        self.out.as_deref().unwrap_or(&self.ret)
    }

    pub fn arg_members(&self) -> Vec<Member> {
        self.args
            .iter()
            .map(|arg| Member::arg(arg.descriptor()))
            .collect()
    }

    pub fn descriptor(&self) -> Descriptor {
        Descriptor::Method {
            args: self.arg_members(),
            ret: Box::new(self.result().descriptor()),
        }
    }

    /// `std::function<R(A, B)>`.
    pub fn native_spelling(&self) -> String {
        let args: Vec<String> = self.args.iter().map(Type::native_spelling).collect();
        format!(
            "std::function<{}({})>",
            self.ret.native_spelling(),
            args.join(", ")
        )
    }

    /// Runtime closure pointer type: `closure<R, value_t, A...>*`.
    ///
    /// The leading `value_t` is the receiver. `R` is the managed result, so an
    /// output parameter makes it `value_t`.
    pub fn closure_spelling(&self) -> String {
        let mut spelling = format!("closure<{}, value_t", self.result().glue_spelling());
        for arg in &self.args {
            spelling.push_str(", ");
            spelling.push_str(arg.glue_spelling());
        }
        spelling.push_str(">*");
        spelling
    }
}

/// An interface type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Primitive(Primitive),
    /// Wide string, `wchar_t*` natively.
    String,
    /// Native enum marshalled as an integer.
    Enum(String),
    Named(NamedType),
    /// Array value; elements are passed through untouched.
    Array(Box<Type>),
    Method(MethodType),
}

impl Type {
    pub const INT: Type = Type::Primitive(Primitive::Int);
    pub const UINT: Type = Type::Primitive(Primitive::UInt);
    pub const BOOL: Type = Type::Primitive(Primitive::Bool);
    pub const DOUBLE: Type = Type::Primitive(Primitive::Double);
    pub const VOID: Type = Type::Primitive(Primitive::Void);

    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(NamedType::new(name))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Void))
    }

    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> Descriptor {
        match self {
            Type::Primitive(p) => p.descriptor(),
            Type::String => Descriptor::String,
            Type::Enum(_) => Descriptor::Int,
            Type::Named(named) => Descriptor::name(&named.name),
            Type::Array(elem) => Descriptor::Array {
                elemtype: Box::new(elem.descriptor()),
            },
            Type::Method(method) => method.descriptor(),
        }
    }

    pub fn native_spelling(&self) -> String {
        match self {
            Type::Primitive(p) => p.native_spelling().to_owned(),
            Type::String => "wchar_t*".to_owned(),
            Type::Enum(name) => name.clone(),
            Type::Named(named) => named.native_spelling(),
            Type::Array(_) => "value_t".to_owned(),
            Type::Method(method) => method.native_spelling(),
        }
    }

    /// Spelling at the glue function boundary: everything travels as
    /// `value_t` except `void`.
    pub fn glue_spelling(&self) -> &'static str {
        if self.is_void() {
            "void"
        } else {
            "value_t"
        }
    }

    /// Every class reference reachable from this type, in source order.
    pub fn named_types(&self) -> Vec<&NamedType> {
        let mut found = Vec::new();
        self.collect_named(&mut found);
        found
    }

    fn collect_named<'a>(&'a self, found: &mut Vec<&'a NamedType>) {
        match self {
            Type::Named(named) => found.push(named),
            Type::Array(elem) => elem.collect_named(found),
            Type::Method(method) => {
                for arg in &method.args {
                    arg.collect_named(found);
                }
                if let Some(out) = method.out() {
                    out.collect_named(found);
                }
                method.ret.collect_named(found);
            }
            Type::Primitive(_) | Type::String | Type::Enum(_) => {}
        }
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.name)?;
        if self.is_by_ref {
            write!(f, "&")?;
        }
        Ok(())
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[](")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        if let Some(out) = self.out() {
            if !self.args.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "out {out}")?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

/// Renders the IDL spelling.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p.keyword()),
            Type::String => write!(f, "string"),
            Type::Enum(name) => write!(f, "enum {name}"),
            Type::Named(named) => write!(f, "{named}"),
            Type::Array(elem) => write!(f, "Array<{elem}>"),
            Type::Method(method) => write!(f, "{method}"),
        }
    }
}
