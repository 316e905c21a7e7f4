//! Marshalling rules.
//!
//! [`Marshal::unwrap`] turns a runtime `value_t` expression into a native
//! expression of the type's native spelling; [`Marshal::wrap`] goes the other
//! way. Both build [`Expr`] trees rather than text.

use weft_ir::{symbols, ClassRegistry, MethodType, NamedType, Primitive, Type};

use crate::cpp::{Expr, Param};
use crate::{CodegenError, CodegenErrorKind};

/// What marshalling needs to know beyond the type itself.
#[derive(Copy, Clone)]
pub struct MarshalCx<'a> {
    classes: &'a ClassRegistry,
}

impl<'a> MarshalCx<'a> {
    pub fn new(classes: &'a ClassRegistry) -> Self {
        MarshalCx { classes }
    }

    /// Field count of a class's shell object.
    fn shell_fields(&self, class: &str) -> Result<usize, CodegenError> {
        self.classes
            .get(class)
            .map(|decl| decl.layout().field_count())
            .ok_or_else(|| {
                CodegenError::new(CodegenErrorKind::UnknownClass {
                    name: class.to_owned(),
                })
            })
    }
}

/// Conversion between runtime values and native values.
pub trait Marshal {
    /// Runtime value to native value.
    fn unwrap(&self, cx: MarshalCx<'_>, value: Expr) -> Result<Expr, CodegenError>;

    /// Native value to runtime value.
    fn wrap(&self, cx: MarshalCx<'_>, native: Expr) -> Result<Expr, CodegenError>;
}

impl Marshal for Primitive {
    fn unwrap(&self, _cx: MarshalCx<'_>, value: Expr) -> Result<Expr, CodegenError> {
        Ok(match self {
            Primitive::Int => Expr::call1("val_as_int", value),
            Primitive::UInt => Expr::cast("unsigned long", Expr::call1("val_as_int", value)),
            Primitive::Bool => Expr::call1("val_as_boolean", value),
            Primitive::Double => Expr::call1("val_as_double_noenc", value),
            Primitive::Void => return Err(CodegenError::new(CodegenErrorKind::VoidMarshalled)),
        })
    }

    fn wrap(&self, _cx: MarshalCx<'_>, native: Expr) -> Result<Expr, CodegenError> {
        Ok(match self {
            Primitive::Int => Expr::call1("int_as_val", native),
            Primitive::UInt => Expr::call1("int_as_val", Expr::cast("int", native)),
            Primitive::Bool => Expr::call1("boolean_as_val", native),
            Primitive::Double => Expr::call1("double_as_val_noenc", native),
            Primitive::Void => return Err(CodegenError::new(CodegenErrorKind::VoidMarshalled)),
        })
    }
}

impl Marshal for NamedType {
    /// Slot 0 of the runtime object, cast to the class pointer.
    fn unwrap(&self, _cx: MarshalCx<'_>, value: Expr) -> Result<Expr, CodegenError> {
        let pointer = Expr::cast(
            self.pointer_spelling(),
            Expr::call1("val_as_object", value).slot(0),
        );
        Ok(if self.is_by_ref {
            pointer.deref()
        } else {
            pointer
        })
    }

    /// A fresh shell sized by the class layout, filled by the installer.
    fn wrap(&self, cx: MarshalCx<'_>, native: Expr) -> Result<Expr, CodegenError> {
        let fields = cx.shell_fields(&self.name)?;
        let pointer = if self.is_by_ref {
            native.addr_of()
        } else {
            native
        };
        let installed = Expr::call(
            symbols::init_wrap(&self.name),
            vec![
                Expr::cast(
                    "object_t*",
                    Expr::new_object(format!("cppobj<{fields},0>"), Vec::new()),
                ),
                Expr::cast(self.pointer_spelling(), pointer),
            ],
        );
        Ok(Expr::call1("object_as_val", installed))
    }
}

impl Marshal for MethodType {
    /// A native lambda that calls back into the runtime closure.
    fn unwrap(&self, cx: MarshalCx<'_>, value: Expr) -> Result<Expr, CodegenError> {
        let params: Vec<Param> = self
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| Param::new(arg.native_spelling(), format!("p{i}")))
            .collect();

        let mut invoke_args = Vec::with_capacity(self.args.len() + 1);
        invoke_args.push(value);
        for (arg, param) in self.args.iter().zip(&params) {
            invoke_args.push(arg.wrap(cx, Expr::ident(&param.name))?);
        }
        let invoke = Expr::call("INVOKE_CLOSURE", invoke_args);

        let returns = !self.ret.is_void();
        let body = if returns {
            self.ret.unwrap(cx, invoke)?
        } else {
            invoke
        };
        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
            returns,
        })
    }

    fn wrap(&self, _cx: MarshalCx<'_>, _native: Expr) -> Result<Expr, CodegenError> {
        Err(CodegenError::new(CodegenErrorKind::MethodWrapped))
    }
}

impl Marshal for Type {
    fn unwrap(&self, cx: MarshalCx<'_>, value: Expr) -> Result<Expr, CodegenError> {
        match self {
            Type::Primitive(p) => p.unwrap(cx, value),
            Type::String => Ok(Expr::call1("val_as_string", value)),
            Type::Enum(name) => Ok(Expr::cast(name, Expr::call1("val_as_int", value))),
            Type::Named(named) => named.unwrap(cx, value),
            Type::Array(_) => Ok(value),
            Type::Method(method) => method.unwrap(cx, value),
        }
    }

    fn wrap(&self, cx: MarshalCx<'_>, native: Expr) -> Result<Expr, CodegenError> {
        match self {
            Type::Primitive(p) => p.wrap(cx, native),
            Type::String => Ok(Expr::call1("string_as_val", native)),
            Type::Enum(_) => Ok(Expr::call1("int_as_val", Expr::cast("int", native))),
            Type::Named(named) => named.wrap(cx, native),
            Type::Array(_) => Ok(native),
            Type::Method(method) => method.wrap(cx, native),
        }
    }
}
