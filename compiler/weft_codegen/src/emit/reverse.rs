//! Reverse dispatch.
//!
//! An extensible class gets a native subclass, `WeftC`, that keeps a pointer
//! to its managed object. Each virtual method is overridden to look up the
//! managed override in the object's `___js_<m>` field and call it, so native
//! code calling the virtual ends up in managed code.
//!
//! The factory `__weft_cpp_wrap_C` builds a wrapper around an existing
//! managed object; the installer stores it in the shell's reverse factory
//! slot.

use tracing::{debug, trace};
use weft_ir::{symbols, ClassDecl, Method, Type};

use crate::cpp::{ClassDef, Expr, Function, Item, MemberDecl, Param, Signature, Stmt};
use crate::marshal::{Marshal, MarshalCx};
use crate::{CodegenError, CodegenErrorKind};

const OBJECT: &str = "o";
const OUT_PARAM: &str = "outparam";

/// The wrapper class, its member definitions and the factory. Empty for
/// classes that are not extensible.
pub(crate) fn reverse_wrapper(
    cx: MarshalCx<'_>,
    class: &ClassDecl,
) -> Result<Vec<Item>, CodegenError> {
    if !class.is_extensible() {
        return Ok(Vec::new());
    }
    let wrapper = symbols::wrapper_class(&class.name);
    debug!(class = %class.name, %wrapper, "reverse wrapper");

    let mut members = Vec::new();
    let mut definitions = Vec::new();

    for ctor in wrapper_ctors(class, &wrapper) {
        members.push(MemberDecl {
            is_virtual: false,
            sig: ctor.sig.clone(),
        });
        definitions.push(qualified(&wrapper, ctor));
    }

    for method in class.virtual_methods() {
        let function = override_method(cx, class, method).map_err(|e| {
            e.at(&method.origin).while_generating(format!(
                "the managed override of `{}::{}`",
                class.name, method.name
            ))
        })?;
        members.push(MemberDecl {
            is_virtual: true,
            sig: function.sig.clone(),
        });
        definitions.push(qualified(&wrapper, function));
    }

    let mut items = vec![Item::Class(ClassDef {
        name: wrapper.clone(),
        base: class.name.clone(),
        fields: vec![Param::new("object_t*", symbols::WRAPPED_OBJECT_FIELD)],
        members,
    })];
    items.extend(definitions.into_iter().map(Item::Function));
    items.push(Item::Function(factory(class, &wrapper)));
    Ok(items)
}

/// `WeftC(object_t* o)`, and a forwarding constructor when the base
/// constructor takes arguments.
fn wrapper_ctors(class: &ClassDecl, wrapper: &str) -> Vec<Function> {
    let keep_object = Expr::call1(symbols::WRAPPED_OBJECT_FIELD, Expr::ident(OBJECT));
    let mut ctors = vec![Function {
        sig: Signature::new("", wrapper, vec![Param::new("object_t*", OBJECT)]),
        init_list: vec![keep_object.clone()],
        body: Vec::new(),
    }];

    let args = class.ctor_args();
    if !args.is_empty() {
        let mut params = vec![Param::new("object_t*", OBJECT)];
        params.extend(
            args.iter()
                .enumerate()
                .map(|(i, arg)| Param::new(arg.native_spelling(), format!("arg{i}"))),
        );
        let forwarded = (0..args.len()).map(|i| Expr::ident(format!("arg{i}"))).collect();
        ctors.push(Function {
            sig: Signature::new("", wrapper, params),
            init_list: vec![Expr::call(&class.name, forwarded), keep_object],
            body: Vec::new(),
        });
    }
    ctors
}

/// Override of one virtual method that calls the managed implementation.
fn override_method(
    cx: MarshalCx<'_>,
    class: &ClassDecl,
    method: &Method,
) -> Result<Function, CodegenError> {
    trace!(class = %class.name, method = %method.name, "managed override");
    let ty = &method.ty;
    if ty.out().is_some() && !ty.ret.is_void() {
        return Err(CodegenError::new(CodegenErrorKind::VirtualOutAndReturn {
            class: class.name.clone(),
            method: method.name.clone(),
        }));
    }

    let mut params: Vec<Param> = ty
        .args
        .iter()
        .enumerate()
        .map(|(i, arg)| Param::new(arg.native_spelling(), format!("arg{i}")))
        .collect();
    if let Some(out) = ty.out() {
        params.push(Param::new(out_spelling(out), OUT_PARAM));
    }

    let managed = Expr::ident("this").arrow(symbols::WRAPPED_OBJECT_FIELD);
    let callee = Expr::cast(
        ty.closure_spelling(),
        Expr::call1(
            "val_as_pointer",
            Expr::call(
                "FIELD_READ",
                vec![
                    managed.clone(),
                    Expr::ident(symbols::managed_override(&method.name)),
                ],
            ),
        ),
    );

    let mut invoke_args = vec![Expr::call1("object_as_val", managed)];
    for (arg, param) in ty.args.iter().zip(&params) {
        invoke_args.push(arg.wrap(cx, Expr::ident(&param.name))?);
    }
    let call = callee.method_call("invoke", invoke_args);

    let body = match ty.out() {
        Some(out) => vec![Stmt::assign(Expr::ident(OUT_PARAM), out_value(cx, out, call)?)],
        None if ty.ret.is_void() => vec![Stmt::Expr(call)],
        None => vec![Stmt::ret(ty.ret.unwrap(cx, call)?)],
    };

    let sig = Signature::new(ty.ret.native_spelling(), &method.name, params);
    Ok(Function::new(sig, body))
}

/// Output parameters are references on the native side.
fn out_spelling(out: &Type) -> String {
    match out.as_named() {
        Some(named) => format!("{}&", named.name),
        None => format!("{}&", out.native_spelling()),
    }
}

/// The managed result converted to the referenced output type.
fn out_value(cx: MarshalCx<'_>, out: &Type, result: Expr) -> Result<Expr, CodegenError> {
    match out.as_named() {
        Some(named) => Type::Named(named.clone().by_ref()).unwrap(cx, result),
        None => out.unwrap(cx, result),
    }
}

/// `void* __weft_cpp_wrap_C(object_t* o) { return new WeftC(o); }`
fn factory(class: &ClassDecl, wrapper: &str) -> Function {
    Function::new(
        Signature::new(
            "void*",
            symbols::reverse_factory(&class.name),
            vec![Param::new("object_t*", OBJECT)],
        ),
        vec![Stmt::ret(Expr::new_object(wrapper, vec![Expr::ident(OBJECT)]))],
    )
}

/// Out-of-line definition name: `WeftC::m`.
fn qualified(wrapper: &str, mut function: Function) -> Function {
    function.sig.name = format!("{wrapper}::{}", function.sig.name);
    function
}
