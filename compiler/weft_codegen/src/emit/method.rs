//! Per-method glue: unwrap arguments, call the native method, wrap the result.

use tracing::trace;
use weft_ir::{symbols, ClassDecl, Method, MethodKind, MethodType, NamedType, Type};

use super::{closure_record, compatibility_check, env_param};
use crate::cpp::{Expr, Function, Item, Param, Signature, Stmt};
use crate::marshal::{Marshal, MarshalCx};
use crate::CodegenError;

const SELF_PARAM: &str = "_self";
const OUT_PARAM: &str = "outparam";
const RESULT: &str = "res";

/// `value_t __C__m(env_t env, value_t _self, value_t _arg0, ...)`
pub(crate) fn method_signature(class: &ClassDecl, method: &Method) -> Signature {
    let mut params = vec![env_param(), Param::new("value_t", SELF_PARAM)];
    params.extend(
        method
            .ty
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| Param::new(arg.glue_spelling(), format!("_arg{i}"))),
    );
    Signature::new(
        method.ty.result().glue_spelling(),
        symbols::method_glue(&class.name, &method.name),
        params,
    )
}

/// The glue function for one method and its closure record.
pub(crate) fn method_glue(
    cx: MarshalCx<'_>,
    class: &ClassDecl,
    method: &Method,
) -> Result<[Item; 2], CodegenError> {
    trace!(class = %class.name, method = %method.name, "method glue");
    let sig = method_signature(class, method);
    let body = glue_body(cx, class, method).map_err(|e| {
        e.at(&method.origin)
            .while_generating(format!("method glue for `{}::{}`", class.name, method.name))
    })?;
    let closure = closure_record(symbols::closure(&sig.name), &sig.name);
    Ok([
        Item::Function(Function::new(sig, body)),
        Item::Global(closure),
    ])
}

fn glue_body(
    cx: MarshalCx<'_>,
    class: &ClassDecl,
    method: &Method,
) -> Result<Vec<Stmt>, CodegenError> {
    let ty = &method.ty;
    let mut body = Vec::new();
    let mut call_args = Vec::with_capacity(ty.args.len() + 1);

    for (i, arg) in ty.args.iter().enumerate() {
        let local = format!("arg{i}");
        let value = arg.unwrap(cx, Expr::ident(format!("_arg{i}")))?;
        body.push(Stmt::local(arg.native_spelling(), &local, value));
        call_args.push(Expr::ident(local));
    }

    for (i, arg) in ty.args.iter().enumerate() {
        if let Some(named) = arg.as_named() {
            body.push(Stmt::assert(compatibility_check(
                &named.name,
                &named.name,
                Expr::ident(format!("_arg{i}")),
            )));
        }
    }

    if let Some(out) = ty.out() {
        let (decl, arg) = out_param(out);
        body.push(decl);
        call_args.push(arg);
    }

    let call = if method.kind == MethodKind::Static {
        Expr::call(format!("{}::{}", class.name, method.name), call_args)
    } else {
        NamedType::new(&class.name)
            .unwrap(cx, Expr::ident(SELF_PARAM))?
            .method_call(&method.name, call_args)
    };

    if ty.ret.is_void() {
        body.push(Stmt::Expr(call));
    } else {
        let ret = ty.ret.native_spelling();
        body.push(Stmt::local(&ret, RESULT, Expr::cast(&ret, call)));
    }

    if let Some(ret) = glue_result(cx, ty)? {
        body.push(Stmt::ret(ret));
    }
    Ok(body)
}

/// Storage for an output parameter and the argument that passes it.
///
/// Class instances are heap allocated so the result can be wrapped after the
/// call returns.
fn out_param(out: &Type) -> (Stmt, Expr) {
    match out.as_named() {
        Some(named) => (
            Stmt::local(
                format!("{}*", named.name),
                OUT_PARAM,
                Expr::new_object(&named.name, Vec::new()),
            ),
            Expr::ident(OUT_PARAM).deref(),
        ),
        None => (
            Stmt::Local {
                decl: Param::new(out.native_spelling(), OUT_PARAM),
                init: None,
            },
            Expr::ident(OUT_PARAM),
        ),
    }
}

/// The wrapped value handed back to the runtime: the output parameter if
/// there is one, else the return value.
fn glue_result(cx: MarshalCx<'_>, ty: &MethodType) -> Result<Option<Expr>, CodegenError> {
    if let Some(out) = ty.out() {
        let wrapped = match out.as_named() {
            Some(named) => NamedType::new(&named.name).wrap(cx, Expr::ident(OUT_PARAM))?,
            None => out.wrap(cx, Expr::ident(OUT_PARAM))?,
        };
        return Ok(Some(wrapped));
    }
    if ty.ret.is_void() {
        return Ok(None);
    }
    ty.ret.wrap(cx, Expr::ident(RESULT)).map(Some)
}
