//! Constructor glue and its exported closure.

use tracing::trace;
use weft_ir::{symbols, ClassDecl};

use super::{closure_exports, env_param};
use crate::cpp::{Expr, Function, Item, Param, Signature, Stmt};
use crate::marshal::{Marshal, MarshalCx};
use crate::CodegenError;

const SHELL: &str = "self";

/// `value_t __C_code(env_t env, value_t _self, value_t arg0, ...)` plus the
/// `__C_clos`, `__C_box` and `__C` exports.
pub(crate) fn constructor(cx: MarshalCx<'_>, class: &ClassDecl) -> Result<Vec<Item>, CodegenError> {
    trace!(class = %class.name, "constructor glue");
    let symbol = symbols::constructor(&class.name);

    let mut params = vec![env_param(), Param::new("value_t", "_self")];
    params.extend(
        (0..class.ctor_args().len()).map(|i| Param::new("value_t", format!("arg{i}"))),
    );
    let sig = Signature::new("value_t", symbols::code(&symbol), params);

    let instance = native_instance(cx, class).map_err(|e| {
        e.at(&class.origin)
            .while_generating(format!("the constructor of `{}`", class.name))
    })?;
    let body = vec![
        Stmt::local(
            "object_t*",
            SHELL,
            Expr::call1("val_as_object", Expr::ident("_self")),
        ),
        Stmt::Expr(Expr::call(
            symbols::init_wrap(&class.name),
            vec![Expr::ident(SHELL), instance],
        )),
        Stmt::ret(Expr::call1("object_as_val", Expr::ident(SHELL))),
    ];

    let mut items = vec![Item::Function(Function::new(sig, body))];
    items.extend(closure_exports(&symbol).map(Item::Global));
    Ok(items)
}

/// The native object behind a new shell.
///
/// Classes with pure virtual methods cannot be instantiated directly, so the
/// reverse-dispatch wrapper is built instead and given the shell.
fn native_instance(cx: MarshalCx<'_>, class: &ClassDecl) -> Result<Expr, CodegenError> {
    if !class.constructs_instance() {
        return Ok(Expr::null());
    }
    let mut args = Vec::with_capacity(class.ctor_args().len() + 1);
    if class.has_pure_virtual() {
        args.push(Expr::ident(SHELL));
    }
    for (i, arg) in class.ctor_args().iter().enumerate() {
        args.push(arg.unwrap(cx, Expr::ident(format!("arg{i}")))?);
    }
    let ty = if class.has_pure_virtual() {
        symbols::wrapper_class(&class.name)
    } else {
        class.name.clone()
    };
    Ok(Expr::new_object(ty, args))
}
