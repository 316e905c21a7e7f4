//! Glue emitters, one module per kind of generated item.

mod cast;
mod ctor;
mod method;
mod reverse;
mod root;
mod shell;

pub(crate) use cast::casts;
pub(crate) use ctor::constructor;
pub(crate) use method::{method_glue, method_signature};
pub(crate) use reverse::reverse_wrapper;
pub(crate) use root::{aggregates, platform_hook};
pub(crate) use shell::{installer, installer_signature};

use weft_ir::symbols;

use crate::cpp::{Expr, Global, Init, Param};

const ENV: &str = "env";

/// `env_t env`, the leading parameter of every glue function.
fn env_param() -> Param {
    Param::new("env_t", ENV)
}

/// `_genclosure_t <closure> = { NULL, (void*)<code> };`
fn closure_record(closure: String, code: &str) -> Global {
    Global::aligned(
        "_genclosure_t",
        closure,
        Init::list([Expr::null(), Expr::cast("void*", Expr::ident(code))]),
    )
}

/// `value_t <sym>_box = { (void*)&<target> };`
fn box_of(symbol: &str, target: &str) -> Global {
    Global::aligned("value_t", symbols::boxed(symbol), Init::list([Expr::void_ptr_to(target)]))
}

/// `value_t* <sym> = &<sym>_box;`
fn pointer_export(symbol: &str) -> Global {
    Global::aligned(
        "value_t*",
        symbol,
        Init::Expr(Expr::ident(symbols::boxed(symbol)).addr_of()),
    )
}

/// Closure record, box and exported pointer for a symbol whose function is
/// `<sym>_code`.
fn closure_exports(symbol: &str) -> [Global; 3] {
    let closure = symbols::closure(symbol);
    [
        closure_record(closure.clone(), &symbols::code(symbol)),
        box_of(symbol, &closure),
        pointer_export(symbol),
    ]
}

/// `dynamic_cast<T*>((S*)val_as_object(v)->fields[0].ptr) != NULL`
fn compatibility_check(target: &str, source: &str, value: Expr) -> Expr {
    let source_pointer = Expr::cast(
        format!("{source}*"),
        Expr::call1("val_as_object", value).slot(0),
    );
    Expr::binary(
        "!=",
        Expr::call1(format!("dynamic_cast<{target}*>"), source_pointer),
        Expr::null(),
    )
}
