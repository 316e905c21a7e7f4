//! The platform result hook and the static root and cast aggregates.

use weft_ir::{symbols, RootLayout};

use super::{box_of, closure_record, env_param, pointer_export};
use crate::cpp::{Expr, Function, Global, Init, Item, Param, Signature, Stmt};

/// Storage plus a closure the platform calls with the program's result.
pub(crate) fn platform_hook() -> Vec<Item> {
    let symbol = symbols::PLATFORM_RETURN;
    let storage = symbols::value(symbol);
    let code = symbols::code(symbol);
    let closure = symbols::closure(symbol);

    let hook = Function::new(
        Signature::new(
            "void",
            &code,
            vec![
                env_param(),
                Param::new("value_t", "dummy"),
                Param::new("value_t", "val"),
            ],
        ),
        vec![Stmt::assign(
            Expr::ident(&storage),
            Expr::call1("val_as_object", Expr::ident("val")),
        )],
    );

    vec![
        Item::Global(Global::plain(
            "object_t*",
            storage,
            Init::Expr(Expr::null()),
        )),
        Item::Function(hook),
        Item::Global(closure_record(closure.clone(), &code)),
        Item::ExternC(vec![box_of(symbol, &closure), pointer_export(symbol)]),
    ]
}

/// The cast aggregate, then the root aggregate pointing at every constructor
/// and at the cast aggregate, then the root's exports.
pub(crate) fn aggregates(root: &RootLayout) -> Vec<Item> {
    let cast_fields = root
        .casts()
        .iter()
        .map(|entry| Expr::void_ptr_to(symbols::closure(&symbols::cast(entry))));
    let cast_object = static_object(
        symbols::CAST_OBJECT,
        symbols::CAST_VTABLE,
        root.casts().len(),
        cast_fields,
    );

    let root_object = symbols::root_object(root.name());
    let root_fields = root
        .classes()
        .iter()
        .map(|class| Expr::void_ptr_to(symbols::closure(&symbols::constructor(class))))
        .chain(std::iter::once(Expr::void_ptr_to(symbols::CAST_OBJECT)));
    let root_aggregate = static_object(
        &root_object,
        &symbols::root_vtable(root.name()),
        root.field_count(),
        root_fields,
    );

    vec![
        Item::Global(cast_object),
        Item::Global(root_aggregate),
        Item::ExternC(vec![
            box_of(&root_object, &root_object),
            Global::aligned(
                "value_t*",
                root.name(),
                Init::Expr(Expr::ident(symbols::boxed(&root_object)).addr_of()),
            ),
        ]),
    ]
}

/// `cppobj<N,0> name = { .vtbl = ..., .__proto__ = NULL, .fields = { ... } };`
fn static_object(
    name: &str,
    vtable: &str,
    field_count: usize,
    fields: impl IntoIterator<Item = Expr>,
) -> Global {
    Global::aligned(
        format!("cppobj<{field_count},0>"),
        name,
        Init::Designated(vec![
            (
                "vtbl".to_owned(),
                Init::Expr(Expr::cast("object_map", Expr::ident(vtable).addr_of())),
            ),
            ("__proto__".to_owned(), Init::Expr(Expr::null())),
            ("fields".to_owned(), Init::list(fields)),
        ]),
    )
}
