//! Cast functions: re-view an object of a source class as the target class.

use tracing::trace;
use weft_ir::{symbols, CastEntry, ClassDecl, NamedType};

use super::{box_of, closure_record, compatibility_check, env_param, pointer_export};
use crate::cpp::{normalize, Expr, Function, Item, Param, Signature, Stmt};
use crate::marshal::{Marshal, MarshalCx};
use crate::CodegenError;

const VALUE: &str = "o";

/// One cast per `cast from` source of `class`, in declaration order.
pub(crate) fn casts(cx: MarshalCx<'_>, class: &ClassDecl) -> Result<Vec<Item>, CodegenError> {
    let mut items = Vec::new();
    for source in &class.casts {
        let entry = CastEntry {
            target: class.name.clone(),
            source: source.clone(),
        };
        items.extend(cast(cx, &entry).map_err(|e| {
            e.at(&class.origin)
                .while_generating(format!("the cast `{}`", entry.name()))
        })?);
    }
    Ok(items)
}

fn cast(cx: MarshalCx<'_>, entry: &CastEntry) -> Result<[Item; 3], CodegenError> {
    trace!(target = %entry.target, source = %entry.source, "cast");
    let symbol = symbols::cast(entry);
    let code = symbols::code(&symbol);
    let closure = symbols::closure(&symbol);

    let target = NamedType::new(&entry.target);
    let rewrapped = target.wrap(cx, target.unwrap(cx, Expr::ident(VALUE))?)?;
    let body = vec![
        Stmt::assert(compatibility_check(
            &entry.target,
            &entry.source,
            Expr::ident(VALUE),
        )),
        Stmt::ret(normalize(rewrapped)),
    ];
    let sig = Signature::new(
        "value_t",
        &code,
        vec![
            env_param(),
            Param::new("value_t", "dummy"),
            Param::new("value_t", VALUE),
        ],
    );

    Ok([
        Item::Function(Function::new(sig, body)),
        Item::Global(closure_record(closure.clone(), &code)),
        Item::ExternC(vec![box_of(&symbol, &closure), pointer_export(&symbol)]),
    ])
}
