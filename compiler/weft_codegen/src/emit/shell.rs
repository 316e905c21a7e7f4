//! The shell installer: points a fresh object at the class's dispatch table
//! and fills every slot of its [`ShellLayout`](weft_ir::ShellLayout).

use weft_ir::{symbols, ClassDecl, Slot};

use crate::cpp::{Expr, Function, Item, Param, Signature, Stmt};

const SHELL: &str = "self";
const INSTANCE: &str = "o";

/// `object_t* __init_wrap_C(object_t* self, C* o)`
pub(crate) fn installer_signature(class: &ClassDecl) -> Signature {
    Signature::new(
        "object_t*",
        symbols::init_wrap(&class.name),
        vec![
            Param::new("object_t*", SHELL),
            Param::new(format!("{}*", class.name), INSTANCE),
        ],
    )
}

pub(crate) fn installer(class: &ClassDecl) -> Item {
    let vtable = symbols::link_vtable(&class.name);
    let mut body = vec![
        Stmt::assert(Expr::binary("!=", Expr::ident(&vtable), Expr::null())),
        Stmt::assign(
            Expr::ident(SHELL).arrow("vtbl"),
            Expr::cast("object_map", Expr::ident(&vtable).addr_of()),
        ),
    ];

    for (index, slot) in class.layout().slots().iter().enumerate() {
        let value = match slot {
            Slot::NativeInstance => Expr::cast("void*", Expr::ident(INSTANCE)),
            Slot::ReverseFactory => Expr::call1(
                "reinterpret_cast<void*>",
                Expr::ident(symbols::reverse_factory(&class.name)),
            ),
            Slot::Method { name, .. } => {
                Expr::void_ptr_to(symbols::closure(&symbols::method_glue(&class.name, name)))
            }
        };
        body.push(Stmt::assign(Expr::ident(SHELL).slot(index), value));
    }

    body.push(Stmt::ret(Expr::ident(SHELL)));
    Item::Function(Function::new(installer_signature(class), body))
}
