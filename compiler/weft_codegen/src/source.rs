//! Assembly of the complete glue source file.

use tracing::debug;
use weft_ir::{symbols, ClassRegistry, RootLayout};

use crate::cpp::{self, Global, Item};
use crate::emit;
use crate::marshal::MarshalCx;
use crate::CodegenError;

const PREAMBLE: &str = "\
// Workaround for a gcc 4.4/4.5 C++11 bug: https://llvm.org/bugs/show_bug.cgi?id=13364
namespace std { struct type_info; }
#include \"runtime.h\"
#include \"linkage.h\"
#include <functional>";

const CLOSURE_TYPEDEF: &str = "typedef struct { env_t env; void* func; } _genclosure_t;";

/// Everything the glue source is generated from.
#[derive(Copy, Clone)]
pub struct GlueSource<'a> {
    pub classes: &'a ClassRegistry,
    pub root: &'a RootLayout,
    /// `#include` and `using namespace` lines, in input order.
    pub includes: &'a [String],
    /// Verbatim lines following `inline:` markers.
    pub inline_glue: &'a [String],
}

impl GlueSource<'_> {
    /// Build every item of the source file in output order.
    pub fn items(&self) -> Result<Vec<Item>, CodegenError> {
        let cx = MarshalCx::new(self.classes);
        let mut items = vec![Item::Raw(PREAMBLE.to_owned())];
        items.extend(self.includes.iter().cloned().map(Item::Raw));
        items.push(Item::Raw(CLOSURE_TYPEDEF.to_owned()));
        items.push(Item::Blank);
        self.forward_declarations(&mut items);

        for class in self.classes {
            debug!(class = %class.name, methods = class.methods().len(), "generating class");
            items.push(Item::Blank);
            items.extend(emit::reverse_wrapper(cx, class)?);
            items.extend(emit::casts(cx, class)?);
            for method in class.methods() {
                items.extend(emit::method_glue(cx, class, method)?);
            }
            items.push(emit::installer(class));
            items.extend(emit::constructor(cx, class)?);
        }

        items.push(Item::Blank);
        items.extend(emit::platform_hook());
        items.push(Item::Blank);
        items.extend(emit::aggregates(self.root));

        if !self.inline_glue.is_empty() {
            items.push(Item::Blank);
            items.push(Item::Raw(self.inline_glue.join("\n")));
        }
        Ok(items)
    }

    /// Forward class declarations, linker-provided tables and prototypes for
    /// everything referenced before its definition.
    fn forward_declarations(&self, items: &mut Vec<Item>) {
        items.extend(self.classes.names().map(|name| Item::ForwardClass(name.to_owned())));

        let mut tables: Vec<String> = self
            .classes
            .names()
            .map(symbols::link_vtable)
            .collect();
        tables.push(symbols::CAST_VTABLE.to_owned());
        tables.push(symbols::root_vtable(self.root.name()));
        items.extend(
            tables
                .into_iter()
                .map(|table| Item::Global(Global::extern_decl("int", format!("{table}[]")))),
        );

        for class in self.classes {
            items.push(Item::Prototype(emit::installer_signature(class)));
            items.extend(
                class
                    .methods()
                    .iter()
                    .map(|method| Item::Prototype(emit::method_signature(class, method))),
            );
        }
    }
}

/// Generate the glue source text.
pub fn generate_source(source: &GlueSource<'_>) -> Result<String, CodegenError> {
    let items = source.items()?;
    debug!(items = items.len(), "rendering glue source");
    Ok(cpp::render(&items))
}
