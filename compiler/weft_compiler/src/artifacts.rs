//! The two JSON artifacts: the type descriptor and the linkage descriptor.
//!
//! Both are read off the same [`ShellLayout`](weft_ir::ShellLayout) and
//! [`RootLayout`] values the glue source is generated from.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use weft_ir::layout::CASTS_FIELD;
use weft_ir::{symbols, ClassRegistry, Descriptor, Member, RootLayout};

/// Render a value as JSON indented by four spaces.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Top-level descriptor entries: the root aggregate, then the platform hook.
pub fn type_descriptor(
    classes: &ClassRegistry,
    root: &RootLayout,
    hook_type: &str,
) -> Vec<Member> {
    let mut members: Vec<Member> = classes
        .iter()
        .map(|class| Member::new(class.name.clone(), class.constructor_descriptor()))
        .collect();

    let casts = root
        .casts()
        .iter()
        .map(|entry| {
            Member::new(
                entry.name(),
                Descriptor::function(
                    vec![Member::arg(Descriptor::name(&entry.source))],
                    Descriptor::name(&entry.target),
                ),
            )
        })
        .collect();
    members.push(Member::new(CASTS_FIELD, Descriptor::object(casts)));

    vec![
        Member::new(root.name(), Descriptor::object(members)),
        Member::new(
            symbols::PLATFORM_RETURN,
            Descriptor::function(vec![Member::arg(Descriptor::name(hook_type))], Descriptor::Void),
        ),
    ]
}

/// An exported global the runtime links against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Global {
    pub name: String,
    /// Whether the symbol names a boxed value rather than the value itself.
    pub boxed: bool,
}

/// A linker-provided dispatch table and its field order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Indirection {
    pub name: String,
    pub fields: Vec<String>,
}

/// Slot layouts of every dispatch table in the glue source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Linkage {
    pub globals: Vec<Global>,
    pub indirections: Vec<Indirection>,
}

/// One indirection per class in registry order, then the root and cast tables.
pub fn linkage(classes: &ClassRegistry, root: &RootLayout) -> Linkage {
    let mut indirections: Vec<Indirection> = classes
        .iter()
        .map(|class| Indirection {
            name: symbols::link_vtable(&class.name),
            fields: class.layout().field_names(),
        })
        .collect();
    indirections.push(Indirection {
        name: symbols::root_vtable(root.name()),
        fields: root.field_names(),
    });
    indirections.push(Indirection {
        name: symbols::CAST_VTABLE.to_owned(),
        fields: root.cast_names(),
    });

    Linkage {
        globals: vec![
            Global {
                name: symbols::PLATFORM_RETURN.to_owned(),
                boxed: true,
            },
            Global {
                name: root.name().to_owned(),
                boxed: true,
            },
        ],
        indirections,
    }
}
