use super::*;
use crate::{ClassFlags, LineRef, Method, MethodKind, MethodType, Type};
use pretty_assertions::assert_eq;

fn class(name: &str, flags: ClassFlags, methods: &[&str]) -> ClassDecl {
    let origin = LineRef::new("lib.idl", 1, format!("class {name} {{"));
    let mut decl = ClassDecl::new(name, origin.clone(), flags);
    for m in methods {
        decl.insert_method(Method {
            name: (*m).to_owned(),
            kind: MethodKind::Instance,
            ty: MethodType::new(vec![], Type::VOID),
            origin: origin.clone(),
        });
    }
    decl
}

#[test]
fn test_plain_class_layout() {
    let layout = ShellLayout::of(&class("C", ClassFlags::empty(), &["m1", "m2", "m3"]));
    assert_eq!(
        layout.field_names(),
        vec!["_____cpp_receiver", "m1", "m2", "m3"]
    );
    assert_eq!(layout.field_count(), 4);
    assert!(!layout.slots().contains(&Slot::ReverseFactory));
    assert_eq!(
        layout.slots()[2],
        Slot::Method {
            name: "m2".into(),
            index: 1
        }
    );
}

#[test]
fn test_extensible_class_layout() {
    let layout = ShellLayout::of(&class("C", ClassFlags::EXTENSIBLE, &["m1", "m2"]));
    assert_eq!(
        layout.field_names(),
        vec!["_____cpp_receiver", "_____gen_cpp_proxy", "m1", "m2"]
    );
    assert_eq!(layout.slots()[1], Slot::ReverseFactory);
    assert_eq!(
        layout.slots()[3],
        Slot::Method {
            name: "m2".into(),
            index: 1
        }
    );
}

#[test]
fn test_empty_class_has_only_receiver() {
    let layout = ShellLayout::of(&class("Empty", ClassFlags::empty(), &[]));
    assert_eq!(layout.field_count(), 1);
    assert_eq!(layout.slots(), &[Slot::NativeInstance]);
}

#[test]
fn test_root_layout_orders_classes_then_casts() {
    let mut registry = ClassRegistry::new();
    let mut button = class("Button", ClassFlags::empty(), &[]);
    button.casts = vec!["Widget".into(), "Object".into()];
    let mut label = class("Label", ClassFlags::empty(), &[]);
    label.casts = vec!["Widget".into()];
    registry.insert(class("Widget", ClassFlags::empty(), &[]));
    registry.insert(button);
    registry.insert(label);

    let root = RootLayout::of(&registry, "NativeLib");
    assert_eq!(root.name(), "NativeLib");
    assert_eq!(root.field_names(), vec!["Widget", "Button", "Label", "casts"]);
    assert_eq!(root.field_count(), 4);
    assert_eq!(
        root.cast_names(),
        vec!["Button_of_Widget", "Button_of_Object", "Label_of_Widget"]
    );
}
