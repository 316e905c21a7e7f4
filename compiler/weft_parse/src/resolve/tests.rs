use super::*;
use crate::Declarations;
use pretty_assertions::assert_eq;
use weft_ir::ClassFlags;

fn declare(text: &str) -> ShapeRegistry {
    let mut decls = Declarations::new();
    decls.parse_file("ui.idl", text).unwrap();
    decls.shapes
}

fn resolve_ok(text: &str) -> (ClassRegistry, Vec<Diagnostic>) {
    let mut warnings = Vec::new();
    let classes = resolve(declare(text), &mut warnings).unwrap();
    (classes, warnings)
}

fn resolve_err(text: &str) -> ParseError {
    resolve(declare(text), &mut Vec::new()).unwrap_err()
}

const WIDGETS: &str = "\
class Widget {
    ^^constructor: [](string) -> void;
    show: []() -> void;
    static create: [](int) -> Widget;
    virtual onClick: [](int, int) -> bool;
}
class Button {
    deriving Wrappable;
    cast from Widget;
    pure virtual draw: [](Widget&) -> void;
    label: []() -> string;
}
";

#[test]
fn test_resolves_methods_in_order() {
    let (classes, warnings) = resolve_ok(WIDGETS);
    assert!(warnings.is_empty());
    assert_eq!(classes.names().collect::<Vec<_>>(), vec!["Widget", "Button"]);

    let widget = classes.get("Widget").unwrap();
    let names: Vec<_> = widget.methods().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["show", "create", "onClick"]);
    assert_eq!(widget.ctor_args(), &[Type::String]);
    assert_eq!(widget.impure_virtual, vec!["onClick".to_owned()]);
    assert_eq!(widget.method("create").unwrap().kind, MethodKind::Static);
    assert_eq!(widget.method("show").unwrap().origin.line, 3);
}

#[test]
fn test_resolves_flags_and_casts() {
    let (classes, _) = resolve_ok(WIDGETS);
    let button = classes.get("Button").unwrap();
    assert!(button.flags.contains(ClassFlags::EXTENSIBLE));
    assert_eq!(button.casts, vec!["Widget".to_owned()]);
    assert_eq!(button.pure_virtual, vec!["draw".to_owned()]);
    assert!(button.ctor.is_none());
}

#[test]
fn test_forward_references_resolve() {
    let (classes, _) = resolve_ok("class A {\n  next: []() -> B;\n}\nclass B {\n}\n");
    assert_eq!(classes.len(), 2);
}

#[test]
fn test_unknown_type_points_at_the_name() {
    let err = resolve_err("class A {\n    show: [](Foo, FooBar) -> void;\n}\nclass FooBar {\n}\n");
    assert_eq!(err.kind, ParseErrorKind::UnknownType { name: "Foo".into() });
    assert_eq!(err.span, Span::new(13, 16));
    assert_eq!(err.to_string(), "ui.idl:2: unknown type `Foo`");
}

#[test]
fn test_unknown_type_skips_longer_names() {
    let err = resolve_err("class Foo {\n  f: [](Foo, FooBar) -> void;\n}\n");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnknownType {
            name: "FooBar".into()
        }
    );
    assert_eq!(err.span, Span::new(13, 19));
}

#[test]
fn test_unknown_cast_source() {
    let err = resolve_err("class A {\n  cast from Missing;\n}\n");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnknownType {
            name: "Missing".into()
        }
    );
    assert_eq!(err.span, Span::new(12, 19));
    assert_eq!(
        err.context.as_deref(),
        Some("the casts of class `A`")
    );
}

#[test]
fn test_member_must_be_a_method() {
    let err = resolve_err("class A {\n  size: int;\n}\n");
    assert_eq!(
        err.kind,
        ParseErrorKind::NotAMethod {
            member: "size".into(),
            found: "int".into()
        }
    );
    assert_eq!(err.span, Span::new(8, 11));

    let err = resolve_err("class A {\n  ^^constructor: string;\n}\n");
    assert_eq!(
        err.kind,
        ParseErrorKind::NotAMethod {
            member: "constructor".into(),
            found: "string".into()
        }
    );
}

#[test]
fn test_pure_virtual_requires_extensible() {
    let err = resolve_err("class A {\n  pure virtual draw: []() -> void;\n}\n");
    assert_eq!(
        err.kind,
        ParseErrorKind::PureVirtualNotExtensible {
            class: "A".into(),
            method: "draw".into()
        }
    );
    assert_eq!(err.span, Span::new(15, 19));
    assert_eq!(err.code(), ErrorCode::E2005);
}

#[test]
fn test_redeclared_member_replaces_and_warns() {
    let (classes, warnings) = resolve_ok(
        "class A {\n  f: []() -> void;\n  g: []() -> void;\n  virtual f: [](int) -> int;\n}\n",
    );
    let a = classes.get("A").unwrap();
    let names: Vec<_> = a.methods().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["f", "g"]);
    assert_eq!(a.method("f").unwrap().kind, MethodKind::Virtual);
    assert_eq!(a.impure_virtual, vec!["f".to_owned()]);

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, ErrorCode::W2002);
    assert_eq!(warnings[0].primary_span(), Some(Span::new(10, 11)));
}

#[test]
fn test_redeclared_constructor_warns() {
    let (classes, warnings) = resolve_ok(
        "class A {\n  ^^constructor: []() -> void;\n  ^^constructor: [](int) -> void;\n}\n",
    );
    assert_eq!(classes.get("A").unwrap().ctor_args(), &[Type::INT]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("`constructor`"));
}

#[test]
fn test_signature_errors_carry_member_location() {
    let err = resolve_err("class A {\n\tf: [](int) int;\n}\n");
    assert_eq!(err.kind, ParseErrorKind::MissingArrow);
    assert_eq!(err.span, Span::new(12, 15));
    assert_eq!(err.location.map(|l| l.line), Some(2));
}

#[test]
fn test_find_word() {
    assert_eq!(find_word("f: [](FooBar, Foo)", "Foo", 0), Some(Span::new(14, 17)));
    assert_eq!(find_word("f: [](ui::Foo)", "Foo", 0), None);
    assert_eq!(find_word("Foo", "Foo", 0), Some(Span::new(0, 3)));
}
