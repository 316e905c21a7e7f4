use pretty_assertions::assert_eq;
use proptest::prelude::*;
use weft_diagnostic::ErrorCode;
use weft_ir::{ClassRegistry, RootLayout};

use crate::test_support::registry;
use crate::{generate_source, GlueSource};

const UI: &str = "\
#include \"ui.h\"
class Widget {
    show: []() -> void;
    resize: [](int, int) -> bool;
}
class Button {
    deriving Wrappable;
    cast from Widget;
    ^^constructor: [](string) -> void;
    virtual click: [](int) -> void;
    pure virtual label: []() -> string;
    measure: [](out Widget) -> void;
    static create: [](string) -> Button;
}
class Panel {
    noconstructor;
    add: [](Widget) -> void;
}
";

fn generate(classes: &ClassRegistry) -> Result<String, crate::CodegenError> {
    let root = RootLayout::of(classes, "NativeLib");
    generate_source(&GlueSource {
        classes,
        root: &root,
        includes: &["#include \"ui.h\"".to_owned()],
        inline_glue: &["int helper() { return 1; }".to_owned()],
    })
}

fn source() -> String {
    generate(&registry(UI)).unwrap()
}

/// The definition starting at `header`, through its closing brace.
///
/// Prototypes share the header, so only a line that opens a body counts.
fn function<'a>(source: &'a str, header: &str) -> &'a str {
    let start = source
        .match_indices(header)
        .map(|(start, _)| start)
        .find(|&start| {
            let line_end = source[start..].find('\n').map_or(source.len(), |n| start + n);
            source[..start].ends_with('\n') && source[start..line_end].ends_with(" {")
        })
        .unwrap_or_else(|| panic!("missing definition `{header}` in:\n{source}"));
    let len = source[start..].find("\n}\n").unwrap();
    &source[start..start + len + 3]
}

#[test]
fn test_prototypes_precede_definitions() {
    let src = source();
    let prototype = src
        .find("value_t __Widget__resize(env_t env, value_t _self, value_t _arg0, value_t _arg1);\n")
        .unwrap();
    let definition = src
        .find("value_t __Widget__resize(env_t env, value_t _self, value_t _arg0, value_t _arg1) {\n")
        .unwrap();
    assert!(prototype < definition);
    assert!(function(&src, "value_t __Widget__resize(").ends_with("\n}\n"));
}

#[test]
fn test_method_glue() {
    let src = source();
    assert_eq!(
        function(&src, "value_t __Widget__resize("),
        "\
value_t __Widget__resize(env_t env, value_t _self, value_t _arg0, value_t _arg1) {
    int arg0 = val_as_int(_arg0);
    int arg1 = val_as_int(_arg1);
    bool res = ((bool)((Widget*)val_as_object(_self)->fields[0].ptr)->resize(arg0, arg1));
    return boolean_as_val(res);
}
"
    );
    assert!(src.contains(
        "__attribute__((__aligned__(8))) _genclosure_t __Widget__resize_clos = \
         { NULL, ((void*)__Widget__resize) };"
    ));
    assert_eq!(
        function(&src, "void __Widget__show("),
        "\
void __Widget__show(env_t env, value_t _self) {
    ((Widget*)val_as_object(_self)->fields[0].ptr)->show();
}
"
    );
}

#[test]
fn test_named_argument_is_checked() {
    let src = source();
    assert_eq!(
        function(&src, "void __Panel__add("),
        "\
void __Panel__add(env_t env, value_t _self, value_t _arg0) {
    Widget* arg0 = ((Widget*)val_as_object(_arg0)->fields[0].ptr);
    assert(dynamic_cast<Widget*>(((Widget*)val_as_object(_arg0)->fields[0].ptr)) != NULL);
    ((Panel*)val_as_object(_self)->fields[0].ptr)->add(arg0);
}
"
    );
}

#[test]
fn test_out_parameter_is_heap_allocated_and_returned() {
    let src = source();
    assert_eq!(
        function(&src, "value_t __Button__measure("),
        "\
value_t __Button__measure(env_t env, value_t _self) {
    Widget* outparam = new Widget();
    ((Button*)val_as_object(_self)->fields[0].ptr)->measure(*outparam);
    return object_as_val(__init_wrap_Widget(((object_t*)new cppobj<3,0>()), ((Widget*)outparam)));
}
"
    );
}

#[test]
fn test_static_method_has_no_receiver() {
    let src = source();
    let glue = function(&src, "value_t __Button__create(");
    assert!(glue.contains("Button* res = ((Button*)Button::create(arg0));"));
    assert!(!glue.contains("val_as_object(_self)"));
}

#[test]
fn test_installer_fills_slots_in_layout_order() {
    let src = source();
    assert_eq!(
        function(&src, "object_t* __init_wrap_Button(object_t* self, Button* o) {"),
        "\
object_t* __init_wrap_Button(object_t* self, Button* o) {
    assert(__link_vtbl_Button != NULL);
    self->vtbl = ((object_map)&__link_vtbl_Button);
    self->fields[0].ptr = ((void*)o);
    self->fields[1].ptr = reinterpret_cast<void*>(__weft_cpp_wrap_Button);
    self->fields[2].ptr = ((void*)&__Button__click_clos);
    self->fields[3].ptr = ((void*)&__Button__label_clos);
    self->fields[4].ptr = ((void*)&__Button__measure_clos);
    self->fields[5].ptr = ((void*)&__Button__create_clos);
    return self;
}
"
    );
}

#[test]
fn test_constructors() {
    let src = source();
    assert!(src.contains("    __init_wrap_Widget(self, new Widget());"));
    assert!(src.contains("    __init_wrap_Panel(self, NULL);"));
    assert_eq!(
        function(&src, "value_t __Button_code("),
        "\
value_t __Button_code(env_t env, value_t _self, value_t arg0) {
    object_t* self = val_as_object(_self);
    __init_wrap_Button(self, new WeftButton(self, val_as_string(arg0)));
    return object_as_val(self);
}
"
    );
    assert!(src.contains(
        "__attribute__((__aligned__(8))) value_t __Button_box = { ((void*)&__Button_clos) };"
    ));
    assert!(src.contains("__attribute__((__aligned__(8))) value_t* __Button = &__Button_box;"));
}

#[test]
fn test_reverse_wrapper() {
    let src = source();
    assert!(src.contains(
        "\
class WeftButton : public Button {
private:
    object_t* ___weft_obj;
public:
    WeftButton(object_t* o);
    WeftButton(object_t* o, wchar_t* arg0);
    virtual void click(int arg0);
    virtual wchar_t* label();
};
"
    ));
    assert!(src.contains("WeftButton::WeftButton(object_t* o) : ___weft_obj(o) {\n}\n"));
    assert!(src.contains(
        "WeftButton::WeftButton(object_t* o, wchar_t* arg0) : Button(arg0), ___weft_obj(o) {\n}\n"
    ));
    assert_eq!(
        function(&src, "void WeftButton::click("),
        "\
void WeftButton::click(int arg0) {
    ((closure<void, value_t, value_t>*)val_as_pointer(FIELD_READ(this->___weft_obj, ___js_click)))->invoke(object_as_val(this->___weft_obj), int_as_val(arg0));
}
"
    );
    assert_eq!(
        function(&src, "wchar_t* WeftButton::label("),
        "\
wchar_t* WeftButton::label() {
    return val_as_string(((closure<value_t, value_t>*)val_as_pointer(FIELD_READ(this->___weft_obj, ___js_label)))->invoke(object_as_val(this->___weft_obj)));
}
"
    );
    assert!(src.contains(
        "void* __weft_cpp_wrap_Button(object_t* o) {\n    return new WeftButton(o);\n}\n"
    ));
}

#[test]
fn test_wrapper_only_for_extensible_classes() {
    let src = source();
    assert!(!src.contains("WeftWidget"));
    assert!(!src.contains("WeftPanel"));
}

#[test]
fn test_cast_function() {
    let src = source();
    assert_eq!(
        function(&src, "value_t __Button_of_Widget_code("),
        "\
value_t __Button_of_Widget_code(env_t env, value_t dummy, value_t o) {
    assert(dynamic_cast<Button*>(((Widget*)val_as_object(o)->fields[0].ptr)) != NULL);
    return object_as_val(__init_wrap_Button(((object_t*)new cppobj<6,0>()), ((Button*)val_as_object(o)->fields[0].ptr)));
}
"
    );
    assert!(src.contains(
        "\
extern \"C\" {
    __attribute__((__aligned__(8))) value_t __Button_of_Widget_box = { ((void*)&__Button_of_Widget_clos) };
    __attribute__((__aligned__(8))) value_t* __Button_of_Widget = &__Button_of_Widget_box;
}
"
    ));
}

#[test]
fn test_aggregates_follow_root_layout() {
    let src = source();
    assert!(src.contains(
        "__attribute__((__aligned__(8))) cppobj<1,0> __cast_obj = { .vtbl = ((object_map)&__cast_obj_vtbl), \
         .__proto__ = NULL, .fields = { ((void*)&__Button_of_Widget_clos) } };"
    ));
    assert!(src.contains(
        "__attribute__((__aligned__(8))) cppobj<4,0> __NativeLib = { .vtbl = ((object_map)&__NativeLib_vtbl), \
         .__proto__ = NULL, .fields = { ((void*)&__Widget_clos), ((void*)&__Button_clos), \
         ((void*)&__Panel_clos), ((void*)&__cast_obj) } };"
    ));
    assert!(src.contains("value_t* NativeLib = &__NativeLib_box;"));
}

#[test]
fn test_platform_hook() {
    let src = source();
    assert!(src.contains("object_t* __platform_return_val = NULL;\n"));
    assert_eq!(
        function(&src, "void __platform_return_code("),
        "\
void __platform_return_code(env_t env, value_t dummy, value_t val) {
    __platform_return_val = val_as_object(val);
}
"
    );
    assert!(src.contains("value_t* __platform_return = &__platform_return_box;"));
}

#[test]
fn test_file_order() {
    let src = source();
    let order = [
        "namespace std { struct type_info; }",
        "#include \"runtime.h\"",
        "#include \"ui.h\"",
        "typedef struct { env_t env; void* func; } _genclosure_t;",
        "class Widget;",
        "extern int __link_vtbl_Widget[];",
        "extern int __cast_obj_vtbl[];",
        "extern int __NativeLib_vtbl[];",
        "object_t* __init_wrap_Widget(object_t* self, Widget* o);",
        "value_t __Widget__resize(env_t env, value_t _self, value_t _arg0, value_t _arg1);",
        "value_t __Widget__resize(env_t env, value_t _self, value_t _arg0, value_t _arg1) {",
        "class WeftButton : public Button {",
        "value_t __Button_of_Widget_code(",
        "value_t __Button__measure(env_t env, value_t _self) {",
        "object_t* __init_wrap_Button(object_t* self, Button* o) {",
        "value_t __Button_code(",
        "void __platform_return_code(",
        "cppobj<1,0> __cast_obj",
        "cppobj<4,0> __NativeLib",
        "int helper() { return 1; }",
    ];
    let mut from = 0;
    for needle in order {
        let at = src[from..]
            .find(needle)
            .unwrap_or_else(|| panic!("`{needle}` missing or out of order"));
        from += at + needle.len();
    }
}

#[test]
fn test_scoped_class_names() {
    let classes = registry("class ui::Knob {\n    turn: [](int) -> void;\n}\n");
    let src = generate(&classes).unwrap();
    assert!(src.contains("namespace ui { class Knob; }"));
    assert!(src.contains("extern int __link_vtbl_ui_Knob[];"));
    assert!(src.contains("object_t* __init_wrap_ui_Knob(object_t* self, ui::Knob* o) {"));
    assert!(src.contains("((ui::Knob*)val_as_object(_self)->fields[0].ptr)->turn(arg0);"));
}

#[test]
fn test_void_argument_is_located() {
    let classes = registry("class A {\n    f: [](int, void) -> void;\n}\n");
    let err = generate(&classes).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(err.location.as_ref().map(|l| l.line), Some(2));
    assert_eq!(err.context.as_deref(), Some("method glue for `A::f`"));
}

#[test]
fn test_virtual_out_and_return_is_rejected() {
    let classes = registry(
        "class B {\n}\nclass A {\n    deriving Wrappable;\n    virtual get: [](out B) -> int;\n}\n",
    );
    let err = generate(&classes).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2006);
    assert_eq!(err.location.as_ref().map(|l| l.line), Some(5));
}

#[test]
fn test_virtual_out_is_assigned() {
    let classes = registry(
        "class B {\n}\nclass A {\n    deriving Wrappable;\n    virtual fill: [](int, out B) -> void;\n}\n",
    );
    let src = generate(&classes).unwrap();
    assert!(src.contains("    virtual void fill(int arg0, B& outparam);"));
    assert!(src.contains(
        "    outparam = *((B*)val_as_object(((closure<value_t, value_t, value_t>*)val_as_pointer(\
         FIELD_READ(this->___weft_obj, ___js_fill)))->invoke(object_as_val(this->___weft_obj), \
         int_as_val(arg0)))->fields[0].ptr);"
    ));
}

#[test]
fn test_wrapper_never_instantiated_without_pure_virtual() {
    let classes = registry(
        "class A {\n    deriving Wrappable;\n    virtual draw: []() -> void;\n}\n",
    );
    let src = generate(&classes).unwrap();
    assert!(src.contains("class WeftA : public A {"));
    assert!(src.contains("__init_wrap_A(self, new A());"));
    assert!(!src.contains("new WeftA(self"));
}

fn method_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("m_[a-z0-9]{1,6}", 1..8).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_installer_matches_layout(names in method_names(), extensible in any::<bool>()) {
        let mut idl = String::from("class C {\n");
        if extensible {
            idl.push_str("    deriving Wrappable;\n");
        }
        for name in &names {
            idl.push_str(&format!("    {name}: []() -> void;\n"));
        }
        idl.push_str("}\n");

        let classes = registry(&idl);
        let layout = classes.get("C").unwrap().layout();
        let reserved = if extensible { 2 } else { 1 };
        prop_assert_eq!(&layout.field_names()[reserved..], names.as_slice());

        let src = generate(&classes).unwrap();
        for (i, name) in names.iter().enumerate() {
            let line = format!("self->fields[{}].ptr = ((void*)&__C__{name}_clos);", i + reserved);
            prop_assert!(src.contains(&line), "missing `{}`", line);
        }
    }

    #[test]
    fn prop_one_cast_per_source(count in 1usize..5) {
        let sources: Vec<String> = (0..count).map(|i| format!("S{i}")).collect();
        let mut idl = format!("class T {{\n    cast from {};\n}}\n", sources.join(", "));
        for source in &sources {
            idl.push_str(&format!("class {source} {{\n}}\n"));
        }
        let classes = registry(&idl);
        let src = generate(&classes).unwrap();

        prop_assert_eq!(src.matches("_code(env_t env, value_t dummy, value_t o) {").count(), count);
        for source in &sources {
            let check = format!("assert(dynamic_cast<T*>((({source}*)val_as_object(o)->fields[0].ptr)) != NULL);");
            prop_assert!(src.contains(&check));
        }
        let fields = format!("cppobj<{count},0> __cast_obj");
        prop_assert!(src.contains(&fields));
    }
}
