//! Names of generated native symbols.
//!
//! The glue source defines these and the linkage descriptor refers to them,
//! so both go through the functions here.

use crate::CastEntry;

/// Platform result hook.
pub const PLATFORM_RETURN: &str = "__platform_return";

/// Static object holding every cast function.
pub const CAST_OBJECT: &str = "__cast_obj";

/// Dispatch table of [`CAST_OBJECT`].
pub const CAST_VTABLE: &str = "__cast_obj_vtbl";

/// Field of a reverse-dispatch wrapper that holds the managed object.
pub const WRAPPED_OBJECT_FIELD: &str = "___weft_obj";

/// Class name as an identifier fragment: `ui::Button` becomes `ui_Button`.
pub fn mangle(class: &str) -> String {
    class.replace("::", "_")
}

/// `__C__m`: glue function for method `m` of class `C`.
pub fn method_glue(class: &str, method: &str) -> String {
    format!("__{}__{method}", mangle(class))
}

/// `<sym>_clos`: static closure record pointing at `sym`.
pub fn closure(symbol: &str) -> String {
    format!("{symbol}_clos")
}

/// `<sym>_box`: boxed runtime value wrapping a closure or object.
pub fn boxed(symbol: &str) -> String {
    format!("{symbol}_box")
}

/// `<sym>_code`: the function behind an exported closure.
pub fn code(symbol: &str) -> String {
    format!("{symbol}_code")
}

/// `<sym>_val`: storage written by the platform result hook.
pub fn value(symbol: &str) -> String {
    format!("{symbol}_val")
}

/// `__C`: exported constructor.
pub fn constructor(class: &str) -> String {
    format!("__{}", mangle(class))
}

/// `__init_wrap_C`: the shell installer.
pub fn init_wrap(class: &str) -> String {
    format!("__init_wrap_{}", mangle(class))
}

/// `__link_vtbl_C`: linker-provided dispatch table of class `C`.
pub fn link_vtable(class: &str) -> String {
    format!("__link_vtbl_{}", mangle(class))
}

/// `__T_of_S`: exported cast.
pub fn cast(entry: &CastEntry) -> String {
    format!("__{}", mangle(&entry.name()))
}

/// `__weft_cpp_wrap_C`: reverse-dispatch factory.
pub fn reverse_factory(class: &str) -> String {
    format!("__weft_cpp_wrap_{}", mangle(class))
}

/// `WeftC`: native subclass forwarding virtual calls to managed code.
pub fn wrapper_class(class: &str) -> String {
    format!("Weft{}", mangle(class))
}

/// `___js_m`: managed field holding an override of `m`.
pub fn managed_override(method: &str) -> String {
    format!("___js_{method}")
}

/// `__Root`: static root aggregate object.
pub fn root_object(root: &str) -> String {
    format!("__{root}")
}

/// `__Root_vtbl`: dispatch table of the root aggregate.
pub fn root_vtable(root: &str) -> String {
    format!("__{root}_vtbl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_shapes() {
        assert_eq!(method_glue("Button", "click"), "__Button__click");
        assert_eq!(closure(&method_glue("Button", "click")), "__Button__click_clos");
        assert_eq!(code(&constructor("Button")), "__Button_code");
        assert_eq!(boxed(PLATFORM_RETURN), "__platform_return_box");
        assert_eq!(root_vtable("NativeLib"), "__NativeLib_vtbl");
        let entry = CastEntry {
            target: "Button".into(),
            source: "Widget".into(),
        };
        assert_eq!(cast(&entry), "__Button_of_Widget");
    }

    #[test]
    fn test_scoped_names_are_mangled() {
        assert_eq!(init_wrap("ui::Button"), "__init_wrap_ui_Button");
        assert_eq!(method_glue("ui::Button", "click"), "__ui_Button__click");
        assert_eq!(wrapper_class("ui::Button"), "Weftui_Button");
        let entry = CastEntry {
            target: "ui::Button".into(),
            source: "Widget".into(),
        };
        assert_eq!(cast(&entry), "__ui_Button_of_Widget");
    }
}
