//! Slot layouts.
//!
//! A managed object wrapping a native instance is a fixed-size shell of
//! pointer slots. [`ShellLayout`] decides which slot holds what; the installer
//! routine, the object descriptor and the linkage field list all read it.
//! [`RootLayout`] does the same for the root aggregate and its cast table.

use crate::{ClassDecl, ClassRegistry};

/// Field name of slot 0, the native instance pointer.
pub const NATIVE_INSTANCE_FIELD: &str = "_____cpp_receiver";

/// Field name of slot 1 on extensible classes, the reverse-dispatch factory.
pub const REVERSE_FACTORY_FIELD: &str = "_____gen_cpp_proxy";

/// Root aggregate field holding the cast table.
pub const CASTS_FIELD: &str = "casts";

/// What a shell slot holds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Slot {
    NativeInstance,
    ReverseFactory,
    /// Closure for the method at `index` in the class's method list.
    Method { name: String, index: usize },
}

impl Slot {
    pub fn field_name(&self) -> &str {
        match self {
            Slot::NativeInstance => NATIVE_INSTANCE_FIELD,
            Slot::ReverseFactory => REVERSE_FACTORY_FIELD,
            Slot::Method { name, .. } => name,
        }
    }
}

/// Slot layout of one class's object shell.
///
/// Slot 0 is always the native instance, so any shell can be read as its
/// base class by native code.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ShellLayout {
    slots: Vec<Slot>,
}

impl ShellLayout {
    pub fn of(class: &ClassDecl) -> Self {
        let mut slots = vec![Slot::NativeInstance];
        if class.is_extensible() {
            slots.push(Slot::ReverseFactory);
        }
        slots.extend(
            class
                .methods()
                .iter()
                .enumerate()
                .map(|(index, m)| Slot::Method {
                    name: m.name.clone(),
                    index,
                }),
        );
        ShellLayout { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of slots; the `N` in `cppobj<N,0>`.
    pub fn field_count(&self) -> usize {
        self.slots.len()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.field_name().to_owned()).collect()
    }
}

/// A `cast from` edge: values of `source` may be re-viewed as `target`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CastEntry {
    pub target: String,
    pub source: String,
}

impl CastEntry {
    /// `Target_of_Source`.
    pub fn name(&self) -> String {
        format!("{}_of_{}", self.target, self.source)
    }
}

/// Layout of the root aggregate and its cast table.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RootLayout {
    name: String,
    classes: Vec<String>,
    casts: Vec<CastEntry>,
}

impl RootLayout {
    /// Classes in registry order; casts in registry order, then declaration
    /// order within each class.
    pub fn of(registry: &ClassRegistry, name: impl Into<String>) -> Self {
        let classes = registry.names().map(str::to_owned).collect();
        let casts = registry
            .iter()
            .flat_map(|class| {
                class.casts.iter().map(|source| CastEntry {
                    target: class.name.clone(),
                    source: source.clone(),
                })
            })
            .collect();
        RootLayout {
            name: name.into(),
            classes,
            casts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn casts(&self) -> &[CastEntry] {
        &self.casts
    }

    /// Class names followed by the cast table field.
    pub fn field_names(&self) -> Vec<String> {
        let mut fields = self.classes.clone();
        fields.push(CASTS_FIELD.to_owned());
        fields
    }

    pub fn field_count(&self) -> usize {
        self.classes.len() + 1
    }

    pub fn cast_names(&self) -> Vec<String> {
        self.casts.iter().map(CastEntry::name).collect()
    }
}

#[cfg(test)]
mod tests;
