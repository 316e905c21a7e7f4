//! Ordered class registry.
//!
//! Insertion order is the order classes appear across the input files and is
//! load-bearing: it fixes the root aggregate's field order. Entries are never
//! removed; redeclaring a name replaces the entry at its first position.

use rustc_hash::FxHashMap;

use crate::{ClassDecl, ClassShape};

/// Anything that can be stored in a [`Registry`].
pub trait RegistryEntry {
    fn name(&self) -> &str;
}

impl RegistryEntry for ClassShape {
    fn name(&self) -> &str {
        &self.name
    }
}

impl RegistryEntry for ClassDecl {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Registry after the declaration pass.
pub type ShapeRegistry = Registry<ClassShape>;

/// Registry after signature resolution; the only form code generation accepts.
pub type ClassRegistry = Registry<ClassDecl>;

/// Ordered map from class name to entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registry<C> {
    entries: Vec<C>,
    index: FxHashMap<String, usize>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Registry {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<C: RegistryEntry> Registry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. An existing entry with the same name is replaced in
    /// place and returned.
    pub fn insert(&mut self, entry: C) -> Option<C> {
        if let Some(&idx) = self.index.get(entry.name()) {
            return Some(std::mem::replace(&mut self.entries[idx], entry));
        }
        self.index.insert(entry.name().to_owned(), self.entries.len());
        self.entries.push(entry);
        None
    }

    pub fn get(&self, name: &str) -> Option<&C> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(RegistryEntry::name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transform every entry, keeping order. Stops at the first error.
    pub fn try_map<D, E>(self, mut f: impl FnMut(C) -> Result<D, E>) -> Result<Registry<D>, E> {
        let entries = self
            .entries
            .into_iter()
            .map(&mut f)
            .collect::<Result<Vec<D>, E>>()?;
        Ok(Registry {
            entries,
            index: self.index,
        })
    }
}

impl<'a, C: RegistryEntry> IntoIterator for &'a Registry<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
