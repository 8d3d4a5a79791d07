//! Export flags: the set of action names that take part in the export.
//!
//! Purely name-level; nothing here touches action data, so a name can be
//! flagged before any action carries it.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportRegistry {
    names: IndexSet<String>,
}

impl ExportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag `name`. Returns true when it was not flagged before.
    pub fn mark(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    /// Clear the flag. Returns whether `name` was flagged.
    pub fn unmark(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }

    pub fn is_marked(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Flagged names in the order they were first marked. The iterator is
    /// cheap to clone, and calling this again starts over.
    pub fn exported_names(&self) -> ExportedNames<'_> {
        ExportedNames {
            inner: self.names.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Lazy iterator over exported names.
#[derive(Clone, Debug)]
pub struct ExportedNames<'a> {
    inner: indexmap::set::Iter<'a, String>,
}

impl<'a> Iterator for ExportedNames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ExportedNames<'_> {}
