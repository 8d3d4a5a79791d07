//! Owned action store keyed by name.

use indexmap::IndexMap;

use crate::data::Action;

/// Actions by name in insertion order. Re-inserting a name replaces the
/// stored action in place (last write wins), so a name never appears twice.
#[derive(Clone, Debug, Default)]
pub struct ActionLibrary {
    items: IndexMap<String, Action>,
}

impl ActionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action` under its own name, returning the action it replaced.
    pub fn insert(&mut self, action: Action) -> Option<Action> {
        self.items.insert(action.name().to_string(), action)
    }

    /// Store `action` and hand back the stored copy.
    pub fn commit(&mut self, action: Action) -> &Action {
        let (index, _) = self.items.insert_full(action.name().to_string(), action);
        &self.items[index]
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Remove by name, keeping the order of the remaining actions.
    pub fn remove(&mut self, name: &str) -> Option<Action> {
        self.items.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
