//! Ordered module selection.
//!
//! Order is significant: the first member is the reference for alignment and
//! the first and last are the fixed anchors for distribution.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use indexmap::IndexSet;

use crate::doc::ModuleId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: IndexSet<ModuleId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the only member.
    pub fn replace(&mut self, id: ModuleId) {
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Add `id` at the end, or remove it if already present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ModuleId) -> bool {
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Append `id` if absent.
    pub fn add(&mut self, id: ModuleId) {
        self.ids.insert(id);
    }

    /// Remove every member. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had = !self.ids.is_empty();
        self.ids.clear();
        had
    }

    /// Keep only members for which `keep` holds, preserving order. Returns
    /// whether anything was dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(ModuleId) -> bool,
    {
        let before = self.ids.len();
        self.ids.retain(|id| keep(*id));
        self.ids.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: ModuleId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn first(&self) -> Option<ModuleId> {
        self.ids.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<ModuleId> {
        self.ids.last().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = ModuleId> + ExactSizeIterator + '_ {
        self.ids.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<ModuleId> {
        self.iter().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ModuleId> for Selection {
    fn from_iter<I: IntoIterator<Item = ModuleId>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}
