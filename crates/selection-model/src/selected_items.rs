//! The mirrored list of selected items.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::item::{contains_item, position_of};

/// A read-only, shareable list of the currently selected items.
///
/// Hand a clone to [`SelectionBindingBuilder::selected_items`] and keep one
/// for the view. The binding rebuilds it after every operation; order is the
/// order in which items became selected, not list order.
///
/// [`SelectionBindingBuilder::selected_items`]: crate::SelectionBindingBuilder::selected_items
pub struct SelectedItems<T> {
    items: Arc<RwLock<Vec<Arc<T>>>>,
}

impl<T> Clone for SelectedItems<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T> Default for SelectedItems<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectedItems<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns `true` if `item` is in the list.
    pub fn contains(&self, item: &Arc<T>) -> bool {
        contains_item(&self.items.read(), item)
    }

    /// Copies the current contents.
    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.items.read().clone()
    }

    /// Reads the contents without copying.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Arc<T>]) -> R,
    {
        f(&self.items.read())
    }

    pub(crate) fn replace(&self, items: Vec<Arc<T>>) {
        *self.items.write() = items;
    }

    pub(crate) fn insert(&self, item: &Arc<T>) {
        let mut items = self.items.write();
        if !contains_item(&items, item) {
            items.push(item.clone());
        }
    }

    pub(crate) fn remove(&self, item: &Arc<T>) {
        let mut items = self.items.write();
        if let Some(index) = position_of(&items, item) {
            items.remove(index);
        }
    }

    pub(crate) fn retain<F>(&self, keep: F)
    where
        F: FnMut(&Arc<T>) -> bool,
    {
        self.items.write().retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Record;

    #[test]
    fn test_insert_is_idempotent() {
        let list = SelectedItems::new();
        let item = Arc::new(Record::new("a"));
        list.insert(&item);
        list.insert(&item);
        assert_eq!(list.len(), 1);
        assert!(list.contains(&item));

        list.remove(&item);
        assert!(list.is_empty());
    }

    #[test]
    fn test_clones_share_contents() {
        let list = SelectedItems::new();
        let view = list.clone();
        list.replace(vec![Arc::new(Record::new("a")), Arc::new(Record::new("b"))]);

        let labels = view.with(|items| items.iter().map(|i| i.label().to_owned()).collect::<Vec<_>>());
        assert_eq!(labels, vec!["a", "b"]);
    }
}
