//! Item collections the selection model reads from.
//!
//! A binding sees two views over the same items:
//!
//! - **Full**: every item of the logical list, ignoring filters and paging.
//!   Bulk deselection walks this view.
//! - **Visible**: the subset currently rendered, in rendered order. Range
//!   selection walks this view, and leaving it is what triggers cleanup.
//!
//! Every visible item must also be in the full view with the same identity.

use std::cmp::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;

/// Supplies the Full and Visible collections to a binding.
pub trait ItemSource<T>: Send + Sync {
    /// Every item of the logical list, in natural order.
    fn full(&self) -> Vec<Arc<T>>;

    /// The rendered subset, in rendered order.
    ///
    /// Defaults to the full collection for unfiltered lists.
    fn visible(&self) -> Vec<Arc<T>> {
        self.full()
    }
}

/// Type alias for a filter function.
///
/// Returns `true` if the item should be visible.
pub type FilterFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Type alias for a compare function for sorting the visible view.
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Page {
    offset: usize,
    len: usize,
}

struct ListSourceInner<T> {
    items: RwLock<Vec<Arc<T>>>,
    filter: RwLock<Option<FilterFn<T>>>,
    compare: RwLock<Option<CompareFn<T>>>,
    page: RwLock<Option<Page>>,
}

/// A shared list with optional filtering, sorting and paging.
///
/// Cloning a `ListSource` yields another handle to the same list, so the
/// application can keep mutating the list it handed to a binding.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use selection_model::{ItemSource, ListSource, Record};
///
/// let list = ListSource::new(vec![
///     Arc::new(Record::new("apple")),
///     Arc::new(Record::new("banana")),
///     Arc::new(Record::new("cherry")),
/// ]);
/// list.set_filter(|record: &Record| record.label().contains('a'));
///
/// assert_eq!(list.full().len(), 3);
/// assert_eq!(list.visible().len(), 2);
/// ```
pub struct ListSource<T> {
    inner: Arc<ListSourceInner<T>>,
}

impl<T> Clone for ListSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> ListSource<T> {
    /// Creates a list source over `items`.
    pub fn new(items: Vec<Arc<T>>) -> Self {
        Self {
            inner: Arc::new(ListSourceInner {
                items: RwLock::new(items),
                filter: RwLock::new(None),
                compare: RwLock::new(None),
                page: RwLock::new(None),
            }),
        }
    }

    /// Returns the number of items in the full list.
    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    /// Returns `true` if the full list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// Appends an item.
    pub fn push(&self, item: Arc<T>) {
        self.inner.items.write().push(item);
    }

    /// Removes an item by identity, returning `true` if it was present.
    pub fn remove(&self, item: &Arc<T>) -> bool {
        let mut items = self.inner.items.write();
        let before = items.len();
        items.retain(|candidate| !Arc::ptr_eq(candidate, item));
        items.len() != before
    }

    /// Replaces every item.
    pub fn set_items(&self, items: Vec<Arc<T>>) {
        *self.inner.items.write() = items;
    }

    /// Sets the visibility filter.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        *self.inner.filter.write() = Some(Arc::new(filter));
    }

    /// Removes the visibility filter.
    pub fn clear_filter(&self) {
        *self.inner.filter.write() = None;
    }

    /// Sets the sort order of the visible view.
    ///
    /// The full view always keeps insertion order.
    pub fn set_sort<F>(&self, compare: F)
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        *self.inner.compare.write() = Some(Arc::new(compare));
    }

    /// Removes the sort order.
    pub fn clear_sort(&self) {
        *self.inner.compare.write() = None;
    }

    /// Shows only `len` items starting at `offset` of the filtered, sorted view.
    pub fn set_page(&self, offset: usize, len: usize) {
        *self.inner.page.write() = Some(Page { offset, len });
    }

    /// Shows every filtered item.
    pub fn clear_page(&self) {
        *self.inner.page.write() = None;
    }
}

impl<T: Send + Sync + 'static> ItemSource<T> for ListSource<T> {
    fn full(&self) -> Vec<Arc<T>> {
        self.inner.items.read().clone()
    }

    fn visible(&self) -> Vec<Arc<T>> {
        let mut visible: Vec<Arc<T>> = match self.inner.filter.read().as_ref() {
            Some(filter) => self
                .inner
                .items
                .read()
                .iter()
                .filter(|&item| filter(&**item))
                .cloned()
                .collect(),
            None => self.full(),
        };

        if let Some(compare) = self.inner.compare.read().as_ref() {
            visible.sort_by(|a, b| compare(&**a, &**b));
        }

        match *self.inner.page.read() {
            Some(Page { offset, len }) => visible.into_iter().skip(offset).take(len).collect(),
            None => visible,
        }
    }
}
