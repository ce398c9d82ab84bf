//! Selectable items.
//!
//! Items are owned by the application and shared with the selection model as
//! `Arc<T>`. Identity is pointer identity: two records with identical field
//! values are still distinct items.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A record whose selection flag can be read and written by attribute name.
///
/// Implementations use interior mutability; the selection model only ever
/// holds shared references to items.
pub trait Selectable: Send + Sync + 'static {
    /// Reads the boolean flag stored under `attribute`.
    ///
    /// Missing attributes read as `false`.
    fn flag(&self, attribute: &str) -> bool;

    /// Stores `value` under `attribute`.
    fn set_flag(&self, attribute: &str, value: bool);
}

/// A ready-made [`Selectable`] with a display label and named flags.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use selection_model::{Record, Selectable};
///
/// let item = Arc::new(Record::new("seventy eight").with_flag("selected", true));
/// assert!(item.flag("selected"));
/// assert!(!item.flag("is_checked"));
/// ```
pub struct Record {
    label: String,
    flags: RwLock<HashMap<String, bool>>,
}

impl Record {
    /// Creates a record with no flags set.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            flags: RwLock::new(HashMap::new()),
        }
    }

    /// Sets an initial flag value.
    pub fn with_flag(self, attribute: impl Into<String>, value: bool) -> Self {
        self.flags.write().insert(attribute.into(), value);
        self
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Selectable for Record {
    fn flag(&self, attribute: &str) -> bool {
        self.flags.read().get(attribute).copied().unwrap_or(false)
    }

    fn set_flag(&self, attribute: &str, value: bool) {
        self.flags.write().insert(attribute.to_owned(), value);
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("label", &self.label)
            .field("flags", &*self.flags.read())
            .finish()
    }
}

/// Identity key of an item, valid while the `Arc` is alive.
pub(crate) fn item_key<T>(item: &Arc<T>) -> usize {
    Arc::as_ptr(item) as *const () as usize
}

/// Returns the position of `item` in `items` by identity.
pub fn position_of<T>(items: &[Arc<T>], item: &Arc<T>) -> Option<usize> {
    items.iter().position(|candidate| Arc::ptr_eq(candidate, item))
}

/// Returns `true` if `items` contains `item` by identity.
pub fn contains_item<T>(items: &[Arc<T>], item: &Arc<T>) -> bool {
    position_of(items, item).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_flags() {
        let record = Record::new("foo").with_flag("selected", true);
        assert!(record.flag("selected"));
        record.set_flag("selected", false);
        assert!(!record.flag("selected"));
        assert!(!record.flag("unknown"));
    }

    #[test]
    fn test_identity_not_value() {
        let a = Arc::new(Record::new("same"));
        let b = Arc::new(Record::new("same"));
        let items = vec![a.clone(), b.clone()];

        assert_eq!(position_of(&items, &a), Some(0));
        assert_eq!(position_of(&items, &b), Some(1));
        assert_ne!(item_key(&a), item_key(&b));
        assert!(!contains_item(&items[..1], &b));
    }
}
