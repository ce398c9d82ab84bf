//! Bounded per-group click history.
//!
//! The most recently clicked item of a group is the anchor of the next
//! shift-click range. Each group keeps up to [`DEFAULT_CAPACITY`] entries;
//! older entries are dropped from the front when the stack grows past it.
//!
//! Stacks are created on first use and live as long as the history. Entries
//! are stored type-erased so one history can serve lists of different item
//! types; reading an entry as the wrong type yields `None`.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use selection_model_core::targets;

use crate::group_key::GroupKey;

/// Maximum number of entries kept per group.
pub const DEFAULT_CAPACITY: usize = 1000;

type Entry = Arc<dyn Any + Send + Sync>;
type Stack = Arc<Mutex<VecDeque<Entry>>>;

/// Click history stacks keyed by [`GroupKey`].
///
/// Each stack has its own lock, so callers on different groups never
/// contend.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use selection_model::{ClickHistory, GroupKey, Record};
///
/// let history = ClickHistory::new();
/// let group = GroupKey::new("001");
/// let item = Arc::new(Record::new("row"));
///
/// history.push(&group, item.clone());
/// let anchor: Option<Arc<Record>> = history.peek(&group);
/// assert!(Arc::ptr_eq(&anchor.unwrap(), &item));
/// ```
pub struct ClickHistory {
    capacity: usize,
    stacks: Mutex<HashMap<GroupKey, Stack>>,
}

impl Default for ClickHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickHistory {
    /// Creates an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty history keeping at most `capacity` entries per group.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            stacks: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide history.
    pub fn global() -> Arc<ClickHistory> {
        static GLOBAL: OnceLock<Arc<ClickHistory>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ClickHistory::new())).clone()
    }

    /// Maximum number of entries kept per group.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn stack(&self, group: &GroupKey) -> Stack {
        self.stacks
            .lock()
            .entry(group.clone())
            .or_default()
            .clone()
    }

    /// Pushes `item` onto the group's stack, returning the new size.
    pub fn push<T: Send + Sync + 'static>(&self, group: &GroupKey, item: Arc<T>) -> usize {
        let stack = self.stack(group);
        let mut stack = stack.lock();
        stack.push_back(item);
        while stack.len() > self.capacity {
            stack.pop_front();
        }
        tracing::trace!(target: targets::HISTORY, %group, size = stack.len(), "pushed click");
        stack.len()
    }

    /// Removes and returns the most recent item of the group.
    ///
    /// Returns `None` for an empty stack or when the top entry is not a `T`;
    /// in the latter case the entry is left in place.
    pub fn pop<T: Send + Sync + 'static>(&self, group: &GroupKey) -> Option<Arc<T>> {
        let stack = self.stack(group);
        let mut stack = stack.lock();
        if !stack.back()?.is::<T>() {
            return None;
        }
        stack.pop_back()?.downcast::<T>().ok()
    }

    /// Returns the most recent item of the group without removing it.
    pub fn peek<T: Send + Sync + 'static>(&self, group: &GroupKey) -> Option<Arc<T>> {
        let stack = self.stack(group);
        let top = stack.lock().back().cloned();
        top?.downcast::<T>().ok()
    }

    /// Number of entries in the group's stack.
    pub fn len(&self, group: &GroupKey) -> usize {
        self.stack(group).lock().len()
    }

    /// Returns `true` if the group's stack is empty.
    pub fn is_empty(&self, group: &GroupKey) -> bool {
        self.len(group) == 0
    }
}

static_assertions::assert_impl_all!(ClickHistory: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Record;

    fn record(label: &str) -> Arc<Record> {
        Arc::new(Record::new(label))
    }

    #[test]
    fn test_push_peek_pop() {
        let history = ClickHistory::new();
        let group = GroupKey::new("g");
        let a = record("a");
        let b = record("b");

        assert_eq!(history.push(&group, a.clone()), 1);
        assert_eq!(history.push(&group, b.clone()), 2);

        let top: Arc<Record> = history.peek(&group).unwrap();
        assert!(Arc::ptr_eq(&top, &b));
        assert_eq!(history.len(&group), 2);

        let popped: Arc<Record> = history.pop(&group).unwrap();
        assert!(Arc::ptr_eq(&popped, &b));
        let popped: Arc<Record> = history.pop(&group).unwrap();
        assert!(Arc::ptr_eq(&popped, &a));
        assert!(history.pop::<Record>(&group).is_none());
    }

    #[test]
    fn test_unknown_group_is_empty() {
        let history = ClickHistory::new();
        let group = GroupKey::new("never-used");
        assert!(history.peek::<Record>(&group).is_none());
        assert!(history.pop::<Record>(&group).is_none());
        assert!(history.is_empty(&group));
    }

    #[test]
    fn test_groups_are_independent() {
        let history = ClickHistory::new();
        let first = GroupKey::new("001");
        let second = GroupKey::new("002");
        history.push(&first, record("a"));

        assert_eq!(history.len(&first), 1);
        assert!(history.peek::<Record>(&second).is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let history = ClickHistory::new();
        let group = GroupKey::new("bounded");
        let items: Vec<_> = (0..=DEFAULT_CAPACITY)
            .map(|n| record(&n.to_string()))
            .collect();

        for item in &items {
            history.push(&group, item.clone());
        }
        assert_eq!(history.len(&group), DEFAULT_CAPACITY);

        let mut drained = Vec::new();
        while let Some(item) = history.pop::<Record>(&group) {
            drained.push(item);
        }
        assert_eq!(drained.len(), DEFAULT_CAPACITY);
        assert!(Arc::ptr_eq(drained.last().unwrap(), &items[1]));
        assert!(!drained.iter().any(|item| Arc::ptr_eq(item, &items[0])));
    }

    #[test]
    fn test_wrong_type_reads_as_none() {
        let history = ClickHistory::new();
        let group = GroupKey::new("typed");
        history.push(&group, Arc::new(7_u32));

        assert!(history.peek::<Record>(&group).is_none());
        assert!(history.pop::<Record>(&group).is_none());
        assert_eq!(history.len(&group), 1);
        assert_eq!(history.pop::<u32>(&group).as_deref(), Some(&7));
    }
}
