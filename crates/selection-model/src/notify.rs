//! Change notification.
//!
//! The binding records every item's flag as last observed. After an
//! operation it compares current flags against that record and notifies
//! each item whose flag actually moved, once, no matter how many passes
//! touched it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use selection_model_core::Signal;

use crate::item::{item_key, Selectable};

/// Flags as last observed by a binding, keyed by item identity.
pub(crate) struct FlagSnapshot<T> {
    flags: HashMap<usize, (Arc<T>, bool)>,
}

impl<T: Selectable> FlagSnapshot<T> {
    pub(crate) fn new() -> Self {
        Self {
            flags: HashMap::new(),
        }
    }

    /// Records the current flags of `items`, forgetting everything else.
    pub(crate) fn capture(items: &[Arc<T>], attribute: &str) -> Self {
        let flags = items
            .iter()
            .map(|item| (item_key(item), (item.clone(), item.flag(attribute))))
            .collect();
        Self { flags }
    }

    /// The last observed flag of `item`, or `None` if it was never seen.
    pub(crate) fn get(&self, item: &Arc<T>) -> Option<bool> {
        self.flags.get(&item_key(item)).map(|(_, flag)| *flag)
    }

    /// Starts tracking every item of `items` not seen yet, at its current
    /// flag. Tracked items keep their recorded flag.
    pub(crate) fn observe_new(&mut self, items: &[Arc<T>], attribute: &str) {
        for item in items {
            self.flags
                .entry(item_key(item))
                .or_insert_with(|| (item.clone(), item.flag(attribute)));
        }
    }

    /// Updates the record for an item that is already tracked.
    pub(crate) fn record(&mut self, item: &Arc<T>, flag: bool) {
        if let Some(entry) = self.flags.get_mut(&item_key(item)) {
            entry.1 = flag;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.flags.clear();
    }
}

/// Items pending notification for one operation, in notification order.
pub(crate) struct Notifications<T> {
    pending: Vec<Arc<T>>,
    seen: HashSet<usize>,
}

impl<T> Notifications<T> {
    pub(crate) fn new() -> Self {
        Self {
            pending: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Queues `item` unless it is already queued.
    pub(crate) fn push(&mut self, item: &Arc<T>) {
        if self.seen.insert(item_key(item)) {
            self.pending.push(item.clone());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// Emits `signal` once per queued item, in queue order.
    pub(crate) fn fire(self, signal: &Signal<Arc<T>>)
    where
        T: 'static,
    {
        for item in self.pending {
            signal.emit(item);
        }
    }
}

/// Queues, in `items` order, every item whose flag differs from `before`.
///
/// Items that joined the collection must be recorded with
/// [`FlagSnapshot::observe_new`] before the operation mutates anything;
/// items `before` does not track are skipped.
pub(crate) fn collect_changes<T: Selectable>(
    before: &FlagSnapshot<T>,
    items: &[Arc<T>],
    attribute: &str,
    notifications: &mut Notifications<T>,
) {
    for item in items {
        if let Some(previous) = before.get(item) {
            if previous != item.flag(attribute) {
                notifications.push(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Record;
    use parking_lot::Mutex;

    fn items(flags: &[bool]) -> Vec<Arc<Record>> {
        flags
            .iter()
            .enumerate()
            .map(|(n, &flag)| Arc::new(Record::new(n.to_string()).with_flag("selected", flag)))
            .collect()
    }

    #[test]
    fn test_only_changed_items_are_queued() {
        let list = items(&[true, false, false]);
        let before = FlagSnapshot::capture(&list, "selected");

        list[0].set_flag("selected", false);
        list[1].set_flag("selected", false);
        list[2].set_flag("selected", true);

        let mut notifications = Notifications::new();
        collect_changes(&before, &list, "selected", &mut notifications);
        assert_eq!(notifications.len(), 2);

        let fired = Arc::new(Mutex::new(Vec::new()));
        let signal = Signal::<Arc<Record>>::new();
        let fired_clone = fired.clone();
        signal.connect(move |item| fired_clone.lock().push(item.label().to_owned()));
        notifications.fire(&signal);

        assert_eq!(*fired.lock(), vec!["0", "2"]);
    }

    #[test]
    fn test_flip_and_flip_back_is_silent() {
        let list = items(&[false]);
        let before = FlagSnapshot::capture(&list, "selected");

        list[0].set_flag("selected", true);
        list[0].set_flag("selected", false);

        let mut notifications = Notifications::new();
        collect_changes(&before, &list, "selected", &mut notifications);
        assert_eq!(notifications.len(), 0);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let list = items(&[false]);
        let mut notifications = Notifications::new();
        notifications.push(&list[0]);
        notifications.push(&list[0]);
        assert_eq!(notifications.len(), 1);
    }

    #[test]
    fn test_arrivals_are_compared_from_their_first_observation() {
        let list = items(&[true]);
        let mut before = FlagSnapshot::capture(&list, "selected");

        let arrival = Arc::new(Record::new("new"));
        let grown = vec![list[0].clone(), arrival.clone()];
        before.observe_new(&grown, "selected");
        assert_eq!(before.get(&arrival), Some(false));

        // Already tracked items keep their recorded flag.
        list[0].set_flag("selected", false);
        before.observe_new(&grown, "selected");
        assert_eq!(before.get(&list[0]), Some(true));

        arrival.set_flag("selected", true);
        let mut notifications = Notifications::new();
        collect_changes(&before, &grown, "selected", &mut notifications);
        assert_eq!(notifications.len(), 2);
    }
}
