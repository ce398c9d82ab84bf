//! Selection binding for one rendered list.
//!
//! [`SelectionBinding`] turns row clicks into selection changes with desktop
//! file-manager semantics:
//!
//! - **Plain click**: the clicked item becomes the only selected item
//! - **Ctrl/Cmd-click**: toggles the clicked item
//! - **Shift-click** (multi modes): selects the range between the clicked
//!   item and the last clicked item; ctrl+shift keeps the existing selection
//!
//! In single mode shift behaves like ctrl. In multi-additive mode every
//! click behaves as if ctrl were held. With checkbox rows, clicking the
//! checkbox toggles that row only.
//!
//! After every operation the binding reconciles flags against what it last
//! observed: it enforces single-mode exclusivity, keeps the selected-items
//! mirror in sync, applies the cleanup strategy to rows that stopped
//! rendering, and emits [`changed`](SelectionBinding::changed) once per item
//! whose flag moved.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use selection_model::{
//!     ClickEvent, KeyboardModifiers, ListSource, Record, SelectionBinding, SelectionMode,
//! };
//!
//! let items: Vec<_> = ["a", "b", "c", "d"]
//!     .into_iter()
//!     .map(|label| Arc::new(Record::new(label)))
//!     .collect();
//!
//! let mut binding = SelectionBinding::builder()
//!     .mode(SelectionMode::Multi)
//!     .source(ListSource::new(items.clone()))
//!     .build()
//!     .unwrap();
//!
//! binding.handle_click(&ClickEvent::new(items[0].clone()));
//! binding.handle_click(
//!     &ClickEvent::new(items[3].clone()).with_modifiers(KeyboardModifiers::SHIFT),
//! );
//!
//! assert_eq!(binding.selection().len(), 4);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use selection_model_core::{targets, Result, SelectionError, Signal};

use crate::event::{ClickEvent, ClickTarget};
use crate::group_key::{GroupKey, GroupKeyRegistry, ScopeId};
use crate::history::ClickHistory;
use crate::item::{contains_item, item_key, Selectable};
use crate::notify::{collect_changes, FlagSnapshot, Notifications};
use crate::options::{
    default_options, CleanupStrategy, SelectionMode, SelectionOptions, SelectionOptionsOverride,
    SelectionType,
};
use crate::selected_items::SelectedItems;
use crate::source::ItemSource;

/// What a call to [`SelectionBinding::handle_click`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Plain click: the item became the only selected item.
    Selected,
    /// The item's flag was toggled.
    Toggled,
    /// A shift-click range was selected.
    RangeSelected,
    /// The binding does not handle this event kind.
    UnhandledKind,
    /// The event was marked ignored.
    Ignored,
    /// Another handler already processed this interaction.
    AlreadyHandled,
    /// A label click left for the checkbox it controls.
    DeferredToCheckbox,
    /// The item is not in the visible collection.
    NotVisible,
    /// The binding has been torn down.
    Inactive,
}

impl ClickOutcome {
    /// Returns `true` if the click was acted upon.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Selected | Self::Toggled | Self::RangeSelected)
    }
}

/// Items spared by a bulk deselect.
enum Except<'a, T> {
    Item(&'a Arc<T>),
    /// The inclusive span between two endpoints, in walk order.
    Range(&'a Arc<T>, &'a Arc<T>),
}

/// Marks the inclusive span between `a` and `b` within `items`.
///
/// Either endpoint may come first. An element is inside when exactly one
/// endpoint has been passed, or when it is an endpoint. If only one endpoint
/// is present the span runs to the end of `items`.
fn span_mask<T>(items: &[Arc<T>], a: &Arc<T>, b: &Arc<T>) -> Vec<bool> {
    let mut seen_a = false;
    let mut seen_b = false;
    items
        .iter()
        .map(|item| {
            let is_a = Arc::ptr_eq(item, a);
            let is_b = Arc::ptr_eq(item, b);
            seen_a |= is_a;
            seen_b |= is_b;
            seen_a != seen_b || is_a || is_b
        })
        .collect()
}

/// Selection state controller for one list.
///
/// Create one with [`SelectionBinding::builder`]. The binding never creates,
/// removes or reorders items; it only writes their selection flag and
/// maintains the optional [`SelectedItems`] mirror.
///
/// # Signals
///
/// - `changed`: Emitted once per item whose selection flag changed during an
///   operation, in full-collection order
pub struct SelectionBinding<T: Selectable> {
    options: SelectionOptions,
    source: Box<dyn ItemSource<T>>,
    history: Arc<ClickHistory>,
    group_keys: Arc<GroupKeyRegistry>,
    scope: ScopeId,
    parent_scope: Option<ScopeId>,
    group_key: Option<GroupKey>,
    selected_items: Option<SelectedItems<T>>,
    /// Flags as of the end of the previous operation.
    observed: FlagSnapshot<T>,
    /// Visible items as of the end of the previous operation.
    bound: Vec<Arc<T>>,
    torn_down: bool,

    /// Emitted once per item whose selection flag changed.
    pub changed: Signal<Arc<T>>,
}

impl<T: Selectable> SelectionBinding<T> {
    /// Starts building a binding from the application-wide default options.
    pub fn builder() -> SelectionBindingBuilder<T> {
        SelectionBindingBuilder::new()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The binding's options.
    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// The binding's scope identity.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// The group key, once one has been assigned.
    ///
    /// Only multi-mode bindings get a key, on the first click that records
    /// or reads click history.
    pub fn group_key(&self) -> Option<&GroupKey> {
        self.group_key.as_ref()
    }

    /// The selected-items mirror, if one was attached.
    pub fn selected_items(&self) -> Option<&SelectedItems<T>> {
        self.selected_items.as_ref()
    }

    /// Returns `true` if `item`'s selection flag is set.
    pub fn is_selected(&self, item: &Arc<T>) -> bool {
        item.flag(&self.options.selected_attribute)
    }

    /// The selected items of the full collection, in collection order.
    pub fn selection(&self) -> Vec<Arc<T>> {
        let attribute = &self.options.selected_attribute;
        self.source
            .full()
            .into_iter()
            .filter(|item| item.flag(attribute))
            .collect()
    }

    /// The class the view should apply to `item`'s row, if any.
    pub fn selected_class_for(&self, item: &Arc<T>) -> Option<&str> {
        self.is_selected(item)
            .then_some(self.options.selected_class.as_str())
    }

    /// The checked state of `item`'s row checkbox, for checkbox bindings.
    pub fn checkbox_state_for(&self, item: &Arc<T>) -> Option<bool> {
        (self.options.selection_type == SelectionType::Checkbox).then(|| self.is_selected(item))
    }

    /// Returns `false` once the binding has been torn down.
    pub fn is_active(&self) -> bool {
        !self.torn_down
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Applies a row interaction.
    ///
    /// Ignored, duplicate, unhandled and unresolvable events leave every
    /// flag untouched.
    pub fn handle_click(&mut self, event: &ClickEvent<T>) -> ClickOutcome {
        if self.torn_down {
            return ClickOutcome::Inactive;
        }
        if !self.options.handles_event(event.kind()) {
            tracing::trace!(target: targets::BINDING, kind = event.kind(), "event kind not handled");
            return ClickOutcome::UnhandledKind;
        }
        if event.is_ignored() {
            tracing::trace!(target: targets::BINDING, "event ignored");
            return ClickOutcome::Ignored;
        }
        if event.mark_handled() {
            tracing::trace!(target: targets::BINDING, "interaction already handled");
            return ClickOutcome::AlreadyHandled;
        }
        if matches!(
            event.target(),
            ClickTarget::Label {
                controls_row_checkbox: true
            }
        ) {
            tracing::trace!(target: targets::BINDING, "label click deferred to its checkbox");
            return ClickOutcome::DeferredToCheckbox;
        }

        let item = event.item();
        let visible = self.source.visible();
        if !contains_item(&visible, item) {
            tracing::debug!(target: targets::BINDING, "clicked item is not visible");
            return ClickOutcome::NotVisible;
        }

        self.observe_arrivals();
        let attribute = self.options.selected_attribute.clone();
        let mode = self.options.mode;
        let modifiers = event.modifiers();
        let ctrl_like = modifiers.ctrl_like() || mode.is_additive();
        let checkbox_click = self.options.selection_type == SelectionType::Checkbox
            && event.target() == ClickTarget::Checkbox;

        let outcome = if modifiers.shift && mode.is_multi() && !checkbox_click {
            let anchor = self.anchor(&visible).unwrap_or_else(|| item.clone());
            if !ctrl_like {
                let full = self.source.full();
                self.deselect_all_except(&full, Except::Range(item, &anchor));
            }
            for (member, in_range) in visible.iter().zip(span_mask(&visible, item, &anchor)) {
                if in_range {
                    member.set_flag(&attribute, true);
                }
            }
            ClickOutcome::RangeSelected
        } else if ctrl_like || modifiers.shift || checkbox_click {
            let next = !item.flag(&attribute);
            if !mode.is_multi() {
                let full = self.source.full();
                self.deselect_all_except(&full, Except::Item(item));
            }
            item.set_flag(&attribute, next);
            if next {
                self.remember(item);
            }
            ClickOutcome::Toggled
        } else {
            let full = self.source.full();
            self.deselect_all_except(&full, Except::Item(item));
            item.set_flag(&attribute, true);
            self.remember(item);
            ClickOutcome::Selected
        };

        tracing::debug!(target: targets::BINDING, ?outcome, %mode, shift = modifiers.shift, ctrl_like, "click applied");
        self.settle();
        outcome
    }

    /// Writes `item`'s selection flag and reconciles.
    ///
    /// This is the programmatic mutation path: in single mode, selecting an
    /// item deselects every other item.
    pub fn set_flag(&mut self, item: &Arc<T>, value: bool) {
        if self.torn_down {
            item.set_flag(&self.options.selected_attribute, value);
            return;
        }
        self.observe_arrivals();
        item.set_flag(&self.options.selected_attribute, value);
        self.settle();
    }

    /// Reconciles after the application changed flags or the collection
    /// directly.
    pub fn sync(&mut self) {
        if !self.torn_down {
            self.observe_arrivals();
            self.settle();
        }
    }

    /// Unbinds every row. The cleanup strategy applies to each of them.
    ///
    /// Runs automatically on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let mut notifications = Notifications::new();
        let bound = std::mem::take(&mut self.bound);
        for item in &bound {
            self.unbind(item, &mut notifications);
        }
        self.observed.clear();
        if self.group_key.is_some() {
            self.group_keys.forget(self.scope);
        }
        self.torn_down = true;
        tracing::debug!(target: targets::BINDING, scope = ?self.scope, "selection binding torn down");
        notifications.fire(&self.changed);
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Starts tracking items that joined the full collection since the last
    /// operation, at their current flag.
    fn observe_arrivals(&mut self) {
        let full = self.source.full();
        self.observed.observe_new(&full, &self.options.selected_attribute);
    }

    /// The item single mode keeps selected, if anything must be deselected.
    ///
    /// The last item in `full` that went from unselected to selected wins.
    /// Otherwise, when several items are selected, the first one does.
    fn exclusive_winner(&self, full: &[Arc<T>], attribute: &str) -> Option<Arc<T>> {
        let newly_selected = full
            .iter()
            .rev()
            .find(|&item| self.observed.get(item) == Some(false) && item.flag(attribute));
        if let Some(item) = newly_selected {
            return Some(item.clone());
        }
        let mut selected = full.iter().filter(|&item| item.flag(attribute));
        let first = selected.next()?;
        selected.next().map(|_| first.clone())
    }

    fn ensure_group_key(&mut self) -> Option<GroupKey> {
        if !self.options.mode.is_multi() {
            return None;
        }
        let key = match &self.group_key {
            Some(key) => key.clone(),
            None => {
                let key = self.group_keys.resolve(self.scope, self.parent_scope);
                self.group_key = Some(key.clone());
                key
            }
        };
        Some(key)
    }

    /// The last clicked item, if it is still visible.
    fn anchor(&mut self, visible: &[Arc<T>]) -> Option<Arc<T>> {
        let key = self.ensure_group_key()?;
        self.history
            .peek::<T>(&key)
            .filter(|anchor| contains_item(visible, anchor))
    }

    fn remember(&mut self, item: &Arc<T>) {
        if let Some(key) = self.ensure_group_key() {
            self.history.push(&key, item.clone());
        }
    }

    /// Clears every flag in `full` outside `except` and rebuilds the mirror
    /// from the items left selected.
    fn deselect_all_except(&self, full: &[Arc<T>], except: Except<'_, T>) {
        let attribute = &self.options.selected_attribute;
        let keep: Vec<bool> = match except {
            Except::Item(kept) => full.iter().map(|item| Arc::ptr_eq(item, kept)).collect(),
            Except::Range(a, b) => span_mask(full, a, b),
        };

        let mut still_selected = Vec::new();
        for (item, keep) in full.iter().zip(keep) {
            if !keep {
                item.set_flag(attribute, false);
            } else if item.flag(attribute) {
                still_selected.push(item.clone());
            }
        }

        if let Some(selected_items) = &self.selected_items {
            selected_items.replace(still_selected);
        }
    }

    /// Applies the cleanup strategy to a row that stopped rendering.
    fn unbind(&mut self, item: &Arc<T>, notifications: &mut Notifications<T>) {
        if self.options.cleanup_strategy != CleanupStrategy::Deselect {
            return;
        }
        let attribute = &self.options.selected_attribute;
        let was_selected = item.flag(attribute);
        item.set_flag(attribute, false);
        if let Some(selected_items) = &self.selected_items {
            selected_items.remove(item);
        }
        if was_selected || self.observed.get(item) == Some(true) {
            tracing::debug!(target: targets::BINDING, "deselected item that left the view");
            notifications.push(item);
        }
        self.observed.record(item, false);
    }

    /// Reconciles current flags and collections with the last observation,
    /// then notifies.
    fn settle(&mut self) {
        let attribute = self.options.selected_attribute.clone();
        let full = self.source.full();
        let visible = self.source.visible();
        let mut notifications = Notifications::new();

        let departed: Vec<Arc<T>> = self
            .bound
            .iter()
            .filter(|&item| !contains_item(&visible, item))
            .cloned()
            .collect();
        for item in &departed {
            self.unbind(item, &mut notifications);
        }

        if self.options.mode == SelectionMode::Single {
            if let Some(item) = self.exclusive_winner(&full, &attribute) {
                self.deselect_all_except(&full, Except::Item(&item));
            }
        }

        collect_changes(&self.observed, &full, &attribute, &mut notifications);
        self.sync_selected_items(&full);
        self.observed = FlagSnapshot::capture(&full, &attribute);
        self.bound = visible;

        if notifications.len() > 0 {
            tracing::debug!(target: targets::BINDING, changed = notifications.len(), "selection changed");
        }
        notifications.fire(&self.changed);
    }

    /// Drops unselected or departed items from the mirror and appends newly
    /// selected ones in collection order.
    fn sync_selected_items(&self, full: &[Arc<T>]) {
        let Some(selected_items) = &self.selected_items else {
            return;
        };
        let attribute = &self.options.selected_attribute;
        let in_full: HashSet<usize> = full.iter().map(item_key).collect();

        selected_items.retain(|item| in_full.contains(&item_key(item)) && item.flag(attribute));
        for item in full.iter().filter(|&item| item.flag(attribute)) {
            selected_items.insert(item);
        }
    }
}

impl<T: Selectable> Drop for SelectionBinding<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Builder for [`SelectionBinding`].
///
/// Starts from the application-wide defaults (see
/// [`set_default_options`](crate::set_default_options)); the item source is
/// required.
pub struct SelectionBindingBuilder<T: Selectable> {
    options: SelectionOptions,
    source: Option<Box<dyn ItemSource<T>>>,
    selected_items: Option<SelectedItems<T>>,
    on_change: Vec<Box<dyn Fn(&Arc<T>) + Send + Sync>>,
    history: Option<Arc<ClickHistory>>,
    group_keys: Option<Arc<GroupKeyRegistry>>,
    scope: Option<ScopeId>,
    parent_scope: Option<ScopeId>,
}

impl<T: Selectable> Default for SelectionBindingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Selectable> SelectionBindingBuilder<T> {
    /// Creates a builder from the application-wide default options.
    pub fn new() -> Self {
        Self {
            options: default_options(),
            source: None,
            selected_items: None,
            on_change: Vec::new(),
            history: None,
            group_keys: None,
            scope: None,
            parent_scope: None,
        }
    }

    /// Replaces all options.
    pub fn options(mut self, options: SelectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Applies partial overrides to the current options.
    pub fn overrides(mut self, overrides: &SelectionOptionsOverride) -> Self {
        self.options = overrides.apply(&self.options);
        self
    }

    /// Sets the selection mode.
    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Sets the row presentation.
    pub fn selection_type(mut self, selection_type: SelectionType) -> Self {
        self.options.selection_type = selection_type;
        self
    }

    /// Sets the item attribute holding the selection flag.
    pub fn selected_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.options.selected_attribute = attribute.into();
        self
    }

    /// Sets the class applied to selected rows.
    pub fn selected_class(mut self, class: impl Into<String>) -> Self {
        self.options.selected_class = class.into();
        self
    }

    /// Sets the cleanup strategy.
    pub fn cleanup_strategy(mut self, strategy: CleanupStrategy) -> Self {
        self.options.cleanup_strategy = strategy;
        self
    }

    /// Sets the handled event kinds from a whitespace separated list.
    pub fn handle_events(mut self, events: &str) -> Self {
        self.options = self.options.with_handle_events(events);
        self
    }

    /// Sets the item collections.
    pub fn source(mut self, source: impl ItemSource<T> + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attaches a selected-items mirror.
    ///
    /// The binding owns its contents from now on.
    pub fn selected_items(mut self, selected_items: SelectedItems<T>) -> Self {
        self.selected_items = Some(selected_items);
        self
    }

    /// Connects a callback to the `changed` signal.
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        self.on_change.push(Box::new(callback));
        self
    }

    /// Uses `history` instead of the process-wide click history.
    pub fn history(mut self, history: Arc<ClickHistory>) -> Self {
        self.history = Some(history);
        self
    }

    /// Uses `registry` instead of the process-wide group key registry.
    pub fn group_keys(mut self, registry: Arc<GroupKeyRegistry>) -> Self {
        self.group_keys = Some(registry);
        self
    }

    /// Sets the binding's structural identity.
    ///
    /// Defaults to a fresh unique scope.
    pub fn scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Sets the container scope whose group key the binding shares.
    pub fn parent_scope(mut self, parent: ScopeId) -> Self {
        self.parent_scope = Some(parent);
        self
    }

    /// Builds the binding and observes the initial selection.
    ///
    /// Fails with [`SelectionError::MissingCollection`] if no source was set.
    pub fn build(self) -> Result<SelectionBinding<T>> {
        let source = self.source.ok_or(SelectionError::MissingCollection)?;

        let mut binding = SelectionBinding {
            options: self.options,
            source,
            history: self.history.unwrap_or_else(ClickHistory::global),
            group_keys: self.group_keys.unwrap_or_else(GroupKeyRegistry::global),
            scope: self.scope.unwrap_or_else(ScopeId::unique),
            parent_scope: self.parent_scope,
            group_key: None,
            selected_items: self.selected_items,
            observed: FlagSnapshot::new(),
            bound: Vec::new(),
            torn_down: false,
            changed: Signal::new(),
        };

        for callback in self.on_change {
            binding.changed.connect(move |item| callback(item));
        }

        binding.observe_arrivals();
        binding.settle();
        tracing::debug!(
            target: targets::BINDING,
            scope = ?binding.scope,
            mode = %binding.options.mode,
            "selection binding created"
        );
        Ok(binding)
    }
}
