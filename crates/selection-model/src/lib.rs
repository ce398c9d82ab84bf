//! Selection Model - click-driven selection for lists and tables.
//!
//! Binds a selection flag on each item of a rendered list to mouse and
//! keyboard interaction, with the modifier semantics of desktop file
//! managers:
//!
//! - [`SelectionBinding`]: The per-list controller
//! - [`ClickHistory`]: Last-clicked items per group, the shift-click anchor
//! - [`GroupKeyRegistry`]: Short keys identifying which lists share history
//! - [`SelectedItems`]: An optional mirror of the selected items
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use selection_model::{ClickEvent, KeyboardModifiers, ListSource, Record, SelectionBinding};
//!
//! let items: Vec<_> = ["a", "b", "c"]
//!     .into_iter()
//!     .map(|label| Arc::new(Record::new(label)))
//!     .collect();
//!
//! let mut binding = SelectionBinding::builder()
//!     .source(ListSource::new(items.clone()))
//!     .on_change(|item: &Arc<Record>| println!("{} changed", item.label()))
//!     .build()
//!     .unwrap();
//!
//! binding.handle_click(&ClickEvent::new(items[1].clone()));
//! assert!(binding.is_selected(&items[1]));
//!
//! binding.handle_click(
//!     &ClickEvent::new(items[2].clone()).with_modifiers(KeyboardModifiers::CONTROL),
//! );
//! assert!(!binding.is_selected(&items[1]));
//! ```

mod binding;
mod event;
pub mod group_key;
pub mod history;
mod item;
mod notify;
mod options;
mod selected_items;
mod source;

pub use selection_model_core::{targets, ConnectionGuard, ConnectionId, Result, SelectionError, Signal};

pub use binding::{ClickOutcome, SelectionBinding, SelectionBindingBuilder};
pub use event::{ClickEvent, ClickTarget, KeyboardModifiers};
pub use group_key::{
    CounterKeyGenerator, GroupKey, GroupKeyRegistry, KeyGenerator, ScopeId, UuidKeyGenerator,
};
pub use history::{ClickHistory, DEFAULT_CAPACITY};
pub use item::{contains_item, position_of, Record, Selectable};
pub use options::{
    default_options, reset_default_options, set_default_options, CleanupStrategy, SelectionMode,
    SelectionOptions, SelectionOptionsOverride, SelectionType,
};
pub use selected_items::SelectedItems;
pub use source::{CompareFn, FilterFn, ItemSource, ListSource};

static_assertions::assert_impl_all!(SelectionBinding<Record>: Send, Sync);
static_assertions::assert_impl_all!(ListSource<Record>: Send, Sync);
static_assertions::assert_impl_all!(SelectedItems<Record>: Send, Sync);
