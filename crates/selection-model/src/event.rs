//! Interaction events delivered by the binding layer.
//!
//! A [`ClickEvent`] describes one physical interaction with a row. The same
//! event value may be handed to several handlers (the row and a checkbox
//! nested in it); it carries a handled marker so only the first handler acts.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Keyboard modifier state at the time of the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Control modifier only.
    pub const CONTROL: Self = Self {
        control: true,
        ..Self::NONE
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Control and Shift together.
    pub const CONTROL_SHIFT: Self = Self {
        control: true,
        shift: true,
        ..Self::NONE
    };

    /// Returns `true` if Control or Meta is held.
    ///
    /// Both count as the toggle modifier so Cmd-click works on macOS.
    pub fn ctrl_like(&self) -> bool {
        self.control || self.meta
    }
}

/// What part of the row the pointer actually hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickTarget {
    /// The row itself or plain content inside it.
    #[default]
    Row,
    /// The row's embedded checkbox.
    Checkbox,
    /// A label element.
    ///
    /// `controls_row_checkbox` is `true` when the label wraps, or points at,
    /// a checkbox inside the same row. The platform re-delivers such clicks
    /// on the checkbox, so the label click itself is skipped.
    Label { controls_row_checkbox: bool },
    /// Any other element inside the row. Handled like a row click.
    Other,
}

/// One interaction with a row.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use selection_model::{ClickEvent, ClickTarget, KeyboardModifiers, Record};
///
/// let item = Arc::new(Record::new("row"));
/// let event = ClickEvent::new(item)
///     .with_modifiers(KeyboardModifiers::SHIFT)
///     .with_target(ClickTarget::Checkbox);
///
/// assert!(event.modifiers().shift);
/// assert!(!event.is_ignored());
/// ```
#[derive(Debug)]
pub struct ClickEvent<T> {
    item: Arc<T>,
    kind: Cow<'static, str>,
    modifiers: KeyboardModifiers,
    target: ClickTarget,
    ignored: AtomicBool,
    handled: AtomicBool,
}

impl<T> ClickEvent<T> {
    /// Creates a plain `click` on the row of `item`.
    pub fn new(item: Arc<T>) -> Self {
        Self {
            item,
            kind: Cow::Borrowed("click"),
            modifiers: KeyboardModifiers::NONE,
            target: ClickTarget::Row,
            ignored: AtomicBool::new(false),
            handled: AtomicBool::new(false),
        }
    }

    /// Sets the modifier state.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the physical target.
    pub fn with_target(mut self, target: ClickTarget) -> Self {
        self.target = target;
        self
    }

    /// Sets the event kind, e.g. `"dblclick"`.
    pub fn with_kind(mut self, kind: impl Into<Cow<'static, str>>) -> Self {
        self.kind = kind.into();
        self
    }

    /// The item whose row received the interaction.
    pub fn item(&self) -> &Arc<T> {
        &self.item
    }

    /// The event kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The modifier state.
    pub fn modifiers(&self) -> KeyboardModifiers {
        self.modifiers
    }

    /// The physical target.
    pub fn target(&self) -> ClickTarget {
        self.target
    }

    /// Marks the event so selection bindings skip it.
    ///
    /// Used for elements inside a row (delete buttons, links) that must not
    /// change the selection.
    pub fn ignore(&self) {
        self.ignored.store(true, Ordering::SeqCst);
    }

    /// Marks the event as ignored when `condition` holds.
    pub fn ignore_if(&self, condition: bool) {
        if condition {
            self.ignore();
        }
    }

    /// Returns `true` if the event was marked ignored.
    pub fn is_ignored(&self) -> bool {
        self.ignored.load(Ordering::SeqCst)
    }

    /// Returns `true` once a binding has handled this interaction.
    pub fn is_handled(&self) -> bool {
        self.handled.load(Ordering::SeqCst)
    }

    /// Marks the event handled, returning whether it already was.
    pub(crate) fn mark_handled(&self) -> bool {
        self.handled.swap(true, Ordering::SeqCst)
    }
}
