//! Binding configuration.
//!
//! [`SelectionOptions`] holds the per-binding settings. Bindings start from
//! the application-wide defaults (see [`set_default_options`]) and apply
//! their own overrides on top. Options can also be read from TOML:
//!
//! ```
//! use selection_model::{SelectionMode, SelectionOptions};
//!
//! let options = SelectionOptions::from_toml(r#"
//!     mode = "multiple-additive"
//!     selected-attribute = "is_checked"
//! "#).unwrap();
//!
//! assert_eq!(options.mode, SelectionMode::MultiAdditive);
//! assert_eq!(options.selected_attribute, "is_checked");
//! assert_eq!(options.selected_class, "selected");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use selection_model_core::{Result, SelectionError};

/// How many items may be selected and what a plain click does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// At most one item is selected at a time (default).
    #[default]
    Single,
    /// Plain click selects one item; ctrl toggles, shift selects ranges.
    #[serde(alias = "multiple")]
    Multi,
    /// Like `Multi`, but every click behaves as a ctrl-click.
    #[serde(alias = "multiple-additive")]
    MultiAdditive,
}

impl SelectionMode {
    /// Returns `true` for the modes that allow several selected items.
    pub fn is_multi(self) -> bool {
        matches!(self, Self::Multi | Self::MultiAdditive)
    }

    /// Returns `true` when every click acts as a ctrl-click.
    pub fn is_additive(self) -> bool {
        self == Self::MultiAdditive
    }
}

impl FromStr for SelectionMode {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(Self::Single),
            "multi" | "multiple" => Ok(Self::Multi),
            "multi-additive" | "multiple-additive" => Ok(Self::MultiAdditive),
            other => Err(SelectionError::invalid_option("mode", other)),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Multi => "multi",
            Self::MultiAdditive => "multi-additive",
        })
    }
}

/// How selection is presented on each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionType {
    /// Only a selected class on the row (default).
    #[default]
    Basic,
    /// The row also carries a checkbox mirroring the selection flag.
    ///
    /// Clicking that checkbox toggles its own row only.
    Checkbox,
}

impl FromStr for SelectionType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "basic" => Ok(Self::Basic),
            "checkbox" => Ok(Self::Checkbox),
            other => Err(SelectionError::invalid_option("type", other)),
        }
    }
}

/// What happens to an item when its row stops being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupStrategy {
    /// Leave the flag alone; the item is still selected if it comes back (default).
    #[default]
    None,
    /// Deselect items that are filtered away, paged away or removed.
    Deselect,
}

impl FromStr for CleanupStrategy {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "deselect" => Ok(Self::Deselect),
            other => Err(SelectionError::invalid_option("cleanup_strategy", other)),
        }
    }
}

/// Settings of one selection binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectionOptions {
    /// Item attribute holding the selection flag.
    pub selected_attribute: String,
    /// Class the view applies to selected rows. Not used by the selection logic.
    pub selected_class: String,
    /// Row presentation.
    #[serde(rename = "type")]
    pub selection_type: SelectionType,
    /// Selection mode.
    pub mode: SelectionMode,
    /// Behavior for rows that stop being rendered.
    pub cleanup_strategy: CleanupStrategy,
    /// Event kinds the binding reacts to.
    pub handle_events: Vec<String>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            selected_attribute: "selected".to_owned(),
            selected_class: "selected".to_owned(),
            selection_type: SelectionType::Basic,
            mode: SelectionMode::Single,
            cleanup_strategy: CleanupStrategy::None,
            handle_events: vec!["click".to_owned()],
        }
    }
}

impl SelectionOptions {
    /// Parses options from TOML; missing keys take the built-in defaults.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Sets the handled event kinds from a whitespace separated list,
    /// e.g. `"click dblclick"`.
    pub fn with_handle_events(mut self, events: &str) -> Self {
        self.handle_events = events.split_whitespace().map(str::to_owned).collect();
        self
    }

    /// Returns `true` if events of `kind` are handled.
    pub fn handles_event(&self, kind: &str) -> bool {
        self.handle_events.iter().any(|handled| handled == kind)
    }
}

/// Partial options, applied on top of a base set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectionOptionsOverride {
    pub selected_attribute: Option<String>,
    pub selected_class: Option<String>,
    #[serde(rename = "type")]
    pub selection_type: Option<SelectionType>,
    pub mode: Option<SelectionMode>,
    pub cleanup_strategy: Option<CleanupStrategy>,
    pub handle_events: Option<Vec<String>>,
}

impl SelectionOptionsOverride {
    /// Parses overrides from TOML.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Returns `base` with every set field replaced.
    pub fn apply(&self, base: &SelectionOptions) -> SelectionOptions {
        let mut options = base.clone();
        if let Some(attribute) = &self.selected_attribute {
            options.selected_attribute = attribute.clone();
        }
        if let Some(class) = &self.selected_class {
            options.selected_class = class.clone();
        }
        if let Some(selection_type) = self.selection_type {
            options.selection_type = selection_type;
        }
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if let Some(cleanup) = self.cleanup_strategy {
            options.cleanup_strategy = cleanup;
        }
        if let Some(events) = &self.handle_events {
            options.handle_events = events.clone();
        }
        options
    }
}

fn defaults() -> &'static RwLock<SelectionOptions> {
    static DEFAULTS: OnceLock<RwLock<SelectionOptions>> = OnceLock::new();
    DEFAULTS.get_or_init(|| RwLock::new(SelectionOptions::default()))
}

/// Returns a copy of the application-wide default options.
pub fn default_options() -> SelectionOptions {
    defaults().read().clone()
}

/// Merges `overrides` into the application-wide defaults.
///
/// Only bindings built afterwards are affected.
pub fn set_default_options(overrides: &SelectionOptionsOverride) {
    let mut defaults = defaults().write();
    *defaults = overrides.apply(&defaults);
}

/// Restores the built-in application-wide defaults.
pub fn reset_default_options() {
    *defaults().write() = SelectionOptions::default();
}
