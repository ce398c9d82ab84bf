//! Error types for Selection Model.

/// Result type alias for selection model operations.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Errors raised while configuring a selection binding.
///
/// Per-click problems never surface here: clicks on items that have left the
/// collection, duplicate deliveries and ignored events are silent no-ops.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// The binding was built without an item collection to select from.
    #[error("selection model requires an item collection to bind to")]
    MissingCollection,

    /// An option string could not be parsed.
    #[error("invalid value '{value}' for option '{option}'")]
    InvalidOption {
        option: &'static str,
        value: String,
    },

    /// Options could not be read from TOML.
    #[error("failed to parse selection options: {0}")]
    Config(#[from] toml::de::Error),

    /// Signal-related error.
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),
}

impl SelectionError {
    /// Create an invalid option error.
    pub fn invalid_option(option: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            value: value.into(),
        }
    }
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("invalid or disconnected connection ID")]
    InvalidConnection,
    /// The signal has been dropped and is no longer available.
    #[error("signal has been dropped")]
    SignalDropped,
}
