//! Logging facilities for Selection Model.
//!
//! Selection Model uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("selection_model=debug")
//!         .init();
//! }
//! ```
//!
//! Pre-filter skips and signal emission are logged at `trace` level; click
//! classification, group key assignment and cleanup at `debug` level.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "selection_model_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "selection_model_core::signal";
    /// Selection binding (click handling, observation, cleanup) target.
    pub const BINDING: &str = "selection_model::binding";
    /// Click history target.
    pub const HISTORY: &str = "selection_model::history";
    /// Group key generation and resolution target.
    pub const GROUP_KEY: &str = "selection_model::group_key";
}
