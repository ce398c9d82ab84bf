//! Core systems for Selection Model.
//!
//! This crate provides the foundational pieces shared by the selection
//! model crates:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Errors**: The configuration error taxonomy
//! - **Logging**: `tracing` targets for filtering by subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use selection_model_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{Result, SelectionError, SignalError};
pub use logging::targets;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
