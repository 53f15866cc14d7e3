//! Core systems for tree-combo.
//!
//! This crate provides the foundational pieces shared by the model/view and
//! widget layers:
//!
//! - **Signal/Slot System**: type-safe change notification ([`Signal`])
//! - **Geometry**: [`Point`], [`Size`], [`Rect`]
//! - **Icons**: [`Icon`] handles carried from models to painters
//! - **Logging**: `tracing` target names for filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use tree_combo_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod geometry;
pub mod icon;
pub mod logging;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use icon::{Icon, IconSource};
pub use signal::{ConnectionId, Signal};
