//! Widget system for tree-combo.
//!
//! Widgets here are headless: they own their state and geometry, react to
//! [`WidgetEvent`]s fed by a host, and describe their appearance through a
//! [`Painter`]. The host decides how events are produced and how paint
//! commands become pixels.
//!
//! # Core Types
//!
//! - [`Widget`]: the trait every widget implements
//! - [`WidgetBase`]: common state (id, geometry, visibility, repaint flag)
//! - [`WidgetEvent`]: mouse and keyboard input
//! - [`Painter`]: drawing backend, with [`RecordingPainter`] for tests
//!
//! # Widgets
//!
//! See [`widgets`] for [`widgets::TreeComboBox`] and its collaborators.

mod base;
mod events;
mod painting;
mod traits;
pub mod widgets;

pub use base::{WidgetBase, WidgetId};
pub use events::{
    Key, KeyPressEvent, KeyboardModifiers, MouseButton, MouseEvent, MousePressEvent,
    MouseReleaseEvent, WidgetEvent,
};
pub use painting::{
    FontMetrics, PaintCommand, Painter, RecordingPainter, StyleOptionComboBox,
    StyleOptionViewItem, ViewItemState,
};
pub use traits::{EventTarget, SizeHint, Widget};
