//! Prelude module for tree-combo.
//!
//! ```ignore
//! use tree_combo::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use tree_combo_core::{ConnectionId, Icon, Point, Rect, Signal, Size};

// ============================================================================
// Model/View
// ============================================================================

pub use crate::model::{
    ItemData, ItemFlags, ItemModel, ItemRole, ModelIndex, NodeId, StandardItem, TreeModel,
    TreeNodeData,
};

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::widget::{
    EventTarget, Key, KeyboardModifiers, MouseButton, Painter, RecordingPainter, SizeHint,
    Widget, WidgetBase, WidgetEvent,
};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::widgets::{HeaderView, TreeComboBox, TreeView};

// ============================================================================
// Configuration
// ============================================================================

pub use crate::config::TreeComboConfig;
