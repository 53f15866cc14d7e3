//! Widget base implementation.
//!
//! This module provides `WidgetBase`, the common implementation details
//! for all widgets. It handles identity, geometry, visibility, enabled state
//! and repaint bookkeeping.

use std::sync::atomic::{AtomicU64, Ordering};

use tree_combo_core::{Point, Rect, Signal, Size};

static WIDGET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    fn next() -> Self {
        Self(WIDGET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// The base implementation for all widgets.
///
/// This struct provides common functionality that all widgets need:
/// - Identity (id and optional name)
/// - Geometry management (position, size, minimum size)
/// - Visibility, enabled and focus state
/// - Repaint requests
///
/// Widget implementations include this as a field and delegate common
/// operations to it.
pub struct WidgetBase {
    id: WidgetId,
    name: String,

    /// The widget's geometry (position relative to parent and size).
    geometry: Rect,
    minimum_size: Size,

    visible: bool,
    enabled: bool,
    focused: bool,

    needs_repaint: bool,

    /// Signal emitted when the geometry changes.
    pub geometry_changed: Signal<Rect>,

    /// Signal emitted when visibility changes.
    pub visible_changed: Signal<bool>,

    /// Signal emitted every time [`update`](Self::update) is called.
    pub repaint_requested: Signal<()>,
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetBase {
    /// Create a new widget base.
    pub fn new() -> Self {
        Self {
            id: WidgetId::next(),
            name: String::new(),
            geometry: Rect::ZERO,
            minimum_size: Size::ZERO,
            visible: true,
            enabled: true,
            focused: false,
            needs_repaint: true,
            geometry_changed: Signal::new(),
            visible_changed: Signal::new(),
            repaint_requested: Signal::new(),
        }
    }

    /// Get the widget's unique ID.
    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Get the widget's geometry (position relative to parent and size).
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Set the widget's geometry.
    ///
    /// The size is clamped to the minimum size.
    pub fn set_geometry(&mut self, rect: Rect) {
        let rect = Rect {
            origin: rect.origin,
            size: rect.size.at_least(self.minimum_size),
        };
        if self.geometry != rect {
            self.geometry = rect;
            self.geometry_changed.emit(rect);
            self.update();
        }
    }

    pub fn pos(&self) -> Point {
        self.geometry.origin
    }

    /// Move the widget without changing its size.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let size = self.geometry.size;
        self.set_geometry(Rect::new(x, y, size.width, size.height));
    }

    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Resize the widget without moving it.
    pub fn resize(&mut self, width: f32, height: f32) {
        let origin = self.geometry.origin;
        self.set_geometry(Rect::new(origin.x, origin.y, width, height));
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.geometry.width()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.geometry.height()
    }

    /// Get the widget's local rectangle (origin at 0,0).
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.geometry.size)
    }

    pub fn minimum_size(&self) -> Size {
        self.minimum_size
    }

    /// Set the minimum size and grow the current geometry if needed.
    pub fn set_minimum_size(&mut self, size: Size) {
        self.minimum_size = size;
        let geometry = self.geometry;
        self.set_geometry(geometry);
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.visible_changed.emit(visible);
            self.update();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.update();
        }
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.update();
        }
    }

    // =========================================================================
    // Repaint
    // =========================================================================

    /// Check if the widget needs to be repainted.
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Request a repaint of the widget.
    pub fn update(&mut self) {
        self.needs_repaint = true;
        self.repaint_requested.emit(());
    }

    /// Clear the repaint flag after the widget has been painted.
    pub fn mark_painted(&mut self) {
        self.needs_repaint = false;
    }

    /// Check if a point (in local coordinates) is inside the widget.
    pub fn contains_point(&self, point: Point) -> bool {
        self.rect().contains(point)
    }
}
