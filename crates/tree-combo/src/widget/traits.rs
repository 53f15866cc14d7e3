//! Core widget traits.

use tree_combo_core::{Rect, Size};

use super::base::{WidgetBase, WidgetId};
use super::events::WidgetEvent;
use super::painting::Painter;

/// Size hint information for layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeHint {
    /// The preferred size for the widget to display optimally.
    pub preferred: Size,

    /// The minimum acceptable size. If `None`, the widget can shrink to zero.
    pub minimum: Option<Size>,
}

impl SizeHint {
    /// Create a size hint with only a preferred size.
    pub fn new(preferred: Size) -> Self {
        Self {
            preferred,
            minimum: None,
        }
    }

    /// Create a size hint from width and height.
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        Self::new(Size::new(width, height))
    }

    /// Set the minimum size.
    pub fn with_minimum(mut self, minimum: Size) -> Self {
        self.minimum = Some(minimum);
        self
    }
}

/// The surface an observed event was aimed at.
///
/// A composite widget that watches events on one of its own child surfaces
/// receives them through [`Widget::event_filter`] tagged with the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The widget itself (e.g. a combo box's compact control).
    Control,
    /// The item area of a popup view.
    PopupViewport,
    /// Any other widget, by id.
    Widget(WidgetId),
}

/// The base trait for all widgets.
///
/// Widgets are `Send + Sync` so that they can be owned by structures shared
/// with model signal handlers; all mutation still happens on the UI thread.
///
/// # Implementing a Widget
///
/// ```ignore
/// use tree_combo::widget::{Painter, SizeHint, Widget, WidgetBase};
///
/// struct Badge {
///     base: WidgetBase,
/// }
///
/// impl Widget for Badge {
///     fn widget_base(&self) -> &WidgetBase { &self.base }
///     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
///     fn size_hint(&self) -> SizeHint { SizeHint::from_dimensions(40.0, 20.0) }
///     fn paint(&self, _painter: &mut dyn Painter) {}
/// }
/// ```
pub trait Widget: Send + Sync {
    /// Get a reference to the widget's base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget's base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// Get the widget's size hint for layout purposes.
    fn size_hint(&self) -> SizeHint;

    /// Paint the widget.
    ///
    /// Coordinates passed to the painter are widget-local.
    fn paint(&self, painter: &mut dyn Painter);

    /// Handle an event.
    ///
    /// Return `true` if the event was handled and should not propagate further.
    fn event(&mut self, _event: &mut WidgetEvent) -> bool {
        false
    }

    /// Filter an event destined for another surface.
    ///
    /// # Returns
    ///
    /// * `true` if the event was handled and should not reach the target.
    /// * `false` if the event should continue to the target.
    fn event_filter(&mut self, _event: &mut WidgetEvent, _target: EventTarget) -> bool {
        false
    }

    // =========================================================================
    // Conveniences delegating to WidgetBase
    // =========================================================================

    fn id(&self) -> WidgetId {
        self.widget_base().id()
    }

    fn geometry(&self) -> Rect {
        self.widget_base().geometry()
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.widget_base_mut().set_geometry(rect);
    }

    fn size(&self) -> Size {
        self.widget_base().size()
    }

    fn is_visible(&self) -> bool {
        self.widget_base().is_visible()
    }

    /// Request a repaint.
    fn update(&mut self) {
        self.widget_base_mut().update();
    }
}
