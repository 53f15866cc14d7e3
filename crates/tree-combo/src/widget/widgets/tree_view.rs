//! TreeView widget for displaying hierarchical data from a model.
//!
//! This module provides [`TreeView`], a view widget that displays items from
//! an [`ItemModel`] as a tree with expand/collapse support. Columns are laid
//! out by the view's [`HeaderView`], which may be hidden.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tree_combo::model::{ItemModel, TreeModel};
//! use tree_combo::widget::widgets::TreeView;
//! use tree_combo::widget::Widget;
//! use tree_combo_core::Rect;
//!
//! let model = Arc::new(TreeModel::<String>::new());
//! let root = model.add_root("Root".into());
//! model.add_child(root, "Child 1".into());
//! model.add_child(root, "Child 2".into());
//!
//! let mut view = TreeView::new().with_model(model.clone());
//! view.set_geometry(Rect::new(0.0, 0.0, 200.0, 200.0));
//!
//! view.expand(&model.index_of(root, 0));
//! assert_eq!(view.visible_row_count(), 3);
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};

use tree_combo_core::logging::{span_names, targets};
use tree_combo_core::{ConnectionId, Point, Rect, Signal, Size};

use crate::model::{ItemModel, ItemRole, ModelIndex, Orientation};
use crate::widget::{
    FontMetrics, Key, KeyPressEvent, MouseButton, MousePressEvent, Painter, SizeHint,
    StyleOptionViewItem, ViewItemState, Widget, WidgetBase, WidgetEvent,
};

use super::header_view::HeaderView;

/// When a scroll bar is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBarPolicy {
    /// Show the scroll bar only when the content overflows.
    #[default]
    AsNeeded,
    /// Never show the scroll bar.
    AlwaysOff,
    /// Always show the scroll bar.
    AlwaysOn,
}

/// What a press selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionBehavior {
    /// Only the pressed cell is highlighted.
    SelectItems,
    /// The whole row of the pressed cell is highlighted.
    #[default]
    SelectRows,
}

/// Outcome of [`TreeView::handle_event`].
///
/// Owners use this to react to view changes without connecting to the
/// view's signals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TreeViewAction {
    /// Nothing observable changed.
    #[default]
    None,
    /// The current index moved to the given index.
    CurrentChanged(ModelIndex),
    /// The given item was expanded.
    Expanded(ModelIndex),
    /// The given item was collapsed.
    Collapsed(ModelIndex),
    /// The given item was activated (Enter).
    Activated(ModelIndex),
}

impl TreeViewAction {
    /// Returns `true` for anything but [`TreeViewAction::None`].
    pub fn is_some(&self) -> bool {
        !matches!(self, TreeViewAction::None)
    }
}

/// A flattened row in the tree view.
#[derive(Debug, Clone)]
struct FlattenedRow {
    /// Column 0 index of the row.
    index: ModelIndex,
    depth: usize,
    has_children: bool,
    is_expanded: bool,
}

/// Raised by model signal slots, consumed lazily by the view.
#[derive(Default)]
struct ModelChanges {
    /// Rows must be flattened again.
    layout_dirty: AtomicBool,
    /// Stored indices may point at the wrong rows.
    indices_stale: AtomicBool,
    /// Stored indices are void.
    reset: AtomicBool,
}

impl ModelChanges {
    fn mark_moved(&self) {
        self.indices_stale.store(true, Ordering::Release);
        self.layout_dirty.store(true, Ordering::Release);
    }

    fn mark_reset(&self) {
        self.reset.store(true, Ordering::Release);
        self.mark_moved();
    }
}

/// Indices the view keeps across model changes.
#[derive(Default)]
struct TrackedIndices {
    root: ModelIndex,
    current: ModelIndex,
    /// Expanded items, keyed by internal id.
    expanded: HashMap<u64, ModelIndex>,
}

impl TrackedIndices {
    /// Applies pending model changes. Expanded items that no longer
    /// resolve are forgotten.
    fn sync(&mut self, model: Option<&dyn ItemModel>, changes: &ModelChanges) {
        if changes.reset.swap(false, Ordering::AcqRel) {
            changes.indices_stale.store(false, Ordering::Release);
            *self = Self::default();
            return;
        }
        if !changes.indices_stale.swap(false, Ordering::AcqRel) {
            return;
        }
        let Some(model) = model else {
            return;
        };

        self.root = model.resolve(&self.root);
        self.current = model.resolve(&self.current);
        let before = self.expanded.len();
        self.expanded = std::mem::take(&mut self.expanded)
            .into_values()
            .map(|index| model.resolve(&index))
            .filter(ModelIndex::is_valid)
            .map(|index| (index.internal_id(), index))
            .collect();
        tracing::trace!(
            target: targets::VIEW,
            pruned = before - self.expanded.len(),
            "tracked indices re-resolved"
        );
    }
}

/// Connections held on the current model's signals.
struct ModelConnections {
    rows_inserted: ConnectionId,
    rows_removed: ConnectionId,
    layout_changed: ConnectionId,
    model_reset: ConnectionId,
}

impl ModelConnections {
    fn connect(model: &dyn ItemModel, changes: &Arc<ModelChanges>) -> Self {
        let signals = model.signals();

        let rows_inserted = {
            let changes = changes.clone();
            signals.rows_inserted.connect(move |_| changes.mark_moved())
        };
        let rows_removed = {
            let changes = changes.clone();
            signals.rows_removed.connect(move |_| changes.mark_moved())
        };
        let layout_changed = {
            let changes = changes.clone();
            signals.layout_changed.connect(move |_| changes.mark_moved())
        };
        let model_reset = {
            let changes = changes.clone();
            signals.model_reset.connect(move |_| changes.mark_reset())
        };

        Self {
            rows_inserted,
            rows_removed,
            layout_changed,
            model_reset,
        }
    }

    fn disconnect(self, model: &dyn ItemModel) {
        let signals = model.signals();
        signals.rows_inserted.disconnect(self.rows_inserted);
        signals.rows_removed.disconnect(self.rows_removed);
        signals.layout_changed.disconnect(self.layout_changed);
        signals.model_reset.disconnect(self.model_reset);
    }
}

/// A tree view widget for displaying hierarchical data.
///
/// TreeView displays data from an ItemModel in a tree structure with:
/// - Expand/collapse indicators for items with children
/// - Indentation based on hierarchy depth
/// - A header of resizable, hideable columns
/// - Keyboard navigation and a single current index
///
/// The rows shown are the descendants of [`root_index`](Self::root_index);
/// its direct children are the top-level rows.
///
/// The root, the current index and the expanded items follow their items
/// when rows are inserted or removed elsewhere in the model. An item that
/// is removed drops out of all three.
///
/// # Signals
///
/// - `current_changed(ModelIndex)`: Emitted when the current index changes
/// - `activated(ModelIndex)`: Emitted when Enter is pressed on an item
/// - `expanded(ModelIndex)`: Emitted when an item is expanded
/// - `collapsed(ModelIndex)`: Emitted when an item is collapsed
pub struct TreeView {
    base: WidgetBase,

    // Model/View
    model: Option<Arc<dyn ItemModel>>,
    connections: Option<ModelConnections>,
    header: HeaderView,

    // Tree structure
    /// Lock before `rows` when both are needed.
    tracked: Mutex<TrackedIndices>,
    /// Flattened visible rows, rebuilt lazily when the layout is dirty.
    rows: Mutex<Arc<[FlattenedRow]>>,
    changes: Arc<ModelChanges>,

    // Layout
    row_height: f32,
    indentation: f32,
    root_decorated: bool,
    items_expandable: bool,
    metrics: FontMetrics,

    // Behavior
    selection_behavior: SelectionBehavior,
    auto_scroll: bool,

    // Scrolling
    scroll_x: f32,
    scroll_y: f32,
    scrollbar_policy_h: ScrollBarPolicy,
    scrollbar_policy_v: ScrollBarPolicy,

    /// Emitted when the current index changes.
    pub current_changed: Signal<ModelIndex>,
    /// Emitted when Enter is pressed on the current item.
    pub activated: Signal<ModelIndex>,
    /// Emitted when an item is expanded.
    pub expanded: Signal<ModelIndex>,
    /// Emitted when an item is collapsed.
    pub collapsed: Signal<ModelIndex>,
}

impl Default for TreeView {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeView {
    /// Edge length of the expand/collapse indicator.
    pub const EXPAND_INDICATOR_SIZE: f32 = 16.0;
    /// Thickness of a scroll bar.
    pub const SCROLLBAR_THICKNESS: f32 = 12.0;

    /// Creates a new empty tree view.
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            model: None,
            connections: None,
            header: HeaderView::new(),
            tracked: Mutex::new(TrackedIndices::default()),
            rows: Mutex::new(Arc::from(Vec::new())),
            changes: Arc::new(ModelChanges {
                layout_dirty: AtomicBool::new(true),
                ..ModelChanges::default()
            }),
            row_height: 24.0,
            indentation: 20.0,
            root_decorated: true,
            items_expandable: true,
            metrics: FontMetrics::default(),
            selection_behavior: SelectionBehavior::default(),
            auto_scroll: true,
            scroll_x: 0.0,
            scroll_y: 0.0,
            scrollbar_policy_h: ScrollBarPolicy::AsNeeded,
            scrollbar_policy_v: ScrollBarPolicy::AsNeeded,
            current_changed: Signal::new(),
            activated: Signal::new(),
            expanded: Signal::new(),
            collapsed: Signal::new(),
        }
    }

    /// Sets the model using builder pattern.
    pub fn with_model(mut self, model: Arc<dyn ItemModel>) -> Self {
        self.set_model(Some(model));
        self
    }

    /// Sets the indentation using builder pattern.
    pub fn with_indentation(mut self, indentation: f32) -> Self {
        self.indentation = indentation;
        self
    }

    /// Sets whether root items show expand indicators using builder pattern.
    pub fn with_root_decorated(mut self, decorated: bool) -> Self {
        self.root_decorated = decorated;
        self
    }

    // =========================================================================
    // Model
    // =========================================================================

    /// Returns the model, if any.
    pub fn model(&self) -> Option<&Arc<dyn ItemModel>> {
        self.model.as_ref()
    }

    /// Sets the model.
    ///
    /// Expansion state, the current index and the root index are reset. The
    /// header gets one section per model column, all visible.
    pub fn set_model(&mut self, model: Option<Arc<dyn ItemModel>>) {
        if let (Some(old), Some(connections)) = (self.model.take(), self.connections.take()) {
            connections.disconnect(&*old);
        }

        self.connections = model
            .as_ref()
            .map(|model| ModelConnections::connect(&**model, &self.changes));
        self.model = model;

        self.changes.reset.store(false, Ordering::Release);
        self.changes.indices_stale.store(false, Ordering::Release);
        *self.tracked.get_mut() = TrackedIndices::default();
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;

        self.header.set_section_count(0);
        self.sync_header_sections();

        tracing::debug!(
            target: targets::VIEW,
            has_model = self.model.is_some(),
            columns = self.header.section_count(),
            "tree view model set"
        );
        self.invalidate_layout();
    }

    /// Matches the header's sections to the model's columns.
    fn sync_header_sections(&mut self) {
        let root = self.root_index();
        let Some(model) = &self.model else {
            self.header.set_section_count(0);
            return;
        };

        let count = model.column_count(&root);
        if count != self.header.section_count() {
            self.header.set_section_count(count);
            let labels = (0..count)
                .map(|section| {
                    model
                        .header_data(section, Orientation::Horizontal, ItemRole::Display)
                        .to_display_string()
                        .unwrap_or_default()
                })
                .collect();
            self.header.set_section_labels(labels);
        }
    }

    /// Current indices after any pending model changes.
    fn tracked(&self) -> MutexGuard<'_, TrackedIndices> {
        let mut tracked = self.tracked.lock();
        tracked.sync(self.model.as_deref(), &self.changes);
        tracked
    }

    fn tracked_mut(&mut self) -> &mut TrackedIndices {
        let tracked = self.tracked.get_mut();
        tracked.sync(self.model.as_deref(), &self.changes);
        tracked
    }

    /// Returns the root index whose children are the top-level rows.
    pub fn root_index(&self) -> ModelIndex {
        self.tracked().root.clone()
    }

    /// Sets the root index.
    pub fn set_root_index(&mut self, root: ModelIndex) {
        let tracked = self.tracked_mut();
        if tracked.root == root {
            return;
        }
        tracing::trace!(target: targets::VIEW, ?root, "tree view root changed");
        tracked.root = root;
        self.scroll_y = 0.0;
        self.invalidate_layout();
    }

    // =========================================================================
    // Current Index
    // =========================================================================

    /// Returns the current index.
    pub fn current_index(&self) -> ModelIndex {
        self.tracked().current.clone()
    }

    /// Sets the current index.
    ///
    /// Returns `true` if the current index changed.
    pub fn set_current_index(&mut self, index: ModelIndex) -> bool {
        let tracked = self.tracked_mut();
        if tracked.current == index {
            return false;
        }
        tracked.current = index.clone();
        self.current_changed.emit(index);
        self.base.update();
        true
    }

    pub fn selection_behavior(&self) -> SelectionBehavior {
        self.selection_behavior
    }

    pub fn set_selection_behavior(&mut self, behavior: SelectionBehavior) {
        self.selection_behavior = behavior;
        self.base.update();
    }

    /// Whether the view scrolls when dragging near its edges.
    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    // =========================================================================
    // Expand/Collapse
    // =========================================================================

    /// Returns whether the item at the given index is expanded.
    pub fn is_expanded(&self, index: &ModelIndex) -> bool {
        index.is_valid() && self.tracked().expanded.contains_key(&index.internal_id())
    }

    /// Expands the item at the given index.
    ///
    /// Returns `true` if the item was collapsed and has children.
    pub fn expand(&mut self, index: &ModelIndex) -> bool {
        if !index.is_valid() {
            return false;
        }

        let Some(model) = &self.model else {
            return false;
        };

        if !model.has_children(index) {
            return false;
        }

        let expanded = &mut self.tracked_mut().expanded;
        if expanded.contains_key(&index.internal_id()) {
            return false;
        }
        expanded.insert(index.internal_id(), index.clone());
        self.invalidate_layout();
        self.expanded.emit(index.clone());
        true
    }

    /// Collapses the item at the given index.
    ///
    /// Returns `true` if the item was expanded.
    pub fn collapse(&mut self, index: &ModelIndex) -> bool {
        if !index.is_valid() {
            return false;
        }

        if self.tracked_mut().expanded.remove(&index.internal_id()).is_some() {
            self.invalidate_layout();
            self.collapsed.emit(index.clone());
            return true;
        }
        false
    }

    /// Toggles the expanded state of the item at the given index.
    pub fn toggle_expanded(&mut self, index: &ModelIndex) -> TreeViewAction {
        if self.is_expanded(index) {
            if self.collapse(index) {
                return TreeViewAction::Collapsed(index.clone());
            }
        } else if self.expand(index) {
            return TreeViewAction::Expanded(index.clone());
        }
        TreeViewAction::None
    }

    /// Expands all items in the tree.
    pub fn expand_all(&mut self) {
        let Some(model) = self.model.clone() else {
            return;
        };
        let tracked = self.tracked_mut();
        let root = tracked.root.clone();
        Self::expand_all_recursive_collect(&*model, &root, &mut tracked.expanded);
        self.invalidate_layout();
    }

    fn expand_all_recursive_collect(
        model: &dyn ItemModel,
        parent: &ModelIndex,
        expanded: &mut HashMap<u64, ModelIndex>,
    ) {
        for row in 0..model.row_count(parent) {
            let index = model.index(row, 0, parent);
            if model.has_children(&index) {
                Self::expand_all_recursive_collect(model, &index, expanded);
                expanded.insert(index.internal_id(), index);
            }
        }
    }

    /// Collapses all items in the tree.
    pub fn collapse_all(&mut self) {
        self.tracked_mut().expanded.clear();
        self.invalidate_layout();
    }

    /// Expands all ancestors of the index so that it is visible.
    pub fn expand_to_index(&mut self, index: &ModelIndex) {
        if !index.is_valid() {
            return;
        }

        let Some(model) = self.model.clone() else {
            return;
        };

        let expanded = &mut self.tracked_mut().expanded;
        let mut current = model.parent(index);
        while current.is_valid() {
            let parent = model.parent(&current);
            expanded.insert(current.internal_id(), current);
            current = parent;
        }

        self.invalidate_layout();
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Returns the header.
    pub fn header(&self) -> &HeaderView {
        &self.header
    }

    /// Returns the header mutably.
    pub fn header_mut(&mut self) -> &mut HeaderView {
        &mut self.header
    }

    /// Returns whether the header strip is shown.
    pub fn is_header_hidden(&self) -> bool {
        !self.header.is_visible()
    }

    pub fn set_header_hidden(&mut self, hidden: bool) {
        self.header.widget_base_mut().set_visible(!hidden);
        self.sync_header_width();
        self.base.update();
    }

    /// Hides a column.
    pub fn hide_column(&mut self, column: usize) {
        self.header.hide_section(column);
        self.base.update();
    }

    /// Shows a hidden column.
    pub fn show_column(&mut self, column: usize) {
        self.header.show_section(column);
        self.base.update();
    }

    pub fn is_column_hidden(&self, column: usize) -> bool {
        self.header.is_section_hidden(column)
    }

    /// Resizes a column to fit its content over the visible rows.
    ///
    /// The first visible column includes the depth indentation of each row.
    /// Does nothing when no rows are visible.
    pub fn resize_column_to_contents(&mut self, column: usize) {
        self.refresh_layout();
        let Some(model) = self.model.clone() else {
            return;
        };

        let rows = self.rows();
        if rows.is_empty() || column >= self.header.section_count() {
            return;
        }

        let decorated = self.header.first_visible_section() == Some(column);
        let width = rows
            .iter()
            .map(|row| {
                let cell = model.sibling(&row.index, row.index.row(), column);
                let text = model.display_text(&cell).unwrap_or_default();
                let has_icon = model.decoration(&cell).is_some();
                let indent = if decorated {
                    self.calculate_indentation(row.depth)
                } else {
                    0.0
                };
                indent + self.metrics.item_width(&text, has_icon)
            })
            .fold(0.0_f32, f32::max);

        tracing::trace!(target: targets::VIEW, column, width, "column fitted to contents");
        self.header.resize_section(column, width);
    }

    // =========================================================================
    // Layout Properties
    // =========================================================================

    /// Gets the indentation amount per level.
    pub fn indentation(&self) -> f32 {
        self.indentation
    }

    /// Sets the indentation amount per level.
    pub fn set_indentation(&mut self, indentation: f32) {
        if (self.indentation - indentation).abs() > f32::EPSILON {
            self.indentation = indentation.max(0.0);
            self.base.update();
        }
    }

    /// Returns whether root items show expand indicators.
    pub fn root_is_decorated(&self) -> bool {
        self.root_decorated
    }

    pub fn set_root_decorated(&mut self, decorated: bool) {
        if self.root_decorated != decorated {
            self.root_decorated = decorated;
            self.base.update();
        }
    }

    /// Returns whether items can be expanded by the user.
    pub fn items_expandable(&self) -> bool {
        self.items_expandable
    }

    pub fn set_items_expandable(&mut self, expandable: bool) {
        self.items_expandable = expandable;
    }

    /// Uniform height of every row.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn set_row_height(&mut self, height: f32) {
        self.row_height = height.max(1.0);
        self.invalidate_layout();
    }

    pub fn font_metrics(&self) -> FontMetrics {
        self.metrics
    }

    pub fn set_font_metrics(&mut self, metrics: FontMetrics) {
        self.metrics = metrics;
        self.base.update();
    }

    pub fn horizontal_scroll_bar_policy(&self) -> ScrollBarPolicy {
        self.scrollbar_policy_h
    }

    pub fn set_horizontal_scroll_bar_policy(&mut self, policy: ScrollBarPolicy) {
        self.scrollbar_policy_h = policy;
        self.sync_header_width();
    }

    pub fn vertical_scroll_bar_policy(&self) -> ScrollBarPolicy {
        self.scrollbar_policy_v
    }

    pub fn set_vertical_scroll_bar_policy(&mut self, policy: ScrollBarPolicy) {
        self.scrollbar_policy_v = policy;
        self.sync_header_width();
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Sets the scroll position, clamped to the content.
    pub fn set_scroll_position(&mut self, x: f32, y: f32) {
        let new_x = x.clamp(0.0, self.max_scroll_x());
        let new_y = y.clamp(0.0, self.max_scroll_y());

        if self.scroll_x != new_x || self.scroll_y != new_y {
            self.scroll_x = new_x;
            self.scroll_y = new_y;
            self.base.update();
        }
    }

    /// Scrolls so that the row of `index` is inside the viewport.
    pub fn scroll_to(&mut self, index: &ModelIndex) {
        self.refresh_layout();
        let Some(position) = self.row_position(index) else {
            return;
        };

        let viewport_height = self.viewport_rect().height();
        let item_top = position as f32 * self.row_height;
        let item_bottom = item_top + self.row_height;

        if item_top < self.scroll_y {
            self.scroll_y = item_top;
        } else if item_bottom > self.scroll_y + viewport_height {
            self.scroll_y = item_bottom - viewport_height;
        }
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll_y());
        self.base.update();
    }

    fn max_scroll_x(&self) -> f32 {
        (self.content_size().width - self.viewport_rect().width()).max(0.0)
    }

    fn max_scroll_y(&self) -> f32 {
        (self.content_size().height - self.viewport_rect().height()).max(0.0)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of rows currently laid out.
    pub fn visible_row_count(&self) -> usize {
        self.rows().len()
    }

    /// Column 0 indices of the rows currently laid out, top to bottom.
    pub fn visible_indices(&self) -> Vec<ModelIndex> {
        self.rows().iter().map(|row| row.index.clone()).collect()
    }

    /// Height the rows need.
    pub fn content_height(&self) -> f32 {
        self.rows().len() as f32 * self.row_height
    }

    fn content_size(&self) -> Size {
        Size::new(self.header.total_size(), self.content_height())
    }

    /// Returns the index at the given point in widget coordinates.
    ///
    /// The result is invalid when the point is outside the viewport, below
    /// the last row, or not over a visible column. Points over a row's
    /// indentation still map to that row.
    pub fn index_at(&self, point: Point) -> ModelIndex {
        let viewport = self.viewport_rect();
        if !viewport.contains(point) {
            return ModelIndex::invalid();
        }
        let Some(model) = &self.model else {
            return ModelIndex::invalid();
        };

        let content_y = point.y - viewport.top() + self.scroll_y;
        let rows = self.rows();
        let Some(row) = rows.get((content_y / self.row_height).floor() as usize) else {
            return ModelIndex::invalid();
        };

        let content_x = point.x - viewport.left() + self.scroll_x;
        match self.header.section_at(content_x) {
            Some(column) => model.sibling(&row.index, row.index.row(), column),
            None => ModelIndex::invalid(),
        }
    }

    /// Returns the rectangle of an item's cell in widget coordinates.
    ///
    /// For the first visible column the rectangle starts after the row's
    /// indentation, so the expand indicator lies outside it. Returns
    /// [`Rect::ZERO`] when the item isn't laid out or its column is hidden.
    pub fn visual_rect(&self, index: &ModelIndex) -> Rect {
        if !index.is_valid() || self.header.is_section_hidden(index.column()) {
            return Rect::ZERO;
        }
        if index.column() >= self.header.section_count() {
            return Rect::ZERO;
        }

        let rows = self.rows();
        let Some(position) = Self::find_row(&rows, index) else {
            return Rect::ZERO;
        };

        let viewport = self.viewport_rect();
        let column = index.column();
        let mut x = viewport.left() + self.header.section_position(column) - self.scroll_x;
        let mut width = self.header.effective_section_size(column);
        if self.header.first_visible_section() == Some(column) {
            let indent = self.calculate_indentation(rows[position].depth);
            x += indent;
            width = (width - indent).max(0.0);
        }

        Rect::new(
            x,
            viewport.top() + position as f32 * self.row_height - self.scroll_y,
            width,
            self.row_height,
        )
    }

    /// Returns the viewport rectangle in widget coordinates.
    ///
    /// This is the widget rect minus the header strip (when shown) and any
    /// visible scroll bars.
    pub fn viewport_rect(&self) -> Rect {
        let rect = self.base.rect();
        let header_height = if self.header.is_visible() {
            HeaderView::DEFAULT_HEIGHT
        } else {
            0.0
        };

        let width = if self.is_vertical_scrollbar_visible() {
            rect.width() - Self::SCROLLBAR_THICKNESS
        } else {
            rect.width()
        };

        let mut height = rect.height() - header_height;
        if self.is_horizontal_scrollbar_visible() {
            height -= Self::SCROLLBAR_THICKNESS;
        }

        Rect::new(0.0, header_height, width.max(0.0), height.max(0.0))
    }

    fn is_vertical_scrollbar_visible(&self) -> bool {
        match self.scrollbar_policy_v {
            ScrollBarPolicy::AlwaysOn => true,
            ScrollBarPolicy::AlwaysOff => false,
            ScrollBarPolicy::AsNeeded => {
                let header_height = if self.header.is_visible() {
                    HeaderView::DEFAULT_HEIGHT
                } else {
                    0.0
                };
                self.content_height() > self.base.height() - header_height
            }
        }
    }

    fn is_horizontal_scrollbar_visible(&self) -> bool {
        match self.scrollbar_policy_h {
            ScrollBarPolicy::AlwaysOn => true,
            ScrollBarPolicy::AlwaysOff => false,
            ScrollBarPolicy::AsNeeded => self.header.total_size() > self.base.width(),
        }
    }

    /// Keeps the header as wide as the viewport.
    pub fn sync_header_width(&mut self) {
        let width = self.viewport_rect().width();
        self.header.set_width(width);
    }

    // =========================================================================
    // Layout Calculation
    // =========================================================================

    fn invalidate_layout(&mut self) {
        self.changes.layout_dirty.store(true, Ordering::Release);
        self.refresh_layout();
        self.base.update();
    }

    /// Rebuilds rows if needed and keeps the header in step with the model.
    fn refresh_layout(&mut self) {
        self.sync_header_sections();
        let _ = self.rows();
        self.sync_header_width();
    }

    fn rows(&self) -> Arc<[FlattenedRow]> {
        let tracked = self.tracked();
        let mut rows = self.rows.lock();
        if self.changes.layout_dirty.swap(false, Ordering::AcqRel) {
            let _span = tracing::trace_span!(span_names::LAYOUT).entered();
            let mut flattened = Vec::new();
            if let Some(model) = &self.model {
                Self::flatten_tree(&**model, &tracked, &tracked.root, 0, &mut flattened);
            }
            tracing::trace!(target: targets::VIEW, rows = flattened.len(), "tree layout rebuilt");
            *rows = Arc::from(flattened);
        }
        rows.clone()
    }

    fn flatten_tree(
        model: &dyn ItemModel,
        tracked: &TrackedIndices,
        parent: &ModelIndex,
        depth: usize,
        out: &mut Vec<FlattenedRow>,
    ) {
        for row in 0..model.row_count(parent) {
            let index = model.index(row, 0, parent);
            if !index.is_valid() {
                continue;
            }
            let has_children =
                !model.flags(&index).never_has_children && model.has_children(&index);
            let is_expanded = tracked.expanded.contains_key(&index.internal_id());

            out.push(FlattenedRow {
                index: index.clone(),
                depth,
                has_children,
                is_expanded,
            });

            if has_children && is_expanded {
                Self::flatten_tree(model, tracked, &index, depth + 1, out);
            }
        }
    }

    fn calculate_indentation(&self, depth: usize) -> f32 {
        let base_indent = if self.root_decorated {
            Self::EXPAND_INDICATOR_SIZE
        } else {
            0.0
        };
        base_indent + depth as f32 * self.indentation
    }

    fn find_row(rows: &[FlattenedRow], index: &ModelIndex) -> Option<usize> {
        if !index.is_valid() {
            return None;
        }
        let target_id = index.internal_id();
        rows.iter().position(|r| r.index.internal_id() == target_id)
    }

    fn row_position(&self, index: &ModelIndex) -> Option<usize> {
        Self::find_row(&self.rows(), index)
    }

    /// Range of rows intersecting the viewport.
    fn visible_range(&self, row_count: usize) -> std::ops::Range<usize> {
        if row_count == 0 {
            return 0..0;
        }
        let first = (self.scroll_y / self.row_height).floor() as usize;
        let visible = (self.viewport_rect().height() / self.row_height).ceil() as usize + 1;
        first.min(row_count)..(first + visible).min(row_count)
    }

    // =========================================================================
    // Expand Indicator Helpers
    // =========================================================================

    fn expand_indicator_rect(&self, rows: &[FlattenedRow], position: usize) -> Option<Rect> {
        let row = rows.get(position)?;
        if !row.has_children || (row.depth == 0 && !self.root_decorated) {
            return None;
        }
        let first = self.header.first_visible_section()?;

        let viewport = self.viewport_rect();
        let indent = self.calculate_indentation(row.depth);
        let x = viewport.left() + self.header.section_position(first) - self.scroll_x + indent
            - Self::EXPAND_INDICATOR_SIZE;
        let row_top = viewport.top() + position as f32 * self.row_height - self.scroll_y;
        let y = row_top + (self.row_height - Self::EXPAND_INDICATOR_SIZE) / 2.0;

        Some(Rect::new(
            x,
            y,
            Self::EXPAND_INDICATOR_SIZE,
            Self::EXPAND_INDICATOR_SIZE,
        ))
    }

    // =========================================================================
    // Event Handling
    // =========================================================================

    /// Handles an input event and reports what changed.
    pub fn handle_event(&mut self, event: &mut WidgetEvent) -> TreeViewAction {
        let action = match event {
            WidgetEvent::MousePress(e) => self.handle_mouse_press(e),
            WidgetEvent::KeyPress(e) => self.handle_key_press(e),
            WidgetEvent::MouseRelease(_) => TreeViewAction::None,
        };
        if action.is_some() {
            event.accept();
        }
        action
    }

    fn handle_mouse_press(&mut self, event: &MousePressEvent) -> TreeViewAction {
        if event.button != MouseButton::Left {
            return TreeViewAction::None;
        }

        self.refresh_layout();
        let rows = self.rows();

        if self.items_expandable {
            let on_indicator = (0..rows.len()).find(|&position| {
                self.expand_indicator_rect(&rows, position)
                    .is_some_and(|rect| rect.contains(event.local_pos))
            });
            if let Some(position) = on_indicator {
                let index = rows[position].index.clone();
                return self.toggle_expanded(&index);
            }
        }

        let index = self.index_at(event.local_pos);
        if !index.is_valid() {
            return TreeViewAction::None;
        }

        let pickable = self
            .model
            .as_ref()
            .is_some_and(|model| model.flags(&index).is_pickable());
        if pickable && self.set_current_index(index.clone()) {
            return TreeViewAction::CurrentChanged(index);
        }
        TreeViewAction::None
    }

    fn handle_key_press(&mut self, event: &KeyPressEvent) -> TreeViewAction {
        self.refresh_layout();
        let rows = self.rows();
        if rows.is_empty() {
            return TreeViewAction::None;
        }

        let current = self.current_index();
        let current_row = Self::find_row(&rows, &current);
        let last = rows.len() - 1;
        let per_page = ((self.viewport_rect().height() / self.row_height).floor() as usize).max(1);

        match event.key {
            Key::ArrowUp => {
                let target = current_row.map(|r| r.saturating_sub(1)).unwrap_or(0);
                self.move_to_row(&rows, target)
            }
            Key::ArrowDown => {
                let target = current_row.map(|r| (r + 1).min(last)).unwrap_or(0);
                self.move_to_row(&rows, target)
            }
            Key::PageUp => {
                let target = current_row.map(|r| r.saturating_sub(per_page)).unwrap_or(0);
                self.move_to_row(&rows, target)
            }
            Key::PageDown => {
                let target = current_row.map(|r| (r + per_page).min(last)).unwrap_or(0);
                self.move_to_row(&rows, target)
            }
            Key::Home => self.move_to_row(&rows, 0),
            Key::End => self.move_to_row(&rows, last),
            Key::ArrowLeft => {
                let Some(position) = current_row else {
                    return TreeViewAction::None;
                };
                let row = &rows[position];
                if row.has_children && row.is_expanded {
                    let index = row.index.clone();
                    if self.collapse(&index) {
                        return TreeViewAction::Collapsed(index);
                    }
                    TreeViewAction::None
                } else {
                    match Self::find_row(&rows, &row.index.parent()) {
                        Some(parent_row) => self.move_to_row(&rows, parent_row),
                        None => TreeViewAction::None,
                    }
                }
            }
            Key::ArrowRight => {
                let Some(position) = current_row else {
                    return TreeViewAction::None;
                };
                let row = &rows[position];
                if !row.has_children {
                    TreeViewAction::None
                } else if !row.is_expanded {
                    let index = row.index.clone();
                    if self.expand(&index) {
                        return TreeViewAction::Expanded(index);
                    }
                    TreeViewAction::None
                } else if position < last {
                    // Rows were rebuilt on expand; the first child follows the parent.
                    self.move_to_row(&rows, position + 1)
                } else {
                    TreeViewAction::None
                }
            }
            Key::Enter | Key::NumpadEnter => {
                if !current.is_valid() {
                    return TreeViewAction::None;
                }
                self.activated.emit(current.clone());
                TreeViewAction::Activated(current)
            }
            _ => TreeViewAction::None,
        }
    }

    /// Moves the current index to a row, keeping the current column.
    fn move_to_row(&mut self, rows: &[FlattenedRow], position: usize) -> TreeViewAction {
        let Some(row) = rows.get(position) else {
            return TreeViewAction::None;
        };
        let Some(model) = self.model.clone() else {
            return TreeViewAction::None;
        };

        let current = self.current_index();
        let column = if current.is_valid() {
            current.column()
        } else {
            self.header.first_visible_section().unwrap_or(0)
        };
        let mut index = model.sibling(&row.index, row.index.row(), column);
        if !index.is_valid() {
            index = row.index.clone();
        }

        if !self.set_current_index(index.clone()) {
            return TreeViewAction::None;
        }
        self.scroll_to(&index);
        TreeViewAction::CurrentChanged(index)
    }

    // =========================================================================
    // Painting
    // =========================================================================

    fn paint_items(&self, painter: &mut dyn Painter) {
        let Some(model) = &self.model else {
            return;
        };
        let rows = self.rows();
        let current = self.current_index();
        let current_row = Self::find_row(&rows, &current);

        for position in self.visible_range(rows.len()) {
            let row = &rows[position];

            if let Some(rect) = self.expand_indicator_rect(&rows, position) {
                painter.draw_branch_indicator(rect, row.is_expanded);
            }

            for column in self.header.visible_sections() {
                let index = model.sibling(&row.index, row.index.row(), column);
                let flags = model.flags(&index);
                let is_current_row = current_row == Some(position);
                let selected = match self.selection_behavior {
                    SelectionBehavior::SelectRows => is_current_row,
                    SelectionBehavior::SelectItems => {
                        is_current_row && current.column() == column
                    }
                };

                let option = StyleOptionViewItem {
                    rect: self.visual_rect(&index),
                    state: ViewItemState {
                        selected,
                        focused: is_current_row && self.base.has_focus(),
                        enabled: flags.enabled && self.base.is_enabled(),
                        expanded: row.is_expanded,
                        has_children: row.has_children,
                    },
                    flags,
                    text: model.display_text(&index),
                    icon: model.decoration(&index),
                    index,
                };
                painter.draw_view_item(&option);
            }
        }
    }
}

impl Drop for TreeView {
    fn drop(&mut self) {
        if let (Some(model), Some(connections)) = (self.model.take(), self.connections.take()) {
            connections.disconnect(&*model);
        }
    }
}

impl Widget for TreeView {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::from_dimensions(
            self.header.total_size().max(200.0),
            self.content_height().max(200.0),
        )
        .with_minimum(self.base.minimum_size())
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.base.set_geometry(rect);
        self.scroll_x = self.scroll_x.clamp(0.0, self.max_scroll_x());
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll_y());
        self.sync_header_width();
    }

    fn paint(&self, painter: &mut dyn Painter) {
        self.paint_items(painter);
        self.header.paint(painter);
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        self.handle_event(event).is_some()
    }
}

static_assertions::assert_impl_all!(TreeView: Send, Sync);
