//! TreeComboBox widget: a combo box whose drop-down is a tree.
//!
//! The compact control shows a label; opening it shows a [`TreeView`] over a
//! hierarchical [`ItemModel`]. Picking a row commits that row's cell in the
//! showing column into the label, and [`TreeComboBox::current_model_index`]
//! reports the picked row at the index column.
//!
//! Presses on a row's expand indicator (or anywhere outside a row's cell
//! rectangle) don't commit: the widget watches the popup's viewport and arms
//! a one-shot flag that makes the following close a no-op.
//!
//! The model stays the caller's to change. Stored indices (the cursor, the
//! root, the last committed row) follow their items through insertions and
//! removals elsewhere in the tree.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tree_combo::model::{StandardItem, TreeModel};
//! use tree_combo::widget::widgets::TreeComboBox;
//!
//! let model = Arc::new(TreeModel::<StandardItem>::new());
//! let docs = model.add_root(StandardItem::new("Documents"));
//! let notes = model.add_child(docs, StandardItem::new("notes.txt")).unwrap();
//!
//! let mut combo = TreeComboBox::new();
//! combo.set_model(model.clone());
//! combo.current_text_changed.connect(|text| println!("picked {text}"));
//!
//! combo.set_current_model_index(model.index_of(notes, 0));
//! assert_eq!(combo.display_text(), "notes.txt");
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tree_combo_core::logging::{span_names, targets};
use tree_combo_core::{Icon, Point, Rect, Signal, Size};

use crate::config::TreeComboConfig;
use crate::model::{ItemModel, ModelIndex};
use crate::widget::{
    EventTarget, Key, KeyPressEvent, MouseButton, MousePressEvent, Painter, SizeHint,
    StyleOptionComboBox, Widget, WidgetBase, WidgetEvent,
};

use super::tree_view::{ScrollBarPolicy, SelectionBehavior, TreeView};

/// A combo box presenting a tree of items in its popup.
///
/// The label (`display_text` / `display_icon`) is decoupled from the popup's
/// cursor: it only changes on commit or through the explicit setters, never
/// while the user browses the open popup.
///
/// # Input routing
///
/// Hosts send input aimed at the compact control to [`Widget::event`] and
/// input aimed at the open popup (in popup-local coordinates) to
/// [`popup_event`](Self::popup_event).
///
/// # Signals
///
/// - `current_index_changed(ModelIndex)`: the reported index changed on commit
/// - `current_text_changed(String)`: the committed text changed
/// - `activated(ModelIndex)`: the user closed the popup on a row
/// - `popup_shown()` / `popup_hidden()`
pub struct TreeComboBox {
    base: WidgetBase,

    /// The popup tree; it owns the model.
    view: TreeView,
    /// Popup root while closed.
    root_index: ModelIndex,
    /// Cursor as of the last close.
    last_cursor: ModelIndex,
    /// Last index reported through `current_index_changed`.
    reported_index: ModelIndex,
    /// Set by the view's `expanded` signal.
    refit_pending: Arc<AtomicBool>,

    current_text: String,
    display_text: String,
    display_icon: Option<Icon>,
    showing_column: usize,
    index_column: usize,
    showing_icon: bool,

    /// One-shot: set by a press outside any cell, consumed by the next close.
    skip_next_hide: bool,
    popup_visible: bool,
    popup_min_height: f32,
    max_visible_items: usize,

    /// Emitted when the committed index, at the index column, changes.
    pub current_index_changed: Signal<ModelIndex>,
    /// Emitted when the committed text changes.
    pub current_text_changed: Signal<String>,
    /// Emitted when a user closes the popup on a row, with the index at the
    /// index column. Programmatic commits don't emit it.
    pub activated: Signal<ModelIndex>,
    /// Emitted when the popup opens.
    pub popup_shown: Signal<()>,
    /// Emitted when the popup closes.
    pub popup_hidden: Signal<()>,
}

impl Default for TreeComboBox {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeComboBox {
    /// Creates a tree combo box with default settings and no model.
    pub fn new() -> Self {
        Self::with_config(&TreeComboConfig::default())
    }

    /// Creates a tree combo box from a configuration.
    pub fn with_config(config: &TreeComboConfig) -> Self {
        let mut view = TreeView::new();
        view.set_selection_behavior(SelectionBehavior::SelectRows);
        view.set_horizontal_scroll_bar_policy(ScrollBarPolicy::AsNeeded);
        view.set_auto_scroll(false);

        let refit_pending = Arc::new(AtomicBool::new(false));
        {
            let refit_pending = refit_pending.clone();
            view.expanded.connect(move |_| refit_pending.store(true, Ordering::Release));
        }

        let mut combo = Self {
            base: WidgetBase::new(),
            view,
            root_index: ModelIndex::invalid(),
            last_cursor: ModelIndex::invalid(),
            reported_index: ModelIndex::invalid(),
            refit_pending,
            current_text: String::new(),
            display_text: String::new(),
            display_icon: None,
            showing_column: 0,
            index_column: 0,
            showing_icon: false,
            skip_next_hide: false,
            popup_visible: false,
            popup_min_height: 0.0,
            max_visible_items: 0,
            current_index_changed: Signal::new(),
            current_text_changed: Signal::new(),
            activated: Signal::new(),
            popup_shown: Signal::new(),
            popup_hidden: Signal::new(),
        };
        combo.apply_config(config);
        combo.display_text = combo.current_text.clone();
        combo
    }

    /// Applies a configuration to an existing combo box.
    ///
    /// The placeholder only replaces an empty label.
    pub fn apply_config(&mut self, config: &TreeComboConfig) {
        self.base.resize(config.width, config.height);
        self.popup_min_height = config.popup_min_height;
        self.max_visible_items = config.max_visible_items.max(1);

        self.view
            .widget_base_mut()
            .set_minimum_size(Size::new(0.0, config.popup_min_height));
        self.view.set_row_height(config.row_height);
        self.view.set_indentation(config.indentation);
        self.view.set_header_hidden(config.header_hidden);

        self.set_showing_column(config.showing_column);
        self.set_index_column(config.index_column);
        self.set_showing_icon(config.showing_icon);

        if self.current_text.is_empty() && self.display_text.is_empty() {
            self.current_text = config.placeholder.clone();
            self.display_text = config.placeholder.clone();
        }
        self.base.update();
    }

    // =========================================================================
    // Model
    // =========================================================================

    /// Returns the model, if any.
    pub fn model(&self) -> Option<&Arc<dyn ItemModel>> {
        self.view.model()
    }

    /// Sets the model.
    ///
    /// Column 0 becomes the only visible column and the header stops
    /// stretching its last section. The index column, label and icon
    /// setting are kept. The root index is reset to the whole tree.
    pub fn set_model(&mut self, model: Arc<dyn ItemModel>) {
        self.view.set_model(Some(model));
        self.root_index = ModelIndex::invalid();
        self.last_cursor = ModelIndex::invalid();
        self.reported_index = ModelIndex::invalid();

        self.set_showing_column(0);
        self.view.header_mut().set_stretch_last_section(false);

        tracing::debug!(target: targets::POPUP, "model set");
        self.base.update();
    }

    /// Returns the popup tree view.
    pub fn view(&self) -> &TreeView {
        &self.view
    }

    /// Returns the popup tree view mutably.
    ///
    /// Expansions made through the guard refit the showing column of an
    /// open popup when the guard drops.
    pub fn view_mut(&mut self) -> PopupViewMut<'_> {
        PopupViewMut { combo: self }
    }

    /// `index` brought up to date with the model.
    fn resolve(&self, index: &ModelIndex) -> ModelIndex {
        match self.view.model() {
            Some(model) => model.resolve(index),
            None => ModelIndex::invalid(),
        }
    }

    // =========================================================================
    // Current index
    // =========================================================================

    /// Moves the popup cursor to `index` and runs the close sequence.
    ///
    /// The close sequence runs even when the popup was never opened, so the
    /// label is committed from `index` right away (unless a skip is armed).
    pub fn set_current_model_index(&mut self, index: ModelIndex) {
        self.view.set_current_index(index);
        self.hide_popup();
    }

    /// Returns the cursor's row at the index column.
    ///
    /// Invalid when nothing is picked or the index column is out of range.
    pub fn current_model_index(&self) -> ModelIndex {
        self.cursor_at_column(self.index_column)
    }

    fn cursor_at_column(&self, column: usize) -> ModelIndex {
        let cursor = self.view.current_index();
        match self.view.model() {
            Some(model) if cursor.is_valid() => model.sibling(&cursor, cursor.row(), column),
            _ => ModelIndex::invalid(),
        }
    }

    /// Parent of the cursor recorded by the last close.
    pub fn combo_root_index(&self) -> ModelIndex {
        self.resolve(&self.last_cursor).parent()
    }

    /// Row of the cursor recorded by the last close.
    pub fn current_row(&self) -> Option<usize> {
        let cursor = self.resolve(&self.last_cursor);
        cursor.is_valid().then(|| cursor.row())
    }

    /// Text committed by the last close.
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    // =========================================================================
    // Columns
    // =========================================================================

    pub fn index_column(&self) -> usize {
        self.index_column
    }

    /// Sets the column reported by [`current_model_index`](Self::current_model_index).
    pub fn set_index_column(&mut self, column: usize) {
        self.index_column = column;
    }

    pub fn showing_column(&self) -> usize {
        self.showing_column
    }

    /// Makes `column` the only visible popup column.
    pub fn set_showing_column(&mut self, column: usize) {
        self.showing_column = column;
        let count = self.view.header().section_count();
        for section in (0..count).rev() {
            if section != column {
                self.view.hide_column(section);
            } else {
                self.view.show_column(section);
            }
        }
    }

    /// Fits the showing column to its content.
    ///
    /// The last section stretches again only when the header is wider than
    /// the fitted column.
    pub fn fit_showing_column(&mut self) {
        let column = self.showing_column;
        self.view.sync_header_width();
        self.view.header_mut().set_stretch_last_section(false);
        self.view.resize_column_to_contents(column);

        let header = self.view.header();
        if header.width() > header.section_size(column) {
            self.view.header_mut().set_stretch_last_section(true);
        }
    }

    // =========================================================================
    // Label
    // =========================================================================

    pub fn showing_icon(&self) -> bool {
        self.showing_icon
    }

    /// Sets whether the label paints the display icon.
    pub fn set_showing_icon(&mut self, showing: bool) {
        if self.showing_icon != showing {
            self.showing_icon = showing;
            self.base.update();
        }
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Overwrites the label text.
    pub fn set_display_text(&mut self, text: impl Into<String>) {
        self.display_text = text.into();
        self.base.update();
    }

    pub fn display_icon(&self) -> Option<&Icon> {
        self.display_icon.as_ref()
    }

    /// Overwrites the label icon.
    pub fn set_display_icon(&mut self, icon: Option<Icon>) {
        self.display_icon = icon;
        self.base.update();
    }

    // =========================================================================
    // Root
    // =========================================================================

    pub fn root_model_index(&self) -> ModelIndex {
        self.resolve(&self.root_index)
    }

    /// Sets the node whose children the closed popup is rooted at.
    ///
    /// An open popup keeps showing the whole tree until it closes.
    pub fn set_root_model_index(&mut self, index: ModelIndex) {
        self.root_index = index.clone();
        if !self.popup_visible {
            self.view.set_root_index(index);
        }
    }

    // =========================================================================
    // Popup Control
    // =========================================================================

    /// Returns `true` while the popup is open.
    pub fn is_popup_visible(&self) -> bool {
        self.popup_visible
    }

    pub fn max_visible_items(&self) -> usize {
        self.max_visible_items
    }

    pub fn set_max_visible_items(&mut self, count: usize) {
        self.max_visible_items = count.max(1);
    }

    /// Opens the popup over the whole tree with the cursor revealed.
    ///
    /// Does nothing without a model or when the model has no rows.
    pub fn show_popup(&mut self) {
        let _span = tracing::debug_span!(span_names::POPUP).entered();

        let has_rows = self
            .view
            .model()
            .is_some_and(|model| model.row_count(&ModelIndex::invalid()) > 0);
        if !has_rows {
            tracing::debug!(target: targets::POPUP, "popup not shown: no rows");
            return;
        }

        self.view.set_root_index(ModelIndex::invalid());
        let cursor = self.view.current_index();
        self.view.expand_to_index(&cursor);

        let row_height = self.view.row_height();
        let popup_height = self
            .view
            .content_height()
            .min(self.max_visible_items as f32 * row_height)
            .max(self.popup_min_height);
        self.view.set_geometry(Rect::new(
            0.0,
            self.base.height(),
            self.base.width(),
            popup_height,
        ));
        self.view.scroll_to(&cursor);

        self.popup_visible = true;
        self.fit_showing_column();
        self.refit_pending.store(false, Ordering::Release);

        tracing::debug!(target: targets::POPUP, ?cursor, popup_height, "popup shown");
        self.popup_shown.emit(());
        self.base.update();
    }

    /// Runs the close sequence.
    ///
    /// The cursor's parent and row are always recorded. When a skip is
    /// armed the flag is cleared and nothing else changes; otherwise the
    /// popup closes and the cursor's cell at the showing column becomes the
    /// label. In both cases the view is re-rooted at the root index.
    pub fn hide_popup(&mut self) {
        self.finish_popup(false);
    }

    /// The close sequence; `by_user` closes may emit `activated`.
    fn finish_popup(&mut self, by_user: bool) {
        let _span = tracing::debug_span!(span_names::POPUP).entered();

        let cursor = self.view.current_index();
        self.last_cursor = cursor.clone();

        if self.skip_next_hide {
            self.skip_next_hide = false;
            tracing::debug!(target: targets::POPUP, "close skipped");
        } else {
            self.close_popup();
            self.commit(&cursor, by_user);
        }

        self.restore_view_root();
    }

    /// Closes the popup without committing.
    fn dismiss_popup(&mut self) {
        self.skip_next_hide = false;
        self.close_popup();
        self.restore_view_root();
        tracing::debug!(target: targets::POPUP, "popup dismissed");
    }

    fn restore_view_root(&mut self) {
        let root = self.resolve(&self.root_index);
        self.view.set_root_index(root);
        self.refit_pending.store(false, Ordering::Release);
    }

    /// Refits the showing column after expansions made in code.
    fn apply_pending_refit(&mut self) {
        if self.refit_pending.swap(false, Ordering::AcqRel) && self.popup_visible {
            tracing::trace!(target: targets::POPUP, "refit after expansion");
            self.fit_showing_column();
        }
    }

    fn close_popup(&mut self) {
        if self.popup_visible {
            self.popup_visible = false;
            self.popup_hidden.emit(());
            self.base.update();
        }
    }

    fn commit(&mut self, cursor: &ModelIndex, by_user: bool) {
        let cell = self.cursor_at_column(self.showing_column);
        let (text, icon) = match self.view.model() {
            Some(model) if cell.is_valid() => (
                model.display_text(&cell).unwrap_or_default(),
                model.decoration(&cell),
            ),
            _ => (String::new(), None),
        };

        tracing::debug!(target: targets::POPUP, ?cursor, text = %text, "committed");
        self.display_text = text.clone();
        self.display_icon = icon;
        if self.current_text != text {
            self.current_text = text.clone();
            self.current_text_changed.emit(text);
        }

        let reported = self.current_model_index();
        if reported != self.resolve(&self.reported_index) {
            self.reported_index = reported.clone();
            self.current_index_changed.emit(reported.clone());
        }
        if by_user && cursor.is_valid() {
            self.activated.emit(reported);
        }
        self.base.update();
    }

    /// Returns `true` if a skip is armed for the next close.
    pub fn is_skip_armed(&self) -> bool {
        self.skip_next_hide
    }

    // =========================================================================
    // Event Handlers
    // =========================================================================

    /// Handles input aimed at the open popup, in popup-local coordinates.
    ///
    /// The viewport observer runs first, then the tree view. A release in
    /// the viewport closes the popup when a skip is armed or the cursor is
    /// a pickable item; Enter commits and Escape dismisses.
    pub fn popup_event(&mut self, event: &mut WidgetEvent) -> bool {
        if !self.popup_visible {
            return false;
        }

        self.event_filter(event, EventTarget::PopupViewport);

        if let WidgetEvent::KeyPress(key) = event {
            match key.key {
                Key::Escape => {
                    self.dismiss_popup();
                    event.accept();
                    return true;
                }
                Key::Enter | Key::NumpadEnter => {
                    if self.cursor_is_pickable() {
                        self.finish_popup(true);
                    }
                    event.accept();
                    return true;
                }
                Key::F4 => {
                    self.finish_popup(true);
                    event.accept();
                    return true;
                }
                Key::ArrowUp if key.modifiers.alt => {
                    self.finish_popup(true);
                    event.accept();
                    return true;
                }
                _ => {}
            }
        }

        let action = self.view.handle_event(event);
        self.apply_pending_refit();

        if let WidgetEvent::MouseRelease(release) = event
            && release.button == MouseButton::Left
            && self.view.viewport_rect().contains(release.local_pos)
            && (self.skip_next_hide || self.cursor_is_pickable())
        {
            self.finish_popup(true);
            event.accept();
            return true;
        }

        action.is_some() || event.is_accepted()
    }

    fn cursor_is_pickable(&self) -> bool {
        let cursor = self.view.current_index();
        match self.view.model() {
            Some(model) if cursor.is_valid() => model.flags(&cursor).is_pickable(),
            _ => false,
        }
    }

    /// Arms the skip flag for presses outside the cell under the pointer.
    fn observe_viewport_press(&mut self, pos: Point) {
        let index = self.view.index_at(pos);
        if !self.view.visual_rect(&index).contains(pos) {
            tracing::debug!(target: targets::POPUP, ?pos, "press outside cell, skip armed");
            self.skip_next_hide = true;
        }
    }

    fn handle_mouse_press(&mut self, event: &MousePressEvent) -> bool {
        if event.button != MouseButton::Left {
            return false;
        }

        if self.base.rect().contains(event.local_pos) {
            if self.popup_visible {
                self.dismiss_popup();
            } else {
                self.show_popup();
            }
            return true;
        }

        if self.popup_visible {
            self.dismiss_popup();
            return true;
        }
        false
    }

    fn handle_key_press(&mut self, event: &KeyPressEvent) -> bool {
        match event.key {
            Key::Space | Key::F4 if !self.popup_visible => {
                self.show_popup();
                true
            }
            Key::ArrowDown if event.modifiers.alt && !self.popup_visible => {
                self.show_popup();
                true
            }
            Key::F4 => {
                self.finish_popup(true);
                true
            }
            Key::ArrowUp if event.modifiers.alt && self.popup_visible => {
                self.finish_popup(true);
                true
            }
            Key::Escape if self.popup_visible => {
                self.dismiss_popup();
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    fn style_option(&self) -> StyleOptionComboBox {
        StyleOptionComboBox {
            rect: self.base.rect(),
            enabled: self.base.is_enabled(),
            has_focus: self.base.has_focus(),
            popup_open: self.popup_visible,
            current_text: self.display_text.clone(),
            current_icon: if self.showing_icon {
                self.display_icon.clone()
            } else {
                None
            },
        }
    }
}

impl Widget for TreeComboBox {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::new(self.base.size()).with_minimum(Size::new(60.0, 24.0))
    }

    fn paint(&self, painter: &mut dyn Painter) {
        let option = self.style_option();
        painter.draw_combo_frame(&option);
        painter.draw_combo_label(&option);

        if self.popup_visible {
            self.view.paint(painter);
        }
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        let handled = match event {
            WidgetEvent::MousePress(e) => self.handle_mouse_press(e),
            WidgetEvent::KeyPress(e) => self.handle_key_press(e),
            WidgetEvent::MouseRelease(_) => false,
        };
        if handled {
            event.accept();
        }
        handled
    }

    fn event_filter(&mut self, event: &mut WidgetEvent, target: EventTarget) -> bool {
        if target == EventTarget::PopupViewport
            && let WidgetEvent::MousePress(press) = event
        {
            self.observe_viewport_press(press.local_pos);
        }
        false
    }
}

/// Mutable access to a combo box's popup view.
///
/// Returned by [`TreeComboBox::view_mut`]. When it drops, an open popup
/// refits its showing column if anything was expanded meanwhile.
pub struct PopupViewMut<'a> {
    combo: &'a mut TreeComboBox,
}

impl Deref for PopupViewMut<'_> {
    type Target = TreeView;

    fn deref(&self) -> &TreeView {
        &self.combo.view
    }
}

impl DerefMut for PopupViewMut<'_> {
    fn deref_mut(&mut self) -> &mut TreeView {
        &mut self.combo.view
    }
}

impl Drop for PopupViewMut<'_> {
    fn drop(&mut self) {
        self.combo.apply_pending_refit();
    }
}

static_assertions::assert_impl_all!(TreeComboBox: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemFlags, NodeId, StandardItem, TreeModel};
    use crate::widget::RecordingPainter;
    use parking_lot::Mutex;

    struct Fixture {
        model: Arc<TreeModel<StandardItem>>,
        docs: NodeId,
        notes: NodeId,
        music: NodeId,
    }

    /// Documents (docs-id)
    /// └── notes.txt (notes-id)
    /// Music (music-id)
    fn fixture() -> Fixture {
        let model = Arc::new(TreeModel::<StandardItem>::new().with_column_count(2));
        let docs = model.add_root(
            StandardItem::new("Documents")
                .with_column("docs-id")
                .with_icon(Icon::from_name("folder")),
        );
        let notes = model
            .add_child(
                docs,
                StandardItem::new("notes.txt")
                    .with_column("notes-id")
                    .with_icon(Icon::from_name("text")),
            )
            .expect("docs exists");
        let music = model.add_root(StandardItem::new("Music").with_column("music-id"));
        Fixture {
            model,
            docs,
            notes,
            music,
        }
    }

    fn combo_with(fixture: &Fixture) -> TreeComboBox {
        let mut combo = TreeComboBox::new();
        combo.set_model(fixture.model.clone());
        combo
    }

    #[test]
    fn test_construction_defaults() {
        let combo = TreeComboBox::new();
        assert_eq!(combo.size(), Size::new(250.0, 30.0));
        assert_eq!(combo.showing_column(), 0);
        assert_eq!(combo.index_column(), 0);
        assert!(!combo.showing_icon());
        assert_eq!(combo.display_text(), "");
        assert!(combo.view().is_header_hidden());
        assert!(!combo.view().auto_scroll());
        assert_eq!(combo.view().selection_behavior(), SelectionBehavior::SelectRows);
        assert_eq!(
            combo.view().widget_base().minimum_size(),
            Size::new(0.0, 150.0)
        );
        assert!(!combo.current_model_index().is_valid());
    }

    #[test]
    fn test_set_model_shows_only_first_column() {
        let f = fixture();
        let mut combo = TreeComboBox::new();
        combo.set_showing_column(1);
        combo.set_model(f.model.clone());

        assert_eq!(combo.showing_column(), 0);
        assert!(!combo.view().is_column_hidden(0));
        assert!(combo.view().is_column_hidden(1));
        assert!(!combo.view().header().stretch_last_section());
    }

    #[test]
    fn test_set_showing_column() {
        let f = fixture();
        let mut combo = combo_with(&f);

        combo.set_showing_column(1);
        assert!(combo.view().is_column_hidden(0));
        assert!(!combo.view().is_column_hidden(1));

        combo.set_showing_column(0);
        assert!(!combo.view().is_column_hidden(0));
        assert!(combo.view().is_column_hidden(1));
    }

    #[test]
    fn test_set_current_model_index_commits() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.set_index_column(1);

        combo.set_current_model_index(f.model.index_of(f.notes, 0));

        assert_eq!(combo.display_text(), "notes.txt");
        assert_eq!(combo.display_icon(), Some(&Icon::from_name("text")));
        assert_eq!(combo.current_text(), "notes.txt");
        assert_eq!(combo.current_model_index(), f.model.index_of(f.notes, 1));
        assert_eq!(combo.current_row(), Some(0));
        assert_eq!(combo.combo_root_index(), f.model.index_of(f.docs, 0));
        assert!(!combo.is_popup_visible());
    }

    #[test]
    fn test_commit_reads_showing_column() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.set_showing_column(1);

        combo.set_current_model_index(f.model.index_of(f.music, 0));
        assert_eq!(combo.display_text(), "music-id");
        assert_eq!(combo.display_icon(), None);
    }

    #[test]
    fn test_commit_signals() {
        let f = fixture();
        let mut combo = combo_with(&f);

        let texts = Arc::new(Mutex::new(Vec::new()));
        let t = texts.clone();
        combo.current_text_changed.connect(move |text| t.lock().push(text.clone()));

        let indices = Arc::new(Mutex::new(Vec::new()));
        let i = indices.clone();
        combo.current_index_changed.connect(move |index| i.lock().push(index.clone()));

        let activations = Arc::new(Mutex::new(0));
        let a = activations.clone();
        combo.activated.connect(move |_| *a.lock() += 1);

        let music = f.model.index_of(f.music, 0);
        combo.set_current_model_index(music.clone());
        combo.set_current_model_index(music.clone());

        assert_eq!(*texts.lock(), vec!["Music".to_string()]);
        assert_eq!(*indices.lock(), vec![music]);
        assert_eq!(*activations.lock(), 0);
    }

    #[test]
    fn test_activated_only_on_user_close() {
        let f = fixture();
        let mut combo = combo_with(&f);

        let activated = Arc::new(Mutex::new(Vec::new()));
        let a = activated.clone();
        combo.activated.connect(move |index| a.lock().push(index.clone()));

        combo.show_popup();
        combo.popup_event(&mut WidgetEvent::key(Key::ArrowDown));
        combo.hide_popup();
        assert!(activated.lock().is_empty());

        combo.show_popup();
        combo.popup_event(&mut WidgetEvent::key(Key::Enter));
        assert_eq!(*activated.lock(), vec![f.model.index_of(f.docs, 0)]);

        // Re-committing the same row by hand still counts.
        combo.event(&mut WidgetEvent::key(Key::F4));
        combo.event(&mut WidgetEvent::key(Key::F4));
        assert_eq!(activated.lock().len(), 2);
    }

    #[test]
    fn test_stored_indices_follow_model_changes() {
        let model = Arc::new(TreeModel::<StandardItem>::new().with_column_count(2));
        let a = model.add_root(StandardItem::new("a").with_column("a-id"));
        let b = model.add_root(StandardItem::new("b").with_column("b-id"));
        let leaf = model
            .add_child(b, StandardItem::new("leaf"))
            .expect("b exists");
        let mut combo = TreeComboBox::new();
        combo.set_model(model.clone());
        combo.set_index_column(1);

        let indices = Arc::new(Mutex::new(Vec::new()));
        let i = indices.clone();
        combo.current_index_changed.connect(move |index| i.lock().push(index.clone()));

        combo.set_current_model_index(model.index_of(b, 0));
        combo.set_root_model_index(model.index_of(b, 0));
        assert_eq!(combo.current_row(), Some(1));

        model.remove(a);
        model.add_root(StandardItem::new("c").with_column("c-id"));

        let picked = combo.current_model_index();
        assert_eq!(picked, model.index_of(b, 1));
        assert_eq!(model.display_text(&picked).as_deref(), Some("b-id"));
        assert_eq!(combo.current_row(), Some(0));
        assert!(!combo.combo_root_index().is_valid());
        assert_eq!(combo.root_model_index(), model.index_of(b, 0));
        assert_eq!(combo.view().visible_indices(), vec![model.index_of(leaf, 0)]);

        // Same item again: the label holds and no index change is reported.
        combo.hide_popup();
        assert_eq!(combo.display_text(), "b");
        assert_eq!(indices.lock().len(), 1);

        model.remove(b);
        assert!(!combo.current_model_index().is_valid());
        assert!(!combo.root_model_index().is_valid());
        assert_eq!(combo.current_row(), None);
        combo.hide_popup();
        assert_eq!(combo.display_text(), "");
    }

    #[test]
    fn test_expand_through_view_mut_refits() {
        let model = Arc::new(TreeModel::<StandardItem>::new());
        let root = model.add_root(StandardItem::new("r"));
        model.add_child(root, StandardItem::new("a-rather-long-child-name"));
        let mut combo = TreeComboBox::new();
        combo.set_model(model.clone());
        combo.show_popup();
        let before = combo.view().header().section_size(0);

        combo.view_mut().expand(&model.index_of(root, 0));

        assert!(combo.view().header().section_size(0) > before);
    }

    #[test]
    fn test_closed_popup_ignores_expansion() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.show_popup();
        combo.hide_popup();
        let before = combo.view().header().section_size(0);

        combo.view_mut().expand(&f.model.index_of(f.docs, 0));
        assert_eq!(combo.view().header().section_size(0), before);
    }

    #[test]
    fn test_invalid_cursor_commits_empty_label() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.set_current_model_index(f.model.index_of(f.docs, 0));
        combo.set_current_model_index(ModelIndex::invalid());

        assert_eq!(combo.display_text(), "");
        assert_eq!(combo.display_icon(), None);
        assert_eq!(combo.current_row(), None);
        assert!(!combo.current_model_index().is_valid());
    }

    #[test]
    fn test_show_popup_requires_rows() {
        let mut combo = TreeComboBox::new();
        combo.show_popup();
        assert!(!combo.is_popup_visible());

        let empty = Arc::new(TreeModel::<StandardItem>::new());
        combo.set_model(empty);
        combo.show_popup();
        assert!(!combo.is_popup_visible());
    }

    #[test]
    fn test_show_popup_reveals_cursor() {
        let f = fixture();
        let mut combo = combo_with(&f);
        let notes = f.model.index_of(f.notes, 0);
        combo.set_current_model_index(notes.clone());

        let shown = Arc::new(Mutex::new(0));
        let s = shown.clone();
        combo.popup_shown.connect(move |_| *s.lock() += 1);

        combo.show_popup();
        assert!(combo.is_popup_visible());
        assert_eq!(*shown.lock(), 1);
        assert!(combo.view().is_expanded(&f.model.index_of(f.docs, 0)));
        assert_eq!(combo.view().visible_row_count(), 3);
        assert_eq!(combo.view().geometry(), Rect::new(0.0, 30.0, 250.0, 150.0));
        assert!(combo.view().header().stretch_last_section());
    }

    #[test]
    fn test_row_release_commits() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.show_popup();

        // Second row ("Music") at depth 0: cell starts after the 16px indicator.
        let pos = (100.0, 36.0);
        assert!(combo.popup_event(&mut WidgetEvent::left_press(pos)));
        assert!(!combo.is_skip_armed());
        assert!(combo.popup_event(&mut WidgetEvent::left_release(pos)));

        assert!(!combo.is_popup_visible());
        assert_eq!(combo.display_text(), "Music");
    }

    #[test]
    fn test_indicator_press_keeps_popup_open() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.show_popup();

        // Expand indicator of "Documents".
        let pos = (8.0, 12.0);
        combo.popup_event(&mut WidgetEvent::left_press(pos));
        assert!(combo.is_skip_armed());
        assert!(combo.view().is_expanded(&f.model.index_of(f.docs, 0)));

        combo.popup_event(&mut WidgetEvent::left_release(pos));
        assert!(combo.is_popup_visible());
        assert!(!combo.is_skip_armed());
        assert_eq!(combo.display_text(), "");
    }

    #[test]
    fn test_escape_dismisses_without_commit() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.set_display_text("Keep");
        combo.show_popup();

        combo.popup_event(&mut WidgetEvent::key(Key::ArrowDown));
        assert!(combo.view().current_index().is_valid());

        assert!(combo.popup_event(&mut WidgetEvent::key(Key::Escape)));
        assert!(!combo.is_popup_visible());
        assert_eq!(combo.display_text(), "Keep");
    }

    #[test]
    fn test_enter_commits_cursor() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.show_popup();

        combo.popup_event(&mut WidgetEvent::key(Key::ArrowDown));
        combo.popup_event(&mut WidgetEvent::key(Key::Enter));
        assert!(!combo.is_popup_visible());
        assert_eq!(combo.display_text(), "Documents");
    }

    #[test]
    fn test_disabled_row_is_not_committed() {
        let model = Arc::new(TreeModel::<StandardItem>::new());
        model.add_root(StandardItem::new("Off").with_flags(ItemFlags::disabled()));
        let mut combo = TreeComboBox::new();
        combo.set_model(model);
        combo.show_popup();

        let pos = (100.0, 12.0);
        combo.popup_event(&mut WidgetEvent::left_press(pos));
        combo.popup_event(&mut WidgetEvent::left_release(pos));
        assert!(combo.is_popup_visible());
        assert_eq!(combo.display_text(), "");
    }

    #[test]
    fn test_control_input_opens_and_closes() {
        let f = fixture();
        let mut combo = combo_with(&f);

        assert!(combo.event(&mut WidgetEvent::left_press((10.0, 10.0))));
        assert!(combo.is_popup_visible());
        assert!(combo.event(&mut WidgetEvent::left_press((10.0, 10.0))));
        assert!(!combo.is_popup_visible());

        assert!(combo.event(&mut WidgetEvent::key(Key::Space)));
        assert!(combo.is_popup_visible());
        assert!(combo.event(&mut WidgetEvent::key(Key::Escape)));
        assert!(!combo.is_popup_visible());

        let mut alt_down = WidgetEvent::KeyPress(KeyPressEvent::new(
            Key::ArrowDown,
            crate::widget::KeyboardModifiers::ALT,
        ));
        assert!(combo.event(&mut alt_down));
        assert!(combo.is_popup_visible());
    }

    #[test]
    fn test_event_filter_never_consumes() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.show_popup();

        let mut press = WidgetEvent::left_press((10.0, 140.0));
        assert!(!combo.event_filter(&mut press, EventTarget::PopupViewport));
        assert!(combo.is_skip_armed());

        let mut combo = combo_with(&f);
        combo.show_popup();
        let mut press = WidgetEvent::left_press((10.0, 140.0));
        assert!(!combo.event_filter(&mut press, EventTarget::Control));
        assert!(!combo.is_skip_armed());
    }

    #[test]
    fn test_paint_label_icon_follows_showing_icon() {
        let f = fixture();
        let mut combo = combo_with(&f);
        combo.set_current_model_index(f.model.index_of(f.docs, 0));

        let mut painter = RecordingPainter::new();
        combo.paint(&mut painter);
        assert_eq!(painter.last_combo_label(), Some(("Documents", None)));

        combo.set_showing_icon(true);
        let mut painter = RecordingPainter::new();
        combo.paint(&mut painter);
        assert_eq!(
            painter.last_combo_label(),
            Some(("Documents", Some(&Icon::from_name("folder"))))
        );
    }

    #[test]
    fn test_root_model_index_restored_on_close() {
        let f = fixture();
        let mut combo = combo_with(&f);
        let docs = f.model.index_of(f.docs, 0);

        combo.set_root_model_index(docs.clone());
        assert_eq!(combo.view().root_index(), docs);

        combo.show_popup();
        assert!(!combo.view().root_index().is_valid());

        combo.popup_event(&mut WidgetEvent::key(Key::Escape));
        assert_eq!(combo.root_model_index(), docs);
        assert_eq!(combo.view().root_index(), docs);
    }

    #[test]
    fn test_apply_config() {
        let config = TreeComboConfig {
            showing_icon: true,
            width: 320.0,
            max_visible_items: 4,
            header_hidden: false,
            placeholder: "Choose".into(),
            ..Default::default()
        };
        let combo = TreeComboBox::with_config(&config);

        assert!(combo.showing_icon());
        assert_eq!(combo.size().width, 320.0);
        assert_eq!(combo.max_visible_items(), 4);
        assert!(!combo.view().is_header_hidden());
        assert_eq!(combo.display_text(), "Choose");
        assert_eq!(combo.current_text(), "Choose");
    }
}
