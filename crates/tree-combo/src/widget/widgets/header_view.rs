//! HeaderView widget for the columns of a tree view.
//!
//! This module provides [`HeaderView`], the horizontal header owned by
//! [`TreeView`](super::TreeView). It tracks per-section sizes and visibility
//! and, optionally, stretches the last visible section to fill the header.
//!
//! # Example
//!
//! ```
//! use tree_combo::widget::widgets::HeaderView;
//!
//! let mut header = HeaderView::new();
//! header.set_section_count(3);
//! header.set_width(400.0);
//! header.hide_section(1);
//! header.set_stretch_last_section(true);
//!
//! // Section 2 absorbs the space section 1 gave up.
//! assert_eq!(header.effective_section_size(2), 300.0);
//! ```

use tree_combo_core::logging::targets;
use tree_combo_core::{Rect, Signal};

use crate::model::{ItemFlags, ModelIndex};
use crate::widget::{
    Painter, SizeHint, StyleOptionViewItem, ViewItemState, Widget, WidgetBase,
};

/// A horizontal header with resizable, hideable sections.
///
/// Sections are addressed by logical index (the model column). The header
/// does not support reordering, so visual and logical order coincide.
///
/// # Signals
///
/// - `section_resized(section, old_size, new_size)`
pub struct HeaderView {
    base: WidgetBase,

    section_sizes: Vec<f32>,
    section_hidden: Vec<bool>,
    section_labels: Vec<String>,
    default_section_size: f32,
    minimum_section_size: f32,
    stretch_last_section: bool,

    /// Emitted when a section is resized.
    /// Args: (section, old size, new size)
    pub section_resized: Signal<(usize, f32, f32)>,
}

impl Default for HeaderView {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderView {
    /// Height of the header strip when visible.
    pub const DEFAULT_HEIGHT: f32 = 24.0;

    /// Creates a header with no sections.
    pub fn new() -> Self {
        let mut base = WidgetBase::new();
        base.resize(0.0, Self::DEFAULT_HEIGHT);

        Self {
            base,
            section_sizes: Vec::new(),
            section_hidden: Vec::new(),
            section_labels: Vec::new(),
            default_section_size: 100.0,
            minimum_section_size: 20.0,
            stretch_last_section: false,
            section_resized: Signal::new(),
        }
    }

    // =========================================================================
    // Section Count
    // =========================================================================

    /// Returns the number of sections.
    pub fn section_count(&self) -> usize {
        self.section_sizes.len()
    }

    /// Sets the number of sections.
    ///
    /// New sections get the default size and are visible; existing sections
    /// keep their state.
    pub fn set_section_count(&mut self, count: usize) {
        if count == self.section_count() {
            return;
        }
        self.section_sizes.resize(count, self.default_section_size);
        self.section_hidden.resize(count, false);
        self.section_labels.resize(count, String::new());
        self.base.update();
    }

    /// Sets the label painted for each section.
    pub fn set_section_labels(&mut self, labels: Vec<String>) {
        self.section_labels = labels;
        self.section_labels
            .resize(self.section_count(), String::new());
        self.base.update();
    }

    // =========================================================================
    // Section Sizes
    // =========================================================================

    /// Returns the stored size of a section, ignoring stretching.
    pub fn section_size(&self, logical_index: usize) -> f32 {
        self.section_sizes
            .get(logical_index)
            .copied()
            .unwrap_or(0.0)
    }

    /// Resizes a section, clamping to the minimum section size.
    pub fn resize_section(&mut self, logical_index: usize, size: f32) {
        let Some(slot) = self.section_sizes.get_mut(logical_index) else {
            return;
        };

        let new_size = size.max(self.minimum_section_size);
        let old_size = *slot;
        if (new_size - old_size).abs() > f32::EPSILON {
            *slot = new_size;
            tracing::trace!(
                target: targets::VIEW,
                section = logical_index,
                old_size,
                new_size,
                "section resized"
            );
            self.section_resized
                .emit((logical_index, old_size, new_size));
            self.base.update();
        }
    }

    /// Returns the size a section actually occupies.
    ///
    /// Hidden sections occupy nothing. With stretching on, the last visible
    /// section grows to fill the header width.
    pub fn effective_section_size(&self, logical_index: usize) -> f32 {
        if logical_index >= self.section_count() || self.is_section_hidden(logical_index) {
            return 0.0;
        }

        let size = self.section_size(logical_index);
        if self.stretch_last_section && self.last_visible_section() == Some(logical_index) {
            let others: f32 = self
                .visible_sections()
                .filter(|&section| section != logical_index)
                .map(|section| self.section_size(section))
                .sum();
            return size.max(self.base.width() - others);
        }
        size
    }

    /// Returns the position of a section's start edge.
    pub fn section_position(&self, logical_index: usize) -> f32 {
        self.visible_sections()
            .take_while(|&section| section < logical_index)
            .map(|section| self.effective_section_size(section))
            .sum()
    }

    /// Returns the logical index of the visible section at `position`.
    pub fn section_at(&self, position: f32) -> Option<usize> {
        let mut start = 0.0;
        for section in self.visible_sections() {
            let end = start + self.effective_section_size(section);
            if position >= start && position < end {
                return Some(section);
            }
            start = end;
        }
        None
    }

    /// Returns the total size of all visible sections.
    pub fn total_size(&self) -> f32 {
        self.visible_sections()
            .map(|section| self.effective_section_size(section))
            .sum()
    }

    pub fn default_section_size(&self) -> f32 {
        self.default_section_size
    }

    /// Sets the default section size for new sections.
    pub fn set_default_section_size(&mut self, size: f32) {
        self.default_section_size = size.max(self.minimum_section_size);
    }

    pub fn minimum_section_size(&self) -> f32 {
        self.minimum_section_size
    }

    pub fn set_minimum_section_size(&mut self, size: f32) {
        self.minimum_section_size = size.max(1.0);
    }

    // =========================================================================
    // Section Visibility
    // =========================================================================

    /// Returns whether a section is hidden.
    ///
    /// Out-of-range sections report as visible, matching a header that
    /// simply doesn't know about them yet.
    pub fn is_section_hidden(&self, logical_index: usize) -> bool {
        self.section_hidden
            .get(logical_index)
            .copied()
            .unwrap_or(false)
    }

    /// Sets whether a section is hidden.
    pub fn set_section_hidden(&mut self, logical_index: usize, hidden: bool) {
        let Some(slot) = self.section_hidden.get_mut(logical_index) else {
            return;
        };
        if *slot != hidden {
            *slot = hidden;
            self.base.update();
        }
    }

    /// Shows a hidden section.
    pub fn show_section(&mut self, logical_index: usize) {
        self.set_section_hidden(logical_index, false);
    }

    /// Hides a section.
    pub fn hide_section(&mut self, logical_index: usize) {
        self.set_section_hidden(logical_index, true);
    }

    /// Returns the number of hidden sections.
    pub fn hidden_section_count(&self) -> usize {
        self.section_hidden.iter().filter(|&&h| h).count()
    }

    /// Iterates visible sections in order.
    pub fn visible_sections(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.section_count()).filter(|&section| !self.is_section_hidden(section))
    }

    /// First visible section, which carries the tree decoration.
    pub fn first_visible_section(&self) -> Option<usize> {
        self.visible_sections().next()
    }

    pub fn last_visible_section(&self) -> Option<usize> {
        self.visible_sections().last()
    }

    // =========================================================================
    // Stretching and width
    // =========================================================================

    /// Returns whether the last section stretches to fill remaining space.
    pub fn stretch_last_section(&self) -> bool {
        self.stretch_last_section
    }

    /// Sets whether the last section stretches to fill remaining space.
    pub fn set_stretch_last_section(&mut self, stretch: bool) {
        if self.stretch_last_section != stretch {
            self.stretch_last_section = stretch;
            self.base.update();
        }
    }

    /// Width of the header, equal to the owning view's viewport width.
    pub fn width(&self) -> f32 {
        self.base.width()
    }

    pub fn set_width(&mut self, width: f32) {
        let height = self.base.height();
        self.base.resize(width, height);
    }
}

impl Widget for HeaderView {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::from_dimensions(self.total_size(), Self::DEFAULT_HEIGHT)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        if !self.base.is_visible() {
            return;
        }

        for section in self.visible_sections() {
            let option = StyleOptionViewItem {
                rect: Rect::new(
                    self.section_position(section),
                    0.0,
                    self.effective_section_size(section),
                    self.base.height(),
                ),
                index: ModelIndex::invalid(),
                state: ViewItemState {
                    enabled: self.base.is_enabled(),
                    ..Default::default()
                },
                flags: ItemFlags::new(),
                text: self.section_labels.get(section).cloned(),
                icon: None,
            };
            painter.draw_view_item(&option);
        }
    }
}

static_assertions::assert_impl_all!(HeaderView: Send, Sync);
