//! Painting abstractions.
//!
//! Widgets describe what to draw through the [`Painter`] trait using style
//! option structs; the host's backend decides how it looks. The
//! [`RecordingPainter`] keeps a list of [`PaintCommand`]s and is what tests
//! and headless hosts paint into.

use unicode_segmentation::UnicodeSegmentation;

use tree_combo_core::{Icon, Rect};

use crate::model::{ItemFlags, ModelIndex};

/// Simple fixed-advance text metrics.
///
/// Widths are measured per grapheme cluster so that combining sequences and
/// emoji count as a single glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Advance of one grapheme cluster.
    pub char_width: f32,
    /// Edge length of a decoration icon.
    pub icon_size: f32,
    /// Gap between icon and text.
    pub icon_spacing: f32,
    /// Horizontal padding on each side of an item.
    pub padding: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            icon_size: 16.0,
            icon_spacing: 4.0,
            padding: 4.0,
        }
    }
}

impl FontMetrics {
    /// Width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> f32 {
        text.graphemes(true).count() as f32 * self.char_width
    }

    /// Width needed to show an item with `text` and an optional icon.
    pub fn item_width(&self, text: &str, has_icon: bool) -> f32 {
        let icon = if has_icon {
            self.icon_size + self.icon_spacing
        } else {
            0.0
        };
        self.padding * 2.0 + icon + self.text_width(text)
    }
}

/// Style information for drawing a combo box's compact control.
#[derive(Debug, Clone, Default)]
pub struct StyleOptionComboBox {
    /// Bounds of the control.
    pub rect: Rect,
    pub enabled: bool,
    pub has_focus: bool,
    /// Whether the popup is currently shown (arrow drawn "pressed").
    pub popup_open: bool,
    /// Text of the label area.
    pub current_text: String,
    /// Icon of the label area; `None` draws text only.
    pub current_icon: Option<Icon>,
}

/// Visual state flags for an item being rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewItemState {
    /// The item is the view's current item.
    pub selected: bool,
    /// The item has keyboard focus.
    pub focused: bool,
    /// The item is enabled for interaction.
    pub enabled: bool,
    /// The item is expanded (tree items).
    pub expanded: bool,
    /// The item has children (tree items).
    pub has_children: bool,
}

/// Style information for rendering a view item.
#[derive(Debug, Clone, Default)]
pub struct StyleOptionViewItem {
    /// Cell rectangle, excluding the branch indentation.
    pub rect: Rect,
    /// The model index being rendered.
    pub index: ModelIndex,
    pub state: ViewItemState,
    /// Item flags from the model.
    pub flags: ItemFlags,
    pub text: Option<String>,
    pub icon: Option<Icon>,
}

/// Drawing backend used by widgets.
pub trait Painter {
    /// Draw the frame, background and drop-down arrow of a combo box.
    fn draw_combo_frame(&mut self, option: &StyleOptionComboBox);

    /// Draw the label (text and optional icon) inside a combo box.
    fn draw_combo_label(&mut self, option: &StyleOptionComboBox);

    /// Draw one cell of an item view.
    fn draw_view_item(&mut self, option: &StyleOptionViewItem);

    /// Draw the expand/collapse arrow of a tree row.
    fn draw_branch_indicator(&mut self, rect: Rect, expanded: bool);
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    ComboFrame {
        rect: Rect,
        popup_open: bool,
        enabled: bool,
    },
    ComboLabel {
        rect: Rect,
        text: String,
        icon: Option<Icon>,
    },
    ViewItem {
        rect: Rect,
        text: Option<String>,
        icon: Option<Icon>,
        selected: bool,
    },
    BranchIndicator {
        rect: Rect,
        expanded: bool,
    },
}

/// Painter that records every call.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    commands: Vec<PaintCommand>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands recorded so far.
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the painter empty.
    pub fn take(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// The last combo label drawn, as `(text, icon)`.
    pub fn last_combo_label(&self) -> Option<(&str, Option<&Icon>)> {
        self.commands.iter().rev().find_map(|command| match command {
            PaintCommand::ComboLabel { text, icon, .. } => Some((text.as_str(), icon.as_ref())),
            _ => None,
        })
    }

    /// Texts of all view items drawn, in paint order.
    pub fn item_texts(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::ViewItem { text, .. } => Some(text.clone().unwrap_or_default()),
                _ => None,
            })
            .collect()
    }
}

impl Painter for RecordingPainter {
    fn draw_combo_frame(&mut self, option: &StyleOptionComboBox) {
        self.commands.push(PaintCommand::ComboFrame {
            rect: option.rect,
            popup_open: option.popup_open,
            enabled: option.enabled,
        });
    }

    fn draw_combo_label(&mut self, option: &StyleOptionComboBox) {
        self.commands.push(PaintCommand::ComboLabel {
            rect: option.rect,
            text: option.current_text.clone(),
            icon: option.current_icon.clone(),
        });
    }

    fn draw_view_item(&mut self, option: &StyleOptionViewItem) {
        self.commands.push(PaintCommand::ViewItem {
            rect: option.rect,
            text: option.text.clone(),
            icon: option.icon.clone(),
            selected: option.state.selected,
        });
    }

    fn draw_branch_indicator(&mut self, rect: Rect, expanded: bool) {
        self.commands
            .push(PaintCommand::BranchIndicator { rect, expanded });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_counts_graphemes() {
        let metrics = FontMetrics::default();
        assert_eq!(metrics.text_width("abc"), 21.0);
        // "e" followed by a combining acute accent is one grapheme.
        assert_eq!(metrics.text_width("e\u{301}"), 7.0);
        assert_eq!(metrics.item_width("ab", true), 4.0 * 2.0 + 20.0 + 14.0);
    }

    #[test]
    fn test_recording_painter_label() {
        let mut painter = RecordingPainter::new();
        let option = StyleOptionComboBox {
            current_text: "Docs".into(),
            current_icon: Some(Icon::from_name("folder")),
            ..Default::default()
        };
        painter.draw_combo_frame(&option);
        painter.draw_combo_label(&option);

        let (text, icon) = painter.last_combo_label().expect("label painted");
        assert_eq!(text, "Docs");
        assert_eq!(icon, Some(&Icon::from_name("folder")));

        assert_eq!(painter.take().len(), 2);
        assert!(painter.commands().is_empty());
    }
}
