//! The contract between item models and the views that show them.

use tree_combo_core::{Icon, Signal};

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};

/// What a user may do with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    pub selectable: bool,
    pub enabled: bool,
    /// A leaf; views draw no branch indicator for it.
    pub never_has_children: bool,
}

impl ItemFlags {
    /// Selectable and enabled.
    pub fn new() -> Self {
        Self {
            selectable: true,
            enabled: true,
            ..Default::default()
        }
    }

    /// Neither selectable nor enabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_never_has_children(mut self, leaf: bool) -> Self {
        self.never_has_children = leaf;
        self
    }

    /// Whether clicking or pressing Enter on the item may commit it.
    pub fn is_pickable(&self) -> bool {
        self.enabled && self.selectable
    }
}

/// A hierarchical table the tree view and combo box read from.
///
/// Implementors supply the six required methods. The rest have defaults
/// written in terms of them.
///
/// ```
/// use tree_combo::model::{ItemData, ItemModel, ItemRole, ModelIndex, ModelSignals};
///
/// struct Fruits {
///     items: Vec<String>,
///     signals: ModelSignals,
/// }
///
/// impl ItemModel for Fruits {
///     fn row_count(&self, parent: &ModelIndex) -> usize {
///         if parent.is_valid() { 0 } else { self.items.len() }
///     }
///
///     fn column_count(&self, _parent: &ModelIndex) -> usize {
///         1
///     }
///
///     fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
///         match (index.is_valid(), role) {
///             (true, ItemRole::Display) => self
///                 .items
///                 .get(index.row())
///                 .map(|s| ItemData::from(s.as_str()))
///                 .unwrap_or_default(),
///             _ => ItemData::None,
///         }
///     }
///
///     fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
///         if parent.is_valid() || row >= self.items.len() || column > 0 {
///             ModelIndex::invalid()
///         } else {
///             ModelIndex::new(row, column, ModelIndex::invalid(), row as u64)
///         }
///     }
///
///     fn parent(&self, _index: &ModelIndex) -> ModelIndex {
///         ModelIndex::invalid()
///     }
///
///     fn signals(&self) -> &ModelSignals {
///         &self.signals
///     }
/// }
/// ```
pub trait ItemModel: Send + Sync {
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Columns of the children of `parent`.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// `ItemData::None` for invalid indices and unanswered roles.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// The cell at `row`, `column` under `parent`, or invalid when out of range.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// Invalid for top-level items.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    fn signals(&self) -> &ModelSignals;

    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::new()
    }

    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    fn header_data(&self, _section: usize, _orientation: Orientation, _role: ItemRole) -> ItemData {
        ItemData::None
    }

    /// Display text, with numbers formatted.
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        self.data(index, ItemRole::Display).to_display_string()
    }

    fn decoration(&self, index: &ModelIndex) -> Option<Icon> {
        self.data(index, ItemRole::Decoration).into_icon()
    }

    /// The cell at `row`, `column` beside `index`. Out-of-range positions
    /// yield an invalid index.
    fn sibling(&self, index: &ModelIndex, row: usize, column: usize) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        self.index(row, column, &index.parent())
    }

    /// Brings an index taken before rows moved up to date.
    ///
    /// The default re-checks the same position, so it only catches indices
    /// that fell out of range. Models whose `internal_id` names an item for
    /// its whole life override this to follow the item to its new row, and
    /// return an invalid index once it is gone.
    fn resolve(&self, index: &ModelIndex) -> ModelIndex {
        self.sibling(index, index.row(), index.column())
    }
}

/// Which header `header_data` is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Column titles.
    Horizontal,
    Vertical,
}

/// Change notifications a model sends its views.
///
/// Structural changes come in pairs: the `about_to` signal fires before the
/// model mutates, the other after. Views rebuild their layout and re-resolve
/// stored indices on the second one.
pub struct ModelSignals {
    /// `(parent, first, last)`, likewise for the other row signals.
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,

    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,

    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,

    pub rows_removed: Signal<(ModelIndex, usize, usize)>,

    /// `(top_left, bottom_right, roles)` for edits that keep rows in place.
    pub data_changed: Signal<(ModelIndex, ModelIndex, Vec<ItemRole>)>,

    /// Rows reordered without insertion or removal.
    pub layout_about_to_change: Signal<()>,
    pub layout_changed: Signal<()>,

    /// Every existing index is void afterwards.
    pub model_about_to_reset: Signal<()>,
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            data_changed: Signal::new(),
            layout_about_to_change: Signal::new(),
            layout_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    /// Runs `insert_fn` between the two insertion signals.
    pub fn emit_rows_inserted<F>(&self, parent: ModelIndex, first: usize, last: usize, insert_fn: F)
    where
        F: FnOnce(),
    {
        self.rows_about_to_be_inserted
            .emit((parent.clone(), first, last));
        insert_fn();
        self.rows_inserted.emit((parent, first, last));
    }

    /// Runs `remove_fn` between the two removal signals.
    pub fn emit_rows_removed<F>(&self, parent: ModelIndex, first: usize, last: usize, remove_fn: F)
    where
        F: FnOnce(),
    {
        self.rows_about_to_be_removed
            .emit((parent.clone(), first, last));
        remove_fn();
        self.rows_removed.emit((parent, first, last));
    }

    pub fn emit_reset<F>(&self, reset_fn: F)
    where
        F: FnOnce(),
    {
        self.model_about_to_reset.emit(());
        reset_fn();
        self.model_reset.emit(());
    }
}
