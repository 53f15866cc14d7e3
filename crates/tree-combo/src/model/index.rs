//! Addresses of cells in an item model.

use std::hash::{Hash, Hasher};

/// A cell's position: row and column under a parent, plus the model's own
/// id for the row's item.
///
/// The invalid index means "the hidden root" when passed as a parent and
/// "no item" everywhere else.
///
/// An index is a snapshot. Once rows move, its row number may point at a
/// different item; [`ItemModel::resolve`](super::ItemModel::resolve) turns
/// it back into a current one.
///
/// ```ignore
/// let home = model.index(0, 0, &ModelIndex::invalid());
/// let first_child = model.index(0, 0, &home);
/// let path_column = model.sibling(&home, home.row(), 1);
/// ```
#[derive(Clone)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    /// `None` for top-level items.
    parent: Option<Box<ModelIndex>>,
    internal_id: u64,
    valid: bool,
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ModelIndex {
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            internal_id: 0,
            valid: false,
        }
    }

    /// Builds a valid index. Models call this; `internal_id` lets them find
    /// the backing item without walking `parent`.
    #[inline]
    pub fn new(row: usize, column: usize, parent: ModelIndex, internal_id: u64) -> Self {
        Self {
            row,
            column,
            parent: parent.is_valid().then(|| Box::new(parent)),
            internal_id,
            valid: true,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Row under the parent; 0 when invalid.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column; 0 when invalid.
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn parent(&self) -> ModelIndex {
        match &self.parent {
            Some(parent) => (**parent).clone(),
            None => ModelIndex::invalid(),
        }
    }

    #[inline]
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    /// Number of valid ancestors. Top-level items are at depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent.as_deref();
        }
        depth
    }
}

impl std::fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            f.debug_struct("ModelIndex")
                .field("row", &self.row)
                .field("column", &self.column)
                .field("depth", &self.depth())
                .field("internal_id", &self.internal_id)
                .finish()
        } else {
            write!(f, "ModelIndex(invalid)")
        }
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_valid(), other.is_valid()) {
            (false, false) => true,
            // The internal id already identifies the parent chain.
            (true, true) => {
                self.row == other.row
                    && self.column == other.column
                    && self.internal_id == other.internal_id
            }
            _ => false,
        }
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.row.hash(state);
            self.column.hash(state);
            self.internal_id.hash(state);
        }
    }
}
