//! Hierarchical tree model implementation.
//!
//! `TreeModel` stores parent-child data behind a `RwLock` and exposes it
//! through [`ItemModel`]. Cell data comes either from the node type itself
//! (via [`TreeNodeData`]) or from an extractor closure.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tree_combo_core::Icon;
use tree_combo_core::logging::targets;

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals};

/// Identifier of a node inside a [`TreeModel`].
///
/// Node ids double as the `internal_id` of every index the model creates,
/// so they stay stable while sibling rows are inserted or removed.
pub type NodeId = u64;

static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Trait for tree node data that provides its own per-column display information.
///
/// Implement this trait for types that should be directly usable as tree nodes.
pub trait TreeNodeData: Send + Sync {
    /// Returns the display text for `column`.
    fn display(&self, column: usize) -> ItemData;

    /// Returns the icon for `column`.
    fn decoration(&self, _column: usize) -> ItemData {
        ItemData::None
    }

    /// Returns the tooltip for `column`.
    fn tooltip(&self, _column: usize) -> ItemData {
        ItemData::None
    }

    /// Returns data for any other role.
    fn data(&self, _column: usize, _role: ItemRole) -> ItemData {
        ItemData::None
    }

    /// Returns the flags for this node.
    fn flags(&self) -> ItemFlags {
        ItemFlags::new()
    }

    /// Dispatches a role query to the methods above.
    fn column_data(&self, column: usize, role: ItemRole) -> ItemData {
        match role {
            ItemRole::Display => self.display(column),
            ItemRole::Decoration => self.decoration(column),
            ItemRole::ToolTip => self.tooltip(column),
            _ => self.data(column, role),
        }
    }
}

impl TreeNodeData for String {
    fn display(&self, column: usize) -> ItemData {
        if column == 0 {
            ItemData::from(self.as_str())
        } else {
            ItemData::None
        }
    }
}

/// A ready-made tree node with one text (and optional icon) per column.
///
/// # Example
///
/// ```
/// use tree_combo::model::StandardItem;
/// use tree_combo_core::Icon;
///
/// let item = StandardItem::new("report.pdf")
///     .with_icon(Icon::from_name("application-pdf"))
///     .with_column("120 KiB");
/// assert_eq!(item.text(1), Some("120 KiB"));
/// ```
#[derive(Debug, Clone)]
pub struct StandardItem {
    texts: Vec<String>,
    icons: Vec<Option<Icon>>,
    tooltip: Option<String>,
    flags: ItemFlags,
}

impl StandardItem {
    /// Creates an item whose first column shows `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
            icons: Vec::new(),
            tooltip: None,
            flags: ItemFlags::new(),
        }
    }

    /// Appends the text of the next column.
    pub fn with_column(mut self, text: impl Into<String>) -> Self {
        self.texts.push(text.into());
        self
    }

    /// Sets the icon of the first column.
    pub fn with_icon(self, icon: Icon) -> Self {
        self.with_column_icon(0, icon)
    }

    /// Sets the icon of `column`.
    pub fn with_column_icon(mut self, column: usize, icon: Icon) -> Self {
        if self.icons.len() <= column {
            self.icons.resize(column + 1, None);
        }
        self.icons[column] = Some(icon);
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_flags(mut self, flags: ItemFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns the text of `column`, if that column has one.
    pub fn text(&self, column: usize) -> Option<&str> {
        self.texts.get(column).map(String::as_str)
    }

    /// Replaces the text of `column`, padding skipped columns with empty text.
    pub fn set_text(&mut self, column: usize, text: impl Into<String>) {
        if self.texts.len() <= column {
            self.texts.resize(column + 1, String::new());
        }
        self.texts[column] = text.into();
    }

    /// Returns the icon of `column`.
    pub fn icon(&self, column: usize) -> Option<&Icon> {
        self.icons.get(column).and_then(Option::as_ref)
    }
}

impl TreeNodeData for StandardItem {
    fn display(&self, column: usize) -> ItemData {
        ItemData::from(self.text(column))
    }

    fn decoration(&self, column: usize) -> ItemData {
        ItemData::from(self.icon(column).cloned())
    }

    fn tooltip(&self, _column: usize) -> ItemData {
        ItemData::from(self.tooltip.clone())
    }

    fn flags(&self) -> ItemFlags {
        self.flags
    }
}

struct TreeNode<T> {
    data: T,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Internal storage for tree nodes.
struct TreeStorage<T> {
    nodes: HashMap<NodeId, TreeNode<T>>,
    root_children: Vec<NodeId>,
}

impl<T> TreeStorage<T> {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root_children: Vec::new(),
        }
    }

    fn insert(&mut self, parent: Option<NodeId>, data: T) -> Option<NodeId> {
        let id = next_node_id();
        match parent {
            None => self.root_children.push(id),
            Some(parent_id) => self.nodes.get_mut(&parent_id)?.children.push(id),
        }
        self.nodes.insert(
            id,
            TreeNode {
                data,
                children: Vec::new(),
                parent,
            },
        );
        Some(id)
    }

    fn remove_node(&mut self, id: NodeId) -> Option<T> {
        let parent = self.nodes.get(&id)?.parent;
        match parent {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|&child| child != id);
                }
            }
            None => self.root_children.retain(|&child| child != id),
        }
        self.remove_subtree(id)
    }

    fn remove_subtree(&mut self, id: NodeId) -> Option<T> {
        let node = self.nodes.remove(&id)?;
        for child in node.children {
            self.remove_subtree(child);
        }
        Some(node.data)
    }

    fn children_of(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.root_children,
            Some(id) => self
                .nodes
                .get(&id)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[]),
        }
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn row_of(&self, id: NodeId) -> Option<usize> {
        self.children_of(self.parent_of(id))
            .iter()
            .position(|&child| child == id)
    }

    /// Builds the full index chain for `id`.
    fn index_for(&self, id: NodeId, column: usize) -> Option<ModelIndex> {
        if !self.nodes.contains_key(&id) {
            return None;
        }
        let row = self.row_of(id)?;
        let parent = match self.parent_of(id) {
            Some(parent_id) => self.index_for(parent_id, 0)?,
            None => ModelIndex::invalid(),
        };
        Some(ModelIndex::new(row, column, parent, id))
    }
}

/// Type alias for a tree data extractor function.
///
/// Called with the node, the requested column and the role.
pub type TreeDataExtractor<T> = Arc<dyn Fn(&T, usize, ItemRole) -> ItemData + Send + Sync>;

/// Type alias for a per-node flags function.
pub type TreeFlagsExtractor<T> = Arc<dyn Fn(&T) -> ItemFlags + Send + Sync>;

/// A hierarchical tree model for displaying parent-child data.
///
/// `TreeModel` stores data in a tree structure where each node can have
/// multiple children. It supports both trait-based and closure-based
/// approaches for data extraction.
///
/// # Example
///
/// ```
/// use tree_combo::model::{ItemModel, ModelIndex, StandardItem, TreeModel};
///
/// let model = TreeModel::<StandardItem>::new().with_column_count(2);
/// let docs = model.add_root(StandardItem::new("Documents").with_column("dir"));
/// model.add_child(docs, StandardItem::new("notes.txt").with_column("file"));
///
/// let docs_index = model.index(0, 0, &ModelIndex::invalid());
/// assert_eq!(model.row_count(&docs_index), 1);
/// ```
pub struct TreeModel<T> {
    storage: RwLock<TreeStorage<T>>,
    column_count: usize,
    extractor: TreeDataExtractor<T>,
    flags: TreeFlagsExtractor<T>,
    signals: ModelSignals,
}

impl<T: TreeNodeData + 'static> TreeModel<T> {
    /// Creates a new empty tree model backed by [`TreeNodeData`].
    pub fn new() -> Self {
        Self::build(
            Arc::new(|node: &T, column, role| node.column_data(column, role)),
            Arc::new(|node: &T| node.flags()),
        )
    }
}

impl<T: TreeNodeData + 'static> Default for TreeModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> TreeModel<T> {
    /// Creates a new tree model with a custom data extractor.
    ///
    /// Every node is selectable and enabled unless [`with_flags`](Self::with_flags)
    /// says otherwise.
    pub fn with_extractor<F>(extractor: F) -> Self
    where
        F: Fn(&T, usize, ItemRole) -> ItemData + Send + Sync + 'static,
    {
        Self::build(Arc::new(extractor), Arc::new(|_: &T| ItemFlags::new()))
    }

    fn build(extractor: TreeDataExtractor<T>, flags: TreeFlagsExtractor<T>) -> Self {
        Self {
            storage: RwLock::new(TreeStorage::new()),
            column_count: 1,
            extractor,
            flags,
            signals: ModelSignals::new(),
        }
    }

    /// Replaces the per-node flags function.
    pub fn with_flags<F>(mut self, flags: F) -> Self
    where
        F: Fn(&T) -> ItemFlags + Send + Sync + 'static,
    {
        self.flags = Arc::new(flags);
        self
    }

    /// Sets the number of columns.
    pub fn with_column_count(mut self, count: usize) -> Self {
        self.set_column_count(count);
        self
    }

    /// Sets the number of columns.
    pub fn set_column_count(&mut self, count: usize) {
        self.column_count = count;
    }

    /// Adds a root-level node and returns its ID.
    pub fn add_root(&self, data: T) -> NodeId {
        let row = self.storage.read().root_children.len();
        let mut id = 0;
        self.signals
            .emit_rows_inserted(ModelIndex::invalid(), row, row, || {
                // Inserting under the root cannot fail.
                id = self.storage.write().insert(None, data).unwrap_or_default();
            });
        tracing::trace!(target: targets::MODEL, id, row, "root node added");
        id
    }

    /// Adds a child node to the specified parent and returns its ID.
    ///
    /// Returns `None` if the parent doesn't exist.
    pub fn add_child(&self, parent_id: NodeId, data: T) -> Option<NodeId> {
        let (parent_index, row) = {
            let storage = self.storage.read();
            let parent_index = storage.index_for(parent_id, 0)?;
            (parent_index, storage.children_of(Some(parent_id)).len())
        };

        let mut id = None;
        self.signals.emit_rows_inserted(parent_index, row, row, || {
            id = self.storage.write().insert(Some(parent_id), data);
        });
        tracing::trace!(target: targets::MODEL, ?id, parent_id, row, "child node added");
        id
    }

    /// Removes a node and all its descendants.
    ///
    /// Returns the removed node's data, or `None` if the node doesn't exist.
    pub fn remove(&self, id: NodeId) -> Option<T> {
        let (parent_index, row) = {
            let storage = self.storage.read();
            let row = storage.row_of(id)?;
            let parent_index = match storage.parent_of(id) {
                Some(parent_id) => storage.index_for(parent_id, 0)?,
                None => ModelIndex::invalid(),
            };
            (parent_index, row)
        };

        let mut removed = None;
        self.signals.emit_rows_removed(parent_index, row, row, || {
            removed = self.storage.write().remove_node(id);
        });
        removed
    }

    /// Clears all nodes from the tree.
    pub fn clear(&self) {
        self.signals.emit_reset(|| {
            let mut storage = self.storage.write();
            storage.nodes.clear();
            storage.root_children.clear();
        });
    }

    /// Returns the number of root-level nodes.
    pub fn root_count(&self) -> usize {
        self.storage.read().root_children.len()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.read().root_children.is_empty()
    }

    /// Returns the index of a node at `column`, or an invalid index if the
    /// node doesn't exist.
    pub fn index_of(&self, id: NodeId, column: usize) -> ModelIndex {
        if column >= self.column_count {
            return ModelIndex::invalid();
        }
        self.storage
            .read()
            .index_for(id, column)
            .unwrap_or_else(ModelIndex::invalid)
    }

    /// Provides read access to a node's data.
    pub fn with_node<F, R>(&self, id: NodeId, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        let storage = self.storage.read();
        storage.nodes.get(&id).map(|node| f(&node.data))
    }

    /// Provides mutable access to a node's data.
    ///
    /// Emits `data_changed` across all columns of the node's row.
    pub fn modify_node<F, R>(&self, id: NodeId, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let (result, top_left) = {
            let mut storage = self.storage.write();
            let node = storage.nodes.get_mut(&id)?;
            let result = f(&mut node.data);
            (result, storage.index_for(id, 0)?)
        };
        let bottom_right = ModelIndex::new(
            top_left.row(),
            self.column_count.saturating_sub(1),
            top_left.parent(),
            id,
        );
        self.signals.data_changed.emit((
            top_left,
            bottom_right,
            vec![ItemRole::Display, ItemRole::Decoration],
        ));
        Some(result)
    }

    fn node_id(index: &ModelIndex) -> Option<NodeId> {
        index.is_valid().then(|| index.internal_id())
    }
}

impl<T: Send + Sync + 'static> ItemModel for TreeModel<T> {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        self.storage
            .read()
            .children_of(Self::node_id(parent))
            .len()
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        self.column_count
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        let Some(id) = Self::node_id(index) else {
            return ItemData::None;
        };
        if index.column() >= self.column_count {
            return ItemData::None;
        }

        let storage = self.storage.read();
        match storage.nodes.get(&id) {
            Some(node) => (self.extractor)(&node.data, index.column(), role),
            None => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= self.column_count {
            return ModelIndex::invalid();
        }

        let storage = self.storage.read();
        match storage.children_of(Self::node_id(parent)).get(row) {
            Some(&child_id) => ModelIndex::new(row, column, parent.clone(), child_id),
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        let Some(id) = Self::node_id(index) else {
            return ModelIndex::invalid();
        };

        let storage = self.storage.read();
        storage
            .parent_of(id)
            .and_then(|parent_id| storage.index_for(parent_id, 0))
            .unwrap_or_else(ModelIndex::invalid)
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        let Some(id) = Self::node_id(index) else {
            return ItemFlags::disabled();
        };

        let storage = self.storage.read();
        storage
            .nodes
            .get(&id)
            .map(|n| (self.flags)(&n.data))
            .unwrap_or_else(ItemFlags::disabled)
    }

    /// Follows the node the index was taken for, wherever it now sits.
    fn resolve(&self, index: &ModelIndex) -> ModelIndex {
        match Self::node_id(index) {
            Some(id) => self.index_of(id, index.column()),
            None => ModelIndex::invalid(),
        }
    }
}

static_assertions::assert_impl_all!(TreeModel<StandardItem>: Send, Sync);
