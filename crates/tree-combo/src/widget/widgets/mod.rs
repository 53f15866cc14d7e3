//! Standard widgets for tree-combo.
//!
//! - [`TreeComboBox`]: combo box whose drop-down is a tree
//! - [`TreeView`]: hierarchical item view used as the popup
//! - [`HeaderView`]: column header owned by a [`TreeView`]

mod header_view;
mod tree_combo_box;
mod tree_view;

pub use header_view::HeaderView;
pub use tree_combo_box::{PopupViewMut, TreeComboBox};
pub use tree_view::{ScrollBarPolicy, SelectionBehavior, TreeView, TreeViewAction};
