//! Model/View architecture for tree-combo.
//!
//! This module provides the foundational types for the Model/View pattern,
//! which separates data representation from display logic.
//!
//! # Core Types
//!
//! - `ModelIndex`: Identifies an item's position in a model
//! - `ItemRole`: Specifies what type of data to access
//! - `ItemData`: Type-erased container for item data
//! - `ItemModel`: The trait that models implement
//! - `ModelSignals`: Signals for change notifications
//!
//! # Model Implementations
//!
//! - `TreeModel`: Hierarchical tree structure with parent-child relationships,
//!   one or more columns per node
//! - `StandardItem`: Ready-made node type with per-column text and icons
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Model    │────>│   Signals   │────>│    View     │
//! │ (ItemModel) │     │             │     │ (TreeView)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                       │
//!       │         ┌─────────────┐               │
//!       └────────>│ ModelIndex  │<──────────────┘
//!                 │  ItemRole   │
//!                 │  ItemData   │
//!                 └─────────────┘
//! ```
//!
//! Views query models using `ModelIndex` and `ItemRole` to get `ItemData`.
//! Models emit signals when rows change. Views listen to rebuild their rows
//! and to re-resolve the indices they keep through [`ItemModel::resolve`].

mod index;
mod role;
mod traits;
mod tree_model;

pub use index::ModelIndex;
pub use role::{ItemData, ItemRole};
pub use traits::{ItemFlags, ItemModel, ModelSignals, Orientation};
pub use tree_model::{
    NodeId, StandardItem, TreeDataExtractor, TreeFlagsExtractor, TreeModel, TreeNodeData,
};
