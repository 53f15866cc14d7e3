//! tree-combo - a combo box whose drop-down is a tree.
//!
//! [`TreeComboBox`](widget::widgets::TreeComboBox) presents a hierarchical
//! [`ItemModel`](model::ItemModel) in a popup [`TreeView`](widget::widgets::TreeView).
//! The compact control shows the picked row's text (and optionally its icon)
//! from one column, while the reported index can come from another.
//!
//! Widgets are headless. A host feeds them [`WidgetEvent`](widget::WidgetEvent)s
//! and renders what they paint through a [`Painter`](widget::Painter).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tree_combo::prelude::*;
//!
//! let model = Arc::new(TreeModel::<StandardItem>::new().with_column_count(2));
//! let music = model.add_root(StandardItem::new("Music").with_column("/home/me/Music"));
//! model.add_child(music, StandardItem::new("Jazz").with_column("/home/me/Music/Jazz"));
//!
//! let mut combo = TreeComboBox::new();
//! combo.set_model(model.clone());
//! combo.set_index_column(1);
//!
//! // Open the popup, move to the first row and commit it with Enter.
//! combo.show_popup();
//! combo.popup_event(&mut WidgetEvent::key(Key::ArrowDown));
//! combo.popup_event(&mut WidgetEvent::key(Key::Enter));
//!
//! assert_eq!(combo.display_text(), "Music");
//! let picked = combo.current_model_index();
//! assert_eq!(model.display_text(&picked).as_deref(), Some("/home/me/Music"));
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod prelude;
pub mod widget;

pub use error::{Error, Result};
pub use tree_combo_core;
