//! Configuration for [`TreeComboBox`](crate::widget::widgets::TreeComboBox).
//!
//! A [`TreeComboConfig`] can be built in code or loaded from TOML. Missing
//! keys fall back to the widget's construction defaults.
//!
//! ```toml
//! showing_column = 1
//! index_column = 0
//! showing_icon = true
//! max_visible_items = 8
//! placeholder = "Choose a folder"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use tree_combo_core::logging::targets;

use crate::error::{Error, Result};

/// Tunable properties of a tree combo box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeComboConfig {
    /// The only column shown in the popup and read on commit.
    pub showing_column: usize,
    /// Column reported by `current_model_index`.
    pub index_column: usize,
    /// Paint the committed icon next to the label.
    pub showing_icon: bool,
    /// Width of the compact control.
    pub width: f32,
    /// Height of the compact control.
    pub height: f32,
    /// Minimum height of the popup tree.
    pub popup_min_height: f32,
    /// Rows shown before the popup starts scrolling.
    pub max_visible_items: usize,
    /// Height of one popup row.
    pub row_height: f32,
    /// Indentation per tree level.
    pub indentation: f32,
    /// Hide the popup tree's column header.
    pub header_hidden: bool,
    /// Label shown before anything is committed.
    pub placeholder: String,
}

impl Default for TreeComboConfig {
    fn default() -> Self {
        Self {
            showing_column: 0,
            index_column: 0,
            showing_icon: false,
            width: 250.0,
            height: 30.0,
            popup_min_height: 150.0,
            max_visible_items: 10,
            row_height: 24.0,
            indentation: 20.0,
            header_hidden: true,
            placeholder: String::new(),
        }
    }
}

impl TreeComboConfig {
    /// Parses a configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        tracing::debug!(target: targets::CONFIG, ?config, "configuration parsed");
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loading configuration");
        Self::from_toml_str(&source)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_construction() {
        let config = TreeComboConfig::default();
        assert_eq!(config.showing_column, 0);
        assert_eq!(config.index_column, 0);
        assert!(!config.showing_icon);
        assert_eq!((config.width, config.height), (250.0, 30.0));
        assert_eq!(config.popup_min_height, 150.0);
        assert!(config.header_hidden);
        assert!(config.placeholder.is_empty());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = TreeComboConfig::from_toml_str(
            r#"
            showing_column = 2
            showing_icon = true
            placeholder = "Pick one"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.showing_column, 2);
        assert!(config.showing_icon);
        assert_eq!(config.placeholder, "Pick one");
        assert_eq!(config.max_visible_items, 10);
        assert_eq!(config.row_height, 24.0);
    }

    #[test]
    fn test_invalid_document() {
        let err = TreeComboConfig::from_toml_str("showing_column = \"first\"")
            .expect_err("wrong type");
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TreeComboConfig {
            index_column: 1,
            placeholder: "Root".into(),
            ..Default::default()
        };
        let text = config.to_toml_string().expect("serializable");
        assert_eq!(TreeComboConfig::from_toml_str(&text).expect("parsable"), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TreeComboConfig::load("/definitely/not/here/combo.toml").expect_err("missing");
        assert!(matches!(err, Error::Io { .. }));
    }
}
