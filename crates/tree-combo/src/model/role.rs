//! What a view asks a model for, and what it gets back.
//!
//! A cell answers several questions: the text on its row, the icon in
//! front of that text, the tooltip. [`ItemRole`] names the question and
//! [`ItemData`] carries the answer.

use std::any::Any;
use std::sync::Arc;

use tree_combo_core::Icon;

/// The piece of a cell being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Row text. Also what the combo box shows once the item is committed.
    Display,
    /// Icon painted before the text.
    Decoration,
    ToolTip,
    /// Application-defined data the views never read.
    User(u32),
}

/// A model's answer for one role.
///
/// ```
/// use tree_combo::model::ItemData;
///
/// let data = ItemData::from("Downloads");
/// assert_eq!(data.as_string(), Some("Downloads"));
///
/// let data = ItemData::new(42u32);
/// assert_eq!(data.downcast::<u32>(), Some(&42));
/// ```
#[derive(Debug, Clone, Default)]
pub enum ItemData {
    /// The cell has nothing for this role.
    #[default]
    None,
    String(String),
    /// Numbers display as their decimal text.
    Int(i64),
    Icon(Icon),
    /// Anything else, shared on clone.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl ItemData {
    /// Wraps an arbitrary value as [`ItemData::Custom`].
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        ItemData::Custom(Arc::new(value))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ItemData::None)
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ItemData::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text for a row or label. Icons and custom data have none.
    pub fn to_display_string(&self) -> Option<String> {
        match self {
            ItemData::String(s) => Some(s.clone()),
            ItemData::Int(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ItemData::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_icon(&self) -> Option<&Icon> {
        match self {
            ItemData::Icon(i) => Some(i),
            _ => None,
        }
    }

    pub fn into_icon(self) -> Option<Icon> {
        match self {
            ItemData::Icon(i) => Some(i),
            _ => None,
        }
    }

    /// Borrows custom data as `T`, if that is what it holds.
    pub fn downcast<T: Any>(&self) -> Option<&T> {
        match self {
            ItemData::Custom(data) => data.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl From<String> for ItemData {
    fn from(s: String) -> Self {
        ItemData::String(s)
    }
}

impl From<&str> for ItemData {
    fn from(s: &str) -> Self {
        ItemData::String(s.to_string())
    }
}

impl From<i64> for ItemData {
    fn from(n: i64) -> Self {
        ItemData::Int(n)
    }
}

impl From<i32> for ItemData {
    fn from(n: i32) -> Self {
        ItemData::Int(n as i64)
    }
}

impl From<Icon> for ItemData {
    fn from(i: Icon) -> Self {
        ItemData::Icon(i)
    }
}

impl<T: Into<ItemData>> From<Option<T>> for ItemData {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string_covers_text_and_numbers() {
        let data = ItemData::from("notes.txt");
        assert_eq!(data.as_string(), Some("notes.txt"));
        assert!(data.as_int().is_none());
        assert_eq!(ItemData::from(7).to_display_string().as_deref(), Some("7"));
        assert_eq!(
            ItemData::from(Icon::from_name("folder")).to_display_string(),
            None
        );
    }

    #[test]
    fn test_missing_icon_is_none() {
        let data = ItemData::from(Icon::from_name("folder"));
        assert_eq!(data.as_icon(), Some(&Icon::from_name("folder")));
        assert!(ItemData::from(None::<Icon>).is_none());
    }

    #[test]
    fn test_custom_data_survives_clone() {
        #[derive(Debug, PartialEq)]
        struct Payload(u32);

        let data = ItemData::new(Payload(42));
        let copy = data.clone();
        assert_eq!(copy.downcast::<Payload>(), Some(&Payload(42)));
        assert!(data.downcast::<u32>().is_none());
    }
}
