//! Icon handles.
//!
//! An [`Icon`] is a cheap, clonable reference to image data that a painter
//! knows how to resolve. The widgets in this workspace never decode images
//! themselves; they only carry icons from the model to the painter.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where an icon's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconSource {
    /// A name looked up in the host's icon theme (e.g. `"folder"`).
    Named(String),
    /// A path to load the image from lazily.
    Path(PathBuf),
    /// Encoded image bytes (PNG, SVG, ...) embedded in the application.
    Data(Arc<[u8]>),
}

/// An icon that can be attached to model items and painted by widgets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Icon {
    source: IconSource,
}

impl Icon {
    /// Create an icon from a theme name.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            source: IconSource::Named(name.into()),
        }
    }

    /// Create an icon backed by an image file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: IconSource::Path(path.into()),
        }
    }

    /// Create an icon from encoded image bytes.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            source: IconSource::Data(bytes.into()),
        }
    }

    /// The icon's source.
    pub fn source(&self) -> &IconSource {
        &self.source
    }

    /// The theme name, if this is a named icon.
    pub fn name(&self) -> Option<&str> {
        match &self.source {
            IconSource::Named(name) => Some(name),
            _ => None,
        }
    }

    /// The file path, if this icon is file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            IconSource::Path(path) => Some(path),
            _ => None,
        }
    }
}
