//! Logging facilities for tree-combo.
//!
//! tree-combo uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("tree_combo::popup=debug")
//!     .init();
//! ```

/// Span names used throughout tree-combo for tracing.
pub mod span_names {
    /// Popup open/close handling.
    pub const POPUP: &str = "tree_combo::popup";
    /// Tree view layout pass.
    pub const LAYOUT: &str = "tree_combo::layout";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "tree_combo_core::signal";
    /// Item model target.
    pub const MODEL: &str = "tree_combo::model";
    /// Tree and header view target.
    pub const VIEW: &str = "tree_combo::view";
    /// Popup lifecycle of the tree combo box.
    pub const POPUP: &str = "tree_combo::popup";
    /// Configuration loading.
    pub const CONFIG: &str = "tree_combo::config";
}
