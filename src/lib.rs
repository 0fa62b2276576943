//! # Dialog Registry
//!
//! Window-manager state core for browser UIs: tracks floating dialogs, their
//! stacking order, visibility, and geometry, independent of how they are
//! rendered.
//!
//! ## Architecture
//!
//! - `config`: Registry configuration (viewport, dialog defaults, option fallback policy)
//! - `dialog`: Dialog records, creation options, geometry deltas, and identity
//! - `stack`: Back-to-front stacking queue
//! - `registry`: The dialog store, its derived views, operation dispatch, and change events
//! - `shared`: Lock-guarded shared registry with creation and taskbar handles
//!
//! ## Usage
//!
//! ```rust
//! use dialog_registry::{DialogOptions, DialogRegistry, MoveDelta};
//!
//! let mut registry = DialogRegistry::default();
//! let options = DialogOptions::new().with_title("Settings").with_size(640.0, 480.0);
//!
//! let id = registry.add_dialog("settings-view", &options, false).into_id();
//! registry.move_dialog(&id, MoveDelta::to(40.0, 40.0));
//!
//! // Opening the same dialog again only brings it to the front.
//! registry.add_dialog("settings-view", &options, false);
//! assert_eq!(registry.count(), 1);
//! ```

pub mod config;
pub mod dialog;
pub mod registry;
pub mod shared;
pub mod stack;

// Re-export main types for easy access
pub use config::{FallbackPolicy, RegistryConfig};
pub use dialog::{
    Dialog, DialogId, DialogOptions, DialogProperty, DialogState, MoveDelta, Position,
    PositionOptions, PropertyOptions, SizeDelta, StateOptions,
};
pub use registry::{AddOutcome, DialogError, DialogOperation, DialogRegistry, RegistryEvent};
pub use shared::{DialogHandle, SharedRegistry, SharedWriteGuard, TaskbarEntry, TaskbarView};

// Re-export common error types
pub use anyhow::{Context, Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
