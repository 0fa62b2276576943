//! Dialog records
//!
//! A dialog is one floating window tracked by the registry. This module
//! holds the record itself, the creation options it is built from, and the
//! geometry deltas the rendering layer sends while the user drags or resizes
//! a dialog.

use serde::{Deserialize, Serialize};

pub mod identity;
pub mod options;

pub use options::{DialogOptions, PositionOptions, PropertyOptions, StateOptions};

/// Stable identifier of a dialog
pub type DialogId = String;

/// Screen coordinates of a dialog's top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Visibility flags. Both may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogState {
    pub minimized: bool,
    pub maximized: bool,
}

/// Capabilities and geometry of a dialog
///
/// Bounds of `0.0` mean "unbounded".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogProperty {
    pub minimizable: bool,
    pub maximizable: bool,
    pub resizable: bool,
    pub closable: bool,
    pub movable: bool,
    pub always_on_top: bool,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for DialogProperty {
    fn default() -> Self {
        Self {
            minimizable: true,
            maximizable: true,
            resizable: true,
            closable: true,
            movable: true,
            always_on_top: false,
            min_width: 0.0,
            min_height: 0.0,
            max_width: 0.0,
            max_height: 0.0,
            width: 800.0,
            height: 500.0,
        }
    }
}

impl DialogProperty {
    /// Clamp a requested size to the configured bounds, ignoring unbounded (zero) limits.
    pub fn clamp_size(&self, width: f64, height: f64) -> (f64, f64) {
        (
            clamp_dimension(width, self.min_width, self.max_width),
            clamp_dimension(height, self.min_height, self.max_height),
        )
    }
}

fn clamp_dimension(value: f64, min: f64, max: f64) -> f64 {
    let mut value = value;
    if max > 0.0 {
        value = value.min(max);
    }
    if min > 0.0 {
        value = value.max(min);
    }
    value
}

/// One open dialog.
///
/// `P` is the caller's content handle; the registry stores it and never looks
/// inside.
#[derive(Debug, Clone, Serialize)]
pub struct Dialog<P> {
    /// Fixed at creation; read through [`Dialog::id`]
    pub(crate) id: DialogId,
    pub name: String,
    pub title: String,
    pub icon: String,
    pub position: Position,
    pub payload: P,
    pub state: DialogState,
    pub property: DialogProperty,
    /// Extra caller data passed through from the options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
    /// Creation counter, used to list dialogs in the order they were opened
    #[serde(skip)]
    pub(crate) sequence: u64,
}

impl<P> Dialog<P> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_visible(&self) -> bool {
        !self.state.minimized
    }

    /// Width and height as a pair
    pub fn size(&self) -> (f64, f64) {
        (self.property.width, self.property.height)
    }
}

/// Geometry update sent by the renderer during drag/resize gestures.
///
/// Every field is optional and applied independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl MoveDelta {
    pub fn to(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Size-only update, see [`MoveDelta`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl SizeDelta {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

impl From<SizeDelta> for MoveDelta {
    fn from(size: SizeDelta) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..Self::default()
        }
    }
}
