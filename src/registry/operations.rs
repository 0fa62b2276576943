//! Operations the rendering layer dispatches on behalf of user gestures.

use thiserror::Error;

use crate::dialog::DialogId;

/// A user-initiated action on one dialog
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogOperation {
    Move { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    Close,
    Minimize,
    Maximize,
    /// Clear both minimized and maximized, then raise
    Restore,
    ToggleMinimize,
    ToggleMaximize,
    Raise,
}

impl DialogOperation {
    pub fn name(&self) -> &'static str {
        match self {
            DialogOperation::Move { .. } => "move",
            DialogOperation::Resize { .. } => "resize",
            DialogOperation::Close => "close",
            DialogOperation::Minimize => "minimize",
            DialogOperation::Maximize => "maximize",
            DialogOperation::Restore => "restore",
            DialogOperation::ToggleMinimize => "toggle-minimize",
            DialogOperation::ToggleMaximize => "toggle-maximize",
            DialogOperation::Raise => "raise",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("Dialog {0} not found")]
    NotFound(DialogId),

    #[error("Dialog {id} does not permit {operation}")]
    NotPermitted {
        id: DialogId,
        operation: &'static str,
    },
}
