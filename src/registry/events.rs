//! Change notifications emitted by the registry.

use std::sync::Arc;

use crate::dialog::{DialogId, Position};

/// Result of [`DialogRegistry::add_dialog`](super::DialogRegistry::add_dialog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new record was created on top of the stack
    Created(DialogId),
    /// A record with the resolved id already existed and was raised instead
    Raised(DialogId),
}

impl AddOutcome {
    pub fn id(&self) -> &str {
        match self {
            AddOutcome::Created(id) | AddOutcome::Raised(id) => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AddOutcome::Created(_))
    }

    pub fn into_id(self) -> DialogId {
        match self {
            AddOutcome::Created(id) | AddOutcome::Raised(id) => id,
        }
    }
}

/// Emitted after a mutation has been fully applied.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Created(DialogId),
    Raised(DialogId),
    Removed(DialogId),
    MinimizedChanged { id: DialogId, minimized: bool },
    MaximizedChanged { id: DialogId, maximized: bool },
    Moved { id: DialogId, position: Position },
    Resized { id: DialogId, width: f64, height: f64 },
    ViewportChanged { width: f64, height: f64 },
}

impl RegistryEvent {
    /// The dialog the event is about, if any.
    pub fn dialog_id(&self) -> Option<&str> {
        match self {
            RegistryEvent::Created(id)
            | RegistryEvent::Raised(id)
            | RegistryEvent::Removed(id)
            | RegistryEvent::MinimizedChanged { id, .. }
            | RegistryEvent::MaximizedChanged { id, .. }
            | RegistryEvent::Moved { id, .. }
            | RegistryEvent::Resized { id, .. } => Some(id.as_str()),
            RegistryEvent::ViewportChanged { .. } => None,
        }
    }
}

pub(crate) type EventListener = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;
