//! Dialog registry
//!
//! `DialogRegistry` owns every open dialog record and the stacking queue
//! that orders them. The two are updated together by every operation so that
//! the queue always holds exactly the ids of the live records, each once.
//!
//! Mutators never fail: operations on an unknown id are no-ops that return
//! `false`. Derived views (visible list, z-index map, render order) are
//! computed from the current records and queue on every read.
//!
//! ```
//! use dialog_registry::{DialogOptions, DialogRegistry};
//!
//! let mut registry = DialogRegistry::default();
//! let settings = registry.add_dialog("settings-view", &DialogOptions::new().with_title("Settings"), false);
//! let about = registry.add_dialog("about-view", &DialogOptions::new().with_title("About"), false);
//!
//! assert!(registry.is_on_top(about.id()));
//! registry.to_top(settings.id());
//! assert_eq!(registry.get_z_index(settings.id()), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::{RegistryConfig, ViewportConfig};
use crate::dialog::identity;
use crate::dialog::options::ResolveContext;
use crate::dialog::{Dialog, DialogId, DialogOptions, MoveDelta, SizeDelta};
use crate::stack::StackingQueue;

pub mod events;
pub mod operations;

pub use events::{AddOutcome, RegistryEvent};
pub use operations::{DialogError, DialogOperation};

use events::EventListener;

pub struct DialogRegistry<P> {
    config: RegistryConfig,

    /// Current viewport, used to center new dialogs
    viewport: ViewportConfig,

    /// Dialog records by id
    dialogs: HashMap<DialogId, Dialog<P>>,

    /// Stacking order (back to front)
    queue: StackingQueue,

    /// Sequence number for the next created dialog
    next_sequence: u64,

    listeners: Vec<EventListener>,

    /// Events held back while the registry sits behind a shared lock
    deferred: Option<Vec<RegistryEvent>>,
}

impl<P> Default for DialogRegistry<P> {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl<P> DialogRegistry<P> {
    /// Create a registry from a validated configuration
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config.clone()))
    }

    fn with_config(config: RegistryConfig) -> Self {
        Self {
            viewport: config.viewport,
            config,
            dialogs: HashMap::new(),
            queue: StackingQueue::new(),
            next_sequence: 0,
            listeners: Vec::new(),
            deferred: None,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn viewport(&self) -> ViewportConfig {
        self.viewport
    }

    /// Update the viewport used to center dialogs created from now on.
    ///
    /// Returns `false` and keeps the old viewport if the dimensions are not
    /// positive and finite.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> bool {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            warn!("Ignoring invalid viewport {}x{}", width, height);
            return false;
        }

        self.viewport = ViewportConfig { width, height };
        debug!("Viewport set to {}x{}", width, height);
        self.emit(RegistryEvent::ViewportChanged { width, height });
        true
    }

    // === Creation and removal ===

    /// Open a dialog, or raise it if an equivalent one is already open.
    ///
    /// The id comes from `options.id`, else from a hash of `options` (so the
    /// same options always resolve to the same dialog), else, when `force` is
    /// set, from a fresh random id. If a dialog with that id exists it keeps
    /// its state and is moved to the top; `payload` is dropped.
    pub fn add_dialog(&mut self, payload: P, options: &DialogOptions, force: bool) -> AddOutcome {
        let id = identity::resolve_id(options, force);

        if self.dialogs.contains_key(&id) {
            debug!("Dialog {} already open, raising", id);
            self.to_top(&id);
            return AddOutcome::Raised(id);
        }

        let ctx = ResolveContext {
            defaults: &self.config.defaults,
            viewport: self.viewport,
            policy: self.config.options.fallback,
        };
        let mut dialog = options.resolve(id.clone(), payload, ctx);
        dialog.sequence = self.next_sequence;
        self.next_sequence += 1;

        info!("Opened dialog {} ({:?})", id, dialog.title);
        self.dialogs.insert(id.clone(), dialog);
        self.queue.push(id.clone());

        self.emit(RegistryEvent::Created(id.clone()));
        AddOutcome::Created(id)
    }

    /// Close a dialog. Returns whether it existed.
    pub fn remove_dialog(&mut self, id: &str) -> bool {
        if self.dialogs.remove(id).is_none() {
            return false;
        }
        self.queue.remove(id);

        info!("Closed dialog {}", id);
        self.emit(RegistryEvent::Removed(id.to_string()));
        true
    }

    /// Close every dialog.
    pub fn clear(&mut self) {
        let ids: Vec<DialogId> = self.queue.iter().map(str::to_string).collect();
        self.dialogs.clear();
        self.queue.clear();

        for id in ids {
            self.emit(RegistryEvent::Removed(id));
        }
    }

    // === Lookup ===

    pub fn get_dialog(&self, id: &str) -> Option<&Dialog<P>> {
        self.dialogs.get(id)
    }

    /// Mutable access for the renderer, e.g. to retitle a dialog.
    ///
    /// The id is not writable outside the crate and the stacking position
    /// lives in the queue, so neither can be changed through this reference.
    ///
    /// ```compile_fail
    /// use dialog_registry::{DialogOptions, DialogRegistry};
    ///
    /// let mut registry = DialogRegistry::default();
    /// let id = registry.add_dialog((), &DialogOptions::new(), false).into_id();
    /// if let Some(dialog) = registry.get_dialog_mut(&id) {
    ///     dialog.id = "renamed".to_string();
    /// }
    /// ```
    pub fn get_dialog_mut(&mut self, id: &str) -> Option<&mut Dialog<P>> {
        self.dialogs.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// All dialogs in the order they were opened
    pub fn dialogs(&self) -> Vec<&Dialog<P>> {
        let mut dialogs: Vec<&Dialog<P>> = self.dialogs.values().collect();
        dialogs.sort_by_key(|dialog| dialog.sequence);
        dialogs
    }

    /// Dialogs that are not minimized, in the order they were opened
    pub fn visible_dialogs(&self) -> Vec<&Dialog<P>> {
        let mut dialogs = self.dialogs();
        dialogs.retain(|dialog| dialog.is_visible());
        dialogs
    }

    // === Stacking ===

    /// Move a dialog to the top of the stack.
    pub fn to_top(&mut self, id: &str) -> bool {
        if self.queue.is_top(id) {
            return true;
        }
        if !self.queue.raise_to_top(id) {
            return false;
        }

        debug!("Raised dialog {} to top", id);
        self.emit(RegistryEvent::Raised(id.to_string()));
        true
    }

    pub fn is_on_top(&self, id: &str) -> bool {
        self.queue.is_top(id)
    }

    /// Stack index of a dialog, 0 being the bottom. Unknown ids report 0.
    pub fn get_z_index(&self, id: &str) -> usize {
        self.queue.position(id).unwrap_or(0)
    }

    pub fn z_index_map(&self) -> HashMap<DialogId, usize> {
        self.queue
            .iter()
            .enumerate()
            .map(|(index, id)| (id.to_string(), index))
            .collect()
    }

    /// Ids from back to front
    pub fn stacking_order(&self) -> &[DialogId] {
        self.queue.as_slice()
    }

    /// Ids in drawing order: the stacking order with always-on-top dialogs
    /// lifted above all others. Relative order within each group is kept.
    pub fn render_order(&self) -> Vec<&str> {
        let (pinned, normal): (Vec<&str>, Vec<&str>) = self.queue.iter().partition(|id| {
            self.dialogs
                .get(*id)
                .map_or(false, |dialog| dialog.property.always_on_top)
        });

        normal.into_iter().chain(pinned).collect()
    }

    /// The topmost dialog
    pub fn active_dialog(&self) -> Option<&Dialog<P>> {
        self.queue.top().and_then(|id| self.dialogs.get(id))
    }

    // === State and geometry ===

    /// Set `state.minimized` to `value`, or flip it when `value` is `None`.
    pub fn toggle_minimize_dialog(&mut self, id: &str, value: Option<bool>) -> bool {
        let Some(dialog) = self.dialogs.get_mut(id) else {
            return false;
        };

        let minimized = value.unwrap_or(!dialog.state.minimized);
        let changed = dialog.state.minimized != minimized;
        dialog.state.minimized = minimized;

        if changed {
            debug!("Dialog {} minimized: {}", id, minimized);
            self.emit(RegistryEvent::MinimizedChanged {
                id: id.to_string(),
                minimized,
            });
        }
        true
    }

    /// Set `state.maximized` to `value`, or flip it when `value` is `None`.
    pub fn toggle_maximize_dialog(&mut self, id: &str, value: Option<bool>) -> bool {
        let Some(dialog) = self.dialogs.get_mut(id) else {
            return false;
        };

        let maximized = value.unwrap_or(!dialog.state.maximized);
        let changed = dialog.state.maximized != maximized;
        dialog.state.maximized = maximized;

        if changed {
            debug!("Dialog {} maximized: {}", id, maximized);
            self.emit(RegistryEvent::MaximizedChanged {
                id: id.to_string(),
                maximized,
            });
        }
        true
    }

    /// Overwrite position and size fields present in `delta`.
    ///
    /// Whether a zero field counts as present follows the configured
    /// fallback policy.
    pub fn move_dialog(&mut self, id: &str, delta: MoveDelta) -> bool {
        let policy = self.config.options.fallback;
        let Some(dialog) = self.dialogs.get_mut(id) else {
            return false;
        };

        let old_position = dialog.position;
        let old_size = dialog.size();

        if let Some(x) = policy.number(delta.x) {
            dialog.position.x = x;
        }
        if let Some(y) = policy.number(delta.y) {
            dialog.position.y = y;
        }
        if let Some(width) = policy.dimension(delta.width) {
            dialog.property.width = width;
        }
        if let Some(height) = policy.dimension(delta.height) {
            dialog.property.height = height;
        }

        let position = dialog.position;
        let (width, height) = dialog.size();

        if position != old_position {
            debug!("Moved dialog {} to ({}, {})", id, position.x, position.y);
            self.emit(RegistryEvent::Moved {
                id: id.to_string(),
                position,
            });
        }
        if (width, height) != old_size {
            debug!("Resized dialog {} to {}x{}", id, width, height);
            self.emit(RegistryEvent::Resized {
                id: id.to_string(),
                width,
                height,
            });
        }
        true
    }

    /// [`move_dialog`](Self::move_dialog) restricted to width and height.
    pub fn resize_dialog(&mut self, id: &str, size: SizeDelta) -> bool {
        self.move_dialog(id, size.into())
    }

    // === Operation dispatch ===

    /// Execute a user action, honouring the dialog's capability flags.
    ///
    /// Unlike the raw mutators this reports why nothing happened, and clamps
    /// resize requests to the dialog's size bounds.
    pub fn execute_operation(&mut self, id: &str, operation: DialogOperation) -> Result<(), DialogError> {
        debug!("Executing dialog operation: {:?} on dialog {}", operation, id);

        let dialog = self
            .dialogs
            .get(id)
            .ok_or_else(|| DialogError::NotFound(id.to_string()))?;
        let property = dialog.property.clone();
        let state = dialog.state;

        let permitted = match operation {
            DialogOperation::Move { .. } => property.movable,
            DialogOperation::Resize { .. } => property.resizable,
            DialogOperation::Close => property.closable,
            DialogOperation::Minimize => property.minimizable,
            DialogOperation::Maximize => property.maximizable,
            // Leaving a state is always allowed, entering it needs the capability.
            DialogOperation::ToggleMinimize => state.minimized || property.minimizable,
            DialogOperation::ToggleMaximize => state.maximized || property.maximizable,
            DialogOperation::Restore | DialogOperation::Raise => true,
        };
        if !permitted {
            return Err(DialogError::NotPermitted {
                id: id.to_string(),
                operation: operation.name(),
            });
        }

        match operation {
            DialogOperation::Move { x, y } => {
                self.move_dialog(id, MoveDelta::to(x, y));
            }
            DialogOperation::Resize { width, height } => {
                let (width, height) = property.clamp_size(width, height);
                self.resize_dialog(id, SizeDelta::new(width, height));
            }
            DialogOperation::Close => {
                self.remove_dialog(id);
            }
            DialogOperation::Minimize => {
                self.toggle_minimize_dialog(id, Some(true));
            }
            DialogOperation::Maximize => {
                self.toggle_maximize_dialog(id, Some(true));
            }
            DialogOperation::Restore => {
                self.toggle_minimize_dialog(id, Some(false));
                self.toggle_maximize_dialog(id, Some(false));
                self.to_top(id);
            }
            DialogOperation::ToggleMinimize => {
                self.toggle_minimize_dialog(id, None);
            }
            DialogOperation::ToggleMaximize => {
                self.toggle_maximize_dialog(id, None);
            }
            DialogOperation::Raise => {
                self.to_top(id);
            }
        }
        Ok(())
    }

    // === Observers ===

    /// Register a callback invoked after every applied change
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    fn emit(&mut self, event: RegistryEvent) {
        match &mut self.deferred {
            Some(pending) => pending.push(event),
            None => {
                for listener in &self.listeners {
                    listener(&event);
                }
            }
        }
    }

    /// Queue events instead of calling listeners during a mutation.
    pub(crate) fn defer_events(&mut self) {
        self.deferred.get_or_insert_with(Vec::new);
    }

    /// Take the queued events with the listeners that should receive them.
    pub(crate) fn take_deferred_events(&mut self) -> (Vec<RegistryEvent>, Vec<EventListener>) {
        let events = self.deferred.as_mut().map(std::mem::take).unwrap_or_default();
        if events.is_empty() {
            return (events, Vec::new());
        }
        (events, self.listeners.clone())
    }

    /// Check that the queue and the record set hold the same ids, each once,
    /// that every record is stored under its own id, and that the derived
    /// views agree with them.
    pub fn is_consistent(&self) -> bool {
        self.dialogs.iter().all(|(key, dialog)| *key == dialog.id)
            && self.queue.len() == self.dialogs.len()
            && self.queue.iter().all(|id| self.dialogs.contains_key(id))
            && self
                .queue
                .iter()
                .enumerate()
                .all(|(index, id)| self.queue.position(id) == Some(index))
    }
}
