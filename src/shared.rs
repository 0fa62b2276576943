//! Shared access to a registry
//!
//! The registry's queue and record set are updated in separate steps, so
//! every mutation must run under exclusive access. `SharedRegistry` puts the
//! registry behind a `parking_lot::RwLock`; each handle method takes the lock
//! once for the whole operation.
//!
//! Change events raised under the write lock are queued and delivered once
//! the lock is released, so listeners may read the registry through any
//! handle.
//!
//! Consumers get narrowed handles instead of the full registry:
//! - [`DialogHandle`] for application code that opens and closes dialogs
//! - [`TaskbarView`] for the taskbar, which only reads

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;

use crate::dialog::{DialogId, DialogOptions};
use crate::registry::{AddOutcome, DialogRegistry, RegistryEvent};

pub struct SharedRegistry<P> {
    inner: Arc<RwLock<DialogRegistry<P>>>,
}

impl<P> Clone for SharedRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> SharedRegistry<P> {
    /// Wrap a registry. Its listeners are from now on called after the lock
    /// is released.
    pub fn new(mut registry: DialogRegistry<P>) -> Self {
        registry.defer_events();
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, DialogRegistry<P>> {
        self.inner.read()
    }

    /// Exclusive access. Events raised through the guard reach listeners
    /// when it is dropped.
    pub fn write(&self) -> SharedWriteGuard<'_, P> {
        lock_for_write(&self.inner)
    }

    /// Register a listener; see [`DialogRegistry::subscribe`].
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.inner.write().subscribe(listener);
    }

    /// Handle exposing only dialog creation and removal
    pub fn dialog_handle(&self) -> DialogHandle<P> {
        DialogHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Read-only view for the taskbar
    pub fn taskbar(&self) -> TaskbarView<P> {
        TaskbarView {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> Default for SharedRegistry<P> {
    fn default() -> Self {
        Self::new(DialogRegistry::default())
    }
}

fn lock_for_write<P>(inner: &RwLock<DialogRegistry<P>>) -> SharedWriteGuard<'_, P> {
    SharedWriteGuard {
        guard: inner.write(),
    }
}

/// Write guard that delivers queued change events after unlocking.
pub struct SharedWriteGuard<'a, P> {
    guard: RwLockWriteGuard<'a, DialogRegistry<P>>,
}

impl<P> Deref for SharedWriteGuard<'_, P> {
    type Target = DialogRegistry<P>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<P> DerefMut for SharedWriteGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<P> Drop for SharedWriteGuard<'_, P> {
    fn drop(&mut self) {
        let (events, listeners) = self.guard.take_deferred_events();
        if events.is_empty() {
            return;
        }

        RwLockWriteGuard::unlocked(&mut self.guard, || {
            for event in &events {
                for listener in &listeners {
                    listener(event);
                }
            }
        });
    }
}

/// Creation API for application code.
pub struct DialogHandle<P> {
    inner: Arc<RwLock<DialogRegistry<P>>>,
}

impl<P> Clone for DialogHandle<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> DialogHandle<P> {
    /// See [`DialogRegistry::add_dialog`].
    pub fn add_dialog(&self, payload: P, options: &DialogOptions, force: bool) -> AddOutcome {
        lock_for_write(&self.inner).add_dialog(payload, options, force)
    }

    /// See [`DialogRegistry::remove_dialog`].
    pub fn remove_dialog(&self, id: &str) -> bool {
        lock_for_write(&self.inner).remove_dialog(id)
    }
}

/// One taskbar button
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskbarEntry {
    pub id: DialogId,
    pub name: String,
    pub title: String,
    pub icon: String,
    pub z_index: usize,
    pub active: bool,
}

/// Read-only view for the taskbar.
pub struct TaskbarView<P> {
    inner: Arc<RwLock<DialogRegistry<P>>>,
}

impl<P> Clone for TaskbarView<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> TaskbarView<P> {
    /// Snapshot of the visible dialogs, in the order they were opened
    pub fn entries(&self) -> Vec<TaskbarEntry> {
        let registry = self.inner.read();
        registry
            .visible_dialogs()
            .into_iter()
            .map(|dialog| TaskbarEntry {
                id: dialog.id.clone(),
                name: dialog.name.clone(),
                title: dialog.title.clone(),
                icon: dialog.icon.clone(),
                z_index: registry.get_z_index(&dialog.id),
                active: registry.is_on_top(&dialog.id),
            })
            .collect()
    }

    pub fn get_z_index(&self, id: &str) -> usize {
        self.inner.read().get_z_index(id)
    }

    pub fn is_on_top(&self, id: &str) -> bool {
        self.inner.read().is_on_top(id)
    }

    pub fn count(&self) -> usize {
        self.inner.read().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_handles_share_one_registry() {
        let shared: SharedRegistry<&'static str> = SharedRegistry::default();
        let handle = shared.dialog_handle();
        let taskbar = shared.taskbar();

        let a = handle.add_dialog("A", &DialogOptions::new().with_title("A"), false);
        let b = handle.add_dialog("B", &DialogOptions::new().with_title("B"), false);

        assert_eq!(taskbar.count(), 2);
        assert!(taskbar.is_on_top(b.id()));
        assert_eq!(taskbar.get_z_index(a.id()), 0);

        assert!(handle.remove_dialog(a.id()));
        assert_eq!(shared.read().count(), 1);
    }

    #[test]
    fn test_taskbar_entries_skip_minimized() {
        let shared: SharedRegistry<()> = SharedRegistry::default();
        let handle = shared.dialog_handle();

        let a = handle.add_dialog((), &DialogOptions::new().with_title("A"), false);
        let b = handle.add_dialog((), &DialogOptions::new().with_title("B").with_icon("b.png"), false);
        shared.write().toggle_minimize_dialog(a.id(), Some(true));

        let entries = shared.taskbar().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, b.id());
        assert_eq!(entries[0].title, "B");
        assert_eq!(entries[0].icon, "b.png");
        assert_eq!(entries[0].z_index, 1);
        assert!(entries[0].active);
    }

    #[test]
    fn test_listener_can_read_taskbar() {
        let shared: SharedRegistry<&'static str> = SharedRegistry::default();
        let taskbar = shared.taskbar();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        shared.subscribe(move |event| {
            if let RegistryEvent::Created(_) = event {
                sink.lock().unwrap().push(taskbar.count());
            }
        });

        let handle = shared.dialog_handle();
        handle.add_dialog("A", &DialogOptions::new().with_title("A"), false);
        handle.add_dialog("B", &DialogOptions::new().with_title("B"), false);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_listener_runs_after_write_guard_unlocks() {
        let shared: SharedRegistry<()> = SharedRegistry::default();
        let reader = shared.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        shared.subscribe(move |event| {
            if let RegistryEvent::MinimizedChanged { id, .. } = event {
                // Another thread must be able to take the read lock.
                let reader = reader.clone();
                let id = id.clone();
                let visible = thread::spawn(move || {
                    let registry = reader.read();
                    let visible = registry.get_dialog(&id).map(|d| d.is_visible());
                    visible
                })
                .join()
                .unwrap();
                sink.lock().unwrap().push(visible);
            }
        });

        let id = shared
            .dialog_handle()
            .add_dialog((), &DialogOptions::new().with_title("A"), false)
            .into_id();
        shared.write().toggle_minimize_dialog(&id, Some(true));

        assert_eq!(*seen.lock().unwrap(), vec![Some(false)]);
    }

    #[test]
    fn test_listeners_added_before_sharing_are_kept() {
        let mut registry: DialogRegistry<()> = DialogRegistry::default();
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        registry.subscribe(move |_| *sink.lock().unwrap() += 1);

        let shared = SharedRegistry::new(registry);
        let id = shared
            .dialog_handle()
            .add_dialog((), &DialogOptions::new().with_title("A"), false)
            .into_id();
        shared.write().to_top(&id);
        assert!(shared.dialog_handle().remove_dialog(&id));

        // Created and Removed; raising the top dialog changes nothing.
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn test_concurrent_creation_keeps_registry_consistent() {
        let shared: SharedRegistry<usize> = SharedRegistry::default();
        let mut handles = vec![];

        for worker in 0..8 {
            let dialogs = shared.dialog_handle();
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    let options = DialogOptions::new().with_title(format!("{}-{}", worker, i % 10));
                    let outcome = dialogs.add_dialog(i, &options, i % 3 == 0);
                    if i % 4 == 0 {
                        dialogs.remove_dialog(outcome.id());
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let registry = shared.read();
        assert!(registry.is_consistent());
        assert_eq!(registry.z_index_map().len(), registry.count());
    }
}
