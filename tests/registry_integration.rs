//! Integration tests for the dialog registry
//!
//! These tests drive the registry the way its collaborators do: application
//! code opening dialogs through a creation handle, a renderer dispatching
//! pointer gestures, and a taskbar reading the visible list.

use anyhow::Result;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

use dialog_registry::{
    AddOutcome, DialogError, DialogOperation, DialogOptions, DialogRegistry, FallbackPolicy,
    MoveDelta, Position, PropertyOptions, RegistryConfig, RegistryEvent, SharedRegistry,
    SizeDelta,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two different dialogs, then the first one reopened with identical options
#[test]
fn test_reopening_raises_existing_dialog() {
    init_logging();
    let mut registry = DialogRegistry::default();

    let first_options = DialogOptions::new()
        .with_title("A")
        .with_property(PropertyOptions {
            width: Some(800.0),
            height: Some(500.0),
            ..PropertyOptions::default()
        });

    let first = registry.add_dialog("P1", &first_options, false);
    registry.add_dialog("P2", &DialogOptions::new().with_title("B"), false);
    registry.add_dialog("P1", &first_options.clone(), false);

    assert_eq!(registry.count(), 2);
    assert!(registry.is_on_top(first.id()));
    assert_eq!(registry.get_z_index(first.id()), 1);
}

/// Options arriving as JSON from a web frontend dedupe regardless of key order
#[test]
fn test_json_options_dedupe_across_key_order() -> Result<()> {
    init_logging();
    let mut registry = DialogRegistry::default();

    let a: DialogOptions =
        serde_json::from_str(r#"{"title":"Files","property":{"width":640,"resizable":false}}"#)?;
    let b: DialogOptions =
        serde_json::from_str(r#"{"property":{"resizable":false,"width":640},"title":"Files"}"#)?;

    let first = registry.add_dialog("files-1", &a, false);
    let second = registry.add_dialog("files-2", &b, false);

    assert!(first.is_created());
    assert_eq!(second, AddOutcome::Raised(first.id().to_string()));
    assert!(!registry.get_dialog(first.id()).map_or(true, |d| d.property.resizable));
    Ok(())
}

/// A renderer drags, resizes, minimizes and closes dialogs through dispatch
#[test]
fn test_renderer_gesture_flow() -> Result<()> {
    init_logging();
    let mut registry = DialogRegistry::default();

    let editor = registry
        .add_dialog("editor", &DialogOptions::new().with_title("Editor"), false)
        .into_id();
    let preview = registry
        .add_dialog("preview", &DialogOptions::new().with_title("Preview"), false)
        .into_id();

    // Titlebar click, then drag.
    registry.execute_operation(&editor, DialogOperation::Raise)?;
    registry.execute_operation(&editor, DialogOperation::Move { x: 24.0, y: 48.0 })?;
    registry.execute_operation(&editor, DialogOperation::Resize { width: 1024.0, height: 640.0 })?;

    let dialog = registry.get_dialog(&editor).expect("editor should be open");
    assert_eq!(dialog.position, Position { x: 24.0, y: 48.0 });
    assert_eq!(dialog.size(), (1024.0, 640.0));
    assert!(registry.is_on_top(&editor));

    registry.execute_operation(&preview, DialogOperation::Minimize)?;
    let visible: Vec<&str> = registry.visible_dialogs().iter().map(|d| d.id()).collect();
    assert_eq!(visible, vec![editor.as_str()]);

    registry.execute_operation(&preview, DialogOperation::Close)?;
    assert_eq!(
        registry.execute_operation(&preview, DialogOperation::Raise),
        Err(DialogError::NotFound(preview.clone()))
    );
    assert!(registry.is_consistent());
    Ok(())
}

/// Application code and taskbar share one registry through narrowed handles
#[test]
fn test_shared_handles() {
    init_logging();
    let shared: SharedRegistry<String> = SharedRegistry::default();
    let app = shared.dialog_handle();
    let taskbar = shared.taskbar();

    let mail = app.add_dialog("mail".to_string(), &DialogOptions::new().with_title("Mail"), false);
    let chat = app.add_dialog("chat".to_string(), &DialogOptions::new().with_title("Chat"), false);

    let titles: Vec<String> = taskbar.entries().into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Mail".to_string(), "Chat".to_string()]);
    assert!(taskbar.is_on_top(chat.id()));

    shared.write().to_top(mail.id());
    assert_eq!(taskbar.get_z_index(mail.id()), 1);

    assert!(app.remove_dialog(chat.id()));
    assert!(!app.remove_dialog(chat.id()));
    assert_eq!(taskbar.count(), 1);
}

/// Registry built from a TOML file uses its defaults and policy
#[test]
fn test_registry_from_config_file() -> Result<()> {
    init_logging();
    let dir = tempdir()?;
    let path = dir.path().join("dialogs.toml");
    fs::write(
        &path,
        r#"
[viewport]
width = 1200.0
height = 900.0

[defaults]
title = "Untitled"
width = 400.0
height = 300.0

[options]
fallback = "falsy"
"#,
    )?;

    let config = RegistryConfig::load(&path)?;
    assert_eq!(config.options.fallback, FallbackPolicy::Falsy);

    let mut registry = DialogRegistry::new(&config)?;
    let id = registry.add_dialog((), &DialogOptions::new(), false).into_id();

    let dialog = registry.get_dialog(&id).expect("dialog should be open");
    assert_eq!(dialog.title, "Untitled");
    assert_eq!(dialog.position, Position { x: 400.0, y: 300.0 });

    // Zero fields are ignored under the falsy policy.
    registry.resize_dialog(&id, SizeDelta { width: Some(0.0), height: Some(120.0) });
    assert_eq!(registry.get_dialog(&id).map(|d| d.size()), Some((400.0, 120.0)));
    Ok(())
}

/// Observers receive every applied change in order
#[test]
fn test_observer_receives_changes() {
    init_logging();
    let mut registry = DialogRegistry::default();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    registry.subscribe(move |event: &RegistryEvent| {
        sink.lock().unwrap().push(event.clone());
    });

    let id = registry
        .add_dialog(1u8, &DialogOptions::new().with_title("Clock"), true)
        .into_id();
    registry.move_dialog(
        &id,
        MoveDelta {
            x: Some(10.0),
            width: Some(200.0),
            ..MoveDelta::default()
        },
    );
    registry.toggle_maximize_dialog(&id, None);

    let events = log.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], RegistryEvent::Created(id.clone()));
    assert!(matches!(events[1], RegistryEvent::Moved { .. }));
    assert!(matches!(events[2], RegistryEvent::Resized { width, .. } if width == 200.0));
    assert_eq!(
        events[3],
        RegistryEvent::MaximizedChanged {
            id: id.clone(),
            maximized: true
        }
    );
}
