//! Layout persistence tests
//!
//! Self-managed storage, controlled mode, and what happens when a stored
//! snapshot can't be trusted.

mod common;

use common::*;
use serde_json::Value;
use studio_layout::widget::{AddPanel, Orientation};
use studio_layout::{
    DockLayoutOptions, DockTree, DockWidget, FileStorage, KeyValueStorage, LayoutNode,
    MemoryStorage, PanelMeta,
};

const KEY: &str = "dockview-graph";

fn stored_options(storage: &MemoryStorage) -> DockLayoutOptions {
    DockLayoutOptions::new()
        .layout_id("graph")
        .storage(storage.clone())
}

fn stored_envelope(storage: &MemoryStorage) -> Value {
    let raw = storage.get(KEY).unwrap().expect("layout should be stored");
    serde_json::from_str(&raw).unwrap()
}

/// Widget JSON as written before snapshots carried an envelope
fn bare_snapshot(ids: &[&str]) -> String {
    let mut tree = DockTree::new(WIDTH, HEIGHT);
    for panel in ids {
        tree.add_panel(AddPanel::new(id(panel), PanelMeta::new(*panel, None)))
            .unwrap();
    }
    tree.to_json().unwrap().to_string()
}

// ========================================================================
// Self-managed storage
// ========================================================================

#[test]
fn test_layout_round_trips_through_storage() {
    let storage = MemoryStorage::new();

    let mut first = workspace(stored_options(&storage));
    first.render(main_and_left(Some("A"), Some("B")));
    first
        .widget_mut()
        .resize_panel(&id("b"), Orientation::Horizontal, 320.0);
    first.layout_mut().pump();

    let envelope = stored_envelope(&storage);
    assert_eq!(envelope["version"], 1);
    assert_eq!(envelope["shape"], "rails:main,left");

    let mut second = workspace(stored_options(&storage));
    second.render(main_and_left(Some("A"), Some("B")));
    assert!(approx(width(&second, "b"), 320.0));
    assert!(approx(width(&second, "a"), 680.0));
}

#[test]
fn test_reset_removes_stored_layout_then_saves_defaults() {
    let storage = MemoryStorage::new();
    let mut ws = workspace(stored_options(&storage));
    ws.render(main_and_left(Some("A"), Some("B")));
    ws.widget_mut()
        .resize_panel(&id("b"), Orientation::Horizontal, 320.0);
    ws.layout_mut().pump();

    ws.reset_layout();
    assert!(approx(width(&ws, "b"), 200.0));

    let mut reopened = workspace(stored_options(&storage));
    reopened.render(main_and_left(Some("A"), Some("B")));
    assert!(approx(width(&reopened, "b"), 200.0));
}

#[test]
fn test_storage_failure_does_not_break_rendering() {
    let storage = MemoryStorage::with_quota(8);
    let mut ws = workspace(stored_options(&storage));
    ws.render(main_and_left(Some("A"), Some("B")));

    assert!(is_live(&ws, "a"));
    assert!(is_live(&ws, "b"));
    assert!(storage.is_empty());
}

#[test]
fn test_corrupt_json_reseeds_defaults() {
    let mut storage = MemoryStorage::new();
    storage.set(KEY, "{\"root\": [oops").unwrap();

    let mut ws = workspace(stored_options(&storage));
    ws.render(main_and_left(Some("A"), Some("B")));

    assert!(approx(width(&ws, "b"), 200.0));
    assert_eq!(stored_envelope(&storage)["shape"], "rails:main,left");
}

#[test]
fn test_unrestorable_widget_json_reseeds_defaults() {
    let mut storage = MemoryStorage::new();
    storage
        .set(
            KEY,
            r#"{"version":1,"shape":"rails:main,left","layout":{"root":{"type":"group","id":1,"panels":[],"active":null}}}"#,
        )
        .unwrap();

    let mut ws = workspace(stored_options(&storage));
    ws.render(main_and_left(Some("A"), Some("B")));

    assert!(is_live(&ws, "a"));
    assert!(approx(width(&ws, "b"), 200.0));
}

#[test]
fn test_out_of_range_group_id_reseeds_defaults() {
    let mut storage = MemoryStorage::new();
    storage
        .set(
            KEY,
            r#"{"root":{"type":"group","id":18446744073709551615,"panels":[{"id":"a","title":"A"}]}}"#,
        )
        .unwrap();

    let mut ws = workspace(stored_options(&storage));
    ws.render(main_and_left(Some("A"), Some("B")));

    assert!(is_live(&ws, "a"));
    assert!(is_live(&ws, "b"));
    assert!(approx(width(&ws, "b"), 200.0));
    assert_eq!(stored_envelope(&storage)["shape"], "rails:main,left");
}

#[test]
fn test_legacy_snapshot_rejected_when_region_became_rail() {
    let mut storage = MemoryStorage::new();
    storage.set(KEY, &bare_snapshot(&["main", "left"])).unwrap();

    let mut ws = workspace(stored_options(&storage));
    ws.render(main_and_left(Some("A"), Some("B")));

    assert!(!is_live(&ws, "left"));
    assert!(!is_live(&ws, "main"));
    assert!(approx(width(&ws, "b"), 200.0));
    assert_eq!(stored_envelope(&storage)["shape"], "rails:main,left");
}

#[test]
fn test_legacy_snapshot_accepted_without_rails() {
    let mut storage = MemoryStorage::new();
    storage.set(KEY, &bare_snapshot(&["main"])).unwrap();

    let mut ws = workspace(stored_options(&storage));
    ws.render(vec![LayoutNode::main(vec![LayoutNode::content("editor")])]);

    assert!(is_live(&ws, "main"));
    assert_eq!(stored_envelope(&storage)["shape"], "single");
}

#[test]
fn test_snapshot_from_other_shape_is_discarded() {
    let storage = MemoryStorage::new();
    let mut legacy = workspace(stored_options(&storage));
    legacy.render(vec![
        LayoutNode::main(vec![LayoutNode::content("editor")]),
        LayoutNode::left(vec![LayoutNode::content("library")]),
    ]);
    assert_eq!(stored_envelope(&storage)["shape"], "single");

    let mut ws = workspace(stored_options(&storage));
    ws.render(vec![
        LayoutNode::main(vec![LayoutNode::content("editor")]),
        LayoutNode::left(vec![panel("files", Some("files"))]),
    ]);

    assert!(!is_live(&ws, "left"));
    assert!(is_live(&ws, "files"));
}

#[test]
fn test_restored_panels_without_descriptor_are_pruned() {
    let storage = MemoryStorage::new();
    let closed = Recorder::new();

    let mut first = workspace(stored_options(&storage));
    first.render(vec![LayoutNode::main(vec![
        panel("graph", Some("g")),
        panel("yarn", Some("y")),
    ])]);

    let recorder = closed.clone();
    let mut second = workspace(
        stored_options(&storage).on_panel_closed(move |id| recorder.push(id.clone())),
    );
    second.render(vec![LayoutNode::main(vec![panel("graph", Some("g"))])]);

    assert!(is_live(&second, "graph"));
    assert!(!is_live(&second, "yarn"));
    assert_eq!(closed.len(), 0);
}

#[test]
fn test_file_storage_persists_between_engines() {
    let dir = tempfile::tempdir().unwrap();
    let options = || {
        DockLayoutOptions::new()
            .layout_id("graph")
            .storage(FileStorage::new(dir.path()))
    };

    let mut first = workspace(options());
    first.render(main_and_left(Some("A"), Some("B")));
    first
        .widget_mut()
        .resize_panel(&id("b"), Orientation::Horizontal, 260.0);
    first.layout_mut().pump();
    assert!(dir.path().join("dockview-graph.json").exists());

    let mut second = workspace(options());
    second.render(main_and_left(Some("A"), Some("B")));
    assert!(approx(width(&second, "b"), 260.0));
}

#[test]
fn test_namespace_from_config() {
    let storage = MemoryStorage::new();
    let config = studio_layout::LayoutConfig {
        storage_namespace: "studio".to_string(),
        ..Default::default()
    };
    let mut ws = workspace(stored_options(&storage).config(config));
    ws.render(main_and_left(Some("A"), Some("B")));

    assert!(storage.contains_key("studio-graph"));
    assert!(!storage.contains_key(KEY));
}

// ========================================================================
// Controlled mode
// ========================================================================

#[test]
fn test_controlled_mode_reports_and_restores() {
    let changes: Recorder<String> = Recorder::new();
    let recorder = changes.clone();
    let mut first = workspace(DockLayoutOptions::new().controlled(
        None,
        move |json| recorder.push(json),
        || {},
    ));
    first.render(main_and_left(Some("A"), Some("B")));
    first
        .widget_mut()
        .resize_panel(&id("b"), Orientation::Horizontal, 280.0);
    first.layout_mut().pump();

    let json = changes.last().expect("layout change should be reported");

    let mut second = workspace(DockLayoutOptions::new().controlled(Some(json), |_| {}, || {}));
    second.render(main_and_left(Some("A"), Some("B")));
    assert!(approx(width(&second, "b"), 280.0));
}

#[test]
fn test_controlled_mode_ignores_layout_id_and_storage() {
    let storage = MemoryStorage::new();
    let mut ws = workspace(stored_options(&storage).controlled(None, |_| {}, || {}));
    ws.render(main_and_left(Some("A"), Some("B")));
    assert!(storage.is_empty());
}

#[test]
fn test_controlled_reset_calls_clear() {
    let clears: Recorder<()> = Recorder::new();
    let recorder = clears.clone();
    let mut ws = workspace(DockLayoutOptions::new().controlled(
        None,
        |_| {},
        move || recorder.push(()),
    ));
    ws.render(main_and_left(Some("A"), Some("B")));

    ws.reset_layout();

    assert_eq!(clears.len(), 1);
    assert!(is_live(&ws, "a"));
}

#[test]
fn test_controlled_json_is_read_on_remount() {
    let changes: Recorder<String> = Recorder::new();
    let recorder = changes.clone();
    let mut source = workspace(DockLayoutOptions::new().controlled(
        None,
        move |json| recorder.push(json),
        || {},
    ));
    source.render(main_and_left(Some("A"), Some("B")));
    source
        .widget_mut()
        .resize_panel(&id("b"), Orientation::Horizontal, 340.0);
    source.layout_mut().pump();
    let json = changes.last().unwrap();

    let mut ws = workspace(DockLayoutOptions::new().controlled(None, |_| {}, || {}));
    ws.render(main_and_left(Some("A"), Some("B")));
    assert!(approx(width(&ws, "b"), 200.0));

    // New caller JSON is picked up when the widget mounts again
    ws.set_controlled_json(Some(json));
    ws.widget_mut().remount();
    ws.layout_mut().pump();
    assert!(approx(width(&ws, "b"), 340.0));
}
