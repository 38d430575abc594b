//! Reconciliation tests
//!
//! Panels appear in whatever order their content arrives; these tests check
//! where late panels land.

mod common;

use common::*;
use studio_layout::{DockLayoutOptions, LayoutNode};

#[test]
fn test_side_panel_anchors_to_first_live_main_panel() {
    let mut ws = workspace(DockLayoutOptions::new());
    ws.render(vec![LayoutNode::main(vec![
        panel("graph", None),
        panel("yarn", Some("y")),
    ])]);
    assert!(is_live(&ws, "yarn"));

    ws.render(vec![
        LayoutNode::main(vec![panel("graph", None), panel("yarn", Some("y"))]),
        LayoutNode::right(vec![panel("props", Some("p"))]),
    ]);

    assert!(approx(x(&ws, "props"), 750.0));
    assert!(approx(width(&ws, "yarn"), 750.0));
}

#[test]
fn test_main_panels_join_first_live_main_panel() {
    let mut ws = workspace(DockLayoutOptions::new());
    ws.render(vec![
        LayoutNode::main(vec![panel("graph", Some("g")), panel("yarn", None)]),
        LayoutNode::left(vec![panel("files", Some("f"))]),
    ]);

    ws.render(vec![
        LayoutNode::main(vec![panel("graph", Some("g")), panel("yarn", Some("y"))]),
        LayoutNode::left(vec![panel("files", Some("f"))]),
    ]);

    let tree = ws.widget();
    assert_eq!(tree.group_of(&id("yarn")), tree.group_of(&id("graph")));
}

#[test]
fn test_falls_back_to_remembered_main_anchor() {
    let mut ws = workspace(DockLayoutOptions::new());
    ws.render(vec![
        LayoutNode::main(vec![panel("x", Some("x"))]),
        LayoutNode::right(vec![panel("r", Some("r"))]),
    ]);
    assert!(approx(width(&ws, "x"), 750.0));

    // `x` moves to the bottom rail but stays live; main is empty
    ws.render(vec![
        LayoutNode::left(vec![panel("l", Some("l"))]),
        LayoutNode::right(vec![panel("r", Some("r"))]),
        LayoutNode::bottom(vec![panel("x", Some("x"))]),
    ]);

    assert!(is_live(&ws, "x"));
    assert!(approx(x(&ws, "l"), 0.0));
    assert!(approx(x(&ws, "x"), width(&ws, "l")));
}

#[test]
fn test_falls_back_to_any_live_panel() {
    let mut ws = workspace(DockLayoutOptions::new());
    ws.render(vec![
        LayoutNode::main(vec![panel("m", Some("m"))]),
        LayoutNode::left(vec![panel("l", Some("l"))]),
    ]);

    // Main anchor goes away, then a right panel shows up
    ws.render(vec![
        LayoutNode::main(vec![panel("m", None)]),
        LayoutNode::left(vec![panel("l", Some("l"))]),
    ]);
    assert!(!is_live(&ws, "m"));
    assert!(approx(width(&ws, "l"), WIDTH));

    ws.render(vec![
        LayoutNode::main(vec![panel("m", None)]),
        LayoutNode::left(vec![panel("l", Some("l"))]),
        LayoutNode::right(vec![panel("r", Some("r"))]),
    ]);

    assert!(approx(width(&ws, "r"), 250.0));
    assert!(approx(x(&ws, "r"), 750.0));
}

#[test]
fn test_fallback_prefers_left_over_right() {
    let mut ws = workspace(DockLayoutOptions::new());
    ws.render(vec![
        LayoutNode::main(vec![panel("m", Some("m"))]),
        LayoutNode::left(vec![panel("l", Some("l"))]),
        LayoutNode::right(vec![panel("r", Some("r"))]),
    ]);

    ws.render(vec![
        LayoutNode::main(vec![panel("m", None)]),
        LayoutNode::left(vec![panel("l", Some("l"))]),
        LayoutNode::right(vec![panel("r", Some("r"))]),
    ]);
    assert!(!is_live(&ws, "m"));
    assert!(approx(width(&ws, "r"), 250.0));

    ws.render(vec![
        LayoutNode::main(vec![panel("m", None)]),
        LayoutNode::left(vec![panel("l", Some("l"))]),
        LayoutNode::right(vec![panel("r", Some("r"))]),
        LayoutNode::bottom(vec![panel("log", Some("log"))]),
    ]);

    // Split below `l`, leaving `r` untouched
    assert!(is_live(&ws, "log"));
    assert!(approx(x(&ws, "log"), x(&ws, "l")));
    assert!(approx(width(&ws, "log"), width(&ws, "l")));
    assert!(approx(width(&ws, "r"), 250.0));
}

#[test]
fn test_nothing_live_adds_without_position() {
    let mut ws = workspace(DockLayoutOptions::new());
    ws.render(vec![
        LayoutNode::main(vec![panel("m", None)]),
        LayoutNode::bottom(vec![panel("log", Some("log")), panel("chat", Some("chat"))]),
    ]);

    assert!(is_live(&ws, "log"));
    assert!(is_live(&ws, "chat"));
    assert!(approx(width(&ws, "log"), WIDTH));
    let tree = ws.widget();
    assert_eq!(tree.group_of(&id("log")), tree.group_of(&id("chat")));
}

#[test]
fn test_unchanged_presence_skips_reconcile() {
    let closed = Recorder::new();
    let mut ws = workspace(closing_options(&closed));
    ws.render(main_and_left(Some("A"), Some("B")));

    // A user close leaves the descriptors as they were
    ws.handle_tab_action(studio_layout::TabAction::Close(id("a")));
    ws.render(main_and_left(Some("A2"), Some("B2")));

    assert!(!is_live(&ws, "a"));
    assert_eq!(closed.len(), 1);

    // Any presence change reconciles again and brings it back
    let mut nodes = main_and_left(Some("A2"), Some("B2"));
    nodes.push(LayoutNode::bottom(vec![panel("log", Some("log"))]));
    ws.render(nodes);
    assert!(is_live(&ws, "a"));
    assert!(is_live(&ws, "log"));
}
