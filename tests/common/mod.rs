//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use studio_layout::widget::Orientation;
use studio_layout::{
    DockLayoutOptions, DockTree, LayoutNode, PanelDescriptor, PanelId, WorkspaceLayout,
};

/// Content used throughout the integration tests
pub type Content = &'static str;

pub type TestWorkspace = WorkspaceLayout<Content, DockTree>;

pub const WIDTH: f64 = 1000.0;
pub const HEIGHT: f64 = 800.0;

pub fn id(id: &str) -> PanelId {
    PanelId::new(id)
}

/// Panel marker with the id doubling as its title
pub fn panel(id: &str, content: Option<Content>) -> LayoutNode<Content> {
    LayoutNode::panel(PanelDescriptor::new(id, id).with_optional_content(content))
}

/// Workspace over a 1000x800 dock tree
pub fn workspace(options: DockLayoutOptions) -> TestWorkspace {
    WorkspaceLayout::with_size(WIDTH, HEIGHT, options)
}

/// `{ main: [a], left: [b] }`
pub fn main_and_left(a: Option<Content>, b: Option<Content>) -> Vec<LayoutNode<Content>> {
    vec![
        LayoutNode::main(vec![panel("a", a)]),
        LayoutNode::left(vec![panel("b", b)]),
    ]
}

pub fn width(ws: &TestWorkspace, panel: &str) -> f64 {
    ws.widget()
        .panel_rect(&id(panel))
        .map(|r| r.extent(Orientation::Horizontal))
        .unwrap_or(f64::NAN)
}

pub fn x(ws: &TestWorkspace, panel: &str) -> f64 {
    ws.widget()
        .panel_rect(&id(panel))
        .map(|r| r.x)
        .unwrap_or(f64::NAN)
}

pub fn is_live(ws: &TestWorkspace, panel: &str) -> bool {
    use studio_layout::DockWidget;
    ws.widget().has_panel(&id(panel))
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// Records callback invocations
#[derive(Debug, Clone, Default)]
pub struct Recorder<T> {
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn push(&self, value: T) {
        self.calls.borrow_mut().push(value);
    }

    pub fn calls(&self) -> Vec<T> {
        self.calls.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last(&self) -> Option<T> {
        self.calls.borrow().last().cloned()
    }
}

/// Options that record every user close
pub fn closing_options(closed: &Recorder<PanelId>) -> DockLayoutOptions {
    let closed = closed.clone();
    DockLayoutOptions::new().on_panel_closed(move |id| closed.push(id.clone()))
}
