//! Declarative front of the engine
//!
//! Callers describe the layout as region and panel markers on every render;
//! `WorkspaceLayout` collects them and hands the result to `DockLayout`.

use crate::collect::{collect, LayoutNode};
use crate::panel::PanelId;
use crate::tab::{TabAction, TabChrome};
use crate::widget::{DockTree, DockWidget};

use super::engine::{DockLayout, DockLayoutOptions, LayoutRef};

pub struct WorkspaceLayout<C, W: DockWidget = DockTree> {
    layout: DockLayout<C, W>,
}

impl<C: Clone> WorkspaceLayout<C, DockTree> {
    /// Workspace over an in-memory dock tree of the given size
    pub fn with_size(width: f64, height: f64, options: DockLayoutOptions) -> Self {
        Self::new(DockTree::new(width, height), options)
    }
}

impl<C: Clone, W: DockWidget> WorkspaceLayout<C, W> {
    pub fn new(widget: W, options: DockLayoutOptions) -> Self {
        Self {
            layout: DockLayout::new(widget, options),
        }
    }

    /// Render one frame of the layout tree
    pub fn render(&mut self, nodes: Vec<LayoutNode<C>>) {
        self.layout.update(collect(nodes));
    }

    /// Caller-owned JSON for controlled mode; takes effect on the next mount
    pub fn set_controlled_json(&mut self, json: Option<String>) {
        self.layout.set_controlled_json(json);
    }

    pub fn reset_layout(&mut self) {
        self.layout.reset_layout();
    }

    pub fn handle_tab_action(&mut self, action: TabAction) -> bool {
        self.layout.handle_tab_action(action)
    }

    pub fn tabs(&self) -> Vec<TabChrome> {
        self.layout.tabs()
    }

    pub fn content(&self, id: &PanelId) -> Option<C> {
        self.layout.content(id)
    }

    pub fn layout_ref(&self) -> LayoutRef {
        self.layout.layout_ref()
    }

    pub fn widget(&self) -> &W {
        self.layout.widget()
    }

    pub fn widget_mut(&mut self) -> &mut W {
        self.layout.widget_mut()
    }

    pub fn layout(&self) -> &DockLayout<C, W> {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut DockLayout<C, W> {
        &mut self.layout
    }
}
