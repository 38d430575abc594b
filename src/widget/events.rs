//! Events emitted by a dock widget

use crate::panel::PanelId;

/// Something the dock widget did or observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockEvent {
    /// The widget is mounted and can accept panels
    Ready,
    /// Tree shape, sizes or active tabs changed
    LayoutChanged,
    /// A panel was closed, by the user or programmatically
    PanelRemoved(PanelId),
    /// The active panel changed (`None` when the layout is empty)
    ActivePanelChanged(Option<PanelId>),
}
