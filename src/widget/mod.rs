//! Dock widget boundary
//!
//! The dock widget is an external, stateful service: the engine tells it to
//! add and remove panels and learns about everything else (readiness, user
//! rearrangement, user closes) from the events it emits. The engine never
//! assumes an operation was applied until the widget reports it.
//!
//! `DockTree` is a complete in-memory implementation used by default and by
//! the test suite.

mod events;
mod snapshot;
mod tree;

pub use events::DockEvent;
pub use snapshot::{ChildSnapshot, DockTreeSnapshot, NodeSnapshot, PanelSnapshot};
pub use tree::{DockTree, GroupId, Orientation, Rect};

use serde_json::Value;

use crate::panel::{PanelId, PanelMeta};

/// Where a new panel goes relative to its reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Above,
    Below,
    /// As a tab in the reference panel's group
    Within,
}

impl Direction {
    /// Split orientation and whether the new panel comes first
    pub fn split(&self) -> Option<(Orientation, bool)> {
        match self {
            Direction::Left => Some((Orientation::Horizontal, true)),
            Direction::Right => Some((Orientation::Horizontal, false)),
            Direction::Above => Some((Orientation::Vertical, true)),
            Direction::Below => Some((Orientation::Vertical, false)),
            Direction::Within => None,
        }
    }
}

/// A size either in pixels or as a percentage of the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Px(f64),
    Percent(f64),
}

impl Measure {
    /// Resolve against a container extent, `None` when it can't be
    pub fn to_px(&self, container: f64) -> Option<f64> {
        match *self {
            Measure::Px(px) => Some(px),
            Measure::Percent(percent) if container.is_finite() && container > 0.0 => {
                Some(container * percent / 100.0)
            }
            Measure::Percent(_) => None,
        }
    }
}

/// Reference panel and direction for an add
#[derive(Debug, Clone, PartialEq)]
pub struct PanelPosition {
    pub reference: PanelId,
    pub direction: Direction,
}

impl PanelPosition {
    pub fn new(reference: PanelId, direction: Direction) -> Self {
        Self {
            reference,
            direction,
        }
    }

    pub fn within(reference: PanelId) -> Self {
        Self::new(reference, Direction::Within)
    }
}

/// Parameters for adding a live panel
#[derive(Debug, Clone, PartialEq)]
pub struct AddPanel {
    pub id: PanelId,
    pub meta: PanelMeta,
    /// `None` lets the widget choose
    pub position: Option<PanelPosition>,
    pub initial_size: Option<Measure>,
    pub minimum_size: Option<Measure>,
}

impl AddPanel {
    pub fn new(id: PanelId, meta: PanelMeta) -> Self {
        Self {
            id,
            meta,
            position: None,
            initial_size: None,
            minimum_size: None,
        }
    }

    pub fn at(mut self, position: Option<PanelPosition>) -> Self {
        self.position = position;
        self
    }

    pub fn sized(mut self, initial: Measure, minimum: Measure) -> Self {
        self.initial_size = Some(initial);
        self.minimum_size = Some(minimum);
        self
    }
}

/// The imperative dock widget the engine drives
pub trait DockWidget {
    /// Measured container size `(width, height)`; zero when unmeasured
    fn dimensions(&self) -> (f64, f64);

    fn has_panel(&self, id: &PanelId) -> bool;

    /// Live panel ids in layout order
    fn panel_ids(&self) -> Vec<PanelId>;

    /// Add a live panel. Fails when the id is already live or the
    /// reference panel does not exist.
    fn add_panel(&mut self, panel: AddPanel) -> anyhow::Result<()>;

    /// Close a live panel. Returns false (and does nothing) when absent.
    fn remove_panel(&mut self, id: &PanelId) -> bool;

    /// Title/icon the panel was tagged with when added
    fn panel_meta(&self, id: &PanelId) -> Option<PanelMeta>;

    /// Whether the panel is the visible tab of its group
    fn is_panel_active(&self, id: &PanelId) -> bool;

    /// Whether the panel's group is the widget's active group
    fn is_panel_group_active(&self, id: &PanelId) -> bool;

    /// Make the panel the visible tab and its group active
    fn activate_panel(&mut self, id: &PanelId) -> bool;

    /// Serialize the current layout
    fn to_json(&self) -> anyhow::Result<Value>;

    /// Replace the current layout with a serialized one. On error the
    /// current layout is left untouched.
    fn from_json(&mut self, value: &Value) -> anyhow::Result<()>;

    /// Remove every panel
    fn clear(&mut self);

    /// Tear down and mount a fresh instance, which signals `Ready` again
    fn remount(&mut self);

    /// Drain pending events
    fn take_events(&mut self) -> Vec<DockEvent>;
}
