//! Region vocabulary
//!
//! The four fixed anchors a layout is built from, and their defaults.

use serde::{Deserialize, Serialize};

use super::descriptor::{IconKey, PanelId};
use crate::widget::Direction;

/// A named layout region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Left,
    Main,
    Right,
    Bottom,
}

/// Axis a region's size hint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Size is a width
    Horizontal,
    /// Size is a height
    Vertical,
}

impl Region {
    /// All regions in anchor-search priority order
    pub const ALL: [Region; 4] = [Region::Main, Region::Left, Region::Right, Region::Bottom];

    /// Lowercase name, also the legacy single-panel id
    pub fn name(&self) -> &'static str {
        match self {
            Region::Left => "left",
            Region::Main => "main",
            Region::Right => "right",
            Region::Bottom => "bottom",
        }
    }

    /// Panel id used when the region holds a single content node
    pub fn legacy_panel_id(&self) -> PanelId {
        PanelId::new(self.name())
    }

    /// Region whose legacy id matches `id`, if any
    pub fn from_legacy_id(id: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.name() == id)
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Region::Left => "Library",
            Region::Main => "Editor",
            Region::Right => "Inspector",
            Region::Bottom => "Console",
        }
    }

    pub fn default_icon(&self) -> IconKey {
        IconKey::new(match self {
            Region::Left => "library",
            Region::Main => "canvas",
            Region::Right => "inspector",
            Region::Bottom => "console",
        })
    }

    /// Default size as a percentage of the container (`None` for main)
    pub fn default_size_percent(&self) -> Option<f64> {
        match self {
            Region::Left => Some(20.0),
            Region::Right | Region::Bottom => Some(25.0),
            Region::Main => None,
        }
    }

    /// Default minimum size as a percentage of the container
    pub fn default_min_percent(&self) -> Option<f64> {
        match self {
            Region::Left | Region::Right | Region::Bottom => Some(10.0),
            Region::Main => None,
        }
    }

    /// Direction of the split that places this region next to main
    pub fn split_direction(&self) -> Option<Direction> {
        match self {
            Region::Left => Some(Direction::Left),
            Region::Right => Some(Direction::Right),
            Region::Bottom => Some(Direction::Below),
            Region::Main => None,
        }
    }

    /// Returns the axis this region's size is measured along
    pub fn axis(&self) -> Axis {
        match self {
            Region::Left | Region::Right | Region::Main => Axis::Horizontal,
            Region::Bottom => Axis::Vertical,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
