//! Serialized form of a `DockTree`
//!
//! Panel ids are embedded verbatim, which is what the bare-snapshot
//! compatibility check in `persist` relies on.

use serde::{Deserialize, Serialize};

use super::tree::Orientation;
use crate::panel::{IconKey, PanelId};

/// Whole-tree snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockTreeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_group: Option<u64>,
}

/// One node of the split tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSnapshot {
    Group {
        id: u64,
        panels: Vec<PanelSnapshot>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active: Option<PanelId>,
    },
    Split {
        orientation: Orientation,
        children: Vec<ChildSnapshot>,
    },
}

/// A split child and its share of the split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSnapshot {
    pub ratio: f64,
    #[serde(default)]
    pub min_size: f64,
    pub node: NodeSnapshot,
}

/// A tab inside a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub id: PanelId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconKey>,
}
