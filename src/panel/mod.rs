//! Panel vocabulary - regions, panel ids and descriptors
//!
//! ## Architecture
//!
//! - `Region`: Left, Main, Right or Bottom anchor
//! - `PanelId`: Unique identifier for a panel within a layout
//! - `PanelDescriptor`: Caller-side description of a panel (id, title, icon, content)
//! - `RailAssignment`: Ordered panels bound to one region
//! - `PanelMeta`: Title/icon pair tagged onto live panels for tab chrome

mod descriptor;
mod region;

pub use descriptor::{IconKey, PanelDescriptor, PanelId, PanelMeta, RailAssignment};
pub use region::{Axis, Region};
