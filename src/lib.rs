//! Studio Layout - declarative dockable panel layouts
//!
//! Callers describe a workspace as four regions (left, main, right, bottom),
//! each holding single content or a rail of tabbed panels. The engine keeps
//! an imperative dock widget in step with that description, persists the
//! user's arrangement, and never moves or resizes a panel the user has
//! already placed.

pub mod collect;
pub mod config;
pub mod config_paths;
pub mod layout;
pub mod panel;
pub mod persist;
pub mod store;
pub mod tab;
pub mod tracing;
pub mod util;
pub mod widget;

// Re-export commonly used types
pub use collect::{collect, CollectedLayout, LayoutNode, RegionSlot, ResolvedSlotMap};
pub use config::LayoutConfig;
pub use layout::{DockLayout, DockLayoutOptions, LayoutRef, RegionSize, WorkspaceLayout};
pub use panel::{IconKey, PanelDescriptor, PanelId, PanelMeta, RailAssignment, Region};
pub use persist::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{ContentStore, PanelContent};
pub use tab::{TabAction, TabChrome};
pub use widget::{DockEvent, DockTree, DockWidget};
