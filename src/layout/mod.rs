//! Layout engine
//!
//! Seeding, reconciliation and size hints, driven by `DockLayout`.

mod builder;
mod engine;
mod reconcile;
mod sizing;
mod workspace;

pub use builder::{main_anchor, seed_default_layout, SeedReport};
pub use engine::{DockLayout, DockLayoutOptions, LayoutRef, PanelClosedCallback};
pub use reconcile::{reconcile, side_anchor, ReconcileReport};
pub use sizing::{
    measured_extent, resolve_split_size, RegionSize, RegionSizes, SizeHints, SplitSize,
};
pub use workspace::WorkspaceLayout;
