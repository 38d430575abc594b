//! Default layout seeding
//!
//! Runs once per mount when there is no snapshot worth restoring. The main
//! rail goes in first so side rails have something to split against; each
//! side rail's first panel splits off the main anchor, the rest join it as
//! tabs.

use crate::panel::{PanelId, RailAssignment, Region};
use crate::widget::DockWidget;

use super::reconcile::add_missing;
use super::sizing::SizeHints;

/// Outcome of seeding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Main rail panel the side rails were anchored to
    pub main_anchor: Option<PanelId>,
    pub placed: Vec<PanelId>,
}

/// Seed the default arrangement into an empty widget
///
/// Only panels with content are placed. Failed adds are logged and
/// skipped.
pub fn seed_default_layout<C, W>(
    widget: &mut W,
    rails: &[RailAssignment<C>],
    sizes: &SizeHints,
) -> SeedReport
where
    W: DockWidget + ?Sized,
{
    let main_anchor = main_anchor(rails);
    let placed = add_missing(widget, rails, main_anchor.as_ref(), sizes);
    tracing::info!(
        anchor = ?main_anchor,
        panels = placed.len(),
        "seeded default layout"
    );
    SeedReport {
        main_anchor,
        placed,
    }
}

/// Configured main anchor: the first main panel with content, else the
/// first main panel
pub fn main_anchor<C>(rails: &[RailAssignment<C>]) -> Option<PanelId> {
    let main = rails.iter().find(|r| r.region == Region::Main)?;
    main.anchor()
        .or_else(|| main.panels.first())
        .map(|p| p.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::CollectedLayout;
    use crate::layout::{RegionSize, RegionSizes};
    use crate::panel::PanelDescriptor;
    use crate::widget::{DockTree, Orientation};

    fn desc(id: &str, content: Option<&'static str>) -> PanelDescriptor<&'static str> {
        PanelDescriptor::new(id, id).with_optional_content(content)
    }

    fn width(tree: &DockTree, id: &str) -> f64 {
        tree.panel_rect(&PanelId::new(id))
            .map(|r| r.extent(Orientation::Horizontal))
            .unwrap_or_default()
    }

    #[test]
    fn test_seeds_every_region_with_default_sizes() {
        let mut tree = DockTree::new(1000.0, 800.0);
        let layout = CollectedLayout::new()
            .with_single(Region::Main, Some("editor"))
            .with_single(Region::Left, Some("library"))
            .with_single(Region::Right, Some("inspector"))
            .with_single(Region::Bottom, Some("console"));

        let report = seed_default_layout(&mut tree, &layout.rails(), &SizeHints::default());

        assert_eq!(report.main_anchor, Some(PanelId::new("main")));
        assert_eq!(report.placed.len(), 4);
        assert!((width(&tree, "left") - 200.0).abs() < 1e-6);
        assert!((width(&tree, "right") - 250.0).abs() < 1e-6);
        let bottom = tree.panel_rect(&PanelId::new("bottom")).unwrap();
        assert!((bottom.height - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_rail_panels_share_a_group() {
        let mut tree = DockTree::new(1000.0, 800.0);
        let layout = CollectedLayout::new()
            .with_rail(Region::Main, vec![desc("graph", Some("g")), desc("yarn", Some("y"))])
            .with_rail(
                Region::Right,
                vec![desc("props", None), desc("node", Some("n")), desc("meta", Some("m"))],
            );

        let report = seed_default_layout(&mut tree, &layout.rails(), &SizeHints::default());

        assert_eq!(report.main_anchor, Some(PanelId::new("graph")));
        assert!(!tree.has_panel(&PanelId::new("props")));
        let group = |id: &str| tree.group_of(&PanelId::new(id));
        assert_eq!(group("graph"), group("yarn"));
        assert_eq!(group("node"), group("meta"));
        assert_ne!(group("graph"), group("node"));
    }

    #[test]
    fn test_requested_size_is_used() {
        let mut tree = DockTree::new(1000.0, 800.0);
        let layout = CollectedLayout::new()
            .with_single(Region::Main, Some("editor"))
            .with_single(Region::Left, Some("library"));
        let sizes = SizeHints::new(
            RegionSizes::default().with(Region::Left, RegionSize::percent(30.0)),
            RegionSizes::default(),
        );

        seed_default_layout(&mut tree, &layout.rails(), &sizes);

        assert!((width(&tree, "left") - 300.0).abs() < 1e-6);
        assert!((width(&tree, "main") - 700.0).abs() < 1e-6);
    }

    #[test]
    fn test_unmeasured_container_splits_at_default_percent() {
        let mut tree = DockTree::new(0.0, 0.0);
        let layout = CollectedLayout::new()
            .with_single(Region::Main, Some("editor"))
            .with_single(Region::Left, Some("library"));
        let sizes = SizeHints::new(
            RegionSizes::default().with(Region::Left, RegionSize::percent(40.0)),
            RegionSizes::default(),
        );

        seed_default_layout(&mut tree, &layout.rails(), &sizes);
        tree.set_dimensions(1000.0, 800.0);

        assert!((width(&tree, "left") - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_main_anchor_without_content_falls_back_to_first() {
        let layout = CollectedLayout::new()
            .with_rail(Region::Main, vec![desc("a", None), desc("b", None)]);
        assert_eq!(main_anchor(&layout.rails()), Some(PanelId::new("a")));
        let empty: CollectedLayout<&str> = CollectedLayout::new();
        assert_eq!(main_anchor(&empty.rails()), None);
    }
}
