//! Declarative collector
//!
//! Walks the caller's tree of region and panel markers and produces, per
//! region, either a single content node or an ordered rail of panels. The
//! result is rebuilt on every render.

use std::collections::BTreeMap;

use crate::panel::{PanelDescriptor, PanelId, PanelMeta, RailAssignment, Region};

/// One element of the caller's layout tree
#[derive(Debug, Clone)]
pub enum LayoutNode<C> {
    /// Region marker (`Left`/`Main`/`Right`/`Bottom`)
    Region {
        region: Region,
        children: Vec<LayoutNode<C>>,
    },
    /// Panel marker inside a region
    Panel(PanelDescriptor<C>),
    /// Plain content
    Content(C),
    /// Anything the collector doesn't recognise
    Unknown,
}

impl<C> LayoutNode<C> {
    pub fn region(region: Region, children: Vec<LayoutNode<C>>) -> Self {
        LayoutNode::Region { region, children }
    }

    pub fn left(children: Vec<LayoutNode<C>>) -> Self {
        Self::region(Region::Left, children)
    }

    pub fn main(children: Vec<LayoutNode<C>>) -> Self {
        Self::region(Region::Main, children)
    }

    pub fn right(children: Vec<LayoutNode<C>>) -> Self {
        Self::region(Region::Right, children)
    }

    pub fn bottom(children: Vec<LayoutNode<C>>) -> Self {
        Self::region(Region::Bottom, children)
    }

    pub fn panel(descriptor: PanelDescriptor<C>) -> Self {
        LayoutNode::Panel(descriptor)
    }

    pub fn content(content: C) -> Self {
        LayoutNode::Content(content)
    }
}

/// What a region holds after collection
#[derive(Debug, Clone, Default)]
pub enum RegionSlot<C> {
    /// No marker for this region
    #[default]
    Absent,
    /// Legacy single-panel region
    Single(Option<C>),
    /// Multi-panel rail in document order
    Rail(Vec<PanelDescriptor<C>>),
}

impl<C> RegionSlot<C> {
    pub fn is_rail(&self) -> bool {
        matches!(self, RegionSlot::Rail(_))
    }
}

/// Normalized descriptor set for one render
#[derive(Debug, Clone)]
pub struct CollectedLayout<C> {
    pub left: RegionSlot<C>,
    pub main: RegionSlot<C>,
    pub right: RegionSlot<C>,
    pub bottom: RegionSlot<C>,
}

impl<C> Default for CollectedLayout<C> {
    fn default() -> Self {
        Self {
            left: RegionSlot::Absent,
            main: RegionSlot::Absent,
            right: RegionSlot::Absent,
            bottom: RegionSlot::Absent,
        }
    }
}

/// Collect a layout tree
pub fn collect<C>(nodes: Vec<LayoutNode<C>>) -> CollectedLayout<C> {
    let mut layout = CollectedLayout::default();
    for node in nodes {
        match node {
            LayoutNode::Region { region, children } => {
                if !matches!(layout.slot(region), RegionSlot::Absent) {
                    tracing::debug!(%region, "ignoring repeated region marker");
                    continue;
                }
                *layout.slot_mut(region) = collect_region(children);
            }
            LayoutNode::Panel(panel) => {
                tracing::debug!(panel = %panel.id, "ignoring panel marker outside a region");
            }
            LayoutNode::Content(_) | LayoutNode::Unknown => {}
        }
    }
    layout
}

fn collect_region<C>(children: Vec<LayoutNode<C>>) -> RegionSlot<C> {
    let has_panels = children.iter().any(|c| matches!(c, LayoutNode::Panel(_)));
    if has_panels {
        let panels = children
            .into_iter()
            .filter_map(|c| match c {
                LayoutNode::Panel(panel) => Some(panel),
                _ => None,
            })
            .collect();
        return RegionSlot::Rail(panels);
    }

    let content = children.into_iter().find_map(|c| match c {
        LayoutNode::Content(content) => Some(content),
        _ => None,
    });
    RegionSlot::Single(content)
}

impl<C> CollectedLayout<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a region to a multi-panel rail
    pub fn with_rail(mut self, region: Region, panels: Vec<PanelDescriptor<C>>) -> Self {
        *self.slot_mut(region) = RegionSlot::Rail(panels);
        self
    }

    /// Set a region to single content (`None` to leave it empty)
    pub fn with_single(mut self, region: Region, content: Option<C>) -> Self {
        *self.slot_mut(region) = RegionSlot::Single(content);
        self
    }

    pub fn slot(&self, region: Region) -> &RegionSlot<C> {
        match region {
            Region::Left => &self.left,
            Region::Main => &self.main,
            Region::Right => &self.right,
            Region::Bottom => &self.bottom,
        }
    }

    pub fn slot_mut(&mut self, region: Region) -> &mut RegionSlot<C> {
        match region {
            Region::Left => &mut self.left,
            Region::Main => &mut self.main,
            Region::Right => &mut self.right,
            Region::Bottom => &mut self.bottom,
        }
    }

    /// Whether any region is in multi-panel mode
    pub fn uses_rails(&self) -> bool {
        Region::ALL.iter().any(|r| self.slot(*r).is_rail())
    }

    pub fn shape(&self) -> LayoutShape {
        LayoutShape {
            rails: Region::ALL
                .into_iter()
                .filter(|r| self.slot(*r).is_rail())
                .collect(),
        }
    }

    /// Whether the descriptor set mentions a panel id
    pub fn describes(&self, id: &PanelId) -> bool {
        Region::ALL.into_iter().any(|region| match self.slot(region) {
            RegionSlot::Rail(panels) => panels.iter().any(|p| &p.id == id),
            _ => region.legacy_panel_id() == *id,
        })
    }

    /// Region a panel id belongs to
    pub fn region_of(&self, id: &PanelId) -> Option<Region> {
        Region::ALL.into_iter().find(|region| match self.slot(*region) {
            RegionSlot::Rail(panels) => panels.iter().any(|p| &p.id == id),
            _ => region.legacy_panel_id() == *id,
        })
    }

    /// Title and icon for a described panel
    pub fn meta(&self, id: &PanelId) -> Option<PanelMeta> {
        let region = self.region_of(id)?;
        match self.slot(region) {
            RegionSlot::Rail(panels) => panels.iter().find(|p| &p.id == id).map(|p| p.meta()),
            _ => Some(PanelMeta::for_region(region)),
        }
    }
}

impl<C: Clone> CollectedLayout<C> {
    /// Region contents as a list of descriptors
    ///
    /// A legacy single-content region becomes one descriptor named after
    /// the region. An absent region is an empty rail.
    pub fn rail(&self, region: Region) -> RailAssignment<C> {
        let panels = match self.slot(region) {
            RegionSlot::Absent => Vec::new(),
            RegionSlot::Single(content) => {
                let meta = PanelMeta::for_region(region);
                vec![PanelDescriptor {
                    id: region.legacy_panel_id(),
                    title: meta.title,
                    icon: meta.icon,
                    content: content.clone(),
                }]
            }
            RegionSlot::Rail(panels) => panels.clone(),
        };
        RailAssignment::new(region, panels)
    }

    /// Every region as a rail, main first, then left, right, bottom
    pub fn rails(&self) -> Vec<RailAssignment<C>> {
        Region::ALL.into_iter().map(|r| self.rail(r)).collect()
    }

    /// Flat id → content map
    ///
    /// Legacy ids of non-rail regions are always present, so a region that
    /// stops being rendered closes its panel. A rail panel whose id matches
    /// a legacy id keeps its own content.
    pub fn resolved(&self) -> ResolvedSlotMap<C> {
        let mut map = BTreeMap::new();
        for region in Region::ALL {
            if let RegionSlot::Rail(panels) = self.slot(region) {
                for panel in panels {
                    map.insert(panel.id.clone(), panel.content.clone());
                }
            }
        }
        for region in Region::ALL {
            let content = match self.slot(region) {
                RegionSlot::Rail(_) => continue,
                RegionSlot::Single(content) => content.clone(),
                RegionSlot::Absent => None,
            };
            map.entry(region.legacy_panel_id()).or_insert(content);
        }
        ResolvedSlotMap(map)
    }
}

/// Which regions are rails; the structural fingerprint persisted layouts
/// are checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutShape {
    pub rails: Vec<Region>,
}

impl LayoutShape {
    pub fn fingerprint(&self) -> String {
        if self.rails.is_empty() {
            return "single".to_string();
        }
        let names: Vec<&str> = self.rails.iter().map(|r| r.name()).collect();
        format!("rails:{}", names.join(","))
    }
}

/// Flat mapping from panel id to current content
#[derive(Debug, Clone)]
pub struct ResolvedSlotMap<C>(BTreeMap<PanelId, Option<C>>);

impl<C> Default for ResolvedSlotMap<C> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<C> ResolvedSlotMap<C> {
    pub fn get(&self, id: &PanelId) -> Option<&C> {
        self.0.get(id).and_then(|c| c.as_ref())
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.0.contains_key(id)
    }

    pub fn is_present(&self, id: &PanelId) -> bool {
        self.get(id).is_some()
    }

    /// Ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &PanelId> {
        self.0.keys()
    }

    /// Ids whose content is absent
    pub fn absent_ids(&self) -> impl Iterator<Item = &PanelId> {
        self.0.iter().filter(|(_, c)| c.is_none()).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted `id:presence` key; reconciliation only runs when it changes
    pub fn reconcile_key(&self) -> String {
        self.0
            .iter()
            .map(|(id, content)| format!("{}:{}", id, u8::from(content.is_some())))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl<C> FromIterator<(PanelId, Option<C>)> for ResolvedSlotMap<C> {
    fn from_iter<I: IntoIterator<Item = (PanelId, Option<C>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
