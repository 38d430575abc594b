//! In-memory dock widget
//!
//! A split tree of tab groups. Splits hold proportional ratios (summing to
//! 1.0) and per-child minimum sizes in pixels; pixel rectangles are derived
//! from the container size on demand.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::snapshot::{ChildSnapshot, DockTreeSnapshot, NodeSnapshot, PanelSnapshot};
use super::{AddPanel, DockEvent, DockWidget, Measure};
use crate::panel::{PanelId, PanelMeta};

/// Split share used when an add carries no usable size
const DEFAULT_SPLIT_FRACTION: f64 = 0.5;

/// Bounds for a new split's share of its reference slot
const MIN_SPLIT_FRACTION: f64 = 0.05;
const MAX_SPLIT_FRACTION: f64 = 0.95;

// ============================================================================
// Geometry
// ============================================================================

/// Unique identifier for a tab group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

/// Direction children of a split are laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children arranged left-to-right
    Horizontal,
    /// Children arranged top-to-bottom
    Vertical,
}

/// Rectangle for layout calculations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size along an orientation's main axis
    pub fn extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

// ============================================================================
// Tree
// ============================================================================

#[derive(Debug, Clone)]
struct DockGroup {
    panels: Vec<PanelId>,
    active_index: usize,
}

impl DockGroup {
    fn active_panel(&self) -> Option<&PanelId> {
        self.panels.get(self.active_index)
    }

    fn remove(&mut self, id: &PanelId) {
        if let Some(index) = self.panels.iter().position(|p| p == id) {
            self.panels.remove(index);
            if index < self.active_index {
                self.active_index -= 1;
            }
            if self.active_index >= self.panels.len() {
                self.active_index = self.panels.len().saturating_sub(1);
            }
        }
    }
}

#[derive(Debug, Clone)]
struct DockSplit {
    orientation: Orientation,
    children: Vec<DockNode>,
    ratios: Vec<f64>,
    min_sizes: Vec<f64>,
}

impl DockSplit {
    fn child_rects(&self, rect: Rect) -> Vec<Rect> {
        let mut offset = 0.0;
        self.ratios
            .iter()
            .map(|ratio| {
                let child = match self.orientation {
                    Orientation::Horizontal => {
                        Rect::new(rect.x + offset, rect.y, rect.width * ratio, rect.height)
                    }
                    Orientation::Vertical => {
                        Rect::new(rect.x, rect.y + offset, rect.width, rect.height * ratio)
                    }
                };
                offset += child.extent(self.orientation);
                child
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
enum DockNode {
    Group(GroupId),
    Split(DockSplit),
}

impl DockNode {
    fn contains_group(&self, group: GroupId) -> bool {
        match self {
            DockNode::Group(id) => *id == group,
            DockNode::Split(split) => split.children.iter().any(|c| c.contains_group(group)),
        }
    }

    fn collect_groups(&self, out: &mut Vec<GroupId>) {
        match self {
            DockNode::Group(id) => out.push(*id),
            DockNode::Split(split) => {
                for child in &split.children {
                    child.collect_groups(out);
                }
            }
        }
    }

    fn layout(&self, rect: Rect, out: &mut HashMap<GroupId, Rect>) {
        match self {
            DockNode::Group(id) => {
                out.insert(*id, rect);
            }
            DockNode::Split(split) => {
                for (child, child_rect) in split.children.iter().zip(split.child_rects(rect)) {
                    child.layout(child_rect, out);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct LivePanel {
    meta: PanelMeta,
    group: GroupId,
}

/// In-memory dock widget
#[derive(Debug, Clone)]
pub struct DockTree {
    width: f64,
    height: f64,
    root: Option<DockNode>,
    groups: HashMap<GroupId, DockGroup>,
    panels: HashMap<PanelId, LivePanel>,
    active_group: Option<GroupId>,
    next_group_id: u64,
    events: Vec<DockEvent>,
}

impl DockTree {
    /// Mount a widget of the given container size. It signals `Ready`
    /// through its first event.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            root: None,
            groups: HashMap::new(),
            panels: HashMap::new(),
            active_group: None,
            next_group_id: 1,
            events: vec![DockEvent::Ready],
        }
    }

    /// Container resized
    pub fn set_dimensions(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        if self.root.is_some() {
            self.events.push(DockEvent::LayoutChanged);
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Pixel rectangle of every group
    pub fn group_rects(&self) -> HashMap<GroupId, Rect> {
        let mut out = HashMap::new();
        if let Some(root) = &self.root {
            root.layout(self.bounds(), &mut out);
        }
        out
    }

    /// Pixel rectangle of the group holding a panel
    pub fn panel_rect(&self, id: &PanelId) -> Option<Rect> {
        let group = self.group_of(id)?;
        self.group_rects().get(&group).copied()
    }

    pub fn group_of(&self, id: &PanelId) -> Option<GroupId> {
        self.panels.get(id).map(|p| p.group)
    }

    /// Groups in layout order (depth-first, left/top first)
    pub fn groups_in_order(&self) -> Vec<GroupId> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_groups(&mut out);
        }
        out
    }

    /// Tabs of a group in tab order
    pub fn group_panels(&self, group: GroupId) -> Vec<PanelId> {
        self.groups
            .get(&group)
            .map(|g| g.panels.clone())
            .unwrap_or_default()
    }

    pub fn active_group(&self) -> Option<GroupId> {
        self.active_group
    }

    /// Visible tab of the active group
    pub fn active_panel(&self) -> Option<PanelId> {
        self.active_group
            .and_then(|g| self.groups.get(&g))
            .and_then(|g| g.active_panel().cloned())
    }

    /// User drag of a splitter: set the extent of the panel's group along
    /// `orientation`, taking the difference from its neighbour.
    ///
    /// The innermost split of that orientation containing the panel is
    /// resized. Minimum sizes of both sides are enforced.
    pub fn resize_panel(&mut self, id: &PanelId, orientation: Orientation, size: f64) -> bool {
        let Some(group) = self.group_of(id) else {
            return false;
        };
        let bounds = self.bounds();
        let resized = match self.root.as_mut() {
            Some(root) => resize_node(root, bounds, group, orientation, size),
            None => false,
        };
        if resized {
            tracing::debug!(panel = %id, size, "resized panel");
            self.events.push(DockEvent::LayoutChanged);
        }
        resized
    }

    /// Serializable form of the current tree
    pub fn snapshot(&self) -> DockTreeSnapshot {
        DockTreeSnapshot {
            root: self.root.as_ref().map(|node| self.node_snapshot(node)),
            active_group: self.active_group.map(|g| g.0),
        }
    }

    fn node_snapshot(&self, node: &DockNode) -> NodeSnapshot {
        match node {
            DockNode::Group(id) => {
                let group = self.groups.get(id);
                let panels = group
                    .map(|g| {
                        g.panels
                            .iter()
                            .map(|panel_id| {
                                let meta = self.panels.get(panel_id).map(|p| &p.meta);
                                PanelSnapshot {
                                    id: panel_id.clone(),
                                    title: meta.map(|m| m.title.clone()).unwrap_or_default(),
                                    icon: meta.and_then(|m| m.icon.clone()),
                                }
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                NodeSnapshot::Group {
                    id: id.0,
                    panels,
                    active: group.and_then(|g| g.active_panel().cloned()),
                }
            }
            DockNode::Split(split) => NodeSnapshot::Split {
                orientation: split.orientation,
                children: split
                    .children
                    .iter()
                    .zip(&split.ratios)
                    .zip(&split.min_sizes)
                    .map(|((child, ratio), min_size)| ChildSnapshot {
                        ratio: *ratio,
                        min_size: *min_size,
                        node: self.node_snapshot(child),
                    })
                    .collect(),
            },
        }
    }

    fn alloc_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        self.groups.insert(
            id,
            DockGroup {
                panels: Vec::new(),
                active_index: 0,
            },
        );
        id
    }

    fn detach_group(&mut self, group: GroupId) {
        self.groups.remove(&group);
        let root_is_group = matches!(self.root, Some(DockNode::Group(id)) if id == group);
        if root_is_group {
            self.root = None;
        } else if let Some(root) = self.root.as_mut() {
            remove_group_node(root, group);
        }
        if self.active_group == Some(group) {
            self.active_group = self.groups_in_order().first().copied();
        }
    }

    fn reset(&mut self) {
        self.root = None;
        self.groups.clear();
        self.panels.clear();
        self.active_group = None;
    }
}

/// Share of the reference slot a new split child gets
fn split_fraction(initial: Option<Measure>, container: f64, slot: f64) -> f64 {
    let fraction = match initial {
        Some(measure) => match (measure.to_px(container), measure) {
            (Some(px), _) if slot > 0.0 => px / slot,
            (_, Measure::Percent(percent)) => percent / 100.0,
            _ => DEFAULT_SPLIT_FRACTION,
        },
        None => DEFAULT_SPLIT_FRACTION,
    };
    if fraction.is_finite() {
        fraction.clamp(MIN_SPLIT_FRACTION, MAX_SPLIT_FRACTION)
    } else {
        DEFAULT_SPLIT_FRACTION
    }
}

/// Place `new_group` next to `target`, replacing the target with a split or
/// joining the target's parent split when it already runs the same way.
fn insert_beside(
    node: &mut DockNode,
    target: GroupId,
    new_group: GroupId,
    orientation: Orientation,
    before: bool,
    fraction: f64,
    min_size: f64,
) -> bool {
    match node {
        DockNode::Group(id) if *id == target => {
            let pair = [DockNode::Group(new_group), DockNode::Group(target)];
            let (children, ratios, min_sizes) = if before {
                (pair.to_vec(), vec![fraction, 1.0 - fraction], vec![min_size, 0.0])
            } else {
                let [first, second] = pair;
                (vec![second, first], vec![1.0 - fraction, fraction], vec![0.0, min_size])
            };
            *node = DockNode::Split(DockSplit {
                orientation,
                children,
                ratios,
                min_sizes,
            });
            true
        }
        DockNode::Group(_) => false,
        DockNode::Split(split) => {
            let Some(index) = split.children.iter().position(|c| c.contains_group(target)) else {
                return false;
            };
            let direct = matches!(split.children[index], DockNode::Group(id) if id == target);
            if direct && split.orientation == orientation {
                let share = split.ratios[index];
                let at = if before { index } else { index + 1 };
                split.ratios[index] = share * (1.0 - fraction);
                split.children.insert(at, DockNode::Group(new_group));
                split.ratios.insert(at, share * fraction);
                split.min_sizes.insert(at, min_size);
                true
            } else {
                insert_beside(
                    &mut split.children[index],
                    target,
                    new_group,
                    orientation,
                    before,
                    fraction,
                    min_size,
                )
            }
        }
    }
}

/// Remove a group from the tree, collapsing single-child splits. The freed
/// share goes to the previous sibling, or the next one for a first child.
fn remove_group_node(node: &mut DockNode, group: GroupId) -> bool {
    let DockNode::Split(split) = node else {
        return false;
    };

    let found = split
        .children
        .iter()
        .position(|c| matches!(c, DockNode::Group(id) if *id == group));

    if let Some(index) = found {
        split.children.remove(index);
        let freed = split.ratios.remove(index);
        split.min_sizes.remove(index);
        if !split.ratios.is_empty() {
            let neighbor = index.saturating_sub(1);
            split.ratios[neighbor] += freed;
        }
        if split.children.len() == 1 {
            let remaining = split.children.remove(0);
            *node = remaining;
        }
        return true;
    }

    split
        .children
        .iter_mut()
        .any(|child| remove_group_node(child, group))
}

fn resize_node(
    node: &mut DockNode,
    rect: Rect,
    group: GroupId,
    orientation: Orientation,
    size: f64,
) -> bool {
    let DockNode::Split(split) = node else {
        return false;
    };
    let Some(index) = split.children.iter().position(|c| c.contains_group(group)) else {
        return false;
    };

    let child_rect = split.child_rects(rect)[index];
    if resize_node(&mut split.children[index], child_rect, group, orientation, size) {
        return true;
    }

    let extent = rect.extent(orientation);
    if split.orientation != orientation || split.children.len() < 2 || extent <= 0.0 {
        return false;
    }

    let neighbor = if index + 1 < split.children.len() {
        index + 1
    } else {
        index - 1
    };
    let pair = split.ratios[index] + split.ratios[neighbor];
    let min_own = split.min_sizes[index] / extent;
    let max_own = (pair - split.min_sizes[neighbor] / extent).max(min_own);
    let ratio = (size / extent).clamp(min_own, max_own);
    split.ratios[index] = ratio;
    split.ratios[neighbor] = pair - ratio;
    true
}

// ============================================================================
// Restore
// ============================================================================

#[derive(Default)]
struct Restore {
    groups: HashMap<GroupId, DockGroup>,
    panels: HashMap<PanelId, LivePanel>,
}

impl Restore {
    fn node(&mut self, node: &NodeSnapshot) -> Result<DockNode> {
        match node {
            NodeSnapshot::Group { id, panels, active } => {
                let group_id = GroupId(*id);
                if panels.is_empty() {
                    bail!("Group {} has no panels", id);
                }
                if self.groups.contains_key(&group_id) {
                    bail!("Duplicate group {}", id);
                }
                let mut ids = Vec::with_capacity(panels.len());
                for panel in panels {
                    if self.panels.contains_key(&panel.id) {
                        bail!("Duplicate panel '{}'", panel.id);
                    }
                    self.panels.insert(
                        panel.id.clone(),
                        LivePanel {
                            meta: PanelMeta::new(panel.title.clone(), panel.icon.clone()),
                            group: group_id,
                        },
                    );
                    ids.push(panel.id.clone());
                }
                let active_index = active
                    .as_ref()
                    .and_then(|a| ids.iter().position(|p| p == a))
                    .unwrap_or(0);
                self.groups.insert(
                    group_id,
                    DockGroup {
                        panels: ids,
                        active_index,
                    },
                );
                Ok(DockNode::Group(group_id))
            }
            NodeSnapshot::Split {
                orientation,
                children,
            } => {
                if children.is_empty() {
                    bail!("Split has no children");
                }
                let total: f64 = children.iter().map(|c| c.ratio).sum();
                if total <= 0.0 || children.iter().any(|c| !c.ratio.is_finite() || c.ratio <= 0.0) {
                    bail!("Split has invalid ratios");
                }

                let mut nodes = Vec::with_capacity(children.len());
                for child in children {
                    nodes.push(self.node(&child.node)?);
                }
                if nodes.len() == 1 {
                    return Ok(nodes.remove(0));
                }

                Ok(DockNode::Split(DockSplit {
                    orientation: *orientation,
                    children: nodes,
                    ratios: children
                        .iter()
                        .map(|c| if (total - 1.0).abs() > 1e-9 { c.ratio / total } else { c.ratio })
                        .collect(),
                    min_sizes: children.iter().map(|c| c.min_size.max(0.0)).collect(),
                }))
            }
        }
    }
}

// ============================================================================
// Widget interface
// ============================================================================

impl DockWidget for DockTree {
    fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn has_panel(&self, id: &PanelId) -> bool {
        self.panels.contains_key(id)
    }

    fn panel_ids(&self) -> Vec<PanelId> {
        self.groups_in_order()
            .into_iter()
            .flat_map(|g| self.group_panels(g))
            .collect()
    }

    fn add_panel(&mut self, panel: AddPanel) -> Result<()> {
        let AddPanel {
            id,
            meta,
            position,
            initial_size,
            minimum_size,
        } = panel;

        if self.panels.contains_key(&id) {
            bail!("Panel '{}' already exists", id);
        }

        let group = match position {
            None => {
                let existing = self
                    .active_group
                    .or_else(|| self.groups_in_order().first().copied());
                match existing {
                    Some(group) => group,
                    None => {
                        let group = self.alloc_group();
                        self.root = Some(DockNode::Group(group));
                        group
                    }
                }
            }
            Some(position) => {
                let reference = self
                    .group_of(&position.reference)
                    .with_context(|| format!("Reference panel '{}' not found", position.reference))?;
                match position.direction.split() {
                    None => reference,
                    Some((orientation, before)) => {
                        let slot = self
                            .group_rects()
                            .get(&reference)
                            .copied()
                            .unwrap_or_default();
                        let container = self.bounds().extent(orientation);
                        let fraction =
                            split_fraction(initial_size, container, slot.extent(orientation));
                        let min_size = minimum_size
                            .and_then(|m| m.to_px(container))
                            .unwrap_or(0.0);
                        let group = self.alloc_group();
                        if let Some(root) = self.root.as_mut() {
                            insert_beside(
                                root,
                                reference,
                                group,
                                orientation,
                                before,
                                fraction,
                                min_size,
                            );
                        }
                        group
                    }
                }
            }
        };

        if let Some(target) = self.groups.get_mut(&group) {
            target.panels.push(id.clone());
            target.active_index = target.panels.len() - 1;
        }
        self.panels.insert(id.clone(), LivePanel { meta, group });
        self.active_group = Some(group);

        self.events.push(DockEvent::LayoutChanged);
        self.events.push(DockEvent::ActivePanelChanged(Some(id)));
        Ok(())
    }

    fn remove_panel(&mut self, id: &PanelId) -> bool {
        let Some(live) = self.panels.remove(id) else {
            return false;
        };

        let emptied = match self.groups.get_mut(&live.group) {
            Some(group) => {
                group.remove(id);
                group.panels.is_empty()
            }
            None => false,
        };
        if emptied {
            self.detach_group(live.group);
        }

        self.events.push(DockEvent::PanelRemoved(id.clone()));
        self.events.push(DockEvent::LayoutChanged);
        self.events
            .push(DockEvent::ActivePanelChanged(self.active_panel()));
        true
    }

    fn panel_meta(&self, id: &PanelId) -> Option<PanelMeta> {
        self.panels.get(id).map(|p| p.meta.clone())
    }

    fn is_panel_active(&self, id: &PanelId) -> bool {
        self.group_of(id)
            .and_then(|g| self.groups.get(&g))
            .and_then(|g| g.active_panel())
            .is_some_and(|active| active == id)
    }

    fn is_panel_group_active(&self, id: &PanelId) -> bool {
        self.group_of(id).is_some() && self.group_of(id) == self.active_group
    }

    fn activate_panel(&mut self, id: &PanelId) -> bool {
        let Some(group_id) = self.group_of(id) else {
            return false;
        };
        if let Some(group) = self.groups.get_mut(&group_id) {
            if let Some(index) = group.panels.iter().position(|p| p == id) {
                group.active_index = index;
            }
        }
        self.active_group = Some(group_id);
        self.events.push(DockEvent::LayoutChanged);
        self.events
            .push(DockEvent::ActivePanelChanged(Some(id.clone())));
        true
    }

    fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self.snapshot()).context("Failed to serialize dock layout")
    }

    fn from_json(&mut self, value: &Value) -> Result<()> {
        let snapshot: DockTreeSnapshot =
            serde_json::from_value(value.clone()).context("Invalid dock layout")?;

        let mut restore = Restore::default();
        let root = match &snapshot.root {
            Some(node) => Some(restore.node(node)?),
            None => None,
        };

        let next_group_id = restore
            .groups
            .keys()
            .map(|g| g.0)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .context("Invalid group id")?;

        self.root = root;
        self.groups = restore.groups;
        self.panels = restore.panels;
        self.next_group_id = next_group_id;
        self.active_group = snapshot
            .active_group
            .map(GroupId)
            .filter(|g| self.groups.contains_key(g))
            .or_else(|| self.groups_in_order().first().copied());

        self.events.push(DockEvent::LayoutChanged);
        self.events
            .push(DockEvent::ActivePanelChanged(self.active_panel()));
        Ok(())
    }

    fn clear(&mut self) {
        let had_panels = !self.panels.is_empty();
        self.reset();
        if had_panels {
            self.events.push(DockEvent::LayoutChanged);
            self.events.push(DockEvent::ActivePanelChanged(None));
        }
    }

    fn remount(&mut self) {
        self.reset();
        self.next_group_id = 1;
        self.events = vec![DockEvent::Ready];
    }

    fn take_events(&mut self) -> Vec<DockEvent> {
        std::mem::take(&mut self.events)
    }
}
