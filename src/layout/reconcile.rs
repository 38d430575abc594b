//! Steady-state reconciliation
//!
//! Brings the live panel set in line with the descriptor set without ever
//! touching a panel that is already live: closes what lost its content or
//! its descriptor, adds what gained content. Sizes and positions the user
//! chose for live panels are never revisited.

use crate::panel::{PanelDescriptor, PanelId, RailAssignment, Region};
use crate::widget::{AddPanel, DockWidget, PanelPosition};

use super::sizing::SizeHints;

/// What a reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<PanelId>,
    pub removed: Vec<PanelId>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Close `closing` panels that are live, then add every content-present
/// descriptor that isn't
///
/// `rails` must be in main, left, right, bottom order; that order is the
/// fallback priority when a side rail needs an anchor.
pub fn reconcile<C, W>(
    widget: &mut W,
    rails: &[RailAssignment<C>],
    closing: impl IntoIterator<Item = PanelId>,
    main_anchor: Option<&PanelId>,
    sizes: &SizeHints,
) -> ReconcileReport
where
    W: DockWidget + ?Sized,
{
    let mut removed = Vec::new();
    for id in closing {
        if widget.remove_panel(&id) {
            tracing::debug!(panel = %id, "closed panel");
            removed.push(id);
        }
    }

    let added = add_missing(widget, rails, main_anchor, sizes);
    ReconcileReport { added, removed }
}

/// Add every content-present descriptor that has no live panel
pub(crate) fn add_missing<C, W>(
    widget: &mut W,
    rails: &[RailAssignment<C>],
    main_anchor: Option<&PanelId>,
    sizes: &SizeHints,
) -> Vec<PanelId>
where
    W: DockWidget + ?Sized,
{
    let mut added = Vec::new();
    for rail in rails {
        for panel in rail.panels.iter().filter(|p| p.has_content()) {
            if widget.has_panel(&panel.id) {
                continue;
            }
            let request = placement(&*widget, rail, rails, main_anchor, sizes, panel);
            let position = request.position.clone();
            match widget.add_panel(request) {
                Ok(()) => {
                    tracing::debug!(panel = %panel.id, region = %rail.region, ?position, "added panel");
                    added.push(panel.id.clone());
                }
                Err(e) => {
                    tracing::warn!(panel = %panel.id, "Failed to add panel: {:#}", e);
                }
            }
        }
    }
    added
}

/// Where a missing panel goes
///
/// A tab next to the first live panel of its own rail if there is one.
/// Otherwise main panels take the widget's default placement and side
/// panels split against `side_anchor`, sized from the region's hint.
fn placement<C, W>(
    widget: &W,
    rail: &RailAssignment<C>,
    rails: &[RailAssignment<C>],
    main_anchor: Option<&PanelId>,
    sizes: &SizeHints,
    panel: &PanelDescriptor<C>,
) -> AddPanel
where
    W: DockWidget + ?Sized,
{
    let request = AddPanel::new(panel.id.clone(), panel.meta());

    if let Some(sibling) = first_live(widget, rail) {
        return request.at(Some(PanelPosition::within(sibling)));
    }

    let Some(direction) = rail.region.split_direction() else {
        return request;
    };
    let Some(reference) = side_anchor(widget, rails, main_anchor) else {
        return request;
    };

    let request = request.at(Some(PanelPosition::new(reference, direction)));
    match sizes.split_size(rail.region, widget.dimensions()) {
        Some(size) => request.sized(size.initial, size.minimum),
        None => request,
    }
}

/// Reference panel for a side rail whose panels are all closed
///
/// First live main panel, then the remembered main anchor if it is live,
/// then the first live panel across main, left, right and bottom.
pub fn side_anchor<C, W>(
    widget: &W,
    rails: &[RailAssignment<C>],
    main_anchor: Option<&PanelId>,
) -> Option<PanelId>
where
    W: DockWidget + ?Sized,
{
    rails
        .iter()
        .filter(|r| r.region == Region::Main)
        .find_map(|r| first_live(widget, r))
        .or_else(|| main_anchor.filter(|id| widget.has_panel(id)).cloned())
        .or_else(|| rails.iter().find_map(|r| first_live(widget, r)))
}

fn first_live<C, W>(widget: &W, rail: &RailAssignment<C>) -> Option<PanelId>
where
    W: DockWidget + ?Sized,
{
    rail.panels
        .iter()
        .find(|p| widget.has_panel(&p.id))
        .map(|p| p.id.clone())
}
