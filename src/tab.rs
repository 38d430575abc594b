//! Tab rendering adapter
//!
//! Turns a live panel into the data its tab needs: icon, truncated title and
//! active state. The close affordance goes through the widget's own close,
//! so the widget's `PanelRemoved` event is what tells the caller; whether the
//! panel exists next render is still up to the caller.

use crate::panel::{IconKey, PanelId, PanelMeta, Region};
use crate::util::truncate_text;
use crate::widget::DockWidget;

/// Everything needed to draw one tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabChrome {
    pub id: PanelId,
    /// Title after truncation
    pub title: String,
    /// Untruncated title, for tooltips
    pub full_title: String,
    pub icon: Option<IconKey>,
    pub glyph: &'static str,
    /// Visible tab of its group
    pub is_active: bool,
    /// Its group is the widget's active group
    pub is_group_active: bool,
    pub closable: bool,
}

/// User interaction with a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction {
    Activate(PanelId),
    Close(PanelId),
}

/// Title/icon for a panel: descriptor first, then the live panel's tag,
/// then region defaults for legacy ids, then the bare id
pub fn resolve_meta<W: DockWidget + ?Sized>(
    widget: &W,
    id: &PanelId,
    descriptor: Option<PanelMeta>,
) -> PanelMeta {
    descriptor
        .or_else(|| widget.panel_meta(id))
        .or_else(|| Region::from_legacy_id(id.as_str()).map(PanelMeta::for_region))
        .unwrap_or_else(|| PanelMeta::new(id.as_str(), None))
}

/// Chrome for a live panel, `None` if the panel isn't live
pub fn tab_chrome<W: DockWidget + ?Sized>(
    widget: &W,
    id: &PanelId,
    descriptor: Option<PanelMeta>,
    max_chars: usize,
) -> Option<TabChrome> {
    if !widget.has_panel(id) {
        return None;
    }
    let meta = resolve_meta(widget, id, descriptor);
    let glyph = meta.icon.as_ref().map(IconKey::glyph).unwrap_or("");
    Some(TabChrome {
        id: id.clone(),
        title: truncate_text(&meta.title, max_chars),
        full_title: meta.title,
        icon: meta.icon,
        glyph,
        is_active: widget.is_panel_active(id),
        is_group_active: widget.is_panel_group_active(id),
        closable: true,
    })
}

/// Forward a close click to the widget's native close
pub fn close_tab<W: DockWidget + ?Sized>(widget: &mut W, id: &PanelId) -> bool {
    widget.remove_panel(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{AddPanel, DockEvent, DockTree, PanelPosition};

    fn tree_with(ids: &[(&str, &str)]) -> DockTree {
        let mut tree = DockTree::new(800.0, 600.0);
        let mut first: Option<PanelId> = None;
        for (id, title) in ids {
            let position = first.clone().map(PanelPosition::within);
            tree.add_panel(
                AddPanel::new(PanelId::new(*id), PanelMeta::new(*title, Some(IconKey::new("graph"))))
                    .at(position),
            )
            .unwrap();
            first.get_or_insert_with(|| PanelId::new(*id));
        }
        tree.take_events();
        tree
    }

    #[test]
    fn test_chrome_uses_live_tag_and_truncates() {
        let tree = tree_with(&[("graph", "Dialogue Graph Overview")]);
        let chrome = tab_chrome(&tree, &PanelId::new("graph"), None, 10).unwrap();
        assert_eq!(chrome.title, "Dialogue …");
        assert_eq!(chrome.full_title, "Dialogue Graph Overview");
        assert_eq!(chrome.glyph, IconKey::new("graph").glyph());
        assert!(chrome.is_active);
        assert!(chrome.is_group_active);
    }

    #[test]
    fn test_descriptor_meta_overrides_tag() {
        let tree = tree_with(&[("graph", "Old")]);
        let chrome = tab_chrome(
            &tree,
            &PanelId::new("graph"),
            Some(PanelMeta::new("New", None)),
            24,
        )
        .unwrap();
        assert_eq!(chrome.title, "New");
        assert_eq!(chrome.icon, None);
        assert_eq!(chrome.glyph, "");
    }

    #[test]
    fn test_inactive_tab_in_group() {
        let tree = tree_with(&[("a", "A"), ("b", "B")]);
        let a = tab_chrome(&tree, &PanelId::new("a"), None, 24).unwrap();
        let b = tab_chrome(&tree, &PanelId::new("b"), None, 24).unwrap();
        assert!(!a.is_active);
        assert!(b.is_active);
        assert!(a.is_group_active);
    }

    #[test]
    fn test_absent_panel_has_no_chrome() {
        let tree = tree_with(&[("a", "A")]);
        assert!(tab_chrome(&tree, &PanelId::new("zzz"), None, 24).is_none());
    }

    #[test]
    fn test_legacy_id_falls_back_to_region_defaults() {
        let tree = DockTree::new(800.0, 600.0);
        let meta = resolve_meta(&tree, &PanelId::new("bottom"), None);
        assert_eq!(meta, PanelMeta::for_region(Region::Bottom));
        let meta = resolve_meta(&tree, &PanelId::new("custom"), None);
        assert_eq!(meta.title, "custom");
    }

    #[test]
    fn test_close_tab_uses_native_close() {
        let mut tree = tree_with(&[("a", "A")]);
        assert!(close_tab(&mut tree, &PanelId::new("a")));
        assert!(tree
            .take_events()
            .contains(&DockEvent::PanelRemoved(PanelId::new("a"))));
        assert!(!close_tab(&mut tree, &PanelId::new("a")));
    }
}
