//! Panel descriptors
//!
//! A descriptor is the caller's declarative description of a panel. The live
//! panel inside the dock widget is a separate thing and may lag behind it.

use serde::{Deserialize, Serialize};

use super::region::Region;

/// Unique identifier for a panel within one layout
///
/// Ids are compared verbatim and embedded as-is in layout snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PanelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Icon key used by tab chrome
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconKey(String);

impl IconKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get a glyph for this icon (Nerd Font icon)
    ///
    /// Unknown keys render as a generic window glyph.
    pub fn glyph(&self) -> &'static str {
        match self.0.as_str() {
            "library" => "󰉋",   // folder stack
            "canvas" => "󰕰",    // grid
            "inspector" => "", // sliders
            "console" => "",   // terminal
            "graph" => "󰙅",     // node tree
            "character" => "", // person
            "dialogue" => "",  // comment
            "chat" => "󰭹",      // chat bubble
            _ => "",
        }
    }
}

impl From<&str> for IconKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Title and icon tagged onto a panel for tab chrome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconKey>,
}

impl PanelMeta {
    pub fn new(title: impl Into<String>, icon: Option<IconKey>) -> Self {
        Self {
            title: title.into(),
            icon,
        }
    }

    /// Defaults for a region's single legacy panel
    pub fn for_region(region: Region) -> Self {
        Self::new(region.default_title(), Some(region.default_icon()))
    }
}

/// Caller-supplied description of one panel
#[derive(Debug, Clone)]
pub struct PanelDescriptor<C> {
    pub id: PanelId,
    pub title: String,
    pub icon: Option<IconKey>,
    /// `None` soft-hides the panel while keeping its place in the rail
    pub content: Option<C>,
}

impl<C> PanelDescriptor<C> {
    pub fn new(id: impl Into<PanelId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            content: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<IconKey>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_content(mut self, content: C) -> Self {
        self.content = Some(content);
        self
    }

    /// Replace content, `None` to hide
    pub fn with_optional_content(mut self, content: Option<C>) -> Self {
        self.content = content;
        self
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn meta(&self) -> PanelMeta {
        PanelMeta::new(self.title.clone(), self.icon.clone())
    }
}

/// Ordered panels bound to one region
///
/// The first panel anchors the region; the rest are tabs in its group.
#[derive(Debug, Clone)]
pub struct RailAssignment<C> {
    pub region: Region,
    pub panels: Vec<PanelDescriptor<C>>,
}

impl<C> RailAssignment<C> {
    pub fn new(region: Region, panels: Vec<PanelDescriptor<C>>) -> Self {
        Self { region, panels }
    }

    /// Descriptor currently anchoring this rail (first with content)
    pub fn anchor(&self) -> Option<&PanelDescriptor<C>> {
        self.panels.iter().find(|p| p.has_content())
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.panels.iter().any(|p| &p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
