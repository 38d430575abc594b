//! Dock layout engine
//!
//! Owns one dock widget and keeps it in step with the caller's descriptor
//! set. Everything the widget does is learned from its event queue, which
//! `pump` drains:
//!
//! - `Ready`: restore the persisted snapshot, or seed defaults, then
//!   reconcile
//! - `LayoutChanged`: persist the new snapshot
//! - `PanelRemoved`: tell the caller, unless the engine closed it itself

use std::cell::Cell;
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use crate::collect::{CollectedLayout, LayoutShape};
use crate::config::LayoutConfig;
use crate::panel::{PanelId, RailAssignment, Region};
use crate::persist::{
    encode_snapshot, validate_snapshot, FileStorage, KeyValueStorage, LayoutChangeCallback,
    LayoutClearCallback, MemoryStorage, PersistenceMode, PersistenceStrategy,
};
use crate::store::{ContentStore, PanelContent};
use crate::tab::{close_tab, tab_chrome, TabAction, TabChrome};
use crate::widget::{DockEvent, DockTree, DockWidget};

use super::builder::{main_anchor, seed_default_layout};
use super::reconcile::{reconcile, ReconcileReport};
use super::sizing::{RegionSize, RegionSizes, SizeHints};

/// Called with the id of a panel the user closed
pub type PanelClosedCallback = Box<dyn FnMut(&PanelId)>;

/// Handle for resetting a layout from outside the engine
///
/// The reset runs on the engine's next `pump`/`update`.
#[derive(Debug, Clone, Default)]
pub struct LayoutRef {
    reset: Rc<Cell<bool>>,
}

impl LayoutRef {
    /// Discard the persisted layout and reseed defaults
    pub fn reset_layout(&self) {
        self.reset.set(true);
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset.get()
    }
}

/// Construction options for `DockLayout`
#[derive(Default)]
pub struct DockLayoutOptions {
    layout_id: Option<String>,
    storage: Option<Box<dyn KeyValueStorage>>,
    controlled: Option<(Option<String>, LayoutChangeCallback, LayoutClearCallback)>,
    sizes: RegionSizes,
    on_panel_closed: Option<PanelClosedCallback>,
    config: Option<LayoutConfig>,
}

impl DockLayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist under `"<namespace>-<layout_id>"` in self-managed storage
    pub fn layout_id(mut self, layout_id: impl Into<String>) -> Self {
        self.layout_id = Some(layout_id.into());
        self
    }

    /// Storage used with `layout_id`; defaults to files in the config dir
    pub fn storage(mut self, storage: impl KeyValueStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Caller-owned persistence. Takes precedence over `layout_id`.
    pub fn controlled(
        mut self,
        json: Option<String>,
        on_change: impl FnMut(String) + 'static,
        on_clear: impl FnMut() + 'static,
    ) -> Self {
        self.controlled = Some((json, Box::new(on_change), Box::new(on_clear)));
        self
    }

    pub fn region_size(mut self, region: Region, size: RegionSize) -> Self {
        self.sizes.set(region, size);
        self
    }

    pub fn on_panel_closed(mut self, callback: impl FnMut(&PanelId) + 'static) -> Self {
        self.on_panel_closed = Some(Box::new(callback));
        self
    }

    pub fn config(mut self, config: LayoutConfig) -> Self {
        self.config = Some(config);
        self
    }

    fn persistence_mode(&mut self) -> PersistenceMode {
        if let Some((json, on_change, on_clear)) = self.controlled.take() {
            if self.layout_id.is_some() {
                tracing::debug!("controlled layout ignores layout_id");
            }
            return PersistenceMode::Controlled {
                json,
                on_change,
                on_clear,
            };
        }

        let Some(layout_id) = self.layout_id.take() else {
            return PersistenceMode::Ephemeral;
        };
        let storage = self.storage.take().unwrap_or_else(default_storage);
        PersistenceMode::Storage { layout_id, storage }
    }
}

fn default_storage() -> Box<dyn KeyValueStorage> {
    match FileStorage::in_config_dir() {
        Some(storage) => Box::new(storage),
        None => {
            tracing::warn!("No config directory available, layouts will not outlive the process");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Declarative dock layout over an imperative dock widget
pub struct DockLayout<C, W: DockWidget = DockTree> {
    widget: W,
    store: ContentStore<C>,
    collected: CollectedLayout<C>,
    persistence: Box<dyn PersistenceStrategy>,
    sizes: SizeHints,
    config: LayoutConfig,
    on_panel_closed: Option<PanelClosedCallback>,
    /// Reconcile key of the latest update
    current_key: String,
    /// Reconcile key the live widget was last reconciled against
    reconciled_key: Option<String>,
    /// Ids of the latest resolved map
    known_ids: BTreeSet<PanelId>,
    /// Ids whose descriptor went away and still need closing
    retired: BTreeSet<PanelId>,
    /// Ids the engine itself has closed whose `PanelRemoved` is pending
    self_closed: HashSet<PanelId>,
    /// Absent-content ids of the latest update
    absent: Vec<PanelId>,
    main_anchor: Option<PanelId>,
    live: bool,
    generation: u64,
    layout_ref: LayoutRef,
}

impl<C: Clone, W: DockWidget> DockLayout<C, W> {
    pub fn new(widget: W, mut options: DockLayoutOptions) -> Self {
        let config = options.config.take().unwrap_or_default();
        let persistence = options
            .persistence_mode()
            .into_strategy(&config.storage_namespace);
        let sizes = SizeHints::new(std::mem::take(&mut options.sizes), config.regions.clone());

        Self {
            widget,
            store: ContentStore::new(),
            collected: CollectedLayout::new(),
            persistence,
            sizes,
            config,
            on_panel_closed: options.on_panel_closed.take(),
            current_key: String::new(),
            reconciled_key: None,
            known_ids: BTreeSet::new(),
            retired: BTreeSet::new(),
            self_closed: HashSet::new(),
            absent: Vec::new(),
            main_anchor: None,
            live: false,
            generation: 0,
            layout_ref: LayoutRef::default(),
        }
    }

    // =========================================================================
    // Render cycle
    // =========================================================================

    /// Apply a new descriptor set
    ///
    /// The content store is written before the widget is touched, so panels
    /// mounted during this update already see their content.
    pub fn update(&mut self, collected: CollectedLayout<C>) {
        let map = collected.resolved();
        let ids: BTreeSet<PanelId> = map.ids().cloned().collect();

        self.retired.extend(self.known_ids.difference(&ids).cloned());
        self.retired.retain(|id| !ids.contains(id));
        self.absent = map.absent_ids().cloned().collect();
        self.current_key = map.reconcile_key();
        self.known_ids = ids;
        self.collected = collected;

        self.store.replace(map);

        if self.live && self.reconciled_key.as_deref() != Some(self.current_key.as_str()) {
            self.reconcile();
        }
        self.pump();
    }

    /// Drain widget events until there are none left
    pub fn pump(&mut self) {
        if self.layout_ref.reset.replace(false) {
            self.reset_layout();
            return;
        }

        loop {
            let events = self.widget.take_events();
            if events.is_empty() {
                break;
            }

            let mut changed = false;
            for event in events {
                match event {
                    DockEvent::Ready => self.on_ready(),
                    DockEvent::LayoutChanged => changed = true,
                    DockEvent::PanelRemoved(id) => self.on_panel_removed(id),
                    DockEvent::ActivePanelChanged(id) => {
                        tracing::trace!(panel = ?id, "active panel changed");
                    }
                }
            }
            if changed && self.live {
                self.save();
            }
        }
    }

    /// Discard the persisted layout and remount the widget with defaults
    pub fn reset_layout(&mut self) {
        tracing::info!(generation = self.generation + 1, "resetting layout");
        self.persistence.clear();
        self.generation += 1;
        self.live = false;
        self.reconciled_key = None;
        self.self_closed.clear();
        self.widget.remount();
        self.pump();
    }

    fn on_ready(&mut self) {
        self.live = true;
        let rails = self.collected.rails();
        let shape = self.collected.shape();

        if self.restore(&shape) {
            self.main_anchor = main_anchor(&rails);
            self.prune_undescribed();
        } else {
            self.widget.clear();
            let report = seed_default_layout(&mut self.widget, &rails, &self.sizes);
            self.main_anchor = report.main_anchor;
        }
        self.reconcile_rails(&rails);
    }

    fn restore(&mut self, shape: &LayoutShape) -> bool {
        let raw = self.persistence.load();
        let Some(layout) = validate_snapshot(raw.as_deref(), shape) else {
            return false;
        };
        match self.widget.from_json(&layout) {
            Ok(()) => {
                tracing::info!(shape = %shape.fingerprint(), "restored layout");
                true
            }
            Err(e) => {
                tracing::warn!("Failed to restore layout, using defaults: {:#}", e);
                false
            }
        }
    }

    /// Close restored panels that no descriptor mentions
    fn prune_undescribed(&mut self) {
        for id in self.widget.panel_ids() {
            if !self.collected.describes(&id) && self.widget.remove_panel(&id) {
                tracing::debug!(panel = %id, "pruned restored panel");
                self.self_closed.insert(id);
            }
        }
    }

    fn reconcile(&mut self) {
        let rails = self.collected.rails();
        self.reconcile_rails(&rails);
    }

    fn reconcile_rails(&mut self, rails: &[RailAssignment<C>]) -> ReconcileReport {
        let closing: Vec<PanelId> = self
            .absent
            .iter()
            .chain(self.retired.iter())
            .cloned()
            .collect();
        let report = reconcile(
            &mut self.widget,
            rails,
            closing,
            self.main_anchor.as_ref(),
            &self.sizes,
        );
        self.self_closed.extend(report.removed.iter().cloned());
        self.retired.clear();
        self.reconciled_key = Some(self.current_key.clone());
        if !report.is_empty() {
            tracing::debug!(added = ?report.added, removed = ?report.removed, "reconciled");
        }
        report
    }

    fn on_panel_removed(&mut self, id: PanelId) {
        if self.self_closed.remove(&id) {
            return;
        }
        tracing::debug!(panel = %id, "panel closed by user");
        if let Some(callback) = self.on_panel_closed.as_mut() {
            callback(&id);
        }
    }

    fn save(&mut self) {
        let layout = match self.widget.to_json() {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!("Failed to serialize layout: {:#}", e);
                return;
            }
        };
        match encode_snapshot(layout, &self.collected.shape()) {
            Ok(json) => self.persistence.save(&json),
            Err(e) => tracing::warn!("Failed to encode layout snapshot: {:#}", e),
        }
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    /// Chrome for every live panel, in layout order
    pub fn tabs(&self) -> Vec<TabChrome> {
        self.widget
            .panel_ids()
            .iter()
            .filter_map(|id| self.tab(id))
            .collect()
    }

    pub fn tab(&self, id: &PanelId) -> Option<TabChrome> {
        tab_chrome(
            &self.widget,
            id,
            self.collected.meta(id),
            self.config.tab_title_max_chars,
        )
    }

    /// Apply a tab interaction; returns whether the widget acted on it
    pub fn handle_tab_action(&mut self, action: TabAction) -> bool {
        let handled = match &action {
            TabAction::Activate(id) => self.widget.activate_panel(id),
            TabAction::Close(id) => close_tab(&mut self.widget, id),
        };
        if !handled {
            tracing::debug!(?action, "tab action on a panel that isn't live");
        }
        self.pump();
        handled
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current content of a panel
    pub fn content(&self, id: &PanelId) -> Option<C> {
        self.store.get(id)
    }

    /// Live view of a panel's content, for panel renderers
    pub fn panel_content(&self, id: impl Into<PanelId>) -> PanelContent<C> {
        self.store.panel(id.into())
    }

    pub fn store(&self) -> &ContentStore<C> {
        &self.store
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Direct widget access, e.g. to simulate user drags in tests
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Bumped on every reset; a new generation is a fresh widget
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout_ref(&self) -> LayoutRef {
        self.layout_ref.clone()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the caller-owned JSON; no-op outside controlled mode
    pub fn set_controlled_json(&mut self, json: Option<String>) {
        self.persistence.set_controlled_json(json);
    }
}

impl<C, W: DockWidget> std::fmt::Debug for DockLayout<C, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockLayout")
            .field("live", &self.live)
            .field("generation", &self.generation)
            .field("panels", &self.widget.panel_ids())
            .field("main_anchor", &self.main_anchor)
            .finish_non_exhaustive()
    }
}
