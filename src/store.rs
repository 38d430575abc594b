//! Content store
//!
//! A single-writer observable cell mapping panel ids to their current
//! content. The engine writes it once per update, before touching the dock
//! widget; panel renderers read it through `PanelContent` at render time
//! instead of holding on to content themselves, so a content swap reaches
//! already-mounted panels without the widget re-creating them.
//!
//! One store belongs to one engine instance. Single-threaded by design of
//! the surrounding UI loop (`Rc`/`RefCell`).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::collect::ResolvedSlotMap;
use crate::panel::PanelId;

type Callback = Rc<dyn Fn(&PanelId)>;

#[derive(Default)]
struct Subscribers {
    next_key: u64,
    entries: Vec<(u64, PanelId, Callback)>,
}

struct StoreState<C> {
    map: ResolvedSlotMap<C>,
    version: u64,
}

/// Observable id → content map
pub struct ContentStore<C> {
    state: Rc<RefCell<StoreState<C>>>,
    subscribers: Rc<RefCell<Subscribers>>,
}

impl<C> Clone for ContentStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<C> Default for ContentStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for ContentStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ContentStore")
            .field("ids", &state.map.ids().collect::<Vec<_>>())
            .field("version", &state.version)
            .finish()
    }
}

impl<C> ContentStore<C> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                map: ResolvedSlotMap::default(),
                version: 0,
            })),
            subscribers: Rc::new(RefCell::new(Subscribers::default())),
        }
    }

    /// Swap in a new map and notify subscribers of every id present before
    /// or after the swap
    pub fn replace(&self, map: ResolvedSlotMap<C>) {
        let touched: Vec<PanelId> = {
            let mut state = self.state.borrow_mut();
            let mut ids: Vec<PanelId> = state.map.ids().chain(map.ids()).cloned().collect();
            ids.sort();
            ids.dedup();
            state.map = map;
            state.version += 1;
            ids
        };

        // Callbacks run with no borrow held so they can read the store
        let callbacks: Vec<(PanelId, Callback)> = self
            .subscribers
            .borrow()
            .entries
            .iter()
            .filter(|(_, id, _)| touched.binary_search(id).is_ok())
            .map(|(_, id, callback)| (id.clone(), Rc::clone(callback)))
            .collect();
        for (id, callback) in callbacks {
            callback(&id);
        }
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.state.borrow().map.contains(id)
    }

    pub fn is_present(&self, id: &PanelId) -> bool {
        self.state.borrow().map.is_present(id)
    }

    /// Incremented on every `replace`
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    pub fn ids(&self) -> Vec<PanelId> {
        self.state.borrow().map.ids().cloned().collect()
    }

    /// Observe writes touching `id`. Dropping the returned handle
    /// unsubscribes.
    pub fn subscribe(&self, id: PanelId, callback: impl Fn(&PanelId) + 'static) -> Subscription {
        let mut subscribers = self.subscribers.borrow_mut();
        let key = subscribers.next_key;
        subscribers.next_key += 1;
        subscribers.entries.push((key, id, Rc::new(callback)));
        Subscription {
            subscribers: Rc::downgrade(&self.subscribers),
            key,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }

    /// Reader bound to one panel id
    pub fn panel(&self, id: PanelId) -> PanelContent<C> {
        PanelContent {
            store: self.clone(),
            id,
        }
    }
}

impl<C: Clone> ContentStore<C> {
    pub fn get(&self, id: &PanelId) -> Option<C> {
        self.state.borrow().map.get(id).cloned()
    }
}

/// Handle for a store subscription
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    subscribers: Weak<RefCell<Subscribers>>,
    key: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            if let Ok(mut subscribers) = subscribers.try_borrow_mut() {
                subscribers.entries.retain(|(key, _, _)| *key != self.key);
            }
        }
    }
}

/// Per-panel view of the store used by panel rendering adapters
#[derive(Debug, Clone)]
pub struct PanelContent<C> {
    store: ContentStore<C>,
    id: PanelId,
}

impl<C> PanelContent<C> {
    pub fn id(&self) -> &PanelId {
        &self.id
    }

    pub fn is_present(&self) -> bool {
        self.store.is_present(&self.id)
    }

    pub fn subscribe(&self, callback: impl Fn(&PanelId) + 'static) -> Subscription {
        self.store.subscribe(self.id.clone(), callback)
    }
}

impl<C: Clone> PanelContent<C> {
    /// Content as of now; always read from the store
    pub fn current(&self) -> Option<C> {
        self.store.get(&self.id)
    }
}
