//! Layout persistence
//!
//! Persistence is best-effort: a failed read is an absent snapshot, a
//! failed write is logged and forgotten. Nothing here can stop a layout
//! from rendering.
//!
//! Three strategies, selected once when the engine is built:
//! - `StorageStrategy`: self-managed, keyed `"<namespace>-<layoutId>"`
//! - `ControlledStrategy`: the caller owns the JSON and is told about changes
//! - `EphemeralStrategy`: nothing is persisted

mod snapshot;
mod storage;

pub use snapshot::{
    check_snapshot, encode_snapshot, validate_snapshot, SnapshotEnvelope, SnapshotRejection,
    SNAPSHOT_VERSION,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Load/save/clear of a serialized layout
pub trait PersistenceStrategy {
    /// Stored snapshot, `None` when absent or unreadable
    fn load(&self) -> Option<String>;

    fn save(&mut self, json: &str);

    fn clear(&mut self);

    /// New caller-supplied JSON; ignored by strategies that own their data
    fn set_controlled_json(&mut self, _json: Option<String>) {}
}

/// Storage key for a layout id
pub fn storage_key(namespace: &str, layout_id: &str) -> String {
    format!("{}-{}", namespace, layout_id)
}

/// Self-managed persistence through a key-value storage
pub struct StorageStrategy<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> StorageStrategy<S> {
    pub fn new(storage: S, namespace: &str, layout_id: &str) -> Self {
        Self {
            storage,
            key: storage_key(namespace, layout_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: KeyValueStorage> PersistenceStrategy for StorageStrategy<S> {
    fn load(&self) -> Option<String> {
        match self.storage.get(&self.key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read stored layout: {:#}", e);
                None
            }
        }
    }

    fn save(&mut self, json: &str) {
        if let Err(e) = self.storage.set(&self.key, json) {
            tracing::warn!(key = %self.key, "Failed to store layout: {:#}", e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, "Failed to remove stored layout: {:#}", e);
        }
    }
}

/// Callback invoked with the serialized layout on every change
pub type LayoutChangeCallback = Box<dyn FnMut(String)>;

/// Callback invoked when the layout is reset
pub type LayoutClearCallback = Box<dyn FnMut()>;

/// Caller-owned persistence
pub struct ControlledStrategy {
    json: Option<String>,
    on_change: LayoutChangeCallback,
    on_clear: LayoutClearCallback,
}

impl ControlledStrategy {
    pub fn new(
        json: Option<String>,
        on_change: LayoutChangeCallback,
        on_clear: LayoutClearCallback,
    ) -> Self {
        Self {
            json,
            on_change,
            on_clear,
        }
    }
}

impl PersistenceStrategy for ControlledStrategy {
    fn load(&self) -> Option<String> {
        self.json.clone()
    }

    fn save(&mut self, json: &str) {
        self.json = Some(json.to_string());
        (self.on_change)(json.to_string());
    }

    fn clear(&mut self) {
        self.json = None;
        (self.on_clear)();
    }

    fn set_controlled_json(&mut self, json: Option<String>) {
        self.json = json;
    }
}

/// No persistence
#[derive(Debug, Default)]
pub struct EphemeralStrategy;

impl PersistenceStrategy for EphemeralStrategy {
    fn load(&self) -> Option<String> {
        None
    }

    fn save(&mut self, _json: &str) {}

    fn clear(&mut self) {}
}

/// How a layout is persisted
///
/// Controlled mode takes both callbacks or neither; there is no way to
/// supply only one.
pub enum PersistenceMode {
    Ephemeral,
    Storage {
        layout_id: String,
        storage: Box<dyn KeyValueStorage>,
    },
    Controlled {
        json: Option<String>,
        on_change: LayoutChangeCallback,
        on_clear: LayoutClearCallback,
    },
}

impl std::fmt::Debug for PersistenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceMode::Ephemeral => f.write_str("Ephemeral"),
            PersistenceMode::Storage { layout_id, .. } => f
                .debug_struct("Storage")
                .field("layout_id", layout_id)
                .finish_non_exhaustive(),
            PersistenceMode::Controlled { json, .. } => f
                .debug_struct("Controlled")
                .field("has_json", &json.is_some())
                .finish_non_exhaustive(),
        }
    }
}

impl KeyValueStorage for Box<dyn KeyValueStorage> {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key)
    }
}

impl PersistenceMode {
    /// Build the strategy for this mode
    pub fn into_strategy(self, namespace: &str) -> Box<dyn PersistenceStrategy> {
        match self {
            PersistenceMode::Ephemeral => Box::new(EphemeralStrategy),
            PersistenceMode::Storage { layout_id, storage } => {
                Box::new(StorageStrategy::new(storage, namespace, &layout_id))
            }
            PersistenceMode::Controlled {
                json,
                on_change,
                on_clear,
            } => Box::new(ControlledStrategy::new(json, on_change, on_clear)),
        }
    }
}
