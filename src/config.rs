//! Layout engine configuration
//!
//! Stores engine defaults in `~/.config/studio-layout/layout.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::layout::RegionSizes;

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Prefix of self-managed storage keys (`"<namespace>-<layoutId>"`)
    #[serde(default = "default_storage_namespace")]
    pub storage_namespace: String,

    /// Tab titles longer than this are truncated with an ellipsis
    #[serde(default = "default_tab_title_max_chars")]
    pub tab_title_max_chars: usize,

    /// Region size defaults, used where callers give no hint
    #[serde(default, skip_serializing_if = "RegionSizes::is_empty")]
    pub regions: RegionSizes,
}

fn default_storage_namespace() -> String {
    "dockview".to_string()
}

fn default_tab_title_max_chars() -> usize {
    24
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            storage_namespace: default_storage_namespace(),
            tab_title_max_chars: default_tab_title_max_chars(),
            regions: RegionSizes::default(),
        }
    }
}

impl LayoutConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded layout config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved layout config to {}", path.display());
        Ok(())
    }
}
