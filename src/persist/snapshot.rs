//! Persisted snapshot format and validity check
//!
//! Snapshots are written as an envelope carrying a format version and the
//! fingerprint of the layout shape they were taken under. A snapshot taken
//! under a different shape is discarded rather than restored into a
//! descriptor set it can't describe.
//!
//! Snapshots written before the envelope existed are bare widget JSON. For
//! those, the only check available is whether they mention legacy
//! single-panel ids of regions that are now rails. That check only catches
//! that one collision.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collect::LayoutShape;

/// Current envelope format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub version: u32,
    pub shape: String,
    pub layout: Value,
}

/// Wrap widget JSON for persistence
pub fn encode_snapshot(layout: Value, shape: &LayoutShape) -> Result<String> {
    let envelope = SnapshotEnvelope {
        version: SNAPSHOT_VERSION,
        shape: shape.fingerprint(),
        layout,
    };
    serde_json::to_string(&envelope).context("Failed to serialize layout snapshot")
}

/// Why a stored snapshot was not used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotRejection {
    Empty,
    Unparsable(String),
    VersionMismatch(u32),
    ShapeMismatch(String),
    LegacyIds(Vec<String>),
}

/// Widget JSON from a stored snapshot, if it can be trusted under `shape`
pub fn validate_snapshot(raw: Option<&str>, shape: &LayoutShape) -> Option<Value> {
    match check_snapshot(raw, shape) {
        Ok(layout) => Some(layout),
        Err(SnapshotRejection::Empty) => None,
        Err(rejection) => {
            tracing::warn!(?rejection, "discarding stored layout");
            None
        }
    }
}

/// Same as `validate_snapshot`, reporting the reason for rejection
pub fn check_snapshot(raw: Option<&str>, shape: &LayoutShape) -> Result<Value, SnapshotRejection> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() || raw == "null" {
        return Err(SnapshotRejection::Empty);
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|e| SnapshotRejection::Unparsable(e.to_string()))?;

    let enveloped = value.get("version").is_some() && value.get("layout").is_some();
    if enveloped {
        let envelope: SnapshotEnvelope = serde_json::from_value(value)
            .map_err(|e| SnapshotRejection::Unparsable(e.to_string()))?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(SnapshotRejection::VersionMismatch(envelope.version));
        }
        if envelope.shape != shape.fingerprint() {
            return Err(SnapshotRejection::ShapeMismatch(envelope.shape));
        }
        return Ok(envelope.layout);
    }

    // Bare snapshot: ids are embedded verbatim as JSON strings
    let collisions: Vec<String> = shape
        .rails
        .iter()
        .map(|region| region.name())
        .filter(|name| raw.contains(&format!("\"{}\"", name)))
        .map(str::to_string)
        .collect();
    if !collisions.is_empty() {
        return Err(SnapshotRejection::LegacyIds(collisions));
    }
    Ok(value)
}
