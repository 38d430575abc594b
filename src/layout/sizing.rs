//! Size hints
//!
//! Callers describe side regions in percentages of the container. The dock
//! widget wants pixels, so hints are converted against the measured
//! container at the moment a split is created.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::panel::{Axis, Region};
use crate::widget::Measure;

/// Percentage size hint for one region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSize {
    #[serde(default, alias = "size_percent", skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_percent: Option<f64>,
}

impl RegionSize {
    pub fn percent(percent: f64) -> Self {
        Self {
            percent: Some(percent),
            min_percent: None,
        }
    }

    pub fn with_min(mut self, min_percent: f64) -> Self {
        self.min_percent = Some(min_percent);
        self
    }

    /// Field-wise fallback, skipping values that can't size a split
    pub fn or(self, fallback: RegionSize) -> RegionSize {
        RegionSize {
            percent: usable(self.percent).or(usable(fallback.percent)),
            min_percent: usable(self.min_percent).or(usable(fallback.min_percent)),
        }
    }
}

fn usable(percent: Option<f64>) -> Option<f64> {
    percent.filter(|p| p.is_finite() && *p > 0.0)
}

/// Size hints for every region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSizes(BTreeMap<Region, RegionSize>);

impl RegionSizes {
    pub fn get(&self, region: Region) -> RegionSize {
        self.0.get(&region).copied().unwrap_or_default()
    }

    pub fn set(&mut self, region: Region, size: RegionSize) {
        self.0.insert(region, size);
    }

    pub fn with(mut self, region: Region, size: RegionSize) -> Self {
        self.set(region, size);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Initial and minimum size of a new split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSize {
    pub initial: Measure,
    pub minimum: Measure,
}

/// Convert a region's hint into a split size
///
/// Hints that are absent, non-finite or not positive fall back to
/// `overrides`, then to the region's built-in defaults. When the container
/// has a finite positive extent the result is in pixels. An unmeasured
/// container ignores the hint and gets the default percentage unconverted.
/// Returns `None` for main.
pub fn resolve_split_size(
    region: Region,
    hint: RegionSize,
    overrides: RegionSize,
    measured: f64,
) -> Option<SplitSize> {
    region.split_direction()?;
    let built_in = RegionSize {
        percent: region.default_size_percent(),
        min_percent: region.default_min_percent(),
    };
    let defaults = overrides.or(built_in);

    if measured.is_finite() && measured > 0.0 {
        let resolved = hint.or(defaults);
        let percent = resolved.percent?;
        let min_percent = resolved.min_percent.unwrap_or(0.0);
        Some(SplitSize {
            initial: Measure::Px(measured * percent / 100.0),
            minimum: Measure::Px(measured * min_percent / 100.0),
        })
    } else {
        let percent = defaults.percent?;
        Some(SplitSize {
            initial: Measure::Percent(percent),
            minimum: Measure::Percent(defaults.min_percent.unwrap_or(0.0)),
        })
    }
}

/// Caller-requested hints layered over configured defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeHints {
    pub requested: RegionSizes,
    pub configured: RegionSizes,
}

impl SizeHints {
    pub fn new(requested: RegionSizes, configured: RegionSizes) -> Self {
        Self {
            requested,
            configured,
        }
    }

    /// Split size for a region in a container of `dimensions`
    pub fn split_size(&self, region: Region, dimensions: (f64, f64)) -> Option<SplitSize> {
        resolve_split_size(
            region,
            self.requested.get(region),
            self.configured.get(region),
            measured_extent(region, dimensions),
        )
    }
}

/// Container extent a region's size applies to
pub fn measured_extent(region: Region, (width, height): (f64, f64)) -> f64 {
    match region.axis() {
        Axis::Horizontal => width,
        Axis::Vertical => height,
    }
}
