use serde::{Deserialize, Serialize};

use crate::prelude::DefiningChange;

/// Per-feature-type slice of a snapshot: the defining flag and the values
/// the table displays for it. `correction` is carried for the table layout
/// but the source data never populates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureSnapshot {
    pub defining: bool,
    pub observed: Option<f64>,
    pub residual: Option<f64>,
    pub correction: Option<f64>,
}

/// Frozen, point-in-time copy of one detection's location-relevant values.
/// Stored inside a location solution at computation time and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalDetectionSnapshot {
    pub signal_detection_id: String,
    pub hypothesis_id: String,
    pub station_name: String,
    pub channel_name: String,
    pub phase: String,
    pub distance_km: Option<f64>,
    pub arrival_time: FeatureSnapshot,
    pub azimuth: FeatureSnapshot,
    pub slowness: FeatureSnapshot,
}

/// Field-level comparison flags against the historical baseline. `None`
/// means the diff was not computed (no baseline to compare against).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotDiffs {
    pub is_associated_diff: Option<bool>,
    pub arrival_time_defining_change: DefiningChange,
    pub azimuth_defining_change: DefiningChange,
    pub slowness_defining_change: DefiningChange,
    pub arrival_time_diff: Option<bool>,
    pub azimuth_diff: Option<bool>,
    pub slowness_diff: Option<bool>,
    pub phase_diff: Option<bool>,
}

/// Snapshot plus its diff flags; rebuilt from scratch on every
/// recomputation and owned by the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalDetectionSnapshotWithDiffs {
    pub snapshot: SignalDetectionSnapshot,
    pub diffs: SnapshotDiffs,
    pub rejected_or_unassociated: bool,
}
