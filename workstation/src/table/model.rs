use seismocore::domain::{FeatureSnapshot, SignalDetectionSnapshotWithDiffs, SnapshotDiffs};
use serde::{Deserialize, Serialize};

/// Display cells for one defining type: the checkbox state plus formatted
/// value strings (blank when the underlying value is absent).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureCells {
    pub defining: bool,
    pub observed: String,
    pub residual: String,
    pub correction: String,
}

/// One table row per detection, ready for the front end: identity columns,
/// fixed-precision display strings, and the diff flags used for cell
/// styling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSDRow {
    pub detection_id: String,
    pub station: String,
    pub channel: String,
    pub phase: String,
    pub distance: String,
    pub arrival_time: FeatureCells,
    pub azimuth: FeatureCells,
    pub slowness: FeatureCells,
    pub diffs: SnapshotDiffs,
    pub rejected_or_unassociated: bool,
    /// False in historical mode; the "Def" checkboxes are read-only then.
    pub defining_editable: bool,
}

/// Formats reconciled snapshots into table rows. Distance renders with one
/// decimal; residuals, corrections, and observed azimuth/slowness/time with
/// three.
pub fn build_rows(
    snapshots: &[SignalDetectionSnapshotWithDiffs],
    defining_editable: bool,
) -> Vec<LocationSDRow> {
    snapshots
        .iter()
        .map(|row| LocationSDRow {
            detection_id: row.snapshot.signal_detection_id.clone(),
            station: row.snapshot.station_name.clone(),
            channel: row.snapshot.channel_name.clone(),
            phase: row.snapshot.phase.clone(),
            distance: format_fixed(row.snapshot.distance_km, 1),
            arrival_time: feature_cells(&row.snapshot.arrival_time),
            azimuth: feature_cells(&row.snapshot.azimuth),
            slowness: feature_cells(&row.snapshot.slowness),
            diffs: row.diffs.clone(),
            rejected_or_unassociated: row.rejected_or_unassociated,
            defining_editable,
        })
        .collect()
}

fn feature_cells(feature: &FeatureSnapshot) -> FeatureCells {
    FeatureCells {
        defining: feature.defining,
        observed: format_fixed(feature.observed, 3),
        residual: format_fixed(feature.residual, 3),
        correction: format_fixed(feature.correction, 3),
    }
}

fn format_fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{:.*}", decimals, value),
        None => String::new(),
    }
}
