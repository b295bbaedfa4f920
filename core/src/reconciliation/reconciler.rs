use std::collections::HashMap;

use crate::domain::{
    LocationSolution, SignalDetectionSnapshot, SignalDetectionSnapshotWithDiffs, SnapshotDiffs,
};
use crate::prelude::DefiningChange;

/// Merges the snapshots derived from the live associated-detection set with
/// the frozen snapshots of the comparison baseline (the last locate). Full
/// outer join on detection id: matched rows get value-level diffs, rows only
/// on the live side are newly associated, rows only on the baseline side
/// were rejected or dissociated since the last locate.
///
/// Emission order is associated rows first, then unmatched baseline rows.
pub fn reconcile_snapshots(
    associated: Vec<SignalDetectionSnapshotWithDiffs>,
    historical: &[SignalDetectionSnapshot],
) -> Vec<SignalDetectionSnapshotWithDiffs> {
    let baseline: HashMap<&str, &SignalDetectionSnapshot> = historical
        .iter()
        .map(|snapshot| (snapshot.signal_detection_id.as_str(), snapshot))
        .collect();

    let mut matched_ids: Vec<String> = Vec::new();
    let mut rows: Vec<SignalDetectionSnapshotWithDiffs> = Vec::new();

    for mut row in associated {
        match baseline.get(row.snapshot.signal_detection_id.as_str()) {
            Some(prior) => {
                matched_ids.push(row.snapshot.signal_detection_id.clone());
                row.diffs.is_associated_diff = Some(false);
                row.diffs.arrival_time_diff =
                    Some(row.snapshot.arrival_time.observed != prior.arrival_time.observed);
                row.diffs.azimuth_diff =
                    Some(row.snapshot.azimuth.observed != prior.azimuth.observed);
                row.diffs.slowness_diff =
                    Some(row.snapshot.slowness.observed != prior.slowness.observed);
                row.diffs.phase_diff = Some(row.snapshot.phase != prior.phase);
                row.rejected_or_unassociated = false;
            }
            None => {
                // Newly associated or created since the last locate; value
                // diffs are meaningless without a baseline.
                row.diffs.is_associated_diff = Some(true);
                row.diffs.arrival_time_defining_change = DefiningChange::NoChange;
                row.diffs.azimuth_defining_change = DefiningChange::NoChange;
                row.diffs.slowness_defining_change = DefiningChange::NoChange;
                row.rejected_or_unassociated = false;
            }
        }
        rows.push(row);
    }

    for snapshot in historical {
        if matched_ids
            .iter()
            .any(|id| id == &snapshot.signal_detection_id)
        {
            continue;
        }
        rows.push(SignalDetectionSnapshotWithDiffs {
            snapshot: snapshot.clone(),
            diffs: SnapshotDiffs {
                is_associated_diff: Some(true),
                ..SnapshotDiffs::default()
            },
            rejected_or_unassociated: true,
        });
    }

    rows
}

/// Historical-mode bypass: the selected old solution's frozen snapshots are
/// shown as-is, with nothing to compare them against. Rows produced here are
/// read-only in the table.
pub fn historical_snapshots_as_is(
    solution: &LocationSolution,
) -> Vec<SignalDetectionSnapshotWithDiffs> {
    solution
        .snapshots
        .iter()
        .map(|snapshot| SignalDetectionSnapshotWithDiffs {
            snapshot: snapshot.clone(),
            diffs: SnapshotDiffs {
                is_associated_diff: Some(false),
                ..SnapshotDiffs::default()
            },
            rejected_or_unassociated: false,
        })
        .collect()
}
