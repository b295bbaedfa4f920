use crate::domain::{
    FeatureMeasurementType, FeatureSnapshot, LocationBehavior, LocationSolution, SignalDetection,
    SignalDetectionSnapshot, SignalDetectionSnapshotWithDiffs, SnapshotDiffs,
};
use crate::math::geo::GeoHelper;
use crate::prelude::{DefiningChange, DefiningType};
use crate::reconciliation::behavior::find_behavior;
use crate::reconciliation::row_changes::RowOverride;

/// Projects a live detection, the current solution's behaviors, and any
/// pending override into a snapshot row. Only the defining-change flags are
/// populated on `diffs`; the association and value diffs are filled by the
/// reconciler once a historical counterpart is known.
pub fn build_snapshot(
    detection: &SignalDetection,
    behaviors: &[LocationBehavior],
    pending: RowOverride,
    reference: Option<&LocationSolution>,
) -> SignalDetectionSnapshotWithDiffs {
    let arrival_time = feature_snapshot(DefiningType::ArrivalTime, detection, behaviors, pending);
    let azimuth = feature_snapshot(DefiningType::Azimuth, detection, behaviors, pending);
    let slowness = feature_snapshot(DefiningType::Slowness, detection, behaviors, pending);

    let distance_km = match (detection.station_location, reference) {
        (Some(station), Some(solution)) => Some(GeoHelper::great_circle_km(
            solution.latitude_degrees,
            solution.longitude_degrees,
            station.latitude_degrees,
            station.longitude_degrees,
        )),
        _ => None,
    };

    let snapshot = SignalDetectionSnapshot {
        signal_detection_id: detection.id.clone(),
        hypothesis_id: detection.current_hypothesis.id.clone(),
        station_name: detection.station_name.clone(),
        channel_name: channel_name(detection),
        phase: detection.phase(),
        distance_km,
        arrival_time,
        azimuth,
        slowness,
    };

    let diffs = SnapshotDiffs {
        arrival_time_defining_change: defining_change(
            DefiningType::ArrivalTime,
            detection,
            behaviors,
            pending,
        ),
        azimuth_defining_change: defining_change(
            DefiningType::Azimuth,
            detection,
            behaviors,
            pending,
        ),
        slowness_defining_change: defining_change(
            DefiningType::Slowness,
            detection,
            behaviors,
            pending,
        ),
        ..SnapshotDiffs::default()
    };

    SignalDetectionSnapshotWithDiffs {
        snapshot,
        diffs,
        rejected_or_unassociated: false,
    }
}

fn feature_snapshot(
    defining_type: DefiningType,
    detection: &SignalDetection,
    behaviors: &[LocationBehavior],
    pending: RowOverride,
) -> FeatureSnapshot {
    let behavior = find_behavior(defining_type, detection, behaviors);
    let original = behavior.map(|b| b.defining).unwrap_or(false);
    let change = DefiningChange::from_override(original, pending.get(defining_type));
    let observed = detection
        .measurement(FeatureMeasurementType::for_defining(defining_type))
        .and_then(|fm| fm.value.scalar());

    FeatureSnapshot {
        defining: change.reconcile(original),
        observed,
        residual: behavior.map(|b| b.residual),
        // Not populated by the source data.
        correction: None,
    }
}

fn defining_change(
    defining_type: DefiningType,
    detection: &SignalDetection,
    behaviors: &[LocationBehavior],
    pending: RowOverride,
) -> DefiningChange {
    let original = find_behavior(defining_type, detection, behaviors)
        .map(|b| b.defining)
        .unwrap_or(false);
    DefiningChange::from_override(original, pending.get(defining_type))
}

/// Channel label from the arrival-time measurement's segment name: the
/// substring after the first `/` up to the next space. Detections without
/// an arrival-time segment yield an empty name.
fn channel_name(detection: &SignalDetection) -> String {
    let segment = detection
        .measurement(FeatureMeasurementType::ArrivalTime)
        .and_then(|fm| fm.channel_segment_name.as_deref());
    match segment {
        Some(name) => {
            let after = match name.find('/') {
                Some(idx) => &name[idx + 1..],
                None => name,
            };
            match after.find(' ') {
                Some(idx) => after[..idx].to_string(),
                None => after.to_string(),
            }
        }
        None => String::new(),
    }
}
