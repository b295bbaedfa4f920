use serde::{Deserialize, Serialize};

use crate::domain::{EventHypothesis, SignalDetection};
use crate::prelude::{DefiningChange, DefiningType};
use crate::reconciliation::behavior::find_behavior;
use crate::reconciliation::row_changes::RowChangeAccumulator;

/// Mean Earth radius in km; upper sanity bound for solution depth.
const MAX_DEPTH_KM: f64 = 6371.0;

/// Whether a locate may be triggered, with a display reason when it may not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocateEligibility {
    pub disabled: bool,
    pub reason: Option<String>,
}

impl LocateEligibility {
    fn enabled() -> Self {
        Self {
            disabled: false,
            reason: None,
        }
    }

    fn blocked(reason: impl Into<String>) -> Self {
        Self {
            disabled: true,
            reason: Some(reason.into()),
        }
    }
}

/// Validates whether a locate is currently permitted. Checks run in
/// precedence order and the first failing reason wins: missing data, then
/// geographic sanity of the latest solution set, then the configured
/// minimum count of defining behaviors after pending overrides.
pub fn can_locate(
    detections: Option<&[SignalDetection]>,
    event: Option<&EventHypothesis>,
    accumulator: &RowChangeAccumulator,
    minimum_defining_count: usize,
) -> LocateEligibility {
    let (detections, event) = match (detections, event) {
        (Some(detections), Some(event)) => (detections, event),
        _ => return LocateEligibility::blocked("invalid data"),
    };

    let latest = match event.latest_solution_set() {
        Some(set) => set,
        None => return LocateEligibility::blocked("invalid data"),
    };

    let attributes_valid = latest.solutions.iter().all(|solution| {
        (0.0..=MAX_DEPTH_KM).contains(&solution.depth_km)
            && solution.latitude_degrees.abs() <= 90.0
            && solution.longitude_degrees.abs() <= 180.0
    });
    if !attributes_valid {
        return LocateEligibility::blocked("bad location attributes");
    }

    if defining_count(detections, event, accumulator) < minimum_defining_count {
        return LocateEligibility::blocked(format!(
            "{} defining behaviors required",
            minimum_defining_count
        ));
    }

    LocateEligibility::enabled()
}

/// Counts defining behaviors across all associated detections and all three
/// defining types, with pending overrides applied on top of the preferred
/// solution's behaviors.
fn defining_count(
    detections: &[SignalDetection],
    event: &EventHypothesis,
    accumulator: &RowChangeAccumulator,
) -> usize {
    let behaviors = event
        .preferred_solution()
        .map(|solution| solution.location_behaviors.as_slice())
        .unwrap_or(&[]);

    detections
        .iter()
        .map(|detection| {
            let pending = accumulator.override_for(&detection.id);
            DefiningType::ALL
                .iter()
                .filter(|&&defining_type| {
                    let original = find_behavior(defining_type, detection, behaviors)
                        .map(|b| b.defining)
                        .unwrap_or(false);
                    DefiningChange::from_override(original, pending.get(defining_type))
                        .reconcile(original)
                })
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        FeatureMeasurement, FeatureMeasurementType, LocationBehavior, LocationSolution,
        LocationSolutionSet, MeasurementValue, SignalDetectionHypothesis,
    };

    fn detection(id: &str) -> SignalDetection {
        SignalDetection {
            id: id.into(),
            station_name: "STKA".into(),
            station_location: None,
            current_hypothesis: SignalDetectionHypothesis {
                id: format!("{}-hyp", id),
                rejected: false,
                feature_measurements: vec![FeatureMeasurement {
                    id: format!("{}-fm-time", id),
                    measurement_type: FeatureMeasurementType::ArrivalTime,
                    value: MeasurementValue::Instant { value: 10.0 },
                    channel_segment_name: None,
                }],
            },
        }
    }

    fn event(depth_km: f64, defining: &[&str]) -> EventHypothesis {
        let behaviors = defining
            .iter()
            .map(|id| LocationBehavior {
                feature_measurement_id: format!("{}-fm-time", id),
                feature_prediction_id: format!("{}-fp", id),
                residual: 0.0,
                weight: 1.0,
                defining: true,
            })
            .collect();
        EventHypothesis {
            id: "eh-1".into(),
            event_id: "ev-1".into(),
            preferred_location_solution_id: "ls-1".into(),
            location_solution_sets: vec![LocationSolutionSet {
                id: "lss-1".into(),
                solutions: vec![LocationSolution {
                    id: "ls-1".into(),
                    latitude_degrees: 12.0,
                    longitude_degrees: 35.0,
                    depth_km,
                    time_secs: 0.0,
                    location_behaviors: behaviors,
                    snapshots: Vec::new(),
                }],
            }],
        }
    }

    #[test]
    fn missing_data_blocks_first() {
        let acc = RowChangeAccumulator::new();
        let result = can_locate(None, None, &acc, 1);
        assert!(result.disabled);
        assert_eq!(result.reason.as_deref(), Some("invalid data"));

        let detections = vec![detection("sd-1")];
        let result = can_locate(Some(&detections), None, &acc, 1);
        assert_eq!(result.reason.as_deref(), Some("invalid data"));
    }

    #[test]
    fn event_without_solution_sets_reads_as_invalid_data() {
        let acc = RowChangeAccumulator::new();
        let mut event = event(10.0, &[]);
        event.location_solution_sets.clear();
        let detections = vec![detection("sd-1")];

        let result = can_locate(Some(&detections), Some(&event), &acc, 0);
        assert_eq!(result.reason.as_deref(), Some("invalid data"));
    }

    #[test]
    fn out_of_range_depth_blocks_locate() {
        let acc = RowChangeAccumulator::new();
        let detections = vec![detection("sd-1")];
        let event = event(6500.0, &["sd-1"]);

        let result = can_locate(Some(&detections), Some(&event), &acc, 1);
        assert!(result.disabled);
        assert_eq!(result.reason.as_deref(), Some("bad location attributes"));
    }

    #[test]
    fn bad_attributes_win_over_defining_count() {
        // Fails both the geography check and the minimum-count check; the
        // geography reason must be the one reported.
        let acc = RowChangeAccumulator::new();
        let detections = vec![detection("sd-1")];
        let event = event(-5.0, &[]);

        let result = can_locate(Some(&detections), Some(&event), &acc, 99);
        assert_eq!(result.reason.as_deref(), Some("bad location attributes"));
    }

    #[test]
    fn too_few_defining_behaviors_blocks_with_count_reason() {
        let acc = RowChangeAccumulator::new();
        let detections = vec![detection("sd-1")];
        let event = event(10.0, &["sd-1"]);

        let result = can_locate(Some(&detections), Some(&event), &acc, 3);
        assert!(result.disabled);
        assert_eq!(
            result.reason.as_deref(),
            Some("3 defining behaviors required")
        );
    }

    #[test]
    fn pending_overrides_count_toward_the_minimum() {
        let mut acc = RowChangeAccumulator::new();
        let detections = vec![detection("sd-1")];
        // No behavior is defining originally.
        let event = event(10.0, &[]);

        assert!(can_locate(Some(&detections), Some(&event), &acc, 1).disabled);

        acc.set_one(DefiningType::ArrivalTime, "sd-1", true);
        let result = can_locate(Some(&detections), Some(&event), &acc, 1);
        assert!(!result.disabled);
        assert_eq!(result.reason, None);
    }

    #[test]
    fn satisfied_gate_is_enabled() {
        let acc = RowChangeAccumulator::new();
        let detections = vec![detection("sd-1")];
        let event = event(10.0, &["sd-1"]);

        let result = can_locate(Some(&detections), Some(&event), &acc, 1);
        assert!(!result.disabled);
        assert_eq!(result.reason, None);
    }
}
