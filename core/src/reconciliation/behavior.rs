use crate::domain::{FeatureMeasurementType, LocationBehavior, SignalDetection};
use crate::prelude::DefiningType;

/// Finds the behavior tied to the detection's measurement for the given
/// defining type. A well-formed solution carries at most one such behavior;
/// if that invariant is violated the first match in input order wins.
///
/// `None` means the detection lacks the measurement or the solution has no
/// behavior for it. Callers treat that as "not defining, no residual".
pub fn find_behavior<'a>(
    defining_type: DefiningType,
    detection: &SignalDetection,
    behaviors: &'a [LocationBehavior],
) -> Option<&'a LocationBehavior> {
    let measurement_type = FeatureMeasurementType::for_defining(defining_type);
    let measurement = detection.measurement(measurement_type)?;
    behaviors
        .iter()
        .find(|behavior| behavior.feature_measurement_id == measurement.id)
}
