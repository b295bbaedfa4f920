use serde::{Deserialize, Serialize};

use crate::domain::{EventHypothesis, LocationBehavior, SignalDetection};
use crate::prelude::{DefiningChange, DefiningType, EngineError, EngineResult};
use crate::reconciliation::behavior::find_behavior;
use crate::reconciliation::row_changes::RowChangeAccumulator;

/// Authoritative input for the external locate operation: the behavior list
/// with pending overrides applied, plus the two identifiers the operation
/// needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocatePayload {
    pub event_hypothesis_id: String,
    pub preferred_location_solution_id: String,
    pub location_behaviors: Vec<LocationBehavior>,
}

/// Assembles the locate payload from the preferred solution's behaviors.
/// Each behavior is cloned before the pending override lands on its
/// `defining` flag, so the solution still on display is never touched.
/// Rejected detections contribute nothing.
pub fn build_locate_payload(
    detections: &[SignalDetection],
    event: &EventHypothesis,
    accumulator: &RowChangeAccumulator,
) -> EngineResult<LocatePayload> {
    let preferred = event.preferred_solution().ok_or_else(|| {
        EngineError::MissingSolution(format!(
            "event hypothesis {} has no location solution to locate from",
            event.id
        ))
    })?;

    let mut location_behaviors = Vec::new();
    for detection in detections {
        if detection.current_hypothesis.rejected {
            continue;
        }
        let pending = accumulator.override_for(&detection.id);
        for defining_type in DefiningType::ALL {
            if let Some(behavior) =
                find_behavior(defining_type, detection, &preferred.location_behaviors)
            {
                let mut cloned = behavior.clone();
                let change = DefiningChange::from_override(
                    cloned.defining,
                    pending.get(defining_type),
                );
                cloned.defining = change.reconcile(cloned.defining);
                location_behaviors.push(cloned);
            }
        }
    }

    Ok(LocatePayload {
        event_hypothesis_id: event.id.clone(),
        preferred_location_solution_id: preferred.id.clone(),
        location_behaviors,
    })
}
