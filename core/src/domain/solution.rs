use serde::{Deserialize, Serialize};

use crate::domain::snapshot::SignalDetectionSnapshot;

/// Pairing of a feature measurement with a feature prediction inside one
/// location solution. At most one behavior exists per (detection, defining
/// type) per solution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationBehavior {
    pub feature_measurement_id: String,
    pub feature_prediction_id: String,
    pub residual: f64,
    pub weight: f64,
    pub defining: bool,
}

/// One candidate event location plus the behaviors and frozen snapshots
/// used to produce it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSolution {
    pub id: String,
    pub latitude_degrees: f64,
    pub longitude_degrees: f64,
    pub depth_km: f64,
    pub time_secs: f64,
    pub location_behaviors: Vec<LocationBehavior>,
    pub snapshots: Vec<SignalDetectionSnapshot>,
}

/// Ordered, immutable group of solutions produced by one locate invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSolutionSet {
    pub id: String,
    pub solutions: Vec<LocationSolution>,
}

/// The open event's hypothesis: preferred solution plus solution-set
/// history. The last set in the list is the live baseline; earlier sets are
/// historical and read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventHypothesis {
    pub id: String,
    pub event_id: String,
    pub preferred_location_solution_id: String,
    pub location_solution_sets: Vec<LocationSolutionSet>,
}

impl EventHypothesis {
    pub fn latest_solution_set(&self) -> Option<&LocationSolutionSet> {
        self.location_solution_sets.last()
    }

    pub fn solution_set(&self, set_id: &str) -> Option<&LocationSolutionSet> {
        self.location_solution_sets
            .iter()
            .find(|set| set.id == set_id)
    }

    /// The preferred solution inside the latest set, falling back to the
    /// set's last solution when the preferred id is stale.
    pub fn preferred_solution(&self) -> Option<&LocationSolution> {
        let latest = self.latest_solution_set()?;
        latest
            .solutions
            .iter()
            .find(|solution| solution.id == self.preferred_location_solution_id)
            .or_else(|| latest.solutions.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(id: &str) -> LocationSolution {
        LocationSolution {
            id: id.into(),
            latitude_degrees: 45.0,
            longitude_degrees: 70.0,
            depth_km: 10.0,
            time_secs: 1_500_000_000.0,
            location_behaviors: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    #[test]
    fn latest_set_is_last_in_list() {
        let event = EventHypothesis {
            id: "eh-1".into(),
            event_id: "ev-1".into(),
            preferred_location_solution_id: "ls-b".into(),
            location_solution_sets: vec![
                LocationSolutionSet {
                    id: "lss-1".into(),
                    solutions: vec![solution("ls-a")],
                },
                LocationSolutionSet {
                    id: "lss-2".into(),
                    solutions: vec![solution("ls-b")],
                },
            ],
        };

        assert_eq!(event.latest_solution_set().unwrap().id, "lss-2");
        assert_eq!(event.preferred_solution().unwrap().id, "ls-b");
    }

    #[test]
    fn stale_preferred_id_falls_back_to_last_solution() {
        let event = EventHypothesis {
            id: "eh-1".into(),
            event_id: "ev-1".into(),
            preferred_location_solution_id: "ls-gone".into(),
            location_solution_sets: vec![LocationSolutionSet {
                id: "lss-1".into(),
                solutions: vec![solution("ls-a"), solution("ls-b")],
            }],
        };

        assert_eq!(event.preferred_solution().unwrap().id, "ls-b");
    }

    #[test]
    fn empty_history_has_no_preferred_solution() {
        let event = EventHypothesis {
            id: "eh-1".into(),
            event_id: "ev-1".into(),
            preferred_location_solution_id: "ls-a".into(),
            location_solution_sets: Vec::new(),
        };

        assert!(event.latest_solution_set().is_none());
        assert!(event.preferred_solution().is_none());
    }
}
