use rand::{rngs::StdRng, Rng, SeedableRng};
use seismocore::domain::{
    EventHypothesis, FeatureMeasurement, FeatureMeasurementType, LocationBehavior,
    LocationSolution, LocationSolutionSet, MeasurementValue, SignalDetection,
    SignalDetectionHypothesis, StationLocation,
};
use seismocore::reconciliation::{build_snapshot, RowOverride};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic review scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub stations: usize,
    pub seed: u64,
    pub event_latitude: f64,
    pub event_longitude: f64,
    pub event_depth_km: f64,
    pub event_time_secs: f64,
    /// Probability that a generated behavior starts out defining.
    pub defining_fraction: f64,
    pub name: Option<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            stations: 8,
            seed: 0,
            event_latitude: -19.9,
            event_longitude: 134.3,
            event_depth_km: 12.0,
            event_time_secs: 1_546_300_800.0,
            defining_fraction: 0.75,
            name: None,
        }
    }
}

impl ScenarioConfig {
    fn normalized_stations(&self) -> usize {
        self.stations.max(1)
    }
}

/// A synthetic open event plus its associated detections, shaped like one
/// locate has already run: the event carries a previous solution set and a
/// latest one, both with frozen snapshots.
pub struct Scenario {
    pub event: EventHypothesis,
    pub detections: Vec<SignalDetection>,
}

pub fn build_scenario(config: &ScenarioConfig) -> anyhow::Result<Scenario> {
    if !(0.0..=1.0).contains(&config.defining_fraction) {
        anyhow::bail!(
            "defining fraction {} outside [0, 1]",
            config.defining_fraction
        );
    }
    if let Some(name) = config.name.as_deref() {
        log::info!("building review scenario {}", name);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let stations = config.normalized_stations();

    let mut detections = Vec::with_capacity(stations);
    for index in 1..=stations {
        detections.push(build_detection(index, config, &mut rng));
    }

    let previous = build_solution(
        "ls-1",
        config.event_latitude + 0.4,
        config.event_longitude - 0.3,
        config.event_depth_km + 4.0,
        config.event_time_secs - 2.5,
        &detections,
        config,
        &mut rng,
    );
    let latest = build_solution(
        "ls-2",
        config.event_latitude,
        config.event_longitude,
        config.event_depth_km,
        config.event_time_secs,
        &detections,
        config,
        &mut rng,
    );

    let event = EventHypothesis {
        id: "eh-1".into(),
        event_id: "ev-1".into(),
        preferred_location_solution_id: "ls-2".into(),
        location_solution_sets: vec![
            LocationSolutionSet {
                id: "lss-1".into(),
                solutions: vec![previous],
            },
            LocationSolutionSet {
                id: "lss-2".into(),
                solutions: vec![latest],
            },
        ],
    };

    Ok(Scenario { event, detections })
}

fn build_detection(index: usize, config: &ScenarioConfig, rng: &mut StdRng) -> SignalDetection {
    let station = format!("ST{:02}", index);
    let id = format!("sd-{}", index);
    let latitude = (config.event_latitude + rng.gen_range(-25.0..25.0)).clamp(-90.0, 90.0);
    let longitude = (config.event_longitude + rng.gen_range(-25.0..25.0)).clamp(-180.0, 180.0);
    let phase = ["P", "Pn", "S"][rng.gen_range(0..3)];

    let feature_measurements = vec![
        FeatureMeasurement {
            id: format!("{}-fm-time", id),
            measurement_type: FeatureMeasurementType::ArrivalTime,
            value: MeasurementValue::Instant {
                value: config.event_time_secs + rng.gen_range(100.0..900.0),
            },
            channel_segment_name: Some(format!("{}/SHZ beam", station)),
        },
        FeatureMeasurement {
            id: format!("{}-fm-az", id),
            measurement_type: FeatureMeasurementType::ReceiverToSourceAzimuth,
            value: MeasurementValue::Numeric {
                value: rng.gen_range(0.0..360.0),
                standard_deviation: Some(rng.gen_range(0.5..3.0)),
            },
            channel_segment_name: None,
        },
        FeatureMeasurement {
            id: format!("{}-fm-slow", id),
            measurement_type: FeatureMeasurementType::Slowness,
            value: MeasurementValue::Numeric {
                value: rng.gen_range(4.0..20.0),
                standard_deviation: Some(rng.gen_range(0.1..1.0)),
            },
            channel_segment_name: None,
        },
        FeatureMeasurement {
            id: format!("{}-fm-phase", id),
            measurement_type: FeatureMeasurementType::Phase,
            value: MeasurementValue::Phase {
                value: phase.into(),
            },
            channel_segment_name: None,
        },
    ];

    SignalDetection {
        id: id.clone(),
        station_name: station,
        station_location: Some(StationLocation {
            latitude_degrees: latitude,
            longitude_degrees: longitude,
        }),
        current_hypothesis: SignalDetectionHypothesis {
            id: format!("{}-hyp", id),
            rejected: false,
            feature_measurements,
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn build_solution(
    id: &str,
    latitude: f64,
    longitude: f64,
    depth_km: f64,
    time_secs: f64,
    detections: &[SignalDetection],
    config: &ScenarioConfig,
    rng: &mut StdRng,
) -> LocationSolution {
    let location_behaviors = detections
        .iter()
        .flat_map(|detection| {
            ["fm-time", "fm-az", "fm-slow"]
                .iter()
                .map(|suffix| LocationBehavior {
                    feature_measurement_id: format!("{}-{}", detection.id, suffix),
                    feature_prediction_id: format!("{}-fp-{}", detection.id, suffix),
                    residual: rng.gen_range(-2.0..2.0),
                    weight: rng.gen_range(0.3..1.0),
                    defining: rng.gen_bool(config.defining_fraction),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let mut solution = LocationSolution {
        id: id.into(),
        latitude_degrees: latitude,
        longitude_degrees: longitude,
        depth_km,
        time_secs,
        location_behaviors,
        snapshots: Vec::new(),
    };

    let snapshots = detections
        .iter()
        .map(|detection| {
            build_snapshot(
                detection,
                &solution.location_behaviors,
                RowOverride::default(),
                Some(&solution),
            )
            .snapshot
        })
        .collect();
    solution.snapshots = snapshots;
    solution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_is_deterministic_for_a_fixed_seed() {
        let config = ScenarioConfig {
            stations: 4,
            seed: 42,
            ..ScenarioConfig::default()
        };
        let first = build_scenario(&config).unwrap();
        let second = build_scenario(&config).unwrap();
        assert_eq!(first.event, second.event);
        assert_eq!(first.detections, second.detections);
    }

    #[test]
    fn scenario_builds_two_solution_sets_with_snapshots() {
        let scenario = build_scenario(&ScenarioConfig {
            stations: 3,
            ..ScenarioConfig::default()
        })
        .unwrap();

        assert_eq!(scenario.detections.len(), 3);
        assert_eq!(scenario.event.location_solution_sets.len(), 2);
        for set in &scenario.event.location_solution_sets {
            let solution = &set.solutions[0];
            assert_eq!(solution.location_behaviors.len(), 3 * 3);
            assert_eq!(solution.snapshots.len(), 3);
        }
        assert_eq!(scenario.event.preferred_solution().unwrap().id, "ls-2");
    }

    #[test]
    fn zero_defining_fraction_yields_no_defining_behaviors() {
        let scenario = build_scenario(&ScenarioConfig {
            stations: 2,
            defining_fraction: 0.0,
            ..ScenarioConfig::default()
        })
        .unwrap();

        let latest = scenario.event.preferred_solution().unwrap();
        assert!(latest.location_behaviors.iter().all(|b| !b.defining));
    }

    #[test]
    fn out_of_range_defining_fraction_is_rejected() {
        let config = ScenarioConfig {
            defining_fraction: 1.5,
            ..ScenarioConfig::default()
        };
        assert!(build_scenario(&config).is_err());
    }

    #[test]
    fn station_count_is_never_zero() {
        let scenario = build_scenario(&ScenarioConfig {
            stations: 0,
            ..ScenarioConfig::default()
        })
        .unwrap();
        assert_eq!(scenario.detections.len(), 1);
    }
}
