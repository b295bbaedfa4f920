pub mod detection;
pub mod snapshot;
pub mod solution;

pub use detection::{
    FeatureMeasurement, FeatureMeasurementType, MeasurementValue, SignalDetection,
    SignalDetectionHypothesis, StationLocation,
};
pub use snapshot::{
    FeatureSnapshot, SignalDetectionSnapshot, SignalDetectionSnapshotWithDiffs, SnapshotDiffs,
};
pub use solution::{EventHypothesis, LocationBehavior, LocationSolution, LocationSolutionSet};
