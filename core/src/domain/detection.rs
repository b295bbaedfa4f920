use serde::{Deserialize, Serialize};

use crate::prelude::DefiningType;

/// Measurement kinds attached to a signal-detection hypothesis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeatureMeasurementType {
    ArrivalTime,
    ReceiverToSourceAzimuth,
    Slowness,
    Phase,
}

impl FeatureMeasurementType {
    /// The canonical measurement type carrying each defining quantity.
    pub fn for_defining(defining_type: DefiningType) -> Self {
        match defining_type {
            DefiningType::ArrivalTime => FeatureMeasurementType::ArrivalTime,
            DefiningType::Azimuth => FeatureMeasurementType::ReceiverToSourceAzimuth,
            DefiningType::Slowness => FeatureMeasurementType::Slowness,
        }
    }
}

/// Typed value of a feature measurement; the shape depends on the kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MeasurementValue {
    /// Epoch seconds, used by arrival-time measurements.
    Instant { value: f64 },
    /// Scalar quantity, used by azimuth and slowness measurements.
    Numeric {
        value: f64,
        standard_deviation: Option<f64>,
    },
    Phase { value: String },
}

impl MeasurementValue {
    /// Numeric reading of the value, if it has one.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            MeasurementValue::Instant { value } => Some(*value),
            MeasurementValue::Numeric { value, .. } => Some(*value),
            MeasurementValue::Phase { .. } => None,
        }
    }
}

/// A single observed quantity on a signal-detection hypothesis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureMeasurement {
    pub id: String,
    pub measurement_type: FeatureMeasurementType,
    pub value: MeasurementValue,
    /// Populated on arrival-time measurements only, e.g. "MKAR/SHZ beam".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_segment_name: Option<String>,
}

/// Geographic position of the recording station, used for the display
/// distance readout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StationLocation {
    pub latitude_degrees: f64,
    pub longitude_degrees: f64,
}

/// Versioned measurement set for one detection. A new hypothesis id is
/// minted whenever any measurement changes upstream, so the hypothesis id is
/// the version key for comparison, not the detection id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalDetectionHypothesis {
    pub id: String,
    pub rejected: bool,
    pub feature_measurements: Vec<FeatureMeasurement>,
}

/// Read-only copy of an observed arrival, fetched per query/subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalDetection {
    pub id: String,
    pub station_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_location: Option<StationLocation>,
    pub current_hypothesis: SignalDetectionHypothesis,
}

impl SignalDetection {
    /// The measurement of the given type on the current hypothesis, if any.
    pub fn measurement(
        &self,
        measurement_type: FeatureMeasurementType,
    ) -> Option<&FeatureMeasurement> {
        self.current_hypothesis
            .feature_measurements
            .iter()
            .find(|fm| fm.measurement_type == measurement_type)
    }

    /// Phase label from the phase measurement, empty when absent.
    pub fn phase(&self) -> String {
        match self.measurement(FeatureMeasurementType::Phase) {
            Some(fm) => match &fm.value {
                MeasurementValue::Phase { value } => value.clone(),
                _ => String::new(),
            },
            None => String::new(),
        }
    }
}
