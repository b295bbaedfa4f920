use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::prelude::DefiningType;

/// Pending analyst edits for one detection row. `None` means the field has
/// not been touched; `Some(v)` is an explicit override to `v`, even when
/// `v` equals the original value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowOverride {
    pub arrival_time: Option<bool>,
    pub azimuth: Option<bool>,
    pub slowness: Option<bool>,
}

impl RowOverride {
    pub fn get(&self, defining_type: DefiningType) -> Option<bool> {
        match defining_type {
            DefiningType::ArrivalTime => self.arrival_time,
            DefiningType::Azimuth => self.azimuth,
            DefiningType::Slowness => self.slowness,
        }
    }

    pub fn set(&mut self, defining_type: DefiningType, value: bool) {
        match defining_type {
            DefiningType::ArrivalTime => self.arrival_time = Some(value),
            DefiningType::Azimuth => self.azimuth = Some(value),
            DefiningType::Slowness => self.slowness = Some(value),
        }
    }
}

/// Uncommitted per-detection defining-state overrides for one open-event
/// session. Keyed by detection id; each row holds three independent fields,
/// so touching one field never disturbs the other two.
#[derive(Debug, Clone, Default)]
pub struct RowChangeAccumulator {
    rows: HashMap<String, RowOverride>,
}

impl RowChangeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one detection's override for one defining type, defaulting the
    /// row first if it has not been seen yet.
    pub fn set_one(&mut self, defining_type: DefiningType, detection_id: &str, new_value: bool) {
        self.rows
            .entry(detection_id.to_string())
            .or_default()
            .set(defining_type, new_value);
    }

    /// Applies `set_one` across every currently associated detection.
    pub fn set_all<'a, I>(&mut self, defining_type: DefiningType, new_value: bool, detection_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in detection_ids {
            self.set_one(defining_type, id, new_value);
        }
    }

    /// Wholesale replacement on open-event change: every prior override is
    /// discarded and the new event's detections start untouched.
    pub fn reset_for_event<'a, I>(&mut self, detection_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.reset(detection_ids);
    }

    /// Wholesale replacement on historical-solution-set change.
    pub fn reset_for_solution_set<'a, I>(&mut self, detection_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.reset(detection_ids);
    }

    /// Merge path for subscription-delivered detections: rows are added for
    /// ids not yet tracked, and in-flight overrides on other rows survive.
    pub fn extend_for<'a, I>(&mut self, detection_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in detection_ids {
            self.rows.entry(id.to_string()).or_default();
        }
    }

    /// The pending override for a detection, untouched default when the
    /// detection has no row yet.
    pub fn override_for(&self, detection_id: &str) -> RowOverride {
        self.rows.get(detection_id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn reset<'a, I>(&mut self, detection_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.rows.clear();
        for id in detection_ids {
            self.rows.insert(id.to_string(), RowOverride::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_one_defaults_the_row_and_touches_one_field() {
        let mut acc = RowChangeAccumulator::new();
        acc.set_one(DefiningType::Azimuth, "sd-1", true);

        let row = acc.override_for("sd-1");
        assert_eq!(row.azimuth, Some(true));
        assert_eq!(row.arrival_time, None);
        assert_eq!(row.slowness, None);
    }

    #[test]
    fn set_one_preserves_other_fields_of_the_row() {
        let mut acc = RowChangeAccumulator::new();
        acc.set_one(DefiningType::Slowness, "sd-1", false);
        acc.set_one(DefiningType::ArrivalTime, "sd-1", true);

        let row = acc.override_for("sd-1");
        assert_eq!(row.slowness, Some(false));
        assert_eq!(row.arrival_time, Some(true));
    }

    #[test]
    fn set_all_covers_every_associated_detection() {
        let mut acc = RowChangeAccumulator::new();
        acc.set_all(
            DefiningType::Slowness,
            true,
            ["sd-1", "sd-2", "sd-3"],
        );

        for id in ["sd-1", "sd-2", "sd-3"] {
            assert_eq!(acc.override_for(id).slowness, Some(true));
        }
    }

    #[test]
    fn reset_for_event_discards_every_prior_row() {
        let mut acc = RowChangeAccumulator::new();
        acc.set_one(DefiningType::Azimuth, "sd-1", true);
        acc.reset_for_event(["sd-1", "sd-4"]);

        // sd-1 is associated to both events and starts fresh.
        assert_eq!(acc.override_for("sd-1"), RowOverride::default());
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn extend_for_keeps_in_flight_overrides() {
        let mut acc = RowChangeAccumulator::new();
        acc.reset_for_event(["sd-1", "sd-2"]);
        acc.set_one(DefiningType::ArrivalTime, "sd-2", false);

        acc.extend_for(["sd-2", "sd-3"]);
        assert_eq!(acc.override_for("sd-2").arrival_time, Some(false));
        assert_eq!(acc.override_for("sd-3"), RowOverride::default());
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn unknown_detection_reads_as_untouched() {
        let acc = RowChangeAccumulator::new();
        assert_eq!(acc.override_for("sd-9"), RowOverride::default());
        assert!(acc.is_empty());
    }
}
