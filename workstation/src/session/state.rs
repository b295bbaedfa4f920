use anyhow::Context;
use seismocore::domain::{EventHypothesis, LocationSolution, SignalDetection};
use seismocore::prelude::DefiningType;
use seismocore::reconciliation::{
    build_locate_payload, build_snapshot, can_locate, historical_snapshots_as_is,
    reconcile_snapshots, LocateEligibility, LocatePayload, RowChangeAccumulator,
};
use seismocore::telemetry::{LogManager, MetricsRecorder};

use crate::session::config::WorkstationConfig;
use crate::table::model::{build_rows, LocationSDRow};

/// One analyst's open-event review session. Owns the only mutable engine
/// state (the row-change accumulator) and orchestrates the reset/merge
/// transitions the engine itself leaves to its caller.
pub struct AnalystSession {
    config: WorkstationConfig,
    event: Option<EventHypothesis>,
    detections: Option<Vec<SignalDetection>>,
    accumulator: RowChangeAccumulator,
    selected_solution_set_id: Option<String>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl AnalystSession {
    pub fn new(config: WorkstationConfig) -> Self {
        Self {
            config,
            event: None,
            detections: None,
            accumulator: RowChangeAccumulator::new(),
            selected_solution_set_id: None,
            logger: LogManager::new("session"),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Switches the session to a new open event. Every pending override is
    /// discarded; the associated-detection list arrives separately via
    /// `ingest_detections`.
    pub fn open_event(&mut self, event: EventHypothesis) {
        self.logger
            .record(&format!("opening event hypothesis {}", event.id));
        self.event = Some(event);
        self.selected_solution_set_id = None;
        self.detections = None;
        self.accumulator.reset_for_event(std::iter::empty::<&str>());
    }

    /// Selects a solution set for display. A non-latest set enters
    /// historical (read-only) mode. Pending overrides are discarded either
    /// way.
    pub fn select_solution_set(&mut self, set_id: &str) {
        self.logger
            .record(&format!("selecting location solution set {}", set_id));
        self.selected_solution_set_id = Some(set_id.to_string());
        let ids: Vec<String> = self.associated_ids();
        self.accumulator
            .reset_for_solution_set(ids.iter().map(String::as_str));
    }

    /// Delivers a batch of associated detections. The first batch resets the
    /// accumulator (reset-then-merge ordering); later batches merge by
    /// detection id, newest hypothesis wins, and in-flight overrides on
    /// other detections survive.
    pub fn ingest_detections(&mut self, batch: Vec<SignalDetection>) {
        match self.detections.as_mut() {
            None => {
                let ids: Vec<String> = batch.iter().map(|d| d.id.clone()).collect();
                self.accumulator
                    .reset_for_event(ids.iter().map(String::as_str));
                self.logger.record(&format!(
                    "associated-detection list arrived: {} detections",
                    ids.len()
                ));
                self.detections = Some(batch);
            }
            Some(existing) => {
                for incoming in batch {
                    match existing.iter_mut().find(|d| d.id == incoming.id) {
                        Some(slot) => *slot = incoming,
                        None => existing.push(incoming),
                    }
                }
                let ids: Vec<String> = existing.iter().map(|d| d.id.clone()).collect();
                self.accumulator.extend_for(ids.iter().map(String::as_str));
            }
        }
    }

    /// Analyst toggled one detection's "Def" checkbox. Ignored in
    /// historical mode, where the table is read-only.
    pub fn set_defining(&mut self, defining_type: DefiningType, detection_id: &str, value: bool) {
        if self.is_historical() {
            self.logger.warn(&format!(
                "ignoring defining toggle for {} in historical mode",
                detection_id
            ));
            return;
        }
        self.accumulator.set_one(defining_type, detection_id, value);
    }

    /// Analyst toggled a whole "Def" column.
    pub fn set_all_defining(&mut self, defining_type: DefiningType, value: bool) {
        if self.is_historical() {
            self.logger
                .warn("ignoring column defining toggle in historical mode");
            return;
        }
        let ids = self.associated_ids();
        self.accumulator
            .set_all(defining_type, value, ids.iter().map(String::as_str));
    }

    /// True when an older (non-latest) solution set is selected.
    pub fn is_historical(&self) -> bool {
        let (event, selected) = match (&self.event, &self.selected_solution_set_id) {
            (Some(event), Some(selected)) => (event, selected),
            _ => return false,
        };
        event
            .latest_solution_set()
            .map(|latest| latest.id != *selected)
            .unwrap_or(false)
    }

    /// Recomputes the displayed table. Pure over the session state: live
    /// mode converts and reconciles against the last locate's snapshots,
    /// historical mode shows the selected solution's frozen snapshots
    /// as-is.
    pub fn rows(&self) -> Vec<LocationSDRow> {
        self.metrics.record_recomputation();

        if self.is_historical() {
            let rows = match self.displayed_solution() {
                Some(solution) => historical_snapshots_as_is(solution),
                None => Vec::new(),
            };
            return build_rows(&rows, false);
        }

        let (event, detections) = match (&self.event, &self.detections) {
            (Some(event), Some(detections)) => (event, detections),
            _ => return Vec::new(),
        };
        let preferred = event.preferred_solution();
        let behaviors = preferred
            .map(|solution| solution.location_behaviors.as_slice())
            .unwrap_or(&[]);
        let baseline = preferred
            .map(|solution| solution.snapshots.as_slice())
            .unwrap_or(&[]);

        let associated = detections
            .iter()
            .map(|detection| {
                build_snapshot(
                    detection,
                    behaviors,
                    self.accumulator.override_for(&detection.id),
                    preferred,
                )
            })
            .collect();

        let reconciled = reconcile_snapshots(associated, baseline);
        build_rows(&reconciled, true)
    }

    /// Whether a locate may be triggered right now.
    pub fn locate_eligibility(&self) -> LocateEligibility {
        can_locate(
            self.detections.as_deref(),
            self.event.as_ref(),
            &self.accumulator,
            self.config.minimum_defining_count,
        )
    }

    /// Assembles the payload for the external locate operation, or fails
    /// with the gate reason when locate is not permitted.
    pub fn locate_payload(&self) -> anyhow::Result<LocatePayload> {
        let eligibility = self.locate_eligibility();
        if eligibility.disabled {
            self.metrics.record_blocked_locate();
            anyhow::bail!(
                "locate not permitted: {}",
                eligibility.reason.unwrap_or_else(|| "unknown".into())
            );
        }

        let event = self
            .event
            .as_ref()
            .context("no open event to locate")?;
        let detections = self
            .detections
            .as_deref()
            .context("no associated detections to locate with")?;
        build_locate_payload(detections, event, &self.accumulator)
            .context("assembling locate payload")
    }

    pub fn metrics_snapshot(&self) -> (usize, usize) {
        self.metrics.snapshot()
    }

    fn associated_ids(&self) -> Vec<String> {
        self.detections
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|d| d.id.clone())
            .collect()
    }

    /// The solution shown in the table: the selected set's preferred (or
    /// last) solution in historical mode, the latest preferred otherwise.
    fn displayed_solution(&self) -> Option<&LocationSolution> {
        let event = self.event.as_ref()?;
        match &self.selected_solution_set_id {
            Some(set_id) if self.is_historical() => {
                let set = event.solution_set(set_id)?;
                set.solutions
                    .iter()
                    .find(|s| s.id == event.preferred_location_solution_id)
                    .or_else(|| set.solutions.last())
            }
            _ => event.preferred_solution(),
        }
    }
}
