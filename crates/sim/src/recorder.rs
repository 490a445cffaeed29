use furuta_pendulum::{ControlMode, Controller, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// When the control output is written to the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordingPolicy {
    /// Log every derivative evaluation in call order.
    ///
    /// Adaptive solvers evaluate the system several times per output sample,
    /// at trial times that need not lie on the grid, so the log is longer
    /// than the trajectory and only loosely aligned with it.
    #[default]
    EveryEvaluation,

    /// Log one entry per output sample.
    ///
    /// Each entry is the law for the mode in force at the sample time,
    /// evaluated at the sampled state.
    OutputSamples,
}

impl RecordingPolicy {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RecordingPolicy::EveryEvaluation => "every-evaluation",
            RecordingPolicy::OutputSamples => "output-samples",
        }
    }
}

/// One logged control output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRecord {
    /// Time the output was computed for.
    pub t: f64,

    /// The control output.
    pub u: f64,

    /// Mode that produced `u`.
    pub mode: ControlMode,
}

/// Control outputs paired with grid times, ready for plotting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlHistory {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    pub modes: Vec<ControlMode>,
}

impl ControlHistory {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Append-only log of control outputs for one run.
#[derive(Debug, Clone, Default)]
pub struct ControlHistoryRecorder {
    records: Vec<ControlRecord>,
    switch_time: Option<f64>,
}

impl ControlHistoryRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn record(&mut self, record: ControlRecord) {
        self.records.push(record);
    }

    /// Notes that the controller switched to stabilization at `t`.
    ///
    /// Only the first switch is kept.
    pub fn mark_switch(&mut self, t: f64) {
        if self.switch_time.is_none() {
            self.switch_time = Some(t);
        }
    }

    /// Logs one entry per sample of a finished trajectory.
    ///
    /// The mode at sample `i` is [`ControlMode::Stabilize`] if the controller
    /// started in it or switched at or before `times[i]`, and the logged value
    /// is `controller`'s law for that mode at `trajectory[i]`.
    pub fn record_samples<C>(
        &mut self,
        controller: &C,
        initial_mode: ControlMode,
        times: &[f64],
        trajectory: &[State],
    ) where
        C: Controller + ?Sized,
    {
        for (&t, state) in times.iter().zip(trajectory) {
            let switched = self.switch_time.is_some_and(|switch| switch <= t);
            let mode = if switched {
                ControlMode::Stabilize
            } else {
                initial_mode
            };

            self.record(ControlRecord {
                t,
                u: controller.control_for_mode(mode, state),
                mode,
            });
        }
    }

    #[must_use]
    pub fn records(&self) -> &[ControlRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ControlRecord> {
        self.records
    }

    /// Returns the time of the first switch to stabilization, if any.
    #[must_use]
    pub fn switch_time(&self) -> Option<f64> {
        self.switch_time
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pairs the log with the sample `times`.
    ///
    /// Entries past the last sample are dropped, and so are samples past the
    /// last entry, so both sequences in the result have the same length.
    #[must_use]
    pub fn reconcile(&self, times: &[f64]) -> ControlHistory {
        let len = self.records.len().min(times.len());

        if self.records.len() != times.len() {
            debug!(
                entries = self.records.len(),
                samples = times.len(),
                kept = len,
                "truncated control history to match the grid"
            );
        }

        let records = &self.records[..len];

        ControlHistory {
            times: times[..len].to_vec(),
            values: records.iter().map(|record| record.u).collect(),
            modes: records.iter().map(|record| record.mode).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use furuta_pendulum::{ControlLaw, Preset};

    fn swing_up(t: f64, u: f64) -> ControlRecord {
        ControlRecord {
            t,
            u,
            mode: ControlMode::SwingUp,
        }
    }

    #[test]
    fn extra_entries_are_dropped() {
        let mut recorder = ControlHistoryRecorder::new();
        for (t, u) in [(0.0, 0.0), (0.01, 1.0), (0.02, 2.0), (0.05, 3.0), (0.07, 4.0)] {
            recorder.record(swing_up(t, u));
        }

        let history = recorder.reconcile(&[0.0, 0.05, 0.1]);

        assert_eq!(history.times, vec![0.0, 0.05, 0.1]);
        assert_eq!(history.values, vec![0.0, 1.0, 2.0]);
        assert_eq!(history.modes.len(), 3);
    }

    #[test]
    fn extra_samples_are_dropped() {
        let mut recorder = ControlHistoryRecorder::new();
        recorder.record(swing_up(0.0, 1.5));
        recorder.record(swing_up(0.03, -0.5));

        let history = recorder.reconcile(&[0.0, 0.05, 0.1, 0.15]);

        assert_eq!(history.times, vec![0.0, 0.05]);
        assert_eq!(history.values, vec![1.5, -0.5]);
    }

    #[test]
    fn empty_log_reconciles_to_nothing() {
        let history = ControlHistoryRecorder::new().reconcile(&[0.0, 0.05]);

        assert!(history.is_empty());
        assert!(history.times.is_empty());
    }

    #[test]
    fn only_the_first_switch_is_kept() {
        let mut recorder = ControlHistoryRecorder::new();
        assert_eq!(recorder.switch_time(), None);

        recorder.mark_switch(1.25);
        recorder.mark_switch(3.0);

        assert_eq!(recorder.switch_time(), Some(1.25));
    }

    #[test]
    fn samples_use_the_mode_in_force_at_their_time() {
        let preset = Preset::PolePlaced;
        let law = ControlLaw::new(preset.plant(), preset.gains());
        let state = State::new(0.2, -0.1, 0.05, 0.3);

        let mut recorder = ControlHistoryRecorder::new();
        recorder.mark_switch(0.1);
        recorder.record_samples(
            &law,
            ControlMode::SwingUp,
            &[0.0, 0.05, 0.1, 0.15],
            &[state; 4],
        );

        let modes: Vec<_> = recorder.records().iter().map(|r| r.mode).collect();
        assert_eq!(
            modes,
            vec![
                ControlMode::SwingUp,
                ControlMode::SwingUp,
                ControlMode::Stabilize,
                ControlMode::Stabilize,
            ]
        );

        let stabilizing = law.control_for_mode(ControlMode::Stabilize, &state);
        let swinging = law.control_for_mode(ControlMode::SwingUp, &state);
        assert_eq!(recorder.records()[1].u, swinging);
        assert_eq!(recorder.records()[2].u, stabilizing);
    }

    #[test]
    fn policy_names_match_serde() {
        #[derive(Serialize)]
        struct Wrapper {
            recording: RecordingPolicy,
        }

        for policy in [
            RecordingPolicy::EveryEvaluation,
            RecordingPolicy::OutputSamples,
        ] {
            let text = toml::to_string(&Wrapper { recording: policy }).unwrap();
            assert_eq!(text.trim(), format!("recording = \"{}\"", policy.name()));
        }
    }
}
