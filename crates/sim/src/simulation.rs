use furuta_ode::{Stats, TimeGrid, integrate};
use furuta_pendulum::{ControlLaw, ControlMode, Controller, DynamicsModel, EnergyMonitor, State};
use tracing::{debug, info};

use crate::{
    ControlHistory, ControlRecord, RecordingPolicy, SimError, Setup, closed_loop::ClosedLoop,
};

/// A validated run, ready to integrate.
#[derive(Debug, Clone)]
pub struct Simulation {
    setup: Setup,
    grid: TimeGrid,
}

impl Simulation {
    /// Validates `setup`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if any value is out of range.
    pub fn new(setup: Setup) -> Result<Self, SimError> {
        let grid = setup.validate()?;

        debug!(
            samples = grid.len(),
            dt = grid.dt(),
            method = setup.method.name(),
            recording = setup.recording.name(),
            "simulation configured"
        );

        Ok(Self { setup, grid })
    }

    #[must_use]
    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Runs the closed loop under a fresh [`ControlLaw`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::IntegrationDivergence`] if the solver fails.
    pub fn run(&self) -> Result<Run, SimError> {
        let law = ControlLaw::new(self.setup.plant, self.setup.gains);
        self.run_with(law)
    }

    /// Runs the closed loop under `controller`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::IntegrationDivergence`] if the solver fails or the
    /// controller drives the state to non-finite values.
    pub fn run_with<C: Controller>(&self, controller: C) -> Result<Run, SimError> {
        let Setup {
            plant,
            initial,
            method,
            recording,
            ..
        } = self.setup;

        let initial_mode = controller.mode();
        let system = ClosedLoop::new(DynamicsModel::new(plant), controller, recording);

        let solution = integrate(&system, initial.into(), &self.grid, method)?;
        let (controller, mut recorder) = system.into_parts();

        let (times, trajectory): (Vec<f64>, Vec<State>) = solution
            .samples
            .into_iter()
            .map(|sample| (sample.t, State::from(sample.y)))
            .unzip();

        if recording == RecordingPolicy::OutputSamples {
            recorder.record_samples(&controller, initial_mode, &times, &trajectory);
        }

        let controls = recorder.reconcile(&times);
        let switch_time = recorder.switch_time();

        let run = Run {
            times,
            trajectory,
            controls,
            records: recorder.into_records(),
            switch_time,
            final_mode: controller.mode(),
            stats: solution.stats,
            monitor: EnergyMonitor::new(plant),
        };

        info!(
            samples = run.len(),
            evaluations = run.stats.evaluations,
            switch_time = ?run.switch_time,
            final_mode = ?run.final_mode,
            "simulation finished"
        );

        Ok(run)
    }
}

/// The outcome of a run.
#[derive(Debug, Clone)]
pub struct Run {
    /// Grid times, one per trajectory sample.
    pub times: Vec<f64>,

    /// States at the grid times.
    pub trajectory: Vec<State>,

    /// Control outputs paired with grid times.
    ///
    /// Never longer than the trajectory.
    pub controls: ControlHistory,

    /// Every logged control output in call order, before reconciliation.
    pub records: Vec<ControlRecord>,

    /// Solver time at which the controller switched to stabilization.
    pub switch_time: Option<f64>,

    /// Mode of the controller when the run ended.
    pub final_mode: ControlMode,

    pub stats: Stats,

    monitor: EnergyMonitor,
}

impl Run {
    /// Returns the number of trajectory samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    #[must_use]
    pub fn final_state(&self) -> Option<&State> {
        self.trajectory.last()
    }

    /// Returns the energy metric at every trajectory sample.
    #[must_use]
    pub fn energies(&self) -> Vec<f64> {
        self.trajectory
            .iter()
            .map(|state| self.monitor.energy(state))
            .collect()
    }
}
