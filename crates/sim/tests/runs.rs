use std::f64::consts::PI;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use furuta_ode::Method;
use furuta_pendulum::{ConfigError, ControlLaw, ControlMode, Controller, Preset, State};
use furuta_sim::{RecordingPolicy, Setup, SimError, Simulation, SimulationConfig, TimeConfig};

fn setup(preset: Preset, t_max: f64, method: Method, recording: RecordingPolicy) -> Setup {
    Setup {
        time: TimeConfig { dt: 0.05, t_max },
        method,
        recording,
        ..Setup::from_preset(preset)
    }
}

const POLICIES: [RecordingPolicy; 2] = [
    RecordingPolicy::EveryEvaluation,
    RecordingPolicy::OutputSamples,
];

/// Always commands NaN.
struct Broken;

impl Controller for Broken {
    fn compute_control(&mut self, _state: &State) -> f64 {
        f64::NAN
    }

    fn control_for_mode(&self, _mode: ControlMode, _state: &State) -> f64 {
        f64::NAN
    }

    fn mode(&self) -> ControlMode {
        ControlMode::SwingUp
    }
}

#[test]
fn run_lengths_match_the_grid() {
    for method in [Method::Rk4, Method::default()] {
        for recording in POLICIES {
            let simulation =
                Simulation::new(setup(Preset::Reference, 3.0, method, recording)).unwrap();

            let run = simulation.run().unwrap();
            let times: Vec<f64> = simulation.grid().times().collect();

            assert_eq!(run.len(), simulation.grid().len());
            assert_eq!(run.times, times);
            assert_eq!(run.controls.len(), run.len());
            assert_eq!(run.controls.times, run.times);
            assert_eq!(run.controls.modes.len(), run.controls.values.len());
            assert_eq!(run.trajectory[0], Preset::Reference.initial_state());
        }
    }
}

#[test]
fn near_upright_start_stabilizes_immediately() {
    for recording in POLICIES {
        let mut setup = setup(Preset::Reference, 1.0, Method::Rk4, recording);
        setup.initial = State::new(0.05, 0.0, 0.0, 0.0);

        let run = Simulation::new(setup).unwrap().run().unwrap();

        assert_relative_eq!(run.controls.values[0], 4.091 * 0.05);
        assert_eq!(run.controls.modes[0], ControlMode::Stabilize);
        assert_eq!(run.switch_time, Some(0.0));
        assert_eq!(run.final_mode, ControlMode::Stabilize);
    }
}

#[test]
fn zero_pendulum_length_is_rejected_before_integration() {
    let mut setup = Setup::from_preset(Preset::Reference);
    setup.plant.pendulum_length = 0.0;

    let error = Simulation::new(setup).unwrap_err();

    assert!(matches!(
        error,
        SimError::InvalidConfiguration(ConfigError::NonPositive {
            name: "pendulum_length",
            ..
        })
    ));
}

#[test]
fn bad_time_values_are_rejected() {
    let error = Simulation::new(setup(
        Preset::Reference,
        -1.0,
        Method::Rk4,
        RecordingPolicy::default(),
    ))
    .unwrap_err();

    assert!(matches!(
        error,
        SimError::InvalidConfiguration(ConfigError::NonPositive { name: "t_max", .. })
    ));
}

#[test]
fn non_finite_control_is_a_divergence() {
    for method in [Method::Rk4, Method::default()] {
        let simulation = Simulation::new(setup(
            Preset::Reference,
            1.0,
            method,
            RecordingPolicy::default(),
        ))
        .unwrap();

        let error = simulation.run_with(Broken).unwrap_err();

        assert!(
            matches!(
                error,
                SimError::IntegrationDivergence(furuta_ode::Error::NonFiniteDerivative { .. })
            ),
            "unexpected error: {error}"
        );
    }
}

#[test]
fn runs_are_deterministic_and_independent() {
    let simulation = Simulation::new(setup(
        Preset::Reference,
        5.0,
        Method::default(),
        RecordingPolicy::EveryEvaluation,
    ))
    .unwrap();

    let first = simulation.run().unwrap();
    let second = simulation.run().unwrap();

    // A latch carried over from the first run would stabilize from t = 0.
    assert!(first.switch_time.is_some_and(|t| t > 1.0));
    assert_eq!(first.switch_time, second.switch_time);
    assert_eq!(first.trajectory, second.trajectory);
    assert_eq!(first.controls, second.controls);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn latch_holds_across_every_evaluation() {
    let simulation = Simulation::new(setup(
        Preset::PolePlaced,
        5.0,
        Method::default(),
        RecordingPolicy::EveryEvaluation,
    ))
    .unwrap();

    let run = simulation.run().unwrap();

    let first = run
        .records
        .iter()
        .position(|record| record.mode == ControlMode::Stabilize)
        .unwrap();

    assert!(first > 0);
    assert_eq!(Some(run.records[first].t), run.switch_time);
    assert!(
        run.records[..first]
            .iter()
            .all(|record| record.mode == ControlMode::SwingUp)
    );
    assert!(
        run.records[first..]
            .iter()
            .all(|record| record.mode == ControlMode::Stabilize)
    );
    assert!(run.records.len() > run.len());
}

#[test]
fn borrowed_law_keeps_its_latch_after_the_run() {
    let simulation = Simulation::new(setup(
        Preset::PolePlaced,
        4.0,
        Method::default(),
        RecordingPolicy::default(),
    ))
    .unwrap();
    let mut law = ControlLaw::new(Preset::PolePlaced.plant(), Preset::PolePlaced.gains());

    let run = simulation.run_with(&mut law).unwrap();

    assert!(run.switch_time.is_some());
    assert_eq!(run.final_mode, ControlMode::Stabilize);
    assert_eq!(law.mode(), ControlMode::Stabilize);
}

#[test]
fn pole_placed_preset_swings_up_and_balances() {
    let simulation = Simulation::new(Setup::from_preset(Preset::PolePlaced)).unwrap();

    let run = simulation.run().unwrap();

    let switch = run.switch_time.unwrap();
    assert!(switch > 2.0 && switch < 2.8, "switched at {switch}");
    assert_eq!(run.final_mode, ControlMode::Stabilize);
    assert!(run.trajectory.iter().all(State::is_finite));

    let last = run.final_state().unwrap();
    assert_abs_diff_eq!(last.theta, 0.0, epsilon = 0.01);
    assert_abs_diff_eq!(last.alpha, 0.0, epsilon = 0.01);

    let energies = run.energies();
    assert_relative_eq!(
        energies[0],
        -0.5 * 9.806_65 * 0.30 * (1.0 + 0.1_f64.cos()),
        max_relative = 1e-12
    );
    assert_abs_diff_eq!(energies[energies.len() - 1], 0.0, epsilon = 0.01);

    // Swing-up pumps energy up from the hanging start.
    assert!(energies[0] < -2.0);
    assert_eq!(run.controls.modes[0], ControlMode::SwingUp);
}

#[test]
fn pole_placed_gains_hold_a_near_upright_start() {
    let mut setup = setup(
        Preset::PolePlaced,
        5.0,
        Method::Rk4,
        RecordingPolicy::default(),
    );
    setup.initial = State::new(0.05, 0.0, 0.0, 0.0);

    let run = Simulation::new(setup).unwrap().run().unwrap();

    let last = run.final_state().unwrap();
    assert_abs_diff_eq!(last.theta, 0.0, epsilon = 1e-3);
    assert!(run.trajectory.iter().all(|state| state.theta.abs() < PI / 9.0));
}

#[test]
fn output_samples_follow_the_switch() {
    let simulation = Simulation::new(setup(
        Preset::PolePlaced,
        4.0,
        Method::default(),
        RecordingPolicy::OutputSamples,
    ))
    .unwrap();

    let run = simulation.run().unwrap();
    let switch = run.switch_time.unwrap();
    let law = ControlLaw::new(Preset::PolePlaced.plant(), Preset::PolePlaced.gains());

    assert_eq!(run.controls.len(), run.len());
    for (i, (&t, state)) in run.times.iter().zip(&run.trajectory).enumerate() {
        let mode = if switch <= t {
            ControlMode::Stabilize
        } else {
            ControlMode::SwingUp
        };

        assert_eq!(run.controls.modes[i], mode);
        assert_eq!(run.controls.values[i], law.control_for_mode(mode, state));
    }
}

#[test]
fn single_sample_run_skips_the_solver() {
    for recording in POLICIES {
        let run = Simulation::new(setup(
            Preset::Reference,
            0.01,
            Method::default(),
            recording,
        ))
        .unwrap()
        .run()
        .unwrap();

        assert_eq!(run.trajectory, vec![Preset::Reference.initial_state()]);
        assert_eq!(run.stats.evaluations, 0);
        assert_eq!(run.switch_time, None);

        let expected = match recording {
            RecordingPolicy::EveryEvaluation => 0,
            RecordingPolicy::OutputSamples => 1,
        };
        assert_eq!(run.controls.len(), expected);
    }
}

#[test]
fn config_text_drives_a_run() {
    let config = SimulationConfig::from_toml(
        r#"
        preset = "pole-placed"
        recording = "output-samples"

        [time]
        dt = 0.1
        t_max = 1.0

        [solver]
        method = "rk4"
        "#,
    )
    .unwrap();

    let simulation = Simulation::new(config.resolve()).unwrap();
    let run = simulation.run().unwrap();

    assert_eq!(simulation.grid().len(), 10);
    assert_eq!(run.len(), 10);
    assert_eq!(run.controls.len(), 10);
    assert_relative_eq!(run.times[9], 0.9, max_relative = 1e-12);
}
