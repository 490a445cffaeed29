use std::{cell::RefCell, convert::Infallible};

use furuta_ode::OdeSystem;
use furuta_pendulum::{ControlMode, Controller, DynamicsModel, State};

use crate::{ControlHistoryRecorder, ControlRecord, RecordingPolicy};

/// The plant and controller of one run, seen as a single ODE system.
///
/// The solver evaluates the system through `&self`, so the controller and
/// the recorder sit behind a `RefCell`.
pub(crate) struct ClosedLoop<C> {
    model: DynamicsModel,
    policy: RecordingPolicy,
    inner: RefCell<Inner<C>>,
}

struct Inner<C> {
    controller: C,
    recorder: ControlHistoryRecorder,
}

impl<C: Controller> ClosedLoop<C> {
    pub(crate) fn new(model: DynamicsModel, controller: C, policy: RecordingPolicy) -> Self {
        Self {
            model,
            policy,
            inner: RefCell::new(Inner {
                controller,
                recorder: ControlHistoryRecorder::new(),
            }),
        }
    }

    pub(crate) fn into_parts(self) -> (C, ControlHistoryRecorder) {
        let Inner {
            controller,
            recorder,
        } = self.inner.into_inner();
        (controller, recorder)
    }
}

impl<C: Controller> OdeSystem<4> for ClosedLoop<C> {
    type Error = Infallible;

    fn derivative(&self, t: f64, y: &[f64; 4]) -> Result<[f64; 4], Self::Error> {
        let state = State::from(*y);

        let mut inner = self.inner.borrow_mut();
        let Inner {
            controller,
            recorder,
        } = &mut *inner;

        let mut recording = Recording {
            controller,
            recorder,
            policy: self.policy,
            t,
        };

        Ok(self.model.derivative(&state, t, &mut recording).into())
    }
}

/// Wraps a controller for one evaluation, logging what it computes.
struct Recording<'a, C> {
    controller: &'a mut C,
    recorder: &'a mut ControlHistoryRecorder,
    policy: RecordingPolicy,
    t: f64,
}

impl<C: Controller> Controller for Recording<'_, C> {
    fn compute_control(&mut self, state: &State) -> f64 {
        let before = self.controller.mode();
        let u = self.controller.compute_control(state);
        let mode = self.controller.mode();

        if before != ControlMode::Stabilize && mode == ControlMode::Stabilize {
            self.recorder.mark_switch(self.t);
        }

        if self.policy == RecordingPolicy::EveryEvaluation {
            self.recorder.record(ControlRecord { t: self.t, u, mode });
        }

        u
    }

    fn control_for_mode(&self, mode: ControlMode, state: &State) -> f64 {
        self.controller.control_for_mode(mode, state)
    }

    fn mode(&self) -> ControlMode {
        self.controller.mode()
    }
}
