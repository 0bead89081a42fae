//! Pen engine - the cooperative polling loop
//!
//! One poll = one button sample -> input state machine -> simulation step,
//! all at a single clock reading. Rendering is pulled separately with
//! `frame()`. The engine never sleeps; the caller decides the cadence.

use serde::Serialize;

use crate::core::clock::Clock;
use crate::core::config::PenConfig;
use crate::core::error::Result;
use crate::core::types::{Button, Millis};
use crate::input::{process_button, Gesture};
use crate::render::{project, LcdFrame};
use crate::simulation::state::SimulationState;
use crate::simulation::tick::{run_simulation_step, PenEvent};
use crate::simulation::wander::Wander;

/// What happened during one poll
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollReport {
    pub now: Millis,
    pub gesture: Option<Gesture>,
    pub events: Vec<PenEvent>,
}

pub struct PenEngine<C: Clock, W: Wander> {
    config: PenConfig,
    clock: C,
    wander: W,
    state: SimulationState,
    polls: u64,
}

impl<C: Clock, W: Wander> PenEngine<C, W> {
    /// Validate the config and spawn the initial population at the current reading
    pub fn new(config: PenConfig, clock: C, wander: W) -> Result<Self> {
        config.validate()?;
        let now = clock.now_ms();
        let state = SimulationState::from_config(&config, now)?;

        tracing::info!(
            "Pen {} opened at {}ms with {} monsters and balance {}",
            state.pen.index,
            now,
            state.pen.monsters.len(),
            state.pen.bank_balance
        );

        Ok(Self {
            config,
            clock,
            wander,
            state,
            polls: 0,
        })
    }

    /// Run one loop iteration with the given button sample
    pub fn poll(&mut self, button: Button) -> PollReport {
        let now = self.clock.now_ms();
        let gesture = process_button(&mut self.state, button, &self.config);
        let events = run_simulation_step(&mut self.state, now, &self.config, &mut self.wander);
        self.polls += 1;

        PollReport {
            now,
            gesture,
            events,
        }
    }

    /// Current display contents
    pub fn frame(&self) -> LcdFrame {
        project(&self.state, self.clock.now_ms(), &self.config)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &PenConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// True once every monster has died and decayed
    pub fn is_empty(&self) -> bool {
        self.state.pen.monsters.is_empty()
    }
}
