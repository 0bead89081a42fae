//! Shared pen state
//!
//! Everything the simulation step, the input state machine and the render
//! projector touch is bundled into one `SimulationState` that is passed by
//! reference; there is no global state.

use serde::Serialize;

use crate::core::config::PenConfig;
use crate::core::error::Result;
use crate::core::types::{Button, Millis, WRITABLE_WIDTH};
use crate::entity::monster::Monster;
use crate::entity::registry::MonsterRegistry;
use crate::input::InputMode;

/// The pen: population, treat slots and economy
#[derive(Debug, Clone)]
pub struct Pen {
    /// Pen number shown in the top-left corner
    pub index: u8,
    pub monsters: MonsterRegistry,
    /// One slot per writable column, independent of monster positions
    pub treats: [bool; WRITABLE_WIDTH],
    pub bank_balance: u32,
}

impl Pen {
    pub fn new(index: u8, bank_balance: u32) -> Self {
        Self {
            index,
            monsters: MonsterRegistry::new(),
            treats: [false; WRITABLE_WIDTH],
            bank_balance,
        }
    }

    pub fn treat_at(&self, position: u8) -> bool {
        self.treats[position as usize]
    }

    pub fn treat_count(&self) -> usize {
        self.treats.iter().filter(|&&t| t).count()
    }

    /// (alive, dead) monster counts
    pub fn census(&self) -> (usize, usize) {
        let alive = self.monsters.iter().filter(|(_, m)| m.alive).count();
        (alive, self.monsters.len() - alive)
    }
}

/// Cursor on the treat row plus the last sampled button, used for edge detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Cursor {
    pub position: u8,
    pub last_button: Button,
}

/// Everything one polling loop owns
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub pen: Pen,
    pub cursor: Cursor,
    pub mode: InputMode,
}

impl SimulationState {
    /// Empty pen with the configured index and starting balance
    pub fn new(config: &PenConfig) -> Self {
        Self {
            pen: Pen::new(config.pen_index, config.starting_balance),
            cursor: Cursor::default(),
            mode: InputMode::default(),
        }
    }

    /// Pen with the configured initial population spawned at `now`
    pub fn from_config(config: &PenConfig, now: Millis) -> Result<Self> {
        let mut state = Self::new(config);
        for seed in &config.monsters {
            let id = state.pen.monsters.peek_next_id();
            let mut monster = Monster::new(id, seed.species, seed.position, now)
                .with_hunger(seed.hunger);
            if let Some(speed) = seed.speed {
                monster = monster.with_speed(speed);
            }
            state.pen.monsters.insert(monster)?;
        }
        Ok(state)
    }
}
