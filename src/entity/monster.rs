//! A single creature in the pen

use serde::{Deserialize, Serialize};

use crate::core::types::{Millis, MonsterId, Species};

/// One creature in the pen
///
/// Timestamps are readings of the shared clock and are only used to compute
/// the next due time; they are never compared against wall time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub species: Species,
    /// Column on the writable strip, always `< WRITABLE_WIDTH`
    pub position: u8,
    /// False once the monster has starved; never set back to true
    pub alive: bool,
    pub hunger: u32,
    /// Divides both the action and the hunger period
    pub speed: u32,
    pub last_acted_at: Millis,
    pub last_hunger_tick_at: Millis,
    pub died_at: Option<Millis>,
}

impl Monster {
    pub fn new(id: MonsterId, species: Species, position: u8, now: Millis) -> Self {
        Self {
            id,
            species,
            position,
            alive: true,
            hunger: 0,
            speed: species.base_speed(),
            last_acted_at: now,
            last_hunger_tick_at: now,
            died_at: None,
        }
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        assert!(speed > 0, "monster speed must be positive");
        self.speed = speed;
        self
    }

    pub fn with_hunger(mut self, hunger: u32) -> Self {
        self.hunger = hunger;
        self
    }

    pub fn next_hunger_due(&self, hunger_period_ms: Millis) -> Millis {
        self.last_hunger_tick_at + self.scaled_period(hunger_period_ms)
    }

    pub fn next_action_due(&self, action_period_ms: Millis) -> Millis {
        self.last_acted_at + self.scaled_period(action_period_ms)
    }

    /// Period divided by speed, never below 1ms so the schedule always moves forward
    fn scaled_period(&self, period_ms: Millis) -> Millis {
        (period_ms / self.speed as Millis).max(1)
    }

    /// Latch death at `now`. Calling this on a corpse keeps the first time of death.
    pub fn kill(&mut self, now: Millis) {
        if self.alive {
            self.alive = false;
            self.died_at = Some(now);
        }
    }

    /// True once the corpse has outlived the decay duration
    pub fn is_decayed(&self, now: Millis, decay_duration_ms: Millis) -> bool {
        match self.died_at {
            Some(died_at) if !self.alive => now > died_at + decay_duration_ms,
            _ => false,
        }
    }
}
