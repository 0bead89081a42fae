//! Pen configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Display geometry is fixed by the
//! hardware and lives in `core::types` instead.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PenError, Result};
use crate::core::types::{Species, WRITABLE_WIDTH};

/// Configuration for the pen simulation
///
/// Periods are base values; each monster divides them by its speed, so a
/// speed-3 monster both acts and gets hungry three times as often.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PenConfig {
    // === TIMING ===
    /// Base time between hunger ticks (ms)
    ///
    /// At the default 10s and `death_hunger` 20, a speed-1 monster that
    /// never eats starves after a little over three minutes.
    pub hunger_period_ms: u64,

    /// Base time between actions (ms)
    ///
    /// An action is either eating a treat underfoot or a one-column step.
    pub action_period_ms: u64,

    /// How long a corpse stays in the pen before it is removed (ms)
    pub decay_duration_ms: u64,

    /// Half-period of the cursor blink on the treat row (ms)
    pub blink_period_ms: u64,

    /// Cadence of the front-end polling loop (ms)
    ///
    /// Should be well below `action_period_ms / max speed` so that polls
    /// rarely fall behind the schedule (late ticks are not batched).
    pub poll_interval_ms: u64,

    // === HUNGER ===
    /// Hunger level at which a monster dies
    pub death_hunger: u32,

    // === ECONOMY ===
    /// Whether placing treats costs money
    ///
    /// When disabled, Select toggles treats freely and the balance never moves.
    pub economy: bool,

    /// Bank balance at startup
    pub starting_balance: u32,

    // === PEN ===
    /// Pen number drawn in the top-left corner (single digit)
    pub pen_index: u8,

    /// Seed for the wander source
    pub seed: u64,

    /// Initial population, spawned in order at startup
    pub monsters: Vec<MonsterSeed>,
}

/// One monster of the initial population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSeed {
    pub species: Species,
    pub position: u8,
    #[serde(default)]
    pub hunger: u32,
    /// Overrides the species' base speed
    #[serde(default)]
    pub speed: Option<u32>,
}

impl MonsterSeed {
    pub fn new(species: Species, position: u8) -> Self {
        Self {
            species,
            position,
            hunger: 0,
            speed: None,
        }
    }

    /// The override if set, else the species' base speed
    pub fn effective_speed(&self) -> u32 {
        self.speed.unwrap_or_else(|| self.species.base_speed())
    }
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            hunger_period_ms: 10_000,
            action_period_ms: 1_000,
            decay_duration_ms: 5_000,
            blink_period_ms: 500,
            poll_interval_ms: 50,

            death_hunger: 20,

            economy: true,
            starting_balance: 10,

            pen_index: 1,
            seed: 12345,
            monsters: vec![
                MonsterSeed::new(Species::Fuzzball, 2),
                MonsterSeed::new(Species::Dragon, 6),
                MonsterSeed::new(Species::Slime, 10),
            ],
        }
    }
}

impl PenConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PenConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        // Periods divide by speed; zero would make every poll due
        if self.hunger_period_ms == 0 || self.action_period_ms == 0 {
            return Err(PenError::InvalidConfig(
                "hunger_period_ms and action_period_ms must be positive".into(),
            ));
        }

        if self.blink_period_ms == 0 || self.poll_interval_ms == 0 {
            return Err(PenError::InvalidConfig(
                "blink_period_ms and poll_interval_ms must be positive".into(),
            ));
        }

        if self.death_hunger == 0 {
            return Err(PenError::InvalidConfig("death_hunger must be positive".into()));
        }

        if self.pen_index > 9 {
            return Err(PenError::InvalidConfig(format!(
                "pen_index ({}) must be a single digit",
                self.pen_index
            )));
        }

        for (i, seed) in self.monsters.iter().enumerate() {
            if seed.position as usize >= WRITABLE_WIDTH {
                return Err(PenError::InvalidConfig(format!(
                    "monster {} position ({}) should be < {}",
                    i, seed.position, WRITABLE_WIDTH
                )));
            }
            let speed = seed.effective_speed();
            if speed == 0 {
                return Err(PenError::InvalidConfig(format!(
                    "monster {} speed must be positive",
                    i
                )));
            }
            // Integer division by speed must leave at least one millisecond
            if self.hunger_period_ms / speed as u64 == 0 || self.action_period_ms / speed as u64 == 0
            {
                return Err(PenError::InvalidConfig(format!(
                    "monster {} speed ({}) exceeds hunger_period_ms ({}) or action_period_ms ({})",
                    i, speed, self.hunger_period_ms, self.action_period_ms
                )));
            }
        }

        Ok(())
    }
}
