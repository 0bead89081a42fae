//! Input state machine
//!
//! Buttons are interpreted on change: when a sample differs from the last
//! one, the *previous* button is treated as a completed gesture. Holding a
//! button therefore fires exactly once, on release (or on switching to
//! another button).
//!
//! The input side only ever touches the cursor, the treat slots, the bank
//! balance and the display mode. It never mutates the monster registry.

pub mod keypad;

use serde::{Deserialize, Serialize};

use crate::core::config::PenConfig;
use crate::core::types::{wrap_column, Button, WRITABLE_WIDTH};
use crate::simulation::state::SimulationState;

/// What the bottom LCD row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    /// Treat slots with the blinking cursor
    #[default]
    Treats,
    /// Bank balance readout
    Bank,
    /// Alive/dead head count
    Roster,
}

impl InputMode {
    pub const ALL: [InputMode; 3] = [InputMode::Treats, InputMode::Bank, InputMode::Roster];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A completed button interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gesture {
    CursorMoved { to: u8 },
    TreatPlaced { position: u8, balance: u32 },
    TreatRemoved { position: u8, balance: u32 },
    /// Not enough money; nothing changed
    TreatRefused { position: u8 },
    ModeChanged { mode: InputMode },
}

/// Feed one button sample into the state machine
///
/// Returns the gesture completed by this sample, if any.
pub fn process_button(
    state: &mut SimulationState,
    sample: Button,
    config: &PenConfig,
) -> Option<Gesture> {
    let previous = state.cursor.last_button;
    let gesture = if sample != previous {
        interpret(state, previous, config)
    } else {
        None
    };
    state.cursor.last_button = sample;

    assert!(
        (state.cursor.position as usize) < WRITABLE_WIDTH,
        "cursor escaped the strip: {}",
        state.cursor.position
    );

    if let Some(gesture) = gesture {
        tracing::debug!("Gesture completed: {:?}", gesture);
    }
    gesture
}

fn interpret(state: &mut SimulationState, released: Button, config: &PenConfig) -> Option<Gesture> {
    match released {
        Button::Left => Some(move_cursor(state, -1)),
        Button::Right => Some(move_cursor(state, 1)),
        Button::Select => Some(toggle_treat(state, config)),
        Button::Up => {
            state.mode = state.mode.next();
            Some(Gesture::ModeChanged { mode: state.mode })
        }
        Button::Down => {
            state.mode = state.mode.prev();
            Some(Gesture::ModeChanged { mode: state.mode })
        }
        Button::None => None,
    }
}

fn move_cursor(state: &mut SimulationState, delta: i32) -> Gesture {
    state.cursor.position = wrap_column(state.cursor.position as i32 + delta);
    Gesture::CursorMoved {
        to: state.cursor.position,
    }
}

fn toggle_treat(state: &mut SimulationState, config: &PenConfig) -> Gesture {
    let position = state.cursor.position;
    let pen = &mut state.pen;
    let slot = position as usize;

    if pen.treats[slot] {
        pen.treats[slot] = false;
        if config.economy {
            pen.bank_balance += 1;
        }
        return Gesture::TreatRemoved {
            position,
            balance: pen.bank_balance,
        };
    }

    if config.economy {
        match pen.bank_balance.checked_sub(1) {
            Some(balance) => pen.bank_balance = balance,
            None => return Gesture::TreatRefused { position },
        }
    }
    pen.treats[slot] = true;
    Gesture::TreatPlaced {
        position,
        balance: pen.bank_balance,
    }
}
