//! LCD projection of the pen
//!
//! Produces the 2x16 character frame shown on the display.
//! This module is READ-ONLY - it never modifies simulation state.

use std::fmt;

use crate::core::config::PenConfig;
use crate::core::types::{Millis, LCD_HEIGHT, LCD_WIDTH, WRITABLE_WIDTH};
use crate::input::InputMode;
use crate::simulation::state::SimulationState;

/// Treat slot marker, also the fixed legend at the start of the treat row
pub const TREAT_GLYPH: char = '^';
/// Blinking cursor on the treat row
pub const CURSOR_GLYPH: char = '_';
/// A dead monster waiting to decay
pub const CORPSE_GLYPH: char = 'x';

const TOP_LINE: usize = 0;
const BOTTOM_LINE: usize = 1;

/// Character contents of the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdFrame {
    pub rows: [[char; LCD_WIDTH]; LCD_HEIGHT],
}

impl LcdFrame {
    pub fn blank() -> Self {
        Self {
            rows: [[' '; LCD_WIDTH]; LCD_HEIGHT],
        }
    }

    pub fn row(&self, line: usize) -> String {
        self.rows[line].iter().collect()
    }

    /// Write text starting at `column`, clipped at the right edge
    fn print(&mut self, line: usize, column: usize, text: &str) {
        for (cell, ch) in self.rows[line].iter_mut().skip(column).zip(text.chars()) {
            *cell = ch;
        }
    }
}

impl Default for LcdFrame {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Display for LcdFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.row(TOP_LINE))?;
        write!(f, "{}", self.row(BOTTOM_LINE))
    }
}

/// True during the half of the blink cycle when the cursor is drawn
pub fn cursor_visible(now: Millis, blink_period_ms: Millis) -> bool {
    (now / blink_period_ms) % 2 == 1
}

/// Project the pen into an LCD frame at clock reading `now`
pub fn project(state: &SimulationState, now: Millis, config: &PenConfig) -> LcdFrame {
    let mut frame = LcdFrame::blank();
    draw_monsters(&mut frame, state);

    match state.mode {
        InputMode::Treats => draw_treats(&mut frame, state, now, config),
        InputMode::Bank => {
            let text = format!("$Bank {}", state.pen.bank_balance);
            frame.print(BOTTOM_LINE, 0, &text);
        }
        InputMode::Roster => {
            let (alive, dead) = state.pen.census();
            let text = format!("#{} alive {} dead", alive, dead);
            frame.print(BOTTOM_LINE, 0, &text);
        }
    }

    frame
}

fn draw_monsters(frame: &mut LcdFrame, state: &SimulationState) {
    let index = char::from_digit(state.pen.index as u32 % 10, 10).unwrap_or('?');
    frame.rows[TOP_LINE][0] = index;

    // First monster in arrival order wins a shared column
    for (_, monster) in state.pen.monsters.iter() {
        let cell = &mut frame.rows[TOP_LINE][monster.position as usize + 1];
        if *cell == ' ' {
            *cell = if monster.alive {
                monster.species.glyph()
            } else {
                CORPSE_GLYPH
            };
        }
    }
}

fn draw_treats(frame: &mut LcdFrame, state: &SimulationState, now: Millis, config: &PenConfig) {
    let row = &mut frame.rows[BOTTOM_LINE];
    row[0] = TREAT_GLYPH;
    for position in 0..WRITABLE_WIDTH {
        if state.pen.treat_at(position as u8) {
            row[position + 1] = TREAT_GLYPH;
        }
    }
    if cursor_visible(now, config.blink_period_ms) {
        row[state.cursor.position as usize + 1] = CURSOR_GLYPH;
    }
}
