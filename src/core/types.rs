//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Columns of the character display
pub const LCD_WIDTH: usize = 16;

/// Rows of the character display
pub const LCD_HEIGHT: usize = 2;

/// Addressable columns for monsters, treats and the cursor.
///
/// Column 0 of each LCD row holds a fixed glyph, so positions map to
/// display column `position + 1`.
pub const WRITABLE_WIDTH: usize = LCD_WIDTH - 1;

/// Milliseconds on the shared monotonic clock (arbitrary epoch)
pub type Millis = u64;

/// Unique identifier for monsters within a pen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl std::fmt::Display for MonsterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monster species enumeration
///
/// Species only affect the display glyph and the base speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Fuzzball,
    Dragon,
    Slime,
    Bat,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Fuzzball,
        Species::Dragon,
        Species::Slime,
        Species::Bat,
    ];

    /// Glyph drawn on the top row while the monster is alive
    pub fn glyph(&self) -> char {
        match self {
            Species::Fuzzball => 'a',
            Species::Dragon => 'D',
            Species::Slime => 's',
            Species::Bat => 'v',
        }
    }

    /// Default speed for freshly spawned monsters of this species
    pub fn base_speed(&self) -> u32 {
        match self {
            Species::Fuzzball => 1,
            Species::Dragon => 2,
            Species::Slime => 1,
            Species::Bat => 3,
        }
    }
}

/// One sample of the five-button keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Button {
    Right,
    Up,
    Down,
    Left,
    Select,
    #[default]
    None,
}

/// Wrap a signed column offset into `[0, WRITABLE_WIDTH)`
pub fn wrap_column(column: i32) -> u8 {
    column.rem_euclid(WRITABLE_WIDTH as i32) as u8
}
