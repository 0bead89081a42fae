//! Keyboard emulation of the analog keypad
//!
//! Terminals report key presses but not releases, so a pressed key is treated
//! as held for a short window and then released. While held, the emulated pin
//! reads the button's nominal voltage; otherwise it reads full scale.

use crossterm::event::KeyCode;

use crate::core::types::{Button, Millis};
use crate::input::keypad::{decode_adc, ADC_MAX};

/// Keyboard layout: arrows for the four directions, Enter or Space for Select
pub fn button_for_key(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::Left | KeyCode::Char('a') => Some(Button::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Button::Right),
        KeyCode::Up | KeyCode::Char('w') => Some(Button::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Button::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Button::Select),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct KeypadEmulator {
    held: Option<(Button, Millis)>,
    /// Same key pressed again while held; emit one released sample first
    retrigger: bool,
    hold_ms: Millis,
}

impl KeypadEmulator {
    pub fn new(hold_ms: Millis) -> Self {
        Self {
            held: None,
            retrigger: false,
            hold_ms,
        }
    }

    pub fn press(&mut self, button: Button, now: Millis) {
        if let Some((held, _)) = self.held {
            if held == button {
                self.retrigger = true;
            }
        }
        self.held = Some((button, now + self.hold_ms));
    }

    /// Emulated analog reading at `now`
    pub fn analog_read(&mut self, now: Millis) -> u16 {
        if self.retrigger {
            self.retrigger = false;
            return ADC_MAX;
        }
        match self.held {
            Some((button, until)) if now < until => button.nominal_adc(),
            _ => {
                self.held = None;
                ADC_MAX
            }
        }
    }

    /// Decoded button at `now`
    pub fn sample(&mut self, now: Millis) -> Button {
        decode_adc(self.analog_read(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_holds_then_releases() {
        let mut keypad = KeypadEmulator::new(100);
        assert_eq!(keypad.sample(0), Button::None);

        keypad.press(Button::Left, 10);
        assert_eq!(keypad.sample(20), Button::Left);
        assert_eq!(keypad.sample(109), Button::Left);
        assert_eq!(keypad.sample(110), Button::None);
    }

    #[test]
    fn test_repeat_press_inserts_release() {
        let mut keypad = KeypadEmulator::new(100);
        keypad.press(Button::Right, 0);
        assert_eq!(keypad.sample(10), Button::Right);

        keypad.press(Button::Right, 20);
        assert_eq!(keypad.sample(30), Button::None);
        assert_eq!(keypad.sample(40), Button::Right);
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(button_for_key(KeyCode::Left), Some(Button::Left));
        assert_eq!(button_for_key(KeyCode::Char(' ')), Some(Button::Select));
        assert_eq!(button_for_key(KeyCode::Char('q')), None);
    }

    #[test]
    fn test_other_key_replaces_held() {
        let mut keypad = KeypadEmulator::new(100);
        keypad.press(Button::Right, 0);
        keypad.press(Button::Select, 5);
        assert_eq!(keypad.sample(10), Button::Select);
    }
}
