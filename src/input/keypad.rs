//! Analog keypad decoding
//!
//! The five buttons share one analog pin through a resistor ladder. Each
//! button pulls the 10-bit reading towards a known centre value; readings are
//! bucketed with ~50 counts of headroom above each centre.

use crate::core::types::Button;

/// Full-scale 10-bit reading, seen when nothing is pressed
pub const ADC_MAX: u16 = 1023;

/// Map a raw analog reading to a button
pub fn decode_adc(reading: u16) -> Button {
    // None first: it is by far the most common sample
    if reading >= 790 {
        return Button::None;
    }
    if reading < 50 {
        return Button::Right;
    }
    if reading < 195 {
        return Button::Up;
    }
    if reading < 380 {
        return Button::Down;
    }
    if reading < 555 {
        return Button::Left;
    }
    Button::Select
}

impl Button {
    /// Centre reading a pressed button produces
    pub fn nominal_adc(self) -> u16 {
        match self {
            Button::Right => 0,
            Button::Up => 144,
            Button::Down => 329,
            Button::Left => 504,
            Button::Select => 741,
            Button::None => ADC_MAX,
        }
    }
}
