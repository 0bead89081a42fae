//! Monster Pen - a pen of hungry monsters on a 16x2 character display

pub mod core;
pub mod entity;
pub mod input;
pub mod render;
pub mod simulation;
pub mod ui;
