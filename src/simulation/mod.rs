pub mod engine;
pub mod state;
pub mod tick;
pub mod wander;

pub use engine::{PenEngine, PollReport};
pub use state::{Cursor, Pen, SimulationState};
pub use tick::{run_simulation_step, PenEvent};
pub use wander::{ClockWander, SeededWander, Step, Wander};
