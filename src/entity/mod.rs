pub mod monster;
pub mod registry;

pub use monster::Monster;
pub use registry::{Handle, MonsterRegistry};
