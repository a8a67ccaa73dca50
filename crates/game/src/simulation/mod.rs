mod actor;
mod tick;

pub use actor::{ActorId, ActorSetup, SetupError};
pub use tick::{DEFAULT_TICK_RATE, FixedTimestep, MAX_FRAME_DELTA, Simulation};
