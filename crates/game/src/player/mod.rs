mod config;
mod context;
mod controller;
mod input;
mod orientation;
mod sensor;
mod state;
mod states;

pub use config::{ConfigError, StatsConfig};
pub use context::{
    GROUND_FORCE_FACTOR, MovementContext, SLOPE_FORCE_FACTOR, SLOPE_STICK_FORCE,
    STANCE_DOWN_FORCE,
};
pub use controller::{MotionReadout, PlayerController};
pub use input::{ButtonState, InputSampler, InputSnapshot, InputSource, ScriptedInput};
pub use orientation::Orientation;
pub use sensor::{GroundReading, GroundSensor};
pub use state::{LocomotionState, StateEvent, StateKind};
pub use states::{AirState, CrouchState, SlideState, SprintState, StateSet, WalkState};
