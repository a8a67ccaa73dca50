pub mod map;
pub mod physics;
pub mod player;
pub mod simulation;

pub use map::{Landmark, MapObject, MapObjectKind, TestCourse};
pub use physics::{CharacterBody, ForceMode, Layers, PhysicsWorld, RapierBody, RayHit};
#[cfg(any(test, feature = "test-support"))]
pub use physics::{ScriptedBody, Surface};
pub use player::{
    ButtonState, ConfigError, GroundReading, GroundSensor, InputSampler, InputSnapshot,
    InputSource, LocomotionState, MotionReadout, MovementContext, Orientation, PlayerController,
    ScriptedInput, StateEvent, StateKind, StatsConfig,
};
pub use simulation::{
    ActorId, ActorSetup, DEFAULT_TICK_RATE, FixedTimestep, MAX_FRAME_DELTA, SetupError,
    Simulation,
};
