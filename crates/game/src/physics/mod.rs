mod body;
#[cfg(any(test, feature = "test-support"))]
mod scripted;
mod world;

pub use body::{CharacterBody, ForceMode, Layers, RayHit};
#[cfg(any(test, feature = "test-support"))]
pub use scripted::{ScriptedBody, Surface};
pub use world::{PhysicsWorld, RapierBody};
