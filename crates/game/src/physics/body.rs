use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision layers a collider belongs to. Raycasts take a mask and only
    /// report colliders sharing at least one layer with it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Layers: u32 {
        const GROUND = 1 << 0;
        const PROPS = 1 << 1;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::GROUND
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Accumulated for the current physics step and integrated by mass.
    Force,
    /// Applied to velocity immediately.
    Impulse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// The rigid body a character controller drives.
///
/// Velocity and position belong to the physics backend; the controller only
/// reads them and pushes on the body through forces, impulses and the few
/// knobs below. Rotation is expected to be frozen by the backend.
pub trait CharacterBody {
    fn position(&self) -> Vec3;

    fn velocity(&self) -> Vec3;

    fn set_velocity(&mut self, velocity: Vec3);

    fn apply_force(&mut self, force: Vec3, mode: ForceMode);

    fn set_linear_damping(&mut self, damping: f32);

    fn set_gravity_enabled(&mut self, enabled: bool);

    fn y_scale(&self) -> f32;

    fn set_y_scale(&mut self, y_scale: f32);

    /// Casts a ray that ignores the body itself. `direction` must be normalized.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Layers)
    -> Option<RayHit>;
}
