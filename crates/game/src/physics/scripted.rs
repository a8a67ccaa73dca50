use glam::Vec3;

use super::body::{CharacterBody, ForceMode, Layers, RayHit};

/// A horizontal surface at a fixed height, as seen by vertical rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub height: f32,
    pub normal: Vec3,
    pub layers: Layers,
}

impl Surface {
    pub fn flat(height: f32) -> Self {
        Self {
            height,
            normal: Vec3::Y,
            layers: Layers::GROUND,
        }
    }

    /// A floor whose normal is tilted `degrees` away from up, about the Z axis.
    pub fn tilted(height: f32, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        Self {
            height,
            normal: Vec3::new(-radians.sin(), radians.cos(), 0.0),
            layers: Layers::GROUND,
        }
    }
}

/// An in-memory rigid body with explicit Euler integration and scripted
/// floor and ceiling planes.
///
/// Nothing here touches rapier, so state machine behaviour can be tested
/// tick by tick without contact noise. Every force and impulse is recorded.
#[derive(Debug, Clone)]
pub struct ScriptedBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub gravity: f32,
    pub damping: f32,
    pub gravity_enabled: bool,
    pub standing_height: f32,
    pub floor: Option<Surface>,
    pub ceiling: Option<Surface>,
    y_scale: f32,
    pending_force: Vec3,
    forces: Vec<Vec3>,
    impulses: Vec<Vec3>,
}

impl ScriptedBody {
    pub fn new(position: Vec3, standing_height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            mass: 1.0,
            gravity: -9.81,
            damping: 0.0,
            gravity_enabled: true,
            standing_height,
            floor: None,
            ceiling: None,
            y_scale: 1.0,
            pending_force: Vec3::ZERO,
            forces: Vec::new(),
            impulses: Vec::new(),
        }
    }

    /// A body of `standing_height` resting on a flat floor at y = 0.
    pub fn on_flat_ground(standing_height: f32) -> Self {
        let mut body = Self::new(Vec3::new(0.0, standing_height / 2.0, 0.0), standing_height);
        body.floor = Some(Surface::flat(0.0));
        body
    }

    /// Puts the floor far below the probe so the body reads as airborne.
    pub fn lift_off(&mut self) {
        self.floor = None;
    }

    pub fn land(&mut self, surface: Surface) {
        self.floor = Some(surface);
        self.position.y = surface.height + self.half_height();
    }

    pub fn set_ceiling(&mut self, height: Option<f32>) {
        self.ceiling = height.map(Surface::flat);
    }

    /// Continuous forces applied since the last [`ScriptedBody::step`].
    pub fn forces(&self) -> &[Vec3] {
        &self.forces
    }

    pub fn impulses(&self) -> &[Vec3] {
        &self.impulses
    }

    pub fn clear_impulses(&mut self) {
        self.impulses.clear();
    }

    pub fn half_height(&self) -> f32 {
        self.standing_height * self.y_scale / 2.0
    }

    /// Integrates one step and clears the accumulated continuous force.
    pub fn step(&mut self, dt: f32) {
        let mut acceleration = self.pending_force / self.mass;
        if self.gravity_enabled {
            acceleration.y += self.gravity;
        }

        self.velocity += acceleration * dt;
        self.velocity *= 1.0 / (1.0 + dt * self.damping);
        self.position += self.velocity * dt;

        if let Some(floor) = self.floor {
            let rest = floor.height + self.half_height();
            if self.position.y < rest {
                self.position.y = rest;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }

        self.pending_force = Vec3::ZERO;
        self.forces.clear();
    }
}

impl CharacterBody for ScriptedBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Force => {
                self.pending_force += force;
                self.forces.push(force);
            }
            ForceMode::Impulse => {
                self.velocity += force / self.mass;
                self.impulses.push(force);
            }
        }
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.damping = damping;
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    fn y_scale(&self) -> f32 {
        self.y_scale
    }

    fn set_y_scale(&mut self, y_scale: f32) {
        self.y_scale = y_scale;
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: Layers,
    ) -> Option<RayHit> {
        let surface = if direction.y < 0.0 {
            self.floor?
        } else if direction.y > 0.0 {
            self.ceiling?
        } else {
            return None;
        };

        if !surface.layers.intersects(mask) {
            return None;
        }

        let distance = (surface.height - origin.y) / direction.y;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }

        Some(RayHit {
            distance,
            point: origin + direction * distance,
            normal: if direction.y < 0.0 {
                surface.normal
            } else {
                -surface.normal
            },
        })
    }
}
