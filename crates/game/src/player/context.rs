use glam::Vec3;

use crate::physics::{CharacterBody, ForceMode};

use super::{GroundReading, GroundSensor, InputSnapshot, Orientation, StateKind, StatsConfig};

pub const SLOPE_FORCE_FACTOR: f32 = 20.0;
pub const GROUND_FORCE_FACTOR: f32 = 10.0;
/// Downward force that keeps the body on a slope while it moves upward.
pub const SLOPE_STICK_FORCE: f32 = 80.0;
pub const STANCE_DOWN_FORCE: f32 = 5.0;
/// Relative slack on the speed cap. A few ulps, so the rounding left by one
/// clamp never triggers another.
const CLAMP_SLACK: f32 = 8.0 * f32::EPSILON;

/// Shared per-actor movement state and the physics helpers the locomotion
/// states act through.
#[derive(Debug, Clone)]
pub struct MovementContext {
    stats: StatsConfig,
    pub orientation: Orientation,
    pub input: InputSnapshot,
    ground: GroundReading,
    exiting_slope: bool,
    ready_to_jump: bool,
    jump_cooldown: Option<f32>,
    jumps: u32,
}

impl MovementContext {
    pub fn new(stats: StatsConfig, orientation: Orientation) -> Self {
        Self {
            stats,
            orientation,
            input: InputSnapshot::default(),
            ground: GroundReading::AIRBORNE,
            exiting_slope: false,
            ready_to_jump: true,
            jump_cooldown: None,
            jumps: 0,
        }
    }

    pub fn stats(&self) -> &StatsConfig {
        &self.stats
    }

    pub fn ground(&self) -> &GroundReading {
        &self.ground
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.grounded
    }

    pub fn on_slope(&self) -> bool {
        self.ground.on_slope
    }

    pub fn exiting_slope(&self) -> bool {
        self.exiting_slope
    }

    pub fn ready_to_jump(&self) -> bool {
        self.ready_to_jump
    }

    /// Jumps performed since construction.
    pub fn jump_count(&self) -> u32 {
        self.jumps
    }

    /// Slope handling applies only while not leaving the slope by a jump.
    fn slope_active(&self) -> bool {
        self.ground.on_slope && !self.exiting_slope
    }

    pub fn sense_ground(&mut self, body: &mut dyn CharacterBody) {
        self.ground = GroundSensor::probe(body, &self.stats);
    }

    /// Counts the jump cooldown down; on expiry the jump is re-armed and the
    /// slope exit ends. Returns true on the tick the cooldown expires.
    pub fn tick_jump_cooldown(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.jump_cooldown.as_mut() else {
            return false;
        };

        *remaining -= dt;
        if *remaining > 0.0 {
            return false;
        }

        self.jump_cooldown = None;
        self.ready_to_jump = true;
        self.exiting_slope = false;
        true
    }

    /// Pushes the body along the wish direction at `speed`.
    pub fn move_player(&self, body: &mut dyn CharacterBody, speed: f32) {
        let direction = self
            .orientation
            .wish_direction(self.input.horizontal, self.input.vertical);

        if self.slope_active() {
            let force = self.ground.along_surface(direction) * speed * SLOPE_FORCE_FACTOR;
            body.apply_force(force, ForceMode::Force);

            if body.velocity().y > 0.0 {
                body.apply_force(Vec3::NEG_Y * SLOPE_STICK_FORCE, ForceMode::Force);
            }
        } else if self.ground.grounded {
            let force = direction.normalize_or_zero() * speed * GROUND_FORCE_FACTOR;
            body.apply_force(force, ForceMode::Force);
        } else {
            let force = direction.normalize_or_zero()
                * speed
                * GROUND_FORCE_FACTOR
                * self.stats.air_multiplier;
            body.apply_force(force, ForceMode::Force);
        }

        // Gravity would fight the normal force on an incline.
        body.set_gravity_enabled(!self.ground.on_slope);
    }

    /// Launches the body upward and arms the cooldown. Ignored while a
    /// previous jump is still cooling down.
    pub fn do_jump(&mut self, body: &mut dyn CharacterBody) -> bool {
        if !self.ready_to_jump {
            return false;
        }

        self.exiting_slope = true;

        let velocity = body.velocity();
        body.set_velocity(Vec3::new(velocity.x, 0.0, velocity.z));
        body.apply_force(Vec3::Y * self.stats.jump_force, ForceMode::Impulse);

        self.ready_to_jump = false;
        self.jump_cooldown = Some(self.stats.jump_cooldown);
        self.jumps += 1;
        log::debug!("jump: impulse {:.2}", self.stats.jump_force);
        true
    }

    pub fn change_scale(&self, body: &mut dyn CharacterBody, y_scale: f32) {
        body.set_y_scale(y_scale);
    }

    pub fn add_down_force(&self, body: &mut dyn CharacterBody, force: f32) {
        body.apply_force(Vec3::NEG_Y * force, ForceMode::Impulse);
    }

    /// Speed cap for the active state. Only sprint and crouch differ from
    /// walking speed; air and slide share the walking cap.
    pub fn speed_limit(&self, active: StateKind) -> f32 {
        match active {
            StateKind::Sprint => self.stats.sprint_speed,
            StateKind::Crouch => self.stats.crouch_speed,
            StateKind::Walk | StateKind::Air | StateKind::Slide => self.stats.walk_speed,
        }
    }

    /// Clamps the body's velocity after integration. On a slope the whole
    /// velocity is capped; elsewhere only the horizontal part, so jumps and
    /// falls are never slowed.
    pub fn speed_control(&self, body: &mut dyn CharacterBody, active: StateKind) {
        let limit = self.speed_limit(active);
        let velocity = body.velocity();

        if self.slope_active() {
            if over_limit(velocity.length(), limit) {
                body.set_velocity(velocity.normalize() * limit);
            }
        } else {
            let flat = Vec3::new(velocity.x, 0.0, velocity.z);
            if over_limit(flat.length(), limit) {
                let limited = flat.normalize() * limit;
                body.set_velocity(Vec3::new(limited.x, velocity.y, limited.z));
            }
        }
    }
}

fn over_limit(speed: f32, limit: f32) -> bool {
    speed > limit * (1.0 + CLAMP_SLACK)
}
