use serde::{Deserialize, Serialize};

use crate::physics::Layers;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must lie in (0, start_y_scale], got {value}")]
    ScaleOutOfRange { field: &'static str, value: f32 },
    #[error("max_slope_angle must lie in (0, 90) degrees, got {0}")]
    SlopeOutOfRange(f32),
    #[error("ground_mask must select at least one layer")]
    EmptyGroundMask,
}

/// Tuning for one character. Immutable while the character is simulated.
///
/// Speeds are in metres per second, forces in newtons for a body of unit
/// mass, times in seconds and angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub ground_drag: f32,
    pub air_multiplier: f32,

    pub jump_force: f32,
    pub jump_cooldown: f32,

    pub crouch_speed: f32,
    pub crouch_y_scale: f32,
    pub start_y_scale: f32,

    pub max_slide_time: f32,
    pub slide_force: f32,
    pub slide_y_scale: f32,

    pub player_height: f32,
    pub ground_mask: Layers,
    pub max_slope_angle: f32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            sprint_speed: 10.0,
            ground_drag: 5.0,
            air_multiplier: 0.4,

            jump_force: 12.0,
            jump_cooldown: 0.25,

            crouch_speed: 3.5,
            crouch_y_scale: 0.5,
            start_y_scale: 1.0,

            max_slide_time: 0.75,
            slide_force: 200.0,
            slide_y_scale: 0.5,

            player_height: 2.0,
            ground_mask: Layers::GROUND,
            max_slope_angle: 40.0,
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("crouch_speed", self.crouch_speed),
            ("start_y_scale", self.start_y_scale),
            ("player_height", self.player_height),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("ground_drag", self.ground_drag),
            ("air_multiplier", self.air_multiplier),
            ("jump_force", self.jump_force),
            ("jump_cooldown", self.jump_cooldown),
            ("max_slide_time", self.max_slide_time),
            ("slide_force", self.slide_force),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("crouch_y_scale", self.crouch_y_scale),
            ("slide_y_scale", self.slide_y_scale),
        ] {
            if value <= 0.0 || value > self.start_y_scale || !value.is_finite() {
                return Err(ConfigError::ScaleOutOfRange { field, value });
            }
        }

        if !(self.max_slope_angle > 0.0 && self.max_slope_angle < 90.0) {
            return Err(ConfigError::SlopeOutOfRange(self.max_slope_angle));
        }

        if self.ground_mask.is_empty() {
            return Err(ConfigError::EmptyGroundMask);
        }

        Ok(())
    }

    /// Length of the downward ground probe measured from the body origin.
    pub fn ground_probe_length(&self) -> f32 {
        self.player_height * 0.5 + GROUND_PROBE_SKIN
    }

    /// Distance the ceiling probe must see clear before a crouch can end.
    pub fn stand_clearance(&self) -> f32 {
        (self.start_y_scale - self.crouch_y_scale) + STAND_CLEARANCE_MARGIN
    }
}

pub const GROUND_PROBE_SKIN: f32 = 0.3;
pub const STAND_CLEARANCE_MARGIN: f32 = 0.2;
