use glam::Vec3;

use crate::physics::CharacterBody;

use super::StatsConfig;

/// Result of one downward probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundReading {
    pub grounded: bool,
    /// Surface normal of the hit, `Vec3::Y` when airborne.
    pub normal: Vec3,
    /// Angle between the normal and up, in degrees.
    pub slope_angle: f32,
    pub on_slope: bool,
}

impl GroundReading {
    pub const AIRBORNE: Self = Self {
        grounded: false,
        normal: Vec3::Y,
        slope_angle: 0.0,
        on_slope: false,
    };

    pub fn from_normal(normal: Vec3, max_slope_angle: f32) -> Self {
        let slope_angle = normal.angle_between(Vec3::Y).to_degrees();
        Self {
            grounded: true,
            normal,
            slope_angle,
            // A perfectly flat hit is ground, not slope.
            on_slope: slope_angle > 0.0 && slope_angle < max_slope_angle,
        }
    }

    /// Projects `direction` onto the contact plane and normalizes it.
    pub fn along_surface(&self, direction: Vec3) -> Vec3 {
        direction.reject_from_normalized(self.normal).normalize_or_zero()
    }
}

impl Default for GroundReading {
    fn default() -> Self {
        Self::AIRBORNE
    }
}

pub struct GroundSensor;

impl GroundSensor {
    /// Probes straight down from the body origin and applies ground drag
    /// while grounded. Finding nothing is the ordinary airborne result.
    pub fn probe(body: &mut dyn CharacterBody, stats: &StatsConfig) -> GroundReading {
        let hit = body.raycast(
            body.position(),
            Vec3::NEG_Y,
            stats.ground_probe_length(),
            stats.ground_mask,
        );

        let reading = match hit {
            Some(hit) => GroundReading::from_normal(hit.normal, stats.max_slope_angle),
            None => GroundReading::AIRBORNE,
        };

        body.set_linear_damping(if reading.grounded { stats.ground_drag } else { 0.0 });
        log::trace!(
            "ground probe: grounded={} angle={:.2} slope={}",
            reading.grounded,
            reading.slope_angle,
            reading.on_slope
        );

        reading
    }

    /// Whether a crouched body has room to stand. The probe starts half a
    /// crouch height above the origin; no hit within the clearance means
    /// clear.
    pub fn has_headroom(body: &dyn CharacterBody, stats: &StatsConfig) -> bool {
        let origin = body.position() + Vec3::Y * (stats.crouch_y_scale * 0.5);
        body.raycast(origin, Vec3::Y, stats.stand_clearance(), stats.ground_mask)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ScriptedBody, Surface};

    #[test]
    fn exactly_flat_ground_is_not_a_slope() {
        let reading = GroundReading::from_normal(Vec3::Y, 40.0);
        assert!(reading.grounded);
        assert_eq!(reading.slope_angle, 0.0);
        assert!(!reading.on_slope);
    }

    #[test]
    fn gentle_incline_is_a_slope() {
        let reading = GroundReading::from_normal(Surface::tilted(0.0, 20.0).normal, 40.0);
        assert!(reading.on_slope);
        assert!((reading.slope_angle - 20.0).abs() < 1e-3);
    }

    #[test]
    fn steep_incline_is_ground_but_not_slope() {
        let reading = GroundReading::from_normal(Surface::tilted(0.0, 60.0).normal, 40.0);
        assert!(reading.grounded);
        assert!(!reading.on_slope);
    }

    #[test]
    fn along_surface_follows_the_incline() {
        let reading = GroundReading::from_normal(Surface::tilted(0.0, 30.0).normal, 40.0);
        let dir = reading.along_surface(Vec3::X);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.dot(reading.normal).abs() < 1e-5);
        assert!(dir.y > 0.0);
    }

    #[test]
    fn probe_sets_drag_only_when_grounded() {
        let stats = StatsConfig::default();
        let mut body = ScriptedBody::on_flat_ground(stats.player_height);

        let reading = GroundSensor::probe(&mut body, &stats);
        assert!(reading.grounded);
        assert_eq!(body.damping, stats.ground_drag);

        body.lift_off();
        let reading = GroundSensor::probe(&mut body, &stats);
        assert_eq!(reading, GroundReading::AIRBORNE);
        assert_eq!(body.damping, 0.0);
    }

    #[test]
    fn probe_ignores_surfaces_outside_the_mask() {
        let stats = StatsConfig::default();
        let mut body = ScriptedBody::on_flat_ground(stats.player_height);
        body.floor = Some(Surface {
            layers: crate::physics::Layers::PROPS,
            ..Surface::flat(0.0)
        });

        assert!(!GroundSensor::probe(&mut body, &stats).grounded);
    }

    #[test]
    fn no_ceiling_hit_means_clear_to_stand() {
        let stats = StatsConfig::default();
        let mut body = ScriptedBody::on_flat_ground(stats.player_height);
        body.set_y_scale(stats.crouch_y_scale);
        body.land(Surface::flat(0.0));
        assert!(GroundSensor::has_headroom(&body, &stats));

        // Probe starts at 0.5 + 0.25 and reaches 0.7 further.
        body.set_ceiling(Some(1.4));
        assert!(!GroundSensor::has_headroom(&body, &stats));

        body.set_ceiling(Some(1.5));
        assert!(GroundSensor::has_headroom(&body, &stats));
    }
}
