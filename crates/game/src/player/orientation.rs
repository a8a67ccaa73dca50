use glam::Vec3;

/// Horizontal movement basis, driven by camera yaw rather than by the body,
/// whose rotation stays frozen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::from_yaw(0.0)
    }
}

impl Orientation {
    /// Yaw in radians; zero faces +Z with +X to the right.
    pub fn from_yaw(yaw: f32) -> Self {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        Self {
            forward: Vec3::new(sin_yaw, 0.0, cos_yaw),
            right: Vec3::new(cos_yaw, 0.0, -sin_yaw),
        }
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        *self = Self::from_yaw(yaw);
    }

    /// `forward * vertical + right * horizontal`, not normalized.
    pub fn wish_direction(&self, horizontal: f32, vertical: f32) -> Vec3 {
        self.forward * vertical + self.right * horizontal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn zero_yaw_faces_positive_z() {
        let orientation = Orientation::default();
        assert_eq!(orientation.forward, Vec3::Z);
        assert_eq!(orientation.right, Vec3::X);
    }

    #[test]
    fn quarter_turn_rotates_basis() {
        let orientation = Orientation::from_yaw(FRAC_PI_2);
        assert!(orientation.forward.abs_diff_eq(Vec3::X, 1e-6));
        assert!(orientation.right.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn wish_direction_combines_axes() {
        let orientation = Orientation::default();
        let dir = orientation.wish_direction(1.0, 1.0);
        assert!(dir.abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), 1e-6));
    }
}
