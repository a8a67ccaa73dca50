use glam::{Quat, Vec3};
use rapier3d::prelude::ColliderHandle;

use crate::physics::{Layers, PhysicsWorld};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapObjectKind {
    Ground,
    StaticBox,
    /// A box tilted about Z by the given angle in degrees, rising towards +X.
    Ramp(f32),
}

#[derive(Debug, Clone)]
pub struct MapObject {
    pub kind: MapObjectKind,
    pub position: Vec3,
    pub half_extents: Vec3,
    pub layers: Layers,
}

impl MapObject {
    /// Ground slab whose top face sits at `position.y`.
    pub fn ground(position: Vec3, half_size: f32) -> Self {
        Self {
            kind: MapObjectKind::Ground,
            position,
            half_extents: Vec3::new(half_size, 0.1, half_size),
            layers: Layers::GROUND,
        }
    }

    pub fn static_box(position: Vec3, half_extents: Vec3, layers: Layers) -> Self {
        Self {
            kind: MapObjectKind::StaticBox,
            position,
            half_extents,
            layers,
        }
    }

    /// A walkable ramp whose low top edge meets the ground at `foot`.
    pub fn ramp(foot: Vec3, half_extents: Vec3, angle_degrees: f32) -> Self {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let position = foot
            + Vec3::new(
                half_extents.x * cos + half_extents.y * sin,
                half_extents.x * sin - half_extents.y * cos,
                0.0,
            );

        Self {
            kind: MapObjectKind::Ramp(angle_degrees),
            position,
            half_extents,
            layers: Layers::GROUND,
        }
    }

    pub fn rotation(&self) -> Quat {
        match self.kind {
            MapObjectKind::Ramp(angle) => Quat::from_rotation_z(angle.to_radians()),
            MapObjectKind::Ground | MapObjectKind::StaticBox => Quat::IDENTITY,
        }
    }

    /// Outward normal of the top face.
    pub fn top_normal(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Centre of the top face.
    pub fn top_center(&self) -> Vec3 {
        match self.kind {
            MapObjectKind::Ground => self.position,
            MapObjectKind::StaticBox | MapObjectKind::Ramp(_) => {
                self.position + self.top_normal() * self.half_extents.y
            }
        }
    }

    pub fn spawn(&self, physics: &mut PhysicsWorld) -> ColliderHandle {
        match self.kind {
            MapObjectKind::Ground => physics.add_ground(self.position.y, self.half_extents.x),
            MapObjectKind::StaticBox => {
                physics.add_static_box(self.position, self.half_extents, self.layers)
            }
            MapObjectKind::Ramp(angle) => {
                physics.add_ramp(self.position, self.half_extents, angle, self.layers)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_foot_meets_the_ground() {
        let ramp = MapObject::ramp(Vec3::new(10.0, 0.0, 0.0), Vec3::new(5.0, 0.5, 2.0), 25.0);
        let low_edge = ramp.top_center() - ramp.rotation() * Vec3::X * ramp.half_extents.x;
        assert!(low_edge.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn ramp_normal_tilts_by_its_angle() {
        let ramp = MapObject::ramp(Vec3::ZERO, Vec3::new(5.0, 0.5, 2.0), 60.0);
        let angle = ramp.top_normal().angle_between(Vec3::Y).to_degrees();
        assert!((angle - 60.0).abs() < 1e-3);
        assert!(ramp.top_normal().x < 0.0);
    }

    #[test]
    fn flat_objects_face_up() {
        let ground = MapObject::ground(Vec3::ZERO, 50.0);
        assert_eq!(ground.top_normal(), Vec3::Y);
        assert_eq!(ground.top_center(), Vec3::ZERO);

        let crate_box = MapObject::static_box(Vec3::new(0.0, 0.5, 0.0), Vec3::splat(0.5), Layers::PROPS);
        assert_eq!(crate_box.top_center(), Vec3::new(0.0, 1.0, 0.0));
    }
}
