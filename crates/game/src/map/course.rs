use glam::Vec3;

use crate::physics::{Layers, PhysicsWorld};

use super::{MapObject, MapObjectKind};

/// Named spots on the [`TestCourse`]. Each resolves to a point on a walkable
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landmark {
    Start,
    GentleRamp,
    SteepRamp,
    /// Just outside the crawl tunnel, facing into it along +Z.
    TunnelMouth,
    /// Under the middle of the tunnel roof.
    TunnelInside,
}

/// Flat ground, a walkable ramp, a ramp too steep to count as a slope, and a
/// crawl tunnel too low to stand up in.
pub struct TestCourse {
    objects: Vec<MapObject>,
    gentle_ramp: usize,
    steep_ramp: usize,
}

impl Default for TestCourse {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCourse {
    const GROUND_SIZE: f32 = 100.0;
    const GROUND_Y: f32 = 0.0;

    pub const GENTLE_RAMP_ANGLE: f32 = 25.0;
    pub const STEEP_RAMP_ANGLE: f32 = 60.0;

    /// Height of the underside of the tunnel roof.
    pub const TUNNEL_CLEARANCE: f32 = 1.4;
    const TUNNEL_X: f32 = -8.0;
    const TUNNEL_START_Z: f32 = 4.0;
    const TUNNEL_LENGTH: f32 = 8.0;

    pub fn new() -> Self {
        let mut objects = vec![MapObject::ground(
            Vec3::new(0.0, Self::GROUND_Y, 0.0),
            Self::GROUND_SIZE,
        )];

        let gentle_ramp = objects.len();
        objects.push(MapObject::ramp(
            Vec3::new(10.0, Self::GROUND_Y, 0.0),
            Vec3::new(6.0, 0.25, 3.0),
            Self::GENTLE_RAMP_ANGLE,
        ));

        let steep_ramp = objects.len();
        objects.push(MapObject::ramp(
            Vec3::new(10.0, Self::GROUND_Y, 12.0),
            Vec3::new(4.0, 0.25, 3.0),
            Self::STEEP_RAMP_ANGLE,
        ));

        Self::add_tunnel(&mut objects);
        Self::add_props(&mut objects);

        Self {
            objects,
            gentle_ramp,
            steep_ramp,
        }
    }

    fn add_tunnel(objects: &mut Vec<MapObject>) {
        let half_length = Self::TUNNEL_LENGTH * 0.5;
        let center_z = Self::TUNNEL_START_Z + half_length;
        let roof_half_height = 0.25;

        objects.push(MapObject::static_box(
            Vec3::new(
                Self::TUNNEL_X,
                Self::TUNNEL_CLEARANCE + roof_half_height,
                center_z,
            ),
            Vec3::new(1.5, roof_half_height, half_length),
            Layers::GROUND,
        ));

        for side in [-1.0, 1.0] {
            objects.push(MapObject::static_box(
                Vec3::new(Self::TUNNEL_X + side * 1.75, Self::TUNNEL_CLEARANCE * 0.5, center_z),
                Vec3::new(0.25, Self::TUNNEL_CLEARANCE * 0.5, half_length),
                Layers::GROUND,
            ));
        }
    }

    fn add_props(objects: &mut Vec<MapObject>) {
        for i in 0..3 {
            objects.push(MapObject::static_box(
                Vec3::new(4.0 + i as f32 * 1.5, 0.3, -6.0),
                Vec3::splat(0.3),
                Layers::PROPS,
            ));
        }
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn spawn(&self, physics: &mut PhysicsWorld) {
        for object in &self.objects {
            object.spawn(physics);
        }
        log::debug!("test course spawned with {} objects", self.objects.len());
    }

    /// Foot position of `landmark` on its surface.
    pub fn landmark(&self, landmark: Landmark) -> Vec3 {
        match landmark {
            Landmark::Start => Vec3::new(0.0, Self::GROUND_Y, 0.0),
            Landmark::GentleRamp => self.objects[self.gentle_ramp].top_center(),
            Landmark::SteepRamp => self.objects[self.steep_ramp].top_center(),
            Landmark::TunnelMouth => Vec3::new(Self::TUNNEL_X, Self::GROUND_Y, Self::TUNNEL_START_Z - 2.0),
            Landmark::TunnelInside => Vec3::new(
                Self::TUNNEL_X,
                Self::GROUND_Y,
                Self::TUNNEL_START_Z + Self::TUNNEL_LENGTH * 0.5,
            ),
        }
    }

    /// Where to place a body of `height` so it rests above `landmark`.
    pub fn spawn_point(&self, landmark: Landmark, height: f32) -> Vec3 {
        self.landmark(landmark) + Vec3::Y * (height * 0.5 + 0.05)
    }

    pub fn ramp_angles(&self) -> impl Iterator<Item = f32> + '_ {
        self.objects.iter().filter_map(|object| match object.kind {
            MapObjectKind::Ramp(angle) => Some(angle),
            MapObjectKind::Ground | MapObjectKind::StaticBox => None,
        })
    }
}
