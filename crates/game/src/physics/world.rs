use std::collections::HashMap;

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use super::body::{CharacterBody, ForceMode, Layers, RayHit};

/// Capsule dimensions of a spawned character. `height` is the full height at
/// a Y-scale of 1.0.
#[derive(Debug, Clone, Copy)]
struct CharacterShape {
    height: Real,
    radius: Real,
    y_scale: Real,
}

impl CharacterShape {
    fn capsule(&self) -> SharedShape {
        let (half_segment, radius) = capsule_dimensions(self.height * self.y_scale, self.radius);
        SharedShape::capsule_y(half_segment, radius)
    }
}

fn capsule_dimensions(height: Real, radius: Real) -> (Real, Real) {
    let radius = radius.min(height / 2.0);
    ((height / 2.0 - radius).max(0.01), radius)
}

pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector,
    characters: HashMap<RigidBodyHandle, CharacterShape>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub const DEFAULT_TIMESTEP: Real = 1.0 / 50.0;
    pub const GRAVITY: Real = -9.81;

    pub fn new() -> Self {
        Self::with_timestep(Self::DEFAULT_TIMESTEP)
    }

    pub fn with_timestep(dt: Real) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        integration_parameters.min_ccd_dt = dt / 100.0;

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vector::new(0.0, Self::GRAVITY, 0.0),
            characters: HashMap::new(),
        }
    }

    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    /// Advances the simulation by one fixed step. Continuous forces added
    /// to characters before the call act for this step only.
    pub fn step(&mut self) {
        self.pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        for handle in self.characters.keys() {
            if let Some(body) = self.bodies.get_mut(*handle) {
                body.reset_forces(false);
            }
        }
    }

    /// Spawns a rotation-locked dynamic capsule of unit mass.
    pub fn add_character(
        &mut self,
        position: Vec3,
        height: Real,
        radius: Real,
        y_scale: Real,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(position.x, position.y, position.z))
            .lock_rotations()
            .ccd_enabled(true)
            .build();

        let handle = self.bodies.insert(body);

        let shape = CharacterShape {
            height,
            radius,
            y_scale,
        };
        let collider = ColliderBuilder::new(shape.capsule())
            .mass(1.0)
            .friction(0.0)
            .restitution(0.0)
            .user_data(u128::from(Layers::PROPS.bits()))
            .build();

        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.sync_collider(collider);
        self.characters.insert(handle, shape);

        handle
    }

    /// Borrows a spawned character as a [`CharacterBody`].
    pub fn character(&mut self, handle: RigidBodyHandle) -> Option<RapierBody<'_>> {
        if self.bodies.contains(handle) && self.characters.contains_key(&handle) {
            Some(RapierBody {
                world: self,
                handle,
            })
        } else {
            None
        }
    }

    pub fn add_ground(&mut self, y: Real, half_size: Real) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_size, 0.1, half_size)
            .translation(Vector::new(0.0, y - 0.1, 0.0))
            .user_data(u128::from(Layers::GROUND.bits()))
            .build();
        self.insert_static(collider)
    }

    pub fn add_static_box(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        layers: Layers,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(Vector::new(position.x, position.y, position.z))
            .user_data(u128::from(layers.bits()))
            .build();
        self.insert_static(collider)
    }

    /// A box tilted about the Z axis; its top face rises towards +X.
    pub fn add_ramp(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        angle_degrees: Real,
        layers: Layers,
    ) -> ColliderHandle {
        let rotation = Quat::from_rotation_z(angle_degrees.to_radians());
        let rot = Rotation::from_xyzw(rotation.x, rotation.y, rotation.z, rotation.w).normalize();
        let pose = Pose::from_parts(Vector::new(position.x, position.y, position.z), rot);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(pose)
            .user_data(u128::from(layers.bits()))
            .build();
        self.insert_static(collider)
    }

    fn insert_static(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.colliders.insert(collider);
        self.sync_collider(handle);
        handle
    }

    /// Ray queries walk the broad phase, which the pipeline only refreshes
    /// inside `step`.
    fn sync_collider(&mut self, handle: ColliderHandle) {
        if let Some(collider) = self.colliders.get(handle) {
            let aabb =
                collider.compute_broad_phase_aabb(&self.integration_parameters, &self.bodies);
            self.broad_phase
                .set_aabb(&self.integration_parameters, handle, aabb);
        }
    }

    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.characters.remove(&handle);
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn set_body_position(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let current_rot = *body.rotation();
            let new_pose =
                Pose::from_parts(Vector::new(position.x, position.y, position.z), current_rot);
            body.set_position(new_pose, true);
        }
    }

    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(Vector::new(velocity.x, velocity.y, velocity.z), true);
        }
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| {
            let t = b.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| {
            let v = b.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    fn set_character_scale(&mut self, handle: RigidBodyHandle, y_scale: Real) {
        let Some(shape) = self.characters.get_mut(&handle) else {
            return;
        };

        let old_height = shape.height * shape.y_scale;
        shape.y_scale = y_scale;
        let new_height = shape.height * shape.y_scale;
        let capsule = shape.capsule();

        let Some(body) = self.bodies.get(handle) else {
            return;
        };

        let collider_handles: Vec<_> = body.colliders().to_vec();
        for collider_handle in collider_handles {
            if let Some(collider) = self.colliders.get_mut(collider_handle) {
                collider.set_shape(capsule.clone());
            }
            self.sync_collider(collider_handle);
        }

        // Keep the feet in place when growing so the capsule does not start
        // inside the floor.
        if new_height > old_height {
            if let Some(pos) = self.body_position(handle) {
                let lift = (new_height - old_height) / 2.0;
                self.set_body_position(handle, Vec3::new(pos.x, pos.y + lift, pos.z));
            }
        }
    }

    /// Casts a ray against colliders whose layers intersect `mask`.
    pub fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: Real,
        mask: Layers,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RayHit> {
        let on_mask = |_: ColliderHandle, collider: &Collider| {
            Layers::from_bits_truncate(collider.user_data as u32).intersects(mask)
        };

        let mut filter = QueryFilter::default().predicate(&on_mask);
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }

        let query = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        );

        let ray = Ray::new(
            Vector::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );

        query
            .cast_ray_and_get_normal(&ray, max_distance, true)
            .map(|(_, intersection)| RayHit {
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                ),
            })
    }
}

/// A character body borrowed from a [`PhysicsWorld`].
pub struct RapierBody<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl RapierBody<'_> {
    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }
}

impl CharacterBody for RapierBody<'_> {
    fn position(&self) -> Vec3 {
        self.world.body_position(self.handle).unwrap_or(Vec3::ZERO)
    }

    fn velocity(&self) -> Vec3 {
        self.world.body_velocity(self.handle).unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.world.set_body_velocity(self.handle, velocity);
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        let Some(body) = self.world.body_mut(self.handle) else {
            return;
        };

        let force = Vector::new(force.x, force.y, force.z);
        match mode {
            ForceMode::Force => body.add_force(force, true),
            ForceMode::Impulse => body.apply_impulse(force, true),
        }
    }

    fn set_linear_damping(&mut self, damping: f32) {
        if let Some(body) = self.world.body_mut(self.handle) {
            body.set_linear_damping(damping);
        }
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        if let Some(body) = self.world.body_mut(self.handle) {
            body.set_gravity_scale(if enabled { 1.0 } else { 0.0 }, true);
        }
    }

    fn y_scale(&self) -> f32 {
        self.world
            .characters
            .get(&self.handle)
            .map_or(1.0, |shape| shape.y_scale)
    }

    fn set_y_scale(&mut self, y_scale: f32) {
        self.world.set_character_scale(self.handle, y_scale);
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: Layers,
    ) -> Option<RayHit> {
        self.world
            .cast_ray(origin, direction, max_distance, mask, Some(self.handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capsule_never_degenerates() {
        let (half_segment, radius) = capsule_dimensions(0.5, 0.4);
        assert!(half_segment > 0.0);
        assert!(radius <= 0.25);

        let (half_segment, radius) = capsule_dimensions(2.0, 0.4);
        assert!((half_segment - 0.6).abs() < 1e-6);
        assert!((radius - 0.4).abs() < 1e-6);
    }

    #[test]
    fn character_lookup_requires_spawned_character() {
        let mut physics = PhysicsWorld::new();
        let prop = physics.bodies.insert(RigidBodyBuilder::dynamic().build());
        assert!(physics.character(prop).is_none());

        let handle = physics.add_character(Vec3::new(0.0, 1.0, 0.0), 2.0, 0.4, 1.0);
        assert!(physics.character(handle).is_some());

        physics.remove_body(handle);
        assert!(physics.character(handle).is_none());
    }

    #[test]
    fn rays_hit_colliders_before_the_first_step() {
        let mut physics = PhysicsWorld::new();
        physics.add_ground(0.0, 10.0);
        physics.add_static_box(Vec3::new(3.0, 0.5, 0.0), Vec3::splat(0.5), Layers::PROPS);

        let ground = physics
            .cast_ray(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 5.0, Layers::GROUND, None)
            .expect("ground");
        assert!((ground.distance - 2.0).abs() < 1e-4);

        let prop = physics
            .cast_ray(Vec3::new(3.0, 2.0, 0.0), Vec3::NEG_Y, 5.0, Layers::PROPS, None)
            .expect("prop");
        assert!((prop.distance - 1.0).abs() < 1e-4);

        let handle = physics.add_character(Vec3::new(-3.0, 1.0, 0.0), 2.0, 0.4, 1.0);
        let body = physics.character(handle).expect("character");
        let below = body.raycast(Vec3::new(-3.0, 1.0, 0.0), Vec3::NEG_Y, 1.2, Layers::GROUND);
        assert!(below.is_some());
    }

    #[test]
    fn scaling_a_character_resizes_its_capsule() {
        let mut physics = PhysicsWorld::new();
        let handle = physics.add_character(Vec3::new(0.0, 1.0, 0.0), 2.0, 0.4, 1.0);

        let mut body = physics.character(handle).expect("character");
        body.set_y_scale(0.5);
        assert!((body.y_scale() - 0.5).abs() < f32::EPSILON);
        let lowered = body.position();

        body.set_y_scale(1.0);
        let raised = body.position();
        assert!((raised.y - lowered.y - 0.5).abs() < 1e-4);
    }
}
