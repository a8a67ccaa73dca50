use rapier3d::prelude::RigidBodyHandle;

use crate::physics::PhysicsWorld;
use crate::player::{MotionReadout, PlayerController, StateEvent};

use super::actor::{Actor, ActorId, ActorSetup, ActorSlot, SetupError};

/// Longest frame the simulation will catch up on.
pub const MAX_FRAME_DELTA: f32 = 0.25;

pub const DEFAULT_TICK_RATE: u32 = 50;

pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            dt: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta.clamp(0.0, MAX_FRAME_DELTA);
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }
}

/// Owns the physics world and every actor, and runs them in lockstep.
pub struct Simulation {
    physics: PhysicsWorld,
    timestep: FixedTimestep,
    actors: Vec<ActorSlot>,
    events: Vec<(ActorId, StateEvent)>,
    steps: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}

impl Simulation {
    pub fn new(tick_rate: u32) -> Self {
        let timestep = FixedTimestep::new(tick_rate);
        Self {
            physics: PhysicsWorld::with_timestep(timestep.dt()),
            timestep,
            actors: Vec::new(),
            events: Vec::new(),
            steps: 0,
        }
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Physics steps run since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Registers an actor. Setup problems are logged and leave the actor
    /// disabled; it keeps its id so callers can still inspect it.
    pub fn spawn_actor(&mut self, setup: ActorSetup) -> ActorId {
        let id = ActorId(self.actors.len() as u32);

        let slot = match self.build_actor(id, setup) {
            Ok(actor) => {
                log::info!("{id} spawned");
                ActorSlot::Active(actor)
            }
            Err(reason) => {
                log::error!("{id} disabled: {reason}");
                ActorSlot::Disabled { id, reason }
            }
        };

        self.actors.push(slot);
        self.collect_events();
        id
    }

    fn build_actor(&mut self, id: ActorId, setup: ActorSetup) -> Result<Actor, SetupError> {
        let (stats, handle, input, orientation) = setup.into_parts()?;
        let mut body = self
            .physics
            .character(handle)
            .ok_or(SetupError::MissingBody)?;
        let controller = PlayerController::new(stats, orientation, &mut body)?;

        Ok(Actor {
            id,
            body: handle,
            input,
            controller,
        })
    }

    /// Runs one frame: the frame tick for every actor, then as many physics
    /// steps as the accumulated time allows. Returns the number of steps.
    pub fn frame(&mut self, delta: f32) -> u32 {
        let delta = delta.clamp(0.0, MAX_FRAME_DELTA);
        self.timestep.accumulate(delta);

        for slot in &mut self.actors {
            let ActorSlot::Active(actor) = &mut *slot else {
                continue;
            };

            let id = actor.id;
            let Some(mut body) = self.physics.character(actor.body) else {
                log::warn!("{id} lost its body, disabling");
                *slot = ActorSlot::Disabled {
                    id,
                    reason: SetupError::MissingBody,
                };
                continue;
            };

            let input = actor.input.poll(delta);
            actor.controller.update(&mut body, input, delta);
        }

        let mut steps_run = 0;
        while self.timestep.consume_tick() {
            self.step();
            steps_run += 1;
        }

        self.collect_events();
        steps_run
    }

    fn step(&mut self) {
        for actor in active(&mut self.actors) {
            if let Some(mut body) = self.physics.character(actor.body) {
                actor.controller.fixed_update(&mut body);
            }
        }

        self.physics.step();

        for actor in active(&mut self.actors) {
            if let Some(mut body) = self.physics.character(actor.body) {
                actor.controller.speed_control(&mut body);
            }
        }

        self.steps += 1;
    }

    fn collect_events(&mut self) {
        for actor in active(&mut self.actors) {
            let id = actor.id;
            self.events
                .extend(actor.controller.drain_events().map(|event| (id, event)));
        }
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = (ActorId, StateEvent)> + '_ {
        self.events.drain(..)
    }

    pub fn actor_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.iter().map(ActorSlot::id)
    }

    pub fn is_enabled(&self, id: ActorId) -> bool {
        matches!(self.slot(id), Some(ActorSlot::Active(_)))
    }

    pub fn setup_error(&self, id: ActorId) -> Option<&SetupError> {
        match self.slot(id)? {
            ActorSlot::Disabled { reason, .. } => Some(reason),
            ActorSlot::Active(_) => None,
        }
    }

    pub fn controller(&self, id: ActorId) -> Option<&PlayerController> {
        match self.slot(id)? {
            ActorSlot::Active(actor) => Some(&actor.controller),
            ActorSlot::Disabled { .. } => None,
        }
    }

    pub fn body_handle(&self, id: ActorId) -> Option<RigidBodyHandle> {
        match self.slot(id)? {
            ActorSlot::Active(actor) => Some(actor.body),
            ActorSlot::Disabled { .. } => None,
        }
    }

    pub fn set_yaw(&mut self, id: ActorId, yaw: f32) {
        if let Some(ActorSlot::Active(actor)) = self.actors.get_mut(id.0 as usize) {
            actor.controller.set_yaw(yaw);
        }
    }

    /// Motion readout for cosmetic consumers; `None` for disabled actors.
    pub fn readout(&mut self, id: ActorId) -> Option<MotionReadout> {
        let ActorSlot::Active(actor) = self.actors.get(id.0 as usize)? else {
            return None;
        };
        let body = self.physics.character(actor.body)?;
        Some(actor.controller.readout(&body))
    }

    fn slot(&self, id: ActorId) -> Option<&ActorSlot> {
        self.actors.get(id.0 as usize)
    }
}

fn active(actors: &mut [ActorSlot]) -> impl Iterator<Item = &mut Actor> {
    actors.iter_mut().filter_map(|slot| match slot {
        ActorSlot::Active(actor) => Some(actor),
        ActorSlot::Disabled { .. } => None,
    })
}
