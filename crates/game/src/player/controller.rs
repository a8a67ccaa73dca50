use crate::physics::CharacterBody;

use super::{
    ConfigError, GroundReading, InputSnapshot, MovementContext, Orientation, StateEvent,
    StateKind, StateSet, StatsConfig,
};

/// Read-only view of an actor's motion for cosmetic consumers such as head
/// bob or footstep audio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionReadout {
    pub speed: f32,
    pub is_crouching: bool,
    pub is_grounded: bool,
    pub state: StateKind,
}

/// Drives one actor's locomotion state machine.
///
/// The driver calls [`update`](Self::update) once per frame, then for every
/// physics step [`fixed_update`](Self::fixed_update) before the world steps
/// and [`speed_control`](Self::speed_control) after it.
#[derive(Debug)]
pub struct PlayerController {
    ctx: MovementContext,
    states: StateSet,
    active: StateKind,
    events: Vec<StateEvent>,
}

impl PlayerController {
    /// Validates `stats` and enters [`StateKind::Walk`].
    pub fn new(
        stats: StatsConfig,
        orientation: Orientation,
        body: &mut dyn CharacterBody,
    ) -> Result<Self, ConfigError> {
        stats.validate()?;

        let mut controller = Self {
            ctx: MovementContext::new(stats, orientation),
            states: StateSet::new(),
            active: StateKind::Walk,
            events: Vec::new(),
        };

        controller.ctx.sense_ground(body);
        controller
            .states
            .get_mut(StateKind::Walk)
            .enter(&mut controller.ctx, body);
        controller.events.push(StateEvent::Entered(StateKind::Walk));

        Ok(controller)
    }

    pub fn context(&self) -> &MovementContext {
        &self.ctx
    }

    pub fn active_state(&self) -> StateKind {
        self.active
    }

    pub fn is_crouching(&self) -> bool {
        self.active == StateKind::Crouch
    }

    pub fn is_grounded(&self) -> bool {
        self.ctx.is_grounded()
    }

    pub fn ground(&self) -> &GroundReading {
        self.ctx.ground()
    }

    pub fn current_speed(&self, body: &dyn CharacterBody) -> f32 {
        body.velocity().length()
    }

    pub fn readout(&self, body: &dyn CharacterBody) -> MotionReadout {
        MotionReadout {
            speed: self.current_speed(body),
            is_crouching: self.is_crouching(),
            is_grounded: self.is_grounded(),
            state: self.active,
        }
    }

    /// Time left on the active slide, if sliding.
    pub fn slide_remaining(&self) -> Option<f32> {
        (self.active == StateKind::Slide).then(|| self.states.slide().remaining())
    }

    pub fn orientation(&self) -> Orientation {
        self.ctx.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.ctx.orientation = orientation;
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.ctx.orientation.set_yaw(yaw);
    }

    /// Frame tick: latches input, advances the jump cooldown, probes the
    /// ground and runs the active state's transition checks.
    pub fn update(&mut self, body: &mut dyn CharacterBody, input: InputSnapshot, dt: f32) {
        self.ctx.input = input;
        if self.ctx.tick_jump_cooldown(dt) {
            log::trace!("jump re-armed");
        }
        self.ctx.sense_ground(body);

        let jumps = self.ctx.jump_count();
        let next = self
            .states
            .get_mut(self.active)
            .update(&mut self.ctx, body, dt);

        if self.ctx.jump_count() != jumps {
            self.events.push(StateEvent::Jumped);
        }
        if let Some(next) = next {
            self.switch_state(body, next);
        }
    }

    pub fn fixed_update(&mut self, body: &mut dyn CharacterBody) {
        self.states
            .get_mut(self.active)
            .fixed_update(&mut self.ctx, body);
    }

    pub fn speed_control(&self, body: &mut dyn CharacterBody) {
        self.ctx.speed_control(body, self.active);
    }

    /// Exits the active state and enters `next`.
    pub fn switch_state(&mut self, body: &mut dyn CharacterBody, next: StateKind) {
        let previous = self.active;

        self.states
            .get_mut(previous)
            .exit(&mut self.ctx, body);
        self.events.push(StateEvent::Exited(previous));

        self.active = next;
        self.states.get_mut(next).enter(&mut self.ctx, body);
        self.events.push(StateEvent::Entered(next));

        log::debug!("state: {previous} -> {next}");
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = StateEvent> + '_ {
        self.events.drain(..)
    }
}
