use glam::Vec3;

use crate::physics::{CharacterBody, ForceMode};

use super::context::STANCE_DOWN_FORCE;
use super::{GroundSensor, LocomotionState, MovementContext, StateKind};

#[derive(Debug, Default)]
pub struct WalkState;

impl LocomotionState for WalkState {
    fn kind(&self) -> StateKind {
        StateKind::Walk
    }

    fn update(
        &mut self,
        ctx: &mut MovementContext,
        body: &mut dyn CharacterBody,
        _dt: f32,
    ) -> Option<StateKind> {
        let input = ctx.input;
        let grounded = ctx.is_grounded();

        if input.sprint_held && grounded {
            return Some(StateKind::Sprint);
        }
        if input.crouch_held && grounded {
            return Some(StateKind::Crouch);
        }
        if input.jump_triggered && ctx.ready_to_jump() && grounded {
            // Leaving the ground is picked up by the air check next frame.
            ctx.do_jump(body);
        }
        if !grounded {
            return Some(StateKind::Air);
        }
        None
    }

    fn fixed_update(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.move_player(body, ctx.stats().walk_speed);
    }
}

#[derive(Debug, Default)]
pub struct SprintState;

impl LocomotionState for SprintState {
    fn kind(&self) -> StateKind {
        StateKind::Sprint
    }

    fn update(
        &mut self,
        ctx: &mut MovementContext,
        body: &mut dyn CharacterBody,
        _dt: f32,
    ) -> Option<StateKind> {
        let input = ctx.input;
        let grounded = ctx.is_grounded();

        if !input.sprint_held && grounded {
            return Some(StateKind::Walk);
        }
        // A fresh crouch press while sprinting slides; holding crouch does not.
        if input.crouch_triggered && grounded {
            return Some(StateKind::Slide);
        }
        if input.jump_triggered && ctx.ready_to_jump() && grounded {
            ctx.do_jump(body);
        }
        if !grounded {
            return Some(StateKind::Air);
        }
        None
    }

    fn fixed_update(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.move_player(body, ctx.stats().sprint_speed);
    }
}

#[derive(Debug, Default)]
pub struct CrouchState;

impl LocomotionState for CrouchState {
    fn kind(&self) -> StateKind {
        StateKind::Crouch
    }

    fn enter(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.change_scale(body, ctx.stats().crouch_y_scale);
        ctx.add_down_force(body, STANCE_DOWN_FORCE);
    }

    fn update(
        &mut self,
        ctx: &mut MovementContext,
        body: &mut dyn CharacterBody,
        _dt: f32,
    ) -> Option<StateKind> {
        if !ctx.input.crouch_held && GroundSensor::has_headroom(body, ctx.stats()) {
            return Some(StateKind::Walk);
        }
        if !ctx.is_grounded() {
            return Some(StateKind::Air);
        }
        None
    }

    fn fixed_update(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.move_player(body, ctx.stats().crouch_speed);
    }

    fn exit(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.change_scale(body, ctx.stats().start_y_scale);
    }
}

#[derive(Debug, Default)]
pub struct AirState;

impl LocomotionState for AirState {
    fn kind(&self) -> StateKind {
        StateKind::Air
    }

    fn update(
        &mut self,
        ctx: &mut MovementContext,
        _body: &mut dyn CharacterBody,
        _dt: f32,
    ) -> Option<StateKind> {
        if ctx.is_grounded() {
            return Some(StateKind::Walk);
        }
        None
    }

    /// Air control always works off walking speed, whatever the take-off
    /// speed was.
    fn fixed_update(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.move_player(body, ctx.stats().walk_speed);
    }
}

#[derive(Debug, Default)]
pub struct SlideState {
    timer: f32,
}

impl SlideState {
    pub fn remaining(&self) -> f32 {
        self.timer
    }
}

impl LocomotionState for SlideState {
    fn kind(&self) -> StateKind {
        StateKind::Slide
    }

    fn enter(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.change_scale(body, ctx.stats().slide_y_scale);
        ctx.add_down_force(body, STANCE_DOWN_FORCE);
        self.timer = ctx.stats().max_slide_time;
    }

    fn update(
        &mut self,
        ctx: &mut MovementContext,
        body: &mut dyn CharacterBody,
        dt: f32,
    ) -> Option<StateKind> {
        let input = ctx.input;
        self.timer -= dt;

        if self.timer <= 0.0 || !input.crouch_held {
            return Some(if input.crouch_held {
                StateKind::Crouch
            } else {
                StateKind::Walk
            });
        }
        if input.jump_triggered && ctx.ready_to_jump() && ctx.is_grounded() {
            ctx.do_jump(body);
        }
        None
    }

    fn fixed_update(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        let input = ctx.input;
        let mut direction = ctx
            .orientation
            .wish_direction(input.horizontal, input.vertical);
        if direction == Vec3::ZERO {
            direction = ctx.orientation.forward;
        }

        let direction = if ctx.on_slope() {
            ctx.ground().along_surface(direction)
        } else {
            direction.normalize_or_zero()
        };

        body.apply_force(direction * ctx.stats().slide_force, ForceMode::Force);
    }

    fn exit(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody) {
        ctx.change_scale(body, ctx.stats().start_y_scale);
    }
}

/// One instance of every state, built once per actor and dispatched by
/// [`StateKind`].
#[derive(Debug, Default)]
pub struct StateSet {
    walk: WalkState,
    sprint: SprintState,
    crouch: CrouchState,
    air: AirState,
    slide: SlideState,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_mut(&mut self, kind: StateKind) -> &mut dyn LocomotionState {
        match kind {
            StateKind::Walk => &mut self.walk,
            StateKind::Sprint => &mut self.sprint,
            StateKind::Crouch => &mut self.crouch,
            StateKind::Air => &mut self.air,
            StateKind::Slide => &mut self.slide,
        }
    }

    pub fn slide(&self) -> &SlideState {
        &self.slide
    }
}
