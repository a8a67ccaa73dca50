use std::fmt;

use crate::physics::CharacterBody;

use super::MovementContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Walk,
    Sprint,
    Crouch,
    Air,
    Slide,
}

impl StateKind {
    pub const ALL: [Self; 5] = [Self::Walk, Self::Sprint, Self::Crouch, Self::Air, Self::Slide];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Sprint => "sprint",
            Self::Crouch => "crouch",
            Self::Air => "air",
            Self::Slide => "slide",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle notifications emitted by a controller, in the order they
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Entered(StateKind),
    Exited(StateKind),
    Jumped,
}

/// One locomotion state. A state never switches itself: `update` returns
/// the state to switch to and the controller performs the exit and enter.
pub trait LocomotionState {
    fn kind(&self) -> StateKind;

    fn enter(&mut self, _ctx: &mut MovementContext, _body: &mut dyn CharacterBody) {}

    /// Transition checks for one frame, first match wins.
    fn update(
        &mut self,
        ctx: &mut MovementContext,
        body: &mut dyn CharacterBody,
        dt: f32,
    ) -> Option<StateKind>;

    /// Continuous forces for one physics step.
    fn fixed_update(&mut self, ctx: &mut MovementContext, body: &mut dyn CharacterBody);

    fn exit(&mut self, _ctx: &mut MovementContext, _body: &mut dyn CharacterBody) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (i, kind) in StateKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn kinds_display_lowercase() {
        assert_eq!(StateKind::Slide.to_string(), "slide");
        assert_eq!(StateKind::Air.as_str(), "air");
    }
}
