/// Movement and action intents for one frame.
///
/// `jump_triggered` and `crouch_triggered` are edges: true only on the frame
/// the button went down. `sprint_held` and `crouch_held` are levels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub horizontal: f32,
    pub vertical: f32,
    pub jump_triggered: bool,
    pub sprint_held: bool,
    pub crouch_held: bool,
    pub crouch_triggered: bool,
}

impl InputSnapshot {
    pub fn has_movement(&self) -> bool {
        self.horizontal != 0.0 || self.vertical != 0.0
    }
}

/// Raw button levels and axes as read from a device or a script.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonState {
    pub horizontal: f32,
    pub vertical: f32,
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
}

/// Turns consecutive [`ButtonState`] samples into [`InputSnapshot`]s,
/// deriving the press edges.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    previous: ButtonState,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, buttons: ButtonState) -> InputSnapshot {
        let snapshot = InputSnapshot {
            horizontal: buttons.horizontal.clamp(-1.0, 1.0),
            vertical: buttons.vertical.clamp(-1.0, 1.0),
            jump_triggered: buttons.jump && !self.previous.jump,
            sprint_held: buttons.sprint,
            crouch_held: buttons.crouch,
            crouch_triggered: buttons.crouch && !self.previous.crouch,
        };
        self.previous = buttons;
        snapshot
    }
}

/// Supplies one actor's input, once per frame.
pub trait InputSource {
    fn poll(&mut self, dt: f32) -> InputSnapshot;
}

/// Replays the same snapshot every frame.
impl InputSource for InputSnapshot {
    fn poll(&mut self, _dt: f32) -> InputSnapshot {
        *self
    }
}

/// Plays back a timeline of held buttons, one segment after another.
/// After the last segment ends every button reads released.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    segments: Vec<(f32, ButtonState)>,
    elapsed: f32,
    sampler: InputSampler,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds `buttons` for `seconds`.
    pub fn hold(mut self, seconds: f32, buttons: ButtonState) -> Self {
        self.segments.push((seconds.max(0.0), buttons));
        self
    }

    /// Total length of the timeline in seconds.
    pub fn duration(&self) -> f32 {
        self.segments.iter().map(|(seconds, _)| seconds).sum()
    }

    pub fn buttons_at(&self, time: f32) -> ButtonState {
        let mut start = 0.0;
        for (seconds, buttons) in &self.segments {
            if time < start + seconds {
                return *buttons;
            }
            start += seconds;
        }
        ButtonState::default()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, dt: f32) -> InputSnapshot {
        let buttons = self.buttons_at(self.elapsed);
        self.elapsed += dt;
        self.sampler.sample(buttons)
    }
}
