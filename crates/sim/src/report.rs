use glam::Vec3;

use stride::{MotionReadout, StateEvent, StateKind};

/// Running totals for one scenario run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub frames: u32,
    pub distance: f32,
    pub top_speed: f32,
    pub jumps: u32,
    pub transitions: u32,
    pub final_state: Option<StateKind>,
    last_position: Option<Vec3>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, time: f32, event: StateEvent) {
        match event {
            StateEvent::Jumped => {
                self.jumps += 1;
                log::info!("t={time:.2}s jump");
            }
            StateEvent::Entered(kind) => {
                if self.final_state.is_some() {
                    self.transitions += 1;
                }
                self.final_state = Some(kind);
                log::info!("t={time:.2}s enter {kind}");
            }
            StateEvent::Exited(kind) => log::debug!("t={time:.2}s exit {kind}"),
        }
    }

    /// Adds one frame's motion. Distance is measured on the ground plane.
    pub fn record_frame(&mut self, position: Vec3, readout: MotionReadout) {
        self.frames += 1;
        if let Some(last) = self.last_position {
            let step = position - last;
            self.distance += Vec3::new(step.x, 0.0, step.z).length();
        }
        self.last_position = Some(position);
        self.top_speed = self.top_speed.max(readout.speed);
        self.final_state = Some(readout.state);
    }

    pub fn log_summary(&self, scenario: &str) {
        let state = self
            .final_state
            .map_or("disabled", |state| state.as_str());
        log::info!(
            "{scenario}: {} frames, final state {state}, distance {:.2} m, top speed {:.2} m/s, {} jumps, {} transitions",
            self.frames,
            self.distance,
            self.top_speed,
            self.jumps,
            self.transitions,
        );
    }
}
