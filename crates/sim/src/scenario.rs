use std::f32::consts::{FRAC_PI_2, PI};

use clap::ValueEnum;

use stride::{ButtonState, Landmark, ScriptedInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Walk up the gentle ramp and off its far edge.
    Stroll,
    /// Sprint, slide until the slide runs out, then stand up.
    SprintSlide,
    /// Hammer jump while walking; the cooldown keeps it to a few jumps.
    JumpSpam,
    /// Crawl into the tunnel, let go of crouch under the roof and walk out.
    Tunnel,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stroll => "stroll",
            Self::SprintSlide => "sprint-slide",
            Self::JumpSpam => "jump-spam",
            Self::Tunnel => "tunnel",
        }
    }

    pub fn start(&self) -> Landmark {
        match self {
            Self::Tunnel => Landmark::TunnelMouth,
            Self::Stroll | Self::SprintSlide | Self::JumpSpam => Landmark::Start,
        }
    }

    /// Camera yaw at `time` seconds into the run.
    pub fn yaw_at(&self, time: f32) -> f32 {
        match self {
            Self::Stroll => FRAC_PI_2,
            Self::SprintSlide => PI,
            // Sweep from -Z round towards -X while hopping.
            Self::JumpSpam => PI + (time * 0.5).min(FRAC_PI_2),
            Self::Tunnel => 0.0,
        }
    }

    pub fn script(&self) -> ScriptedInput {
        let idle = ButtonState::default();
        let forward = ButtonState {
            vertical: 1.0,
            ..idle
        };

        match self {
            Self::Stroll => ScriptedInput::new().hold(4.5, forward).hold(1.5, idle),
            Self::SprintSlide => {
                let sprint = ButtonState {
                    sprint: true,
                    ..forward
                };
                ScriptedInput::new()
                    .hold(0.5, forward)
                    .hold(1.5, sprint)
                    .hold(1.25, ButtonState {
                        crouch: true,
                        ..sprint
                    })
                    .hold(1.0, idle)
            }
            Self::JumpSpam => {
                let jump = ButtonState {
                    jump: true,
                    ..forward
                };
                (0..20)
                    .fold(ScriptedInput::new(), |script, _| {
                        script.hold(0.05, jump).hold(0.05, forward)
                    })
                    .hold(2.5, idle)
            }
            Self::Tunnel => {
                let crawl = ButtonState {
                    crouch: true,
                    ..forward
                };
                ScriptedInput::new()
                    .hold(1.5, crawl)
                    .hold(3.0, forward)
                    .hold(1.0, idle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_has_a_script() {
        for scenario in Scenario::value_variants() {
            assert!(scenario.script().duration() > 1.0, "{}", scenario.name());
        }
    }

    #[test]
    fn names_match_cli_values() {
        for scenario in Scenario::value_variants() {
            let value = scenario.to_possible_value().expect("visible variant");
            assert_eq!(value.get_name(), scenario.name());
        }
    }

    #[test]
    fn tunnel_starts_at_its_mouth() {
        assert_eq!(Scenario::Tunnel.start(), Landmark::TunnelMouth);
        assert_eq!(Scenario::Tunnel.yaw_at(3.0), 0.0);
    }
}
