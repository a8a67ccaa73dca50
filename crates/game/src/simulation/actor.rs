use std::fmt;

use rapier3d::prelude::RigidBodyHandle;
use thiserror::Error;

use crate::player::{ConfigError, InputSource, Orientation, PlayerController, StatsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no character body assigned")]
    MissingBody,
    #[error("no input source assigned")]
    MissingInput,
    #[error("no orientation assigned")]
    MissingOrientation,
    #[error("invalid stats: {0}")]
    InvalidStats(#[from] ConfigError),
}

/// Collaborators for one actor. Anything left unset is a setup error that
/// disables the actor.
pub struct ActorSetup {
    pub stats: StatsConfig,
    body: Option<RigidBodyHandle>,
    input: Option<Box<dyn InputSource>>,
    orientation: Option<Orientation>,
}

impl ActorSetup {
    pub fn new(stats: StatsConfig) -> Self {
        Self {
            stats,
            body: None,
            input: None,
            orientation: None,
        }
    }

    pub fn with_body(mut self, body: RigidBodyHandle) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub(crate) fn into_parts(
        self,
    ) -> Result<(StatsConfig, RigidBodyHandle, Box<dyn InputSource>, Orientation), SetupError> {
        let body = self.body.ok_or(SetupError::MissingBody)?;
        let input = self.input.ok_or(SetupError::MissingInput)?;
        let orientation = self.orientation.ok_or(SetupError::MissingOrientation)?;
        self.stats.validate()?;
        Ok((self.stats, body, input, orientation))
    }
}

pub(crate) struct Actor {
    pub id: ActorId,
    pub body: RigidBodyHandle,
    pub input: Box<dyn InputSource>,
    pub controller: PlayerController,
}

pub(crate) enum ActorSlot {
    Active(Actor),
    Disabled { id: ActorId, reason: SetupError },
}

impl ActorSlot {
    pub fn id(&self) -> ActorId {
        match self {
            Self::Active(actor) => actor.id,
            Self::Disabled { id, .. } => *id,
        }
    }
}
