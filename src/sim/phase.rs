//! Game phases and the world handles they carry
//!
//! World objects are opaque handles into the scene mutator's entity table.
//! A phase never holds live geometry, so a torn-down stage cannot dangle.

use std::fmt;

/// Opaque id of a node in the scene mutator's entity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(u32);

impl NodeHandle {
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Root node of an instantiated stage subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageHandle(NodeHandle);

impl StageHandle {
    pub const fn new(node: NodeHandle) -> Self {
        Self(node)
    }

    pub const fn node(self) -> NodeHandle {
        self.0
    }
}

/// A spawned obstacle ("ball") living under a stage's spawn anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleHandle(NodeHandle);

impl ObstacleHandle {
    pub const fn new(node: NodeHandle) -> Self {
        Self(node)
    }

    pub const fn node(self) -> NodeHandle {
        self.0
    }
}

/// Current phase of the game. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// AR tracking not yet stable
    Initializing,
    /// Tracking degraded (excessive motion, too few features, ...)
    Limited,
    /// Tracking stable, no stage placed yet
    Tracking,
    /// Stage anchored on a plane, waiting for the player to start
    Ready { stage: StageHandle },
    /// Active round
    Playing { stage: StageHandle, score: u32 },
    /// Round ended by hitting a hazard; the stage is kept for a restart
    GameOver { stage: StageHandle, score: u32 },
    /// Unrecoverable session fault, cleared only by a reset
    Error { message: String },
}

/// Payload-free view of a [`Phase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Initializing,
    Limited,
    Tracking,
    Ready,
    Playing,
    GameOver,
    Error,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Initializing => "Initializing",
            PhaseKind::Limited => "Limited",
            PhaseKind::Tracking => "Tracking",
            PhaseKind::Ready => "Ready",
            PhaseKind::Playing => "Playing",
            PhaseKind::GameOver => "GameOver",
            PhaseKind::Error => "Error",
        }
    }

    /// Phases that own a stage
    pub fn holds_stage(&self) -> bool {
        matches!(self, PhaseKind::Ready | PhaseKind::Playing | PhaseKind::GameOver)
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Initializing => PhaseKind::Initializing,
            Phase::Limited => PhaseKind::Limited,
            Phase::Tracking => PhaseKind::Tracking,
            Phase::Ready { .. } => PhaseKind::Ready,
            Phase::Playing { .. } => PhaseKind::Playing,
            Phase::GameOver { .. } => PhaseKind::GameOver,
            Phase::Error { .. } => PhaseKind::Error,
        }
    }

    /// The stage owned by this phase, if any
    pub fn stage(&self) -> Option<StageHandle> {
        match self {
            Phase::Ready { stage } | Phase::Playing { stage, .. } | Phase::GameOver { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }

    /// Score of the current or last round
    pub fn score(&self) -> Option<u32> {
        match self {
            Phase::Playing { score, .. } | Phase::GameOver { score, .. } => Some(*score),
            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Phase::Playing { .. })
    }
}

/// A phase change applied by the state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
}
