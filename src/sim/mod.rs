//! Game control core
//!
//! Decides what exists in the world and when. This module is pure and
//! deterministic:
//! - Time only moves through `GameSession::advance`
//! - Seeded RNG only
//! - Events applied one at a time, in delivery order
//! - No rendering, physics or platform dependencies

pub mod contact;
pub mod phase;
pub mod projector;
pub mod session;
pub mod spawn;

pub use contact::{ContactOutcome, resolve_contact};
pub use phase::{NodeHandle, ObstacleHandle, Phase, PhaseKind, StageHandle, Transition};
pub use projector::{Hud, Projection, project};
pub use session::{GameEvent, GameSession};
pub use spawn::{Obstacle, ScheduledTask, SpawnScheduler, TaskKind, TimerQueue};
