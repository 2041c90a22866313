//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame deltas in, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod devices;
pub mod effects;
pub mod layout;
pub mod metrics;
pub mod npc;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use clock::{Clock, Interval};
pub use collision::{MoveCommand, MoveIntent, MoveOutcome, Obstacle, resolve_move};
pub use effects::{EffectCategory, EffectRecord, EffectsQueue};
pub use layout::TownLayout;
pub use metrics::Metrics;
pub use snapshot::Snapshot;
pub use state::{
    Behavior, ControlMode, Device, GameEvent, GamePhase, GameState, MissionCompletion, Mood,
    Npc, Player,
};
pub use tick::{TickInput, tick};
