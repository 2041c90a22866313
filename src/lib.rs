//! Solar Town - a timed town-lighting mini-game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (devices, NPCs, movement, clock, effects)
//! - `platform`: Input mapping from keyboard events to movement intents
//! - `anim`: Render-only animation side table (never read by `sim`)
//! - `session`: Lifecycle owner that wires frames and input to the simulation
//! - `settings`: Mission configuration and player preferences

pub mod anim;
pub mod error;
pub mod logging;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use session::Session;
pub use settings::{MissionConfig, NpcSpec, QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep used by the demo driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta accepted before clamping (tab switch, debugger stop)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Countdown granularity in seconds
    pub const COUNTDOWN_STEP: f32 = 1.0;
    /// Default mission length (5 minutes)
    pub const MISSION_DURATION_SECS: u32 = 300;

    /// Solar lamp grid
    pub const GRID_COLUMNS: u32 = 6;
    pub const GRID_ROWS: u32 = 6;
    pub const GRID_SPACING: f32 = 2.5;
    /// Output of one powered lamp (MW)
    pub const DEVICE_OUTPUT: f32 = 50.0;
    /// Light radius of one powered lamp
    pub const DEVICE_RADIUS: f32 = 3.0;

    /// Happiness baseline with nothing placed
    pub const BASE_HAPPINESS: f32 = 50.0;
    /// Energy units per happiness point
    pub const ENERGY_PER_HAPPINESS: f32 = 10.0;
    /// Happiness above which unlit NPCs are neutral instead of sad
    pub const NEUTRAL_HAPPINESS: f32 = 70.0;
    /// Tons of CO2 avoided per energy unit
    pub const ENVIRONMENT_FACTOR: f32 = 0.5;
    /// Revenue per energy unit
    pub const ECONOMY_FACTOR: f32 = 0.1;

    /// NPC wander area is [-TOWN_HALF_EXTENT, TOWN_HALF_EXTENT] on both axes
    pub const TOWN_HALF_EXTENT: f32 = 5.0;
    /// Seconds between NPC retarget passes
    pub const RETARGET_INTERVAL: f32 = 5.0;
    /// Distance at which an NPC counts as arrived
    pub const ARRIVAL_RADIUS: f32 = 0.5;

    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 0.5;
    /// Translation per movement key event
    pub const PLAYER_MOVE_STEP: f32 = 0.1;
    /// Heading change per rotation key event (radians)
    pub const PLAYER_TURN_STEP: f32 = 0.05;

    /// Buildings the player collides with
    pub const OBSTACLE_COUNT: u32 = 20;
    pub const OBSTACLE_SPREAD: f32 = 15.0;
    pub const OBSTACLE_HALF_WIDTH: f32 = 1.0;
    /// Decorative trees (no collision)
    pub const TREE_COUNT: u32 = 30;
    pub const TREE_SPREAD: f32 = 18.0;
    /// Re-roll budget per obstacle when avoiding the spawn point
    pub const LAYOUT_MAX_ATTEMPTS: u32 = 64;

    /// Upper bounds accepted from mission configs
    pub const MAX_DEVICES: u32 = 1024;
    pub const MAX_OBSTACLES: u32 = 512;
    pub const MAX_TREES: u32 = 2048;
    /// Shortest retarget period; one clamped frame can fire it at most once
    pub const MIN_RETARGET_INTERVAL: f32 = MAX_FRAME_DT;
}

/// Distance on the ground plane (x, z)
#[inline]
pub fn planar_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector the player faces for a given heading.
///
/// Heading 0 faces +Z; positive heading turns toward +X.
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.sin(), heading.cos())
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
