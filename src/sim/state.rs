//! Game state and core simulation types
//!
//! `GameState` is the single owned record for one mission. Everything outside
//! `sim` reads it through accessors or a [`Snapshot`](super::Snapshot) and
//! changes it only through the transition methods.

use std::sync::Arc;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::devices::build_grid;
use super::effects::EffectsQueue;
use super::layout::TownLayout;
use super::metrics::Metrics;
use crate::error::ConfigError;
use crate::planar_distance;
use crate::settings::{MissionConfig, NpcSpec};

/// Current phase of the mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Briefing screen, nothing moves
    Intro,
    /// Countdown running (or paused)
    Playing,
    /// Time ran out or the learner finished early
    Completed,
}

/// How an NPC feels about the lighting around them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    /// Light wins; otherwise town-wide happiness decides between neutral and sad
    pub fn from_light(in_light: bool, happiness: f32) -> Self {
        if in_light {
            Mood::Happy
        } else if happiness > crate::consts::NEUTRAL_HAPPINESS {
            Mood::Neutral
        } else {
            Mood::Sad
        }
    }
}

/// What an NPC is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Idle,
    Walking,
    Celebrating,
}

/// Player keyboard scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Top-down: keys map to world axes
    #[default]
    Absolute,
    /// First-person: keys follow the heading, Q/E turn
    Relative,
}

/// A solar lamp slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: u32,
    pub pos: Vec2,
    pub placed: bool,
    pub powered: bool,
    /// Output while powered
    pub output: f32,
    /// Light radius while powered
    pub radius: f32,
}

impl Device {
    pub fn new(id: u32, pos: Vec2, output: f32, radius: f32) -> Self {
        Self {
            id,
            pos,
            placed: false,
            powered: false,
            output,
            radius,
        }
    }

    /// Placed and powered
    #[inline]
    pub fn is_lit(&self) -> bool {
        self.placed && self.powered
    }

    /// Current contribution to town energy
    #[inline]
    pub fn energy(&self) -> f32 {
        if self.is_lit() { self.output } else { 0.0 }
    }

    /// True if `point` is inside this lamp's light
    #[inline]
    pub fn illuminates(&self, point: Vec2) -> bool {
        self.is_lit() && planar_distance(self.pos, point) <= self.radius
    }
}

/// A townsperson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: u32,
    pub name: String,
    pub pos: Vec2,
    pub target: Vec2,
    pub mood: Mood,
    pub in_light: bool,
    pub speed: f32,
    pub behavior: Behavior,
}

impl Npc {
    pub fn from_spec(spec: &NpcSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name.clone(),
            pos: spec.start,
            target: spec.start,
            mood: Mood::Sad,
            in_light: false,
            speed: spec.speed,
            behavior: Behavior::Idle,
        }
    }

    #[inline]
    pub fn distance_to_target(&self) -> f32 {
        planar_distance(self.pos, self.target)
    }
}

/// The learner's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Radians; 0 faces +Z
    pub heading: f32,
    pub moving: bool,
    pub mode: ControlMode,
}

impl Player {
    pub fn spawn(pos: Vec2, mode: ControlMode) -> Self {
        Self {
            pos,
            heading: 0.0,
            moving: false,
            mode,
        }
    }
}

/// Handed to the owning page when a finished mission is committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionCompletion {
    pub mission_id: String,
    pub metrics: Metrics,
    pub devices_placed: usize,
}

/// Notifications for the presentation layer, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    DevicePlaced { id: u32 },
    DeviceRemoved { id: u32 },
    Completed { metrics: Metrics },
    Committed(MissionCompletion),
    Reset,
}

/// RNG seed + stream pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    /// Layout generation
    pub const LAYOUT_STREAM: u64 = 0;
    /// Wandering and effect jitter
    pub const PLAY_STREAM: u64 = 1;

    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete mission state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: Arc<MissionConfig>,
    pub(crate) layout: Arc<TownLayout>,
    pub(crate) phase: GamePhase,
    pub(crate) paused: bool,
    pub(crate) clock: Clock,
    /// Seconds since the state was created, all phases
    pub(crate) time: f32,
    pub(crate) devices: Vec<Device>,
    pub(crate) npcs: Vec<Npc>,
    pub(crate) player: Player,
    pub(crate) effects: EffectsQueue,
    /// Captured once on entering Completed
    pub(crate) final_metrics: Option<Metrics>,
    pub(crate) committed: bool,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Validate `config` and generate its town layout from the seed
    pub fn new(config: MissionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut layout_rng = RngState::new(config.seed, RngState::LAYOUT_STREAM).to_rng();
        let layout = TownLayout::generate(&config, &mut layout_rng)?;
        Self::with_layout(config, Arc::new(layout))
    }

    /// Use an externally supplied layout (shared, never modified)
    pub fn with_layout(config: MissionConfig, layout: Arc<TownLayout>) -> Result<Self, ConfigError> {
        config.validate()?;
        layout.check_spawn(config.player_spawn, config.player_radius)?;

        let devices = build_grid(&config);
        let npcs = config.roster.iter().map(Npc::from_spec).collect();
        let player = Player::spawn(config.player_spawn, ControlMode::default());
        let clock = Clock::new(config.duration_secs, config.retarget_interval);
        let rng = RngState::new(config.seed, RngState::PLAY_STREAM).to_rng();

        log::info!(
            "Mission ready: seed={}, {} devices, {} npcs, {} obstacles",
            config.seed,
            devices.len(),
            config.roster.len(),
            layout.obstacles.len()
        );

        let mut state = Self {
            config: Arc::new(config),
            layout,
            phase: GamePhase::Intro,
            paused: false,
            clock,
            time: 0.0,
            devices,
            npcs,
            player,
            effects: EffectsQueue::default(),
            final_metrics: None,
            committed: false,
            events: Vec::new(),
            rng,
        };
        state.refresh_npcs();
        Ok(state)
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    pub fn layout(&self) -> &Arc<TownLayout> {
        &self.layout
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whole seconds remaining on the countdown
    pub fn time_left(&self) -> u32 {
        self.clock.time_left
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn npc(&self, id: u32) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn effects(&self) -> &EffectsQueue {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectsQueue {
        &mut self.effects
    }

    /// Metrics for the current placement, always recomputed
    pub fn metrics(&self) -> Metrics {
        Metrics::compute(&self.devices, &self.config)
    }

    /// Metrics frozen when the mission completed
    pub fn final_metrics(&self) -> Option<Metrics> {
        self.final_metrics
    }

    /// The score is the energy produced
    pub fn score(&self) -> f32 {
        self.final_metrics.unwrap_or_else(|| self.metrics()).energy
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Put NPCs and the player back where the mission started them
    pub(crate) fn respawn_actors(&mut self) {
        self.npcs = self.config.roster.iter().map(Npc::from_spec).collect();
        let mode = self.player.mode;
        self.player = Player::spawn(self.config.player_spawn, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_is_pure_function_of_light_and_happiness() {
        assert_eq!(Mood::from_light(true, 0.0), Mood::Happy);
        assert_eq!(Mood::from_light(true, 100.0), Mood::Happy);
        assert_eq!(Mood::from_light(false, 70.0), Mood::Sad);
        assert_eq!(Mood::from_light(false, 70.5), Mood::Neutral);
        assert_eq!(Mood::from_light(false, 50.0), Mood::Sad);
    }

    #[test]
    fn test_new_state_starts_in_intro() {
        let state = GameState::new(MissionConfig::default()).expect("default mission is valid");
        assert_eq!(state.phase(), GamePhase::Intro);
        assert!(!state.is_paused());
        assert_eq!(state.time_left(), 300);
        assert_eq!(state.devices().len(), 36);
        assert!(state.devices().iter().all(|d| !d.placed && !d.powered));
        assert_eq!(state.npcs().len(), 5);
        assert!(state.npcs().iter().all(|n| n.mood == Mood::Sad));
        assert_eq!(state.metrics().happiness, 50.0);
    }

    #[test]
    fn test_invalid_config_blocks_setup() {
        let config = MissionConfig {
            grid_columns: 0,
            ..MissionConfig::default()
        };
        assert!(GameState::new(config).is_err());
    }

    #[test]
    fn test_huge_grid_is_an_error_not_a_panic() {
        let config = MissionConfig {
            grid_columns: 100_000,
            grid_rows: 100_000,
            ..MissionConfig::default()
        };
        assert!(matches!(
            GameState::new(config),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(MissionConfig::with_seed(42)).unwrap();
        let b = GameState::new(MissionConfig::with_seed(42)).unwrap();
        assert_eq!(a.layout().obstacles, b.layout().obstacles);
        assert_eq!(a.layout().trees, b.layout().trees);
    }

    #[test]
    fn test_device_illumination_requires_power() {
        let mut device = Device::new(0, Vec2::ZERO, 50.0, 3.0);
        assert!(!device.illuminates(Vec2::new(1.0, 0.0)));
        device.placed = true;
        device.powered = true;
        assert!(device.illuminates(Vec2::new(3.0, 0.0)));
        assert!(!device.illuminates(Vec2::new(3.01, 0.0)));
        assert_eq!(device.energy(), 50.0);
    }
}
