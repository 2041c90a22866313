//! Mission configuration and player preferences
//!
//! `MissionConfig` is fixed for the lifetime of a mission and must validate
//! before any play can begin. `Settings` are cosmetic preferences that never
//! touch gameplay.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// One roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSpec {
    pub id: u32,
    pub name: String,
    pub start: Vec2,
    /// World units per second
    pub speed: f32,
}

impl NpcSpec {
    pub fn new(id: u32, name: &str, x: f32, z: f32, speed: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            start: Vec2::new(x, z),
            speed,
        }
    }
}

/// The five townsfolk every mission starts with
pub fn default_roster() -> Vec<NpcSpec> {
    vec![
        NpcSpec::new(1, "Sarah", -5.0, -5.0, 1.0),
        NpcSpec::new(2, "Ahmed", 5.0, -5.0, 1.2),
        NpcSpec::new(3, "Maria", -5.0, 5.0, 0.8),
        NpcSpec::new(4, "David", 5.0, 5.0, 1.1),
        NpcSpec::new(5, "Lisa", 0.0, 0.0, 0.9),
    ]
}

/// Everything that defines one mission's rules and layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Seed for layout, NPC wandering and effect jitter
    pub seed: u64,
    pub duration_secs: u32,

    // === Devices ===
    pub grid_columns: u32,
    pub grid_rows: u32,
    pub grid_spacing: f32,
    pub device_output: f32,
    pub device_radius: f32,

    // === Metrics ===
    pub environment_factor: f32,
    pub economy_factor: f32,

    // === NPCs ===
    pub town_half_extent: f32,
    pub retarget_interval: f32,
    pub arrival_radius: f32,
    pub roster: Vec<NpcSpec>,

    // === Player ===
    pub player_spawn: Vec2,
    pub player_radius: f32,
    pub move_step: f32,
    pub turn_step: f32,

    // === Layout ===
    pub obstacle_count: u32,
    pub obstacle_spread: f32,
    pub obstacle_half_width: f32,
    pub tree_count: u32,
    pub tree_spread: f32,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0001,
            duration_secs: MISSION_DURATION_SECS,

            grid_columns: GRID_COLUMNS,
            grid_rows: GRID_ROWS,
            grid_spacing: GRID_SPACING,
            device_output: DEVICE_OUTPUT,
            device_radius: DEVICE_RADIUS,

            environment_factor: ENVIRONMENT_FACTOR,
            economy_factor: ECONOMY_FACTOR,

            town_half_extent: TOWN_HALF_EXTENT,
            retarget_interval: RETARGET_INTERVAL,
            arrival_radius: ARRIVAL_RADIUS,
            roster: default_roster(),

            player_spawn: Vec2::ZERO,
            player_radius: PLAYER_RADIUS,
            move_step: PLAYER_MOVE_STEP,
            turn_step: PLAYER_TURN_STEP,

            obstacle_count: OBSTACLE_COUNT,
            obstacle_spread: OBSTACLE_SPREAD,
            obstacle_half_width: OBSTACLE_HALF_WIDTH,
            tree_count: TREE_COUNT,
            tree_spread: TREE_SPREAD,
        }
    }
}

impl MissionConfig {
    /// Default mission with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON mission description
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MissionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Number of device slots
    pub fn device_count(&self) -> usize {
        self.grid_columns as usize * self.grid_rows as usize
    }

    /// Reject anything that would let the mission start in a broken state
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.grid_columns,
                rows: self.grid_rows,
            });
        }
        match self.grid_columns.checked_mul(self.grid_rows) {
            Some(n) if n <= MAX_DEVICES => {}
            _ => {
                return Err(ConfigError::GridTooLarge {
                    columns: self.grid_columns,
                    rows: self.grid_rows,
                    max: MAX_DEVICES,
                });
            }
        }
        if self.obstacle_count > MAX_OBSTACLES {
            return Err(ConfigError::TooMany {
                field: "obstacle_count",
                value: self.obstacle_count,
                max: MAX_OBSTACLES,
            });
        }
        if self.tree_count > MAX_TREES {
            return Err(ConfigError::TooMany {
                field: "tree_count",
                value: self.tree_count,
                max: MAX_TREES,
            });
        }

        ConfigError::positive("grid_spacing", self.grid_spacing)?;
        ConfigError::positive("device_output", self.device_output)?;
        ConfigError::positive("device_radius", self.device_radius)?;
        ConfigError::finite("environment_factor", self.environment_factor)?;
        ConfigError::finite("economy_factor", self.economy_factor)?;
        ConfigError::positive("town_half_extent", self.town_half_extent)?;
        let retarget = ConfigError::positive("retarget_interval", self.retarget_interval)?;
        if retarget < MIN_RETARGET_INTERVAL {
            return Err(ConfigError::TooSmall {
                field: "retarget_interval",
                value: retarget,
                min: MIN_RETARGET_INTERVAL,
            });
        }
        ConfigError::positive("arrival_radius", self.arrival_radius)?;
        ConfigError::finite("player_spawn.x", self.player_spawn.x)?;
        ConfigError::finite("player_spawn.y", self.player_spawn.y)?;
        ConfigError::positive("player_radius", self.player_radius)?;
        ConfigError::positive("move_step", self.move_step)?;
        ConfigError::positive("turn_step", self.turn_step)?;
        ConfigError::positive("obstacle_spread", self.obstacle_spread)?;
        ConfigError::positive("obstacle_half_width", self.obstacle_half_width)?;
        ConfigError::positive("tree_spread", self.tree_spread)?;

        let mut seen = HashSet::new();
        for npc in &self.roster {
            if !seen.insert(npc.id) {
                return Err(ConfigError::DuplicateNpc { id: npc.id });
            }
            ConfigError::positive("npc.speed", npc.speed)?;
            ConfigError::finite("npc.start.x", npc.start.x)?;
            ConfigError::finite("npc.start.y", npc.start.y)?;
            let e = self.town_half_extent;
            if npc.start.x.abs() > e || npc.start.y.abs() > e {
                return Err(ConfigError::NpcOutOfBounds { id: npc.id });
            }
        }

        Ok(())
    }
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live effect records for this preset
    pub fn max_effects(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => 1500,
            QualityPreset::High => 4000,
        }
    }
}

/// Player preferences (cosmetic only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Sparkles, energy flows and confetti
    pub effects: bool,
    /// Dampen bobbing and limb swing
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            effects: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective live effect cap
    pub fn max_effects(&self) -> usize {
        if !self.effects {
            0
        } else {
            self.quality.max_effects()
        }
    }

    /// Amplitude multiplier for cosmetic animation
    pub fn motion_scale(&self) -> f32 {
        if self.reduced_motion { 0.25 } else { 1.0 }
    }
}
