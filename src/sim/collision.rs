//! Player collision and movement
//!
//! Every movement key press becomes one [`MoveIntent`]: a translation, a
//! rotation, or both. The rotation is always applied. The translation is
//! committed only if the candidate position clears every obstacle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ControlMode, GamePhase, GameState, Player};
use crate::{heading_vector, normalize_angle, planar_distance};

/// A building footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub half_width: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, half_width: f32) -> Self {
        Self { pos, half_width }
    }

    /// Strictly closer than `radius + half_width` counts as a hit
    #[inline]
    pub fn blocks(&self, point: Vec2, radius: f32) -> bool {
        planar_distance(point, self.pos) < radius + self.half_width
    }
}

/// Index of the first obstacle that `point` (with `radius`) would overlap
pub fn first_collision(point: Vec2, radius: f32, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|o| o.blocks(point, radius))
}

/// Logical movement commands, independent of the physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCommand {
    Forward,
    Back,
    Left,
    Right,
    TurnLeft,
    TurnRight,
}

impl MoveCommand {
    pub fn is_turn(&self) -> bool {
        matches!(self, MoveCommand::TurnLeft | MoveCommand::TurnRight)
    }
}

/// What one key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveIntent {
    pub translation: Vec2,
    pub rotation: f32,
}

impl MoveIntent {
    /// Build the intent for `cmd` given the player's pose and control mode.
    ///
    /// Absolute mode: forward is -Z, right is +X, turning is not available.
    /// Relative mode: forward follows the heading, strafes are perpendicular.
    pub fn for_command(cmd: MoveCommand, player: &Player, step: f32, turn: f32) -> Option<Self> {
        let translation = |v: Vec2| {
            Some(MoveIntent {
                translation: v * step,
                rotation: 0.0,
            })
        };
        match player.mode {
            ControlMode::Absolute => match cmd {
                MoveCommand::Forward => translation(Vec2::new(0.0, -1.0)),
                MoveCommand::Back => translation(Vec2::new(0.0, 1.0)),
                MoveCommand::Left => translation(Vec2::new(-1.0, 0.0)),
                MoveCommand::Right => translation(Vec2::new(1.0, 0.0)),
                MoveCommand::TurnLeft | MoveCommand::TurnRight => None,
            },
            ControlMode::Relative => {
                let fwd = heading_vector(player.heading);
                // Left of the facing direction
                let left = Vec2::new(-fwd.y, fwd.x);
                match cmd {
                    MoveCommand::Forward => translation(fwd),
                    MoveCommand::Back => translation(-fwd),
                    MoveCommand::Left => translation(left),
                    MoveCommand::Right => translation(-left),
                    MoveCommand::TurnLeft => Some(MoveIntent {
                        translation: Vec2::ZERO,
                        rotation: -turn,
                    }),
                    MoveCommand::TurnRight => Some(MoveIntent {
                        translation: Vec2::ZERO,
                        rotation: turn,
                    }),
                }
            }
        }
    }
}

/// Outcome of resolving one intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Turned,
    /// Translation rejected (rotation, if any, still applied)
    Blocked { obstacle: usize },
}

/// Apply rotation unconditionally, translation only if it stays clear
pub fn resolve_move(
    player: &mut Player,
    intent: MoveIntent,
    obstacles: &[Obstacle],
    radius: f32,
) -> MoveOutcome {
    if intent.rotation != 0.0 {
        player.heading = normalize_angle(player.heading + intent.rotation);
    }
    if intent.translation == Vec2::ZERO {
        return MoveOutcome::Turned;
    }

    let candidate = player.pos + intent.translation;
    if let Some(obstacle) = first_collision(candidate, radius, obstacles) {
        return MoveOutcome::Blocked { obstacle };
    }
    player.pos = candidate;
    player.moving = true;
    MoveOutcome::Moved
}

impl GameState {
    /// Handle one movement key press. Accepted while Playing, paused or not.
    pub fn apply_move(&mut self, cmd: MoveCommand) -> Option<MoveOutcome> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let intent = MoveIntent::for_command(
            cmd,
            &self.player,
            self.config.move_step,
            self.config.turn_step,
        )?;
        let outcome = resolve_move(
            &mut self.player,
            intent,
            &self.layout.obstacles,
            self.config.player_radius,
        );
        if let MoveOutcome::Blocked { obstacle } = outcome {
            log::debug!("Player blocked by obstacle {}", obstacle);
        }
        Some(outcome)
    }

    /// Movement key released
    pub fn stop_moving(&mut self) {
        self.player.moving = false;
    }

    pub fn set_control_mode(&mut self, mode: ControlMode) {
        if self.player.mode != mode {
            log::info!("Control mode: {:?}", mode);
            self.player.mode = mode;
        }
    }

    pub fn toggle_control_mode(&mut self) {
        let next = match self.player.mode {
            ControlMode::Absolute => ControlMode::Relative,
            ControlMode::Relative => ControlMode::Absolute,
        };
        self.set_control_mode(next);
    }
}
