//! Setup errors
//!
//! Only mission setup can fail. Gameplay actions that arrive in the wrong
//! phase are ignored, never reported.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read mission config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse mission config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("mission duration must be at least one second")]
    ZeroDuration,
    #[error("device grid is empty ({columns}x{rows})")]
    EmptyGrid { columns: u32, rows: u32 },
    #[error("device grid {columns}x{rows} exceeds {max} slots")]
    GridTooLarge { columns: u32, rows: u32, max: u32 },
    #[error("{field} is {value}, at most {max} allowed")]
    TooMany {
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        value: f32,
        min: f32,
    },
    #[error("duplicate npc id {id}")]
    DuplicateNpc { id: u32 },
    #[error("npc {id} starts outside the town bounds")]
    NpcOutOfBounds { id: u32 },
    #[error("obstacle {index} overlaps the player spawn point")]
    ObstacleOnSpawn { index: usize },
    #[error("could not place obstacle {index} clear of the spawn after {attempts} attempts")]
    LayoutExhausted { index: usize, attempts: u32 },
}

impl ConfigError {
    /// Check that `value` is a finite number
    pub fn finite(field: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { field, value })
        }
    }

    /// Check that `value` is finite and strictly positive
    pub fn positive(field: &'static str, value: f32) -> Result<f32, Self> {
        let value = Self::finite(field, value)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(Self::NonPositive { field, value })
        }
    }
}
