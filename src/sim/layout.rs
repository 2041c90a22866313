//! Town layout: buildings and trees
//!
//! Generated once per mission from the layout RNG stream and shared behind an
//! `Arc` so the collision code and any renderer read the same positions.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Obstacle, first_collision};
use crate::consts::LAYOUT_MAX_ATTEMPTS;
use crate::error::ConfigError;
use crate::settings::MissionConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TownLayout {
    /// Buildings; the player collides with these
    pub obstacles: Vec<Obstacle>,
    /// Decoration only
    pub trees: Vec<Vec2>,
}

impl TownLayout {
    /// Scatter buildings and trees, re-rolling any building that lands on the spawn
    pub fn generate<R: Rng>(config: &MissionConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let spawn = config.player_spawn;
        let mut obstacles = Vec::with_capacity(config.obstacle_count as usize);

        for index in 0..config.obstacle_count as usize {
            let mut attempts = 0;
            let obstacle = loop {
                if attempts == LAYOUT_MAX_ATTEMPTS {
                    return Err(ConfigError::LayoutExhausted { index, attempts });
                }
                attempts += 1;
                let candidate =
                    Obstacle::new(scatter(rng, config.obstacle_spread), config.obstacle_half_width);
                if !candidate.blocks(spawn, config.player_radius) {
                    break candidate;
                }
            };
            obstacles.push(obstacle);
        }

        let trees = (0..config.tree_count)
            .map(|_| scatter(rng, config.tree_spread))
            .collect();

        log::debug!(
            "Generated layout: {} buildings, {} trees",
            obstacles.len(),
            config.tree_count
        );
        Ok(Self { obstacles, trees })
    }

    /// Build from positions supplied by the environment
    pub fn from_positions(
        positions: &[Vec2],
        half_width: f32,
        trees: Vec<Vec2>,
    ) -> Result<Self, ConfigError> {
        ConfigError::positive("obstacle_half_width", half_width)?;
        for p in positions {
            ConfigError::finite("obstacle.x", p.x)?;
            ConfigError::finite("obstacle.y", p.y)?;
        }
        Ok(Self {
            obstacles: positions
                .iter()
                .map(|&p| Obstacle::new(p, half_width))
                .collect(),
            trees,
        })
    }

    /// The player must be able to stand at the spawn point
    pub fn check_spawn(&self, spawn: Vec2, radius: f32) -> Result<(), ConfigError> {
        match first_collision(spawn, radius, &self.obstacles) {
            Some(index) => {
                log::warn!("Obstacle {} overlaps the spawn point", index);
                Err(ConfigError::ObstacleOnSpawn { index })
            }
            None => Ok(()),
        }
    }
}

/// Uniform in a `spread`-wide square centered on the origin
fn scatter<R: Rng>(rng: &mut R, spread: f32) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * spread,
        (rng.random::<f32>() - 0.5) * spread,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generated_layout_clears_spawn() {
        let config = MissionConfig::default();
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = TownLayout::generate(&config, &mut rng).unwrap();
            assert_eq!(layout.obstacles.len(), 20);
            assert_eq!(layout.trees.len(), 30);
            assert!(layout.check_spawn(config.player_spawn, config.player_radius).is_ok());
            assert!(layout
                .obstacles
                .iter()
                .all(|o| o.pos.x.abs() <= 7.5 && o.pos.y.abs() <= 7.5));
        }
    }

    #[test]
    fn test_supplied_layout_on_spawn_is_rejected() {
        let layout = TownLayout::from_positions(&[Vec2::new(0.5, 0.5)], 1.0, Vec::new()).unwrap();
        assert!(matches!(
            layout.check_spawn(Vec2::ZERO, 0.5),
            Err(ConfigError::ObstacleOnSpawn { index: 0 })
        ));
    }

    #[test]
    fn test_supplied_layout_rejects_nan() {
        let err = TownLayout::from_positions(&[Vec2::new(f32::NAN, 0.0)], 1.0, Vec::new());
        assert!(matches!(err, Err(ConfigError::NonFinite { .. })));
    }

    #[test]
    fn test_tiny_spread_exhausts_attempts() {
        let config = MissionConfig {
            obstacle_spread: 0.1,
            ..MissionConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            TownLayout::generate(&config, &mut rng),
            Err(ConfigError::LayoutExhausted { index: 0, .. })
        ));
    }
}
