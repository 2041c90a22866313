//! Town metrics
//!
//! A pure function of the placed-device set: no history, no hysteresis.

use serde::{Deserialize, Serialize};

use super::state::Device;
use crate::consts::{BASE_HAPPINESS, ENERGY_PER_HAPPINESS};
use crate::settings::MissionConfig;

/// Derived scores for the current placement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// MW produced by powered lamps
    pub energy: f32,
    /// Town happiness, always within [0, 100]
    pub happiness: f32,
    /// Tons of CO2 avoided
    pub environment: f32,
    /// Revenue
    pub economy: f32,
}

impl Metrics {
    /// Metrics for a given number of lit devices
    pub fn from_lit_count(lit: usize, config: &MissionConfig) -> Self {
        Self::from_energy(config.device_output * lit as f32, config)
    }

    pub fn from_energy(energy: f32, config: &MissionConfig) -> Self {
        Self {
            energy,
            happiness: happiness_for(energy),
            environment: energy * config.environment_factor,
            economy: energy * config.economy_factor,
        }
    }

    pub fn compute(devices: &[Device], config: &MissionConfig) -> Self {
        let lit = devices.iter().filter(|d| d.is_lit()).count();
        Self::from_lit_count(lit, config)
    }
}

/// 50 at zero energy, +1 per 10 units, clamped
#[inline]
pub fn happiness_for(energy: f32) -> f32 {
    (BASE_HAPPINESS + energy / ENERGY_PER_HAPPINESS).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scenario_counts() {
        let config = MissionConfig::default();

        let m = Metrics::from_lit_count(0, &config);
        assert_eq!(m.energy, 0.0);
        assert_eq!(m.happiness, 50.0);
        assert_eq!(m.environment, 0.0);
        assert_eq!(m.economy, 0.0);

        let m = Metrics::from_lit_count(1, &config);
        assert_eq!(m.energy, 50.0);
        assert_eq!(m.happiness, 55.0);
        assert_eq!(m.environment, 25.0);
        assert!((m.economy - 5.0).abs() < 1e-5);

        let m = Metrics::from_lit_count(36, &config);
        assert_eq!(m.energy, 1800.0);
        assert_eq!(m.happiness, 100.0);
    }

    #[test]
    fn test_only_lit_devices_count() {
        let config = MissionConfig::default();
        let mut devices = crate::sim::devices::build_grid(&config);
        devices[0].placed = true;
        devices[0].powered = true;
        devices[1].placed = false;
        devices[1].powered = false;
        assert_eq!(Metrics::compute(&devices, &config).energy, 50.0);
    }

    proptest! {
        #[test]
        fn prop_happiness_always_in_range(lit in 0usize..=1000) {
            let m = Metrics::from_lit_count(lit, &MissionConfig::default());
            prop_assert!((0.0..=100.0).contains(&m.happiness));
        }

        #[test]
        fn prop_happiness_clamps_negative_energy(energy in -1.0e6f32..0.0) {
            prop_assert!((0.0..=100.0).contains(&happiness_for(energy)));
        }
    }
}
