//! Device registry
//!
//! A fixed grid of lamp slots created once per mission. Placing toggles a
//! slot; metrics and NPC light membership are refreshed in the same call so
//! nothing can observe energy and mood out of step.

use glam::Vec2;

use super::effects::EffectCategory;
use super::state::{Device, GameEvent, GamePhase, GameState};
use crate::settings::MissionConfig;

/// Lay out `columns x rows` slots centered on the origin, row-major ids
pub fn build_grid(config: &MissionConfig) -> Vec<Device> {
    let cols = config.grid_columns;
    let rows = config.grid_rows;
    let spacing = config.grid_spacing;
    let x0 = -(cols.saturating_sub(1) as f32) * spacing / 2.0;
    let z0 = -(rows.saturating_sub(1) as f32) * spacing / 2.0;

    (0..cols * rows)
        .map(|i| {
            let pos = Vec2::new(
                x0 + (i % cols) as f32 * spacing,
                z0 + (i / cols) as f32 * spacing,
            );
            Device::new(i, pos, config.device_output, config.device_radius)
        })
        .collect()
}

impl GameState {
    /// Toggle a lamp on or off. Ignored unless Playing.
    ///
    /// Pausing does not block placement.
    pub fn place(&mut self, id: u32) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("place({}) ignored in {:?}", id, self.phase);
            return false;
        }
        let Some(idx) = self.devices.iter().position(|d| d.id == id) else {
            log::debug!("place({}) ignored: no such device", id);
            return false;
        };

        let first_placement = self.placed_count() == 0;
        let device = &mut self.devices[idx];
        let placing = !device.placed;
        device.placed = placing;
        device.powered = placing;
        let pos = device.pos;

        if placing {
            if first_placement {
                self.wake_town();
            }
            self.effects
                .spawn_burst(EffectCategory::Sparkle, pos, self.time, &mut self.rng);
            self.events.push(GameEvent::DevicePlaced { id });
        } else {
            self.events.push(GameEvent::DeviceRemoved { id });
        }

        self.refresh_npcs();
        log::debug!(
            "Device {} {} ({} lit, energy {})",
            id,
            if placing { "placed" } else { "removed" },
            self.placed_count(),
            self.metrics().energy
        );
        true
    }

    /// Number of lit devices
    pub fn placed_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_lit()).count()
    }

    pub fn device(&self, id: u32) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub(crate) fn clear_devices(&mut self) {
        for device in &mut self.devices {
            device.placed = false;
            device.powered = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::metrics::Metrics;

    fn playing() -> GameState {
        let mut state = GameState::new(MissionConfig::with_seed(11)).unwrap();
        state.start();
        state
    }

    #[test]
    fn test_grid_matches_six_by_six() {
        let devices = build_grid(&MissionConfig::default());
        assert_eq!(devices.len(), 36);
        assert_eq!(devices[0].pos, Vec2::new(-6.25, -6.25));
        assert_eq!(devices[5].pos, Vec2::new(6.25, -6.25));
        assert_eq!(devices[35].pos, Vec2::new(6.25, 6.25));
        assert!(devices.iter().all(|d| d.radius == 3.0 && d.output == 50.0));
    }

    #[test]
    fn test_place_ignored_outside_playing() {
        let mut state = GameState::new(MissionConfig::default()).unwrap();
        assert!(!state.place(0));
        assert_eq!(state.placed_count(), 0);

        state.start();
        state.complete();
        assert!(!state.place(0));
        assert_eq!(state.placed_count(), 0);
    }

    #[test]
    fn test_place_unknown_id_is_noop() {
        let mut state = playing();
        assert!(!state.place(999));
        assert_eq!(state.placed_count(), 0);
    }

    #[test]
    fn test_place_toggles_and_powers() {
        let mut state = playing();
        assert!(state.place(7));
        let d = state.device(7).unwrap();
        assert!(d.placed && d.powered);
        assert_eq!(state.metrics().energy, 50.0);
        assert_eq!(state.metrics().happiness, 55.0);

        assert!(state.place(7));
        let d = state.device(7).unwrap();
        assert!(!d.placed && !d.powered);
        assert_eq!(state.metrics(), Metrics::from_lit_count(0, state.config()));
    }

    #[test]
    fn test_place_allowed_while_paused() {
        let mut state = playing();
        state.toggle_pause();
        assert!(state.place(3));
        assert_eq!(state.placed_count(), 1);
    }

    #[test]
    fn test_placing_spawns_sparkles_removing_does_not() {
        let mut state = playing();
        state.place(0);
        let sparkles = state.effects().count(EffectCategory::Sparkle);
        assert_eq!(sparkles, EffectCategory::Sparkle.burst_size());
        state.place(0);
        assert_eq!(state.effects().count(EffectCategory::Sparkle), sparkles);
    }

    #[test]
    fn test_all_devices_clamp_happiness() {
        let mut state = playing();
        for id in 0..36 {
            state.place(id);
        }
        let m = state.metrics();
        assert_eq!(m.energy, 1800.0);
        assert_eq!(m.happiness, 100.0);
    }

    #[test]
    fn test_first_placement_wakes_npcs() {
        let mut state = playing();
        assert!(state.npcs().iter().all(|n| n.target == n.pos));
        state.place(14);
        assert!(state.npcs().iter().any(|n| n.target != n.pos));
    }

    #[test]
    fn test_start_clears_previous_placement() {
        let mut state = playing();
        state.place(1);
        state.place(2);
        state.complete();
        state.reset();
        assert_eq!(state.placed_count(), 0);
        state.start();
        assert_eq!(state.placed_count(), 0);
        assert_eq!(state.metrics().energy, 0.0);
    }
}
