//! Read-only per-frame view for the presentation layer

use serde::Serialize;

use super::effects::EffectRecord;
use super::metrics::Metrics;
use super::state::{Device, GamePhase, GameState, Npc, Player};

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub paused: bool,
    pub time_left: u32,
    pub devices: &'a [Device],
    pub npcs: &'a [Npc],
    pub player: &'a Player,
    pub metrics: Metrics,
    pub final_metrics: Option<Metrics>,
    pub effects: &'a [EffectRecord],
    /// Cosmetic day/night flag from the environment
    pub night: bool,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            paused: self.paused,
            time_left: self.clock.time_left,
            devices: &self.devices,
            npcs: &self.npcs,
            player: &self.player,
            metrics: self.metrics(),
            final_metrics: self.final_metrics,
            effects: self.effects.records(),
            night: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MissionConfig;

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(MissionConfig::default()).unwrap();
        state.start();
        state.place(0);
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["time_left"], 300);
        assert_eq!(json["metrics"]["energy"], 50.0);
        assert_eq!(json["devices"].as_array().unwrap().len(), 36);
        assert_eq!(json["npcs"].as_array().unwrap().len(), 5);
    }
}
