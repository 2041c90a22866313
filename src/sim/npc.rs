//! NPC behavior
//!
//! Wandering: every retarget pass, NPCs that have arrived pick a new random
//! target inside the town. Each frame while Playing they walk toward it.
//!
//! Light and mood are refreshed continuously: after every device toggle and
//! after every movement step. Mood is therefore always the pure function of
//! current positions, current placement and current happiness, whether the
//! lamp moved into the NPC's range or the NPC walked into the lamp's.

use glam::Vec2;
use rand::Rng;

use super::effects::EffectCategory;
use super::state::{Behavior, Device, GamePhase, GameState, Mood, Npc};

/// True if any lit device covers `point`
pub fn in_light(point: Vec2, devices: &[Device]) -> bool {
    devices.iter().any(|d| d.illuminates(point))
}

/// Walking beats everything; a standing NPC celebrates in light, idles otherwise
pub fn behavior_for(npc: &Npc, in_light: bool, arrival_radius: f32) -> Behavior {
    if npc.distance_to_target() >= arrival_radius {
        Behavior::Walking
    } else if in_light {
        Behavior::Celebrating
    } else {
        Behavior::Idle
    }
}

/// Uniform point in the square town bounds
pub fn random_target<R: Rng>(rng: &mut R, half_extent: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(-half_extent..=half_extent),
        rng.random_range(-half_extent..=half_extent),
    )
}

/// Move straight toward the target without overshooting.
///
/// Returns false when the NPC is already within `arrival_radius`.
pub fn step_toward(npc: &mut Npc, dt: f32, arrival_radius: f32) -> bool {
    let to_target = npc.target - npc.pos;
    let dist = to_target.length();
    if dist < arrival_radius {
        return false;
    }
    let step = (npc.speed * dt).min(dist);
    npc.pos += to_target / dist * step;
    true
}

impl GameState {
    /// Give every arrived NPC a new destination
    pub(crate) fn retarget_npcs(&mut self) {
        let arrival = self.config.arrival_radius;
        let extent = self.config.town_half_extent;
        for npc in &mut self.npcs {
            if npc.distance_to_target() < arrival {
                npc.target = random_target(&mut self.rng, extent);
                npc.behavior = Behavior::Walking;
                log::debug!("{} heads to ({:.2}, {:.2})", npc.name, npc.target.x, npc.target.y);
            }
        }
        self.refresh_npcs();
    }

    /// First lamp of the session: send everyone walking
    pub(crate) fn wake_town(&mut self) {
        let extent = self.config.town_half_extent;
        for npc in &mut self.npcs {
            npc.target = random_target(&mut self.rng, extent);
            npc.behavior = Behavior::Walking;
        }
        log::debug!("Town wakes up");
    }

    /// Per-frame walking. NPCs only move while Playing (paused or not).
    pub(crate) fn step_npcs(&mut self, dt: f32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let arrival = self.config.arrival_radius;
        let mut moved = false;
        for npc in &mut self.npcs {
            moved |= step_toward(npc, dt, arrival);
        }
        if moved {
            self.refresh_npcs();
        }
    }

    /// Recompute light, mood and behavior for every NPC
    pub(crate) fn refresh_npcs(&mut self) {
        let happiness = self.metrics().happiness;
        let arrival = self.config.arrival_radius;
        let playing = self.phase == GamePhase::Playing;

        for npc in &mut self.npcs {
            let lit = in_light(npc.pos, &self.devices);
            if lit && !npc.in_light && playing {
                self.effects
                    .spawn_burst(EffectCategory::Energy, npc.pos, self.time, &mut self.rng);
            }
            npc.in_light = lit;
            npc.mood = Mood::from_light(lit, happiness);
            // Outside Playing nobody moves, so nobody walks
            npc.behavior = if playing {
                behavior_for(npc, lit, arrival)
            } else {
                Behavior::Idle
            };
        }
    }
}
