//! Render-only animation side table
//!
//! Bob and limb-swing offsets for NPCs and the player, keyed by entity. The
//! table reads simulation state but nothing in `sim` ever reads the table.

use std::collections::HashMap;

use crate::sim::{Behavior, Npc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Player,
    Npc(u32),
}

/// Cosmetic offsets for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Vertical body offset
    pub bob: f32,
    /// Arm rotation (radians), right arm mirrors
    pub arm_swing: f32,
    /// Leg rotation (radians), right leg mirrors
    pub leg_swing: f32,
}

impl Pose {
    pub fn idle(t: f32) -> Self {
        Self {
            bob: (t * 2.0).sin() * 0.02,
            ..Default::default()
        }
    }

    pub fn walking(t: f32) -> Self {
        let s = (t * 8.0).sin();
        Self {
            bob: s * 0.05,
            arm_swing: s * 0.5,
            leg_swing: s * 0.3,
        }
    }

    pub fn celebrating(t: f32) -> Self {
        Self {
            bob: (t * 6.0).sin().abs() * 0.15,
            arm_swing: 1.2 + (t * 10.0).sin() * 0.3,
            leg_swing: 0.0,
        }
    }

    fn scaled(self, k: f32) -> Self {
        Self {
            bob: self.bob * k,
            arm_swing: self.arm_swing * k,
            leg_swing: self.leg_swing * k,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Entry {
    /// Desynchronizes entities so they don't bob in lockstep
    phase: f32,
}

#[derive(Debug, Clone)]
pub struct AnimationTable {
    entries: HashMap<EntityKey, Entry>,
    motion_scale: f32,
}

impl Default for AnimationTable {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AnimationTable {
    pub fn new(motion_scale: f32) -> Self {
        Self {
            entries: HashMap::new(),
            motion_scale,
        }
    }

    pub fn set_motion_scale(&mut self, motion_scale: f32) {
        self.motion_scale = motion_scale;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Track exactly the given NPCs plus the player
    pub fn sync(&mut self, npcs: &[Npc]) {
        self.entries.retain(|key, _| match key {
            EntityKey::Player => true,
            EntityKey::Npc(id) => npcs.iter().any(|n| n.id == *id),
        });
        self.entries.entry(EntityKey::Player).or_default();
        for npc in npcs {
            self.entries
                .entry(EntityKey::Npc(npc.id))
                .or_insert_with(|| Entry {
                    phase: phase_for(npc.id),
                });
        }
    }

    /// Pose for an NPC at render time `t`. `playing` false forces the idle bob.
    pub fn npc_pose(&self, npc: &Npc, t: f32, playing: bool) -> Pose {
        let phase = self
            .entries
            .get(&EntityKey::Npc(npc.id))
            .map_or(0.0, |e| e.phase);
        let t = t + phase;
        let pose = match (playing, npc.behavior) {
            (false, _) | (true, Behavior::Idle) => Pose::idle(t),
            (true, Behavior::Walking) => Pose::walking(t),
            (true, Behavior::Celebrating) => Pose::celebrating(t),
        };
        pose.scaled(self.motion_scale)
    }

    pub fn player_pose(&self, moving: bool, t: f32) -> Pose {
        if moving {
            Pose::walking(t).scaled(self.motion_scale)
        } else {
            Pose::default()
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Stable per-id phase offset in [0, 1) seconds
fn phase_for(id: u32) -> f32 {
    (id.wrapping_mul(2654435761) % 1000) as f32 / 1000.0
}
