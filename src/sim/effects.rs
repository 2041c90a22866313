//! Visual feedback records
//!
//! Each record carries its own creation time and is purged individually once
//! its category's lifetime has passed, so bursts of different ages coexist.
//! Nothing here feeds back into gameplay.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::QualityPreset;

/// Max offset of a record from its burst origin, per axis
pub const EFFECT_JITTER: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    /// Lamp placed
    Sparkle,
    /// NPC stepped into light
    Energy,
    /// Mission completed
    Confetti,
}

impl EffectCategory {
    pub fn palette(&self) -> &'static [u32] {
        match self {
            EffectCategory::Sparkle => &[0xfbbf24, 0xf59e0b, 0xd97706],
            EffectCategory::Energy => &[0x3b82f6, 0x1d4ed8, 0x1e40af],
            EffectCategory::Confetti => {
                &[0xef4444, 0xf97316, 0xeab308, 0x22c55e, 0x3b82f6, 0x8b5cf6]
            }
        }
    }

    /// Records per burst
    pub fn burst_size(&self) -> usize {
        match self {
            EffectCategory::Confetti => 25,
            _ => 15,
        }
    }

    /// Seconds a record stays alive
    pub fn lifetime(&self) -> f32 {
        match self {
            EffectCategory::Energy => 1.0,
            _ => 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub id: u64,
    pub pos: Vec2,
    pub category: EffectCategory,
    /// 0xRRGGBB
    pub color: u32,
    pub created_at: f32,
}

impl EffectRecord {
    pub fn expires_at(&self) -> f32 {
        self.created_at + self.category.lifetime()
    }

    pub fn is_expired(&self, now: f32) -> bool {
        now >= self.expires_at()
    }
}

/// A burst waiting for its start time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PendingBurst {
    at: f32,
    category: EffectCategory,
    /// `None` picks a random point in the town when released
    origin: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsQueue {
    records: Vec<EffectRecord>,
    pending: Vec<PendingBurst>,
    next_id: u64,
    /// Live record cap; bursts are truncated when full
    cap: usize,
}

impl Default for EffectsQueue {
    fn default() -> Self {
        Self::with_cap(QualityPreset::default().max_effects())
    }
}

impl EffectsQueue {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            records: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
            cap,
        }
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
    }

    pub fn records(&self) -> &[EffectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, category: EffectCategory) -> usize {
        self.records.iter().filter(|r| r.category == category).count()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Append one burst around `origin`. Returns how many records were added.
    pub fn spawn_burst<R: Rng>(
        &mut self,
        category: EffectCategory,
        origin: Vec2,
        now: f32,
        rng: &mut R,
    ) -> usize {
        let room = self.cap.saturating_sub(self.records.len());
        let n = category.burst_size().min(room);
        let palette = category.palette();
        for _ in 0..n {
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * EFFECT_JITTER,
                (rng.random::<f32>() - 0.5) * 2.0 * EFFECT_JITTER,
            );
            let color = palette[rng.random_range(0..palette.len())];
            self.records.push(EffectRecord {
                id: self.next_id,
                pos: origin + jitter,
                category,
                color,
                created_at: now,
            });
            self.next_id += 1;
        }
        n
    }

    /// Queue a burst to fire at time `at`
    pub fn schedule(&mut self, at: f32, category: EffectCategory, origin: Option<Vec2>) {
        self.pending.push(PendingBurst {
            at,
            category,
            origin,
        });
    }

    /// Fire every pending burst whose time has come
    pub fn release_due<R: Rng>(&mut self, now: f32, half_extent: f32, rng: &mut R) -> usize {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.at <= now);
        self.pending = waiting;

        let mut added = 0;
        for burst in due {
            let origin = burst.origin.unwrap_or_else(|| {
                Vec2::new(
                    rng.random_range(-half_extent..=half_extent),
                    rng.random_range(-half_extent..=half_extent),
                )
            });
            added += self.spawn_burst(burst.category, origin, burst.at, rng);
        }
        added
    }

    /// Drop records past their own lifetime. Returns how many were removed.
    pub fn expire(&mut self, now: f32) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !r.is_expired(now));
        before - self.records.len()
    }

    /// Forget bursts that have not fired yet
    pub fn cancel_pending(&mut self) {
        self.pending.clear();
    }
}
