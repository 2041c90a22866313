//! Mission clock and phase transitions
//!
//! Intro -> Playing -> Completed, with `paused` valid only while Playing.
//! The countdown and retarget intervals are owned by the Playing phase: they
//! are armed on entry and disarmed on every exit.

use serde::{Deserialize, Serialize};

use super::effects::EffectCategory;
use super::state::{GameEvent, GamePhase, GameState, MissionCompletion};
use crate::consts::COUNTDOWN_STEP;

/// Confetti bursts fired when a mission completes
pub const CELEBRATION_BURSTS: u32 = 50;
/// Spacing between celebration bursts
pub const CELEBRATION_SPACING: f32 = 0.1;

/// A repeating timer driven by frame deltas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub period: f32,
    accumulated: f32,
    armed: bool,
}

impl Interval {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            accumulated: 0.0,
            armed: false,
        }
    }

    /// Start counting from zero
    pub fn arm(&mut self) {
        self.accumulated = 0.0;
        self.armed = true;
    }

    /// Stop and forget any partial period
    pub fn disarm(&mut self) {
        self.accumulated = 0.0;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance by `dt`, returning how many periods elapsed
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.armed {
            return 0;
        }
        self.accumulated += dt;
        if self.accumulated < self.period {
            return 0;
        }
        let fired = (self.accumulated / self.period).floor();
        self.accumulated = (self.accumulated - fired * self.period).max(0.0);
        fired as u32
    }
}

/// Countdown plus the NPC retarget cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    pub duration: u32,
    pub time_left: u32,
    pub countdown: Interval,
    pub retarget: Interval,
}

impl Clock {
    pub fn new(duration: u32, retarget_period: f32) -> Self {
        Self {
            duration,
            time_left: duration,
            countdown: Interval::new(COUNTDOWN_STEP),
            retarget: Interval::new(retarget_period),
        }
    }

    pub fn arm(&mut self) {
        self.countdown.arm();
        self.retarget.arm();
    }

    pub fn disarm(&mut self) {
        self.countdown.disarm();
        self.retarget.disarm();
    }

    pub fn restore(&mut self) {
        self.time_left = self.duration;
    }

    /// Count down by whole seconds. Returns true when this call hit zero.
    pub fn tick_down(&mut self, dt: f32) -> bool {
        let steps = self.countdown.advance(dt);
        if steps == 0 || self.time_left == 0 {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(steps);
        self.time_left == 0
    }

    pub fn is_armed(&self) -> bool {
        self.countdown.is_armed() || self.retarget.is_armed()
    }
}

impl GameState {
    /// Intro -> Playing. Ignored from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Intro {
            log::debug!("start ignored in {:?}", self.phase);
            return false;
        }
        self.clear_devices();
        self.clock.restore();
        self.clock.arm();
        self.paused = false;
        self.final_metrics = None;
        self.committed = false;
        self.phase = GamePhase::Playing;
        self.refresh_npcs();
        self.events.push(GameEvent::Started);
        log::info!("Mission started: {}s on the clock", self.clock.time_left);
        true
    }

    /// Flip the pause flag. Only meaningful while Playing.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("pause ignored in {:?}", self.phase);
            return false;
        }
        self.paused = !self.paused;
        if self.paused {
            self.events.push(GameEvent::Paused);
            log::info!("Paused at {}s", self.clock.time_left);
        } else {
            self.events.push(GameEvent::Resumed);
            log::info!("Resumed at {}s", self.clock.time_left);
        }
        true
    }

    /// Playing -> Completed, freezing the final metrics
    pub fn complete(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("complete ignored in {:?}", self.phase);
            return false;
        }
        let metrics = self.metrics();
        self.clock.disarm();
        self.paused = false;
        self.phase = GamePhase::Completed;
        self.final_metrics = Some(metrics);
        self.refresh_npcs();
        for i in 0..CELEBRATION_BURSTS {
            let at = self.time + i as f32 * CELEBRATION_SPACING;
            self.effects.schedule(at, EffectCategory::Confetti, None);
        }
        self.events.push(GameEvent::Completed { metrics });
        log::info!(
            "Mission completed: energy={} happiness={} ({}s left)",
            metrics.energy,
            metrics.happiness,
            self.clock.time_left
        );
        true
    }

    /// Back to Intro from anywhere, restoring devices, actors and the clock
    pub fn reset(&mut self) {
        self.clock.disarm();
        self.clock.restore();
        self.paused = false;
        self.phase = GamePhase::Intro;
        self.final_metrics = None;
        self.committed = false;
        self.clear_devices();
        self.respawn_actors();
        self.effects.cancel_pending();
        self.refresh_npcs();
        self.events.push(GameEvent::Reset);
        log::info!("Mission reset");
    }

    /// Hand the finished mission to the owning page (once)
    pub fn complete_and_commit(&mut self, mission_id: &str) -> Option<MissionCompletion> {
        if self.phase != GamePhase::Completed || self.committed {
            log::debug!("commit ignored in {:?}", self.phase);
            return None;
        }
        let metrics = self.final_metrics.unwrap_or_else(|| self.metrics());
        let completion = MissionCompletion {
            mission_id: mission_id.to_string(),
            metrics,
            devices_placed: self.placed_count(),
        };
        self.committed = true;
        self.events.push(GameEvent::Committed(completion.clone()));
        log::info!("Mission {} committed", mission_id);
        Some(completion)
    }

    /// Stop every timer and pending effect this state owns
    pub fn shutdown(&mut self) {
        self.clock.disarm();
        self.effects.cancel_pending();
    }

    /// Run the countdown and retarget cycle for one frame
    pub(crate) fn advance_clock(&mut self, dt: f32) {
        if self.phase != GamePhase::Playing || self.paused {
            return;
        }
        if self.clock.tick_down(dt) {
            log::info!("Time's up");
            self.complete();
            return;
        }
        let passes = self.clock.retarget.advance(dt);
        for _ in 0..passes {
            self.retarget_npcs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MissionConfig;

    fn playing(duration: u32) -> GameState {
        let config = MissionConfig {
            duration_secs: duration,
            ..MissionConfig::with_seed(3)
        };
        let mut state = GameState::new(config).unwrap();
        assert!(state.start());
        state
    }

    #[test]
    fn test_interval_fires_per_period() {
        let mut interval = Interval::new(1.0);
        assert_eq!(interval.advance(5.0), 0, "unarmed interval never fires");
        interval.arm();
        assert_eq!(interval.advance(0.6), 0);
        assert_eq!(interval.advance(0.6), 1);
        assert_eq!(interval.advance(2.0), 2);
        interval.disarm();
        assert_eq!(interval.advance(10.0), 0);
    }

    #[test]
    fn test_interval_tiny_period_returns() {
        let mut interval = Interval::new(1e-10);
        interval.arm();
        assert!(interval.advance(0.05) > 0);
        interval.disarm();
        assert_eq!(interval.advance(0.05), 0);
    }

    #[test]
    fn test_tiny_retarget_interval_blocks_setup() {
        let config = MissionConfig {
            retarget_interval: 1e-10,
            ..MissionConfig::default()
        };
        assert!(matches!(
            GameState::new(config),
            Err(crate::error::ConfigError::TooSmall { .. })
        ));
    }

    #[test]
    fn test_start_only_from_intro() {
        let mut state = playing(10);
        assert!(!state.start());
        state.complete();
        assert!(!state.start());
        state.reset();
        assert!(state.start());
    }

    #[test]
    fn test_pause_only_while_playing() {
        let mut state = GameState::new(MissionConfig::default()).unwrap();
        assert!(!state.toggle_pause());
        assert!(!state.is_paused());

        state.start();
        assert!(state.toggle_pause());
        assert!(state.is_paused());
        assert!(state.toggle_pause());
        assert!(!state.is_paused());
    }

    #[test]
    fn test_timeout_completes_exactly_once() {
        let mut state = playing(3);
        for _ in 0..2 {
            state.advance_clock(1.0);
        }
        assert_eq!(state.time_left(), 1);
        assert_eq!(state.phase(), GamePhase::Playing);

        state.advance_clock(1.0);
        assert_eq!(state.time_left(), 0);
        assert_eq!(state.phase(), GamePhase::Completed);

        state.advance_clock(5.0);
        assert_eq!(state.time_left(), 0);
        let completions = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Completed { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_large_frame_does_not_go_negative() {
        let mut state = playing(2);
        state.advance_clock(10.0);
        assert_eq!(state.time_left(), 0);
        assert_eq!(state.phase(), GamePhase::Completed);
    }

    #[test]
    fn test_leaving_playing_disarms_timers() {
        let mut state = playing(30);
        assert!(state.clock.is_armed());
        state.complete();
        assert!(!state.clock.is_armed());

        let mut state = playing(30);
        state.reset();
        assert!(!state.clock.is_armed());
        assert_eq!(state.time_left(), 30);
    }

    #[test]
    fn test_commit_only_from_completed_and_once() {
        let mut state = playing(30);
        assert!(state.complete_and_commit("kenya-1").is_none());
        state.complete();
        let completion = state.complete_and_commit("kenya-1").expect("completed mission commits");
        assert_eq!(completion.mission_id, "kenya-1");
        assert_eq!(completion.metrics.happiness, 50.0);
        assert!(state.complete_and_commit("kenya-1").is_none());
    }

    #[test]
    fn test_completion_schedules_celebration() {
        let mut state = playing(30);
        state.complete();
        assert_eq!(state.effects().pending_len(), CELEBRATION_BURSTS as usize);
        state.reset();
        assert_eq!(state.effects().pending_len(), 0);
    }
}
