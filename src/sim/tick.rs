//! Per-frame simulation step
//!
//! One call advances continuous state (NPC walking, effect lifetimes) by the
//! frame delta and lets the discrete timers (1 s countdown, retarget cycle)
//! fire as many times as the delta covers.

use super::collision::MoveCommand;
use super::state::{GamePhase, GameState};
use crate::consts::MAX_FRAME_DT;

/// Input commands gathered for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lamp slots clicked this frame
    pub place: Vec<u32>,
    /// Movement key presses, in arrival order
    pub moves: Vec<MoveCommand>,
    /// A movement key was released after the presses above
    pub release: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }
    for &id in &input.place {
        state.place(id);
    }
    for &cmd in &input.moves {
        state.apply_move(cmd);
    }
    if input.release {
        state.stop_moving();
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time += dt;

    state.advance_clock(dt);
    if state.phase == GamePhase::Playing {
        state.step_npcs(dt);
    }

    let now = state.time;
    let extent = state.config.town_half_extent;
    state.effects.release_due(now, extent, &mut state.rng);
    state.effects.expire(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::settings::MissionConfig;
    use crate::sim::effects::EffectCategory;
    use crate::sim::state::Behavior;

    fn run(state: &mut GameState, seconds: f32) {
        let frames = (seconds / FRAME_DT).round() as u32;
        let input = TickInput::default();
        for _ in 0..frames {
            tick(state, &input, FRAME_DT);
        }
    }

    fn started(duration: u32) -> GameState {
        let config = MissionConfig {
            duration_secs: duration,
            ..MissionConfig::with_seed(2024)
        };
        let mut state = GameState::new(config).unwrap();
        state.start();
        state
    }

    #[test]
    fn test_tick_intro_does_nothing() {
        let mut state = GameState::new(MissionConfig::default()).unwrap();
        run(&mut state, 3.0);
        assert_eq!(state.phase(), GamePhase::Intro);
        assert_eq!(state.time_left(), 300);
    }

    #[test]
    fn test_countdown_runs_in_whole_seconds() {
        let mut state = started(300);
        run(&mut state, 2.5);
        assert_eq!(state.time_left(), 298);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut state = started(300);
        run(&mut state, 3.2);
        assert_eq!(state.time_left(), 297);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME_DT);
        assert!(state.is_paused());
        run(&mut state, 10.0);
        assert_eq!(state.time_left(), 297);

        tick(&mut state, &pause, FRAME_DT);
        assert!(!state.is_paused());
        run(&mut state, 1.0);
        assert_eq!(state.time_left(), 296);
    }

    #[test]
    fn test_timeout_via_frames() {
        let mut state = started(2);
        run(&mut state, 2.5);
        assert_eq!(state.phase(), GamePhase::Completed);
        assert_eq!(state.time_left(), 0);
        assert!(state.final_metrics().is_some());
    }

    #[test]
    fn test_celebration_plays_out_and_clears() {
        let mut state = started(1);
        run(&mut state, 1.2);
        assert_eq!(state.phase(), GamePhase::Completed);
        run(&mut state, 1.0);
        assert!(state.effects().count(EffectCategory::Confetti) > 0);
        run(&mut state, 10.0);
        assert_eq!(state.effects().pending_len(), 0);
        assert!(state.effects().is_empty());
    }

    #[test]
    fn test_retarget_every_five_seconds() {
        let mut state = started(300);
        // Nobody has a destination yet
        assert!(state.npcs().iter().all(|n| n.behavior == Behavior::Idle));
        run(&mut state, 4.9);
        assert!(state.npcs().iter().all(|n| n.target == n.pos));
        run(&mut state, 0.2);
        assert!(state.npcs().iter().any(|n| n.behavior == Behavior::Walking));
    }

    #[test]
    fn test_pause_suspends_retarget_cycle() {
        let mut state = started(300);
        assert!(state.npcs().iter().all(|n| n.target == n.pos));
        state.toggle_pause();
        run(&mut state, 6.0);
        assert!(
            state.npcs().iter().all(|n| n.target == n.pos),
            "arrived NPCs keep their targets while paused"
        );

        state.toggle_pause();
        run(&mut state, 5.1);
        assert!(state.npcs().iter().any(|n| n.target != n.pos));
    }

    #[test]
    fn test_paused_npcs_keep_walking() {
        let mut state = started(300);
        state.place(0);
        let before: Vec<_> = state.npcs().iter().map(|n| n.pos).collect();
        state.toggle_pause();
        run(&mut state, 0.5);
        let after: Vec<_> = state.npcs().iter().map(|n| n.pos).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_moves_while_paused() {
        let mut state = started(300);
        state.toggle_pause();
        let start = state.player().pos;
        let input = TickInput {
            moves: vec![MoveCommand::Right],
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        // Either moved or blocked by a building; never ignored
        assert!(state.player().moving || state.player().pos == start);
    }

    #[test]
    fn test_release_clears_moving() {
        let mut state = started(300);
        state.player.moving = true;
        let input = TickInput {
            release: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert!(!state.player().moving);
    }

    #[test]
    fn test_determinism() {
        let mut a = started(300);
        let mut b = started(300);
        let inputs = [
            TickInput {
                place: vec![14, 21],
                ..Default::default()
            },
            TickInput {
                moves: vec![MoveCommand::Forward, MoveCommand::Left],
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..400 {
            for input in &inputs {
                tick(&mut a, input, FRAME_DT);
                tick(&mut b, input, FRAME_DT);
            }
        }
        assert_eq!(a.npcs(), b.npcs());
        assert_eq!(a.player(), b.player());
        assert_eq!(a.effects().records(), b.effects().records());
    }

    #[test]
    fn test_huge_frame_is_clamped() {
        let mut state = started(300);
        tick(&mut state, &TickInput::default(), 30.0);
        assert_eq!(state.time_left(), 300, "one clamped frame is under a second");
    }
}
