//! Mini-game session
//!
//! Owns the simulation, the render-only animation table and the input
//! attachment. The host calls `frame` once per animation frame and forwards
//! keyboard events; `teardown` (or dropping the session) cancels every timer
//! and detaches input so nothing keeps mutating a closed game.

use std::sync::Arc;

use crate::anim::{AnimationTable, Pose};
use crate::error::ConfigError;
use crate::platform::{Disposition, KeyAction, KeyEvent};
use crate::settings::{MissionConfig, Settings};
use crate::sim::{
    GameEvent, GamePhase, GameState, MissionCompletion, Snapshot, TickInput, TownLayout, tick,
};

pub struct Session {
    state: GameState,
    anim: AnimationTable,
    settings: Settings,
    night: bool,
    attached: bool,
    /// Seconds of rendered frames, drives cosmetic animation only
    render_time: f32,
}

impl Session {
    /// Set up a mission with a generated layout
    pub fn new(config: MissionConfig, settings: Settings) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::new(config)?, settings))
    }

    /// Set up a mission on a layout supplied by the environment
    pub fn with_layout(
        config: MissionConfig,
        layout: Arc<TownLayout>,
        settings: Settings,
    ) -> Result<Self, ConfigError> {
        Ok(Self::from_state(
            GameState::with_layout(config, layout)?,
            settings,
        ))
    }

    fn from_state(mut state: GameState, settings: Settings) -> Self {
        state.effects_mut().set_cap(settings.max_effects());
        let mut anim = AnimationTable::new(settings.motion_scale());
        anim.sync(state.npcs());
        log::info!("Session attached");
        Self {
            state,
            anim,
            settings,
            night: false,
            attached: true,
            render_time: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.effects_mut().set_cap(settings.max_effects());
        self.anim.set_motion_scale(settings.motion_scale());
        self.settings = settings;
    }

    /// Day/night from the environment; cosmetic
    pub fn set_night(&mut self, night: bool) {
        self.night = night;
    }

    pub fn start(&mut self) -> bool {
        self.attached && self.state.start()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.attached && self.state.toggle_pause()
    }

    pub fn reset(&mut self) {
        if self.attached {
            self.state.reset();
            self.anim.sync(self.state.npcs());
        }
    }

    pub fn complete(&mut self) -> bool {
        self.attached && self.state.complete()
    }

    pub fn place(&mut self, device_id: u32) -> bool {
        self.attached && self.state.place(device_id)
    }

    pub fn toggle_control_mode(&mut self) {
        if self.attached {
            self.state.toggle_control_mode();
        }
    }

    /// Commit a completed mission for the owning page to record
    pub fn complete_and_commit(&mut self, mission_id: &str) -> Option<MissionCompletion> {
        if !self.attached {
            return None;
        }
        self.state.complete_and_commit(mission_id)
    }

    /// Route one keyboard event. Movement keys are only claimed while Playing,
    /// but a movement key-up always clears `moving`.
    pub fn key_event(&mut self, event: KeyEvent) -> Disposition {
        if !self.attached {
            return Disposition::PassThrough;
        }
        if self.state.phase() != GamePhase::Playing {
            if event.action == KeyAction::Up && event.key.is_movement() {
                self.state.stop_moving();
            }
            return Disposition::PassThrough;
        }
        match event.action {
            KeyAction::Down => {
                let Some(cmd) = event.key.command(self.state.player().mode) else {
                    return Disposition::PassThrough;
                };
                self.state.apply_move(cmd);
                Disposition::Consumed
            }
            KeyAction::Up if event.key.is_movement() => {
                self.state.stop_moving();
                Disposition::Consumed
            }
            KeyAction::Up => Disposition::PassThrough,
        }
    }

    /// Advance one animation frame. Returns false once torn down.
    pub fn frame(&mut self, dt: f32) -> bool {
        self.frame_with(&TickInput::default(), dt)
    }

    /// Advance one frame with batched input (scripted drivers, replays)
    pub fn frame_with(&mut self, input: &TickInput, dt: f32) -> bool {
        if !self.attached {
            return false;
        }
        tick(&mut self.state, input, dt);
        self.render_time += dt.max(0.0);
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let mut snapshot = self.state.snapshot();
        snapshot.night = self.night;
        snapshot
    }

    /// Cosmetic pose for an NPC this frame
    pub fn npc_pose(&self, npc_id: u32) -> Option<Pose> {
        let playing = self.state.phase() == GamePhase::Playing;
        self.state
            .npc(npc_id)
            .map(|npc| self.anim.npc_pose(npc, self.render_time, playing))
    }

    pub fn player_pose(&self) -> Pose {
        self.anim
            .player_pose(self.state.player().moving, self.render_time)
    }

    /// Cancel timers and pending effects, detach input. Idempotent.
    pub fn teardown(&mut self) {
        if !self.attached {
            return;
        }
        self.state.shutdown();
        self.anim.clear();
        self.attached = false;
        log::info!("Session detached");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}
