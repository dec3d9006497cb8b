//! Session lifecycle.
//!
//! The driving session is built while in `Loading` and runs in `Driving`.
//! All per-frame simulation systems are gated on `Driving`, so deferred work
//! (pedestrian respawns) can never fire into a torn-down scene.

use bevy::prelude::*;

pub struct GameStatePlugin;

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<HitCounter>()
            .add_systems(PostStartup, begin_driving);
    }
}

/// High-level session state controlling which systems run.
#[derive(States, Default, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum GameState {
    /// Scene, car and initial pedestrians are being created.
    #[default]
    Loading,
    /// Active driving - simulation running every frame.
    Driving,
}

/// Number of pedestrians hit this session. Only ever increases.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitCounter(u64);

impl HitCounter {
    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn record_hit(&mut self) {
        self.0 += 1;
    }
}

/// The world is fully built by the end of `Startup`; start driving.
fn begin_driving(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Driving);
    info!("Session started");
}
