//! Road Rush - a single-street driving demo.
//!
//! Drive a car down a building-lined road, hit the pedestrians that spawn
//! ahead of you and listen to the car radio while you do it.

use bevy::prelude::*;

mod audio;
mod camera;
mod game_state;
mod render;
mod simulation;
mod ui;
mod world;

fn main() {
    // Force Vulkan backend on Windows (DX12 causes crashes on some systems)
    #[cfg(target_os = "windows")]
    std::env::set_var("WGPU_BACKEND", "vulkan");
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Road Rush".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Session lifecycle
        .add_plugins(game_state::GameStatePlugin)
        // Static world layout
        .add_plugins(world::WorldPlugin)
        // Driving loop
        .add_plugins(simulation::SimulationPlugin)
        .add_plugins(camera::CameraPlugin)
        .add_plugins(render::RenderPlugin)
        // Radio and background music
        .add_plugins(audio::AudioPlugin)
        // HUD
        .add_plugins(ui::UiPlugin)
        .run();
}
