//! Driving simulation: car control, pedestrians, collisions, ambient traffic.
//!
//! Everything runs once per rendered frame in `Update`, ordered by
//! `DrivingSet`. The kinematic constants are per-frame values, so the feel of
//! the car follows the display rate.

use bevy::prelude::*;

use crate::game_state::GameState;

pub mod airplane;
pub mod car;
pub mod collision;
pub mod pedestrians;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<car::CarTuning>()
            .init_resource::<car::DriveInput>()
            .init_resource::<pedestrians::SpawnRules>()
            .init_resource::<pedestrians::SpawnRng>()
            .init_resource::<pedestrians::PedestrianPool>()
            .init_resource::<collision::CollisionConfig>()
            .init_resource::<collision::RespawnQueue>()
            .init_resource::<airplane::AirplaneConfig>()
            .add_event::<collision::PedestrianHit>()
            .configure_sets(
                Update,
                (
                    DrivingSet::Input,
                    DrivingSet::Car,
                    DrivingSet::Collision,
                    DrivingSet::Spawning,
                    DrivingSet::Camera,
                    DrivingSet::Ambient,
                    DrivingSet::Sync,
                )
                    .chain()
                    .run_if(in_state(GameState::Driving)),
            )
            .add_systems(
                Startup,
                pedestrians::spawn_initial_pedestrians.after(SceneSetup),
            )
            .add_systems(
                Update,
                (
                    car::read_drive_input.in_set(DrivingSet::Input),
                    car::drive_car.in_set(DrivingSet::Car),
                    (collision::detect_collisions, collision::log_hits)
                        .chain()
                        .in_set(DrivingSet::Collision),
                    (collision::run_respawns, pedestrians::refill_pedestrians)
                        .chain()
                        .in_set(DrivingSet::Spawning),
                    airplane::fly_airplane.in_set(DrivingSet::Ambient),
                    car::sync_car_transform.in_set(DrivingSet::Sync),
                ),
            );
    }
}

/// Per-frame ordering of the driving loop.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrivingSet {
    /// Sample held keys.
    Input,
    /// Integrate the car.
    Car,
    /// At most one hit per frame.
    Collision,
    /// Respawns and ambient refills.
    Spawning,
    /// Chase camera.
    Camera,
    /// Decorative actors.
    Ambient,
    /// Push simulation state into transforms and meshes.
    Sync,
}

/// Startup systems that build the scene (car, road, lights).
///
/// Initial pedestrians are placed after this so the car already exists.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneSetup;
