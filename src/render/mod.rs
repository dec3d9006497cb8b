//! Scene construction and mesh bookkeeping.
//!
//! The simulation owns positions; this module owns meshes and materials and
//! keeps them in step with the simulation.

use bevy::prelude::*;

use crate::simulation::{DrivingSet, SceneSetup};

pub mod building_spawner;
pub mod lighting;
pub mod pedestrian_bodies;
pub mod road_mesh;
pub mod vehicle_meshes;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneTextures>()
            .add_plugins(lighting::LightingPlugin)
            .add_systems(
                Startup,
                (
                    road_mesh::spawn_road,
                    building_spawner::spawn_buildings,
                    vehicle_meshes::spawn_player_car,
                    vehicle_meshes::spawn_airplane,
                )
                    .in_set(SceneSetup),
            )
            .add_systems(
                Update,
                pedestrian_bodies::sync_pedestrian_bodies.in_set(DrivingSet::Sync),
            );
    }
}

/// Image assets shared by several scene pieces.
#[derive(Resource)]
pub struct SceneTextures {
    pub facade_left: Handle<Image>,
    pub facade_right: Handle<Image>,
    pub flag: Handle<Image>,
}

impl FromWorld for SceneTextures {
    fn from_world(world: &mut World) -> Self {
        let asset_server = world.resource::<AssetServer>();
        Self {
            facade_left: asset_server.load("textures/facade_left.png"),
            facade_right: asset_server.load("textures/facade_right.png"),
            flag: asset_server.load("textures/flag.png"),
        }
    }
}

/// Matte material, the look used for every solid object in the scene.
pub(crate) fn matte(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        perceptual_roughness: 0.9,
        reflectance: 0.1,
        ..default()
    }
}
