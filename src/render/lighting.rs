//! Fixed daylight: sky colour, ambient fill and a shadow-casting sun.

use bevy::{
    pbr::{CascadeShadowConfigBuilder, DirectionalLightShadowMap},
    prelude::*,
};

use crate::simulation::SceneSetup;
use crate::world::WorldConfig;

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DirectionalLightShadowMap { size: 1024 })
            .add_systems(Startup, setup_lighting.in_set(SceneSetup));
    }
}

#[derive(Component)]
pub struct Sun;

fn setup_lighting(mut commands: Commands, world: Res<WorldConfig>) {
    commands.insert_resource(ClearColor(world.sky_color));

    commands.insert_resource(AmbientLight {
        color: Color::srgb_u8(0x60, 0x60, 0x60),
        brightness: 400.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.5).looking_at(Vec3::ZERO, Vec3::Y),
        // Shadows only matter around the car.
        CascadeShadowConfigBuilder {
            num_cascades: 2,
            minimum_distance: 0.5,
            maximum_distance: 50.0,
            first_cascade_far_bound: 20.0,
            overlap_proportion: 0.3,
        }
        .build(),
        Sun,
    ));
}
