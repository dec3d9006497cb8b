//! Spawns the textured building boxes planned by the world layout.

use bevy::prelude::*;

use super::SceneTextures;
use crate::world::buildings::{BuildingLayout, RoadSide};

#[derive(Component)]
pub struct Building;

pub(super) fn spawn_buildings(
    mut commands: Commands,
    layout: Res<BuildingLayout>,
    textures: Res<SceneTextures>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let facade = |texture: &Handle<Image>| StandardMaterial {
        base_color_texture: Some(texture.clone()),
        perceptual_roughness: 0.95,
        reflectance: 0.05,
        ..default()
    };
    let left = materials.add(facade(&textures.facade_left));
    let right = materials.add(facade(&textures.facade_right));

    for lot in &layout.lots {
        let material = match lot.side {
            RoadSide::Left => left.clone(),
            RoadSide::Right => right.clone(),
        };
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(lot.size))),
            MeshMaterial3d(material),
            Transform::from_translation(lot.center),
            Building,
        ));
    }

    info!("Spawned {} buildings", layout.lots.len());
}
