//! Road surface and lane lines.

use bevy::prelude::*;

use super::matte;
use crate::world::RoadBounds;

/// Marker for the asphalt plane.
#[derive(Component)]
pub struct RoadSurface;

/// Marker for painted lines (centre and edges).
#[derive(Component)]
pub struct LaneLine;

const LINE_WIDTH: f32 = 0.12;
const LINE_HEIGHT: f32 = 0.01;

pub(super) fn spawn_road(
    mut commands: Commands,
    bounds: Res<RoadBounds>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(bounds.width(), bounds.length()))),
        MeshMaterial3d(materials.add(matte(Color::srgb_u8(0x44, 0x44, 0x44)))),
        Transform::from_xyz(0.0, -0.01, 0.0),
        RoadSurface,
    ));

    let line_mesh = meshes.add(Cuboid::new(LINE_WIDTH, LINE_HEIGHT, bounds.length()));
    let centre = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 1.0, 0.0),
        unlit: true,
        ..default()
    });
    let edge = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    for (x, material) in [
        (0.0, centre),
        (-bounds.half_width, edge.clone()),
        (bounds.half_width, edge),
    ] {
        commands.spawn((
            Mesh3d(line_mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_xyz(x, LINE_HEIGHT, 0.0),
            LaneLine,
        ));
    }
}
