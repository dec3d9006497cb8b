//! Box-and-cylinder models for the player car and the airplane.

use bevy::prelude::*;

use super::{matte, SceneTextures};
use crate::simulation::airplane::{Airplane, AirplaneConfig};
use crate::simulation::car::{CarState, CarTuning, PlayerCar};

const BODY_SIZE: Vec3 = Vec3::new(1.2, 0.6, 2.5);
const WHEEL_RADIUS: f32 = 0.3;
const WHEEL_WIDTH: f32 = 0.2;
/// Wheel centres relative to the body centre.
const WHEEL_OFFSETS: [Vec3; 4] = [
    Vec3::new(0.6, -0.15, 0.8),
    Vec3::new(-0.6, -0.15, 0.8),
    Vec3::new(0.6, -0.15, -0.8),
    Vec3::new(-0.6, -0.15, -0.8),
];

/// Flag dimensions; the flag image is taller than it is wide.
const POLE_HEIGHT: f32 = 1.5;
const POLE_RADIUS: f32 = 0.03;
const FLAG_WIDTH: f32 = 0.6;
const FLAG_ASPECT: f32 = 0.8;

pub(super) fn spawn_player_car(
    mut commands: Commands,
    tuning: Res<CarTuning>,
    textures: Res<SceneTextures>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let car = CarState::parked_at(Vec3::new(0.0, tuning.ride_height, 0.0));

    let body = meshes.add(Cuboid::from_size(BODY_SIZE));
    let wheel = meshes.add(Cylinder::new(WHEEL_RADIUS, WHEEL_WIDTH));
    let body_material = materials.add(matte(Color::srgb_u8(0xcc, 0x00, 0x00)));
    let wheel_material = materials.add(matte(Color::srgb_u8(0x11, 0x11, 0x11)));
    let pole_material = materials.add(matte(Color::srgb_u8(0xaa, 0xaa, 0xaa)));
    let flag_material = materials.add(StandardMaterial {
        base_color_texture: Some(textures.flag.clone()),
        unlit: true,
        double_sided: true,
        cull_mode: None,
        alpha_mode: AlphaMode::Mask(0.1),
        ..default()
    });

    let flag_height = FLAG_WIDTH / FLAG_ASPECT;

    commands
        .spawn((
            Mesh3d(body),
            MeshMaterial3d(body_material),
            car.transform(),
            car,
            PlayerCar,
        ))
        .with_children(|parent| {
            for offset in WHEEL_OFFSETS {
                parent.spawn((
                    Mesh3d(wheel.clone()),
                    MeshMaterial3d(wheel_material.clone()),
                    // Cylinders stand along Y; lay them on their side.
                    Transform::from_translation(offset)
                        .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
                ));
            }

            // Flag on a pole at the back of the roof.
            parent
                .spawn((
                    Transform::from_xyz(0.0, BODY_SIZE.y / 2.0 + 0.3, 0.8).with_scale(Vec3::splat(0.6)),
                    Visibility::default(),
                ))
                .with_children(|flag| {
                    flag.spawn((
                        Mesh3d(meshes.add(Cylinder::new(POLE_RADIUS, POLE_HEIGHT))),
                        MeshMaterial3d(pole_material),
                        Transform::from_xyz(0.0, POLE_HEIGHT / 2.0, 0.0),
                    ));
                    flag.spawn((
                        Mesh3d(meshes.add(Rectangle::new(FLAG_WIDTH, flag_height))),
                        MeshMaterial3d(flag_material),
                        Transform::from_xyz(
                            FLAG_WIDTH / 2.0 + POLE_RADIUS,
                            POLE_HEIGHT - flag_height / 2.0,
                            0.0,
                        ),
                    ));
                });
        });

    info!("Car ready at {}", car.position);
}

pub(super) fn spawn_airplane(
    mut commands: Commands,
    config: Res<AirplaneConfig>,
    textures: Res<SceneTextures>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let hull = materials.add(matte(Color::srgb_u8(0xcc, 0xcc, 0xcc)));
    let panel = |texture: &Handle<Image>| StandardMaterial {
        base_color_texture: Some(texture.clone()),
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    };
    let panel_mesh = meshes.add(Rectangle::new(1.5, 1.0));
    let panels = [
        (-1.2, materials.add(panel(&textures.facade_left))),
        (1.2, materials.add(panel(&textures.facade_right))),
    ];

    commands
        .spawn((
            Transform::from_translation(config.start)
                .with_rotation(Quat::from_rotation_y(config.yaw))
                .with_scale(Vec3::splat(config.scale)),
            Visibility::default(),
            Airplane,
        ))
        .with_children(|plane| {
            // Fuselage lies along Z.
            plane.spawn((
                Mesh3d(meshes.add(ConicalFrustum {
                    radius_top: 0.3,
                    radius_bottom: 0.4,
                    height: 4.0,
                })),
                MeshMaterial3d(hull.clone()),
                Transform::from_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            ));
            plane.spawn((
                Mesh3d(meshes.add(Cuboid::new(4.0, 0.1, 1.0))),
                MeshMaterial3d(hull.clone()),
                Transform::from_xyz(0.0, 0.1, 0.0),
            ));
            plane.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.1, 1.0, 0.5))),
                MeshMaterial3d(hull),
                Transform::from_xyz(0.0, 0.5, -1.8),
            ));

            // Photo panels hanging under the wings, tilted slightly down.
            for (x, material) in panels {
                plane.spawn((
                    Mesh3d(panel_mesh.clone()),
                    MeshMaterial3d(material),
                    Transform::from_xyz(x, -0.3, 0.0).with_rotation(Quat::from_rotation_x(-0.1)),
                ));
            }
        });
}
