//! Chase camera that trails the player's car.
//!
//! Position is smoothed with a fixed per-frame lerp; orientation snaps to
//! look at the car every frame.

use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    pbr::{DistanceFog, FogFalloff},
    prelude::*,
};

use crate::simulation::car::{CarState, PlayerCar};
use crate::simulation::{DrivingSet, SceneSetup};
use crate::world::WorldConfig;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChaseRig>()
            .add_systems(Startup, setup_camera.in_set(SceneSetup))
            .add_systems(Update, follow_car.in_set(DrivingSet::Camera));
    }
}

/// Chase camera placement relative to the car.
#[derive(Resource, Debug, Clone)]
pub struct ChaseRig {
    /// Offset in the car's local frame (behind and above).
    pub offset: Vec3,
    /// Point the camera looks at, relative to the car position.
    pub look_offset: Vec3,
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ChaseRig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 4.0, 8.0),
            look_offset: Vec3::Y,
            smoothing: 0.05,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Marker for the chase camera.
#[derive(Component)]
pub struct ChaseCamera;

/// Where the camera wants to be for the given car.
pub fn desired_position(car: &CarState, rig: &ChaseRig) -> Vec3 {
    car.position + car.rotation() * rig.offset
}

/// One frame of camera follow.
pub fn follow(camera: &mut Transform, car: &CarState, rig: &ChaseRig) {
    let target = desired_position(car, rig);
    let look_at = car.position + rig.look_offset;

    camera.translation = camera.translation.lerp(target, rig.smoothing);
    camera.look_at(look_at, Vec3::Y);
}

fn setup_camera(mut commands: Commands, rig: Res<ChaseRig>, world: Res<WorldConfig>) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: rig.fov_degrees.to_radians(),
            near: rig.near,
            far: rig.far,
            ..default()
        }),
        Transform::from_translation(rig.offset).looking_at(Vec3::ZERO, Vec3::Y),
        Tonemapping::TonyMcMapface,
        DistanceFog {
            color: world.sky_color,
            falloff: FogFalloff::Linear {
                start: world.fog_start,
                end: world.fog_end,
            },
            ..default()
        },
        ChaseCamera,
    ));
}

fn follow_car(
    rig: Res<ChaseRig>,
    cars: Query<&CarState, With<PlayerCar>>,
    mut cameras: Query<&mut Transform, With<ChaseCamera>>,
) {
    let Ok(car) = cars.get_single() else {
        return;
    };
    for mut transform in &mut cameras {
        follow(&mut transform, car, &rig);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parked() -> CarState {
        CarState::parked_at(Vec3::new(0.0, 0.3, 0.0))
    }

    #[test]
    fn offset_rotates_with_the_car() {
        let rig = ChaseRig::default();
        let car = parked();
        assert!((desired_position(&car, &rig) - Vec3::new(0.0, 4.3, 8.0)).length() < 1e-5);

        let mut turned = car;
        turned.heading = std::f32::consts::FRAC_PI_2;
        // Facing -X, so "behind" is +X.
        let desired = desired_position(&turned, &rig);
        assert!((desired - Vec3::new(8.0, 4.3, 0.0)).length() < 1e-5);
    }

    #[test]
    fn moves_five_percent_of_the_way_each_frame() {
        let rig = ChaseRig::default();
        let car = parked();
        let mut camera = Transform::from_xyz(0.0, 4.3, 28.0);

        follow(&mut camera, &car, &rig);
        assert!((camera.translation.z - 27.0).abs() < 1e-4);
        assert!((camera.translation.y - 4.3).abs() < 1e-5);
    }

    #[test]
    fn always_looks_at_the_car_without_smoothing() {
        let rig = ChaseRig::default();
        let mut car = parked();
        car.position = Vec3::new(5.0, 0.3, -40.0);
        let mut camera = Transform::from_xyz(0.0, 4.0, 8.0);

        follow(&mut camera, &car, &rig);
        let to_target = (car.position + Vec3::Y - camera.translation).normalize();
        assert!((camera.forward().as_vec3() - to_target).length() < 1e-4);
    }

    #[test]
    fn converges_on_a_parked_car() {
        let rig = ChaseRig::default();
        let car = parked();
        let mut camera = Transform::from_xyz(30.0, 20.0, -30.0);
        for _ in 0..400 {
            follow(&mut camera, &car, &rig);
        }
        assert!(camera.translation.distance(desired_position(&car, &rig)) < 0.01);
    }
}
