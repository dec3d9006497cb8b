//! Decorative airplane crossing the sky.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use crate::world::rng_from_seed;

#[derive(Resource, Debug, Clone)]
pub struct AirplaneConfig {
    pub start: Vec3,
    /// Constant yaw of the model.
    pub yaw: f32,
    pub scale: f32,
    /// Units per second along +X.
    pub speed: f32,
    /// Past this x the plane reappears at `-wrap_x`.
    pub wrap_x: f32,
    /// Depth after a wrap is `depth_near - rand * depth_range`.
    pub depth_near: f32,
    pub depth_range: f32,
    /// Seed for wrap depths. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for AirplaneConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 15.0, -50.0),
            yaw: -0.2,
            scale: 1.5,
            speed: 5.0,
            wrap_x: 100.0,
            depth_near: -30.0,
            depth_range: 40.0,
            seed: None,
        }
    }
}

#[derive(Component)]
pub struct Airplane;

/// Move the plane along +X and wrap it around with a new depth once it leaves view.
pub fn fly(position: &mut Vec3, dt: f32, config: &AirplaneConfig, rng: &mut impl Rng) {
    position.x += config.speed * dt;
    if position.x > config.wrap_x {
        position.x = -config.wrap_x;
        position.z = config.depth_near - rng.gen::<f32>() * config.depth_range;
    }
}

pub(super) fn fly_airplane(
    time: Res<Time>,
    config: Res<AirplaneConfig>,
    mut planes: Query<&mut Transform, With<Airplane>>,
    mut local_rng: Local<Option<StdRng>>,
) {
    let rng = local_rng.get_or_insert_with(|| rng_from_seed(config.seed));
    for mut transform in &mut planes {
        fly(&mut transform.translation, time.delta_secs(), &config, rng);
    }
}
