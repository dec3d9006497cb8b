//! World layout: road extents and the building strip along both sides.
//!
//! Everything here is computed once at startup and never changes afterwards.
//! Meshes are created by the render module from these descriptors.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod buildings;

use buildings::{BuildingLayout, BuildingRules};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldConfig>()
            .init_resource::<RoadBounds>()
            .init_resource::<BuildingRules>()
            .init_resource::<BuildingLayout>()
            .add_systems(PreStartup, plan_buildings);
    }
}

/// Global world configuration.
#[derive(Resource)]
pub struct WorldConfig {
    /// Sky and fog color.
    pub sky_color: Color,
    /// Distance at which fog starts.
    pub fog_start: f32,
    /// Distance at which fog is opaque.
    pub fog_end: f32,
    /// Seed for the building layout. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            sky_color: Color::srgb_u8(0x87, 0xCE, 0xEB),
            fog_start: 50.0,
            fog_end: 150.0,
            seed: None,
        }
    }
}

/// Drivable region of the road, centred on the origin.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct RoadBounds {
    /// Half of the road width (x axis).
    pub half_width: f32,
    /// Half of the road length (z axis).
    pub half_length: f32,
}

impl Default for RoadBounds {
    fn default() -> Self {
        Self {
            half_width: 8.0,
            half_length: 190.0,
        }
    }
}

impl RoadBounds {
    /// Full road width.
    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }

    /// Full road length.
    pub fn length(&self) -> f32 {
        self.half_length * 2.0
    }

    /// Clamp x and z independently into the road. y is untouched.
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(-self.half_width, self.half_width),
            position.y,
            position.z.clamp(-self.half_length, self.half_length),
        )
    }
}

pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn plan_buildings(
    config: Res<WorldConfig>,
    bounds: Res<RoadBounds>,
    rules: Res<BuildingRules>,
    mut layout: ResMut<BuildingLayout>,
) {
    let mut rng = rng_from_seed(config.seed);
    *layout = BuildingLayout::generate(&bounds, &rules, &mut rng);
    info!("Planned {} buildings along the road", layout.lots.len());
}
