//! Building strip generation.
//!
//! Buildings are placed in pairs, one on each side of the road, stepping
//! down the road with a randomised gap.

use bevy::prelude::*;
use rand::Rng;

use super::RoadBounds;

/// Which side of the road a building stands on. Each side has its own facade.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoadSide {
    Left,
    Right,
}

/// Tunables for the building strip.
#[derive(Resource)]
pub struct BuildingRules {
    /// Minimum z spacing between consecutive pairs.
    pub spacing: f32,
    /// Extra random spacing added on top of `spacing`.
    pub spacing_jitter: f32,
    pub depth: f32,
    pub min_height: f32,
    pub height_range: f32,
    pub min_width: f32,
    pub width_range: f32,
    /// Gap between the road edge and the nearest building face.
    pub side_offset: f32,
    /// Margin kept free at each end of the road.
    pub end_margin: f32,
}

impl Default for BuildingRules {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            spacing_jitter: 5.0,
            depth: 5.0,
            min_height: 5.0,
            height_range: 15.0,
            min_width: 4.0,
            width_range: 4.0,
            side_offset: 1.0,
            end_margin: 10.0,
        }
    }
}

/// A single planned building.
#[derive(Clone, Debug)]
pub struct BuildingLot {
    pub side: RoadSide,
    /// Centre of the box; y is half the height so it sits on the ground.
    pub center: Vec3,
    pub size: Vec3,
}

/// All buildings in the scene.
#[derive(Resource, Default, Debug)]
pub struct BuildingLayout {
    pub lots: Vec<BuildingLot>,
}

impl BuildingLayout {
    pub fn generate(bounds: &RoadBounds, rules: &BuildingRules, rng: &mut impl Rng) -> Self {
        let zone = bounds.half_length - rules.end_margin;
        let mut lots = Vec::new();

        let mut z = -zone;
        while z < zone {
            let height = rules.min_height + rng.gen::<f32>() * rules.height_range;
            let width = rules.min_width + rng.gen::<f32>() * rules.width_range;
            let size = Vec3::new(width, height, rules.depth);
            let lot_z = z + rules.depth / 2.0;

            let inner = bounds.half_width + rules.side_offset + width / 2.0;
            let left_x = -(inner + rng.gen::<f32>());
            lots.push(BuildingLot {
                side: RoadSide::Left,
                center: Vec3::new(left_x, height / 2.0, lot_z),
                size,
            });

            let right_x = inner + rng.gen::<f32>();
            lots.push(BuildingLot {
                side: RoadSide::Right,
                center: Vec3::new(right_x, height / 2.0, lot_z),
                size,
            });

            z += rules.spacing + rng.gen::<f32>() * rules.spacing_jitter;
        }

        Self { lots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout(seed: u64) -> BuildingLayout {
        let mut rng = StdRng::seed_from_u64(seed);
        BuildingLayout::generate(&RoadBounds::default(), &BuildingRules::default(), &mut rng)
    }

    #[test]
    fn buildings_never_intrude_on_the_road() {
        let bounds = RoadBounds::default();
        for seed in 0..8 {
            for lot in &layout(seed).lots {
                let inner_face = lot.center.x.abs() - lot.size.x / 2.0;
                assert!(inner_face >= bounds.half_width + 1.0 - 1e-4);
                match lot.side {
                    RoadSide::Left => assert!(lot.center.x < 0.0),
                    RoadSide::Right => assert!(lot.center.x > 0.0),
                }
            }
        }
    }

    #[test]
    fn buildings_come_in_pairs_within_the_zone() {
        let layout = layout(3);
        assert!(!layout.lots.is_empty());
        assert_eq!(layout.lots.len() % 2, 0);

        // 360 units of zone at 10..15 per step.
        let pairs = layout.lots.len() / 2;
        assert!((24..=36).contains(&pairs), "got {pairs} pairs");

        for lot in &layout.lots {
            assert!(lot.center.z >= -180.0 && lot.center.z < 180.0 + 2.5);
            assert!(lot.size.y >= 5.0 && lot.size.y < 20.0);
            assert!((lot.center.y - lot.size.y / 2.0).abs() < 1e-5);
        }
    }
}
