//! Pedestrian meshes mirroring the pedestrian pool.

use std::collections::HashSet;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use super::matte;
use crate::simulation::pedestrians::{PedestrianId, PedestrianPool};
use crate::world::{rng_from_seed, WorldConfig};

const BODY_SIZE: Vec3 = Vec3::new(0.4, 1.7, 0.4);

/// Mesh entity standing in for one pooled pedestrian.
#[derive(Component)]
pub struct PedestrianBody(pub PedestrianId);

/// Spawn bodies for new pedestrians and despawn bodies whose pedestrian is gone.
pub(super) fn sync_pedestrian_bodies(
    mut commands: Commands,
    pool: Res<PedestrianPool>,
    config: Res<WorldConfig>,
    bodies: Query<(Entity, &PedestrianBody)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut body_mesh: Local<Option<Handle<Mesh>>>,
    mut local_rng: Local<Option<StdRng>>,
) {
    if !pool.is_changed() {
        return;
    }
    // Tints have their own generator so they never shift the spawn sequence.
    let rng = local_rng.get_or_insert_with(|| rng_from_seed(config.seed));

    let mut shown = HashSet::new();
    for (entity, PedestrianBody(id)) in &bodies {
        if pool.contains(*id) {
            shown.insert(*id);
        } else {
            commands.entity(entity).despawn_recursive();
        }
    }

    let mesh = body_mesh
        .get_or_insert_with(|| meshes.add(Cuboid::from_size(BODY_SIZE)))
        .clone();

    for pedestrian in pool.iter().filter(|p| !shown.contains(&p.id)) {
        // Random shade with no red channel.
        let color = Color::srgb_u8(0, rng.gen(), rng.gen());
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(materials.add(matte(color))),
            Transform::from_translation(pedestrian.position),
            PedestrianBody(pedestrian.id),
        ));
    }
}
