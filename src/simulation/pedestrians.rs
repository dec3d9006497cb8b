//! Pedestrian pool.
//!
//! Pedestrians stand still on the road ahead of the car until they are hit.
//! The pool is bounded and keeps insertion order so collision checks are
//! reproducible. Spawn attempts that land too close to an existing
//! pedestrian are dropped; periodic refill attempts top the pool back up.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use super::car::{CarState, PlayerCar};
use crate::world::{rng_from_seed, RoadBounds};

/// Rules for where and how many pedestrians appear.
#[derive(Resource, Debug, Clone)]
pub struct SpawnRules {
    pub max_pedestrians: usize,
    /// Minimum distance to any live pedestrian for a spawn to succeed.
    pub min_separation: f32,
    /// Distance ahead of the car for refill spawns.
    pub refill_distance: (f32, f32),
    /// Distance from the anchor for the startup batch.
    pub initial_distance: (f32, f32),
    /// Fraction of the road width pedestrians may stand across.
    pub lateral_fraction: f32,
    /// Probability an initial spawn scatters around the origin instead of the car.
    pub scatter_chance: f64,
    /// Pedestrian centre height (half their body height).
    pub half_height: f32,
    /// Chance per frame of an extra refill attempt while under capacity.
    pub refill_chance: f64,
    /// Seed for spawn randomness. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            max_pedestrians: 8,
            min_separation: 3.0,
            refill_distance: (20.0, 50.0),
            initial_distance: (10.0, 110.0),
            lateral_fraction: 0.9,
            scatter_chance: 0.5,
            half_height: 0.85,
            refill_chance: 0.1,
            seed: None,
        }
    }
}

/// Opaque pedestrian identity, unique for the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PedestrianId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Pedestrian {
    pub id: PedestrianId,
    pub position: Vec3,
}

/// Whether a spawn is part of the startup batch or a later top-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    Initial,
    Refill,
}

/// The live pedestrians, in insertion order.
#[derive(Resource, Default, Debug)]
pub struct PedestrianPool {
    live: Vec<Pedestrian>,
    next_id: u64,
}

impl PedestrianPool {
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Pedestrian> {
        self.live.iter()
    }

    pub fn contains(&self, id: PedestrianId) -> bool {
        self.live.iter().any(|p| p.id == id)
    }

    pub fn remove(&mut self, id: PedestrianId) -> Option<Pedestrian> {
        let index = self.live.iter().position(|p| p.id == id)?;
        Some(self.live.remove(index))
    }

    /// Place a pedestrian if the spot is far enough from everyone else.
    ///
    /// Does nothing when the pool is full or the spot is too crowded.
    pub fn try_insert(&mut self, position: Vec3, rules: &SpawnRules) -> Option<PedestrianId> {
        if self.live.len() >= rules.max_pedestrians {
            return None;
        }
        if self
            .live
            .iter()
            .any(|p| p.position.distance(position) < rules.min_separation)
        {
            return None;
        }

        let id = PedestrianId(self.next_id);
        self.next_id += 1;
        self.live.push(Pedestrian { id, position });
        Some(id)
    }

    /// Pick a candidate spot relative to the car and try to place a pedestrian there.
    pub fn spawn(
        &mut self,
        car: &CarState,
        kind: SpawnKind,
        rules: &SpawnRules,
        bounds: &RoadBounds,
        rng: &mut impl Rng,
    ) -> Option<PedestrianId> {
        if self.live.len() >= rules.max_pedestrians {
            return None;
        }
        let candidate = spawn_candidate(car, kind, rules, bounds, rng);
        self.try_insert(candidate, rules)
    }
}

/// Where a new pedestrian would stand.
pub fn spawn_candidate(
    car: &CarState,
    kind: SpawnKind,
    rules: &SpawnRules,
    bounds: &RoadBounds,
    rng: &mut impl Rng,
) -> Vec3 {
    let (near, far) = match kind {
        SpawnKind::Initial => rules.initial_distance,
        SpawnKind::Refill => rules.refill_distance,
    };
    let distance = rng.gen_range(near..far);

    let lateral_span = bounds.width() * rules.lateral_fraction;
    let lateral = (rng.gen::<f32>() - 0.5) * lateral_span;

    let (anchor, forward) = if kind == SpawnKind::Initial && rng.gen_bool(rules.scatter_chance) {
        let direction = Vec3::new(rng.gen::<f32>() - 0.5, 0.0, rng.gen::<f32>() - 0.5);
        (Vec3::ZERO, direction.try_normalize().unwrap_or(Vec3::NEG_Z))
    } else {
        (car.position, car.forward())
    };

    let mut candidate = anchor + forward * distance;
    candidate.x = lateral;
    candidate.y = rules.half_height;
    candidate
}

/// Shared randomness for every spawn path.
#[derive(Resource)]
pub struct SpawnRng(pub StdRng);

impl FromWorld for SpawnRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.get_resource::<SpawnRules>().and_then(|rules| rules.seed);
        Self(rng_from_seed(seed))
    }
}

/// Fill the pool around the car's starting position.
pub(super) fn spawn_initial_pedestrians(
    rules: Res<SpawnRules>,
    bounds: Res<RoadBounds>,
    mut pool: ResMut<PedestrianPool>,
    mut rng: ResMut<SpawnRng>,
    cars: Query<&CarState, With<PlayerCar>>,
) {
    let Ok(car) = cars.get_single() else {
        warn!("No car in the scene; skipping initial pedestrians");
        return;
    };

    for _ in 0..rules.max_pedestrians {
        pool.spawn(car, SpawnKind::Initial, &rules, &bounds, &mut rng.0);
    }
    info!(
        "Spawned {} of {} initial pedestrians",
        pool.len(),
        rules.max_pedestrians
    );
}

/// Occasional top-up so rejected spawns are eventually retried.
pub(super) fn refill_pedestrians(
    rules: Res<SpawnRules>,
    bounds: Res<RoadBounds>,
    mut pool: ResMut<PedestrianPool>,
    mut rng: ResMut<SpawnRng>,
    cars: Query<&CarState, With<PlayerCar>>,
) {
    if pool.len() >= rules.max_pedestrians || !rng.0.gen_bool(rules.refill_chance) {
        return;
    }
    let Ok(car) = cars.get_single() else {
        return;
    };
    if let Some(id) = pool.spawn(car, SpawnKind::Refill, &rules, &bounds, &mut rng.0) {
        debug!("Refilled pedestrian {:?}", id);
    }
}
