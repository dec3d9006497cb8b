//! Car/pedestrian collisions and delayed respawns.

use std::time::Duration;

use bevy::prelude::*;

use super::car::{CarState, PlayerCar};
use super::pedestrians::{Pedestrian, PedestrianId, PedestrianPool, SpawnKind, SpawnRng, SpawnRules};
use crate::game_state::HitCounter;
use crate::world::RoadBounds;

/// Tunables for hit detection.
#[derive(Resource, Debug, Clone)]
pub struct CollisionConfig {
    /// Centre-to-centre distance below which the car hits a pedestrian.
    pub hit_distance: f32,
    /// Wall-clock delay before a replacement pedestrian is attempted.
    pub respawn_delay: Duration,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            hit_distance: 1.8,
            respawn_delay: Duration::from_millis(1500),
        }
    }
}

/// Sent once for every pedestrian the car hits.
#[derive(Event, Debug, Clone)]
pub struct PedestrianHit {
    pub id: PedestrianId,
    /// Hit count after this hit.
    pub total: u64,
}

/// Remove at most one pedestrian within `hit_distance` of the car.
///
/// Newest pedestrians are checked first. Any other overlapping pedestrians
/// stay in the pool for the next call.
pub fn check_collision(
    car_position: Vec3,
    pool: &mut PedestrianPool,
    hits: &mut HitCounter,
    hit_distance: f32,
) -> Option<Pedestrian> {
    let id = pool
        .iter()
        .rev()
        .find(|p| car_position.distance(p.position) < hit_distance)
        .map(|p| p.id)?;

    let removed = pool.remove(id)?;
    hits.record_hit();
    Some(removed)
}

/// Respawns waiting for their delay to elapse.
#[derive(Resource, Default, Debug)]
pub struct RespawnQueue {
    pending: Vec<Timer>,
}

impl RespawnQueue {
    pub fn schedule(&mut self, delay: Duration) {
        self.pending.push(Timer::new(delay, TimerMode::Once));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance every timer and return how many respawns are now due.
    pub fn tick(&mut self, delta: Duration) -> usize {
        let before = self.pending.len();
        self.pending.retain_mut(|timer| !timer.tick(delta).finished());
        before - self.pending.len()
    }
}

pub(super) fn detect_collisions(
    config: Res<CollisionConfig>,
    mut pool: ResMut<PedestrianPool>,
    mut hits: ResMut<HitCounter>,
    mut queue: ResMut<RespawnQueue>,
    mut hit_events: EventWriter<PedestrianHit>,
    cars: Query<&CarState, With<PlayerCar>>,
) {
    let Ok(car) = cars.get_single() else {
        return;
    };
    if pool.is_empty() {
        return;
    }

    // Only touch the resources mutably on an actual hit.
    if !pool
        .iter()
        .any(|p| car.position.distance(p.position) < config.hit_distance)
    {
        return;
    }

    if let Some(hit) = check_collision(car.position, &mut pool, &mut hits, config.hit_distance) {
        queue.schedule(config.respawn_delay);
        debug!("{} respawns pending", queue.len());
        hit_events.send(PedestrianHit {
            id: hit.id,
            total: hits.get(),
        });
    }
}

pub(super) fn log_hits(mut hit_events: EventReader<PedestrianHit>) {
    for hit in hit_events.read() {
        info!("Hit pedestrian {:?} (total {})", hit.id, hit.total);
    }
}

/// Run due respawns. Ticks on real time so the delay is independent of frame rate.
pub(super) fn run_respawns(
    time: Res<Time<Real>>,
    rules: Res<SpawnRules>,
    bounds: Res<RoadBounds>,
    mut queue: ResMut<RespawnQueue>,
    mut pool: ResMut<PedestrianPool>,
    mut rng: ResMut<SpawnRng>,
    cars: Query<&CarState, With<PlayerCar>>,
) {
    if queue.is_empty() {
        return;
    }
    let due = queue.tick(time.delta());
    if due == 0 {
        return;
    }
    let Ok(car) = cars.get_single() else {
        return;
    };

    for _ in 0..due {
        if pool.spawn(car, SpawnKind::Refill, &rules, &bounds, &mut rng.0).is_none() {
            debug!("Respawn skipped (pool full or spot taken)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::car::{advance, CarTuning, DriveInput};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn overlapping_pedestrians_are_hit_one_per_tick() {
        let rules = SpawnRules {
            min_separation: 0.0,
            ..default()
        };
        let mut pool = PedestrianPool::default();
        let mut hits = HitCounter::default();
        let car = Vec3::new(0.0, 0.3, 0.0);
        for offset in [-0.5, 0.0, 0.5] {
            pool.try_insert(Vec3::new(offset, 0.85, 0.5), &rules);
        }
        let untouched = pool.try_insert(Vec3::new(0.0, 0.85, -30.0), &rules);

        assert!(check_collision(car, &mut pool, &mut hits, 1.8).is_some());
        assert_eq!(hits.get(), 1);
        assert_eq!(pool.len(), 3);

        assert!(check_collision(car, &mut pool, &mut hits, 1.8).is_some());
        assert!(check_collision(car, &mut pool, &mut hits, 1.8).is_some());
        assert!(check_collision(car, &mut pool, &mut hits, 1.8).is_none());
        assert_eq!(hits.get(), 3);
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(untouched.unwrap()));
    }

    #[test]
    fn newest_overlapping_pedestrian_goes_first() {
        let rules = SpawnRules::default();
        let mut pool = PedestrianPool::default();
        let mut hits = HitCounter::default();
        let older = pool.try_insert(Vec3::new(-1.6, 0.3, 0.0), &rules).unwrap();
        let newer = pool.try_insert(Vec3::new(1.6, 0.3, 0.0), &rules).unwrap();

        let first = check_collision(Vec3::new(0.0, 0.3, 0.0), &mut pool, &mut hits, 1.8);
        assert_eq!(first.map(|p| p.id), Some(newer));
        assert!(pool.contains(older));
    }

    #[test]
    fn driving_into_a_pedestrian_scores_once_and_schedules_a_respawn() {
        let tuning = CarTuning::default();
        let bounds = RoadBounds::default();
        let config = CollisionConfig::default();
        let rules = SpawnRules::default();

        let mut car = CarState::parked_at(Vec3::new(0.0, tuning.ride_height, 0.0));
        let mut pool = PedestrianPool::default();
        let mut hits = HitCounter::default();
        let mut queue = RespawnQueue::default();
        pool.try_insert(Vec3::new(0.0, rules.half_height, -25.0), &rules);

        let throttle = DriveInput {
            forward: true,
            ..default()
        };
        let mut events = 0;
        for _ in 0..300 {
            advance(&mut car, &throttle, &tuning, &bounds);
            if check_collision(car.position, &mut pool, &mut hits, config.hit_distance).is_some() {
                queue.schedule(config.respawn_delay);
                events += 1;
            }
        }

        assert_eq!(events, 1);
        assert_eq!(hits.get(), 1);
        assert!(pool.is_empty());
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.tick(Duration::from_millis(1499)), 0);
        assert_eq!(queue.tick(Duration::from_millis(1)), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn respawn_queue_fires_each_entry_once() {
        let mut queue = RespawnQueue::default();
        queue.schedule(Duration::from_millis(1500));
        assert_eq!(queue.tick(Duration::from_millis(500)), 0);
        queue.schedule(Duration::from_millis(1500));
        assert_eq!(queue.tick(Duration::from_millis(1000)), 1);
        assert_eq!(queue.tick(Duration::from_millis(1000)), 1);
        assert_eq!(queue.tick(Duration::from_secs(10)), 0);
    }

    fn respawn_app(with_car: bool) -> App {
        let mut app = App::new();
        app.insert_resource(Time::<Real>::default())
            .insert_resource(SpawnRules::default())
            .insert_resource(RoadBounds::default())
            .insert_resource(SpawnRng(StdRng::seed_from_u64(3)))
            .init_resource::<PedestrianPool>()
            .init_resource::<RespawnQueue>()
            .add_systems(Update, run_respawns);
        if with_car {
            app.world_mut()
                .spawn((CarState::parked_at(Vec3::new(0.0, 0.3, 0.0)), PlayerCar));
        }
        app
    }

    #[test]
    fn due_respawn_places_a_pedestrian() {
        let mut app = respawn_app(true);
        app.world_mut()
            .resource_mut::<RespawnQueue>()
            .schedule(Duration::ZERO);
        app.update();

        assert_eq!(app.world().resource::<PedestrianPool>().len(), 1);
        assert!(app.world().resource::<RespawnQueue>().is_empty());
    }

    #[test]
    fn due_respawn_without_a_car_is_dropped() {
        let mut app = respawn_app(false);
        app.world_mut()
            .resource_mut::<RespawnQueue>()
            .schedule(Duration::ZERO);
        app.update();

        assert!(app.world().resource::<PedestrianPool>().is_empty());
        assert!(app.world().resource::<RespawnQueue>().is_empty());
    }

    #[test]
    fn respawn_waits_for_the_full_delay_in_real_time() {
        let mut app = respawn_app(true);
        let delay = CollisionConfig::default().respawn_delay;
        app.world_mut().resource_mut::<RespawnQueue>().schedule(delay);

        app.world_mut()
            .resource_mut::<Time<Real>>()
            .advance_by(Duration::from_millis(1499));
        app.update();
        assert!(app.world().resource::<PedestrianPool>().is_empty());
        assert_eq!(app.world().resource::<RespawnQueue>().len(), 1);

        app.world_mut()
            .resource_mut::<Time<Real>>()
            .advance_by(Duration::from_millis(1));
        app.update();
        assert_eq!(app.world().resource::<PedestrianPool>().len(), 1);
        assert!(app.world().resource::<RespawnQueue>().is_empty());
    }

    #[test]
    fn due_respawn_into_full_pool_is_a_no_op() {
        let rules = SpawnRules {
            max_pedestrians: 1,
            ..default()
        };
        let bounds = RoadBounds::default();
        let car = CarState::parked_at(Vec3::ZERO);
        let mut pool = PedestrianPool::default();
        pool.try_insert(Vec3::new(0.0, 0.85, -100.0), &rules);

        let mut rng = StdRng::seed_from_u64(1);
        let spawned = pool.spawn(&car, SpawnKind::Refill, &rules, &bounds, &mut rng);
        assert!(spawned.is_none());
        assert_eq!(pool.len(), 1);
    }
}
