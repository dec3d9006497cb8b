//! Player car kinematics.
//!
//! Speed is a per-frame displacement, not a velocity: every constant here is
//! applied once per `Update` pass, the same way the rest of the driving loop
//! works. Turning only happens while the car is moving.

use bevy::prelude::*;

use crate::world::RoadBounds;

/// Tuning constants for the car controller.
#[derive(Resource, Debug, Clone)]
pub struct CarTuning {
    /// Top forward speed, in units per frame.
    pub max_speed: f32,
    /// Speed gained per frame while accelerating.
    pub acceleration: f32,
    /// Braking/reversing is this many times faster than accelerating.
    pub reverse_factor: f32,
    /// Base yaw change per frame, scaled by current speed.
    pub rotation_speed: f32,
    /// Multiplier applied each coasting frame.
    pub drag: f32,
    /// Below this absolute speed the car counts as stopped.
    pub stop_threshold: f32,
    /// Height of the car body's centre above the road.
    pub ride_height: f32,
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            max_speed: 0.4,
            acceleration: 0.015,
            reverse_factor: 1.5,
            rotation_speed: 0.025,
            drag: 0.97,
            stop_threshold: 0.01,
            ride_height: 0.3,
        }
    }
}

impl CarTuning {
    /// Slowest (most negative) speed the car can reach.
    pub fn min_speed(&self) -> f32 {
        -self.max_speed / 2.0
    }
}

/// Directional flags held by the player this frame.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl DriveInput {
    /// Read the drive keys: WASD or arrow keys.
    pub fn from_keys(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            forward: keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
            backward: keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]),
            turn_left: keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
            turn_right: keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
        }
    }
}

/// Kinematic state of the player's car.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CarState {
    pub position: Vec3,
    /// Yaw in radians. Zero faces -Z; positive turns left.
    pub heading: f32,
    /// Signed per-frame displacement along the heading.
    pub speed: f32,
}

impl CarState {
    pub fn parked_at(position: Vec3) -> Self {
        Self {
            position,
            heading: 0.0,
            speed: 0.0,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading)
    }

    /// Unit vector the car drives along when speed is positive.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation())
    }
}

/// Integrate one frame of input into the car state.
pub fn advance(state: &mut CarState, input: &DriveInput, tuning: &CarTuning, bounds: &RoadBounds) {
    // Turn rate is sampled from the speed the car entered the frame with.
    let turn_rate = tuning.rotation_speed * (state.speed.abs() / tuning.max_speed + 0.3);

    if input.forward {
        state.speed = (state.speed + tuning.acceleration).min(tuning.max_speed);
    } else if input.backward {
        state.speed = (state.speed - tuning.acceleration * tuning.reverse_factor)
            .max(tuning.min_speed());
    } else if state.speed.abs() > tuning.stop_threshold {
        state.speed *= tuning.drag;
    } else {
        state.speed = 0.0;
    }

    if state.speed.abs() > tuning.stop_threshold {
        // Both may be held; they are applied independently.
        if input.turn_left {
            state.heading += turn_rate;
        }
        if input.turn_right {
            state.heading -= turn_rate;
        }
    }

    state.position += state.forward() * state.speed;
    state.position = bounds.clamp(state.position);
}

/// Marker for the player's car root entity.
#[derive(Component)]
pub struct PlayerCar;

pub(super) fn read_drive_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<DriveInput>) {
    let next = DriveInput::from_keys(&keys);
    if *input != next {
        *input = next;
    }
}

pub(super) fn drive_car(
    input: Res<DriveInput>,
    tuning: Res<CarTuning>,
    bounds: Res<RoadBounds>,
    mut cars: Query<&mut CarState, With<PlayerCar>>,
) {
    for mut car in &mut cars {
        advance(&mut car, &input, &tuning, &bounds);
    }
}

pub(super) fn sync_car_transform(
    mut cars: Query<(&CarState, &mut Transform), (With<PlayerCar>, Changed<CarState>)>,
) {
    for (car, mut transform) in &mut cars {
        transform.translation = car.position;
        transform.rotation = car.rotation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CarState, CarTuning, RoadBounds) {
        let tuning = CarTuning::default();
        let car = CarState::parked_at(Vec3::new(0.0, tuning.ride_height, 0.0));
        (car, tuning, RoadBounds::default())
    }

    fn hold(forward: bool, backward: bool, left: bool, right: bool) -> DriveInput {
        DriveInput {
            forward,
            backward,
            turn_left: left,
            turn_right: right,
        }
    }

    #[test]
    fn speed_stays_within_limits_for_any_input() {
        let (mut car, tuning, bounds) = setup();
        let patterns = [
            hold(true, false, true, false),
            hold(false, true, false, true),
            hold(true, true, true, true),
            hold(false, false, false, false),
        ];
        for tick in 0..2000 {
            let input = patterns[(tick / 37) % patterns.len()];
            advance(&mut car, &input, &tuning, &bounds);
            assert!(car.speed <= tuning.max_speed + 1e-6);
            assert!(car.speed >= tuning.min_speed() - 1e-6);
            assert!(car.position.x.abs() <= bounds.half_width);
            assert!(car.position.z.abs() <= bounds.half_length);
        }
    }

    #[test]
    fn forward_wins_over_backward() {
        let (mut car, tuning, bounds) = setup();
        advance(&mut car, &hold(true, true, false, false), &tuning, &bounds);
        assert!((car.speed - tuning.acceleration).abs() < 1e-6);
    }

    #[test]
    fn reverse_is_faster_and_capped_at_half_max() {
        let (mut car, tuning, bounds) = setup();
        advance(&mut car, &hold(false, true, false, false), &tuning, &bounds);
        assert!((car.speed + tuning.acceleration * 1.5).abs() < 1e-6);
        for _ in 0..100 {
            advance(&mut car, &hold(false, true, false, false), &tuning, &bounds);
        }
        assert_eq!(car.speed, -0.2);
        // Reversing moves the car towards +Z.
        assert!(car.position.z > 0.0);
    }

    #[test]
    fn accelerate_then_coast_to_exact_stop() {
        let (mut car, tuning, bounds) = setup();
        for _ in 0..30 {
            advance(&mut car, &hold(true, false, false, false), &tuning, &bounds);
        }
        assert_eq!(car.speed, tuning.max_speed);
        assert!(car.position.z < 0.0);

        let mut ticks = 0;
        while car.speed != 0.0 {
            advance(&mut car, &DriveInput::default(), &tuning, &bounds);
            ticks += 1;
            assert!(ticks < 1000, "car never stopped");
        }
        assert_eq!(car.speed, 0.0);
        let resting = car.position;
        advance(&mut car, &DriveInput::default(), &tuning, &bounds);
        assert_eq!(car.position, resting);
    }

    #[test]
    fn steering_does_nothing_while_stopped() {
        let (mut car, tuning, bounds) = setup();
        for _ in 0..10 {
            advance(&mut car, &hold(false, false, true, false), &tuning, &bounds);
        }
        assert_eq!(car.heading, 0.0);

        car.speed = tuning.stop_threshold;
        advance(&mut car, &hold(false, false, false, true), &tuning, &bounds);
        assert_eq!(car.heading, 0.0);
    }

    #[test]
    fn turn_rate_scales_with_entry_speed() {
        let (mut car, tuning, bounds) = setup();
        car.speed = tuning.max_speed;
        advance(&mut car, &hold(true, false, true, false), &tuning, &bounds);
        let expected = tuning.rotation_speed * 1.3;
        assert!((car.heading - expected).abs() < 1e-6);

        let (mut slow, _, _) = setup();
        slow.speed = 0.1;
        advance(&mut slow, &hold(false, false, false, true), &tuning, &bounds);
        let expected = -tuning.rotation_speed * (0.1 / 0.4 + 0.3);
        assert!((slow.heading - expected).abs() < 1e-6);
    }

    #[test]
    fn both_turn_keys_cancel_out() {
        let (mut car, tuning, bounds) = setup();
        car.speed = 0.2;
        advance(&mut car, &hold(true, false, true, true), &tuning, &bounds);
        assert!(car.heading.abs() < 1e-6);
    }

    #[test]
    fn pinned_at_right_edge_still_drives_along_the_road() {
        let (mut car, tuning, bounds) = setup();
        car.position.x = bounds.half_width;
        car.heading = -std::f32::consts::FRAC_PI_4;
        car.speed = 0.3;
        let start_z = car.position.z;
        for _ in 0..60 {
            advance(&mut car, &hold(true, false, true, false), &tuning, &bounds);
            assert!(car.position.x <= bounds.half_width);
        }
        assert!(car.position.z != start_z);
    }

    #[test]
    fn end_of_road_clamps_z() {
        let (mut car, tuning, bounds) = setup();
        car.position.z = -189.9;
        car.speed = tuning.max_speed;
        advance(&mut car, &hold(true, false, false, false), &tuning, &bounds);
        assert_eq!(car.position.z, -bounds.half_length);
    }

    #[test]
    fn heading_zero_faces_negative_z() {
        let (car, _, _) = setup();
        assert!((car.forward() - Vec3::NEG_Z).length() < 1e-6);
        let mut left = car;
        left.heading = std::f32::consts::FRAC_PI_2;
        assert!((left.forward() - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn keys_map_to_drive_flags() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ArrowUp);
        keys.press(KeyCode::KeyD);
        let input = DriveInput::from_keys(&keys);
        assert_eq!(input, hold(true, false, false, true));

        keys.release_all();
        keys.press(KeyCode::KeyS);
        keys.press(KeyCode::ArrowLeft);
        assert_eq!(DriveInput::from_keys(&keys), hold(false, true, true, false));
    }
}
