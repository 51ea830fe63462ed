//! Per-frame animation state.
//!
//! Everything here is plain data plus pure update functions so a frame can be
//! stepped deterministically without a renderer:
//!
//! - wheel impulses feed an [`AngularState`] whose speed decays every tick,
//! - the accumulated rotation places four objects on an [`Orbit`],
//! - elapsed time drives each object's self-spin,
//! - the normalized [`CursorState`] sets a small camera offset.

use nalgebra::{Point3, Vector2};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::transform::RotationState;

/// Phase offsets of the four orbiting objects, a quarter turn apart.
pub const PHASES: [f32; 4] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];

/// Accumulated orbit angle and its decaying angular velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularState {
    /// Radians, unbounded
    pub rotation: f32,
    /// Radians per tick
    pub speed: f32,
}

impl AngularState {
    /// Apply a scroll impulse of `delta` scaled by `gain`.
    pub fn impulse(&mut self, delta: f32, gain: f32) {
        self.speed += delta * gain;
    }

    /// Advance one animation tick: move by the current speed, then damp it.
    pub fn tick(&mut self, decay: f32) {
        self.rotation += self.speed;
        self.speed *= decay;
    }
}

/// Pointer position normalized to roughly [-0.5, 0.5] on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    pub x: f32,
    pub y: f32,
}

impl CursorState {
    pub fn from_pointer(client_x: f32, client_y: f32, width: u32, height: u32) -> Self {
        Self {
            x: client_x / width.max(1) as f32 - 0.5,
            y: client_y / height.max(1) as f32 - 0.5,
        }
    }
}

/// Circle in the XZ plane shared by the orbiting objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Orbit {
    pub fn position(&self, angle: f32) -> Point3<f32> {
        let (sin, cos) = angle.sin_cos();
        Point3::new(
            self.center.x + self.radius * cos,
            self.center.y,
            self.center.z + self.radius * sin,
        )
    }

    /// Positions of all four objects for a shared `rotation`.
    pub fn positions(&self, rotation: f32) -> [Point3<f32>; 4] {
        PHASES.map(|phase| self.position(rotation + phase))
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            center: Point3::new(2.0, 0.0, -3.0),
            radius: 3.8,
        }
    }
}

/// Self-rotation rates in radians per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRates {
    pub x: f32,
    pub y: f32,
}

impl SpinRates {
    pub fn delta(&self, dt: f32) -> RotationState {
        RotationState::new(self.x * dt, self.y * dt, 0.0)
    }
}

impl Default for SpinRates {
    fn default() -> Self {
        Self { x: 0.1, y: 0.12 }
    }
}

/// Tunables for [`advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub wheel_gain: f32,
    pub decay: f32,
    pub orbit: Orbit,
    pub spin: SpinRates,
    pub cursor_gain: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            wheel_gain: 0.0002,
            decay: 0.93,
            orbit: Orbit::default(),
            spin: SpinRates::default(),
            cursor_gain: 3.0,
        }
    }
}

/// Mutable animation state carried between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    pub angular: AngularState,
    pub cursor: CursorState,
}

/// Everything a frame needs to apply to the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub positions: [Point3<f32>; 4],
    /// Self-rotation to add to every object this frame
    pub spin: RotationState,
    /// Camera x/y for this frame; replaces, not accumulates
    pub camera_offset: Vector2<f32>,
}

/// Step the animation by one tick that took `dt` seconds.
pub fn advance(state: &mut AnimationState, motion: &Motion, dt: f32) -> FrameUpdate {
    let dt = frame_seconds(dt);

    state.angular.tick(motion.decay);

    FrameUpdate {
        positions: motion.orbit.positions(state.angular.rotation),
        spin: motion.spin.delta(dt),
        camera_offset: Vector2::new(
            state.cursor.x * dt * motion.cursor_gain,
            -state.cursor.y * dt * motion.cursor_gain,
        ),
    }
}

fn frame_seconds(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

/// Measures time between frames. The first call reports zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, given the current time in seconds.
    pub fn delta(&mut self, now: f64) -> f32 {
        let elapsed = match self.last {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now);
        elapsed as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_impulses_sum_before_decay() {
        let motion = Motion::default();
        let mut angular = AngularState::default();
        let deltas = [100.0, -40.0, 3.5, 250.0];
        for d in deltas {
            angular.impulse(d, motion.wheel_gain);
        }
        let expected: f32 = deltas.iter().map(|d| d * motion.wheel_gain).sum();
        assert!((angular.speed - expected).abs() < EPSILON);
        assert_eq!(angular.rotation, 0.0);
    }

    #[test]
    fn test_speed_decays_geometrically() {
        let motion = Motion::default();
        let mut state = AnimationState::default();
        state.angular.speed = 0.5;

        for m in 1..=40 {
            advance(&mut state, &motion, 0.016);
            let expected = 0.5 * motion.decay.powi(m);
            assert!((state.angular.speed - expected).abs() < EPSILON);
        }

        for _ in 0..400 {
            advance(&mut state, &motion, 0.016);
        }
        assert!(state.angular.speed.abs() < 1e-9);
    }

    #[test]
    fn test_speed_magnitude_never_grows_without_input() {
        let motion = Motion::default();
        let mut state = AnimationState::default();
        state.angular.speed = -0.3;
        let mut previous = state.angular.speed.abs();
        for _ in 0..100 {
            advance(&mut state, &motion, 0.016);
            assert!(state.angular.speed.abs() <= previous);
            previous = state.angular.speed.abs();
        }
    }

    #[test]
    fn test_rotation_accumulates_speed_before_decay() {
        let motion = Motion::default();
        let mut state = AnimationState::default();
        state.angular.speed = 0.2;
        advance(&mut state, &motion, 0.0);
        assert!((state.angular.rotation - 0.2).abs() < EPSILON);
        advance(&mut state, &motion, 0.0);
        assert!((state.angular.rotation - (0.2 + 0.2 * motion.decay)).abs() < EPSILON);
    }

    #[test]
    fn test_positions_stay_on_circle() {
        let orbit = Orbit::default();
        for step in -50..50 {
            let rotation = step as f32 * 0.37;
            for position in orbit.positions(rotation) {
                let offset = position - orbit.center;
                assert!((offset.norm() - orbit.radius).abs() < 1e-4);
                assert_eq!(position.y, orbit.center.y);
            }
        }
    }

    #[test]
    fn test_phases_are_quarter_turns_apart() {
        let orbit = Orbit::default();
        let [a, b, c, d] = orbit.positions(0.0);
        assert!((a - Point3::new(5.8, 0.0, -3.0)).norm() < EPSILON);
        assert!((b - Point3::new(2.0, 0.0, 0.8)).norm() < EPSILON);
        assert!((c - Point3::new(-1.8, 0.0, -3.0)).norm() < EPSILON);
        assert!((d - Point3::new(2.0, 0.0, -6.8)).norm() < EPSILON);

        // Neighbours are orthogonal as seen from the centre
        let positions = [a, b, c, d];
        for i in 0..4 {
            let u = positions[i] - orbit.center;
            let v = positions[(i + 1) % 4] - orbit.center;
            assert!(u.dot(&v).abs() < 1e-4);
        }
    }

    #[test]
    fn test_zero_dt_is_a_no_op_spin() {
        let motion = Motion::default();
        let mut state = AnimationState {
            cursor: CursorState { x: 0.4, y: -0.2 },
            ..Default::default()
        };
        let update = advance(&mut state, &motion, 0.0);
        assert_eq!(update.spin, RotationState::zero());
        assert_eq!(update.camera_offset, Vector2::zeros());
    }

    #[test]
    fn test_non_finite_dt_is_treated_as_zero() {
        let motion = Motion::default();
        let mut state = AnimationState::default();
        for dt in [f32::NAN, f32::INFINITY, -1.0] {
            let update = advance(&mut state, &motion, dt);
            assert_eq!(update.spin, RotationState::zero());
            assert!(update.camera_offset.x.is_finite());
        }
    }

    #[test]
    fn test_spin_scales_with_elapsed_time() {
        let motion = Motion::default();
        let mut state = AnimationState::default();
        let update = advance(&mut state, &motion, 0.5);
        assert!((update.spin.x - 0.05).abs() < EPSILON);
        assert!((update.spin.y - 0.06).abs() < EPSILON);
        assert_eq!(update.spin.z, 0.0);
    }

    #[test]
    fn test_camera_offset_follows_cursor() {
        let motion = Motion::default();
        let mut state = AnimationState::default();
        state.cursor = CursorState::from_pointer(600.0, 150.0, 800, 600);
        assert!((state.cursor.x - 0.25).abs() < EPSILON);
        assert!((state.cursor.y + 0.25).abs() < EPSILON);

        let update = advance(&mut state, &motion, 0.1);
        assert!((update.camera_offset.x - 0.075).abs() < EPSILON);
        assert!((update.camera_offset.y - 0.075).abs() < EPSILON);
    }

    #[test]
    fn test_frame_clock_first_delta_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(12.0), 0.0);
        assert!((clock.delta(12.25) - 0.25).abs() < EPSILON);
        // Clocks that step backwards never produce negative time
        assert_eq!(clock.delta(11.0), 0.0);
    }
}
