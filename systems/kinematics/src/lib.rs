#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Kinematic body integration for player-controlled entities.
//!
//! A [`Body`] is a plain record of position, velocity and life state. Every
//! integration primitive receives the elapsed frame time and mutates the body
//! in place; none of them consult the terrain. Terrain is applied afterwards,
//! once per frame, by [`Body::clamp_to_bounds`] using a fresh collision probe.

use std::time::Duration;

use superfco_core::{CollisionModel, DeathCause, Pose, Position, Tuning, Velocity};

/// Horizontal distance a wall-clamped body is pushed off the wall while
/// descending fast, so it keeps falling past the wall's edge. Tunable.
pub const WALL_NUDGE: f32 = 0.01;

/// Multiple of the jump impulse a landing speed must exceed to be fatal.
/// Tunable; not physically derived.
pub const FALL_DEATH_FACTOR: f32 = 2.0;

/// Physics state owned by a single entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Current position in tile units.
    pub position: Position,
    /// Current speed in tiles per second.
    pub velocity: Velocity,
    is_dead: bool,
    has_oxygen: bool,
}

impl Body {
    /// Creates a resting, living body without oxygen at `position`.
    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self {
            position,
            velocity: Velocity {
                hspeed: 0.0,
                vspeed: 0.0,
            },
            is_dead: false,
            has_oxygen: false,
        }
    }

    /// Whether the body has died.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Whether the body carries an oxygen tank.
    #[must_use]
    pub const fn has_oxygen(&self) -> bool {
        self.has_oxygen
    }

    /// Equips the body with an oxygen tank, allowing it to dive safely.
    pub fn grant_oxygen(&mut self) {
        self.has_oxygen = true;
    }

    /// Visual state the body should be drawn with.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        if self.is_dead {
            Pose::Dead
        } else {
            Pose::Normal
        }
    }

    /// Kills the body. Returns the cause only on the living-to-dead transition.
    #[must_use]
    pub fn die(&mut self, cause: DeathCause) -> Option<DeathCause> {
        if self.is_dead {
            return None;
        }
        self.is_dead = true;
        Some(cause)
    }

    /// Zeroes both speed components.
    pub fn halt(&mut self) {
        self.velocity = Velocity::default();
    }

    /// Walks sideways; `direction` is a signed fraction of the walking speed.
    pub fn move_lateral(&mut self, tuning: &Tuning, direction: f32, dt: Duration) {
        self.position.x += direction * tuning.hmaxspeed * seconds(dt);
    }

    /// Climbs (negative `direction`) or crouches (positive `direction`).
    pub fn move_vertical(&mut self, tuning: &Tuning, direction: f32, dt: Duration) {
        self.position.y += direction * tuning.vmaxspeed * seconds(dt);
    }

    /// Applies the jump impulse and integrates one frame of it.
    pub fn jump(&mut self, tuning: &Tuning, dt: Duration) {
        self.velocity.vspeed = tuning.v_jump;
        self.position.y += self.velocity.vspeed * seconds(dt);
    }

    /// Jumps with a fixed horizontal launch speed slightly under walking speed.
    pub fn jump_lateral(&mut self, tuning: &Tuning, direction: f32, dt: Duration) {
        self.jump(tuning, dt);
        self.velocity.hspeed = direction * tuning.hmaxspeed / tuning.lateral_jump_divisor;
        self.position.x += self.velocity.hspeed * seconds(dt);
    }

    /// Integrates gravity; horizontal speed from a prior jump carries over.
    pub fn fall(&mut self, tuning: &Tuning, dt: Duration) {
        self.velocity.vspeed += millis(dt) * tuning.v_acceleration;
        self.position.y += self.velocity.vspeed * seconds(dt);
        self.position.x += self.velocity.hspeed * seconds(dt);
    }

    /// Applies water drag to both speed components and drowns a body
    /// without oxygen, regardless of the elapsed time.
    #[must_use]
    pub fn dive(&mut self, tuning: &Tuning, dt: Duration) -> Option<DeathCause> {
        let damping = (1.0 - tuning.water_drag) * (1.0 - seconds(dt));
        self.velocity.vspeed *= damping;
        self.velocity.hspeed *= damping;

        if self.has_oxygen {
            None
        } else {
            self.die(DeathCause::Drowned)
        }
    }

    /// Clamps the position into the probed boundaries, zeroing the speed
    /// component of every axis that hit a boundary.
    ///
    /// Landing faster than [`FALL_DEATH_FACTOR`] times the jump impulse kills
    /// the body; the returned cause reports that transition.
    #[must_use]
    pub fn clamp_to_bounds(
        &mut self,
        tuning: &Tuning,
        model: &CollisionModel,
    ) -> Option<DeathCause> {
        let slide_speed = -tuning.v_jump / 2.0;
        let fatal_speed = -tuning.v_jump * FALL_DEATH_FACTOR;
        let mut death = None;

        if self.position.x < model.left {
            self.position.x = model.left;
            self.velocity.hspeed = 0.0;
            if self.velocity.vspeed > slide_speed {
                self.position.x += WALL_NUDGE;
            }
        }
        if self.position.x > model.right {
            self.position.x = model.right;
            self.velocity.hspeed = 0.0;
            if self.velocity.vspeed > slide_speed {
                self.position.x -= WALL_NUDGE;
            }
        }

        if self.position.y < model.top {
            self.position.y = model.top;
            self.velocity.vspeed = 0.0;
        }
        if self.position.y > model.bottom {
            if self.velocity.vspeed > fatal_speed {
                death = self.die(DeathCause::FallImpact);
            }
            self.position.y = model.bottom;
            self.velocity.vspeed = 0.0;
        }

        death
    }
}

fn seconds(dt: Duration) -> f32 {
    dt.as_secs_f32()
}

fn millis(dt: Duration) -> f32 {
    dt.as_secs_f32() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn model() -> CollisionModel {
        CollisionModel {
            top: 0.0,
            bottom: 10.0,
            left: 0.0,
            right: 20.0,
            is_map_border: false,
            is_terrain_corner: false,
            is_water: false,
        }
    }

    fn approx(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn lateral_move_scales_with_direction_and_time() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(5.0, 5.0));

        body.move_lateral(&tuning, 1.0, Duration::from_millis(100));
        approx(body.position.x, 6.0);

        body.move_lateral(&tuning, -0.5, Duration::from_millis(100));
        approx(body.position.x, 5.5);
        approx(body.position.y, 5.0);
    }

    #[test]
    fn vertical_move_uses_climbing_speed() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(5.0, 5.0));

        body.move_vertical(&tuning, -1.0, Duration::from_millis(500));

        approx(body.position.y, 4.0);
    }

    #[test]
    fn jump_sets_impulse_and_integrates_once() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(5.0, 5.0));

        body.jump(&tuning, Duration::from_millis(100));

        approx(body.velocity.vspeed, -7.0);
        approx(body.position.y, 4.3);
    }

    #[test]
    fn lateral_jump_launches_below_walking_speed() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(5.0, 5.0));

        body.jump_lateral(&tuning, -1.0, Duration::from_millis(130));

        approx(body.velocity.hspeed, -10.0 / 1.3);
        approx(body.position.x, 4.0);
        approx(body.velocity.vspeed, -7.0);
    }

    #[test]
    fn fall_accumulates_gravity_and_carries_horizontal_speed() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(5.0, 5.0));
        body.velocity.hspeed = 2.0;

        body.fall(&tuning, Duration::from_millis(100));

        approx(body.velocity.vspeed, 2.0);
        approx(body.position.y, 5.2);
        approx(body.position.x, 5.2);
    }

    #[test]
    fn dive_damps_speed_and_spares_oxygen_carriers() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(5.0, 5.0));
        body.grant_oxygen();
        body.velocity = Velocity {
            hspeed: 4.0,
            vspeed: -2.0,
        };

        assert_eq!(body.dive(&tuning, Duration::from_millis(500)), None);

        approx(body.velocity.hspeed, 1.6);
        approx(body.velocity.vspeed, -0.8);
        assert!(!body.is_dead());
    }

    #[test]
    fn death_is_reported_once() {
        let mut body = Body::at(Position::new(1.0, 1.0));

        assert_eq!(body.die(DeathCause::Projectile), Some(DeathCause::Projectile));
        assert_eq!(body.die(DeathCause::FallImpact), None);
        assert!(body.is_dead());
        assert_eq!(body.pose(), Pose::Dead);
    }

    #[test]
    fn clamp_zeroes_only_the_axis_that_hit() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(21.0, 4.0));
        body.velocity = Velocity {
            hspeed: 3.0,
            vspeed: 1.0,
        };

        assert_eq!(body.clamp_to_bounds(&tuning, &model()), None);

        assert_eq!(body.position, Position::new(20.0, 4.0));
        assert_eq!(body.velocity.hspeed, 0.0);
        assert_eq!(body.velocity.vspeed, 1.0);
    }

    #[test]
    fn fast_descent_slides_off_either_wall() {
        let tuning = Tuning::default();

        let mut right = Body::at(Position::new(20.5, 4.0));
        right.velocity.vspeed = 4.0;
        let _ = right.clamp_to_bounds(&tuning, &model());
        approx(right.position.x, 20.0 - WALL_NUDGE);

        let mut left = Body::at(Position::new(-0.5, 4.0));
        left.velocity.vspeed = 4.0;
        let _ = left.clamp_to_bounds(&tuning, &model());
        approx(left.position.x, WALL_NUDGE);
    }

    #[test]
    fn slow_descent_sticks_to_the_wall() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(20.5, 4.0));
        body.velocity.vspeed = 3.0;

        let _ = body.clamp_to_bounds(&tuning, &model());

        assert_eq!(body.position.x, 20.0);
    }

    #[test]
    fn ceiling_stops_upward_motion() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(4.0, -0.3));
        body.velocity.vspeed = -7.0;

        assert_eq!(body.clamp_to_bounds(&tuning, &model()), None);

        assert_eq!(body.position.y, 0.0);
        assert_eq!(body.velocity.vspeed, 0.0);
    }

    #[test]
    fn gentle_landing_survives() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(4.0, 10.3));
        body.velocity.vspeed = 9.0;

        assert_eq!(body.clamp_to_bounds(&tuning, &model()), None);

        assert_eq!(body.position.y, 10.0);
        assert_eq!(body.velocity.vspeed, 0.0);
        assert!(!body.is_dead());
    }

    #[test]
    fn repeated_frames_of_walking_stay_inside_bounds() {
        let tuning = Tuning::default();
        let mut body = Body::at(Position::new(18.0, 10.0));

        for _ in 0..30 {
            body.move_lateral(&tuning, 1.0, FRAME);
            let _ = body.clamp_to_bounds(&tuning, &model());
        }

        assert_eq!(body.position, Position::new(20.0, 10.0));
    }
}
