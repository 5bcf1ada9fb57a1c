mod collision;
mod steering;

pub use collision::resolve_collisions;
pub use steering::{step, ARRIVAL_EPSILON, SLOW_RADIUS};

use rand::Rng;

use crate::geometry::Vec2;
use crate::grid::Cell;
use crate::nav::Plan;

/// Top speed in world px/s
pub const MAX_SPEED: f32 = 1000.0;

/// Acceleration ceiling in world px/s^2
pub const MAX_ACCEL: f32 = 5000.0;

/// Collision radius in world px
pub const ROBOT_RADIUS: f32 = 8.0;

/// Seconds the robot holds still after being placed
pub const SPAWN_FREEZE_SECS: f32 = 1.0;

/// How long a blink keeps the eyes closed
const BLINK_DURATION: f32 = 0.12;

/// Idle animation state: blink and bob, driven every frame
#[derive(Debug, Clone)]
pub struct RobotAnim {
    pub blink_timer: f32,
    pub is_blinking: bool,
    pub bob_phase: f32,
    /// Seconds until the next blink starts, resampled after each blink
    next_blink_in: f32,
}

impl RobotAnim {
    fn new() -> Self {
        Self {
            blink_timer: 0.0,
            is_blinking: false,
            bob_phase: 0.0,
            next_blink_in: 4.0,
        }
    }
}

/// The guide robot: kinematic state, current route, and animation sub-state.
///
/// Position only changes in the steering step or through explicit placement;
/// velocity magnitude never exceeds `max_speed`.
#[derive(Debug, Clone)]
pub struct Robot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub max_speed: f32,
    pub max_accel: f32,
    /// Seconds remaining before motion is permitted
    pub freeze_timer: f32,

    /// Discrete cell path from the last successful plan
    pub cells: Vec<Cell>,
    pub cell_index: usize,
    /// Smoothed world-space waypoints derived from `cells`
    pub waypoints: Vec<Vec2>,
    /// Current steering target; advances monotonically, never rewinds
    pub waypoint_index: usize,

    pub anim: RobotAnim,
}

impl Robot {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: ROBOT_RADIUS,
            max_speed: MAX_SPEED,
            max_accel: MAX_ACCEL,
            freeze_timer: 0.0,
            cells: Vec::new(),
            cell_index: 0,
            waypoints: Vec::new(),
            waypoint_index: 0,
            anim: RobotAnim::new(),
        }
    }

    /// Teleport to a spawn point: route and velocity are cleared and the
    /// spawn freeze starts counting down
    pub fn place_at(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.cells.clear();
        self.cell_index = 0;
        self.waypoints.clear();
        self.waypoint_index = 0;
        self.freeze_timer = SPAWN_FREEZE_SECS;
    }

    /// Adopt a freshly planned route
    pub fn apply_plan(&mut self, plan: Plan) {
        self.cells = plan.cells;
        self.cell_index = 0;
        self.waypoints = plan.points;
        self.waypoint_index = plan.start_index;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn has_route(&self) -> bool {
        !self.waypoints.is_empty() || !self.cells.is_empty()
    }

    /// Advance blink and bob state (called every frame, frozen or not)
    pub fn tick_animation<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        self.anim.blink_timer += dt;
        if !self.anim.is_blinking && self.anim.blink_timer > self.anim.next_blink_in {
            self.anim.is_blinking = true;
            self.anim.blink_timer = 0.0;
        }
        if self.anim.is_blinking && self.anim.blink_timer > BLINK_DURATION {
            self.anim.is_blinking = false;
            self.anim.blink_timer = 0.0;
            // Eyes reopen every 3-5 seconds
            self.anim.next_blink_in = rng.gen_range(3.0..5.0);
        }
        self.anim.bob_phase += dt * 2.0;
    }

    /// Vertical bob offset for rendering
    pub fn bob_offset(&self) -> f32 {
        self.anim.bob_phase.sin() * 1.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_place_at_clears_route_and_freezes() {
        let mut robot = Robot::new(Vec2::new(10.0, 10.0));
        robot.velocity = Vec2::new(50.0, 0.0);
        robot.waypoints = vec![Vec2::new(100.0, 100.0)];
        robot.waypoint_index = 1;

        robot.place_at(Vec2::new(200.0, 200.0));
        assert_eq!(robot.position, Vec2::new(200.0, 200.0));
        assert_eq!(robot.velocity, Vec2::ZERO);
        assert!(robot.waypoints.is_empty());
        assert_eq!(robot.waypoint_index, 0);
        assert_eq!(robot.freeze_timer, SPAWN_FREEZE_SECS);
    }

    #[test]
    fn test_blink_cycle() {
        let mut robot = Robot::new(Vec2::ZERO);
        let mut rng = StdRng::seed_from_u64(7);

        // 20 simulated seconds cover several blink periods
        let mut blinks = 0;
        let mut was_blinking = false;
        for _ in 0..400 {
            robot.tick_animation(0.05, &mut rng);
            if robot.anim.is_blinking && !was_blinking {
                blinks += 1;
            }
            was_blinking = robot.anim.is_blinking;
        }
        assert!(blinks >= 2, "expected repeated blinks, saw {}", blinks);
    }

    #[test]
    fn test_bob_phase_advances() {
        let mut robot = Robot::new(Vec2::ZERO);
        let mut rng = StdRng::seed_from_u64(7);
        robot.tick_animation(0.5, &mut rng);
        assert!((robot.anim.bob_phase - 1.0).abs() < 1e-6);
    }
}
