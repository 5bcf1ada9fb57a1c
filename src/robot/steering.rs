use crate::geometry::Vec2;
use crate::grid::ObstacleGrid;

use super::{resolve_collisions, Robot};

/// Distance inside which desired speed ramps linearly down to zero
pub const SLOW_RADIUS: f32 = 100.0;

/// Fixed lower bound of the waypoint-arrival distance
pub const ARRIVAL_EPSILON: f32 = 8.0;

/// Per-second velocity retention when the robot has nowhere to go
const IDLE_DRAG: f32 = 0.0001;

/// Advance the robot one frame: arrival steering toward the current
/// waypoint, integration, then collision resolution.
///
/// Returns true when at least one penetration was resolved this frame.
pub fn step(robot: &mut Robot, grid: &ObstacleGrid, dt: f32) -> bool {
    if dt <= 0.0 {
        return false;
    }

    let using_points = !robot.waypoints.is_empty();
    if !using_points && robot.cells.is_empty() {
        // Nothing to chase: bleed off speed and coast to a stop
        let retain = IDLE_DRAG.powf(dt);
        robot.velocity = robot.velocity * retain;
        robot.position += robot.velocity * dt;
        return resolve_collisions(robot, grid);
    }

    // Current steering target, smoothed waypoint first, cell center fallback
    let target = if using_points {
        let idx = robot.waypoint_index.min(robot.waypoints.len() - 1);
        robot.waypoints[idx]
    } else {
        let idx = robot.cell_index.min(robot.cells.len() - 1);
        grid.cell_center(robot.cells[idx])
    };

    let to_target = target - robot.position;
    let dist = to_target.length();

    // Arrival behavior: full speed outside the slow radius, linear ramp inside
    let desired_speed = if dist < SLOW_RADIUS {
        robot.max_speed * (dist / SLOW_RADIUS)
    } else {
        robot.max_speed
    };
    let desired_velocity = to_target.normalized() * desired_speed;

    let accel = ((desired_velocity - robot.velocity) * (1.0 / dt)).clamp_length(robot.max_accel);
    robot.velocity = (robot.velocity + accel * dt).clamp_length(robot.max_speed);
    robot.position += robot.velocity * dt;

    let collided = resolve_collisions(robot, grid);

    // Advance to the next waypoint once close enough; the index only ever
    // moves forward
    if dist <= ARRIVAL_EPSILON.max(robot.max_speed * dt) {
        if using_points {
            if robot.waypoint_index < robot.waypoints.len() - 1 {
                robot.waypoint_index += 1;
            }
        } else {
            robot.position = target;
            if robot.cell_index < robot.cells.len() - 1 {
                robot.cell_index += 1;
            }
        }
    }

    collided
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> ObstacleGrid {
        ObstacleGrid::new(2400.0, 2400.0, 24.0)
    }

    fn robot_with_waypoint(position: Vec2, waypoint: Vec2) -> Robot {
        let mut robot = Robot::new(position);
        robot.waypoints = vec![waypoint];
        robot.waypoint_index = 0;
        robot
    }

    #[test]
    fn test_first_step_from_rest_matches_accel_clamp() {
        let grid = open_grid();
        let mut robot = robot_with_waypoint(Vec2::new(100.0, 100.0), Vec2::new(100.0, 300.0));

        step(&mut robot, &grid, 0.016);
        // Distance 200 is outside the slow radius, so desired speed is max;
        // the acceleration clamp limits the first step to 5000 * 0.016
        assert!(robot.velocity.x.abs() < 1e-3);
        assert!((robot.velocity.y - 80.0).abs() < 0.5);
    }

    #[test]
    fn test_speed_never_exceeds_max() {
        let grid = open_grid();
        let mut robot = robot_with_waypoint(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100000.0));
        robot.waypoints = vec![Vec2::new(100.0, 100000.0)];

        for _ in 0..500 {
            step(&mut robot, &grid, 0.016);
            assert!(robot.speed() <= robot.max_speed + 1e-3);
        }
        // After enough frames the robot cruises at max speed
        assert!(robot.speed() > robot.max_speed * 0.99);
    }

    #[test]
    fn test_desired_speed_ramps_inside_slow_radius() {
        let grid = open_grid();
        // 50 px out, already moving at the ramp speed: the desired velocity
        // equals the current one, so acceleration is zero and speed holds
        let mut robot = robot_with_waypoint(Vec2::new(100.0, 100.0), Vec2::new(150.0, 100.0));
        robot.velocity = Vec2::new(500.0, 0.0);

        let dt = 0.0001; // tiny step so the distance barely changes
        step(&mut robot, &grid, dt);
        assert!((robot.velocity.x - 500.0).abs() < 1.0);
    }

    #[test]
    fn test_idle_drag_decays_velocity() {
        let grid = open_grid();
        let mut robot = Robot::new(Vec2::new(100.0, 100.0));
        robot.velocity = Vec2::new(400.0, 0.0);

        step(&mut robot, &grid, 0.1);
        assert!(robot.speed() < 200.0);
        for _ in 0..50 {
            step(&mut robot, &grid, 0.1);
        }
        assert!(robot.speed() < 1.0);
    }

    #[test]
    fn test_waypoint_advance_is_monotonic_and_clamped() {
        let grid = open_grid();
        let mut robot = Robot::new(Vec2::new(100.0, 100.0));
        robot.waypoints = vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(110.0, 100.0),
            Vec2::new(120.0, 100.0),
        ];
        robot.waypoint_index = 0;

        // Sitting on the first waypoint: index advances
        step(&mut robot, &grid, 0.016);
        assert_eq!(robot.waypoint_index, 1);

        // Run until the route is exhausted; the index must stop at the end
        for _ in 0..100 {
            step(&mut robot, &grid, 0.016);
        }
        assert_eq!(robot.waypoint_index, 2);
    }

    #[test]
    fn test_zero_distance_target_is_safe() {
        let grid = open_grid();
        let mut robot = robot_with_waypoint(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));
        step(&mut robot, &grid, 0.016);
        assert!(robot.position.x.is_finite());
        assert!(robot.position.y.is_finite());
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let grid = open_grid();
        let mut robot = robot_with_waypoint(Vec2::new(100.0, 100.0), Vec2::new(300.0, 100.0));
        step(&mut robot, &grid, 0.0);
        assert_eq!(robot.position, Vec2::new(100.0, 100.0));
    }
}
