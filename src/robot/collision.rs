use crate::geometry::Vec2;
use crate::grid::ObstacleGrid;

use super::Robot;

/// Passes over nearby cells per frame; two are enough to settle the corner
/// contacts a page layout produces
const RESOLVE_ITERATIONS: usize = 2;

/// Extra displacement past the contact surface
const CONTACT_SLOP: f32 = 0.5;

/// Push the robot out of any occupied cells it penetrates and cancel the
/// velocity component pointing into them.
///
/// Returns true when at least one penetration was resolved, which the
/// narration layer treats as a collision event.
pub fn resolve_collisions(robot: &mut Robot, grid: &ObstacleGrid) -> bool {
    let mut collided = false;
    for _ in 0..RESOLVE_ITERATIONS {
        let mut any = false;

        let mut nearby = Vec::new();
        grid.for_each_occupied_near(robot.position, robot.radius + grid.cell_size, |cell| {
            nearby.push(cell);
        });

        for cell in nearby {
            let rect = grid.cell_rect(cell);
            let closest = rect.closest_point(robot.position);
            let offset = robot.position - closest;
            let mut dist = offset.length();
            if dist >= robot.radius {
                continue;
            }
            any = true;
            collided = true;

            let normal = if dist > 0.0 {
                offset * (1.0 / dist)
            } else {
                // Center embedded in the cell: push along the axis with the
                // shorter escape
                dist = 0.0;
                let to_left = (robot.position.x - rect.left).abs();
                let to_right = (rect.right - robot.position.x).abs();
                let to_top = (robot.position.y - rect.top).abs();
                let to_bottom = (rect.bottom - robot.position.y).abs();
                if to_left.min(to_right) < to_top.min(to_bottom) {
                    Vec2::new(if to_left < to_right { -1.0 } else { 1.0 }, 0.0)
                } else {
                    Vec2::new(0.0, if to_top < to_bottom { -1.0 } else { 1.0 })
                }
            };

            let push = (robot.radius - dist) + CONTACT_SLOP;
            robot.position += normal * push;

            let inward = robot.velocity.dot(normal);
            if inward < 0.0 {
                robot.velocity = robot.velocity - normal * inward;
            }
        }

        if !any {
            break;
        }
    }
    collided
}
