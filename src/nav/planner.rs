use crate::geometry::Vec2;
use crate::grid::{Cell, ObstacleGrid};

use super::{find_path, smooth};

/// Minimum interval between replans. Short enough to track a moving pointer,
/// long enough to keep search off most frames.
pub const PLAN_INTERVAL_MS: f64 = 80.0;

/// A freshly computed route: the discrete cell path, its smoothed waypoints,
/// and the waypoint index the agent should steer toward first
#[derive(Debug, Clone)]
pub struct Plan {
    pub cells: Vec<Cell>,
    pub points: Vec<Vec2>,
    pub start_index: usize,
}

/// Rate-limits path search as the goal moves.
///
/// An unreachable goal produces no plan at all, leaving whatever route the
/// agent already follows untouched.
#[derive(Debug)]
pub struct Planner {
    last_plan_ms: f64,
}

impl Planner {
    pub fn new() -> Self {
        Self { last_plan_ms: 0.0 }
    }

    /// Zero the rate limit so the next call replans immediately (used after
    /// scroll-settle rebuilds, where the goal moved relative to content)
    pub fn force_next(&mut self) {
        self.last_plan_ms = 0.0;
    }

    /// Compute a new plan if the rate limit allows and the search succeeds
    pub fn plan_if_due(
        &mut self,
        now_ms: f64,
        grid: &ObstacleGrid,
        position: Vec2,
        target: Vec2,
    ) -> Option<Plan> {
        if now_ms - self.last_plan_ms < PLAN_INTERVAL_MS {
            return None;
        }
        self.last_plan_ms = now_ms;

        let start = grid.world_to_grid(position);
        let goal = grid.world_to_grid(target);
        let cells = find_path(grid, start, goal);
        if cells.is_empty() {
            return None;
        }

        let points = smooth(grid, &cells);
        let start_index = nearest_with_lookahead(&points, position);
        Some(Plan {
            cells,
            points,
            start_index,
        })
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the waypoint nearest the agent, advanced one step as lookahead
/// (clamped to the last index) so motion does not stall on a point already
/// reached
fn nearest_with_lookahead(points: &[Vec2], position: Vec2) -> usize {
    let mut closest = 0;
    let mut best = f32::INFINITY;
    for (i, wp) in points.iter().enumerate() {
        let d = wp.distance_to(position);
        if d < best {
            best = d;
            closest = i;
        }
    }
    (closest + 1).min(points.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_grid(cols: i32, rows: i32) -> ObstacleGrid {
        ObstacleGrid::new(cols as f32 * 24.0, rows as f32 * 24.0, 24.0)
    }

    #[test]
    fn test_rate_limit_blocks_back_to_back_plans() {
        let grid = empty_grid(10, 10);
        let mut planner = Planner::new();
        let pos = Vec2::new(12.0, 12.0);
        let target = Vec2::new(220.0, 220.0);

        assert!(planner.plan_if_due(100.0, &grid, pos, target).is_some());
        assert!(planner.plan_if_due(150.0, &grid, pos, target).is_none());
        assert!(planner.plan_if_due(185.0, &grid, pos, target).is_some());
    }

    #[test]
    fn test_force_next_bypasses_rate_limit() {
        let grid = empty_grid(10, 10);
        let mut planner = Planner::new();
        let pos = Vec2::new(12.0, 12.0);
        let target = Vec2::new(220.0, 220.0);

        assert!(planner.plan_if_due(100.0, &grid, pos, target).is_some());
        planner.force_next();
        assert!(planner.plan_if_due(110.0, &grid, pos, target).is_some());
    }

    #[test]
    fn test_unreachable_goal_produces_no_plan() {
        // Goal cell boxed in on all sides
        let mut rects = Vec::new();
        for (dc, dr) in [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)] {
            let col = 5 + dc;
            let row = 5 + dr;
            rects.push(crate::geometry::Rect::new(
                col as f32 * 24.0 + 6.0,
                row as f32 * 24.0 + 6.0,
                col as f32 * 24.0 + 18.0,
                row as f32 * 24.0 + 18.0,
            ));
        }
        let grid = ObstacleGrid::rebuild(240.0, 240.0, 24.0, &rects);
        let mut planner = Planner::new();
        let plan = planner.plan_if_due(
            100.0,
            &grid,
            Vec2::new(12.0, 12.0),
            grid.cell_center(Cell::new(5, 5)),
        );
        assert!(plan.is_none());
    }

    #[test]
    fn test_lookahead_skips_the_point_behind() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
        ];
        // Agent sits on the second point; steering should aim at the third
        assert_eq!(nearest_with_lookahead(&points, Vec2::new(10.0, 0.0)), 2);
        // Already at the end: clamp to the last index
        assert_eq!(nearest_with_lookahead(&points, Vec2::new(20.0, 0.0)), 2);
    }
}
