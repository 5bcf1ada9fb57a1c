use crate::geometry::Vec2;
use crate::grid::{Cell, ObstacleGrid};

/// Hard cap on smoothed waypoint count, bounding per-frame steering and
/// rendering cost on very long paths
const MAX_WAYPOINTS: usize = 200;

/// Sampling stride for line-of-sight checks, as a fraction of a cell
const LOS_STEP_FRACTION: f32 = 0.5;

/// True when the straight segment between two world points crosses no
/// occupied cell. The segment is sampled every half cell; endpoints are
/// assumed valid by construction (they come from free cell centers).
pub fn has_line_of_sight(grid: &ObstacleGrid, a: Vec2, b: Vec2) -> bool {
    let delta = b - a;
    let len = delta.length();
    if len == 0.0 {
        return true;
    }
    let steps = ((len / (grid.cell_size * LOS_STEP_FRACTION)).ceil() as usize).max(2);
    for i in 1..steps {
        let t = i as f32 / steps as f32;
        let sample = a + delta * t;
        if grid.is_occupied(grid.world_to_grid(sample)) {
            return false;
        }
    }
    true
}

/// Greedy visibility shortcutting: from each kept point, jump to the
/// farthest later point still in line of sight. Collapses staircase runs
/// into straight segments.
pub fn shortcut(grid: &ObstacleGrid, points: &[Vec2]) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    let mut i = 0;
    while i < points.len() - 1 {
        let mut found = i + 1;
        let mut j = points.len() - 1;
        while j > i + 1 {
            if has_line_of_sight(grid, points[i], points[j]) {
                found = j;
                break;
            }
            j -= 1;
        }
        out.push(points[found]);
        i = found;
    }
    out
}

/// One corner-rounding pass: each consecutive pair is replaced by points at
/// 25% and 75% interpolation, endpoints preserved. A two-point segment
/// becomes four points.
pub fn subdivide_corners(points: &[Vec2]) -> Vec<Vec2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len() * 2);
    out.push(points[0]);
    for pair in points.windows(2) {
        out.push(pair[0].lerp(pair[1], 0.25));
        out.push(pair[0].lerp(pair[1], 0.75));
    }
    out.push(points[points.len() - 1]);
    out
}

/// Uniformly downsample by stride, always keeping the final point
fn cap_waypoints(points: Vec<Vec2>) -> Vec<Vec2> {
    if points.len() <= MAX_WAYPOINTS {
        return points;
    }
    let stride = points.len().div_ceil(MAX_WAYPOINTS);
    let last = points[points.len() - 1];
    let mut out: Vec<Vec2> = points.into_iter().step_by(stride).collect();
    if out.last() != Some(&last) {
        out.push(last);
    }
    out
}

/// Full smoothing pipeline: cell centers, visibility shortcutting, one
/// corner-rounding pass, waypoint cap. Output always starts and ends at the
/// start/goal cell centers and is never empty for non-empty input.
pub fn smooth(grid: &ObstacleGrid, cells: &[Cell]) -> Vec<Vec2> {
    let centers: Vec<Vec2> = cells.iter().map(|c| grid.cell_center(*c)).collect();
    let shortcut = shortcut(grid, &centers);
    cap_waypoints(subdivide_corners(&shortcut))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn empty_grid(cols: i32, rows: i32) -> ObstacleGrid {
        ObstacleGrid::new(cols as f32 * 24.0, rows as f32 * 24.0, 24.0)
    }

    #[test]
    fn test_single_cell_smooths_to_its_center() {
        let grid = empty_grid(4, 4);
        let out = smooth(&grid, &[Cell::new(2, 1)]);
        assert_eq!(out, vec![grid.cell_center(Cell::new(2, 1))]);
    }

    #[test]
    fn test_straight_corridor_collapses_to_two_points() {
        let grid = empty_grid(10, 1);
        let cells: Vec<Cell> = (0..10).map(|c| Cell::new(c, 0)).collect();
        let centers: Vec<Vec2> = cells.iter().map(|c| grid.cell_center(*c)).collect();
        let cut = shortcut(&grid, &centers);
        assert_eq!(cut.len(), 2);
        assert_eq!(cut[0], grid.cell_center(Cell::new(0, 0)));
        assert_eq!(cut[1], grid.cell_center(Cell::new(9, 0)));
    }

    #[test]
    fn test_subdivision_expands_two_points_to_four() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        let out = subdivide_corners(&[a, b]);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], a);
        assert_eq!(out[1], Vec2::new(25.0, 0.0));
        assert_eq!(out[2], Vec2::new(75.0, 0.0));
        assert_eq!(out[3], b);
    }

    #[test]
    fn test_smooth_preserves_endpoints() {
        let grid = empty_grid(10, 10);
        let path = crate::nav::find_path(&grid, Cell::new(0, 0), Cell::new(9, 9));
        let out = smooth(&grid, &path);
        assert_eq!(out[0], grid.cell_center(Cell::new(0, 0)));
        assert_eq!(*out.last().unwrap(), grid.cell_center(Cell::new(9, 9)));
    }

    #[test]
    fn test_open_grid_diagonal_smooths_to_four_points() {
        // End-to-end: 19-cell staircase shortcuts to 2 points, then one
        // subdivision pass yields 4
        let grid = empty_grid(10, 10);
        let path = crate::nav::find_path(&grid, Cell::new(0, 0), Cell::new(9, 9));
        assert_eq!(path.len(), 19);
        let out = smooth(&grid, &path);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_shortcut_respects_obstacles() {
        // Wall between start and goal rows: direct diagonal is blocked, so
        // the shortcut keeps an intermediate point
        let wall = Rect::new(2.0 * 24.0, 2.0 * 24.0, 8.0 * 24.0 - 1.0, 3.0 * 24.0 - 1.0);
        let grid = ObstacleGrid::rebuild(240.0, 240.0, 24.0, &[wall]);
        let path = crate::nav::find_path(&grid, Cell::new(4, 0), Cell::new(4, 6));
        assert!(!path.is_empty());
        let centers: Vec<Vec2> = path.iter().map(|c| grid.cell_center(*c)).collect();
        let cut = shortcut(&grid, &centers);
        assert!(cut.len() > 2);
        for pair in cut.windows(2) {
            assert!(has_line_of_sight(&grid, pair[0], pair[1]));
        }
    }

    #[test]
    fn test_long_path_capped_and_keeps_last() {
        let points: Vec<Vec2> = (0..500).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let last = points[points.len() - 1];
        let capped = cap_waypoints(points);
        assert!(capped.len() <= MAX_WAYPOINTS + 1);
        assert_eq!(*capped.last().unwrap(), last);
    }
}
