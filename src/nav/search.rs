use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{Cell, ObstacleGrid};

/// 4-connected neighbor offsets, probed in a fixed order so occupied
/// start/goal substitution stays deterministic
const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const UNVISITED: u32 = u32::MAX;

/// Manhattan distance between two cells. Admissible and consistent for
/// unit-cost 4-connected movement.
fn heuristic(a: Cell, b: Cell) -> u32 {
    ((a.col - b.col).abs() + (a.row - b.row).abs()) as u32
}

/// Walkable 4-neighbors of a cell
fn neighbors(grid: &ObstacleGrid, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
    DIRS.iter()
        .map(move |(dc, dr)| Cell::new(cell.col + dc, cell.row + dr))
        .filter(|c| grid.is_walkable(*c))
}

/// If the cell is occupied, substitute the first free 4-neighbor
fn nudge_free(grid: &ObstacleGrid, cell: Cell) -> Option<Cell> {
    if grid.is_walkable(cell) {
        return Some(cell);
    }
    neighbors(grid, cell).next()
}

/// A* shortest path over the grid, start and goal inclusive.
///
/// Returns an empty path when the goal is unreachable or when an occupied
/// start/goal has no free neighbor to stand in for it. Bookkeeping uses
/// packed `row * cols + col` indices; the open set is a binary heap ordered
/// by f-cost with an insertion sequence number breaking ties, so equal-cost
/// frontiers expand in a stable order.
pub fn find_path(grid: &ObstacleGrid, start: Cell, goal: Cell) -> Vec<Cell> {
    let (Some(start), Some(goal)) = (nudge_free(grid, start), nudge_free(grid, goal)) else {
        return Vec::new();
    };

    let pack = |c: Cell| (c.row * grid.cols + c.col) as usize;
    let unpack = |i: usize| Cell::new(i as i32 % grid.cols, i as i32 / grid.cols);

    let cell_count = (grid.cols * grid.rows) as usize;
    let mut g_score = vec![UNVISITED; cell_count];
    let mut came_from = vec![UNVISITED; cell_count];

    // Heap entries carry (f, sequence, packed index, g-at-push); entries made
    // stale by a later better g are skipped on pop.
    let mut open = BinaryHeap::new();
    let mut seq: u32 = 0;

    let start_idx = pack(start);
    let goal_idx = pack(goal);
    g_score[start_idx] = 0;
    open.push(Reverse((heuristic(start, goal), seq, start_idx, 0u32)));

    while let Some(Reverse((_, _, current_idx, entry_g))) = open.pop() {
        if entry_g > g_score[current_idx] {
            continue;
        }
        if current_idx == goal_idx {
            return reconstruct(&came_from, current_idx, unpack);
        }

        let current = unpack(current_idx);
        let tentative = g_score[current_idx] + 1;
        for nb in neighbors(grid, current) {
            let nb_idx = pack(nb);
            if tentative < g_score[nb_idx] {
                came_from[nb_idx] = current_idx as u32;
                g_score[nb_idx] = tentative;
                seq += 1;
                open.push(Reverse((tentative + heuristic(nb, goal), seq, nb_idx, tentative)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &[u32], goal_idx: usize, unpack: impl Fn(usize) -> Cell) -> Vec<Cell> {
    let mut path = vec![unpack(goal_idx)];
    let mut idx = goal_idx;
    while came_from[idx] != UNVISITED {
        idx = came_from[idx] as usize;
        path.push(unpack(idx));
    }
    path.reverse();
    path
}
