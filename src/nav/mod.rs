mod planner;
mod search;
mod smooth;

pub use planner::{Plan, Planner, PLAN_INTERVAL_MS};
pub use search::find_path;
pub use smooth::{has_line_of_sight, shortcut, smooth, subdivide_corners};
