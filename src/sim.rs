use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::geometry::{Rect, Vec2};
use crate::grid::{ObstacleGrid, DEFAULT_CELL_SIZE};
use crate::layout::PageLayout;
use crate::narration::Narrator;
use crate::nav::Planner;
use crate::robot::{self, Robot};

/// Upper bound on the per-frame time step; long stalls never teleport the robot
pub const FRAME_DT_CAP: f32 = 0.05;

/// Trailing delay before a requested grid rebuild is honored
const REBUILD_DEBOUNCE_MS: f64 = 100.0;

/// Spawn clamping margin that keeps the robot fully on screen
const SPAWN_MARGIN: f32 = 60.0;

/// Gap between the hero region and the spawn point
const SPAWN_HERO_GAP: f32 = 24.0;

/// Simulation tuning supplied by the host
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub cell_size: f32,
    /// Height of the visible window onto the page, world px
    pub viewport_height: f32,
    /// Fixed seed for blink timing; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            viewport_height: 900.0,
            seed: None,
        }
    }
}

/// The whole navigation core behind one context object: grid, robot,
/// narration, planner, viewport, and the last observed pointer target.
///
/// All state advances inside `tick(dt, now_ms)`; the host owns the frame
/// loop and both clocks, so tests can drive the simulation step by step.
pub struct Simulation {
    pub layout: PageLayout,
    pub grid: ObstacleGrid,
    pub robot: Robot,
    pub narrator: Narrator,
    /// Visible window onto the page, in document coordinates
    pub viewport: Rect,
    planner: Planner,
    target: Option<Vec2>,
    cell_size: f32,
    rebuild_due_ms: Option<f64>,
    rng: StdRng,
}

impl Simulation {
    pub fn new(layout: PageLayout, config: SimConfig) -> Self {
        let grid = ObstacleGrid::rebuild(
            layout.width,
            layout.height,
            config.cell_size,
            &layout.obstacle_rects(),
        );
        let viewport = Rect::from_size(
            0.0,
            0.0,
            layout.width,
            config.viewport_height.min(layout.height),
        );
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            robot: Robot::new(Vec2::new(80.0, 120.0)),
            narrator: Narrator::new(),
            viewport,
            planner: Planner::new(),
            target: None,
            cell_size: config.cell_size,
            rebuild_due_ms: None,
            grid,
            layout,
            rng,
        }
    }

    /// Latest pointer position, if any input has been observed yet
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn set_target(&mut self, p: Vec2) {
        self.target = Some(p);
    }

    /// Place the robot beside the hero region, clamped into the viewport,
    /// and arm the delayed greeting. Falls back to the viewport center on
    /// layouts without a hero.
    pub fn place_robot(&mut self, now_ms: f64) {
        let spawn = match self.layout.region_of_kind(crate::layout::RegionKind::Hero) {
            Some(hero) => {
                let rect = hero.rect();
                let offset = (self.viewport.width() * 0.35).clamp(160.0, 280.0);
                Vec2::new(rect.right + SPAWN_HERO_GAP - offset, rect.center().y)
            }
            None => self.viewport.center(),
        };
        let clamped = Vec2::new(
            spawn.x.clamp(
                self.viewport.left + SPAWN_MARGIN,
                self.viewport.right - SPAWN_MARGIN,
            ),
            spawn.y.clamp(
                self.viewport.top + SPAWN_MARGIN,
                self.viewport.bottom - SPAWN_MARGIN,
            ),
        );
        self.robot.place_at(clamped);
        self.narrator.schedule_greeting(now_ms);
    }

    /// Scroll the viewport vertically. Mirrors a page scroll: the rebuild is
    /// debounced until scrolling settles and the next plan runs immediately
    /// since the pointer moved relative to content.
    pub fn scroll_by(&mut self, dy: f32, now_ms: f64) {
        let max_top = (self.layout.height - self.viewport.height()).max(0.0);
        let new_top = (self.viewport.top + dy).clamp(0.0, max_top);
        let height = self.viewport.height();
        self.viewport.top = new_top;
        self.viewport.bottom = new_top + height;
        self.request_rebuild(now_ms);
        self.planner.force_next();
    }

    /// Swap in a fresh layout document (file reload) and rebuild at once
    pub fn replace_layout(&mut self, layout: PageLayout) {
        self.layout = layout;
        let height = self.viewport.height().min(self.layout.height);
        self.viewport = Rect::from_size(
            0.0,
            self.viewport.top.min((self.layout.height - height).max(0.0)),
            self.layout.width,
            height,
        );
        self.rebuild_now();
    }

    /// Ask for a grid rebuild once the current burst of changes settles
    pub fn request_rebuild(&mut self, now_ms: f64) {
        self.rebuild_due_ms = Some(now_ms + REBUILD_DEBOUNCE_MS);
    }

    fn rebuild_now(&mut self) {
        // Whole-grid replacement; a plan computed against the old grid stays
        // valid until the next replan picks this one up
        self.grid = ObstacleGrid::rebuild(
            self.layout.width,
            self.layout.height,
            self.cell_size,
            &self.layout.obstacle_rects(),
        );
        self.rebuild_due_ms = None;
    }

    /// Advance one frame. `dt` is the frame delta in seconds (capped here);
    /// `now_ms` is wall-clock milliseconds for cooldown bookkeeping.
    pub fn tick(&mut self, dt: f32, now_ms: f64) {
        let dt = dt.min(FRAME_DT_CAP);

        // Debounced rebuilds land before planning so the next plan sees the
        // fresh grid
        if matches!(self.rebuild_due_ms, Some(due) if now_ms >= due) {
            self.rebuild_now();
        }

        if self.robot.freeze_timer > 0.0 {
            self.robot.freeze_timer = (self.robot.freeze_timer - dt).max(0.0);
            self.robot.tick_animation(dt, &mut self.rng);
            self.narrator.tick(dt);
        } else {
            if let Some(target) = self.target {
                if let Some(plan) =
                    self.planner
                        .plan_if_due(now_ms, &self.grid, self.robot.position, target)
                {
                    self.robot.apply_plan(plan);
                }
            }

            let collided = robot::step(&mut self.robot, &self.grid, dt);
            if collided {
                self.narrator.on_collision(now_ms);
            }

            self.robot.tick_animation(dt, &mut self.rng);
            self.narrator.tick(dt);
            self.evaluate_triggers(now_ms);
        }

        self.narrator.mature_greeting(now_ms);
    }

    /// Off-screen plea and region proximity hints
    fn evaluate_triggers(&mut self, now_ms: f64) {
        let pos = self.robot.position;
        let view = self.viewport;

        // Vertical exits only; wandering off sideways is not a trigger
        let off_top = pos.y < view.top;
        let off_bottom = pos.y > view.bottom;
        if off_top || off_bottom {
            let anchor_x = pos.x.clamp(
                view.left + 20.0,
                view.right - (view.width() * 0.4).min(180.0),
            );
            let anchor_y = if off_top {
                view.top + 12.0
            } else {
                view.bottom - 60.0
            };
            self.narrator
                .on_offscreen(Vec2::new(anchor_x, anchor_y), now_ms);
            return;
        }

        self.narrator.on_back_in_view();
        for (kind, region) in self.layout.trigger_regions() {
            if region.rect().distance_to_point(pos) < kind.config().threshold {
                self.narrator.on_region(kind, now_ms);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Region, RegionKind, RectSpec};
    use crate::narration::TriggerKind;

    fn region(id: &str, kind: RegionKind, x: f32, y: f32, w: f32, h: f32) -> Region {
        Region {
            id: id.into(),
            kind,
            label: id.into(),
            rect: RectSpec { x, y, width: w, height: h },
        }
    }

    fn test_layout() -> PageLayout {
        PageLayout {
            width: 1440.0,
            height: 2400.0,
            regions: vec![
                // Narrow hero title: the spawn offset lands left of it
                region("hero", RegionKind::Hero, 220.0, 80.0, 200.0, 60.0),
                region("skills", RegionKind::Skills, 120.0, 1200.0, 500.0, 300.0),
            ],
        }
    }

    fn test_sim() -> Simulation {
        Simulation::new(
            test_layout(),
            SimConfig {
                seed: Some(42),
                ..SimConfig::default()
            },
        )
    }

    #[test]
    fn test_spawn_freeze_then_motion() {
        let mut sim = test_sim();
        sim.place_robot(0.0);
        let spawn = sim.robot.position;
        sim.set_target(Vec2::new(1000.0, 800.0));

        // Frozen for the first second: no planning, no motion
        let mut now = 0.0;
        for _ in 0..20 {
            now += 40.0;
            sim.tick(0.04, now);
        }
        assert!(sim.robot.position.distance_to(spawn) < 1.0);

        // Past the freeze the robot starts chasing
        for _ in 0..30 {
            now += 40.0;
            sim.tick(0.04, now);
        }
        assert!(sim.robot.position.distance_to(spawn) > 20.0);
    }

    #[test]
    fn test_greeting_shows_after_delay() {
        let mut sim = test_sim();
        sim.place_robot(0.0);
        sim.tick(0.04, 1000.0);
        assert!(!sim.narrator.visible);
        sim.tick(0.04, 1600.0);
        assert!(sim.narrator.visible);
    }

    #[test]
    fn test_spawn_is_clamped_into_viewport() {
        let mut sim = test_sim();
        sim.place_robot(0.0);
        let p = sim.robot.position;
        assert!(p.x >= sim.viewport.left + SPAWN_MARGIN);
        assert!(p.x <= sim.viewport.right - SPAWN_MARGIN);
        assert!(p.y >= sim.viewport.top + SPAWN_MARGIN);
        assert!(p.y <= sim.viewport.bottom - SPAWN_MARGIN);
    }

    #[test]
    fn test_scroll_rebuild_is_debounced() {
        let mut sim = test_sim();
        let before = sim.grid.occupied_count();

        // Shrink the layout's regions, then scroll; the grid must not change
        // until the trailing delay elapses
        sim.layout.regions.truncate(1);
        sim.scroll_by(100.0, 1000.0);
        sim.tick(0.016, 1050.0);
        assert_eq!(sim.grid.occupied_count(), before);

        sim.tick(0.016, 1120.0);
        assert!(sim.grid.occupied_count() < before);
    }

    #[test]
    fn test_unreachable_target_keeps_current_route() {
        let mut sim = test_sim();
        sim.robot.freeze_timer = 0.0;
        sim.robot.position = Vec2::new(60.0, 60.0);

        // First plan toward an open corner
        sim.set_target(Vec2::new(1400.0, 60.0));
        sim.tick(0.016, 1000.0);
        assert!(sim.robot.has_route());
        let waypoints = sim.robot.waypoints.clone();

        // Now aim at the dead center of the skills block: occupied, and its
        // neighbors are occupied too, so the search fails and the old route
        // survives
        sim.set_target(Vec2::new(370.0, 1350.0));
        sim.tick(0.016, 1200.0);
        assert_eq!(sim.robot.waypoints.len(), waypoints.len());
    }

    #[test]
    fn test_offscreen_scroll_raises_anchored_plea() {
        let mut sim = test_sim();
        sim.place_robot(0.0);
        sim.robot.freeze_timer = 0.0;
        let robot_y = sim.robot.position.y;

        // Scroll the viewport far below the robot
        sim.scroll_by(robot_y + 1200.0, 1000.0);
        sim.tick(0.016, 1200.0);

        assert!(sim.narrator.visible);
        assert!(sim.narrator.anchor.is_some());
        let anchor = sim.narrator.anchor.unwrap();
        // Robot exited above: the bubble pins just under the top edge
        assert!((anchor.y - (sim.viewport.top + 12.0)).abs() < 1e-3);
    }

    #[test]
    fn test_skills_hint_fires_once_near_region() {
        let mut sim = test_sim();
        sim.robot.freeze_timer = 0.0;
        // Park the robot just above the skills block, inside the threshold,
        // with the viewport scrolled so it stays on screen
        sim.robot.position = Vec2::new(370.0, 1100.0);
        sim.scroll_by(600.0, 500.0);
        sim.tick(0.016, 1000.0);

        assert!(sim.narrator.visible);
        assert!(sim.narrator.trigger_state(TriggerKind::Skills).fired_once);
    }
}
