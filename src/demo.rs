use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::Vec2;
use crate::layout::{PageLayout, RectSpec, Region, RegionKind};

/// How fast the autopilot pointer glides, world px/s
const POINTER_SPEED: f32 = 600.0;

/// Built-in portfolio-like page: a hero title up top, content sections below,
/// a home landmark near the contact block. Used with `--demo` so the robot
/// has something to explore without a layout file.
pub fn demo_layout() -> PageLayout {
    let region = |id: &str, kind, label: &str, x, y, w, h| Region {
        id: id.into(),
        kind,
        label: label.into(),
        rect: RectSpec {
            x,
            y,
            width: w,
            height: h,
        },
    };

    PageLayout {
        width: 1440.0,
        height: 2400.0,
        regions: vec![
            region("hero-title", RegionKind::Hero, "Hi, I build things", 260.0, 130.0, 220.0, 70.0),
            region("intro", RegionKind::Block, "About", 260.0, 260.0, 520.0, 90.0),
            region("skills", RegionKind::Skills, "Skills", 180.0, 520.0, 480.0, 260.0),
            region("projects", RegionKind::Projects, "Projects", 780.0, 520.0, 480.0, 300.0),
            region(
                "academic-projects",
                RegionKind::AcademicProjects,
                "Academic Projects",
                180.0,
                1050.0,
                560.0,
                320.0,
            ),
            region("gallery", RegionKind::Block, "Gallery", 820.0, 1100.0, 400.0, 220.0),
            region("contact", RegionKind::Contact, "Contact", 480.0, 1700.0, 480.0, 240.0),
            region("home-arrow", RegionKind::HomeArrow, "Home", 80.0, 1840.0, 60.0, 60.0),
            region("footer", RegionKind::Block, "Footer", 260.0, 2150.0, 900.0, 90.0),
        ],
    }
}

/// Synthetic pointer for hands-off demos: glides between randomly chosen
/// spots near the page's regions, lingering a few seconds at each
pub struct Autopilot {
    rng: StdRng,
    pointer: Vec2,
    goal: Vec2,
    hold_secs: f32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            pointer: Vec2::new(720.0, 200.0),
            goal: Vec2::new(720.0, 200.0),
            hold_secs: 1.0,
        }
    }

    /// Advance the pointer and return its new position
    pub fn tick(&mut self, dt: f32, layout: &PageLayout) -> Vec2 {
        self.hold_secs -= dt;
        if self.hold_secs <= 0.0 {
            self.goal = self.pick_goal(layout);
            self.hold_secs = self.rng.gen_range(2.0..5.0);
        }

        let to_goal = self.goal - self.pointer;
        let dist = to_goal.length();
        let step = POINTER_SPEED * dt;
        if dist <= step {
            self.pointer = self.goal;
        } else {
            self.pointer += to_goal.normalized() * step;
        }
        self.pointer
    }

    /// A point near a random region, nudged off its center so the robot
    /// skirts edges instead of diving into obstacles
    fn pick_goal(&mut self, layout: &PageLayout) -> Vec2 {
        if layout.regions.is_empty() {
            return Vec2::new(layout.width * 0.5, layout.height * 0.5);
        }
        let region = &layout.regions[self.rng.gen_range(0..layout.regions.len())];
        let center = region.rect().center();
        let offset = Vec2::new(
            self.rng.gen_range(-220.0..220.0),
            self.rng.gen_range(-220.0..220.0),
        );
        Vec2::new(
            (center.x + offset.x).clamp(20.0, layout.width - 20.0),
            (center.y + offset.y).clamp(20.0, layout.height - 20.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_layout_has_all_trigger_kinds() {
        let layout = demo_layout();
        assert!(layout.region_of_kind(RegionKind::Hero).is_some());
        let kinds: Vec<_> = layout.trigger_regions().map(|(k, _)| k).collect();
        assert_eq!(kinds.len(), 5);
    }

    #[test]
    fn test_demo_regions_fit_the_page() {
        let layout = demo_layout();
        for region in &layout.regions {
            let rect = region.rect();
            assert!(rect.left >= 0.0 && rect.right <= layout.width, "{}", region.id);
            assert!(rect.top >= 0.0 && rect.bottom <= layout.height, "{}", region.id);
        }
    }

    #[test]
    fn test_autopilot_stays_on_the_page() {
        let layout = demo_layout();
        let mut pilot = Autopilot::new(7);
        for _ in 0..2000 {
            let p = pilot.tick(0.033, &layout);
            assert!(p.x >= 0.0 && p.x <= layout.width);
            assert!(p.y >= 0.0 && p.y <= layout.height);
        }
    }

    #[test]
    fn test_autopilot_is_deterministic_for_a_seed() {
        let layout = demo_layout();
        let mut a = Autopilot::new(99);
        let mut b = Autopilot::new(99);
        for _ in 0..100 {
            assert_eq!(a.tick(0.033, &layout), b.tick(0.033, &layout));
        }
    }
}
