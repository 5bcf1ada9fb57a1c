pub mod colors;
pub mod field;
pub mod path;
pub mod robot;
pub mod ui;

pub use colors::{dim_color, mix_colors};
pub use field::FieldWidget;
pub use path::PathWidget;
pub use robot::RobotWidget;
pub use ui::{CaptionLog, CaptionLogWidget, StatusBar};

use ratatui::layout::Rect as ScreenRect;

use crate::geometry::{Rect, Vec2};

/// Maps document coordinates through the viewport onto a terminal area
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub view: Rect,
    pub area: ScreenRect,
}

impl Projection {
    pub fn new(view: Rect, area: ScreenRect) -> Self {
        Self { view, area }
    }

    /// Terminal cell containing a world point, or `None` when it falls
    /// outside the projected area
    pub fn to_screen(&self, p: Vec2) -> Option<(u16, u16)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let tx = (p.x - self.view.left) / self.view.width();
        let ty = (p.y - self.view.top) / self.view.height();
        if !(0.0..1.0).contains(&tx) || !(0.0..1.0).contains(&ty) {
            return None;
        }
        let x = self.area.x + (tx * self.area.width as f32) as u16;
        let y = self.area.y + (ty * self.area.height as f32) as u16;
        Some((x.min(self.area.right().saturating_sub(1)), y.min(self.area.bottom().saturating_sub(1))))
    }

    /// World point at the center of a terminal cell (pointer mapping)
    pub fn to_world(&self, x: u16, y: u16) -> Vec2 {
        let tx = (x.saturating_sub(self.area.x) as f32 + 0.5) / self.area.width.max(1) as f32;
        let ty = (y.saturating_sub(self.area.y) as f32 + 0.5) / self.area.height.max(1) as f32;
        Vec2::new(
            self.view.left + tx * self.view.width(),
            self.view.top + ty * self.view.height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Projection {
        Projection::new(
            Rect::from_size(0.0, 600.0, 1440.0, 900.0),
            ScreenRect::new(0, 0, 120, 40),
        )
    }

    #[test]
    fn test_world_outside_viewport_is_culled() {
        let p = projection();
        assert!(p.to_screen(Vec2::new(100.0, 100.0)).is_none());
        assert!(p.to_screen(Vec2::new(100.0, 700.0)).is_some());
    }

    #[test]
    fn test_screen_world_roundtrip_stays_in_cell() {
        let p = projection();
        let world = p.to_world(60, 20);
        let (x, y) = p.to_screen(world).unwrap();
        assert_eq!((x, y), (60, 20));
    }
}
