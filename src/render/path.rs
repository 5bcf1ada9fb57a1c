use ratatui::{buffer::Buffer, layout::Rect as ScreenRect, style::Style, widgets::Widget};

use crate::geometry::Vec2;

use super::colors::{mix_colors, PATH_FAR_COLOR, PATH_NEAR_COLOR};
use super::Projection;

/// Smoothed-path overlay: a dotted polyline through the waypoints, shaded
/// from the robot end toward the goal end
pub struct PathWidget<'a> {
    waypoints: &'a [Vec2],
    current_index: usize,
    projection: Projection,
}

impl<'a> PathWidget<'a> {
    pub fn new(waypoints: &'a [Vec2], projection: Projection) -> Self {
        Self {
            waypoints,
            current_index: 0,
            projection,
        }
    }

    pub fn current_index(mut self, index: usize) -> Self {
        self.current_index = index;
        self
    }

    fn plot_segment(&self, buf: &mut Buffer, from: Vec2, to: Vec2, t: f32) {
        let style = Style::default().fg(mix_colors(PATH_NEAR_COLOR, PATH_FAR_COLOR, t));
        // Sample densely enough that no terminal cell along the segment is
        // skipped
        let steps = (from.distance_to(to) / self.projection.view.height()
            * self.projection.area.height as f32)
            .ceil()
            .max(1.0) as usize
            * 2;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            if let Some((x, y)) = self.projection.to_screen(p) {
                if buf[(x, y)].symbol() == " " || buf[(x, y)].symbol() == "▒" {
                    buf[(x, y)].set_char('·').set_style(style);
                }
            }
        }
    }
}

impl Widget for PathWidget<'_> {
    fn render(self, area: ScreenRect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.waypoints.len() < 2 {
            return;
        }

        let segments = self.waypoints.len() - 1;
        for (i, pair) in self.waypoints.windows(2).enumerate() {
            self.plot_segment(buf, pair[0], pair[1], i as f32 / segments as f32);
        }

        // Emphasize the waypoint currently steered toward
        let target = self.waypoints[self.current_index.min(self.waypoints.len() - 1)];
        if let Some((x, y)) = self.projection.to_screen(target) {
            buf[(x, y)]
                .set_char('o')
                .set_style(Style::default().fg(PATH_FAR_COLOR));
        }
    }
}
