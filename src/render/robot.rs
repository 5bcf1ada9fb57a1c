use ratatui::{
    buffer::Buffer,
    layout::Rect as ScreenRect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::geometry::Vec2;
use crate::narration::Narrator;
use crate::robot::Robot;

use super::colors::{BUBBLE_BORDER_COLOR, BUBBLE_TEXT_COLOR, ROBOT_BLINK_COLOR, ROBOT_COLOR};
use super::Projection;

/// Margin kept between a caption bubble and the area edges, in cells
const BUBBLE_MARGIN: u16 = 1;

/// The robot glyph plus its caption bubble
pub struct RobotWidget<'a> {
    robot: &'a Robot,
    narrator: &'a Narrator,
    projection: Projection,
}

impl<'a> RobotWidget<'a> {
    pub fn new(robot: &'a Robot, narrator: &'a Narrator, projection: Projection) -> Self {
        Self {
            robot,
            narrator,
            projection,
        }
    }

    fn render_robot(&self, area: ScreenRect, buf: &mut Buffer) -> Option<(u16, u16)> {
        // Bob rides on the world y so the hover reads through the projection
        let drawn_at = Vec2::new(
            self.robot.position.x,
            self.robot.position.y + self.robot.bob_offset() * 4.0,
        );
        let (x, y) = self.projection.to_screen(drawn_at)?;
        if x < area.x || x >= area.right() || y < area.y || y >= area.bottom() {
            return None;
        }

        let color = if self.robot.anim.is_blinking {
            ROBOT_BLINK_COLOR
        } else {
            ROBOT_COLOR
        };
        buf[(x, y)]
            .set_char('◉')
            .set_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        Some((x, y))
    }

    /// Single-row bubble, clamped inside the area so captions never clip at
    /// the edges
    fn render_bubble(&self, area: ScreenRect, buf: &mut Buffer, near: (u16, u16)) {
        let text = &self.narrator.text;
        if text.is_empty() || area.height < 4 {
            return;
        }
        let width = (text.chars().count() + 2) as u16;
        if area.width <= width + BUBBLE_MARGIN * 2 {
            return;
        }

        let desired_x = near.0.saturating_add(2);
        let desired_y = near.1.saturating_sub(1);
        let max_x = area.right().saturating_sub(width + BUBBLE_MARGIN);
        let x = desired_x.clamp(area.x + BUBBLE_MARGIN, max_x);
        let y = desired_y.clamp(area.y + BUBBLE_MARGIN, area.bottom().saturating_sub(2));

        let border = Style::default().fg(BUBBLE_BORDER_COLOR);
        let body = Style::default().fg(BUBBLE_TEXT_COLOR).add_modifier(Modifier::BOLD);

        buf[(x, y)].set_char('❲').set_style(border);
        for (i, ch) in text.chars().enumerate() {
            buf[(x + 1 + i as u16, y)].set_char(ch).set_style(body);
        }
        buf[(x + width - 1, y)].set_char('❳').set_style(border);
    }
}

impl Widget for RobotWidget<'_> {
    fn render(self, area: ScreenRect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let robot_cell = self.render_robot(area, buf);

        if !self.narrator.visible {
            return;
        }

        // Anchored bubbles (the off-screen plea) pin to their own world
        // point; everything else rides next to the robot
        let near = match self.narrator.anchor {
            Some(anchor) => self.projection.to_screen(anchor),
            None => robot_cell,
        };
        if let Some(near) = near {
            self.render_bubble(area, buf, near);
        }
    }
}
