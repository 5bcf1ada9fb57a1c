use ratatui::{buffer::Buffer, layout::Rect as ScreenRect, style::Style, widgets::Widget};

use crate::geometry::Vec2;
use crate::grid::ObstacleGrid;
use crate::layout::PageLayout;

use super::colors::{GRID_COLOR, OBSTACLE_COLOR, REGION_COLOR};
use super::Projection;

/// Page background: occupied cells, optional grid lattice, region outlines
pub struct FieldWidget<'a> {
    grid: &'a ObstacleGrid,
    layout: &'a PageLayout,
    projection: Projection,
    show_grid: bool,
    show_regions: bool,
}

impl<'a> FieldWidget<'a> {
    pub fn new(grid: &'a ObstacleGrid, layout: &'a PageLayout, projection: Projection) -> Self {
        Self {
            grid,
            layout,
            projection,
            show_grid: false,
            show_regions: true,
        }
    }

    pub fn show_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn show_regions(mut self, show: bool) -> Self {
        self.show_regions = show;
        self
    }

    fn render_obstacles(&self, area: ScreenRect, buf: &mut Buffer) {
        let style = Style::default().fg(OBSTACLE_COLOR);
        // Sample the world under every terminal cell; coarser than the grid
        // but gap-free on screen
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                let world = self.projection.to_world(x, y);
                if self.grid.is_occupied(self.grid.world_to_grid(world)) {
                    buf[(x, y)].set_char('▒').set_style(style);
                }
            }
        }
    }

    fn render_grid_lattice(&self, buf: &mut Buffer) {
        let style = Style::default().fg(GRID_COLOR);
        for row in 0..=self.grid.rows {
            for col in 0..=self.grid.cols {
                let corner = Vec2::new(
                    col as f32 * self.grid.cell_size,
                    row as f32 * self.grid.cell_size,
                );
                if let Some((x, y)) = self.projection.to_screen(corner) {
                    if buf[(x, y)].symbol() == " " {
                        buf[(x, y)].set_char('·').set_style(style);
                    }
                }
            }
        }
    }

    fn render_regions(&self, area: ScreenRect, buf: &mut Buffer) {
        let style = Style::default().fg(REGION_COLOR);
        for region in &self.layout.regions {
            let rect = region.rect();
            let top_left = self.projection.to_screen(Vec2::new(rect.left, rect.top));
            let bottom_right =
                self.projection.to_screen(Vec2::new(rect.right, rect.bottom));

            // Skip regions fully outside the viewport; partially visible
            // ones are clamped to the area edges
            if top_left.is_none() && bottom_right.is_none() {
                continue;
            }
            let (x0, y0) = top_left.unwrap_or((area.x, area.y));
            let (x1, y1) = bottom_right.unwrap_or((
                area.x + area.width - 1,
                area.y + area.height - 1,
            ));

            for x in x0..=x1 {
                buf[(x, y0)].set_char('─').set_style(style);
                buf[(x, y1)].set_char('─').set_style(style);
            }
            for y in y0..=y1 {
                buf[(x0, y)].set_char('│').set_style(style);
                buf[(x1, y)].set_char('│').set_style(style);
            }
            buf[(x0, y0)].set_char('┌').set_style(style);
            buf[(x1, y0)].set_char('┐').set_style(style);
            buf[(x0, y1)].set_char('└').set_style(style);
            buf[(x1, y1)].set_char('┘').set_style(style);

            // Label along the top edge, truncated to the box width
            let width = (x1 - x0) as usize;
            if width > 2 && y0 >= area.y {
                let label: String = region.label.chars().take(width - 1).collect();
                let start = x0 + 1;
                for (i, ch) in label.chars().enumerate() {
                    buf[(start + i as u16, y0)].set_char(ch).set_style(style);
                }
            }
        }
    }
}

impl Widget for FieldWidget<'_> {
    fn render(self, area: ScreenRect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.show_grid {
            self.render_grid_lattice(buf);
        }
        self.render_obstacles(area, buf);
        if self.show_regions {
            self.render_regions(area, buf);
        }
    }
}
