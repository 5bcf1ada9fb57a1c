//! Colors for the guidebot field.
//!
//! One accent family for the robot and its path, muted grays for page
//! content, with mixing helpers built on `palette` for gradients and dimming.

use palette::{Mix, Srgb};
use ratatui::style::Color;

/// Robot body accent
pub const ROBOT_COLOR: Color = Color::Rgb(108, 240, 255);

/// Robot eye color while blinking
pub const ROBOT_BLINK_COLOR: Color = Color::Rgb(40, 90, 100);

/// Path gradient endpoints, robot end to goal end
pub const PATH_NEAR_COLOR: Color = Color::Rgb(60, 119, 125);
pub const PATH_FAR_COLOR: Color = Color::Rgb(46, 255, 139);

/// Occupied cell shading
pub const OBSTACLE_COLOR: Color = Color::Rgb(40, 46, 66);

/// Grid line overlay
pub const GRID_COLOR: Color = Color::Rgb(28, 32, 46);

/// Region outline and label
pub const REGION_COLOR: Color = Color::Rgb(70, 80, 110);

/// Caption bubble text and border
pub const BUBBLE_TEXT_COLOR: Color = Color::Rgb(231, 235, 255);
pub const BUBBLE_BORDER_COLOR: Color = Color::Rgb(108, 240, 255);

/// Status bar foreground
pub const STATUS_COLOR: Color = Color::Rgb(150, 150, 160);

fn to_srgb(color: Color) -> Srgb<f32> {
    match color {
        Color::Rgb(r, g, b) => {
            Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
        }
        _ => Srgb::new(0.0, 0.0, 0.0),
    }
}

fn from_srgb(srgb: Srgb<f32>) -> Color {
    Color::Rgb(
        (srgb.red * 255.0).round() as u8,
        (srgb.green * 255.0).round() as u8,
        (srgb.blue * 255.0).round() as u8,
    )
}

/// Blend two colors in sRGB space
pub fn mix_colors(from: Color, to: Color, t: f32) -> Color {
    from_srgb(to_srgb(from).mix(to_srgb(to), t.clamp(0.0, 1.0)))
}

/// Scale a color toward black
pub fn dim_color(color: Color, factor: f32) -> Color {
    mix_colors(Color::Rgb(0, 0, 0), color, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        let a = Color::Rgb(0, 0, 0);
        let b = Color::Rgb(255, 255, 255);
        assert_eq!(mix_colors(a, b, 0.0), a);
        assert_eq!(mix_colors(a, b, 1.0), b);
    }

    #[test]
    fn test_dim_scales_channels() {
        match dim_color(Color::Rgb(200, 100, 50), 0.5) {
            Color::Rgb(r, g, b) => {
                assert_eq!(r, 100);
                assert_eq!(g, 50);
                assert_eq!(b, 25);
            }
            _ => panic!("expected rgb"),
        }
    }
}
