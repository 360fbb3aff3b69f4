//! PNG chart rendering
//!
//! Charts carry no text; titles, axis ranges and legends are written next to
//! each image in the Markdown report.

mod heatmap;
mod histogram;
mod importance;
mod trend;

pub use heatmap::render_heatmap;
pub use histogram::{render_distribution, Distribution};
pub use importance::render_importance;
pub use trend::{render_trend, TrendSeries};

use crate::error::Result;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Common color definitions
pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const LIGHT_GRAY: Rgb<u8> = Rgb([220, 220, 220]);
    pub const MID_GRAY: Rgb<u8> = Rgb([150, 150, 150]);
    pub const BLUE: Rgb<u8> = Rgb([31, 119, 180]);
    pub const ORANGE: Rgb<u8> = Rgb([255, 127, 14]);
    pub const GREEN: Rgb<u8> = Rgb([44, 160, 44]);
    pub const RED: Rgb<u8> = Rgb([214, 39, 40]);
    pub const SKY_BLUE: Rgb<u8> = Rgb([135, 206, 235]);
    pub const LIGHT_GREEN: Rgb<u8> = Rgb([144, 238, 144]);
    pub const NAVY: Rgb<u8> = Rgb([8, 48, 107]);

    /// Line colors, in series order
    pub const SERIES: [Rgb<u8>; 4] = [BLUE, ORANGE, GREEN, RED];

    /// Name of a series color for legends
    pub fn name(color: Rgb<u8>) -> &'static str {
        match color {
            c if c == BLUE => "blue",
            c if c == ORANGE => "orange",
            c if c == GREEN => "green",
            c if c == RED => "red",
            c if c == SKY_BLUE => "sky blue",
            c if c == LIGHT_GREEN => "light green",
            _ => "custom",
        }
    }
}

/// Chart size and styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 480,
            margin: 40,
        }
    }
}

impl ChartConfig {
    /// Square canvas, used for the heatmap
    pub fn square(&self) -> Self {
        let side = self.width.min(self.height);
        Self {
            width: side,
            height: side,
            margin: self.margin,
        }
    }

    /// Blank canvas in the background color
    pub fn canvas(&self) -> RgbImage {
        RgbImage::from_pixel(self.width.max(1), self.height.max(1), colors::WHITE)
    }

    /// Plotting area inside the margins
    pub fn plot_area(&self) -> PlotArea {
        let margin = self.margin.min(self.width / 4).min(self.height / 4);
        PlotArea {
            left: margin,
            top: margin,
            width: self.width.saturating_sub(2 * margin).max(1),
            height: self.height.saturating_sub(2 * margin).max(1),
        }
    }
}

/// Pixel rectangle that data coordinates are mapped into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PlotArea {
    pub fn right(&self) -> u32 {
        self.left + self.width - 1
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height - 1
    }

    /// Pixel column for a fraction of the width
    pub fn x(&self, t: f64) -> u32 {
        self.left + (t.clamp(0.0, 1.0) * (self.width - 1) as f64).round() as u32
    }

    /// Pixel row for a fraction of the height, 0 at the bottom
    pub fn y(&self, t: f64) -> u32 {
        self.bottom() - (t.clamp(0.0, 1.0) * (self.height - 1) as f64).round() as u32
    }

    /// Draw left and bottom axes with light horizontal grid lines
    pub fn draw_axes(&self, img: &mut RgbImage, grid_lines: u32) {
        for i in 1..=grid_lines {
            let y = self.y(i as f64 / grid_lines as f64);
            draw_horizontal_line(img, y, self.left, self.right(), colors::LIGHT_GRAY);
        }
        draw_vertical_line(img, self.left, self.top, self.bottom(), colors::BLACK);
        draw_horizontal_line(img, self.bottom(), self.left, self.right(), colors::BLACK);
    }
}

/// Value range with padding for a degenerate span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Range covering every finite value, `None` when there is none
    pub fn of<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return None;
        }
        if min == max {
            return Some(Self {
                min: min - 0.5,
                max: max + 0.5,
            });
        }
        Some(Self { min, max })
    }

    /// Position of `value` as a fraction of the range
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

/// Helper function to draw a filled rectangle
pub fn draw_filled_rect(
    img: &mut RgbImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
) {
    let img_width = img.width();
    let img_height = img.height();

    for dy in 0..height {
        for dx in 0..width {
            let px = x + dx;
            let py = y + dy;
            if px < img_width && py < img_height {
                img.put_pixel(px, py, color);
            }
        }
    }
}

/// Helper function to draw a vertical line
pub fn draw_vertical_line(img: &mut RgbImage, x: u32, y1: u32, y2: u32, color: Rgb<u8>) {
    let (start, end) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    if x < img.width() {
        for y in start..=end.min(img.height() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Helper function to draw a horizontal line
pub fn draw_horizontal_line(img: &mut RgbImage, y: u32, x1: u32, x2: u32, color: Rgb<u8>) {
    let (start, end) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    if y < img.height() {
        for x in start..=end.min(img.width() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draw a two pixel wide line segment (Bresenham)
pub fn draw_line(img: &mut RgbImage, from: (u32, u32), to: (u32, u32), color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.0 as i64, from.1 as i64);
    let (x1, y1) = (to.0 as i64, to.1 as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        for (px, py) in [(x0, y0), (x0, y0 + 1)] {
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Interpolate between two colors
pub fn interpolate_color(c1: Rgb<u8>, c2: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    Rgb([
        ((1.0 - t) * c1.0[0] as f64 + t * c2.0[0] as f64) as u8,
        ((1.0 - t) * c1.0[1] as f64 + t * c2.0[1] as f64) as u8,
        ((1.0 - t) * c1.0[2] as f64 + t * c2.0[2] as f64) as u8,
    ])
}

fn gradient(stops: &[Rgb<u8>], value: f64) -> Rgb<u8> {
    let v = value.clamp(0.0, 1.0);
    let segments = (stops.len() - 1) as f64;
    let idx = ((v * segments).floor() as usize).min(stops.len() - 2);
    interpolate_color(stops[idx], stops[idx + 1], v * segments - idx as f64)
}

/// Sequential white-to-navy scale for a value in [0, 1]
pub fn blues(value: f64) -> Rgb<u8> {
    gradient(
        &[
            Rgb([247, 251, 255]),
            Rgb([198, 219, 239]),
            Rgb([107, 174, 214]),
            Rgb([33, 113, 181]),
            colors::NAVY,
        ],
        value,
    )
}

/// Perceptually uniform purple-to-yellow scale for a value in [0, 1]
pub fn viridis(value: f64) -> Rgb<u8> {
    gradient(
        &[
            Rgb([68, 1, 84]),
            Rgb([59, 82, 139]),
            Rgb([33, 145, 140]),
            Rgb([94, 201, 98]),
            Rgb([253, 231, 37]),
        ],
        value,
    )
}

/// Encode an image as PNG
pub fn save_png<P: AsRef<Path>>(img: &RgbImage, path: P) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_color() {
        let mid = interpolate_color(Rgb([0, 0, 0]), Rgb([255, 255, 255]), 0.5);
        assert_eq!(mid, Rgb([127, 127, 127]));
    }

    #[test]
    fn test_scales_hit_their_endpoints() {
        assert_eq!(blues(0.0), Rgb([247, 251, 255]));
        assert_eq!(blues(1.0), colors::NAVY);
        assert_eq!(viridis(0.0), Rgb([68, 1, 84]));
        assert_eq!(viridis(1.0), Rgb([253, 231, 37]));
    }

    #[test]
    fn test_plot_area_mapping() {
        let area = ChartConfig::default().plot_area();
        assert_eq!(area.x(0.0), area.left);
        assert_eq!(area.x(1.0), area.right());
        assert_eq!(area.y(0.0), area.bottom());
        assert_eq!(area.y(1.0), area.top);
    }

    #[test]
    fn test_range_of_constant_values() {
        let range = Range::of(&[2.0, 2.0]).unwrap();
        assert_eq!(range.min, 1.5);
        assert_eq!(range.max, 2.5);
        assert!(Range::of(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut img = RgbImage::new(10, 10);
        draw_line(&mut img, (0, 0), (9, 5), colors::RED);
        assert_eq!(*img.get_pixel(0, 0), colors::RED);
        assert_eq!(*img.get_pixel(9, 5), colors::RED);
    }
}
