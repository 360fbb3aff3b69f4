//! Line chart of inflation measures over time

use super::{colors, draw_line, ChartConfig, Range};
use crate::error::{DashboardError, Result};
use image::{Rgb, RgbImage};

/// One line of the trend chart
#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub color: Rgb<u8>,
}

/// Draw every series against the row index; gaps break the line.
///
/// Returns the image and the shared value range.
pub fn render_trend(series: &[TrendSeries], config: &ChartConfig) -> Result<(RgbImage, Range)> {
    let range = Range::of(series.iter().flat_map(|s| s.values.iter().flatten()))
        .ok_or_else(|| DashboardError::Chart("trend chart has no values".to_string()))?;
    let len = series.iter().map(|s| s.values.len()).max().unwrap_or(0);

    let mut img = config.canvas();
    let area = config.plot_area();
    area.draw_axes(&mut img, 5);

    let step = if len > 1 { 1.0 / (len - 1) as f64 } else { 0.0 };
    for s in series {
        let mut previous: Option<(u32, u32)> = None;
        for (i, value) in s.values.iter().enumerate() {
            let point = value.map(|v| (area.x(i as f64 * step), area.y(range.fraction(v))));
            match (previous, point) {
                (Some(a), Some(b)) => draw_line(&mut img, a, b, s.color),
                (None, Some(b)) => draw_line(&mut img, b, b, s.color),
                _ => {}
            }
            previous = point;
        }
    }

    // zero line when the range spans it
    if range.min < 0.0 && range.max > 0.0 {
        let y = area.y(range.fraction(0.0));
        super::draw_horizontal_line(&mut img, y, area.left, area.right(), colors::MID_GRAY);
    }

    Ok((img, range))
}
